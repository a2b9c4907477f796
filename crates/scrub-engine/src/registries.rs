use scrub_core::{
    ComponentKind, ComponentRegistry, Postprocessor, Preprocessor, Reader, Result, Writer,
};

/// One component registry per family.
///
/// Built once at start-up and handed to every [`crate::Pipeline`] that
/// needs it; registration needs `&mut self`, lookups only `&self`.
#[derive(Debug)]
pub struct Registries {
    pub readers: ComponentRegistry<dyn Reader>,
    pub preprocessors: ComponentRegistry<dyn Preprocessor>,
    pub postprocessors: ComponentRegistry<dyn Postprocessor>,
    pub writers: ComponentRegistry<dyn Writer>,
}

impl Registries {
    /// Empty registries
    pub fn new() -> Self {
        Self {
            readers: ComponentRegistry::new(ComponentKind::Reader),
            preprocessors: ComponentRegistry::new(ComponentKind::Preprocessor),
            postprocessors: ComponentRegistry::new(ComponentKind::Postprocessor),
            writers: ComponentRegistry::new(ComponentKind::Writer),
        }
    }

    /// Registries holding every built-in component
    pub fn with_defaults() -> Result<Self> {
        let mut registries = Self::new();
        scrub_io::register_readers(&mut registries.readers)?;
        scrub_io::register_writers(&mut registries.writers)?;
        scrub_processors::register_preprocessors(&mut registries.preprocessors)?;
        scrub_processors::register_postprocessors(&mut registries.postprocessors)?;
        Ok(registries)
    }
}

impl Default for Registries {
    fn default() -> Self {
        Self::new()
    }
}
