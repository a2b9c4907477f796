//! Built-in preprocessors and postprocessors

pub mod postprocessors;
pub mod preprocessors;

pub use postprocessors::register_postprocessors;
pub use preprocessors::register_preprocessors;

#[cfg(test)]
mod tests {
    use super::*;
    use scrub_core::{ComponentKind, ComponentRegistry, Postprocessor, Preprocessor};

    #[test]
    fn test_register_builtins() {
        let mut pre: ComponentRegistry<dyn Preprocessor> =
            ComponentRegistry::new(ComponentKind::Preprocessor);
        register_preprocessors(&mut pre).unwrap();
        assert_eq!(
            pre.list_available(),
            vec!["field_selector", "text_cleaner", "whitespace_normalizer"]
        );

        let mut post: ComponentRegistry<dyn Postprocessor> =
            ComponentRegistry::new(ComponentKind::Postprocessor);
        register_postprocessors(&mut post).unwrap();
        assert_eq!(
            post.list_available(),
            vec!["dict_merger", "format_preserver", "redaction_cleaner"]
        );

        // registering twice collides
        assert!(register_postprocessors(&mut post).is_err());
    }
}
