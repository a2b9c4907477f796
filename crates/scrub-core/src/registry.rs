//! Named factory tables for pluggable components
//!
//! One registry exists per component family, so the same name can be used
//! by a reader and a writer without colliding.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::{ComponentArgs, Error, Result};

/// Component family a registry serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Reader,
    Preprocessor,
    Postprocessor,
    Writer,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Reader => "reader",
            ComponentKind::Preprocessor => "preprocessor",
            ComponentKind::Postprocessor => "postprocessor",
            ComponentKind::Writer => "writer",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds a component from construction arguments
pub type Constructor<T> = Arc<dyn Fn(&ComponentArgs) -> Result<Box<T>> + Send + Sync>;

pub struct ComponentRegistry<T: ?Sized> {
    kind: ComponentKind,
    entries: HashMap<String, Constructor<T>>,
}

impl<T: ?Sized> ComponentRegistry<T> {
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            entries: HashMap::new(),
        }
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// Register a constructor under a unique name
    pub fn register<F>(&mut self, name: &str, constructor: F) -> Result<()>
    where
        F: Fn(&ComponentArgs) -> Result<Box<T>> + Send + Sync + 'static,
    {
        self.insert(name, Arc::new(constructor), false)
    }

    /// Register a constructor, replacing any existing entry with that name
    pub fn register_override<F>(&mut self, name: &str, constructor: F) -> Result<()>
    where
        F: Fn(&ComponentArgs) -> Result<Box<T>> + Send + Sync + 'static,
    {
        self.insert(name, Arc::new(constructor), true)
    }

    fn insert(&mut self, name: &str, constructor: Constructor<T>, replace: bool) -> Result<()> {
        if self.entries.contains_key(name) && !replace {
            return Err(Error::Registration(format!(
                "{} '{}' is already registered",
                self.kind, name
            )));
        }

        self.entries.insert(name.to_string(), constructor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Constructor<T>> {
        self.entries.get(name).cloned().ok_or_else(|| {
            let available = self.list_available();
            let available = if available.is_empty() {
                "none".to_string()
            } else {
                available.join(", ")
            };
            Error::Registration(format!(
                "{} '{}' not found. Available: {}",
                self.kind, name, available
            ))
        })
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted
    pub fn list_available(&self) -> Vec<String> {
        let mut names: Vec<_> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Look up `name` and build an instance from `args`.
    ///
    /// Argument mismatches are reported as an instantiation failure naming
    /// the component; any other construction error is returned as is.
    pub fn create(&self, name: &str, args: &ComponentArgs) -> Result<Box<T>> {
        let constructor = self.get(name)?;

        constructor(args).map_err(|e| match e {
            Error::InvalidArguments(message) => Error::Instantiation {
                kind: self.kind,
                name: name.to_string(),
                message,
            },
            other => other,
        })
    }

    pub fn unregister(&mut self, name: &str) -> Result<()> {
        if self.entries.remove(name).is_none() {
            return Err(Error::Registration(format!(
                "{} '{}' not registered",
                self.kind, name
            )));
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T: ?Sized> fmt::Debug for ComponentRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("kind", &self.kind)
            .field("entries", &self.list_available())
            .finish()
    }
}
