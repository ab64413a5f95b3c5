//! Process-wide module registry.
//!
//! The host constructs one registry during startup and hands it to each
//! module's registration entry point. Nothing is registered by merely linking
//! a module into the binary.

use crate::error::ConfigurationError;
use std::collections::BTreeMap;

/// What a module declares when it registers with the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    /// Unique module name.
    pub name: &'static str,
    /// Current on-disk schema version.
    pub consensus_version: u64,
    /// Names of the modules whose configuration or collaborators it consumes.
    pub depends_on: Vec<&'static str>,
}

/// Registry of module descriptors, keyed by name.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: BTreeMap<&'static str, ModuleDescriptor>,
}

impl ModuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module descriptor. Names must be unique.
    pub fn register(&mut self, descriptor: ModuleDescriptor) -> Result<(), ConfigurationError> {
        if self.modules.contains_key(descriptor.name) {
            return Err(ConfigurationError::DuplicateModule(
                descriptor.name.to_string(),
            ));
        }
        self.modules.insert(descriptor.name, descriptor);
        Ok(())
    }

    /// Look up a module by name.
    pub fn get(&self, name: &str) -> Option<&ModuleDescriptor> {
        self.modules.get(name)
    }

    /// Registered module names in ascending order.
    pub fn names(&self) -> Vec<&'static str> {
        self.modules.keys().copied().collect()
    }

    /// Number of registered modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether no module is registered.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
