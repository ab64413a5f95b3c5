//! Explicit registration with the host's module registry.

use crate::{CONSENSUS_VERSION, MODULE_NAME};
use staking_core::{ConfigurationError, ModuleDescriptor, ModuleRegistry};

/// Modules whose configuration or collaborators staking consumes.
pub const DEPENDS_ON: &[&str] = &["auth", "bank"];

/// The staking module descriptor.
pub fn descriptor() -> ModuleDescriptor {
    ModuleDescriptor {
        name: MODULE_NAME,
        consensus_version: CONSENSUS_VERSION,
        depends_on: DEPENDS_ON.to_vec(),
    }
}

/// Register the staking module with `registry`.
pub fn register(registry: &mut ModuleRegistry) -> Result<(), ConfigurationError> {
    registry.register(descriptor())?;
    tracing::debug!(module = MODULE_NAME, version = CONSENSUS_VERSION, "registered module");
    Ok(())
}
