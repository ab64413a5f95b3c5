//! Migration registry and runner.
//!
//! # Responsibility
//! - Accept migration handlers keyed by `(module, from_version)`.
//! - Apply pending handlers in strictly increasing version order.
//!
//! # Invariants
//! - Versions start at 1 and each `(module, from_version)` is registered once.
//! - A handler runs at most once per upgrade: the version marker advances
//!   after every successful transition and gates the next run.
//! - A failed transition leaves the marker at the last completed version.

use staking_core::{KvStore, MigrationError, MigrationHandler, MigrationRegistrar};
use std::collections::BTreeMap;

/// Persisted schema version per module.
pub type VersionMap = BTreeMap<String, u64>;

/// The host's migration registrar.
#[derive(Default)]
pub struct MigrationRegistry {
    handlers: BTreeMap<(String, u64), MigrationHandler>,
}

impl MigrationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered source versions for `module`, ascending.
    pub fn registered_versions(&self, module: &str) -> Vec<u64> {
        self.handlers
            .keys()
            .filter(|(name, _)| name == module)
            .map(|(_, from)| *from)
            .collect()
    }

    /// Total number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Bring `module` up to `target` and record the new version in `versions`.
    ///
    /// A module missing from `versions` is new: it will be initialized from
    /// genesis, so no handler runs and its version is set to `target`.
    pub fn run_migrations(
        &self,
        versions: &mut VersionMap,
        module: &str,
        target: u64,
        store: &dyn KvStore,
    ) -> Result<(), MigrationError> {
        let Some(&stored) = versions.get(module) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(module, target, "new module, skipping migrations");
            versions.insert(module.to_string(), target);
            return Ok(());
        };

        if stored > target {
            return Err(MigrationError::UnsupportedVersion {
                module: module.to_string(),
                stored,
                latest: target,
            });
        }

        for from in stored..target {
            let handler = self.handlers.get(&(module.to_string(), from)).ok_or_else(|| {
                MigrationError::MissingHandler {
                    module: module.to_string(),
                    from,
                }
            })?;

            #[cfg(feature = "tracing")]
            tracing::info!(module, from, to = from + 1, "applying migration");

            handler(store)?;
            versions.insert(module.to_string(), from + 1);
        }

        Ok(())
    }
}

impl MigrationRegistrar for MigrationRegistry {
    fn register_migration(
        &mut self,
        module: &str,
        from_version: u64,
        handler: MigrationHandler,
    ) -> Result<(), MigrationError> {
        if from_version == 0 {
            return Err(MigrationError::InvalidVersion {
                module: module.to_string(),
                from: from_version,
            });
        }

        let key = (module.to_string(), from_version);
        if self.handlers.contains_key(&key) {
            return Err(MigrationError::DuplicateRegistration {
                module: module.to_string(),
                from: from_version,
            });
        }

        self.handlers.insert(key, handler);
        Ok(())
    }
}
