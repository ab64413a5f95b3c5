//! Registration of store migrations with the host's upgrade registrar.

use staking_core::{ConfigurationError, MigrationHandler, MigrationRegistrar};
use std::collections::BTreeMap;

/// Register one migration per version below `current_version`.
///
/// The whole set is checked before anything is registered: every version in
/// `[1, current_version - 1]` must be present and nothing else may be. Then
/// the handlers are registered in ascending order, stopping at the first
/// rejection.
pub fn register_all(
    module: &str,
    current_version: u64,
    mut migrations: BTreeMap<u64, MigrationHandler>,
    registrar: &mut dyn MigrationRegistrar,
) -> Result<(), ConfigurationError> {
    let required = 1..current_version.max(1);

    if let Some(from) = required.clone().find(|from| !migrations.contains_key(from)) {
        return Err(ConfigurationError::MissingMigration {
            module: module.to_string(),
            from,
        });
    }
    if let Some(&from) = migrations.keys().find(|from| !required.contains(*from)) {
        return Err(ConfigurationError::UnexpectedMigration {
            module: module.to_string(),
            from,
        });
    }

    for from in required {
        let Some(handler) = migrations.remove(&from) else {
            continue;
        };
        registrar
            .register_migration(module, from, handler)
            .map_err(|source| ConfigurationError::MigrationRejected {
                module: module.to_string(),
                from,
                source,
            })?;
        tracing::debug!(module, from, to = from + 1, "registered migration");
    }

    Ok(())
}
