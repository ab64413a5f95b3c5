//! Host contract for registering schema migrations.

use crate::{error::MigrationError, store::KvStore};

/// A migration from schema version `v` to `v + 1`.
///
/// The handler receives the module's store at version `v` and leaves it at
/// version `v + 1`, or fails without the host advancing the version marker.
pub type MigrationHandler = Box<dyn Fn(&dyn KvStore) -> Result<(), MigrationError> + Send + Sync>;

/// The host's upgrade registrar.
pub trait MigrationRegistrar {
    /// Register the handler that migrates `module` from `from_version`.
    fn register_migration(
        &mut self,
        module: &str,
        from_version: u64,
        handler: MigrationHandler,
    ) -> Result<(), MigrationError>;
}
