//! Host-side migration bookkeeping.

pub mod registry;

pub use registry::{MigrationRegistry, VersionMap};
