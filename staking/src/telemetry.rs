//! Tracing bootstrap for binaries and tests.

use staking_core::BoxError;
use tracing_subscriber::EnvFilter;

/// Install a global formatting subscriber filtered by `filter`
/// (for example `"staking=debug,info"`).
///
/// Fails if the filter does not parse or a global subscriber is already set.
pub fn init_tracing(filter: &str) -> Result<(), BoxError> {
    let filter = EnvFilter::try_new(filter)?;
    tracing_subscriber::fmt().with_env_filter(filter).try_init()
}
