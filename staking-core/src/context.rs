//! Per-round context handed to the module by the host.

/// The round (block) the host is currently processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockContext {
    /// Round height.
    pub height: u64,
    /// Round timestamp in Unix seconds.
    pub time_unix_secs: u64,
}

impl BlockContext {
    /// Create a context for the given height and time.
    pub const fn new(height: u64, time_unix_secs: u64) -> Self {
        Self {
            height,
            time_unix_secs,
        }
    }
}

/// A change to a validator's consensus voting power.
///
/// A power of zero removes the validator from the consensus set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorUpdate {
    /// Consensus public key.
    pub pub_key: Vec<u8>,
    /// New voting power.
    pub power: i64,
}
