//! Collaborators owned by other modules and injected into the staking keeper.

use crate::address::{Address, AddressCodec, module_address};
use std::sync::Arc;

/// Account bookkeeping owned by the auth module.
pub trait AccountKeeper: Send + Sync {
    /// Codec for plain account addresses.
    fn address_codec(&self) -> Arc<dyn AddressCodec>;

    /// Address of the named module account.
    fn module_address(&self, name: &str) -> Address {
        module_address(name)
    }
}

/// Balance bookkeeping owned by the bank module.
pub trait BankKeeper: Send + Sync {
    /// Balance of `denom` held by `address`.
    fn balance(&self, address: &Address, denom: &str) -> u128;
}

/// The retired per-module parameter namespace.
///
/// Only the earliest schema migrations read from it; values are raw JSON.
pub trait LegacySubspace: Send + Sync {
    /// Read a raw parameter value.
    fn get_raw(&self, key: &str) -> Option<Vec<u8>>;

    /// Write a raw parameter value.
    fn set_raw(&self, key: &str, value: Vec<u8>);

    /// Whether any parameter has been stored.
    fn is_empty(&self) -> bool;
}
