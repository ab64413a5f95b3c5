//! Request and query services registered with the host router.

use super::{Keeper, KeeperError, Params, Pool, Validator};
use staking_core::AddressCodec;
use std::sync::Arc;

/// Router name of the request service.
pub const MSG_SERVICE_NAME: &str = "cosmos.staking.v1beta1.Msg";

/// Router name of the query service.
pub const QUERY_SERVICE_NAME: &str = "cosmos.staking.v1beta1.Query";

/// Replace the module parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgUpdateParams {
    /// Signer; must be the module authority.
    pub authority: String,
    /// New parameters.
    pub params: Params,
}

/// Request handlers.
#[derive(Debug, Clone)]
pub struct MsgServer {
    keeper: Arc<Keeper>,
}

impl MsgServer {
    /// Serve requests against `keeper`.
    pub fn new(keeper: Arc<Keeper>) -> Self {
        Self { keeper }
    }

    /// Replace the parameters. Only the authority may do this.
    pub fn update_params(&self, msg: MsgUpdateParams) -> Result<(), KeeperError> {
        if msg.authority != self.keeper.authority() {
            return Err(KeeperError::Unauthorized {
                expected: self.keeper.authority().to_string(),
                got: msg.authority,
            });
        }
        self.keeper.set_params(&msg.params)?;
        tracing::info!(authority = %msg.authority, "updated staking params");
        Ok(())
    }
}

/// Query handlers.
#[derive(Debug, Clone)]
pub struct Querier {
    keeper: Arc<Keeper>,
}

impl Querier {
    /// Answer queries against `keeper`.
    pub fn new(keeper: Arc<Keeper>) -> Self {
        Self { keeper }
    }

    /// Current parameters.
    pub fn params(&self) -> Result<Params, KeeperError> {
        self.keeper.params()
    }

    /// One validator by operator address string.
    pub fn validator(&self, operator_address: &str) -> Result<Option<Validator>, KeeperError> {
        let operator = self
            .keeper
            .validator_address_codec()
            .string_to_bytes(operator_address)?;
        self.keeper.validator(&operator)
    }

    /// Every validator.
    pub fn validators(&self) -> Result<Vec<Validator>, KeeperError> {
        self.keeper.validators()
    }

    /// Pool account balances.
    pub fn pool(&self) -> Result<Pool, KeeperError> {
        self.keeper.pool()
    }
}
