//! The staking keeper: the core service behind the module.
//!
//! The keeper owns the module's store and talks to the auth and bank modules
//! through injected collaborators. Lifecycle hooks are installed once, after
//! construction, by the hook aggregator.

mod genesis;
mod invariants;
mod keys;
mod migrations;
mod round;
mod services;
mod types;

pub use genesis::validate_genesis;
pub use invariants::{DELEGATOR_SHARES_ROUTE, NONNEGATIVE_SHARES_ROUTE, register_invariants};
pub use migrations::{
    Migrator, migrate_v1_to_v2, migrate_v2_to_v3, migrate_v3_to_v4, migrate_v4_to_v5,
};
pub use services::{MSG_SERVICE_NAME, MsgServer, MsgUpdateParams, QUERY_SERVICE_NAME, Querier};
pub use types::{
    BondStatus, Delegation, GenesisState, HistoricalInfo, LastValidatorPower, POWER_REDUCTION,
    Params, Pool, Validator,
};

use crate::{BONDED_POOL_NAME, NOT_BONDED_POOL_NAME};

use serde::{Serialize, de::DeserializeOwned};
use staking_core::{
    AccountKeeper, Address, AddressCodec, BankKeeper, BlockContext, CodecError,
    ConfigurationError, ConsensusAddressCodec, HookError, KvStore, ModuleError, StakingEvent,
    ValidatorAddressCodec, key_hex,
};
use staking_std::MultiStakingHooks;
use std::{
    fmt,
    sync::{Arc, OnceLock},
};
use thiserror::Error;

/// Errors returned by keeper operations.
#[derive(Error, Debug)]
pub enum KeeperError {
    /// An address string could not be converted.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// An installed hook failed.
    #[error(transparent)]
    Hook(#[from] HookError),

    /// A stored record could not be decoded.
    #[error("corrupt record at key {key}: {reason}")]
    Corrupt {
        /// Hex-encoded store key.
        key: String,
        /// Decoder failure.
        reason: String,
    },

    /// A record could not be encoded.
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    /// No validator is stored under the given address.
    #[error("validator {0} not found")]
    ValidatorNotFound(String),

    /// A privileged request was signed by someone other than the authority.
    #[error("invalid authority; expected {expected}, got {got}")]
    Unauthorized {
        /// The module authority.
        expected: String,
        /// The request signer.
        got: String,
    },

    /// Parameters failed validation.
    #[error("invalid params: {0}")]
    InvalidParams(String),
}

impl From<KeeperError> for ModuleError {
    fn from(err: KeeperError) -> Self {
        match err {
            KeeperError::Hook(err) => ModuleError::Hook(err),
            other => ModuleError::Runtime(Box::new(other)),
        }
    }
}

/// The staking core service.
pub struct Keeper {
    store: Arc<dyn KvStore>,
    account_keeper: Arc<dyn AccountKeeper>,
    bank_keeper: Arc<dyn BankKeeper>,
    authority: String,
    validator_codec: ValidatorAddressCodec,
    consensus_codec: ConsensusAddressCodec,
    hooks: OnceLock<MultiStakingHooks>,
}

impl fmt::Debug for Keeper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keeper")
            .field("authority", &self.authority)
            .field("validator_codec", &self.validator_codec)
            .field("consensus_codec", &self.consensus_codec)
            .field("hooks", &self.hooks.get().map(MultiStakingHooks::names))
            .finish_non_exhaustive()
    }
}

impl Keeper {
    /// Create a keeper. `authority` is the rendered address allowed to run
    /// privileged operations.
    pub fn new(
        store: Arc<dyn KvStore>,
        account_keeper: Arc<dyn AccountKeeper>,
        bank_keeper: Arc<dyn BankKeeper>,
        authority: String,
        validator_codec: ValidatorAddressCodec,
        consensus_codec: ConsensusAddressCodec,
    ) -> Self {
        Self {
            store,
            account_keeper,
            bank_keeper,
            authority,
            validator_codec,
            consensus_codec,
            hooks: OnceLock::new(),
        }
    }

    /// The address allowed to run privileged operations.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Codec for validator operator addresses.
    pub fn validator_address_codec(&self) -> &ValidatorAddressCodec {
        &self.validator_codec
    }

    /// Codec for validator consensus addresses.
    pub fn consensus_address_codec(&self) -> &ConsensusAddressCodec {
        &self.consensus_codec
    }

    /// The auth module collaborator.
    pub fn account_keeper(&self) -> &Arc<dyn AccountKeeper> {
        &self.account_keeper
    }

    /// The bank module collaborator.
    pub fn bank_keeper(&self) -> &Arc<dyn BankKeeper> {
        &self.bank_keeper
    }

    /// Install the hook dispatcher. Can only be done once.
    pub fn set_hooks(&self, hooks: MultiStakingHooks) -> Result<(), ConfigurationError> {
        let names: Vec<String> = hooks.names().into_iter().map(String::from).collect();
        self.hooks
            .set(hooks)
            .map_err(|_| ConfigurationError::HooksAlreadySet)?;
        tracing::info!(hooks = ?names, "installed staking hooks");
        Ok(())
    }

    /// The installed hook dispatcher, if any.
    pub fn hooks(&self) -> Option<&MultiStakingHooks> {
        self.hooks.get()
    }

    pub(crate) async fn emit(
        &self,
        ctx: &BlockContext,
        event: StakingEvent,
    ) -> Result<(), HookError> {
        match self.hooks.get() {
            Some(hooks) => hooks.dispatch(ctx, &event).await,
            None => Ok(()),
        }
    }

    // ------------------------------------------------------------------
    // Params
    // ------------------------------------------------------------------

    /// Current parameters. Defaults when none were stored yet.
    pub fn params(&self) -> Result<Params, KeeperError> {
        Ok(read_json(&*self.store, keys::PARAMS_KEY)?.unwrap_or_default())
    }

    /// Validate and store parameters.
    pub fn set_params(&self, params: &Params) -> Result<(), KeeperError> {
        params.validate().map_err(KeeperError::InvalidParams)?;
        write_json(&*self.store, keys::PARAMS_KEY, params)
    }

    /// Bond-denom balances of the pool module accounts.
    pub fn pool(&self) -> Result<Pool, KeeperError> {
        let denom = self.params()?.bond_denom;
        let balance = |name: &str| {
            self.bank_keeper
                .balance(&self.account_keeper.module_address(name), &denom)
        };
        Ok(Pool {
            bonded_tokens: balance(BONDED_POOL_NAME),
            not_bonded_tokens: balance(NOT_BONDED_POOL_NAME),
        })
    }

    // ------------------------------------------------------------------
    // Validators
    // ------------------------------------------------------------------

    /// Look up a validator by operator address.
    pub fn validator(&self, operator: &Address) -> Result<Option<Validator>, KeeperError> {
        read_json(&*self.store, &keys::validator_key(operator.as_bytes())?)
    }

    /// Store a validator under its operator address.
    pub fn set_validator(&self, validator: &Validator) -> Result<(), KeeperError> {
        let operator = self
            .validator_codec
            .string_to_bytes(&validator.operator_address)?;
        write_json(
            &*self.store,
            &keys::validator_key(operator.as_bytes())?,
            validator,
        )
    }

    /// Every validator, ordered by operator address bytes.
    pub fn validators(&self) -> Result<Vec<Validator>, KeeperError> {
        scan_json(&*self.store, &[keys::VALIDATORS_PREFIX])
    }

    // ------------------------------------------------------------------
    // Delegations
    // ------------------------------------------------------------------

    /// Store a delegation and index it by validator.
    pub fn set_delegation(&self, delegation: &Delegation) -> Result<(), KeeperError> {
        let delegator = self
            .account_keeper
            .address_codec()
            .string_to_bytes(&delegation.delegator_address)?;
        let validator = self
            .validator_codec
            .string_to_bytes(&delegation.validator_address)?;

        write_json(
            &*self.store,
            &keys::delegation_key(delegator.as_bytes(), validator.as_bytes())?,
            delegation,
        )?;
        self.store.set(
            &keys::delegation_by_validator_key(validator.as_bytes(), delegator.as_bytes())?,
            &[],
        );
        Ok(())
    }

    /// Look up a delegation.
    pub fn delegation(
        &self,
        delegator: &Address,
        validator: &Address,
    ) -> Result<Option<Delegation>, KeeperError> {
        read_json(
            &*self.store,
            &keys::delegation_key(delegator.as_bytes(), validator.as_bytes())?,
        )
    }

    /// Every delegation, ordered by delegator then validator bytes.
    pub fn delegations(&self) -> Result<Vec<Delegation>, KeeperError> {
        scan_json(&*self.store, &[keys::DELEGATION_PREFIX])
    }

    /// Delegations to one validator, through the by-validator index.
    pub fn validator_delegations(
        &self,
        validator: &Address,
    ) -> Result<Vec<Delegation>, KeeperError> {
        let prefix = keys::delegations_by_validator_prefix(validator.as_bytes())?;
        let mut delegations = Vec::new();
        for (key, _) in self.store.prefix_scan(&prefix) {
            let (_, delegator) =
                keys::address_pair_from_key(&key).ok_or_else(|| corrupt(&key, "malformed key"))?;
            if let Some(delegation) = self.delegation(&delegator, validator)? {
                delegations.push(delegation);
            }
        }
        Ok(delegations)
    }

    // ------------------------------------------------------------------
    // Powers
    // ------------------------------------------------------------------

    /// Power `validator` had at the end of the previous round.
    pub fn last_validator_power(&self, validator: &Address) -> Result<Option<i64>, KeeperError> {
        let key = keys::last_validator_power_key(validator.as_bytes())?;
        self.store
            .get(&key)
            .map(|value| decode_i64(&key, &value))
            .transpose()
    }

    pub(crate) fn set_last_validator_power(
        &self,
        validator: &Address,
        power: i64,
    ) -> Result<(), KeeperError> {
        self.store.set(
            &keys::last_validator_power_key(validator.as_bytes())?,
            &power.to_be_bytes(),
        );
        Ok(())
    }

    pub(crate) fn delete_last_validator_power(
        &self,
        validator: &Address,
    ) -> Result<(), KeeperError> {
        self.store
            .delete(&keys::last_validator_power_key(validator.as_bytes())?);
        Ok(())
    }

    /// Every last validator power, ordered by operator address bytes.
    pub fn last_validator_powers(&self) -> Result<Vec<(Address, i64)>, KeeperError> {
        self.store
            .prefix_scan(&[keys::LAST_VALIDATOR_POWER_PREFIX])
            .into_iter()
            .map(|(key, value)| {
                let address =
                    keys::address_from_key(&key).ok_or_else(|| corrupt(&key, "malformed key"))?;
                Ok((address, decode_i64(&key, &value)?))
            })
            .collect()
    }

    /// Sum of the last validator powers.
    pub fn last_total_power(&self) -> Result<i64, KeeperError> {
        match self.store.get(keys::LAST_TOTAL_POWER_KEY) {
            Some(value) => decode_i64(keys::LAST_TOTAL_POWER_KEY, &value),
            None => Ok(0),
        }
    }

    pub(crate) fn set_last_total_power(&self, power: i64) {
        self.store
            .set(keys::LAST_TOTAL_POWER_KEY, &power.to_be_bytes());
    }
}

fn corrupt(key: &[u8], reason: impl fmt::Display) -> KeeperError {
    KeeperError::Corrupt {
        key: key_hex(key),
        reason: reason.to_string(),
    }
}

fn decode_i64(key: &[u8], value: &[u8]) -> Result<i64, KeeperError> {
    let bytes: [u8; 8] = value
        .try_into()
        .map_err(|_| corrupt(key, format!("expected 8 bytes, found {}", value.len())))?;
    Ok(i64::from_be_bytes(bytes))
}

pub(crate) fn read_json<T: DeserializeOwned>(
    store: &dyn KvStore,
    key: &[u8],
) -> Result<Option<T>, KeeperError> {
    store
        .get(key)
        .map(|value| serde_json::from_slice(&value).map_err(|err| corrupt(key, err)))
        .transpose()
}

pub(crate) fn write_json<T: Serialize>(
    store: &dyn KvStore,
    key: &[u8],
    value: &T,
) -> Result<(), KeeperError> {
    store.set(key, &serde_json::to_vec(value)?);
    Ok(())
}

fn scan_json<T: DeserializeOwned>(store: &dyn KvStore, prefix: &[u8]) -> Result<Vec<T>, KeeperError> {
    store
        .prefix_scan(prefix)
        .into_iter()
        .map(|(key, value)| serde_json::from_slice(&value).map_err(|err| corrupt(&key, err)))
        .collect()
}
