//! Store migrations from schema version 1 to the current version.
//!
//! Each function moves the store exactly one version forward. The host
//! runner decides which of them still need to run.

use super::{Params, keys};
use serde::de::DeserializeOwned;
use staking_core::{
    KvStore, LegacySubspace, MigrationError, MigrationHandler, key_hex, split_length_prefixed,
};
use std::{collections::BTreeMap, fmt, sync::Arc};

// Parameter keys in the retired subspace.
const KEY_UNBONDING_TIME: &str = "UnbondingTime";
const KEY_MAX_VALIDATORS: &str = "MaxValidators";
const KEY_MAX_ENTRIES: &str = "MaxEntries";
const KEY_HISTORICAL_ENTRIES: &str = "HistoricalEntries";
const KEY_BOND_DENOM: &str = "BondDenom";
const KEY_MIN_COMMISSION_RATE: &str = "MinCommissionRate";

/// Builds the migration handlers handed to the migration pipeline.
#[derive(Clone, Default)]
pub struct Migrator {
    legacy: Option<Arc<dyn LegacySubspace>>,
}

impl fmt::Debug for Migrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Migrator")
            .field("legacy", &self.legacy.is_some())
            .finish()
    }
}

impl Migrator {
    /// Create a migrator. The legacy subspace is only read by the first two
    /// migrations.
    pub fn new(legacy: Option<Arc<dyn LegacySubspace>>) -> Self {
        Self { legacy }
    }

    /// Every migration keyed by the version it migrates from.
    pub fn migrations(&self) -> BTreeMap<u64, MigrationHandler> {
        let mut handlers: BTreeMap<u64, MigrationHandler> = BTreeMap::new();

        let legacy = self.legacy.clone();
        handlers.insert(
            1,
            Box::new(move |store: &dyn KvStore| migrate_v1_to_v2(store, legacy.as_deref())),
        );
        let legacy = self.legacy.clone();
        handlers.insert(
            2,
            Box::new(move |store: &dyn KvStore| migrate_v2_to_v3(store, legacy.as_deref())),
        );
        handlers.insert(3, Box::new(migrate_v3_to_v4));
        handlers.insert(4, Box::new(migrate_v4_to_v5));

        handlers
    }
}

/// Move parameters out of the legacy subspace into the module store.
///
/// Missing subspace values keep their defaults. Parameters already present
/// in the store are left alone.
pub fn migrate_v1_to_v2(
    store: &dyn KvStore,
    legacy: Option<&dyn LegacySubspace>,
) -> Result<(), MigrationError> {
    if store.has(keys::PARAMS_KEY) {
        return Ok(());
    }

    let defaults = Params::default();
    let mut params = Params {
        // Introduced at version 3.
        min_commission_rate: String::new(),
        ..defaults
    };

    if let Some(legacy) = legacy {
        if let Some(value) = legacy_param(legacy, KEY_UNBONDING_TIME)? {
            params.unbonding_time_secs = value;
        }
        if let Some(value) = legacy_param(legacy, KEY_MAX_VALIDATORS)? {
            params.max_validators = value;
        }
        if let Some(value) = legacy_param(legacy, KEY_MAX_ENTRIES)? {
            params.max_entries = value;
        }
        if let Some(value) = legacy_param(legacy, KEY_HISTORICAL_ENTRIES)? {
            params.historical_entries = value;
        }
        if let Some(value) = legacy_param(legacy, KEY_BOND_DENOM)? {
            params.bond_denom = value;
        }
    }

    tracing::info!(
        from_legacy = legacy.is_some_and(|legacy| !legacy.is_empty()),
        "migrated staking params to module store"
    );
    write_params(store, &params)
}

/// Fill in the minimum commission rate.
pub fn migrate_v2_to_v3(
    store: &dyn KvStore,
    legacy: Option<&dyn LegacySubspace>,
) -> Result<(), MigrationError> {
    let mut params = read_params(store)?.unwrap_or_default();
    if !params.min_commission_rate.is_empty() {
        return Ok(());
    }

    let configured = match legacy {
        Some(legacy) => legacy_param::<String>(legacy, KEY_MIN_COMMISSION_RATE)?,
        None => None,
    };
    params.min_commission_rate = configured.unwrap_or_else(|| "0".to_string());

    write_params(store, &params)
}

/// Rewrite fixed-width validator and delegation keys as length-prefixed keys.
///
/// Every key is checked before the first write, so a corrupt key leaves the
/// store untouched.
pub fn migrate_v3_to_v4(store: &dyn KvStore) -> Result<(), MigrationError> {
    let mut rewrites = Vec::new();

    for (key, value) in store.prefix_scan(&[keys::VALIDATORS_PREFIX]) {
        if !keys::legacy::is_validator_key(&key) {
            return Err(corrupt(&key, "not a fixed-width validator key"));
        }
        let new_key = keys::validator_key(&key[1..]).map_err(|err| corrupt(&key, err))?;
        rewrites.push((key, new_key, value));
    }

    for (key, value) in store.prefix_scan(&[keys::DELEGATION_PREFIX]) {
        if !keys::legacy::is_delegation_key(&key) {
            return Err(corrupt(&key, "not a fixed-width delegation key"));
        }
        let (delegator, validator) = key[1..].split_at(staking_core::ADDRESS_LEN);
        let new_key =
            keys::delegation_key(delegator, validator).map_err(|err| corrupt(&key, err))?;
        rewrites.push((key, new_key, value));
    }

    for (old_key, _, _) in &rewrites {
        store.delete(old_key);
    }
    for (_, new_key, value) in &rewrites {
        store.set(new_key, value);
    }

    tracing::info!(rewritten = rewrites.len(), "rewrote staking keys with length prefixes");
    Ok(())
}

/// Build the delegations-by-validator index.
///
/// Nothing is written unless every delegation key parses.
pub fn migrate_v4_to_v5(store: &dyn KvStore) -> Result<(), MigrationError> {
    let mut index = Vec::new();

    for (key, _) in store.prefix_scan(&[keys::DELEGATION_PREFIX]) {
        let (delegator, rest) = key
            .get(1..)
            .and_then(split_length_prefixed)
            .ok_or_else(|| corrupt(&key, "malformed delegator segment"))?;
        let (validator, rest) = split_length_prefixed(rest)
            .ok_or_else(|| corrupt(&key, "malformed validator segment"))?;
        if !rest.is_empty() {
            return Err(corrupt(&key, "trailing bytes"));
        }
        index.push(
            keys::delegation_by_validator_key(validator, delegator)
                .map_err(|err| corrupt(&key, err))?,
        );
    }

    for key in &index {
        store.set(key, &[]);
    }

    tracing::info!(indexed = index.len(), "built delegations by validator index");
    Ok(())
}

fn legacy_param<T: DeserializeOwned>(
    legacy: &dyn LegacySubspace,
    key: &str,
) -> Result<Option<T>, MigrationError> {
    legacy
        .get_raw(key)
        .map(|raw| {
            serde_json::from_slice(&raw).map_err(|err| MigrationError::Legacy {
                key: key.to_string(),
                reason: err.to_string(),
            })
        })
        .transpose()
}

fn read_params(store: &dyn KvStore) -> Result<Option<Params>, MigrationError> {
    store
        .get(keys::PARAMS_KEY)
        .map(|raw| serde_json::from_slice(&raw).map_err(|err| corrupt(keys::PARAMS_KEY, err)))
        .transpose()
}

fn write_params(store: &dyn KvStore, params: &Params) -> Result<(), MigrationError> {
    let raw = serde_json::to_vec(params).map_err(|err| corrupt(keys::PARAMS_KEY, err))?;
    store.set(keys::PARAMS_KEY, &raw);
    Ok(())
}

fn corrupt(key: &[u8], reason: impl fmt::Display) -> MigrationError {
    MigrationError::Corrupt {
        key: key_hex(key),
        reason: reason.to_string(),
    }
}
