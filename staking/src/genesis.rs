//! Genesis byte envelope.
//!
//! The host hands genesis around as opaque bytes; this module owns the
//! encoding (JSON) and delegates the actual import and export to the keeper.

use crate::{
    MODULE_NAME,
    keeper::{GenesisState, Keeper, validate_genesis},
};
use staking_core::{BlockContext, BoxError, GenesisError, ModuleError, ValidatorUpdate};

/// Decode a genesis envelope.
pub fn decode_genesis(bytes: &[u8]) -> Result<GenesisState, GenesisError> {
    serde_json::from_slice(bytes).map_err(|err| GenesisError::Decode {
        module: MODULE_NAME.to_string(),
        source: BoxError::from(err),
    })
}

/// Encode a genesis state as an envelope.
pub fn encode_genesis(state: &GenesisState) -> Result<Vec<u8>, GenesisError> {
    serde_json::to_vec(state).map_err(|err| GenesisError::Encode {
        module: MODULE_NAME.to_string(),
        source: BoxError::from(err),
    })
}

/// Envelope for a fresh network: default params and no validators.
pub fn default_genesis() -> Result<Vec<u8>, GenesisError> {
    encode_genesis(&GenesisState::default())
}

/// Decode an envelope and check it without applying it.
pub fn validate_genesis_bytes(bytes: &[u8]) -> Result<GenesisState, GenesisError> {
    let state = decode_genesis(bytes)?;
    validate_genesis(&state).map_err(|reason| GenesisError::Invalid {
        module: MODULE_NAME.to_string(),
        reason,
    })?;
    Ok(state)
}

/// Decode an envelope and load it into `keeper`.
pub async fn init_genesis(
    keeper: &Keeper,
    ctx: &BlockContext,
    bytes: &[u8],
) -> Result<Vec<ValidatorUpdate>, ModuleError> {
    let state = decode_genesis(bytes)?;
    keeper
        .init_genesis(ctx, &state)
        .await
        .map_err(ModuleError::from)
}

/// Export `keeper` state as an envelope.
pub fn export_genesis(keeper: &Keeper) -> Result<Vec<u8>, ModuleError> {
    let state = keeper.export_genesis()?;
    tracing::info!(
        validators = state.validators.len(),
        delegations = state.delegations.len(),
        "exported staking genesis"
    );
    Ok(encode_genesis(&state)?)
}
