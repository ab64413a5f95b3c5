use super::{GenesisState, Keeper, KeeperError, LastValidatorPower};
use staking_core::{AddressCodec, BlockContext, StakingEvent, ValidatorUpdate};
use std::collections::HashSet;

impl Keeper {
    /// Load `state` into the store.
    ///
    /// A state that was not produced by an export announces every validator
    /// and delegation to the installed hooks, and the validator set is
    /// computed from the bonded validators. An exported state already carries
    /// the set in `last_validator_powers`.
    pub async fn init_genesis(
        &self,
        ctx: &BlockContext,
        state: &GenesisState,
    ) -> Result<Vec<ValidatorUpdate>, KeeperError> {
        self.set_params(&state.params)?;
        self.set_last_total_power(state.last_total_power);

        for validator in &state.validators {
            self.set_validator(validator)?;
            if !state.exported {
                let operator = self
                    .validator_codec
                    .string_to_bytes(&validator.operator_address)?;
                self.emit(
                    ctx,
                    StakingEvent::AfterValidatorCreated {
                        validator: operator,
                    },
                )
                .await?;
            }
        }

        let account_codec = self.account_keeper.address_codec();
        for delegation in &state.delegations {
            let delegator = account_codec.string_to_bytes(&delegation.delegator_address)?;
            let validator = self
                .validator_codec
                .string_to_bytes(&delegation.validator_address)?;

            if !state.exported {
                self.emit(
                    ctx,
                    StakingEvent::BeforeDelegationCreated {
                        delegator: delegator.clone(),
                        validator: validator.clone(),
                    },
                )
                .await?;
            }

            self.set_delegation(delegation)?;

            if !state.exported {
                self.emit(
                    ctx,
                    StakingEvent::AfterDelegationModified {
                        delegator,
                        validator,
                    },
                )
                .await?;
            }
        }

        let updates = if state.exported {
            let mut updates = Vec::with_capacity(state.last_validator_powers.len());
            for last in &state.last_validator_powers {
                let operator = self.validator_codec.string_to_bytes(&last.address)?;
                self.set_last_validator_power(&operator, last.power)?;
                let validator = self
                    .validator(&operator)?
                    .ok_or_else(|| KeeperError::ValidatorNotFound(last.address.clone()))?;
                updates.push(ValidatorUpdate {
                    pub_key: validator.consensus_pubkey,
                    power: last.power,
                });
            }
            updates
        } else {
            self.apply_validator_set_updates(ctx).await?
        };

        tracing::info!(
            validators = state.validators.len(),
            delegations = state.delegations.len(),
            exported = state.exported,
            updates = updates.len(),
            "initialized staking genesis"
        );
        Ok(updates)
    }

    /// Snapshot the store as an exported genesis state.
    pub fn export_genesis(&self) -> Result<GenesisState, KeeperError> {
        let last_validator_powers = self
            .last_validator_powers()?
            .into_iter()
            .map(|(address, power)| {
                Ok(LastValidatorPower {
                    address: self.validator_codec.bytes_to_string(&address)?,
                    power,
                })
            })
            .collect::<Result<Vec<_>, KeeperError>>()?;

        Ok(GenesisState {
            params: self.params()?,
            last_total_power: self.last_total_power()?,
            last_validator_powers,
            validators: self.validators()?,
            delegations: self.delegations()?,
            exported: true,
        })
    }
}

/// Check a genesis state without touching the store.
pub fn validate_genesis(state: &GenesisState) -> Result<(), String> {
    state.params.validate()?;

    let mut operators = HashSet::with_capacity(state.validators.len());
    let mut consensus_keys = HashSet::with_capacity(state.validators.len());
    for validator in &state.validators {
        if validator.operator_address.is_empty() {
            return Err("validator with empty operator address".to_string());
        }
        if !operators.insert(validator.operator_address.as_str()) {
            return Err(format!(
                "duplicate validator in genesis state: {}",
                validator.operator_address
            ));
        }
        if !consensus_keys.insert(validator.consensus_pubkey.as_slice()) {
            return Err(format!(
                "duplicate consensus key in genesis state: {}",
                validator.operator_address
            ));
        }
        if validator.jailed && validator.status == super::BondStatus::Bonded {
            return Err(format!(
                "validator is bonded and jailed in genesis state: {}",
                validator.operator_address
            ));
        }
        if validator.delegator_shares == 0 && validator.tokens > 0 {
            return Err(format!(
                "validator with tokens cannot have zero delegator shares: {}",
                validator.operator_address
            ));
        }
    }

    for delegation in &state.delegations {
        if !operators.contains(delegation.validator_address.as_str()) {
            return Err(format!(
                "delegation from {} to unknown validator {}",
                delegation.delegator_address, delegation.validator_address
            ));
        }
    }

    Ok(())
}
