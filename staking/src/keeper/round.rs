use super::{BondStatus, HistoricalInfo, Keeper, KeeperError, keys, write_json};
use staking_core::{
    Address, AddressCodec, BlockContext, StakingEvent, ValidatorUpdate, consensus_address,
};
use std::collections::BTreeSet;

impl Keeper {
    /// Record a historical marker for this round and prune old ones.
    pub fn begin_blocker(&self, ctx: &BlockContext) -> Result<(), KeeperError> {
        let params = self.params()?;
        let retain = u64::from(params.historical_entries);

        // Markers at heights <= height - retain fall out of the window.
        for (key, _) in self.store.prefix_scan(&[keys::HISTORICAL_INFO_PREFIX]) {
            let Some(height) = keys::historical_info_height(&key) else {
                continue;
            };
            if height.saturating_add(retain) > ctx.height {
                break;
            }
            self.store.delete(&key);
        }

        if retain == 0 {
            return Ok(());
        }

        let validator_set = self
            .validators()?
            .into_iter()
            .filter(|validator| validator.status == BondStatus::Bonded)
            .map(|validator| validator.operator_address)
            .collect();
        write_json(
            &*self.store,
            &keys::historical_info_key(ctx.height),
            &HistoricalInfo {
                height: ctx.height,
                time_unix_secs: ctx.time_unix_secs,
                validator_set,
            },
        )
    }

    /// Stored historical marker for `height`.
    pub fn historical_info(&self, height: u64) -> Result<Option<HistoricalInfo>, KeeperError> {
        super::read_json(&*self.store, &keys::historical_info_key(height))
    }

    /// Compute validator-set changes for the consensus engine.
    pub async fn end_blocker(&self, ctx: &BlockContext) -> Result<Vec<ValidatorUpdate>, KeeperError> {
        self.apply_validator_set_updates(ctx).await
    }

    /// Rank validators by power, bond the top `max_validators` and unbond
    /// the ones that dropped out. Returns only changed powers.
    pub(crate) async fn apply_validator_set_updates(
        &self,
        ctx: &BlockContext,
    ) -> Result<Vec<ValidatorUpdate>, KeeperError> {
        let params = self.params()?;
        let last: Vec<(Address, i64)> = self.last_validator_powers()?;

        let mut candidates: Vec<_> = self
            .validators()?
            .into_iter()
            .filter(|validator| !validator.jailed && validator.potential_power() > 0)
            .collect();
        candidates.sort_by(|a, b| {
            b.potential_power()
                .cmp(&a.potential_power())
                .then_with(|| a.operator_address.cmp(&b.operator_address))
        });
        candidates.truncate(usize::try_from(params.max_validators).unwrap_or(usize::MAX));

        let mut updates = Vec::new();
        let mut bonded = BTreeSet::new();
        let mut total_power = 0i64;

        for mut validator in candidates {
            let operator = self
                .validator_codec
                .string_to_bytes(&validator.operator_address)?;
            let power = validator.potential_power();

            if validator.status != BondStatus::Bonded {
                validator.status = BondStatus::Bonded;
                self.set_validator(&validator)?;
                self.emit(
                    ctx,
                    StakingEvent::AfterValidatorBonded {
                        consensus: consensus_address(&validator.consensus_pubkey),
                        validator: operator.clone(),
                    },
                )
                .await?;
            }

            let previous = last
                .iter()
                .find(|(address, _)| *address == operator)
                .map(|(_, power)| *power);
            if previous != Some(power) {
                self.set_last_validator_power(&operator, power)?;
                updates.push(ValidatorUpdate {
                    pub_key: validator.consensus_pubkey.clone(),
                    power,
                });
            }

            total_power = total_power.saturating_add(power);
            bonded.insert(operator);
        }

        for (operator, _) in last {
            if bonded.contains(&operator) {
                continue;
            }
            let mut validator = self.validator(&operator)?.ok_or_else(|| {
                KeeperError::ValidatorNotFound(
                    self.validator_codec
                        .bytes_to_string(&operator)
                        .unwrap_or_else(|_| format!("{operator:?}")),
                )
            })?;

            if validator.status == BondStatus::Bonded {
                validator.status = BondStatus::Unbonding;
                self.set_validator(&validator)?;
                self.emit(
                    ctx,
                    StakingEvent::AfterValidatorBeginUnbonding {
                        consensus: consensus_address(&validator.consensus_pubkey),
                        validator: operator.clone(),
                    },
                )
                .await?;
            }

            self.delete_last_validator_power(&operator)?;
            updates.push(ValidatorUpdate {
                pub_key: validator.consensus_pubkey,
                power: 0,
            });
        }

        self.set_last_total_power(total_power);

        if !updates.is_empty() {
            tracing::debug!(
                height = ctx.height,
                updates = updates.len(),
                total_power,
                "validator set changed"
            );
        }
        Ok(updates)
    }
}

#[cfg(test)]
mod tests {
    use crate::keeper::{BondStatus, Params, Validator, tests::test_keeper};
    use staking_core::{Address, AddressCodec, BlockContext};
    use staking_std::{
        MemStore, MultiStakingHooks, NamedHooks,
        testing::{CallLog, RecordingHooks},
    };
    use std::sync::Arc;

    fn validator(keeper: &crate::keeper::Keeper, byte: u8, tokens: u64) -> Validator {
        Validator {
            operator_address: keeper
                .validator_address_codec()
                .bytes_to_string(&Address::new(vec![byte; 20]))
                .unwrap(),
            consensus_pubkey: vec![byte; 32],
            status: BondStatus::Unbonded,
            tokens,
            delegator_shares: tokens,
            jailed: false,
        }
    }

    #[tokio::test]
    async fn end_blocker_bonds_top_validators_and_unbonds_the_rest() {
        let keeper = test_keeper(Arc::new(MemStore::new()));
        let log = CallLog::new();
        keeper
            .set_hooks(MultiStakingHooks::new(vec![NamedHooks::new(
                "rec",
                Arc::new(RecordingHooks::new("rec", log.clone())),
            )]))
            .unwrap();
        keeper
            .set_params(&Params {
                max_validators: 1,
                ..Params::default()
            })
            .unwrap();

        keeper.set_validator(&validator(&keeper, 1, 3_000_000)).unwrap();
        let updates = keeper.end_blocker(&BlockContext::new(1, 0)).await.unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].power, 3);
        assert_eq!(log.event_names(), vec!["after_validator_bonded"]);

        // Nothing changed, nothing to report.
        assert!(keeper.end_blocker(&BlockContext::new(2, 0)).await.unwrap().is_empty());

        log.clear();
        keeper.set_validator(&validator(&keeper, 2, 8_000_000)).unwrap();
        let updates = keeper.end_blocker(&BlockContext::new(3, 0)).await.unwrap();
        assert_eq!(
            updates.iter().map(|u| u.power).collect::<Vec<_>>(),
            vec![8, 0]
        );
        assert_eq!(
            log.event_names(),
            vec!["after_validator_bonded", "after_validator_begin_unbonding"]
        );
        assert_eq!(keeper.last_total_power().unwrap(), 8);
    }

    #[test]
    fn begin_blocker_keeps_a_window_of_markers() {
        let keeper = test_keeper(Arc::new(MemStore::new()));
        keeper
            .set_params(&Params {
                historical_entries: 2,
                ..Params::default()
            })
            .unwrap();

        for height in 1..=4 {
            keeper.begin_blocker(&BlockContext::new(height, height * 5)).unwrap();
        }

        assert!(keeper.historical_info(2).unwrap().is_none());
        assert!(keeper.historical_info(3).unwrap().is_some());
        assert_eq!(keeper.historical_info(4).unwrap().unwrap().time_unix_secs, 20);
    }

    #[test]
    fn zero_entries_stores_nothing() {
        let keeper = test_keeper(Arc::new(MemStore::new()));
        keeper
            .set_params(&Params {
                historical_entries: 0,
                ..Params::default()
            })
            .unwrap();
        keeper.begin_blocker(&BlockContext::new(5, 0)).unwrap();
        assert!(keeper.historical_info(5).unwrap().is_none());
    }
}
