//! Validator and consensus address codec resolution.
//!
//! Other modules that convert validator or consensus addresses between
//! strings and bytes obtain their codecs from here, so the whole application
//! agrees on one pair.

use crate::config::{AuthConfig, ModuleConfig};
use staking_core::{ConfigurationError, ConsensusAddressCodec, ValidatorAddressCodec};
use staking_std::Bech32Codec;
use std::{fmt, sync::Arc};

/// Suffix appended to the auth prefix for validator operator addresses.
pub const VALIDATOR_PREFIX_SUFFIX: &str = "valoper";

/// Suffix appended to the auth prefix for validator consensus addresses.
pub const CONSENSUS_PREFIX_SUFFIX: &str = "valcons";

/// Explicit factory for the validator codec.
pub type ValidatorCodecFactory = Arc<dyn Fn() -> ValidatorAddressCodec + Send + Sync>;

/// Explicit factory for the consensus codec.
pub type ConsensusCodecFactory = Arc<dyn Fn() -> ConsensusAddressCodec + Send + Sync>;

/// Where a resolved codec came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecSource {
    /// Built by an explicitly supplied factory.
    Factory,
    /// Built from a configured prefix.
    Configured,
    /// Built from a prefix derived from the auth prefix.
    Derived,
}

/// The resolved validator/consensus codec pair.
#[derive(Clone, Debug)]
pub struct CodecPair {
    /// Validator operator address codec.
    pub validator: ValidatorAddressCodec,
    /// Validator consensus address codec.
    pub consensus: ConsensusAddressCodec,
    /// Provenance of [`Self::validator`].
    pub validator_source: CodecSource,
    /// Provenance of [`Self::consensus`].
    pub consensus_source: CodecSource,
}

/// Inputs for [`provide_address_codec`].
///
/// The factories are explicit optionals: supply both or neither.
pub struct AddressCodecInputs<'a> {
    /// Staking configuration.
    pub config: &'a ModuleConfig,
    /// Auth configuration carrying the host base prefix.
    pub auth_config: &'a AuthConfig,
    /// Optional validator codec factory.
    pub validator_codec_factory: Option<ValidatorCodecFactory>,
    /// Optional consensus codec factory.
    pub consensus_codec_factory: Option<ConsensusCodecFactory>,
}

impl fmt::Debug for AddressCodecInputs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressCodecInputs")
            .field("config", &self.config)
            .field("auth_config", &self.auth_config)
            .field("validator_codec_factory", &self.validator_codec_factory.is_some())
            .field("consensus_codec_factory", &self.consensus_codec_factory.is_some())
            .finish()
    }
}

/// Resolve the codec pair from configuration and optional factories.
pub fn provide_address_codec(
    inputs: AddressCodecInputs<'_>,
) -> Result<CodecPair, ConfigurationError> {
    resolve_codecs(
        inputs.validator_codec_factory.as_ref(),
        inputs.consensus_codec_factory.as_ref(),
        &inputs.auth_config.bech32_prefix,
        &inputs.config.bech32_prefix_validator,
        &inputs.config.bech32_prefix_consensus,
    )
}

/// Resolve the codec pair.
///
/// 1. Both factories present: their codecs win, prefixes are ignored.
/// 2. Exactly one present: [`ConfigurationError::IncompletePair`].
/// 3. Otherwise an empty configured prefix is derived from `host_base_prefix`
///    by appending [`VALIDATOR_PREFIX_SUFFIX`] / [`CONSENSUS_PREFIX_SUFFIX`].
/// 4. A prefix still empty after derivation is
///    [`ConfigurationError::MissingPrefix`].
pub fn resolve_codecs(
    validator_factory: Option<&ValidatorCodecFactory>,
    consensus_factory: Option<&ConsensusCodecFactory>,
    host_base_prefix: &str,
    validator_prefix: &str,
    consensus_prefix: &str,
) -> Result<CodecPair, ConfigurationError> {
    match (validator_factory, consensus_factory) {
        (Some(validator), Some(consensus)) => {
            tracing::debug!("using explicit validator and consensus address codec factories");
            return Ok(CodecPair {
                validator: validator(),
                consensus: consensus(),
                validator_source: CodecSource::Factory,
                consensus_source: CodecSource::Factory,
            });
        }
        (Some(_), None) | (None, Some(_)) => return Err(ConfigurationError::IncompletePair),
        (None, None) => {}
    }

    let (validator_prefix, validator_source) =
        final_prefix(validator_prefix, host_base_prefix, VALIDATOR_PREFIX_SUFFIX);
    let (consensus_prefix, consensus_source) =
        final_prefix(consensus_prefix, host_base_prefix, CONSENSUS_PREFIX_SUFFIX);

    if validator_prefix.is_empty() || consensus_prefix.is_empty() {
        return Err(ConfigurationError::MissingPrefix {
            validator: validator_prefix,
            consensus: consensus_prefix,
        });
    }

    let validator = ValidatorAddressCodec::new(bech32_codec(&validator_prefix)?);
    let consensus = ConsensusAddressCodec::new(bech32_codec(&consensus_prefix)?);

    tracing::info!(
        validator_prefix = %validator_prefix,
        consensus_prefix = %consensus_prefix,
        ?validator_source,
        ?consensus_source,
        "resolved staking address codecs"
    );

    Ok(CodecPair {
        validator,
        consensus,
        validator_source,
        consensus_source,
    })
}

fn final_prefix(configured: &str, base: &str, suffix: &str) -> (String, CodecSource) {
    if configured.is_empty() && !base.is_empty() {
        (format!("{base}{suffix}"), CodecSource::Derived)
    } else {
        (configured.to_string(), CodecSource::Configured)
    }
}

fn bech32_codec(prefix: &str) -> Result<Bech32Codec, ConfigurationError> {
    Bech32Codec::new(prefix).map_err(|err| ConfigurationError::InvalidPrefix {
        prefix: prefix.to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use staking_core::{Address, AddressCodec};

    fn validator_factory(prefix: &'static str) -> ValidatorCodecFactory {
        Arc::new(move || ValidatorAddressCodec::new(Bech32Codec::new(prefix).unwrap()))
    }

    fn consensus_factory(prefix: &'static str) -> ConsensusCodecFactory {
        Arc::new(move || ConsensusAddressCodec::new(Bech32Codec::new(prefix).unwrap()))
    }

    #[test]
    fn derives_prefixes_from_host_base() {
        let pair = resolve_codecs(None, None, "cosmos", "", "").unwrap();
        assert_eq!(pair.validator.prefix(), Some("cosmosvaloper"));
        assert_eq!(pair.consensus.prefix(), Some("cosmosvalcons"));
        assert_eq!(pair.validator_source, CodecSource::Derived);
        assert_eq!(pair.consensus_source, CodecSource::Derived);
    }

    #[test]
    fn configured_prefix_wins_over_derivation() {
        let pair = resolve_codecs(None, None, "cosmos", "custvaloper", "").unwrap();
        assert_eq!(pair.validator.prefix(), Some("custvaloper"));
        assert_eq!(pair.validator_source, CodecSource::Configured);
        assert_eq!(pair.consensus.prefix(), Some("cosmosvalcons"));
        assert_eq!(pair.consensus_source, CodecSource::Derived);
    }

    #[test]
    fn configured_prefixes_without_base() {
        let pair = resolve_codecs(None, None, "", "xvaloper", "xvalcons").unwrap();
        assert_eq!(pair.validator.prefix(), Some("xvaloper"));
        assert_eq!(pair.consensus.prefix(), Some("xvalcons"));
    }

    #[test]
    fn missing_prefixes_fail() {
        assert_eq!(
            resolve_codecs(None, None, "", "", "").unwrap_err(),
            ConfigurationError::MissingPrefix {
                validator: String::new(),
                consensus: String::new(),
            }
        );
        assert!(matches!(
            resolve_codecs(None, None, "", "xvaloper", ""),
            Err(ConfigurationError::MissingPrefix { .. })
        ));
    }

    #[test]
    fn both_factories_ignore_prefixes() {
        let validator = validator_factory("facval");
        let consensus = consensus_factory("faccons");

        for (base, val, cons) in [("", "", ""), ("cosmos", "a", "b")] {
            let pair = resolve_codecs(Some(&validator), Some(&consensus), base, val, cons).unwrap();
            assert_eq!(pair.validator.prefix(), Some("facval"));
            assert_eq!(pair.consensus.prefix(), Some("faccons"));
            assert_eq!(pair.validator_source, CodecSource::Factory);
            assert_eq!(pair.consensus_source, CodecSource::Factory);
        }
    }

    #[test]
    fn single_factory_is_an_incomplete_pair() {
        let validator = validator_factory("facval");
        let consensus = consensus_factory("faccons");

        assert_eq!(
            resolve_codecs(Some(&validator), None, "cosmos", "", "").unwrap_err(),
            ConfigurationError::IncompletePair
        );
        assert_eq!(
            resolve_codecs(None, Some(&consensus), "cosmos", "x", "y").unwrap_err(),
            ConfigurationError::IncompletePair
        );
    }

    #[test]
    fn unusable_prefix_is_rejected() {
        assert!(matches!(
            resolve_codecs(None, None, "", "bad prefix", "ok"),
            Err(ConfigurationError::InvalidPrefix { .. })
        ));
    }

    #[test]
    fn provide_reads_configuration() {
        let config = ModuleConfig::default();
        let auth_config = AuthConfig {
            bech32_prefix: "osmo".into(),
        };
        let pair = provide_address_codec(AddressCodecInputs {
            config: &config,
            auth_config: &auth_config,
            validator_codec_factory: None,
            consensus_codec_factory: None,
        })
        .unwrap();

        let text = pair
            .validator
            .bytes_to_string(&Address::new(vec![3; 20]))
            .unwrap();
        assert!(text.starts_with("osmovaloper1"));
    }
}
