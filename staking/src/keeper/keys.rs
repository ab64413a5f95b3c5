//! Store key layout.
//!
//! | prefix | key                                  | value                |
//! |--------|--------------------------------------|----------------------|
//! | `0x11` | `len \| valaddr`                     | last power, BE `i64` |
//! | `0x12` |                                      | total power, BE `i64`|
//! | `0x21` | `len \| valaddr`                     | validator JSON       |
//! | `0x31` | `len \| deladdr \| len \| valaddr`   | delegation JSON      |
//! | `0x50` | BE `u64` height                      | historical JSON      |
//! | `0x51` |                                      | params JSON          |
//! | `0x71` | `len \| valaddr \| len \| deladdr`   | empty                |
//!
//! Before schema version 4 validator and delegation keys carried raw 20-byte
//! addresses without length prefixes.

use staking_core::{Address, CodecError, length_prefixed, split_length_prefixed};

pub(crate) const LAST_VALIDATOR_POWER_PREFIX: u8 = 0x11;
pub(crate) const LAST_TOTAL_POWER_KEY: &[u8] = &[0x12];
pub(crate) const VALIDATORS_PREFIX: u8 = 0x21;
pub(crate) const DELEGATION_PREFIX: u8 = 0x31;
pub(crate) const HISTORICAL_INFO_PREFIX: u8 = 0x50;
pub(crate) const PARAMS_KEY: &[u8] = &[0x51];
pub(crate) const DELEGATIONS_BY_VALIDATOR_PREFIX: u8 = 0x71;

fn prefixed(prefix: u8, parts: &[&[u8]]) -> Result<Vec<u8>, CodecError> {
    let mut key = vec![prefix];
    for part in parts {
        key.extend_from_slice(&length_prefixed(part)?);
    }
    Ok(key)
}

pub(crate) fn validator_key(validator: &[u8]) -> Result<Vec<u8>, CodecError> {
    prefixed(VALIDATORS_PREFIX, &[validator])
}

pub(crate) fn delegation_key(delegator: &[u8], validator: &[u8]) -> Result<Vec<u8>, CodecError> {
    prefixed(DELEGATION_PREFIX, &[delegator, validator])
}

pub(crate) fn delegation_by_validator_key(
    validator: &[u8],
    delegator: &[u8],
) -> Result<Vec<u8>, CodecError> {
    prefixed(DELEGATIONS_BY_VALIDATOR_PREFIX, &[validator, delegator])
}

pub(crate) fn delegations_by_validator_prefix(validator: &[u8]) -> Result<Vec<u8>, CodecError> {
    prefixed(DELEGATIONS_BY_VALIDATOR_PREFIX, &[validator])
}

pub(crate) fn last_validator_power_key(validator: &[u8]) -> Result<Vec<u8>, CodecError> {
    prefixed(LAST_VALIDATOR_POWER_PREFIX, &[validator])
}

pub(crate) fn historical_info_key(height: u64) -> Vec<u8> {
    let mut key = vec![HISTORICAL_INFO_PREFIX];
    key.extend_from_slice(&height.to_be_bytes());
    key
}

/// Height encoded in a historical info key.
pub(crate) fn historical_info_height(key: &[u8]) -> Option<u64> {
    let bytes: [u8; 8] = key.get(1..)?.try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}

/// The single address after the prefix byte.
pub(crate) fn address_from_key(key: &[u8]) -> Option<Address> {
    let (address, rest) = split_length_prefixed(key.get(1..)?)?;
    rest.is_empty().then(|| Address::from(address))
}

/// The two addresses after the prefix byte, in key order.
pub(crate) fn address_pair_from_key(key: &[u8]) -> Option<(Address, Address)> {
    let (first, rest) = split_length_prefixed(key.get(1..)?)?;
    let (second, rest) = split_length_prefixed(rest)?;
    rest.is_empty()
        .then(|| (Address::from(first), Address::from(second)))
}

/// Fixed-width keys written before schema version 4.
pub(crate) mod legacy {
    use staking_core::ADDRESS_LEN;

    #[cfg(test)]
    pub(crate) fn validator_key(validator: &[u8]) -> Vec<u8> {
        [&[super::VALIDATORS_PREFIX][..], validator].concat()
    }

    #[cfg(test)]
    pub(crate) fn delegation_key(delegator: &[u8], validator: &[u8]) -> Vec<u8> {
        [&[super::DELEGATION_PREFIX][..], delegator, validator].concat()
    }

    pub(crate) fn is_validator_key(key: &[u8]) -> bool {
        key.len() == 1 + ADDRESS_LEN
    }

    pub(crate) fn is_delegation_key(key: &[u8]) -> bool {
        key.len() == 1 + 2 * ADDRESS_LEN
    }
}
