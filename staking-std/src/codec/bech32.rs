//! Bech32 address codec.

use bech32::{Bech32, Hrp, primitives::decode::CheckedHrpstring};
use staking_core::{Address, AddressCodec, CodecError, verify_address_format};

/// Encodes addresses as bech32 strings with a fixed human-readable prefix.
#[derive(Debug, Clone)]
pub struct Bech32Codec {
    prefix: String,
    hrp: Hrp,
}

impl Bech32Codec {
    /// Create a codec for `prefix`.
    ///
    /// Fails if the prefix is empty or not a valid human-readable part.
    pub fn new(prefix: impl Into<String>) -> Result<Self, CodecError> {
        let prefix = prefix.into();
        let hrp = Hrp::parse(&prefix).map_err(|err| CodecError::InvalidPrefix {
            prefix: prefix.clone(),
            reason: err.to_string(),
        })?;
        Ok(Self { prefix, hrp })
    }
}

impl AddressCodec for Bech32Codec {
    fn string_to_bytes(&self, text: &str) -> Result<Address, CodecError> {
        if text.trim().is_empty() {
            return Err(CodecError::Empty);
        }

        // Only the original bech32 checksum is accepted; bech32m strings fail here.
        let checked =
            CheckedHrpstring::new::<Bech32>(text).map_err(|err| CodecError::Decode {
                input: text.to_string(),
                reason: err.to_string(),
            })?;

        let found = checked.hrp().to_string().to_ascii_lowercase();
        if found != self.prefix.to_ascii_lowercase() {
            return Err(CodecError::WrongPrefix {
                expected: self.prefix.clone(),
                found,
            });
        }

        let data: Vec<u8> = checked.byte_iter().collect();
        verify_address_format(&data)?;
        Ok(Address::new(data))
    }

    fn bytes_to_string(&self, address: &Address) -> Result<String, CodecError> {
        if address.is_empty() {
            return Ok(String::new());
        }
        verify_address_format(address.as_bytes())?;
        bech32::encode::<Bech32>(self.hrp, address.as_bytes())
            .map_err(|err| CodecError::Encode(err.to_string()))
    }

    fn prefix(&self) -> Option<&str> {
        Some(&self.prefix)
    }
}
