//! Raw addresses and the codecs that render them as strings.

use crate::error::CodecError;
use sha2::{Digest, Sha256};
use std::{fmt, sync::Arc};

/// Byte length of module and consensus addresses.
pub const ADDRESS_LEN: usize = 20;

/// Longest address a codec will accept.
pub const MAX_ADDRESS_LEN: usize = 255;

/// A raw account, validator or consensus address.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address(Vec<u8>);

impl Address {
    /// Wrap raw address bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of address bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the address has no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

impl From<Vec<u8>> for Address {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Address {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Deterministic address of a module account.
///
/// The address is the first [`ADDRESS_LEN`] bytes of `sha256(name)`, so the
/// same name always yields the same address.
pub fn module_address(name: &str) -> Address {
    truncated_hash(name.as_bytes())
}

/// Consensus address of a validator public key.
pub fn consensus_address(pub_key: &[u8]) -> Address {
    truncated_hash(pub_key)
}

fn truncated_hash(input: &[u8]) -> Address {
    let digest = Sha256::digest(input);
    Address(digest[..ADDRESS_LEN].to_vec())
}

/// Reject addresses a codec must never produce or accept.
pub fn verify_address_format(bytes: &[u8]) -> Result<(), CodecError> {
    if bytes.is_empty() {
        return Err(CodecError::Empty);
    }
    if bytes.len() > MAX_ADDRESS_LEN {
        return Err(CodecError::InvalidLength(bytes.len()));
    }
    Ok(())
}

/// Bidirectional mapping between an address string and raw address bytes.
pub trait AddressCodec: Send + Sync + fmt::Debug {
    /// Decode a human-readable address.
    fn string_to_bytes(&self, text: &str) -> Result<Address, CodecError>;

    /// Encode raw address bytes.
    fn bytes_to_string(&self, address: &Address) -> Result<String, CodecError>;

    /// The prefix this codec encodes with, when it has one.
    fn prefix(&self) -> Option<&str> {
        None
    }
}

macro_rules! role_codec {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name(Arc<dyn AddressCodec>);

        impl $name {
            /// Wrap a codec for this address role.
            pub fn new(codec: impl AddressCodec + 'static) -> Self {
                Self(Arc::new(codec))
            }
        }

        impl AddressCodec for $name {
            fn string_to_bytes(&self, text: &str) -> Result<Address, CodecError> {
                self.0.string_to_bytes(text)
            }

            fn bytes_to_string(&self, address: &Address) -> Result<String, CodecError> {
                self.0.bytes_to_string(address)
            }

            fn prefix(&self) -> Option<&str> {
                self.0.prefix()
            }
        }
    };
}

role_codec!(
    /// Codec for validator operator addresses.
    ValidatorAddressCodec
);

role_codec!(
    /// Codec for validator consensus addresses.
    ConsensusAddressCodec
);
