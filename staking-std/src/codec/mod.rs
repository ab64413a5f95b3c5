//! Address codecs.

mod bech32;

pub use self::bech32::Bech32Codec;
