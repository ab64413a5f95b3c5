//! Key-value store handle and key layout helpers.

use crate::error::CodecError;

/// A key-value store owned by one module.
pub trait KvStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &[u8], value: &[u8]);

    /// Remove a value. Removing a missing key is a no-op.
    fn delete(&self, key: &[u8]);

    /// All entries whose key starts with `prefix`, in ascending key order.
    fn prefix_scan(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)>;

    /// Whether a value exists.
    fn has(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }
}

/// Prepend a one-byte length to `bytes`.
///
/// Segments longer than 255 bytes cannot be framed and are rejected.
pub fn length_prefixed(bytes: &[u8]) -> Result<Vec<u8>, CodecError> {
    let len = u8::try_from(bytes.len()).map_err(|_| CodecError::InvalidLength(bytes.len()))?;
    let mut out = Vec::with_capacity(bytes.len() + 1);
    out.push(len);
    out.extend_from_slice(bytes);
    Ok(out)
}

/// Split a length-prefixed segment off the front of `key`.
///
/// Returns the segment and the remainder, or `None` if `key` is too short.
pub fn split_length_prefixed(key: &[u8]) -> Option<(&[u8], &[u8])> {
    let (&len, rest) = key.split_first()?;
    let len = usize::from(len);
    if rest.len() < len {
        return None;
    }
    Some(rest.split_at(len))
}

/// Render a key as lowercase hex for diagnostics.
pub fn key_hex(key: &[u8]) -> String {
    key.iter().map(|byte| format!("{byte:02x}")).collect()
}
