mod hashers;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Debug, Display, Formatter};
use std::str::{self, FromStr};

pub use hashers::*;

pub const HASH_SIZE: usize = 32;

/// A 32-byte digest kept in internal (wire) byte order.
///
/// Transaction ids are conventionally displayed byte-reversed, so [`Display`] and
/// [`FromStr`] work on the reversed hex form while [`Hash::as_bytes`] exposes the
/// bytes as they appear on the wire.
#[derive(PartialEq, Eq, Clone, Copy, Hash, Default, PartialOrd, Ord)]
pub struct Hash([u8; HASH_SIZE]);

impl Hash {
    #[inline(always)]
    pub const fn from_bytes(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }

    #[inline(always)]
    pub const fn as_bytes(&self) -> [u8; HASH_SIZE] {
        self.0
    }

    #[inline(always)]
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        Some(Self(<[u8; HASH_SIZE]>::try_from(bytes).ok()?))
    }

    /// Bytes in display order (reversed wire order).
    pub fn to_display_bytes(&self) -> [u8; HASH_SIZE] {
        let mut bytes = self.0;
        bytes.reverse();
        bytes
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut hex = [0u8; HASH_SIZE * 2];
        let hex = faster_hex::hex_encode(&self.to_display_bytes(), &mut hex).map_err(|_| std::fmt::Error)?;
        f.write_str(hex)
    }
}

impl Debug for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl FromStr for Hash {
    type Err = faster_hex::Error;

    fn from_str(hash_str: &str) -> Result<Self, Self::Err> {
        if hash_str.len() != HASH_SIZE * 2 {
            return Err(faster_hex::Error::InvalidLength(hash_str.len()));
        }
        let mut bytes = [0u8; HASH_SIZE];
        faster_hex::hex_decode(hash_str.as_bytes(), &mut bytes)?;
        bytes.reverse();
        Ok(Hash(bytes))
    }
}

impl From<[u8; HASH_SIZE]> for Hash {
    fn from(value: [u8; HASH_SIZE]) -> Self {
        Hash(value)
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Hash::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::Hash;
    use std::str::FromStr;

    #[test]
    fn test_hash_basics() {
        let hash_str = "8e40af02265360d59f4ecf9ae9ebf8f00a3118408f5a9cdcbcc9c0f93642f3af";
        let hash = Hash::from_str(hash_str).unwrap();
        assert_eq!(hash_str, hash.to_string());
        assert_eq!(hash.as_bytes()[0], 0xaf);
        assert_eq!(hash.to_display_bytes()[0], 0x8e);
        let hash2 = Hash::from_str(hash_str).unwrap();
        assert_eq!(hash, hash2);

        let hash3 = Hash::from_str("8e40af02265360d59f4ecf9ae9ebf8f00a3118408f5a9cdcbcc9c0f93642f3ab").unwrap();
        assert_ne!(hash2, hash3);

        let odd_str = "8e40af02265360d59f4ecf9ae9ebf8f00a3118408f5a9cdcbcc9c0f93642f3a";
        let short_str = "8e40af02265360d59f4ecf9ae9ebf8f00a3118408f5a9cdcbcc9c0f93642f3";
        assert!(Hash::from_str(odd_str).is_err());
        assert!(Hash::from_str(short_str).is_err());
        assert!(Hash::from_str("zz40af02265360d59f4ecf9ae9ebf8f00a3118408f5a9cdcbcc9c0f93642f3af").is_err());
    }

    #[test]
    fn test_hash_serde() {
        let hash = Hash::from_bytes([7u8; 32]);
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", "07".repeat(32)));
        assert_eq!(serde_json::from_str::<Hash>(&json).unwrap(), hash);
    }
}
