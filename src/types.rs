//! Core types: Address, TokenId, Amount, Tick.

use std::fmt;

/// On-ledger identity. Callers, the fund owner, the fund itself, and external
/// asset contracts all live in one address space, mirroring the chain this
/// design targets.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct Address(pub u64);

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x}", self.0)
    }
}

/// Token units, account claims, prices: all non-negative integers.
pub type Amount = u64;

/// Monotonic block counter. The fee and rebalance clocks both read it.
pub type Tick = u64;

/// Whitelisted token identifier.
///
/// Stored inline as up to 8 ASCII bytes, zero-padded, so it is `Copy` and can
/// key maps without allocation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId([u8; 8]);

impl TokenId {
    pub const MAX_LEN: usize = 8;

    /// Construct from a literal identifier.
    ///
    /// Panics if `s` is empty or longer than 8 bytes; use [`TokenId::try_new`]
    /// for external input.
    pub fn new(s: &str) -> Self {
        match Self::try_new(s) {
            Some(id) => id,
            None => panic!("token id must be 1..=8 bytes, got {s:?}"),
        }
    }

    /// Fallible construction from external input.
    pub fn try_new(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.is_empty() || bytes.len() > Self::MAX_LEN || bytes.contains(&0) {
            return None;
        }
        let mut buf = [0u8; Self::MAX_LEN];
        buf[..bytes.len()].copy_from_slice(bytes);
        Some(TokenId(buf))
    }

    pub fn as_str(&self) -> &str {
        let len = self.0.iter().position(|&b| b == 0).unwrap_or(Self::MAX_LEN);
        std::str::from_utf8(&self.0[..len]).unwrap_or("?")
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenId({:?})", self.as_str())
    }
}

impl serde::Serialize for TokenId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for TokenId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        TokenId::try_new(&s).ok_or_else(|| {
            serde::de::Error::custom(format!("token id must be 1..=8 bytes, got {s:?}"))
        })
    }
}
