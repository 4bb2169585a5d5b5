//! PlantId - 12-byte, creation-ordered document identifier.
//!
//! Layout: 4-byte big-endian unix seconds, 5 bytes of per-generator random
//! data, 3-byte big-endian counter. Rendered as 24 lowercase hex characters.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::StoreError;

/// Opaque unique identifier assigned by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlantId([u8; 12]);

impl PlantId {
    pub const LEN: usize = 12;

    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }

    /// Seconds component, as a timestamp.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let secs = u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]]);
        DateTime::from_timestamp(i64::from(secs), 0)
    }

    /// Parse a client-supplied identifier.
    ///
    /// Anything other than 24 hex characters is a cast failure, which callers
    /// surface as a store error rather than a missing record.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let cast_failed = || StoreError::InvalidId(raw.to_string());

        if raw.len() != Self::LEN * 2 || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(cast_failed());
        }

        let mut bytes = [0u8; 12];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = &raw[i * 2..i * 2 + 2];
            *byte = u8::from_str_radix(pair, 16).map_err(|_| cast_failed())?;
        }
        Ok(Self(bytes))
    }

    /// Decode a raw storage key.
    pub fn from_key(key: &[u8]) -> Result<Self, StoreError> {
        let bytes: [u8; 12] = key
            .try_into()
            .map_err(|_| StoreError::Storage(format!("invalid key length {}", key.len())))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for PlantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for PlantId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for PlantId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PlantId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        PlantId::parse(&raw).map_err(de::Error::custom)
    }
}

/// Hands out fresh ids. Each store owns one.
pub struct IdGenerator {
    process: [u8; 5],
    counter: AtomicU32,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            process: rand::random(),
            counter: AtomicU32::new(rand::random::<u32>() & 0x00ff_ffff),
        }
    }

    pub fn next_id(&self) -> PlantId {
        self.next_id_at(Utc::now())
    }

    pub fn next_id_at(&self, now: DateTime<Utc>) -> PlantId {
        let secs = u32::try_from(now.timestamp().max(0)).unwrap_or(u32::MAX);
        let count = self.counter.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&self.process);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        PlantId(bytes)
    }
}
