//! MongoDB ObjectId.
//!
//! 12 bytes: 4-byte big-endian creation time (seconds), 5-byte process
//! identifier, 3-byte counter. Textual form is exactly 24 hex characters.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when a string is not a 24-character hex ObjectId.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("input must be a 24 character hex string, got {0:?}")]
pub struct ObjectIdParseError(pub String);

/// A 12-byte MongoDB ObjectId.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// Parse from 24 hex characters (either case).
    pub fn parse_str(s: &str) -> Result<Self, ObjectIdParseError> {
        let raw = s.as_bytes();
        if raw.len() != 24 {
            return Err(ObjectIdParseError(s.to_string()));
        }
        let mut bytes = [0u8; 12];
        for (i, pair) in raw.chunks_exact(2).enumerate() {
            match (hex_nibble(pair[0]), hex_nibble(pair[1])) {
                (Some(hi), Some(lo)) => bytes[i] = (hi << 4) | lo,
                _ => return Err(ObjectIdParseError(s.to_string())),
            }
        }
        Ok(Self(bytes))
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Creation time in seconds since the Unix epoch.
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Lower-case 24-character hex form.
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(24);
        for b in self.0 {
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0f) as usize] as char);
        }
        out
    }
}

const HEX: &[u8; 16] = b"0123456789abcdef";

fn hex_nibble(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
