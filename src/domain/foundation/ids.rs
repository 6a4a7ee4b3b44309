//! Strongly-typed identifier value objects.

use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use uuid::Uuid;

use super::{Timestamp, ValidationError};

/// Length of a comment identifier in bytes.
const ID_LEN: usize = 12;

/// Random bytes identifying this process, fixed for its lifetime.
static PROCESS_UNIQUE: Lazy<[u8; 5]> = Lazy::new(|| {
    let entropy = Uuid::new_v4();
    let mut bytes = [0u8; 5];
    bytes.copy_from_slice(&entropy.as_bytes()[..5]);
    bytes
});

/// Per-process counter, seeded randomly so restarts within the same second
/// do not replay the same sequence.
static COUNTER: Lazy<AtomicU32> = Lazy::new(|| {
    let entropy = Uuid::new_v4();
    let b = entropy.as_bytes();
    AtomicU32::new(u32::from_be_bytes([0, b[0], b[1], b[2]]))
});

/// Unique identifier for a comment.
///
/// Twelve bytes laid out as a 4-byte big-endian Unix timestamp, 5 bytes
/// unique to the generating process, and a 3-byte big-endian counter.
/// Rendered as 24 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommentId([u8; ID_LEN]);

impl CommentId {
    /// Generates a fresh identifier stamped with the current time.
    pub fn new() -> Self {
        Self::generate_at(Timestamp::now())
    }

    /// Generates a fresh identifier stamped with the given time.
    pub fn generate_at(at: Timestamp) -> Self {
        // The counter wraps within 24 bits.
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00FF_FFFF;
        let secs = at.as_unix_secs() as u32;

        let mut bytes = [0u8; ID_LEN];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Creates a CommentId from raw bytes.
    pub fn from_bytes(bytes: [u8; ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }

    /// Returns the canonical 24-character hex form.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for CommentId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ID_LEN * 2 || !s.is_ascii() {
            return Err(ValidationError::invalid_format(
                "id",
                format!("expected {} hex characters", ID_LEN * 2),
            ));
        }

        let mut bytes = [0u8; ID_LEN];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16)
                .map_err(|e| ValidationError::invalid_format("id", e.to_string()))?;
        }
        Ok(Self(bytes))
    }
}
