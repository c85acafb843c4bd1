// todo-ledger-core/src/core/identifiers.rs
// ============================================================================
// Module: Todo Identifiers
// Description: Store-assigned object identifiers for todo records.
// Purpose: Provide a validated, serializable identifier with a stable hex form.
// Dependencies: rand, serde, thiserror
// ============================================================================

//! ## Overview
//! Todo identifiers use the 12-byte object-id layout of the document store:
//! a 4-byte big-endian unix timestamp (seconds), 5 random per-generator bytes,
//! and a 3-byte counter. The canonical string form is 24 lowercase hex
//! characters. Identifiers are minted by stores on insert; callers only ever
//! parse them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Number of raw bytes in a todo identifier.
pub const TODO_ID_BYTES: usize = 12;
/// Number of hex characters in the canonical identifier form.
pub const TODO_ID_HEX_LEN: usize = TODO_ID_BYTES * 2;
/// Mask applied to the 3-byte counter segment.
const COUNTER_MASK: u32 = 0x00ff_ffff;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Identifier parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// Identifier has the wrong length.
    #[error("todo id must be {expected} hex characters, got {actual}")]
    Length {
        /// Required length in characters.
        expected: usize,
        /// Observed length in bytes.
        actual: usize,
    },
    /// Identifier contains a character outside `[0-9a-fA-F]`.
    #[error("todo id contains a non-hex character at offset {0}")]
    NonHex(usize),
}

// ============================================================================
// SECTION: Identifier Type
// ============================================================================

/// Store-assigned todo identifier (canonical lowercase hex).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TodoId(String);

impl TodoId {
    /// Parses an identifier from its hex form.
    ///
    /// Upper-case hex is accepted and normalized to lower case.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError`] when the text is not a 24-character hex string.
    pub fn parse(text: &str) -> Result<Self, IdentifierError> {
        if text.len() != TODO_ID_HEX_LEN {
            return Err(IdentifierError::Length {
                expected: TODO_ID_HEX_LEN,
                actual: text.len(),
            });
        }
        if let Some(offset) = text.bytes().position(|byte| !byte.is_ascii_hexdigit()) {
            return Err(IdentifierError::NonHex(offset));
        }
        Ok(Self(text.to_ascii_lowercase()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the creation time (unix seconds) embedded in the identifier.
    #[must_use]
    pub fn timestamp_secs(&self) -> u32 {
        self.0.get(..8).and_then(|prefix| u32::from_str_radix(prefix, 16).ok()).unwrap_or(0)
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TodoId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TodoId {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TodoId> for String {
    fn from(value: TodoId) -> Self {
        value.0
    }
}

// ============================================================================
// SECTION: Generator
// ============================================================================

/// Mints unique todo identifiers for a single store instance.
#[derive(Debug)]
pub struct TodoIdGenerator {
    /// Random bytes distinguishing this generator from others.
    process_bytes: [u8; 5],
    /// Monotonic counter (only the low 24 bits are used).
    counter: AtomicU32,
}

impl Default for TodoIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoIdGenerator {
    /// Creates a generator seeded with random process bytes and counter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            process_bytes: rand::random(),
            counter: AtomicU32::new(rand::random::<u32>() & COUNTER_MASK),
        }
    }

    /// Returns the next identifier.
    pub fn next_id(&self) -> TodoId {
        let count = self.counter.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;
        let mut bytes = [0_u8; TODO_ID_BYTES];
        bytes[..4].copy_from_slice(&unix_seconds().to_be_bytes());
        bytes[4..9].copy_from_slice(&self.process_bytes);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        TodoId(hex_encode(&bytes))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the current unix time in seconds, saturating at `u32::MAX`.
fn unix_seconds() -> u32 {
    let secs = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
    u32::try_from(secs).unwrap_or(u32::MAX)
}

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(char::from(HEX[usize::from(byte >> 4)]));
        out.push(char::from(HEX[usize::from(byte & 0x0f)]));
    }
    out
}
