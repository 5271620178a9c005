//! Error types for XDR operations.

use std::fmt;

/// Result type for XDR operations.
pub type XdrResult<T> = Result<T, XdrError>;

/// Errors that can occur during XDR encoding/decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XdrError {
    /// Attempted to read past the end of the buffer.
    UnexpectedEof {
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// A length does not fit the 31-bit non-negative count used on the wire.
    LengthOverflow {
        /// The offending length.
        length: usize,
    },

    /// A name or text field is not valid UTF-8.
    InvalidUtf8 {
        /// Byte offset where the string starts.
        position: usize,
    },

    /// Attempted to move the cursor outside the buffer.
    SeekOutOfBounds {
        /// The requested position.
        position: usize,
        /// Buffer length.
        len: usize,
    },
}

impl fmt::Display for XdrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof {
                requested,
                available,
            } => {
                write!(
                    f,
                    "attempted to read {requested} bytes but only {available} bytes available"
                )
            }
            Self::LengthOverflow { length } => {
                write!(f, "length {length} exceeds the 31-bit wire limit")
            }
            Self::InvalidUtf8 { position } => {
                write!(f, "invalid utf-8 in string at byte {position}")
            }
            Self::SeekOutOfBounds { position, len } => {
                write!(f, "seek to {position} is outside a {len}-byte buffer")
            }
        }
    }
}

impl std::error::Error for XdrError {}
