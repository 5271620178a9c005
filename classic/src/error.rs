//! Error types for classic container operations.

use std::fmt;

use schema::{NcType, SchemaError};
use xdr::XdrError;

use crate::Format;

/// Result type for decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Result type for encoding.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Errors that can occur while parsing a file or reading its data.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// Low-level read failure (truncation, bad UTF-8, bad seek).
    Xdr(XdrError),

    /// The first three bytes are not `CDF`.
    InvalidMagic { found: [u8; 4] },

    /// The version byte is not 1 or 2.
    UnsupportedVersion { found: u8 },

    /// A list started with a tag other than its own or `ABSENT`.
    UnexpectedTag { list: ListKind, found: u32 },

    /// An `ABSENT` list carried a non-zero count.
    NonZeroAbsentCount { list: ListKind, found: u32 },

    /// `numrecs` is negative and not the streaming marker.
    InvalidNumRecs { found: u32 },

    /// Unknown external type id.
    InvalidType { id: u32 },

    /// A count or length field is negative.
    NegativeCount { list: ListKind, found: u32 },

    /// A variable references a dimension id that does not exist.
    InvalidDimensionId { variable: String, id: u32 },

    /// A variable's data offset is negative.
    InvalidOffset { variable: String, offset: i64 },

    /// A decode limit was exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// The decoded declarations are inconsistent.
    Schema(SchemaError),

    /// Variable data extends past the end of the file.
    DataOutOfBounds {
        variable: String,
        needed: u64,
        available: u64,
    },

    /// No variable with this name.
    UnknownVariable { name: String },

    /// A hyperslab request does not fit the variable.
    InvalidSlab { variable: String, reason: SlabError },
}

/// Header lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Dimension,
    Attribute,
    Variable,
}

/// Specific decode limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    Dimensions,
    Attributes,
    Variables,
    Rank,
    NameLength,
    AttributeLength,
}

/// Reasons a hyperslab request is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlabError {
    /// `start` or `count` does not have one entry per axis.
    RankMismatch { expected: usize, actual: usize },
    /// `start + count` runs past the axis extent.
    OutOfRange {
        axis: usize,
        start: usize,
        count: usize,
        extent: usize,
    },
}

/// Errors that can occur while assembling a file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EncodeError {
    /// Low-level write failure (count does not fit 31 bits).
    Xdr(XdrError),

    /// The schema is inconsistent.
    Schema(SchemaError),

    /// A fixed dimension of length 0 would be read back as unlimited.
    ZeroLengthDimension { name: String },

    /// No variable with this name.
    UnknownVariable { name: String },

    /// Data type differs from the declared type.
    TypeMismatch {
        variable: String,
        expected: NcType,
        found: NcType,
    },

    /// A non-record variable received the wrong number of elements.
    LengthMismatch {
        variable: String,
        expected: usize,
        actual: usize,
    },

    /// A record variable received a partial record.
    PartialRecord {
        variable: String,
        record_len: usize,
        actual: usize,
    },

    /// A data offset does not fit the chosen format.
    OffsetOverflow {
        variable: String,
        offset: u64,
        format: Format,
    },
}

/// Errors from writing a file to a sink.
#[derive(Debug)]
pub enum WriteError {
    Encode(EncodeError),
    Io(std::io::Error),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xdr(err) => write!(f, "xdr error: {err}"),
            Self::InvalidMagic { found } => {
                write!(f, "invalid magic: {found:02X?}")
            }
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported format version: {found}")
            }
            Self::UnexpectedTag { list, found } => {
                write!(f, "unexpected {list} list tag: 0x{found:08X}")
            }
            Self::NonZeroAbsentCount { list, found } => {
                write!(f, "absent {list} list has count {found}")
            }
            Self::InvalidNumRecs { found } => {
                write!(f, "invalid record count: 0x{found:08X}")
            }
            Self::InvalidType { id } => write!(f, "invalid type id: {id}"),
            Self::NegativeCount { list, found } => {
                write!(f, "negative count in {list} list: 0x{found:08X}")
            }
            Self::InvalidDimensionId { variable, id } => {
                write!(f, "variable '{variable}' references dimension id {id}")
            }
            Self::InvalidOffset { variable, offset } => {
                write!(f, "variable '{variable}' has invalid offset {offset}")
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
            Self::Schema(err) => write!(f, "schema error: {err}"),
            Self::DataOutOfBounds {
                variable,
                needed,
                available,
            } => {
                write!(
                    f,
                    "data for '{variable}' needs {needed} bytes, file has {available}"
                )
            }
            Self::UnknownVariable { name } => write!(f, "unknown variable '{name}'"),
            Self::InvalidSlab { variable, reason } => {
                write!(f, "invalid slab for '{variable}': {reason}")
            }
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Dimension => "dimension",
            Self::Attribute => "attribute",
            Self::Variable => "variable",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Dimensions => "dimension count",
            Self::Attributes => "attribute count",
            Self::Variables => "variable count",
            Self::Rank => "variable rank",
            Self::NameLength => "name length",
            Self::AttributeLength => "attribute length",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for SlabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RankMismatch { expected, actual } => {
                write!(f, "expected {expected} axes, got {actual}")
            }
            Self::OutOfRange {
                axis,
                start,
                count,
                extent,
            } => {
                write!(
                    f,
                    "axis {axis}: start {start} + count {count} exceeds extent {extent}"
                )
            }
        }
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xdr(err) => write!(f, "xdr error: {err}"),
            Self::Schema(err) => write!(f, "schema error: {err}"),
            Self::ZeroLengthDimension { name } => {
                write!(f, "fixed dimension '{name}' has length 0")
            }
            Self::UnknownVariable { name } => write!(f, "unknown variable '{name}'"),
            Self::TypeMismatch {
                variable,
                expected,
                found,
            } => {
                write!(
                    f,
                    "variable '{variable}' is {expected}, data is {found}"
                )
            }
            Self::LengthMismatch {
                variable,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "variable '{variable}' needs {expected} elements, got {actual}"
                )
            }
            Self::PartialRecord {
                variable,
                record_len,
                actual,
            } => {
                write!(
                    f,
                    "variable '{variable}' got {actual} elements, not a multiple of record length {record_len}"
                )
            }
            Self::OffsetOverflow {
                variable,
                offset,
                format,
            } => {
                write!(
                    f,
                    "offset {offset} of '{variable}' does not fit the {format} format"
                )
            }
        }
    }
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "encode error: {err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Xdr(err) => Some(err),
            Self::Schema(err) => Some(err),
            _ => None,
        }
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Xdr(err) => Some(err),
            Self::Schema(err) => Some(err),
            _ => None,
        }
    }
}

impl std::error::Error for WriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<XdrError> for DecodeError {
    fn from(err: XdrError) -> Self {
        Self::Xdr(err)
    }
}

impl From<SchemaError> for DecodeError {
    fn from(err: SchemaError) -> Self {
        Self::Schema(err)
    }
}

impl From<XdrError> for EncodeError {
    fn from(err: XdrError) -> Self {
        Self::Xdr(err)
    }
}

impl From<SchemaError> for EncodeError {
    fn from(err: SchemaError) -> Self {
        Self::Schema(err)
    }
}

impl From<EncodeError> for WriteError {
    fn from(err: EncodeError) -> Self {
        Self::Encode(err)
    }
}

impl From<std::io::Error> for WriteError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_display_invalid_magic() {
        let err = DecodeError::InvalidMagic {
            found: *b"HDF\x01",
        };
        let msg = err.to_string();
        assert!(msg.contains("48"));
        assert!(msg.contains("invalid magic"));
    }

    #[test]
    fn decode_error_display_limits_exceeded() {
        let err = DecodeError::LimitsExceeded {
            kind: LimitKind::Variables,
            limit: 4,
            actual: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("variable count"));
        assert!(msg.contains("10"));
    }

    #[test]
    fn decode_error_display_unexpected_tag() {
        let err = DecodeError::UnexpectedTag {
            list: ListKind::Dimension,
            found: 0x0B,
        };
        assert_eq!(err.to_string(), "unexpected dimension list tag: 0x0000000B");
    }

    #[test]
    fn slab_error_display() {
        let err = SlabError::OutOfRange {
            axis: 1,
            start: 4,
            count: 2,
            extent: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("axis 1"));
        assert!(msg.contains("extent 5"));
    }

    #[test]
    fn encode_error_display() {
        let err = EncodeError::TypeMismatch {
            variable: "i2".to_string(),
            expected: NcType::Short,
            found: NcType::Int,
        };
        assert_eq!(err.to_string(), "variable 'i2' is short, data is int");
    }

    #[test]
    fn offset_overflow_names_format() {
        let err = EncodeError::OffsetOverflow {
            variable: "big".to_string(),
            offset: 1 << 40,
            format: Format::Classic,
        };
        assert!(err.to_string().contains("classic"));
    }

    #[test]
    fn write_error_wraps_io() {
        let err = WriteError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert!(err.to_string().contains("disk full"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn decode_error_from_xdr() {
        let err: DecodeError = XdrError::UnexpectedEof {
            requested: 4,
            available: 0,
        }
        .into();
        assert!(matches!(err, DecodeError::Xdr(_)));
    }
}
