//! Error types for fixture generation.

use std::fmt;
use std::path::PathBuf;

use classic::EncodeError;
use schema::{NcType, SchemaError};

/// Result type for array generation.
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Result type for fixture assembly.
pub type FixtureResult<T> = Result<T, FixtureError>;

/// Errors from generating one array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// The modulus is zero.
    ZeroModulus,

    /// An axis has extent zero.
    ZeroExtent { axis: usize },

    /// The element count does not fit `usize`.
    ShapeOverflow,

    /// The largest reduced value does not fit the integer type.
    ModulusExceedsType { nc_type: NcType, modulus: u64 },

    /// The type has no numeric representation for generated values.
    UnsupportedType { nc_type: NcType },
}

/// Errors from building, encoding or writing the fixture.
#[derive(Debug)]
pub enum FixtureError {
    Schema(SchemaError),

    /// Generating the named variable failed.
    Generate {
        variable: String,
        source: GenerateError,
    },

    Encode(EncodeError),

    /// Writing the output file failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroModulus => write!(f, "modulus must be positive"),
            Self::ZeroExtent { axis } => write!(f, "axis {axis} has extent 0"),
            Self::ShapeOverflow => write!(f, "element count overflows usize"),
            Self::ModulusExceedsType { nc_type, modulus } => {
                write!(f, "modulus {modulus} produces values outside {nc_type}")
            }
            Self::UnsupportedType { nc_type } => {
                write!(f, "cannot generate values of type {nc_type}")
            }
        }
    }
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema(err) => write!(f, "schema error: {err}"),
            Self::Generate { variable, source } => {
                write!(f, "generating '{variable}': {source}")
            }
            Self::Encode(err) => write!(f, "encode error: {err}"),
            Self::Io { path, source } => {
                write!(f, "writing {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for GenerateError {}

impl std::error::Error for FixtureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Schema(err) => Some(err),
            Self::Generate { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<SchemaError> for FixtureError {
    fn from(err: SchemaError) -> Self {
        Self::Schema(err)
    }
}

impl From<EncodeError> for FixtureError {
    fn from(err: EncodeError) -> Self {
        Self::Encode(err)
    }
}
