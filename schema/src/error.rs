//! Schema validation errors.

use std::fmt;

use crate::NcType;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur when building or validating a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Name is empty or breaks the classic naming rules.
    InvalidName { name: String },

    /// Duplicate dimension name.
    DuplicateDimension { name: String },

    /// Duplicate variable name.
    DuplicateVariable { name: String },

    /// Duplicate attribute name within one attribute list.
    DuplicateAttribute {
        /// Owning variable, or `None` for global attributes.
        variable: Option<String>,
        name: String,
    },

    /// More than one dimension declared unlimited.
    MultipleUnlimited { first: String, second: String },

    /// A variable references a dimension that does not exist.
    UnknownDimension { variable: String, dimension: String },

    /// A variable uses the unlimited dimension in a position other than the first.
    UnlimitedNotFirst { variable: String, dimension: String },

    /// A typed attribute does not match the type it must agree with.
    AttributeTypeMismatch {
        variable: String,
        attribute: String,
        expected: NcType,
        found: NcType,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidName { name } => write!(f, "invalid name {name:?}"),
            Self::DuplicateDimension { name } => write!(f, "duplicate dimension {name:?}"),
            Self::DuplicateVariable { name } => write!(f, "duplicate variable {name:?}"),
            Self::DuplicateAttribute {
                variable: Some(variable),
                name,
            } => write!(f, "duplicate attribute {name:?} on variable {variable:?}"),
            Self::DuplicateAttribute {
                variable: None,
                name,
            } => write!(f, "duplicate global attribute {name:?}"),
            Self::MultipleUnlimited { first, second } => {
                write!(
                    f,
                    "dimension {second:?} is unlimited but {first:?} already is"
                )
            }
            Self::UnknownDimension {
                variable,
                dimension,
            } => write!(
                f,
                "variable {variable:?} references unknown dimension {dimension:?}"
            ),
            Self::UnlimitedNotFirst {
                variable,
                dimension,
            } => write!(
                f,
                "variable {variable:?} must list unlimited dimension {dimension:?} first"
            ),
            Self::AttributeTypeMismatch {
                variable,
                attribute,
                expected,
                found,
            } => write!(
                f,
                "attribute {variable}:{attribute} has type {found}, expected {expected}"
            ),
        }
    }
}

impl std::error::Error for SchemaError {}
