//! Dimension, variable and attribute declarations for the ncfixture codec.
//!
//! This crate defines the logical content of a classic-format file header:
//! - Scalar type tags with sizes and default fill values
//! - Dimensions (fixed or unlimited) in declaration order
//! - Variables with their dimension order and attributes
//! - Validation of naming and structural rules
//! - Deterministic schema hashing and CDL rendering
//!
//! # Design Principles
//!
//! - **Runtime-first** - Schemas are built at runtime with a builder.
//! - **Order is data** - Declaration order defines header ids and data layout.
//! - **Deterministic hashing** - Schema hash is stable given the same definition.

mod attribute;
mod cdl;
mod error;
mod hash;
mod schema;
mod types;

pub use attribute::{AttrValue, Attribute, FILL_VALUE_ATTR};
pub use cdl::to_cdl;
pub use error::{SchemaError, SchemaResult};
pub use hash::schema_hash;
pub use schema::{validate_name, DimLength, Dimension, Schema, SchemaBuilder, VariableDef};
pub use types::{
    NcType, FILL_BYTE, FILL_CHAR, FILL_DOUBLE, FILL_FLOAT, FILL_INT, FILL_SHORT,
};
