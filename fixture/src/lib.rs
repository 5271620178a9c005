//! Deterministic generator for the `readtest.nc` reader fixture.
//!
//! Every element of every fixture variable is a pure function of its
//! index: the mixed-radix value `Σ i[j] · 10^j` reduced modulo the
//! variable's modulus. Arrays are enumerated in row-major order and handed
//! to the [`classic`] writer, which owns the byte layout.
//!
//! # Example
//!
//! ```
//! use fixture::{build_fixture, FixtureConfig};
//!
//! let fixture = build_fixture(&FixtureConfig::default()).unwrap();
//! assert_eq!(fixture.shape(), vec![7, 5, 3, 1, 9]);
//!
//! let bytes = fixture.encode().unwrap();
//! assert_eq!(&bytes[..4], b"CDF\x01");
//! ```

mod error;
mod generate;
mod indices;
mod readtest;
mod value;
mod verify;

pub use error::{FixtureError, FixtureResult, GenerateError, GenerateResult};
pub use generate::{generate_array, generate_values};
pub use indices::RowMajorIndices;
pub use readtest::{
    build_fixture, fixture_schema, fixture_shape, readtest_declarations, write_fixture,
    Declaration, Fixture, FixtureConfig, FixtureSummary, FixtureVariable, ModulusRule,
    VariableSummary, DEFAULT_RECORDS, FIXED_DIMENSIONS, FIXTURE_FILE_NAME, RECORD_DIMENSION,
};
pub use value::{element_value, mixed_radix_value};
pub use verify::Mismatch;
