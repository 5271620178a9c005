//! Big-endian XDR primitives for the ncfixture classic-format codec.
//!
//! This crate provides [`XdrWriter`] and [`XdrReader`] for the External Data
//! Representation used by the netCDF classic container: big-endian scalars,
//! counted strings, and 4-byte alignment padding.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads are bounds-checked.
//! - **No domain knowledge** - This crate knows nothing about dimensions or variables.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use xdr::{XdrReader, XdrWriter};
//!
//! let mut writer = XdrWriter::new();
//! writer.write_string("x").unwrap();
//! writer.write_i32(5);
//!
//! let bytes = writer.finish();
//! assert_eq!(bytes.len(), 12);
//!
//! let mut reader = XdrReader::new(&bytes);
//! assert_eq!(reader.read_string().unwrap(), "x");
//! assert_eq!(reader.read_i32().unwrap(), 5);
//! ```

mod error;
mod reader;
mod writer;

pub use error::{XdrError, XdrResult};
pub use reader::XdrReader;
pub use writer::XdrWriter;

/// XDR alignment unit in bytes.
pub const ALIGN: usize = 4;

/// Largest count representable as a non-negative 32-bit XDR integer.
pub const MAX_COUNT: u32 = i32::MAX as u32;

/// Number of padding bytes needed after `len` bytes to reach a 4-byte boundary.
#[must_use]
pub const fn pad_len(len: usize) -> usize {
    (ALIGN - len % ALIGN) % ALIGN
}

/// Rounds `len` up to the next multiple of 4.
#[must_use]
pub const fn padded_len(len: usize) -> usize {
    len + pad_len(len)
}
