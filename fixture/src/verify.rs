//! Comparison of a parsed file against a freshly generated fixture.

use std::fmt;

use classic::{ClassicFile, Format};
use schema::{Dimension, NcType};

use crate::readtest::Fixture;

/// One difference between a file and the expected fixture.
#[derive(Debug, Clone, PartialEq)]
pub enum Mismatch {
    Format { expected: Format, found: Format },
    Records { expected: usize, found: usize },
    Dimensions { expected: Vec<Dimension>, found: Vec<Dimension> },
    MissingVariable { name: String },
    ExtraVariable { name: String },
    Type { name: String, expected: NcType, found: NcType },
    Shape { name: String, expected: Vec<usize>, found: Vec<usize> },
    /// Data could not be read back.
    Unreadable { name: String, reason: String },
    /// Element values differ; `first` is the first differing flat index.
    Values { name: String, first: usize, count: usize },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Format { expected, found } => {
                write!(f, "format: expected {expected}, found {found}")
            }
            Self::Records { expected, found } => {
                write!(f, "records: expected {expected}, found {found}")
            }
            Self::Dimensions { expected, found } => {
                write!(f, "dimensions: expected {expected:?}, found {found:?}")
            }
            Self::MissingVariable { name } => write!(f, "variable '{name}' missing"),
            Self::ExtraVariable { name } => write!(f, "unexpected variable '{name}'"),
            Self::Type {
                name,
                expected,
                found,
            } => write!(f, "'{name}': expected {expected}, found {found}"),
            Self::Shape {
                name,
                expected,
                found,
            } => write!(f, "'{name}': expected shape {expected:?}, found {found:?}"),
            Self::Unreadable { name, reason } => write!(f, "'{name}': {reason}"),
            Self::Values { name, first, count } => {
                write!(f, "'{name}': {count} values differ, first at {first}")
            }
        }
    }
}

impl Fixture {
    /// Lists every way `file` differs from this fixture; empty on a match.
    #[must_use]
    pub fn verify(&self, file: &ClassicFile<'_>) -> Vec<Mismatch> {
        let mut mismatches = Vec::new();

        if file.format() != self.config().format {
            mismatches.push(Mismatch::Format {
                expected: self.config().format,
                found: file.format(),
            });
        }
        if file.numrecs() != self.config().records {
            mismatches.push(Mismatch::Records {
                expected: self.config().records,
                found: file.numrecs(),
            });
        }
        if file.dimensions() != self.schema().dimensions.as_slice() {
            mismatches.push(Mismatch::Dimensions {
                expected: self.schema().dimensions.clone(),
                found: file.dimensions().to_vec(),
            });
        }

        for found in file.variables() {
            if self.variable(&found.name).is_none() {
                mismatches.push(Mismatch::ExtraVariable {
                    name: found.name.clone(),
                });
            }
        }

        for expected in self.variables() {
            let name = expected.declaration.name;
            let Some(found) = file.variables().iter().find(|var| var.name == name) else {
                mismatches.push(Mismatch::MissingVariable {
                    name: name.to_string(),
                });
                continue;
            };
            if found.nc_type != expected.declaration.nc_type {
                mismatches.push(Mismatch::Type {
                    name: name.to_string(),
                    expected: expected.declaration.nc_type,
                    found: found.nc_type,
                });
                continue;
            }
            let shape = file.shape(name).unwrap_or_default();
            if shape != self.shape() {
                mismatches.push(Mismatch::Shape {
                    name: name.to_string(),
                    expected: self.shape(),
                    found: shape,
                });
                continue;
            }
            match file.read_variable(name) {
                Ok(data) => {
                    let differing: Vec<usize> = (0..expected.data.len())
                        .filter(|&i| data.get_f64(i) != expected.data.get_f64(i))
                        .collect();
                    if let Some(&first) = differing.first() {
                        mismatches.push(Mismatch::Values {
                            name: name.to_string(),
                            first,
                            count: differing.len(),
                        });
                    }
                }
                Err(err) => mismatches.push(Mismatch::Unreadable {
                    name: name.to_string(),
                    reason: err.to_string(),
                }),
            }
        }
        mismatches
    }
}
