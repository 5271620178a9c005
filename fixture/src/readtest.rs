//! The `readtest` fixture: declarations, schema, generation and output.

use std::fmt;
use std::path::{Path, PathBuf};

use classic::{ArrayData, FileWriter, Format};
use schema::{schema_hash, NcType, Schema, VariableDef};
use serde::Serialize;

use crate::error::{FixtureError, FixtureResult};
use crate::generate::generate_array;

/// Conventional output file name.
pub const FIXTURE_FILE_NAME: &str = "readtest.nc";

/// Extent the unlimited dimension is materialised to.
pub const DEFAULT_RECORDS: usize = 7;

/// Name of the unlimited dimension.
pub const RECORD_DIMENSION: &str = "u";

/// Fixed dimensions in declaration order.
pub const FIXED_DIMENSIONS: [(&str, usize); 4] = [("x", 5), ("y", 3), ("z", 1), ("w", 9)];

/// One fixture variable: name, storage type and declared width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Declaration {
    pub name: &'static str,
    pub nc_type: NcType,
    /// The number paired with the type: the modulus under
    /// [`ModulusRule::Literal`], a bit width under [`ModulusRule::SignedRange`].
    pub width: u32,
}

const DECLARATIONS: [Declaration; 5] = [
    Declaration {
        name: "i1",
        nc_type: NcType::Byte,
        width: 8,
    },
    Declaration {
        name: "i2",
        nc_type: NcType::Short,
        width: 16,
    },
    Declaration {
        name: "i4",
        nc_type: NcType::Int,
        width: 32,
    },
    Declaration {
        name: "f4",
        nc_type: NcType::Float,
        width: 64,
    },
    Declaration {
        name: "f8",
        nc_type: NcType::Double,
        width: 64,
    },
];

/// The five fixture variables in declaration order.
#[must_use]
pub const fn readtest_declarations() -> &'static [Declaration] {
    &DECLARATIONS
}

/// How a declaration's width becomes a modulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModulusRule {
    /// The width is the modulus: 8, 16, 32, 64, 64.
    #[default]
    Literal,
    /// The modulus is `2^(width - 1)`, the positive range of a signed
    /// integer of that width.
    SignedRange,
}

impl ModulusRule {
    #[must_use]
    pub const fn modulus(self, width: u32) -> u64 {
        match self {
            Self::Literal => width as u64,
            Self::SignedRange => {
                let shift = if width == 0 { 0 } else { width - 1 };
                if shift > 63 {
                    1 << 63
                } else {
                    1 << shift
                }
            }
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Literal => "literal",
            Self::SignedRange => "signed-range",
        }
    }
}

impl fmt::Display for ModulusRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Generation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureConfig {
    /// Records written along the unlimited dimension.
    pub records: usize,
    pub modulus_rule: ModulusRule,
    pub format: Format,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            records: DEFAULT_RECORDS,
            modulus_rule: ModulusRule::Literal,
            format: Format::Classic,
        }
    }
}

/// Full variable shape for `records` records.
#[must_use]
pub fn fixture_shape(records: usize) -> Vec<usize> {
    std::iter::once(records)
        .chain(FIXED_DIMENSIONS.iter().map(|&(_, len)| len))
        .collect()
}

/// Dimensions and variables of the fixture. It carries no attributes.
pub fn fixture_schema() -> FixtureResult<Schema> {
    let dims: Vec<&str> = std::iter::once(RECORD_DIMENSION)
        .chain(FIXED_DIMENSIONS.iter().map(|&(name, _)| name))
        .collect();

    let mut builder = Schema::builder().unlimited(RECORD_DIMENSION);
    for (name, len) in FIXED_DIMENSIONS {
        builder = builder.dimension(name, len);
    }
    for decl in readtest_declarations() {
        builder = builder.variable(VariableDef::new(decl.name, decl.nc_type, &dims));
    }
    Ok(builder.build()?)
}

/// A generated variable.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureVariable {
    pub declaration: Declaration,
    pub modulus: u64,
    pub data: ArrayData,
}

/// The generated fixture, ready to be encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    config: FixtureConfig,
    schema: Schema,
    variables: Vec<FixtureVariable>,
}

/// Generates every fixture array.
pub fn build_fixture(config: &FixtureConfig) -> FixtureResult<Fixture> {
    let schema = fixture_schema()?;
    let shape = fixture_shape(config.records);
    let variables = readtest_declarations()
        .iter()
        .map(|decl| {
            let modulus = config.modulus_rule.modulus(decl.width);
            let data = generate_array(&shape, modulus, decl.nc_type).map_err(|source| {
                FixtureError::Generate {
                    variable: decl.name.to_string(),
                    source,
                }
            })?;
            Ok(FixtureVariable {
                declaration: *decl,
                modulus,
                data,
            })
        })
        .collect::<FixtureResult<Vec<_>>>()?;
    Ok(Fixture {
        config: *config,
        schema,
        variables,
    })
}

impl Fixture {
    #[must_use]
    pub const fn config(&self) -> &FixtureConfig {
        &self.config
    }

    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub fn variables(&self) -> &[FixtureVariable] {
        &self.variables
    }

    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&FixtureVariable> {
        self.variables
            .iter()
            .find(|var| var.declaration.name == name)
    }

    /// Shape shared by every variable.
    #[must_use]
    pub fn shape(&self) -> Vec<usize> {
        fixture_shape(self.config.records)
    }

    /// Hands every array to a file writer, consuming the fixture.
    pub fn into_writer(self) -> FixtureResult<FileWriter> {
        let mut writer = FileWriter::new(self.schema, self.config.format)?;
        for var in self.variables {
            writer.put(var.declaration.name, var.data)?;
        }
        Ok(writer)
    }

    /// Encodes the complete file.
    pub fn encode(&self) -> FixtureResult<Vec<u8>> {
        Ok(self.clone().into_writer()?.encode()?)
    }

    fn summary(&self, path: &Path, bytes: &[u8]) -> FixtureSummary {
        FixtureSummary {
            path: path.to_path_buf(),
            format: self.config.format.to_string(),
            modulus_rule: self.config.modulus_rule,
            records: self.config.records,
            bytes: bytes.len() as u64,
            schema_hash: schema_hash(&self.schema),
            digest: blake3::hash(bytes).to_hex().to_string(),
            variables: self
                .variables
                .iter()
                .map(|var| VariableSummary {
                    name: var.declaration.name.to_string(),
                    nc_type: var.declaration.nc_type,
                    modulus: var.modulus,
                    shape: self.shape(),
                })
                .collect(),
        }
    }
}

/// What was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixtureSummary {
    pub path: PathBuf,
    pub format: String,
    pub modulus_rule: ModulusRule,
    pub records: usize,
    pub bytes: u64,
    pub schema_hash: u64,
    /// BLAKE3 of the file contents, hex.
    pub digest: String,
    pub variables: Vec<VariableSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableSummary {
    pub name: String,
    pub nc_type: NcType,
    pub modulus: u64,
    pub shape: Vec<usize>,
}

/// Generates the fixture and writes it to `path`.
///
/// The arrays are dropped once encoded; the file is synced before return.
pub fn write_fixture(path: impl AsRef<Path>, config: &FixtureConfig) -> FixtureResult<FixtureSummary> {
    let path = path.as_ref();
    let fixture = build_fixture(config)?;
    let bytes = fixture.encode()?;
    let summary = fixture.summary(path, &bytes);
    drop(fixture);

    classic::write_bytes(path, &bytes).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declarations_in_order() {
        let names: Vec<&str> = readtest_declarations().iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["i1", "i2", "i4", "f4", "f8"]);
        let widths: Vec<u32> = readtest_declarations().iter().map(|d| d.width).collect();
        assert_eq!(widths, vec![8, 16, 32, 64, 64]);
    }

    #[test]
    fn modulus_rules() {
        let literal: Vec<u64> = readtest_declarations()
            .iter()
            .map(|d| ModulusRule::Literal.modulus(d.width))
            .collect();
        assert_eq!(literal, vec![8, 16, 32, 64, 64]);

        let signed: Vec<u64> = readtest_declarations()
            .iter()
            .map(|d| ModulusRule::SignedRange.modulus(d.width))
            .collect();
        assert_eq!(signed, vec![128, 32_768, 1 << 31, 1 << 63, 1 << 63]);
    }

    #[test]
    fn modulus_rule_names() {
        assert_eq!(ModulusRule::default(), ModulusRule::Literal);
        assert_eq!(ModulusRule::SignedRange.to_string(), "signed-range");
    }

    #[test]
    fn schema_shape() {
        let schema = fixture_schema().unwrap();
        assert_eq!(schema.dimensions.len(), 5);
        assert!(schema.dimensions[0].is_unlimited());
        for var in &schema.variables {
            assert!(schema.is_record_variable(var));
            assert_eq!(schema.shape(var, 7).unwrap(), vec![7, 5, 3, 1, 9]);
        }
    }

    #[test]
    fn every_variable_has_fixture_shape() {
        let fixture = build_fixture(&FixtureConfig::default()).unwrap();
        assert_eq!(fixture.shape(), vec![7, 5, 3, 1, 9]);
        for var in fixture.variables() {
            assert_eq!(var.data.len(), 945, "{}", var.declaration.name);
            assert_eq!(var.data.nc_type(), var.declaration.nc_type);
        }
    }

    #[test]
    fn i1_origin_is_zero() {
        let fixture = build_fixture(&FixtureConfig::default()).unwrap();
        let i1 = fixture.variable("i1").unwrap();
        assert_eq!(i1.modulus, 8);
        assert_eq!(i1.data.get_f64(0), Some(0.0));
    }

    #[test]
    fn zero_records_rejected() {
        let config = FixtureConfig {
            records: 0,
            ..FixtureConfig::default()
        };
        let err = build_fixture(&config).unwrap_err();
        assert!(matches!(
            err,
            FixtureError::Generate {
                source: crate::GenerateError::ZeroExtent { axis: 0 },
                ..
            }
        ));
    }

    #[test]
    fn encoded_size_known_answer() {
        let bytes = build_fixture(&FixtureConfig::default())
            .unwrap()
            .encode()
            .unwrap();
        assert_eq!(bytes.len(), 18_328);

        let offset64 = FixtureConfig {
            format: Format::Offset64,
            ..FixtureConfig::default()
        };
        let bytes = build_fixture(&offset64).unwrap().encode().unwrap();
        assert_eq!(bytes.len(), 372 + 7 * 2568);
    }

    #[test]
    fn write_fixture_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FIXTURE_FILE_NAME);
        let summary = write_fixture(&path, &FixtureConfig::default()).unwrap();
        assert_eq!(summary.bytes, 18_328);
        assert_eq!(summary.records, 7);
        assert_eq!(summary.format, "classic");
        assert_eq!(summary.digest.len(), 64);
        assert_eq!(summary.variables.len(), 5);

        let on_disk = std::fs::read(&path).unwrap();
        assert_eq!(blake3::hash(&on_disk).to_hex().to_string(), summary.digest);
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(FIXTURE_FILE_NAME);
        let err = write_fixture(&path, &FixtureConfig::default()).unwrap_err();
        assert!(matches!(err, FixtureError::Io { .. }));
    }
}
