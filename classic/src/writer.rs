//! Whole-file assembly.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use schema::{AttrValue, Schema, VariableDef};
use xdr::XdrWriter;

use crate::array::ArrayData;
use crate::error::{EncodeError, EncodeResult, WriteError};
use crate::header::encode_header;
use crate::layout::{Layout, VarLayout};
use crate::Format;

/// Collects variable data for one file and encodes it in a single pass.
///
/// Variables that are never given data, and records a record variable
/// does not cover, are written as fill.
#[derive(Debug, Clone)]
pub struct FileWriter {
    schema: Schema,
    layout: Layout,
    data: Vec<Option<ArrayData>>,
}

impl FileWriter {
    /// Creates a writer, computing the layout up front.
    pub fn new(schema: Schema, format: Format) -> EncodeResult<Self> {
        let layout = Layout::compute(&schema, format)?;
        let data = vec![None; schema.variables.len()];
        Ok(Self {
            schema,
            layout,
            data,
        })
    }

    #[must_use]
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Stores data for a variable, replacing anything stored before.
    ///
    /// A non-record variable needs exactly its element count. A record
    /// variable needs a whole number of records.
    pub fn put(&mut self, name: &str, data: ArrayData) -> EncodeResult<()> {
        let index = self
            .schema
            .variables
            .iter()
            .position(|var| var.name == name)
            .ok_or_else(|| EncodeError::UnknownVariable {
                name: name.to_string(),
            })?;
        let var = &self.schema.variables[index];
        let placement = &self.layout.variables[index];

        if data.nc_type() != var.nc_type {
            return Err(EncodeError::TypeMismatch {
                variable: var.name.clone(),
                expected: var.nc_type,
                found: data.nc_type(),
            });
        }

        if placement.is_record {
            let whole_records = if placement.slab_len == 0 {
                data.is_empty()
            } else {
                data.len() % placement.slab_len == 0
            };
            if !whole_records {
                return Err(EncodeError::PartialRecord {
                    variable: var.name.clone(),
                    record_len: placement.slab_len,
                    actual: data.len(),
                });
            }
        } else if data.len() != placement.slab_len {
            return Err(EncodeError::LengthMismatch {
                variable: var.name.clone(),
                expected: placement.slab_len,
                actual: data.len(),
            });
        }

        self.data[index] = Some(data);
        Ok(())
    }

    /// Number of records: the most any record variable was given.
    #[must_use]
    pub fn numrecs(&self) -> usize {
        self.layout
            .variables
            .iter()
            .zip(&self.data)
            .filter(|(placement, _)| placement.is_record && placement.slab_len > 0)
            .filter_map(|(placement, data)| data.as_ref().map(|d| d.len() / placement.slab_len))
            .max()
            .unwrap_or(0)
    }

    /// Encodes the complete file.
    pub fn encode(&self) -> EncodeResult<Vec<u8>> {
        let numrecs = self.numrecs();
        let capacity = usize::try_from(self.layout.file_size(numrecs)).unwrap_or(0);
        let mut writer = XdrWriter::with_capacity(capacity);
        encode_header(&mut writer, &self.schema, &self.layout, numrecs)?;
        debug_assert_eq!(writer.len() as u64, self.layout.header_size);

        let variables = || {
            self.schema
                .variables
                .iter()
                .zip(&self.layout.variables)
                .zip(&self.data)
        };

        for ((var, placement), data) in variables().filter(|((_, p), _)| !p.is_record) {
            write_slab(&mut writer, var, placement, data.as_ref(), 0, true);
        }

        let padded = !self.layout.packed_records();
        for record in 0..numrecs {
            for ((var, placement), data) in variables().filter(|((_, p), _)| p.is_record) {
                write_slab(&mut writer, var, placement, data.as_ref(), record, padded);
            }
        }

        Ok(writer.finish())
    }

    /// Encodes the file into `sink`, returning the number of bytes written.
    pub fn write_to<W: Write>(&self, sink: &mut W) -> Result<u64, WriteError> {
        let bytes = self.encode()?;
        sink.write_all(&bytes)?;
        sink.flush()?;
        Ok(bytes.len() as u64)
    }

    /// Creates or truncates `path` and writes the file to it.
    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<u64, WriteError> {
        let bytes = self.encode()?;
        write_bytes(path, &bytes)?;
        Ok(bytes.len() as u64)
    }
}

/// Creates or truncates `path`, writes `bytes` and syncs them to disk.
///
/// The handle is dropped on every return path.
pub fn write_bytes(path: impl AsRef<Path>, bytes: &[u8]) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut sink = BufWriter::new(file);
    sink.write_all(bytes)?;
    sink.flush()?;
    sink.get_ref().sync_all()
}

/// Writes one slab: record `record` of a record variable, or the whole of
/// a fixed variable. Missing data becomes fill.
fn write_slab(
    writer: &mut XdrWriter,
    var: &VariableDef,
    placement: &VarLayout,
    data: Option<&ArrayData>,
    record: usize,
    padded: bool,
) {
    let fill = fill_bytes(var);
    let start = record * placement.slab_len;
    match data {
        Some(values) if start + placement.slab_len <= values.len() => {
            values.encode_range(writer, start, placement.slab_len);
        }
        _ => writer.pad_with(&fill, placement.slab_len * fill.len()),
    }
    if padded {
        let slab_bytes = placement.slab_len * var.nc_type.size();
        writer.pad_with(&fill, xdr::pad_len(slab_bytes));
    }
}

/// Big-endian fill value: the `_FillValue` attribute or the type default.
#[must_use]
pub fn fill_bytes(var: &VariableDef) -> Vec<u8> {
    let declared = var.fill_value().and_then(|attr| match &attr.value {
        AttrValue::Text(text) => text.as_bytes().first().map(|b| vec![*b]),
        AttrValue::Byte(values) => values.first().map(|v| v.to_be_bytes().to_vec()),
        AttrValue::Short(values) => values.first().map(|v| v.to_be_bytes().to_vec()),
        AttrValue::Int(values) => values.first().map(|v| v.to_be_bytes().to_vec()),
        AttrValue::Float(values) => values.first().map(|v| v.to_be_bytes().to_vec()),
        AttrValue::Double(values) => values.first().map(|v| v.to_be_bytes().to_vec()),
    });
    declared.unwrap_or_else(|| var.nc_type.fill_bytes().to_vec())
}
