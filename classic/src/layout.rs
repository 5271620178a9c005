//! Data section layout: variable sizes, offsets and the record stride.
//!
//! Non-record variables are stored contiguously after the header in
//! declaration order. The record section follows; each record holds one
//! slab of every record variable, again in declaration order. Every slab
//! is padded to 4 bytes, except when the file has exactly one record
//! variable, in which case records are packed without padding.

use schema::{AttrValue, Attribute, DimLength, NcType, Schema, VariableDef};
use xdr::padded_len;

use crate::{EncodeError, EncodeResult, Format, VSIZE_OVERFLOW};

/// Placement of one variable's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarLayout {
    pub nc_type: NcType,
    /// `true` if the first dimension is the unlimited one.
    pub is_record: bool,
    /// Elements per record for record variables, total elements otherwise.
    pub slab_len: usize,
    /// Padded slab size in bytes.
    pub vsize: u64,
    /// Absolute file offset of the first element.
    pub begin: u64,
}

impl VarLayout {
    /// Unpadded slab size in bytes.
    #[must_use]
    pub const fn slab_bytes(&self) -> u64 {
        (self.slab_len as u64).saturating_mul(self.nc_type.size() as u64)
    }

    /// The `vsize` value stored in the header.
    #[must_use]
    pub fn vsize_field(&self) -> u32 {
        u32::try_from(self.vsize).unwrap_or(VSIZE_OVERFLOW)
    }
}

/// Complete data layout of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub format: Format,
    /// Encoded header length in bytes.
    pub header_size: u64,
    /// One entry per variable, in declaration order.
    pub variables: Vec<VarLayout>,
    /// Offset of the first record.
    pub record_begin: u64,
    /// Distance between consecutive records.
    pub recsize: u64,
}

impl Layout {
    /// Computes the layout of `schema` in `format`.
    pub fn compute(schema: &Schema, format: Format) -> EncodeResult<Self> {
        schema.validate()?;
        if let Some(dim) = schema
            .dimensions
            .iter()
            .find(|dim| dim.length == DimLength::Fixed(0))
        {
            return Err(EncodeError::ZeroLengthDimension {
                name: dim.name.clone(),
            });
        }
        let header_size = header_size(schema, format);
        let mut variables = slabs(schema);

        let mut offset = header_size;
        for (var, layout) in schema.variables.iter().zip(&mut variables) {
            if !layout.is_record {
                layout.begin = checked_begin(var, offset, format)?;
                offset = offset.saturating_add(layout.vsize);
            }
        }

        let record_begin = offset;
        for (var, layout) in schema.variables.iter().zip(&mut variables) {
            if layout.is_record {
                layout.begin = checked_begin(var, offset, format)?;
                offset = offset.saturating_add(layout.vsize);
            }
        }

        let recsize = record_size(&variables);
        Ok(Self {
            format,
            header_size,
            variables,
            record_begin,
            recsize,
        })
    }

    /// Returns `true` if record slabs are written without padding.
    #[must_use]
    pub fn packed_records(&self) -> bool {
        packed(&self.variables)
    }

    /// Total file size for `numrecs` records.
    #[must_use]
    pub fn file_size(&self, numrecs: usize) -> u64 {
        self.record_begin
            .saturating_add(self.recsize.saturating_mul(numrecs as u64))
    }
}

/// Per-variable slab sizes with `begin` left at zero.
///
/// Shared by the writer and the reader so both agree on the record stride.
#[must_use]
pub fn slabs(schema: &Schema) -> Vec<VarLayout> {
    schema
        .variables
        .iter()
        .map(|var| {
            let slab_len = schema
                .record_shape(var)
                .unwrap_or_default()
                .iter()
                .fold(1usize, |acc, &len| acc.saturating_mul(len));
            let slab_bytes = (slab_len as u64).saturating_mul(var.nc_type.size() as u64);
            VarLayout {
                nc_type: var.nc_type,
                is_record: schema.is_record_variable(var),
                slab_len,
                vsize: round_up(slab_bytes),
                begin: 0,
            }
        })
        .collect()
}

/// Record stride for a set of variable slabs.
#[must_use]
pub fn record_size(variables: &[VarLayout]) -> u64 {
    if packed(variables) {
        return variables
            .iter()
            .find(|var| var.is_record)
            .map_or(0, VarLayout::slab_bytes);
    }
    variables
        .iter()
        .filter(|var| var.is_record)
        .fold(0u64, |acc, var| acc.saturating_add(var.vsize))
}

fn packed(variables: &[VarLayout]) -> bool {
    variables.iter().filter(|var| var.is_record).count() == 1
}

fn round_up(len: u64) -> u64 {
    len.saturating_add(3) & !3
}

fn checked_begin(var: &VariableDef, offset: u64, format: Format) -> EncodeResult<u64> {
    if offset > format.max_offset() {
        return Err(EncodeError::OffsetOverflow {
            variable: var.name.clone(),
            offset,
            format,
        });
    }
    Ok(offset)
}

/// Encoded header length of `schema` in `format`.
#[must_use]
pub fn header_size(schema: &Schema, format: Format) -> u64 {
    // magic + numrecs
    let mut size = 8usize;

    size += 8;
    for dim in &schema.dimensions {
        size += string_size(&dim.name) + 4;
    }

    size += attributes_size(&schema.attributes);

    size += 8;
    for var in &schema.variables {
        size += string_size(&var.name);
        size += 4 + 4 * var.dims.len();
        size += attributes_size(&var.attributes);
        // nc_type + vsize + begin
        size += 4 + 4 + format.offset_size();
    }
    size as u64
}

fn attributes_size(attributes: &[Attribute]) -> usize {
    let mut size = 8;
    for attr in attributes {
        size += string_size(&attr.name);
        size += 4 + 4;
        size += padded_len(attr_payload_len(&attr.value));
    }
    size
}

fn attr_payload_len(value: &AttrValue) -> usize {
    value.len() * value.nc_type().size()
}

fn string_size(value: &str) -> usize {
    4 + padded_len(value.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_like() -> Schema {
        let dims = ["u", "x", "y", "z", "w"];
        Schema::builder()
            .unlimited("u")
            .dimension("x", 5)
            .dimension("y", 3)
            .dimension("z", 1)
            .dimension("w", 9)
            .variable(VariableDef::new("i1", NcType::Byte, &dims))
            .variable(VariableDef::new("i2", NcType::Short, &dims))
            .variable(VariableDef::new("i4", NcType::Int, &dims))
            .variable(VariableDef::new("f4", NcType::Float, &dims))
            .variable(VariableDef::new("f8", NcType::Double, &dims))
            .build()
            .unwrap()
    }

    #[test]
    fn fixture_header_size() {
        let schema = fixture_like();
        assert_eq!(header_size(&schema, Format::Classic), 352);
        assert_eq!(header_size(&schema, Format::Offset64), 372);
    }

    #[test]
    fn fixture_record_layout() {
        let layout = Layout::compute(&fixture_like(), Format::Classic).unwrap();
        let vsizes: Vec<u64> = layout.variables.iter().map(|v| v.vsize).collect();
        assert_eq!(vsizes, vec![136, 272, 540, 540, 1080]);
        assert_eq!(layout.recsize, 2568);
        assert_eq!(layout.record_begin, 352);

        let begins: Vec<u64> = layout.variables.iter().map(|v| v.begin).collect();
        assert_eq!(begins, vec![352, 488, 760, 1300, 1840]);
        assert_eq!(layout.file_size(7), 18_328);
        assert!(!layout.packed_records());
    }

    #[test]
    fn fixed_variables_precede_records() {
        let schema = Schema::builder()
            .unlimited("t")
            .dimension("n", 3)
            .variable(VariableDef::new("rec", NcType::Short, &["t", "n"]))
            .variable(VariableDef::new("fixed", NcType::Byte, &["n"]))
            .build()
            .unwrap();
        let layout = Layout::compute(&schema, Format::Classic).unwrap();
        let header = layout.header_size;
        assert_eq!(layout.variables[1].begin, header);
        assert_eq!(layout.variables[1].vsize, 4);
        assert_eq!(layout.record_begin, header + 4);
        assert_eq!(layout.variables[0].begin, header + 4);
    }

    #[test]
    fn single_record_variable_is_packed() {
        let schema = Schema::builder()
            .unlimited("t")
            .dimension("n", 3)
            .variable(VariableDef::new("rec", NcType::Byte, &["t", "n"]))
            .build()
            .unwrap();
        let layout = Layout::compute(&schema, Format::Classic).unwrap();
        assert!(layout.packed_records());
        assert_eq!(layout.variables[0].vsize, 4);
        assert_eq!(layout.recsize, 3);
    }

    #[test]
    fn scalar_variable_occupies_one_element() {
        let schema = Schema::builder()
            .variable(VariableDef::new("s", NcType::Double, &[]))
            .build()
            .unwrap();
        let layout = Layout::compute(&schema, Format::Classic).unwrap();
        assert_eq!(layout.variables[0].slab_len, 1);
        assert_eq!(layout.variables[0].vsize, 8);
        assert_eq!(layout.recsize, 0);
    }

    #[test]
    fn attributes_count_toward_header() {
        let plain = Schema::builder().build().unwrap();
        let with_attr = Schema::builder()
            .attribute(Attribute::text("title", "abc"))
            .attribute(Attribute::new("scale", AttrValue::Short(vec![1, 2, 3])))
            .build()
            .unwrap();
        // empty file: magic, numrecs, three absent lists
        assert_eq!(header_size(&plain, Format::Classic), 32);
        // title: 4+8 name, 8 type/len, 4 payload; scale: 4+8, 8, 8
        assert_eq!(header_size(&with_attr, Format::Classic), 32 + 24 + 28);
    }

    #[test]
    fn zero_length_fixed_dimension_rejected() {
        let schema = Schema::builder()
            .dimension("empty", 0)
            .build()
            .unwrap();
        assert!(matches!(
            Layout::compute(&schema, Format::Classic),
            Err(EncodeError::ZeroLengthDimension { .. })
        ));
    }

    #[test]
    fn vsize_field_saturates() {
        let var = VarLayout {
            nc_type: NcType::Double,
            is_record: false,
            slab_len: 1 << 30,
            vsize: 1 << 33,
            begin: 0,
        };
        assert_eq!(var.vsize_field(), VSIZE_OVERFLOW);
    }

    #[test]
    fn classic_offset_overflow_detected() {
        let schema = Schema::builder()
            .dimension("big", 1 << 29)
            .variable(VariableDef::new("a", NcType::Double, &["big"]))
            .variable(VariableDef::new("b", NcType::Double, &["big"]))
            .build()
            .unwrap();
        let err = Layout::compute(&schema, Format::Classic).unwrap_err();
        assert!(matches!(err, EncodeError::OffsetOverflow { ref variable, .. } if variable == "b"));
        assert!(Layout::compute(&schema, Format::Offset64).is_ok());
    }
}
