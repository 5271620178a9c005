//! Header encoding and bounded decoding.

use schema::{AttrValue, Attribute, DimLength, Dimension, NcType, Schema, SchemaError, VariableDef};
use xdr::{XdrError, XdrReader, XdrWriter, MAX_COUNT};

use crate::array::ArrayData;
use crate::error::{DecodeError, DecodeResult, EncodeResult, LimitKind, ListKind};
use crate::{
    Format, Layout, Limits, ABSENT, MAGIC, NC_ATTRIBUTE, NC_DIMENSION, NC_VARIABLE, STREAMING,
};

/// Size and offset fields of one decoded variable entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarHeader {
    pub vsize: u32,
    pub begin: u64,
}

/// A decoded header.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub format: Format,
    /// Stored record count, `None` for a streaming file.
    pub numrecs: Option<usize>,
    pub schema: Schema,
    /// One entry per variable, in declaration order.
    pub variables: Vec<VarHeader>,
    /// Encoded header length in bytes.
    pub size: usize,
}

/// Encodes the header of `schema` using offsets from `layout`.
pub fn encode_header(
    writer: &mut XdrWriter,
    schema: &Schema,
    layout: &Layout,
    numrecs: usize,
) -> EncodeResult<()> {
    writer.write_bytes(&layout.format.magic());
    writer.write_count(numrecs)?;

    if schema.dimensions.is_empty() {
        write_absent(writer);
    } else {
        writer.write_u32(NC_DIMENSION);
        writer.write_count(schema.dimensions.len())?;
        for dim in &schema.dimensions {
            writer.write_string(&dim.name)?;
            writer.write_count(match dim.length {
                DimLength::Fixed(len) => len,
                DimLength::Unlimited => 0,
            })?;
        }
    }

    encode_attributes(writer, &schema.attributes)?;

    if schema.variables.is_empty() {
        write_absent(writer);
        return Ok(());
    }
    writer.write_u32(NC_VARIABLE);
    writer.write_count(schema.variables.len())?;
    for (var, placement) in schema.variables.iter().zip(&layout.variables) {
        writer.write_string(&var.name)?;
        writer.write_count(var.dims.len())?;
        for dim in &var.dims {
            let id = schema
                .dimension_id(dim)
                .ok_or_else(|| SchemaError::UnknownDimension {
                    variable: var.name.clone(),
                    dimension: dim.clone(),
                })?;
            writer.write_count(id)?;
        }
        encode_attributes(writer, &var.attributes)?;
        writer.write_u32(var.nc_type.id());
        writer.write_u32(placement.vsize_field());
        match layout.format {
            // Layout::compute bounds begin by i32::MAX.
            Format::Classic => writer.write_u32(placement.begin as u32),
            Format::Offset64 => writer.write_u64(placement.begin),
        }
    }
    Ok(())
}

fn write_absent(writer: &mut XdrWriter) {
    writer.write_u32(ABSENT);
    writer.write_u32(ABSENT);
}

fn encode_attributes(writer: &mut XdrWriter, attributes: &[Attribute]) -> EncodeResult<()> {
    if attributes.is_empty() {
        write_absent(writer);
        return Ok(());
    }
    writer.write_u32(NC_ATTRIBUTE);
    writer.write_count(attributes.len())?;
    for attr in attributes {
        writer.write_string(&attr.name)?;
        writer.write_u32(attr.nc_type().id());
        writer.write_count(attr.value.len())?;
        match &attr.value {
            AttrValue::Text(text) => writer.write_bytes(text.as_bytes()),
            AttrValue::Byte(values) => values.iter().for_each(|v| writer.write_i8(*v)),
            AttrValue::Short(values) => values.iter().for_each(|v| writer.write_i16(*v)),
            AttrValue::Int(values) => values.iter().for_each(|v| writer.write_i32(*v)),
            AttrValue::Float(values) => values.iter().for_each(|v| writer.write_f32(*v)),
            AttrValue::Double(values) => values.iter().for_each(|v| writer.write_f64(*v)),
        }
        writer.pad_zero(attr.value.len() * attr.nc_type().size());
    }
    Ok(())
}

/// Decodes a header, enforcing `limits` before every allocation.
pub fn decode_header(bytes: &[u8], limits: &Limits) -> DecodeResult<Header> {
    let mut reader = XdrReader::new(bytes);

    let magic = reader.read_bytes(4)?;
    let found = [magic[0], magic[1], magic[2], magic[3]];
    if found[..3] != MAGIC {
        return Err(DecodeError::InvalidMagic { found });
    }
    let format = Format::from_version_byte(found[3])
        .ok_or(DecodeError::UnsupportedVersion { found: found[3] })?;

    let numrecs = match reader.read_u32()? {
        STREAMING => None,
        raw if raw > MAX_COUNT => return Err(DecodeError::InvalidNumRecs { found: raw }),
        raw => Some(raw as usize),
    };

    let dim_count = read_list_header(
        &mut reader,
        NC_DIMENSION,
        ListKind::Dimension,
        LimitKind::Dimensions,
        limits.max_dimensions,
    )?;
    let mut dimensions = Vec::with_capacity(dim_count.min(reader.remaining() / 8));
    for _ in 0..dim_count {
        let name = read_name(&mut reader, limits)?;
        let length = match read_count(&mut reader, ListKind::Dimension)? {
            0 => DimLength::Unlimited,
            len => DimLength::Fixed(len),
        };
        dimensions.push(Dimension { name, length });
    }

    let attributes = decode_attributes(&mut reader, limits)?;

    let var_count = read_list_header(
        &mut reader,
        NC_VARIABLE,
        ListKind::Variable,
        LimitKind::Variables,
        limits.max_variables,
    )?;
    let mut variables = Vec::with_capacity(var_count.min(reader.remaining() / 8));
    let mut placements = Vec::with_capacity(variables.capacity());
    for _ in 0..var_count {
        let name = read_name(&mut reader, limits)?;
        let rank = read_count(&mut reader, ListKind::Variable)?;
        check_limit(LimitKind::Rank, limits.max_rank, rank)?;
        let mut dims = Vec::with_capacity(rank.min(reader.remaining() / 4));
        for _ in 0..rank {
            let id = reader.read_u32()?;
            let dim = dimensions
                .get(id as usize)
                .ok_or_else(|| DecodeError::InvalidDimensionId {
                    variable: name.clone(),
                    id,
                })?;
            dims.push(dim.name.clone());
        }
        let var_attributes = decode_attributes(&mut reader, limits)?;
        let nc_type = read_type(&mut reader)?;
        let vsize = reader.read_u32()?;
        let begin = match format {
            Format::Classic => i64::from(reader.read_i32()?),
            Format::Offset64 => reader.read_i64()?,
        };
        let begin = u64::try_from(begin).map_err(|_| DecodeError::InvalidOffset {
            variable: name.clone(),
            offset: begin,
        })?;

        variables.push(VariableDef {
            name,
            nc_type,
            dims,
            attributes: var_attributes,
        });
        placements.push(VarHeader { vsize, begin });
    }

    let schema = Schema::new(dimensions, attributes, variables)?;
    Ok(Header {
        format,
        numrecs,
        schema,
        variables: placements,
        size: reader.position(),
    })
}

fn read_list_header(
    reader: &mut XdrReader<'_>,
    tag: u32,
    list: ListKind,
    kind: LimitKind,
    limit: usize,
) -> DecodeResult<usize> {
    let found = reader.read_u32()?;
    let count = reader.read_u32()?;
    if found == ABSENT {
        if count != 0 {
            return Err(DecodeError::NonZeroAbsentCount { list, found: count });
        }
        return Ok(0);
    }
    if found != tag {
        return Err(DecodeError::UnexpectedTag { list, found });
    }
    if count > MAX_COUNT {
        return Err(DecodeError::NegativeCount { list, found: count });
    }
    let count = count as usize;
    check_limit(kind, limit, count)?;
    Ok(count)
}

fn read_count(reader: &mut XdrReader<'_>, list: ListKind) -> DecodeResult<usize> {
    let raw = reader.read_u32()?;
    if raw > MAX_COUNT {
        return Err(DecodeError::NegativeCount { list, found: raw });
    }
    Ok(raw as usize)
}

fn check_limit(kind: LimitKind, limit: usize, actual: usize) -> DecodeResult<()> {
    if actual > limit {
        return Err(DecodeError::LimitsExceeded {
            kind,
            limit,
            actual,
        });
    }
    Ok(())
}

fn read_type(reader: &mut XdrReader<'_>) -> DecodeResult<NcType> {
    let id = reader.read_u32()?;
    NcType::from_id(id).ok_or(DecodeError::InvalidType { id })
}

fn read_name(reader: &mut XdrReader<'_>, limits: &Limits) -> DecodeResult<String> {
    let len = reader.read_u32()? as usize;
    check_limit(LimitKind::NameLength, limits.max_name_len, len)?;
    read_text(reader, len)
}

fn read_text(reader: &mut XdrReader<'_>, len: usize) -> DecodeResult<String> {
    let position = reader.position();
    let bytes = reader.read_bytes(len)?;
    reader.skip_padding(len)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| XdrError::InvalidUtf8 { position }.into())
}

fn decode_attributes(reader: &mut XdrReader<'_>, limits: &Limits) -> DecodeResult<Vec<Attribute>> {
    let count = read_list_header(
        reader,
        NC_ATTRIBUTE,
        ListKind::Attribute,
        LimitKind::Attributes,
        limits.max_attributes,
    )?;
    let mut attributes = Vec::with_capacity(count.min(reader.remaining() / 12));
    for _ in 0..count {
        let name = read_name(reader, limits)?;
        let nc_type = read_type(reader)?;
        let len = read_count(reader, ListKind::Attribute)?;
        check_limit(LimitKind::AttributeLength, limits.max_attribute_len, len)?;

        let value = if nc_type == NcType::Char {
            AttrValue::Text(read_text(reader, len)?)
        } else {
            let data = ArrayData::decode(nc_type, reader, len)?;
            reader.skip_padding(len * nc_type.size())?;
            attr_value(data)
        };
        attributes.push(Attribute { name, value });
    }
    Ok(attributes)
}

fn attr_value(data: ArrayData) -> AttrValue {
    match data {
        ArrayData::Byte(values) => AttrValue::Byte(values),
        ArrayData::Char(values) => AttrValue::Text(String::from_utf8_lossy(&values).into_owned()),
        ArrayData::Short(values) => AttrValue::Short(values),
        ArrayData::Int(values) => AttrValue::Int(values),
        ArrayData::Float(values) => AttrValue::Float(values),
        ArrayData::Double(values) => AttrValue::Double(values),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schema::FILL_VALUE_ATTR;

    fn encode(schema: &Schema, format: Format, numrecs: usize) -> Vec<u8> {
        let layout = Layout::compute(schema, format).unwrap();
        let mut writer = XdrWriter::new();
        encode_header(&mut writer, schema, &layout, numrecs).unwrap();
        let bytes = writer.finish();
        assert_eq!(bytes.len() as u64, layout.header_size);
        bytes
    }

    fn sample() -> Schema {
        Schema::builder()
            .unlimited("time")
            .dimension("lat", 2)
            .attribute(Attribute::text("title", "sample"))
            .variable(
                VariableDef::new("temp", NcType::Float, &["time", "lat"])
                    .attribute(Attribute::new(FILL_VALUE_ATTR, AttrValue::Float(vec![-1.0])))
                    .attribute(Attribute::text("units", "K")),
            )
            .variable(VariableDef::new("lat", NcType::Short, &["lat"]))
            .build()
            .unwrap()
    }

    #[test]
    fn empty_schema_is_three_absent_lists() {
        let schema = Schema::builder().build().unwrap();
        let bytes = encode(&schema, Format::Classic, 0);
        let mut expected = b"CDF\x01".to_vec();
        expected.extend_from_slice(&[0; 28]);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn dimension_list_bytes() {
        let schema = Schema::builder()
            .unlimited("u")
            .dimension("x", 5)
            .build()
            .unwrap();
        let bytes = encode(&schema, Format::Classic, 7);
        assert_eq!(&bytes[4..8], &[0, 0, 0, 7]);
        assert_eq!(&bytes[8..16], &[0, 0, 0, 0x0A, 0, 0, 0, 2]);
        assert_eq!(&bytes[16..28], &[0, 0, 0, 1, b'u', 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&bytes[28..40], &[0, 0, 0, 1, b'x', 0, 0, 0, 0, 0, 0, 5]);
    }

    #[test]
    fn roundtrip_classic_and_offset64() {
        let schema = sample();
        for format in [Format::Classic, Format::Offset64] {
            let bytes = encode(&schema, format, 3);
            let header = decode_header(&bytes, &Limits::default()).unwrap();
            assert_eq!(header.format, format);
            assert_eq!(header.numrecs, Some(3));
            assert_eq!(header.schema, schema);
            assert_eq!(header.size, bytes.len());

            let layout = Layout::compute(&schema, format).unwrap();
            for (decoded, placed) in header.variables.iter().zip(&layout.variables) {
                assert_eq!(decoded.begin, placed.begin);
                assert_eq!(u64::from(decoded.vsize), placed.vsize);
            }
        }
    }

    #[test]
    fn streaming_numrecs() {
        let mut bytes = encode(&sample(), Format::Classic, 0);
        bytes[4..8].copy_from_slice(&STREAMING.to_be_bytes());
        let header = decode_header(&bytes, &Limits::default()).unwrap();
        assert_eq!(header.numrecs, None);
    }

    #[test]
    fn negative_numrecs_rejected() {
        let mut bytes = encode(&sample(), Format::Classic, 0);
        bytes[4..8].copy_from_slice(&0x8000_0000u32.to_be_bytes());
        assert!(matches!(
            decode_header(&bytes, &Limits::default()),
            Err(DecodeError::InvalidNumRecs { .. })
        ));
    }

    #[test]
    fn invalid_magic() {
        let mut bytes = encode(&sample(), Format::Classic, 0);
        bytes[0] = b'H';
        assert!(matches!(
            decode_header(&bytes, &Limits::default()),
            Err(DecodeError::InvalidMagic { .. })
        ));
    }

    #[test]
    fn unsupported_version() {
        let mut bytes = encode(&sample(), Format::Classic, 0);
        bytes[3] = 5;
        assert_eq!(
            decode_header(&bytes, &Limits::default()),
            Err(DecodeError::UnsupportedVersion { found: 5 })
        );
    }

    #[test]
    fn wrong_list_tag() {
        let mut bytes = encode(&sample(), Format::Classic, 0);
        bytes[8..12].copy_from_slice(&NC_VARIABLE.to_be_bytes());
        assert_eq!(
            decode_header(&bytes, &Limits::default()),
            Err(DecodeError::UnexpectedTag {
                list: ListKind::Dimension,
                found: NC_VARIABLE,
            })
        );
    }

    #[test]
    fn absent_with_count_rejected() {
        let schema = Schema::builder().build().unwrap();
        let mut bytes = encode(&schema, Format::Classic, 0);
        bytes[12..16].copy_from_slice(&1u32.to_be_bytes());
        assert!(matches!(
            decode_header(&bytes, &Limits::default()),
            Err(DecodeError::NonZeroAbsentCount { .. })
        ));
    }

    #[test]
    fn limits_enforced() {
        let bytes = encode(&sample(), Format::Classic, 0);
        let limits = Limits {
            max_variables: 1,
            ..Limits::default()
        };
        assert_eq!(
            decode_header(&bytes, &limits),
            Err(DecodeError::LimitsExceeded {
                kind: LimitKind::Variables,
                limit: 1,
                actual: 2,
            })
        );

        let limits = Limits {
            max_name_len: 3,
            ..Limits::default()
        };
        assert!(matches!(
            decode_header(&bytes, &limits),
            Err(DecodeError::LimitsExceeded {
                kind: LimitKind::NameLength,
                ..
            })
        ));
    }

    #[test]
    fn truncated_header_errors() {
        let bytes = encode(&sample(), Format::Classic, 0);
        for len in 0..bytes.len() {
            assert!(decode_header(&bytes[..len], &Limits::default()).is_err(), "len {len}");
        }
    }

    #[test]
    fn bad_dimension_id() {
        let schema = Schema::builder()
            .dimension("x", 2)
            .variable(VariableDef::new("v", NcType::Int, &["x"]))
            .build()
            .unwrap();
        let mut bytes = encode(&schema, Format::Classic, 0);
        // magic 4, numrecs 4, dim list 8 + 12, gatts 8, var list 8, name 8, rank 4
        let dimid_at = 4 + 4 + 20 + 8 + 8 + 8 + 4;
        bytes[dimid_at..dimid_at + 4].copy_from_slice(&9u32.to_be_bytes());
        assert_eq!(
            decode_header(&bytes, &Limits::default()),
            Err(DecodeError::InvalidDimensionId {
                variable: "v".to_string(),
                id: 9,
            })
        );
    }
}
