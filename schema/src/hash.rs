//! Deterministic schema hashing.

use blake3::Hasher;

use crate::{AttrValue, Attribute, DimLength, Schema};

/// Computes a deterministic hash of a schema's structure.
///
/// Dimension, attribute and variable order all contribute, matching the
/// fact that declaration order is visible in the file header.
#[must_use]
pub fn schema_hash(schema: &Schema) -> u64 {
    let mut hasher = Hasher::new();
    write_len(&mut hasher, schema.dimensions.len());
    for dim in &schema.dimensions {
        write_str(&mut hasher, &dim.name);
        match dim.length {
            DimLength::Fixed(len) => {
                write_u8(&mut hasher, 0);
                write_len(&mut hasher, len);
            }
            DimLength::Unlimited => write_u8(&mut hasher, 1),
        }
    }

    write_attributes(&mut hasher, &schema.attributes);

    write_len(&mut hasher, schema.variables.len());
    for var in &schema.variables {
        write_str(&mut hasher, &var.name);
        write_u32(&mut hasher, var.nc_type.id());
        write_len(&mut hasher, var.dims.len());
        for dim in &var.dims {
            write_str(&mut hasher, dim);
        }
        write_attributes(&mut hasher, &var.attributes);
    }

    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(bytes)
}

fn write_attributes(hasher: &mut Hasher, attributes: &[Attribute]) {
    write_len(hasher, attributes.len());
    for attr in attributes {
        write_str(hasher, &attr.name);
        write_u32(hasher, attr.nc_type().id());
        write_len(hasher, attr.value.len());
        match &attr.value {
            AttrValue::Text(text) => {
                hasher.update(text.as_bytes());
            }
            AttrValue::Byte(values) => values.iter().for_each(|v| {
                hasher.update(&v.to_le_bytes());
            }),
            AttrValue::Short(values) => values.iter().for_each(|v| {
                hasher.update(&v.to_le_bytes());
            }),
            AttrValue::Int(values) => values.iter().for_each(|v| {
                hasher.update(&v.to_le_bytes());
            }),
            AttrValue::Float(values) => values.iter().for_each(|v| {
                hasher.update(&v.to_bits().to_le_bytes());
            }),
            AttrValue::Double(values) => values.iter().for_each(|v| {
                hasher.update(&v.to_bits().to_le_bytes());
            }),
        }
    }
}

fn write_str(hasher: &mut Hasher, value: &str) {
    write_len(hasher, value.len());
    hasher.update(value.as_bytes());
}

fn write_u8(hasher: &mut Hasher, value: u8) {
    hasher.update(&[value]);
}

fn write_u32(hasher: &mut Hasher, value: u32) {
    hasher.update(&value.to_le_bytes());
}

fn write_len(hasher: &mut Hasher, value: usize) {
    hasher.update(&(value as u64).to_le_bytes());
}
