//! Typed array generation.

use std::num::NonZeroU64;

use classic::ArrayData;
use schema::NcType;

use crate::error::{GenerateError, GenerateResult};
use crate::indices::RowMajorIndices;
use crate::value::element_value;

/// Reduced values for every index of `shape`, in row-major order.
pub fn generate_values(shape: &[usize], modulus: u64) -> GenerateResult<Vec<u64>> {
    let modulus = NonZeroU64::new(modulus).ok_or(GenerateError::ZeroModulus)?;
    if let Some(axis) = shape.iter().position(|&len| len == 0) {
        return Err(GenerateError::ZeroExtent { axis });
    }
    let total = shape
        .iter()
        .try_fold(1usize, |acc, &len| acc.checked_mul(len))
        .ok_or(GenerateError::ShapeOverflow)?;

    let mut values = Vec::with_capacity(total);
    values.extend(RowMajorIndices::new(shape).map(|index| element_value(&index, modulus)));
    Ok(values)
}

/// Generates an array of `nc_type` holding [`generate_values`].
///
/// Integer types must be able to hold `modulus - 1`; float types round
/// values above their mantissa precision.
pub fn generate_array(shape: &[usize], modulus: u64, nc_type: NcType) -> GenerateResult<ArrayData> {
    if modulus == 0 {
        return Err(GenerateError::ZeroModulus);
    }
    if nc_type == NcType::Char {
        return Err(GenerateError::UnsupportedType { nc_type });
    }
    if let Some(max) = nc_type.integer_max() {
        if modulus - 1 > max {
            return Err(GenerateError::ModulusExceedsType { nc_type, modulus });
        }
    }

    let values = generate_values(shape, modulus)?;
    let data = match nc_type {
        NcType::Byte => ArrayData::Byte(values.iter().map(|&v| v as i8).collect()),
        NcType::Short => ArrayData::Short(values.iter().map(|&v| v as i16).collect()),
        NcType::Int => ArrayData::Int(values.iter().map(|&v| v as i32).collect()),
        NcType::Float => ArrayData::Float(values.iter().map(|&v| v as f32).collect()),
        NcType::Double => ArrayData::Double(values.iter().map(|&v| v as f64).collect()),
        NcType::Char => return Err(GenerateError::UnsupportedType { nc_type }),
    };
    Ok(data)
}
