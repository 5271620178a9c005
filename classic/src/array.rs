//! Typed element buffers for variable data.

use schema::NcType;
use xdr::{XdrReader, XdrResult, XdrWriter};

/// Values of one variable, flattened in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Byte(Vec<i8>),
    Char(Vec<u8>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Float(Vec<f32>),
    Double(Vec<f64>),
}

impl ArrayData {
    /// Creates an empty buffer of the given type.
    #[must_use]
    pub fn with_capacity(nc_type: NcType, capacity: usize) -> Self {
        match nc_type {
            NcType::Byte => Self::Byte(Vec::with_capacity(capacity)),
            NcType::Char => Self::Char(Vec::with_capacity(capacity)),
            NcType::Short => Self::Short(Vec::with_capacity(capacity)),
            NcType::Int => Self::Int(Vec::with_capacity(capacity)),
            NcType::Float => Self::Float(Vec::with_capacity(capacity)),
            NcType::Double => Self::Double(Vec::with_capacity(capacity)),
        }
    }

    #[must_use]
    pub const fn nc_type(&self) -> NcType {
        match self {
            Self::Byte(_) => NcType::Byte,
            Self::Char(_) => NcType::Char,
            Self::Short(_) => NcType::Short,
            Self::Int(_) => NcType::Int,
            Self::Float(_) => NcType::Float,
            Self::Double(_) => NcType::Double,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Byte(values) => values.len(),
            Self::Char(values) => values.len(),
            Self::Short(values) => values.len(),
            Self::Int(values) => values.len(),
            Self::Float(values) => values.len(),
            Self::Double(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element `index` widened to `f64`.
    #[must_use]
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        match self {
            Self::Byte(values) => values.get(index).map(|v| f64::from(*v)),
            Self::Char(values) => values.get(index).map(|v| f64::from(*v)),
            Self::Short(values) => values.get(index).map(|v| f64::from(*v)),
            Self::Int(values) => values.get(index).map(|v| f64::from(*v)),
            Self::Float(values) => values.get(index).map(|v| f64::from(*v)),
            Self::Double(values) => values.get(index).copied(),
        }
    }

    /// Encodes `count` elements starting at `start`, big-endian, unpadded.
    ///
    /// # Panics
    ///
    /// Panics if `start + count` exceeds [`Self::len`].
    pub fn encode_range(&self, writer: &mut XdrWriter, start: usize, count: usize) {
        let range = start..start + count;
        match self {
            Self::Byte(values) => values[range].iter().for_each(|v| writer.write_i8(*v)),
            Self::Char(values) => writer.write_bytes(&values[range]),
            Self::Short(values) => values[range].iter().for_each(|v| writer.write_i16(*v)),
            Self::Int(values) => values[range].iter().for_each(|v| writer.write_i32(*v)),
            Self::Float(values) => values[range].iter().for_each(|v| writer.write_f32(*v)),
            Self::Double(values) => values[range].iter().for_each(|v| writer.write_f64(*v)),
        }
    }

    /// Decodes one element from `reader` and appends it.
    pub fn push_from(&mut self, reader: &mut XdrReader<'_>) -> XdrResult<()> {
        match self {
            Self::Byte(values) => values.push(reader.read_i8()?),
            Self::Char(values) => values.push(reader.read_u8()?),
            Self::Short(values) => values.push(reader.read_i16()?),
            Self::Int(values) => values.push(reader.read_i32()?),
            Self::Float(values) => values.push(reader.read_f32()?),
            Self::Double(values) => values.push(reader.read_f64()?),
        }
        Ok(())
    }

    /// Decodes `count` consecutive elements of `nc_type`.
    pub fn decode(nc_type: NcType, reader: &mut XdrReader<'_>, count: usize) -> XdrResult<Self> {
        // Bounds-check the whole run before allocating.
        let bytes = reader.read_bytes(count.saturating_mul(nc_type.size()))?;
        let mut inner = XdrReader::new(bytes);
        let mut data = Self::with_capacity(nc_type, count);
        for _ in 0..count {
            data.push_from(&mut inner)?;
        }
        Ok(data)
    }
}
