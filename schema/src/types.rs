//! Scalar type tags of the classic format.

use std::fmt;

/// Default fill value for `byte` variables.
pub const FILL_BYTE: i8 = -127;
/// Default fill value for `char` variables.
pub const FILL_CHAR: u8 = 0;
/// Default fill value for `short` variables.
pub const FILL_SHORT: i16 = -32767;
/// Default fill value for `int` variables.
pub const FILL_INT: i32 = -2_147_483_647;
/// Default fill value for `float` variables.
pub const FILL_FLOAT: f32 = 9.969_209_968_386_869e36;
/// Default fill value for `double` variables.
pub const FILL_DOUBLE: f64 = 9.969_209_968_386_869e36;

/// An external scalar type.
///
/// Discriminants are the type ids stored in the file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u32)]
pub enum NcType {
    /// 8-bit signed integer.
    Byte = 1,
    /// 8-bit character.
    Char = 2,
    /// 16-bit signed integer.
    Short = 3,
    /// 32-bit signed integer.
    Int = 4,
    /// 32-bit IEEE float.
    Float = 5,
    /// 64-bit IEEE float.
    Double = 6,
}

impl NcType {
    /// Every type, in id order.
    pub const ALL: [Self; 6] = [
        Self::Byte,
        Self::Char,
        Self::Short,
        Self::Int,
        Self::Float,
        Self::Double,
    ];

    /// Header type id.
    #[must_use]
    pub const fn id(self) -> u32 {
        self as u32
    }

    /// Parses a header type id.
    #[must_use]
    pub const fn from_id(id: u32) -> Option<Self> {
        match id {
            1 => Some(Self::Byte),
            2 => Some(Self::Char),
            3 => Some(Self::Short),
            4 => Some(Self::Int),
            5 => Some(Self::Float),
            6 => Some(Self::Double),
            _ => None,
        }
    }

    /// Size of one element in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::Byte | Self::Char => 1,
            Self::Short => 2,
            Self::Int | Self::Float => 4,
            Self::Double => 8,
        }
    }

    /// Name used in CDL text.
    #[must_use]
    pub const fn cdl_name(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Char => "char",
            Self::Short => "short",
            Self::Int => "int",
            Self::Float => "float",
            Self::Double => "double",
        }
    }

    /// Largest value representable by an integer type, `None` otherwise.
    #[must_use]
    pub const fn integer_max(self) -> Option<u64> {
        match self {
            Self::Byte => Some(i8::MAX as u64),
            Self::Short => Some(i16::MAX as u64),
            Self::Int => Some(i32::MAX as u64),
            Self::Char | Self::Float | Self::Double => None,
        }
    }

    /// Big-endian encoding of the default fill value.
    #[must_use]
    pub const fn fill_bytes(self) -> &'static [u8] {
        match self {
            Self::Byte => &[0x81],
            Self::Char => &[0x00],
            Self::Short => &[0x80, 0x01],
            Self::Int => &[0x80, 0x00, 0x00, 0x01],
            Self::Float => &[0x7C, 0xF0, 0x00, 0x00],
            Self::Double => &[0x47, 0x9E, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
        }
    }
}

impl fmt::Display for NcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cdl_name())
    }
}
