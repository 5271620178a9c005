//! File format constants.

/// Leading bytes of every classic-family file.
pub const MAGIC: [u8; 3] = *b"CDF";

/// Tag introducing a non-empty dimension list.
pub const NC_DIMENSION: u32 = 0x0A;

/// Tag introducing a non-empty variable list.
pub const NC_VARIABLE: u32 = 0x0B;

/// Tag introducing a non-empty attribute list.
pub const NC_ATTRIBUTE: u32 = 0x0C;

/// Tag (and count) of an absent list.
pub const ABSENT: u32 = 0;

/// `numrecs` value marking a file whose record count was never finalised.
pub const STREAMING: u32 = 0xFFFF_FFFF;

/// Header `vsize` used when the real size does not fit 32 bits.
pub const VSIZE_OVERFLOW: u32 = 0xFFFF_FFFF;

/// Container variant, selected by the version byte after [`MAGIC`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// CDF-1: 32-bit data offsets.
    #[default]
    Classic,
    /// CDF-2: 64-bit data offsets.
    Offset64,
}

impl Format {
    #[must_use]
    pub const fn version_byte(self) -> u8 {
        match self {
            Self::Classic => 1,
            Self::Offset64 => 2,
        }
    }

    #[must_use]
    pub const fn from_version_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(Self::Classic),
            2 => Some(Self::Offset64),
            _ => None,
        }
    }

    /// Width of a variable's `begin` field in bytes.
    #[must_use]
    pub const fn offset_size(self) -> usize {
        match self {
            Self::Classic => 4,
            Self::Offset64 => 8,
        }
    }

    /// Largest `begin` offset the format can store.
    #[must_use]
    pub const fn max_offset(self) -> u64 {
        match self {
            Self::Classic => i32::MAX as u64,
            Self::Offset64 => i64::MAX as u64,
        }
    }

    /// The four magic bytes for this format.
    #[must_use]
    pub const fn magic(self) -> [u8; 4] {
        [MAGIC[0], MAGIC[1], MAGIC[2], self.version_byte()]
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Classic => f.write_str("classic"),
            Self::Offset64 => f.write_str("64-bit offset"),
        }
    }
}
