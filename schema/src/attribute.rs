//! Attribute values attached to a file or a variable.

use crate::NcType;

/// Name of the attribute that overrides a variable's fill value.
pub const FILL_VALUE_ATTR: &str = "_FillValue";

/// Typed attribute payload.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "values", rename_all = "lowercase"))]
pub enum AttrValue {
    Text(String),
    Byte(Vec<i8>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Float(Vec<f32>),
    Double(Vec<f64>),
}

impl AttrValue {
    /// The external type this payload is stored as.
    #[must_use]
    pub const fn nc_type(&self) -> NcType {
        match self {
            Self::Text(_) => NcType::Char,
            Self::Byte(_) => NcType::Byte,
            Self::Short(_) => NcType::Short,
            Self::Int(_) => NcType::Int,
            Self::Float(_) => NcType::Float,
            Self::Double(_) => NcType::Double,
        }
    }

    /// Number of elements (bytes for text).
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Byte(values) => values.len(),
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

    /// Renders the value the way CDL prints it.
    #[must_use]
    pub fn to_cdl(&self) -> String {
        match self {
            Self::Text(text) => format!("{text:?}"),
            Self::Byte(values) => join(values.iter().map(|v| format!("{v}b"))),
            Self::Short(values) => join(values.iter().map(|v| format!("{v}s"))),
            Self::Int(values) => join(values.iter().map(ToString::to_string)),
            Self::Float(values) => join(values.iter().map(|v| {
                if is_whole(f64::from(*v)) {
                    format!("{v:.1}f")
                } else {
                    format!("{v}f")
                }
            })),
            Self::Double(values) => join(values.iter().map(|v| {
                if is_whole(*v) {
                    format!("{v:.1}")
                } else {
                    format!("{v}")
                }
            })),
        }
    }
}

fn join(parts: impl Iterator<Item = String>) -> String {
    parts.collect::<Vec<_>>().join(", ")
}

fn is_whole(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16
}

/// A named attribute.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    pub name: String,
    pub value: AttrValue,
}

impl Attribute {
    #[must_use]
    pub fn new(name: impl Into<String>, value: AttrValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Creates a text attribute.
    #[must_use]
    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name, AttrValue::Text(text.into()))
    }

    #[must_use]
    pub const fn nc_type(&self) -> NcType {
        self.value.nc_type()
    }
}
