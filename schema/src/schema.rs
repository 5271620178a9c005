//! Schema definitions and validation.

use std::collections::HashSet;

use crate::attribute::FILL_VALUE_ATTR;
use crate::error::{SchemaError, SchemaResult};
use crate::{Attribute, NcType};

/// Declared length of a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DimLength {
    Fixed(usize),
    /// Extent grows with the number of records written.
    Unlimited,
}

/// A named dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimension {
    pub name: String,
    pub length: DimLength,
}

impl Dimension {
    #[must_use]
    pub fn fixed(name: impl Into<String>, len: usize) -> Self {
        Self {
            name: name.into(),
            length: DimLength::Fixed(len),
        }
    }

    #[must_use]
    pub fn unlimited(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            length: DimLength::Unlimited,
        }
    }

    #[must_use]
    pub const fn is_unlimited(&self) -> bool {
        matches!(self.length, DimLength::Unlimited)
    }

    /// Materialised extent given the current record count.
    #[must_use]
    pub const fn extent(&self, numrecs: usize) -> usize {
        match self.length {
            DimLength::Fixed(len) => len,
            DimLength::Unlimited => numrecs,
        }
    }
}

/// A variable declaration: type, dimension order and attributes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableDef {
    pub name: String,
    pub nc_type: NcType,
    pub dims: Vec<String>,
    pub attributes: Vec<Attribute>,
}

impl VariableDef {
    /// Creates a variable with no attributes.
    #[must_use]
    pub fn new(name: impl Into<String>, nc_type: NcType, dims: &[&str]) -> Self {
        Self {
            name: name.into(),
            nc_type,
            dims: dims.iter().map(|dim| (*dim).to_string()).collect(),
            attributes: Vec::new(),
        }
    }

    /// Adds an attribute to the variable.
    #[must_use]
    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Looks up an attribute by name.
    #[must_use]
    pub fn find_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// The `_FillValue` override, if one is declared.
    #[must_use]
    pub fn fill_value(&self) -> Option<&Attribute> {
        self.find_attribute(FILL_VALUE_ATTR)
    }
}

/// A validated set of dimensions, global attributes and variables.
///
/// Declaration order is significant: it is the order of ids in the file
/// header and the order in which variable data is laid out.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schema {
    pub dimensions: Vec<Dimension>,
    pub attributes: Vec<Attribute>,
    pub variables: Vec<VariableDef>,
}

impl Schema {
    /// Creates a schema after validation.
    pub fn new(
        dimensions: Vec<Dimension>,
        attributes: Vec<Attribute>,
        variables: Vec<VariableDef>,
    ) -> SchemaResult<Self> {
        let schema = Self {
            dimensions,
            attributes,
            variables,
        };
        schema.validate()?;
        Ok(schema)
    }

    /// Creates a schema builder.
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    #[must_use]
    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|dim| dim.name == name)
    }

    /// Header id of a dimension (its declaration index).
    #[must_use]
    pub fn dimension_id(&self, name: &str) -> Option<usize> {
        self.dimensions.iter().position(|dim| dim.name == name)
    }

    #[must_use]
    pub fn unlimited_dimension(&self) -> Option<&Dimension> {
        self.dimensions.iter().find(|dim| dim.is_unlimited())
    }

    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&VariableDef> {
        self.variables.iter().find(|var| var.name == name)
    }

    /// Returns `true` if the variable's first dimension is unlimited.
    #[must_use]
    pub fn is_record_variable(&self, var: &VariableDef) -> bool {
        var.dims
            .first()
            .and_then(|name| self.dimension(name))
            .is_some_and(Dimension::is_unlimited)
    }

    /// Full shape of a variable, with the unlimited axis set to `numrecs`.
    ///
    /// Returns `None` if a referenced dimension is missing, which cannot
    /// happen for a validated schema.
    #[must_use]
    pub fn shape(&self, var: &VariableDef, numrecs: usize) -> Option<Vec<usize>> {
        var.dims
            .iter()
            .map(|name| self.dimension(name).map(|dim| dim.extent(numrecs)))
            .collect()
    }

    /// Shape of a single record: the full shape without the unlimited axis.
    ///
    /// For non-record variables this is the full shape.
    #[must_use]
    pub fn record_shape(&self, var: &VariableDef) -> Option<Vec<usize>> {
        let skip = usize::from(self.is_record_variable(var));
        var.dims
            .iter()
            .skip(skip)
            .map(|name| self.dimension(name).map(|dim| dim.extent(0)))
            .collect()
    }

    /// Validates schema invariants.
    pub fn validate(&self) -> SchemaResult<()> {
        let mut dim_names = HashSet::new();
        let mut unlimited: Option<&str> = None;
        for dim in &self.dimensions {
            validate_name(&dim.name)?;
            if !dim_names.insert(dim.name.as_str()) {
                return Err(SchemaError::DuplicateDimension {
                    name: dim.name.clone(),
                });
            }
            if dim.is_unlimited() {
                if let Some(first) = unlimited {
                    return Err(SchemaError::MultipleUnlimited {
                        first: first.to_string(),
                        second: dim.name.clone(),
                    });
                }
                unlimited = Some(&dim.name);
            }
        }

        validate_attributes(None, &self.attributes)?;

        let mut var_names = HashSet::new();
        for var in &self.variables {
            validate_name(&var.name)?;
            if !var_names.insert(var.name.as_str()) {
                return Err(SchemaError::DuplicateVariable {
                    name: var.name.clone(),
                });
            }
            for (position, dim_name) in var.dims.iter().enumerate() {
                let dim = self
                    .dimension(dim_name)
                    .ok_or_else(|| SchemaError::UnknownDimension {
                        variable: var.name.clone(),
                        dimension: dim_name.clone(),
                    })?;
                if dim.is_unlimited() && position != 0 {
                    return Err(SchemaError::UnlimitedNotFirst {
                        variable: var.name.clone(),
                        dimension: dim_name.clone(),
                    });
                }
            }
            validate_attributes(Some(&var.name), &var.attributes)?;
            if let Some(fill) = var.fill_value() {
                if fill.nc_type() != var.nc_type {
                    return Err(SchemaError::AttributeTypeMismatch {
                        variable: var.name.clone(),
                        attribute: fill.name.clone(),
                        expected: var.nc_type,
                        found: fill.nc_type(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Builder for `Schema`.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    dimensions: Vec<Dimension>,
    attributes: Vec<Attribute>,
    variables: Vec<VariableDef>,
}

impl SchemaBuilder {
    /// Adds a fixed-length dimension.
    #[must_use]
    pub fn dimension(mut self, name: impl Into<String>, len: usize) -> Self {
        self.dimensions.push(Dimension::fixed(name, len));
        self
    }

    /// Adds the unlimited (record) dimension.
    #[must_use]
    pub fn unlimited(mut self, name: impl Into<String>) -> Self {
        self.dimensions.push(Dimension::unlimited(name));
        self
    }

    /// Adds a global attribute.
    #[must_use]
    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Adds a variable declaration.
    #[must_use]
    pub fn variable(mut self, variable: VariableDef) -> Self {
        self.variables.push(variable);
        self
    }

    /// Builds the schema after validation.
    pub fn build(self) -> SchemaResult<Schema> {
        Schema::new(self.dimensions, self.attributes, self.variables)
    }
}

/// Checks a dimension, variable or attribute name against the classic rules.
///
/// Names must be non-empty, start with an ASCII alphanumeric character or
/// `_` (or any non-ASCII character), and contain no `/`, no control
/// characters and no trailing whitespace.
pub fn validate_name(name: &str) -> SchemaResult<()> {
    let invalid = || SchemaError::InvalidName {
        name: name.to_string(),
    };
    let first = name.chars().next().ok_or_else(invalid)?;
    if first.is_ascii() && !(first.is_ascii_alphanumeric() || first == '_') {
        return Err(invalid());
    }
    if name.chars().any(|c| c == '/' || c.is_control()) {
        return Err(invalid());
    }
    if name.ends_with(char::is_whitespace) {
        return Err(invalid());
    }
    Ok(())
}

fn validate_attributes(variable: Option<&str>, attributes: &[Attribute]) -> SchemaResult<()> {
    let mut names = HashSet::new();
    for attr in attributes {
        validate_name(&attr.name)?;
        if !names.insert(attr.name.as_str()) {
            return Err(SchemaError::DuplicateAttribute {
                variable: variable.map(ToString::to_string),
                name: attr.name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AttrValue;

    fn grid() -> SchemaBuilder {
        Schema::builder()
            .unlimited("time")
            .dimension("lat", 3)
            .dimension("lon", 4)
    }

    #[test]
    fn schema_builder_roundtrip() {
        let schema = grid()
            .variable(VariableDef::new("temp", NcType::Float, &["time", "lat", "lon"]))
            .variable(VariableDef::new("mask", NcType::Byte, &["lat", "lon"]))
            .build()
            .unwrap();
        assert_eq!(schema.dimensions.len(), 3);
        assert_eq!(schema.variables.len(), 2);
        assert_eq!(schema.dimension_id("lon"), Some(2));
        assert_eq!(schema.unlimited_dimension().unwrap().name, "time");
    }

    #[test]
    fn record_variable_detection() {
        let schema = grid()
            .variable(VariableDef::new("temp", NcType::Float, &["time", "lat"]))
            .variable(VariableDef::new("mask", NcType::Byte, &["lat", "lon"]))
            .variable(VariableDef::new("scalar", NcType::Int, &[]))
            .build()
            .unwrap();
        assert!(schema.is_record_variable(&schema.variables[0]));
        assert!(!schema.is_record_variable(&schema.variables[1]));
        assert!(!schema.is_record_variable(&schema.variables[2]));
    }

    #[test]
    fn shapes_materialise_unlimited_axis() {
        let schema = grid()
            .variable(VariableDef::new("temp", NcType::Float, &["time", "lat", "lon"]))
            .build()
            .unwrap();
        let var = &schema.variables[0];
        assert_eq!(schema.shape(var, 7), Some(vec![7, 3, 4]));
        assert_eq!(schema.record_shape(var), Some(vec![3, 4]));
    }

    #[test]
    fn schema_rejects_duplicate_dimension() {
        let err = Schema::builder()
            .dimension("x", 1)
            .dimension("x", 2)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateDimension { .. }));
    }

    #[test]
    fn schema_rejects_second_unlimited() {
        let err = Schema::builder()
            .unlimited("u")
            .unlimited("t")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::MultipleUnlimited {
                first: "u".to_string(),
                second: "t".to_string()
            }
        );
    }

    #[test]
    fn schema_rejects_unknown_dimension() {
        let err = grid()
            .variable(VariableDef::new("v", NcType::Int, &["depth"]))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownDimension { .. }));
    }

    #[test]
    fn schema_rejects_unlimited_not_first() {
        let err = grid()
            .variable(VariableDef::new("v", NcType::Int, &["lat", "time"]))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnlimitedNotFirst { .. }));
    }

    #[test]
    fn schema_rejects_duplicate_variable() {
        let err = grid()
            .variable(VariableDef::new("v", NcType::Int, &[]))
            .variable(VariableDef::new("v", NcType::Short, &[]))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateVariable { .. }));
    }

    #[test]
    fn schema_rejects_duplicate_attribute() {
        let var = VariableDef::new("v", NcType::Int, &[])
            .attribute(Attribute::text("units", "m"))
            .attribute(Attribute::text("units", "s"));
        let err = grid().variable(var).build().unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateAttribute {
                variable: Some("v".to_string()),
                name: "units".to_string()
            }
        );
    }

    #[test]
    fn schema_rejects_mistyped_fill_value() {
        let var = VariableDef::new("v", NcType::Float, &[])
            .attribute(Attribute::new(FILL_VALUE_ATTR, AttrValue::Double(vec![0.1])));
        let err = grid().variable(var).build().unwrap_err();
        assert!(matches!(err, SchemaError::AttributeTypeMismatch { .. }));
    }

    #[test]
    fn fill_value_lookup() {
        let var = VariableDef::new("v", NcType::Float, &[])
            .attribute(Attribute::new(FILL_VALUE_ATTR, AttrValue::Float(vec![0.1])));
        assert!(var.fill_value().is_some());
        assert!(grid().variable(var).build().is_ok());
    }

    #[test]
    fn name_rules() {
        assert!(validate_name("i1").is_ok());
        assert!(validate_name("_FillValue").is_ok());
        assert!(validate_name("9lives").is_ok());
        assert!(validate_name("température").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("-x").is_err());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name("tab\there").is_err());
        assert!(validate_name("trailing ").is_err());
    }
}
