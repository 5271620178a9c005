//! CDL (network Common Data form Language) rendering of a schema header.

use std::fmt::Write;

use crate::{Attribute, DimLength, Schema};

/// Renders the header portion of a file as CDL text.
///
/// `numrecs` is shown next to the unlimited dimension as its current extent.
#[must_use]
pub fn to_cdl(schema: &Schema, file_name: &str, numrecs: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "netcdf {file_name} {{");

    if !schema.dimensions.is_empty() {
        out.push_str("dimensions:\n");
        for dim in &schema.dimensions {
            match dim.length {
                DimLength::Fixed(len) => {
                    let _ = writeln!(out, "\t{} = {len} ;", dim.name);
                }
                DimLength::Unlimited => {
                    let _ = writeln!(
                        out,
                        "\t{} = UNLIMITED ; // ({numrecs} currently)",
                        dim.name
                    );
                }
            }
        }
    }

    if !schema.variables.is_empty() {
        out.push_str("variables:\n");
        for var in &schema.variables {
            let dims = if var.dims.is_empty() {
                String::new()
            } else {
                format!("({})", var.dims.join(", "))
            };
            let _ = writeln!(out, "\t{} {}{dims} ;", var.nc_type.cdl_name(), var.name);
            write_attributes(&mut out, &var.name, &var.attributes);
        }
    }

    if !schema.attributes.is_empty() {
        out.push_str("\n// global attributes:\n");
        write_attributes(&mut out, "", &schema.attributes);
    }

    out.push_str("}\n");
    out
}

fn write_attributes(out: &mut String, owner: &str, attributes: &[Attribute]) {
    for attr in attributes {
        let _ = writeln!(out, "\t\t{owner}:{} = {} ;", attr.name, attr.value.to_cdl());
    }
}
