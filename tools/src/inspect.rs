//! Header reports for classic-format files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use classic::{ClassicFile, DecodeError, Limits};
use glob::Pattern;
use schema::{schema_hash, to_cdl, Attribute, Dimension, NcType};
use serde::Serialize;

/// Structure of one file, as printed by `inspect --output json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectReport {
    pub name: String,
    pub format: String,
    pub numrecs: usize,
    pub streaming: bool,
    pub header_bytes: usize,
    pub recsize: u64,
    pub schema_hash: u64,
    pub dimensions: Vec<Dimension>,
    pub attributes: Vec<Attribute>,
    pub variables: Vec<VariableReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableReport {
    pub name: String,
    pub nc_type: NcType,
    pub dims: Vec<String>,
    pub shape: Vec<usize>,
    pub record: bool,
    pub vsize: u32,
    pub begin: u64,
    pub attributes: Vec<Attribute>,
}

/// Parses `bytes` and summarises the header.
pub fn inspect_bytes(name: &str, bytes: &[u8], limits: &Limits) -> Result<InspectReport, DecodeError> {
    let file = ClassicFile::parse(bytes, limits)?;
    let schema = file.schema();
    let variables = schema
        .variables
        .iter()
        .zip(&file.header().variables)
        .map(|(var, placed)| {
            Ok(VariableReport {
                name: var.name.clone(),
                nc_type: var.nc_type,
                dims: var.dims.clone(),
                shape: file.shape(&var.name)?,
                record: schema.is_record_variable(var),
                vsize: placed.vsize,
                begin: placed.begin,
                attributes: var.attributes.clone(),
            })
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;

    Ok(InspectReport {
        name: name.to_string(),
        format: file.format().to_string(),
        numrecs: file.numrecs(),
        streaming: file.is_streaming(),
        header_bytes: file.header().size,
        recsize: file.recsize(),
        schema_hash: schema_hash(schema),
        dimensions: schema.dimensions.clone(),
        attributes: schema.attributes.clone(),
        variables,
    })
}

/// Parses `bytes` and renders the header as CDL.
pub fn cdl_bytes(name: &str, bytes: &[u8], limits: &Limits) -> Result<String, DecodeError> {
    let file = ClassicFile::parse(bytes, limits)?;
    Ok(to_cdl(file.schema(), name, file.numrecs()))
}

/// Dataset name for a path: the file stem.
#[must_use]
pub fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("unnamed")
        .to_string()
}

/// A file found while scanning a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub size: u64,
}

/// Lists regular files in `dir`, optionally filtered by a glob on the path
/// or file name, sorted by path.
pub fn collect_entries(dir: &Path, glob: Option<&str>) -> Result<Vec<FileEntry>> {
    let mut entries = Vec::new();
    let pattern = match glob {
        Some(value) => Some(Pattern::new(value).context("invalid glob pattern")?),
        None => None,
    };

    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(pattern) = &pattern {
            let matches_path = pattern.matches_path(&path);
            let matches_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name));
            if !matches_path && !matches_name {
                continue;
            }
        }
        let size = entry.metadata()?.len();
        entries.push(FileEntry { path, size });
    }
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixture::{build_fixture, FixtureConfig};

    fn fixture_bytes() -> Vec<u8> {
        build_fixture(&FixtureConfig::default())
            .unwrap()
            .encode()
            .unwrap()
    }

    #[test]
    fn report_describes_fixture() {
        let report = inspect_bytes("readtest", &fixture_bytes(), &Limits::default()).unwrap();
        assert_eq!(report.format, "classic");
        assert_eq!(report.numrecs, 7);
        assert!(!report.streaming);
        assert_eq!(report.header_bytes, 352);
        assert_eq!(report.recsize, 2568);
        let begins: Vec<u64> = report.variables.iter().map(|v| v.begin).collect();
        assert_eq!(begins, vec![352, 488, 760, 1300, 1840]);
        assert!(report.variables.iter().all(|v| v.record));
        assert!(report
            .variables
            .iter()
            .all(|v| v.shape == vec![7, 5, 3, 1, 9]));
    }

    #[test]
    fn cdl_shows_unlimited_count() {
        let cdl = cdl_bytes("readtest", &fixture_bytes(), &Limits::default()).unwrap();
        assert!(cdl.starts_with("netcdf readtest {\n"));
        assert!(cdl.contains("\tu = UNLIMITED ; // (7 currently)\n"));
        assert!(cdl.contains("\tbyte i1(u, x, y, z, w) ;\n"));
        assert!(cdl.contains("\tdouble f8(u, x, y, z, w) ;\n"));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(inspect_bytes("junk", b"not a netcdf file", &Limits::default()).is_err());
    }

    #[test]
    fn dataset_name_is_stem() {
        assert_eq!(dataset_name(Path::new("/tmp/readtest.nc")), "readtest");
    }

    #[test]
    fn collect_entries_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.nc"), b"b").unwrap();
        fs::write(dir.path().join("a.nc"), b"aa").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("sub.nc")).unwrap();

        let entries = collect_entries(dir.path(), Some("*.nc")).unwrap();
        let names: Vec<String> = entries
            .iter()
            .map(|e| e.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.nc", "b.nc"]);
        assert_eq!(entries[0].size, 2);

        assert_eq!(collect_entries(dir.path(), None).unwrap().len(), 3);
        assert!(collect_entries(dir.path(), Some("[")).is_err());
    }
}
