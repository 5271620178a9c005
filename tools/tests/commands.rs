use std::fs;

use clap::Parser;
use fixture::FixtureConfig;
use ncfixture_tools::{inspect_bytes, run, verify_bytes, Cli};

fn run_args(args: &[&str]) -> anyhow::Result<()> {
    let argv = std::iter::once("ncfixture").chain(args.iter().copied());
    run(Cli::try_parse_from(argv)?)
}

#[test]
fn generate_then_verify() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("readtest.nc");
    let summary = dir.path().join("summary.json");
    let out_str = out.to_str().unwrap();

    run_args(&[
        "generate",
        "--out",
        out_str,
        "--summary",
        summary.to_str().unwrap(),
    ])
    .unwrap();

    assert_eq!(fs::metadata(&out).unwrap().len(), 18_328);
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary).unwrap()).unwrap();
    assert_eq!(json["bytes"], 18_328);
    assert_eq!(json["records"], 7);
    assert_eq!(json["modulus_rule"], "literal");
    assert_eq!(json["variables"][0]["name"], "i1");
    assert_eq!(json["variables"][0]["nc_type"], "byte");

    run_args(&["verify", out_str]).unwrap();
}

#[test]
fn verify_rejects_other_rule() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("legacy.nc");
    let out_str = out.to_str().unwrap();
    run_args(&["generate", "--out", out_str, "--modulus-rule", "signed-range"]).unwrap();

    run_args(&["verify", out_str, "--modulus-rule", "signed-range"]).unwrap();
    let err = run_args(&["verify", out_str]).unwrap_err();
    assert!(err.to_string().contains("mismatches"));
}

#[test]
fn verify_reports_corruption() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("readtest.nc");
    run_args(&["generate", "--out", out.to_str().unwrap()]).unwrap();

    let mut bytes = fs::read(&out).unwrap();
    // last f8 element
    let last = bytes.len() - 8;
    bytes[last..].copy_from_slice(&1.5f64.to_be_bytes());
    let mismatches = verify_bytes(&bytes, &FixtureConfig::default()).unwrap();
    assert_eq!(mismatches.len(), 1);
    assert!(mismatches[0].to_string().contains("f8"));
}

#[test]
fn inspect_file_and_directory() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("a.nc");
    let second = dir.path().join("b.nc");
    run_args(&["generate", "--out", first.to_str().unwrap()]).unwrap();
    run_args(&[
        "generate",
        "--out",
        second.to_str().unwrap(),
        "--format",
        "offset64",
        "--records",
        "2",
    ])
    .unwrap();

    run_args(&["inspect", first.to_str().unwrap()]).unwrap();
    run_args(&["inspect", dir.path().to_str().unwrap(), "--glob", "*.nc", "--output", "json"])
        .unwrap();

    let report = inspect_bytes("b", &fs::read(&second).unwrap(), &classic::Limits::default())
        .unwrap();
    assert_eq!(report.format, "64-bit offset");
    assert_eq!(report.numrecs, 2);
    assert_eq!(report.header_bytes, 372);
}

#[test]
fn inspect_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.nc");
    let err = run_args(&["inspect", missing.to_str().unwrap()]).unwrap_err();
    assert!(err.to_string().contains("read file"));
}

#[test]
fn zero_records_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("empty.nc");
    let err = run_args(&["generate", "--out", out.to_str().unwrap(), "--records", "0"])
        .unwrap_err();
    assert!(format!("{err:#}").contains("extent 0"));
    assert!(!out.exists());
}
