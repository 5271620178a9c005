//! Command-line tooling for the ncfixture generator.
//!
//! This crate provides the `ncfixture` binary and the pieces behind it:
//!
//! - Generate `readtest.nc` with an optional JSON summary
//! - Print a file header as CDL or JSON
//! - Verify a file element by element against a fresh fixture
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to see what the writer produced.

mod cli;
mod inspect;

pub use cli::{
    run, verify_bytes, Cli, Command, FixtureArgs, FormatArg, GenerateArgs, OutputFormat, RuleArg,
};
pub use inspect::{
    cdl_bytes, collect_entries, dataset_name, inspect_bytes, FileEntry, InspectReport,
    VariableReport,
};
