//! Command-line interface: argument parsing and command dispatch.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use classic::{ClassicFile, Format, Limits};
use fixture::{
    build_fixture, write_fixture, FixtureConfig, Mismatch, ModulusRule, DEFAULT_RECORDS,
    FIXTURE_FILE_NAME,
};
use tracing::{debug, info};

use crate::inspect::{cdl_bytes, collect_entries, dataset_name, inspect_bytes};

#[derive(Parser, Debug)]
#[command(
    name = "ncfixture",
    version,
    about = "Generate, inspect and verify the readtest.nc reader fixture"
)]
pub struct Cli {
    /// Defaults to `generate` with default options.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the fixture file.
    Generate(GenerateArgs),
    /// Print the header of a file, or of every file in a directory.
    Inspect {
        /// File or directory to inspect.
        path: PathBuf,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Cdl)]
        output: OutputFormat,
        /// Optional glob filter when inspecting a directory.
        #[arg(long)]
        glob: Option<String>,
    },
    /// Re-read a file and compare it with a freshly generated fixture.
    Verify {
        /// File to verify.
        path: PathBuf,
        #[command(flatten)]
        fixture: FixtureArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Output path.
    #[arg(long, default_value = FIXTURE_FILE_NAME)]
    pub out: PathBuf,
    #[command(flatten)]
    pub fixture: FixtureArgs,
    /// Optional path for a JSON summary of what was written.
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

impl Default for GenerateArgs {
    fn default() -> Self {
        Self {
            out: PathBuf::from(FIXTURE_FILE_NAME),
            fixture: FixtureArgs::default(),
            summary: None,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct FixtureArgs {
    /// Records along the unlimited dimension.
    #[arg(long, default_value_t = DEFAULT_RECORDS)]
    pub records: usize,
    /// How declared widths become moduli.
    #[arg(long, value_enum, default_value_t = RuleArg::Literal)]
    pub modulus_rule: RuleArg,
    /// Container variant.
    #[arg(long, value_enum, default_value_t = FormatArg::Classic)]
    pub format: FormatArg,
}

impl Default for FixtureArgs {
    fn default() -> Self {
        Self {
            records: DEFAULT_RECORDS,
            modulus_rule: RuleArg::Literal,
            format: FormatArg::Classic,
        }
    }
}

impl FixtureArgs {
    #[must_use]
    pub fn config(&self) -> FixtureConfig {
        FixtureConfig {
            records: self.records,
            modulus_rule: self.modulus_rule.into(),
            format: self.format.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RuleArg {
    Literal,
    SignedRange,
}

impl From<RuleArg> for ModulusRule {
    fn from(arg: RuleArg) -> Self {
        match arg {
            RuleArg::Literal => Self::Literal,
            RuleArg::SignedRange => Self::SignedRange,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Classic,
    Offset64,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Classic => Self::Classic,
            FormatArg::Offset64 => Self::Offset64,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cdl,
    Json,
}

/// Runs a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => generate(&GenerateArgs::default()),
        Some(Command::Generate(args)) => generate(&args),
        Some(Command::Inspect { path, output, glob }) => {
            if path.is_dir() {
                for entry in collect_entries(&path, glob.as_deref())? {
                    println!("== {} ({} bytes) ==", entry.path.display(), entry.size);
                    inspect(&entry.path, output)?;
                }
                Ok(())
            } else {
                inspect(&path, output)
            }
        }
        Some(Command::Verify { path, fixture }) => verify(&path, &fixture.config()),
    }
}

fn generate(args: &GenerateArgs) -> Result<()> {
    let config = args.fixture.config();
    ensure_parent_dir(&args.out)?;
    info!(
        out = %args.out.display(),
        records = config.records,
        modulus_rule = %config.modulus_rule,
        format = %config.format,
        "generating fixture"
    );

    let summary = write_fixture(&args.out, &config)
        .with_context(|| format!("write fixture {}", args.out.display()))?;
    for var in &summary.variables {
        debug!(name = %var.name, nc_type = %var.nc_type, modulus = var.modulus, "variable");
    }
    info!(bytes = summary.bytes, digest = %summary.digest, "wrote fixture");

    if let Some(path) = &args.summary {
        ensure_parent_dir(path)?;
        let json = serde_json::to_string_pretty(&summary).context("serialize summary")?;
        fs::write(path, json).with_context(|| format!("write summary {}", path.display()))?;
    }
    Ok(())
}

fn inspect(path: &Path, output: OutputFormat) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("read file {}", path.display()))?;
    let name = dataset_name(path);
    let limits = Limits::default();
    match output {
        OutputFormat::Cdl => {
            let cdl = cdl_bytes(&name, &bytes, &limits)
                .with_context(|| format!("parse {}", path.display()))?;
            print!("{cdl}");
        }
        OutputFormat::Json => {
            let report = inspect_bytes(&name, &bytes, &limits)
                .with_context(|| format!("parse {}", path.display()))?;
            let json = serde_json::to_string_pretty(&report).context("serialize json")?;
            println!("{json}");
        }
    }
    Ok(())
}

/// Compares file bytes with a freshly generated fixture.
pub fn verify_bytes(bytes: &[u8], config: &FixtureConfig) -> Result<Vec<Mismatch>> {
    let file = ClassicFile::parse(bytes, &Limits::default()).context("parse file")?;
    let expected = build_fixture(config).context("build expected fixture")?;
    Ok(expected.verify(&file))
}

fn verify(path: &Path, config: &FixtureConfig) -> Result<()> {
    info!(path = %path.display(), records = config.records, "verifying fixture");
    let bytes = fs::read(path).with_context(|| format!("read file {}", path.display()))?;
    let mismatches = verify_bytes(&bytes, config)
        .with_context(|| format!("verify {}", path.display()))?;
    if mismatches.is_empty() {
        info!(path = %path.display(), "fixture matches");
        println!("ok: {}", path.display());
        return Ok(());
    }
    for mismatch in &mismatches {
        println!("mismatch: {mismatch}");
    }
    bail!("{} mismatches in {}", mismatches.len(), path.display());
}

/// Ensure the parent directory for a file exists.
fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating parent directory {}", dir.display()))?;
        }
    }
    Ok(())
}
