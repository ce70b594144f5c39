//! CLI type definitions
//!
//! Long flag spellings follow the established `ValidateInvariants` interface
//! (`--invariantFile`, `--dtraceFile`, `--dtracedir`, ...).

use clap::Parser;
use std::path::PathBuf;

use crate::domain::models::OriginScope;

#[derive(Parser, Debug, Clone)]
#[command(name = "validate-invariants")]
#[command(about = "Validate mined invariants against fault-injection traces", long_about = None)]
#[command(after_help = "Examples:
  validate-invariants -o out.txt --invariantFile inv.txt --dtraceFile program.dtrace
  validate-invariants -o out.txt --invariantFile inv.txt --dtracedir traces/ --outputdir outputs/")]
#[command(version)]
pub struct Cli {
    /// Output file to hold violated invariants
    #[arg(short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Invariant catalog to validate
    #[arg(long = "invariantFile", value_name = "PATH", required = true)]
    pub invariant_file: PathBuf,

    /// Single trace file
    #[arg(long = "dtraceFile", value_name = "PATH", conflicts_with = "dtrace_dir")]
    pub dtrace_file: Option<PathBuf>,

    /// Directory containing trace files
    #[arg(long = "dtracedir", value_name = "DIR")]
    pub dtrace_dir: Option<PathBuf>,

    /// Directory containing captured outputs; enables the FailureMode column
    #[arg(long = "outputdir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Golden output file (accepted for compatibility, not loaded)
    #[arg(long = "goldenFile", value_name = "PATH")]
    pub golden_file: Option<PathBuf>,

    /// Configuration file (defaults to ./invariant-validator.yaml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Lifetime of entry values for orig(...) lookups: per-file or per-run
    #[arg(long = "origin-scope", value_name = "SCOPE")]
    pub origin_scope: Option<OriginScope>,
}
