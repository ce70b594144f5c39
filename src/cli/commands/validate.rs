//! Implementation of the validation run behind `validate-invariants`.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::cli::Cli;
use crate::domain::errors::ValidatorError;
use crate::domain::models::{Config, OriginScope};
use crate::services::{
    load_catalog, trace_files, FailureClassifier, RunSummary, ValidationRun, ViolationReporter,
};

/// Settings for one run after CLI flags are layered over configuration.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Report path
    pub output: PathBuf,
    /// Catalog path
    pub invariant_file: PathBuf,
    /// Where the traces come from
    pub traces: TraceInput,
    /// Captured-output directory; `Some` enables outcome correlation
    pub output_dir: Option<PathBuf>,
    /// Origin store lifetime
    pub origin_scope: OriginScope,
}

/// Trace source selected on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceInput {
    /// One explicit trace file
    File(PathBuf),
    /// Every trace file directly inside a directory
    Directory(PathBuf),
}

impl RunSettings {
    /// Resolve settings; CLI flags win over configuration.
    pub fn resolve(cli: &Cli, config: &Config) -> Result<Self, ValidatorError> {
        let traces = match (&cli.dtrace_dir, &cli.dtrace_file) {
            (Some(dir), _) => TraceInput::Directory(dir.clone()),
            (None, Some(file)) => TraceInput::File(file.clone()),
            (None, None) => return Err(ValidatorError::NoTraceInput),
        };

        Ok(Self {
            output: cli.output.clone().unwrap_or_else(|| config.output_path.clone()),
            invariant_file: cli.invariant_file.clone(),
            traces,
            output_dir: cli.output_dir.clone(),
            origin_scope: cli.origin_scope.unwrap_or(config.origin_scope),
        })
    }
}

/// Run the validation described by `cli`.
pub fn execute(cli: &Cli, config: &Config) -> Result<RunSummary> {
    let settings = RunSettings::resolve(cli, config)?;
    if let Some(golden) = &cli.golden_file {
        tracing::warn!(
            path = %golden.display(),
            "--goldenFile is accepted for compatibility but not loaded"
        );
    }

    let correlate = settings.output_dir.is_some();
    let reporter = ViolationReporter::create(&settings.output, correlate)?;
    let catalog = load_catalog(&settings.invariant_file)?;

    let files = match &settings.traces {
        TraceInput::File(path) => vec![path.clone()],
        TraceInput::Directory(dir) => trace_files(dir, &config.trace_extension)?,
    };
    let classifier = settings
        .output_dir
        .as_ref()
        .map(|dir| FailureClassifier::new(dir, config.failure.clone()));

    tracing::info!(
        output = %settings.output.display(),
        files = files.len(),
        origin_scope = %settings.origin_scope,
        correlate,
        "Starting validation run"
    );

    let mut run = ValidationRun::new(&catalog, settings.origin_scope, classifier, reporter);
    for file in &files {
        run.process_file(file)
            .with_context(|| format!("Failed to validate {}", file.display()))?;
    }
    let (_, summary) = run.finish()?;

    tracing::info!(
        files = summary.files,
        records = summary.records,
        violations = summary.violations,
        "Validation run complete"
    );
    Ok(summary)
}
