//! The driving loop: one catalog against one or more trace files.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::domain::errors::{ValidatorError, ValidatorResult};
use crate::domain::models::{InvariantCatalog, OriginScope};
use crate::domain::ports::ViolationSink;
use crate::services::evaluator::Evaluator;
use crate::services::failure_classifier::FailureClassifier;
use crate::services::origin_store::OriginValueStore;
use crate::services::trace_stream::TraceStream;

/// Counters for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Trace files processed
    pub files: usize,
    /// Records evaluated across all files
    pub records: usize,
    /// Violations written
    pub violations: usize,
}

/// Sequential validation of trace files against one catalog.
///
/// Owns the origin store, so its scope is fixed for the run, and the
/// optional failure classifier that enables outcome correlation.
pub struct ValidationRun<'c, S: ViolationSink> {
    evaluator: Evaluator<'c>,
    origins: OriginValueStore,
    classifier: Option<FailureClassifier>,
    sink: S,
    summary: RunSummary,
}

impl<'c, S: ViolationSink> ValidationRun<'c, S> {
    /// Set up a run. Passing a classifier enables outcome correlation.
    pub fn new(
        catalog: &'c InvariantCatalog,
        origin_scope: OriginScope,
        classifier: Option<FailureClassifier>,
        sink: S,
    ) -> Self {
        Self {
            evaluator: Evaluator::new(catalog),
            origins: OriginValueStore::new(origin_scope),
            classifier,
            sink,
            summary: RunSummary::default(),
        }
    }

    /// Stream one trace file and report its violations.
    ///
    /// Returns the number of violations found in this file.
    pub fn process_file(&mut self, path: &Path) -> ValidatorResult<usize> {
        let trace_id = trace_id_for(path);
        let span = tracing::info_span!("trace", trace_id = %trace_id);
        let _guard = span.enter();

        let failure_mode = self
            .classifier
            .as_ref()
            .map(|classifier| classifier.classify(&trace_id));
        self.origins.begin_file();

        let mut records = 0;
        let mut violations = 0;
        for record in TraceStream::open(path)? {
            let record = record.map_err(|source| ValidatorError::TraceUnreadable {
                path: path.to_path_buf(),
                source,
            })?;
            self.origins.record_entry(&record);

            for violation in self
                .evaluator
                .evaluate(&record, &self.origins, &trace_id, failure_mode)
            {
                self.sink
                    .record(&violation)
                    .map_err(ValidatorError::ReportWrite)?;
                violations += 1;
            }
            records += 1;
        }

        self.summary.files += 1;
        self.summary.records += records;
        self.summary.violations += violations;
        tracing::info!(
            path = %path.display(),
            records,
            violations,
            failure_mode = ?failure_mode,
            "Processed trace file"
        );
        Ok(violations)
    }

    /// Counters so far.
    pub const fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Entry values currently held.
    pub const fn origins(&self) -> &OriginValueStore {
        &self.origins
    }

    /// Flush the sink and hand it back with the final counters.
    pub fn finish(mut self) -> ValidatorResult<(S, RunSummary)> {
        self.sink.finish().map_err(ValidatorError::ReportWrite)?;
        Ok((self.sink, self.summary))
    }
}

/// Identifier of a trace: the second-to-last `.` component of its file name.
///
/// `llfi.stat.trace.17.dtrace` yields `17`; a name without dots is used whole.
pub fn trace_id_for(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parts: Vec<&str> = name.split('.').collect();
    match parts.len() {
        0 | 1 => name.clone(),
        n => parts[n - 2].to_string(),
    }
}

/// Trace files with `extension` directly inside `dir`, sorted by name.
pub fn trace_files(dir: &Path, extension: &str) -> ValidatorResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| ValidatorError::TraceDirUnreadable {
            path: dir.to_path_buf(),
            source: err.into(),
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path.to_path_buf());
        }
    }
    tracing::debug!(dir = %dir.display(), count = files.len(), "Found trace files");
    Ok(files)
}
