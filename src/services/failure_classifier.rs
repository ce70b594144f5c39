use std::cell::OnceCell;
use std::fs;
use std::path::PathBuf;

use crate::domain::models::{FailureConfig, FailureMode};

/// Where the expected-output check comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoldenSource {
    /// Output must contain this text
    Configured(String),
    /// No golden text: any line containing `token` marks corruption
    Heuristic {
        /// Token searched for on each line
        token: String,
    },
}

/// Classifies the outcome of a run from its captured standard output.
///
/// The golden source is resolved on the first classification and then kept
/// for the rest of the run.
// TODO: load golden text from --goldenFile once the expected format is agreed on.
#[derive(Debug)]
pub struct FailureClassifier {
    output_dir: PathBuf,
    config: FailureConfig,
    golden_source: OnceCell<GoldenSource>,
}

impl FailureClassifier {
    /// Create a classifier reading captured outputs from `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>, config: FailureConfig) -> Self {
        Self {
            output_dir: output_dir.into(),
            config,
            golden_source: OnceCell::new(),
        }
    }

    /// Path of the captured output for `trace_id`.
    pub fn artifact_path(&self, trace_id: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}{trace_id}", self.config.artifact_prefix))
    }

    /// Golden source in effect, once the first classification has run.
    pub fn golden_source(&self) -> Option<&GoldenSource> {
        self.golden_source.get()
    }

    /// Classify the run that produced `trace_id`.
    ///
    /// A missing, empty or banner-only output is a crash. Otherwise the
    /// output is checked against the golden source.
    pub fn classify(&self, trace_id: &str) -> FailureMode {
        let path = self.artifact_path(trace_id);
        let content = match fs::read(&path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "No captured output, classifying as crash");
                return FailureMode::Crash;
            }
        };
        if content.is_empty() || content == self.config.startup_banner {
            return FailureMode::Crash;
        }

        match self.resolve_golden_source() {
            GoldenSource::Configured(golden) => {
                if content.contains(golden.as_str()) {
                    FailureMode::Benign
                } else {
                    FailureMode::Sdc
                }
            }
            GoldenSource::Heuristic { token } => {
                if content.lines().any(|line| line.contains(token.as_str())) {
                    FailureMode::Sdc
                } else {
                    FailureMode::Benign
                }
            }
        }
    }

    fn resolve_golden_source(&self) -> &GoldenSource {
        self.golden_source
            .get_or_init(|| match &self.config.golden_output {
                Some(golden) => GoldenSource::Configured(golden.clone()),
                None => {
                    tracing::warn!(
                        token = %self.config.heuristic_token,
                        "No golden output configured, using line heuristic for the rest of the run"
                    );
                    GoldenSource::Heuristic {
                        token: self.config.heuristic_token.clone(),
                    }
                }
            })
    }
}
