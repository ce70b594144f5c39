//! Service layer: catalog parsing, trace streaming, evaluation and reporting.

pub mod catalog_parser;
pub mod evaluator;
pub mod failure_classifier;
pub mod origin_store;
pub mod predicate_classifier;
pub mod trace_stream;
pub mod validation_run;
pub mod violation_reporter;

pub use catalog_parser::{load_catalog, parse_catalog};
pub use evaluator::{Evaluator, Verdict};
pub use failure_classifier::{FailureClassifier, GoldenSource};
pub use origin_store::OriginValueStore;
pub use predicate_classifier::classify;
pub use trace_stream::TraceStream;
pub use validation_run::{trace_files, trace_id_for, RunSummary, ValidationRun};
pub use violation_reporter::ViolationReporter;
