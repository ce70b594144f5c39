//! Invariant Validator - checks mined program invariants against traces
//!
//! A catalog of likely invariants (one predicate list per program point) is
//! replayed against execution traces captured under fault injection. Every
//! predicate that a recorded observation contradicts is written to a quoted
//! CSV report, optionally tagged with the failure mode of the run that
//! produced the trace.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): program points, invariants, values, violations
//! - **Service Layer** (`services`): catalog parsing, trace streaming, evaluation, reporting
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```no_run
//! use invariant_validator::services::{load_catalog, ValidationRun, ViolationReporter};
//! use invariant_validator::OriginScope;
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let catalog = load_catalog(Path::new("invariants.txt"))?;
//!     let reporter = ViolationReporter::create(Path::new("violations.txt"), false)?;
//!     let mut run = ValidationRun::new(&catalog, OriginScope::PerFile, None, reporter);
//!     run.process_file(Path::new("program.1.dtrace"))?;
//!     let (_, summary) = run.finish()?;
//!     println!("{} violations", summary.violations);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Config, FailureMode, Invariant, InvariantCatalog, InvariantType, OriginScope, Phase,
    ProgramPoint, TraceRecord, Violation,
};
pub use domain::{ValidatorError, ValidatorResult};
pub use infrastructure::config::ConfigLoader;
pub use infrastructure::logging::LoggerImpl;
pub use services::{Evaluator, RunSummary, ValidationRun, Verdict, ViolationReporter};
