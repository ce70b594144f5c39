//! Domain errors for the invariant validator.
//!
//! Every variant here is fatal: the run stops and the binary exits non-zero.
//! Lenient outcomes (unknown program points, unresolved operands, missing
//! captured output) never surface as errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors raised while validating traces.
#[derive(Debug, Error)]
pub enum ValidatorError {
    #[error("Unable to open invariant catalog {}", .path.display())]
    CatalogUnreadable { path: PathBuf, source: io::Error },

    #[error("Unable to open trace file {}", .path.display())]
    TraceUnreadable { path: PathBuf, source: io::Error },

    #[error("Unable to list trace directory {}", .path.display())]
    TraceDirUnreadable { path: PathBuf, source: io::Error },

    #[error("Unable to write output file {}", .path.display())]
    OutputUnwritable { path: PathBuf, source: io::Error },

    #[error("Unable to write violation report")]
    ReportWrite(#[source] io::Error),

    #[error("No trace input given: pass --dtraceFile or --dtracedir")]
    NoTraceInput,
}

pub type ValidatorResult<T> = Result<T, ValidatorError>;
