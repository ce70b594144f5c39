pub mod config;
pub mod invariant;
pub mod program_point;
pub mod snapshot;
pub mod value;
pub mod violation;

pub use config::{Config, FailureConfig, LoggingConfig, OriginScope};
pub use invariant::{Invariant, InvariantCatalog, InvariantType};
pub use program_point::{Phase, ProgramPoint};
pub use snapshot::{CapturedValue, TraceRecord, VariableSnapshot};
pub use value::{RelOp, ScalarValue};
pub use violation::{FailureMode, Violation};
