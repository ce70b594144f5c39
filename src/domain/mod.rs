//! Domain layer for the invariant validator
//!
//! This module contains the core data model: program points, typed
//! invariants, captured values and violations.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{ValidatorError, ValidatorResult};
