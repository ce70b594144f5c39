use std::io;

use crate::domain::models::Violation;

/// Port for violation output following hexagonal architecture
///
/// The validation run hands every violation to a sink in the order it was
/// found. The file-backed reporter is the production adapter; tests collect
/// into a `Vec`.
pub trait ViolationSink {
    /// Record one violation.
    fn record(&mut self, violation: &Violation) -> io::Result<()>;

    /// Flush anything buffered. Called once at the end of a run.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ViolationSink for Vec<Violation> {
    fn record(&mut self, violation: &Violation) -> io::Result<()> {
        self.push(violation.clone());
        Ok(())
    }
}
