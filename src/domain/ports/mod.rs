//! Domain ports (trait seams implemented by services and adapters).

pub mod violation_sink;

pub use violation_sink::ViolationSink;
