//! Trace sink implementations

mod in_memory;
mod logging;

pub use in_memory::InMemoryTraceSink;
pub use logging::LoggingTraceSink;
