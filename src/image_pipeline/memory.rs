//! Memory observation module
//!
//! Resident-memory probing, interval sampling into an append-only log, and the
//! progress callbacks that receive each sample.

mod probe;
mod log;
mod sampler;
mod progress;

pub use probe::{MemoryProbe, SysinfoProbe};
pub use log::{MemoryLog, MemorySample};
pub use sampler::MemorySampler;
pub use progress::{ConsoleProgress, NoProgress, ProgressEvent, ProgressSink, TracingProgress};

/// Bytes per megabyte as used in every reported figure.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
