//! Progress callbacks fed by the memory sampler.

use std::io::Write;

use tracing::info;

use crate::image_pipeline::memory::log::MemorySample;

/// A sample taken at loop iteration `index` (zero-based) out of `total`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEvent {
    pub index: usize,
    pub total: usize,
    pub sample: MemorySample,
}

/// Receives each memory sample as the page loop produces it.
pub trait ProgressSink {
    fn on_sample(&mut self, event: &ProgressEvent);

    /// Called once after the loop completes successfully.
    fn finish(&mut self) {}
}

impl<F: FnMut(&ProgressEvent)> ProgressSink for F {
    fn on_sample(&mut self, event: &ProgressEvent) {
        self(event)
    }
}

/// Discards every event.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_sample(&mut self, _event: &ProgressEvent) {}
}

/// Emits each event as a structured `info!` record.
pub struct TracingProgress {
    unit: &'static str,
}

impl TracingProgress {
    pub fn new(unit: &'static str) -> Self {
        Self { unit }
    }
}

impl ProgressSink for TracingProgress {
    fn on_sample(&mut self, event: &ProgressEvent) {
        info!(
            unit = self.unit,
            done = event.index + 1,
            total = event.total,
            resident_mb = event.sample.resident_mb,
            elapsed_secs = event.sample.elapsed_secs,
            "Progress"
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConsoleUnit {
    Chunks,
    Pages,
}

/// Single-line stdout progress, rewritten in place with a carriage return.
pub struct ConsoleProgress {
    unit: ConsoleUnit,
    printed: bool,
}

impl ConsoleProgress {
    /// `Progress: 11/128 chunks | Memory: 42.0 MB`
    pub fn chunks() -> Self {
        Self {
            unit: ConsoleUnit::Chunks,
            printed: false,
        }
    }

    /// `Processed 11 pages | Memory: 42.0 MB`
    pub fn pages() -> Self {
        Self {
            unit: ConsoleUnit::Pages,
            printed: false,
        }
    }

    fn line(&self, event: &ProgressEvent) -> String {
        match self.unit {
            ConsoleUnit::Chunks => format!(
                "Progress: {}/{} chunks | Memory: {:.1} MB",
                event.index + 1,
                event.total,
                event.sample.resident_mb
            ),
            ConsoleUnit::Pages => format!(
                "Processed {} pages | Memory: {:.1} MB",
                event.index + 1,
                event.sample.resident_mb
            ),
        }
    }
}

impl ProgressSink for ConsoleProgress {
    fn on_sample(&mut self, event: &ProgressEvent) {
        let mut stdout = std::io::stdout().lock();
        // Progress output is best effort.
        let _ = write!(stdout, "{}\r", self.line(event));
        let _ = stdout.flush();
        self.printed = true;
    }

    fn finish(&mut self) {
        if self.printed {
            println!();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(index: usize, total: usize, resident_mb: f64) -> ProgressEvent {
        ProgressEvent {
            index,
            total,
            sample: MemorySample {
                elapsed_secs: 0.0,
                resident_mb,
            },
        }
    }

    #[test]
    fn console_lines() {
        let chunks = ConsoleProgress::chunks();
        assert_eq!(
            chunks.line(&event(10, 128, 41.96)),
            "Progress: 11/128 chunks | Memory: 42.0 MB"
        );

        let pages = ConsoleProgress::pages();
        assert_eq!(
            pages.line(&event(0, 3, 7.31)),
            "Processed 1 pages | Memory: 7.3 MB"
        );
    }

    #[test]
    fn closures_are_sinks() {
        let mut seen = Vec::new();
        {
            let mut sink = |e: &ProgressEvent| seen.push(e.index);
            sink.on_sample(&event(0, 2, 1.0));
            sink.on_sample(&event(1, 2, 1.0));
            sink.finish();
        }
        assert_eq!(seen, vec![0, 1]);
    }

    #[test]
    fn tracing_progress_accepts_events_without_subscriber() {
        let mut sink = TracingProgress::new("pages");
        sink.on_sample(&event(20, 21, 12.0));
        sink.finish();
        assert_eq!(sink.unit, "pages");
    }
}
