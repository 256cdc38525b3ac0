use std::fmt;

/// One (elapsed time, resident memory) observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemorySample {
    /// Seconds since the owning routine started
    pub elapsed_secs: f64,
    /// Resident memory in megabytes (bytes / 1024²)
    pub resident_mb: f64,
}

/// Ordered, append-only sequence of memory samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryLog {
    samples: Vec<MemorySample>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self {
            samples: Vec::new(),
        }
    }

    pub fn push(&mut self, sample: MemorySample) {
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[MemorySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Highest resident memory seen, if anything was sampled.
    pub fn peak_mb(&self) -> Option<f64> {
        self.samples
            .iter()
            .map(|s| s.resident_mb)
            .reduce(f64::max)
    }

    /// Elapsed time of the last sample.
    pub fn duration_secs(&self) -> f64 {
        self.samples.last().map_or(0.0, |s| s.elapsed_secs)
    }

    pub fn print_summary(&self) {
        println!("\nMemory Log Summary:");
        println!("{:-<44}", "");
        println!("{:>6} {:>16} {:>18}", "#", "Elapsed (s)", "Resident (MB)");
        for (i, sample) in self.samples.iter().enumerate() {
            println!(
                "{:>6} {:>16.3} {:>18.1}",
                i, sample.elapsed_secs, sample.resident_mb
            );
        }
        println!("{:-<44}", "");
        match self.peak_mb() {
            Some(peak) => println!(
                "{:<23} {:>18.1}  ({} samples over {:.3}s)",
                "Peak",
                peak,
                self.len(),
                self.duration_secs()
            ),
            None => println!("No samples recorded"),
        }
    }
}

impl fmt::Display for MemoryLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, sample) in self.samples.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({}, {})", sample.elapsed_secs, sample.resident_mb)?;
        }
        write!(f, "]")
    }
}
