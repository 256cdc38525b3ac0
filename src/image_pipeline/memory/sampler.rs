use std::time::Instant;

use tracing::warn;

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::memory::BYTES_PER_MB;
use crate::image_pipeline::memory::log::{MemoryLog, MemorySample};
use crate::image_pipeline::memory::probe::MemoryProbe;

/// Samples resident memory every `interval` iterations into a [`MemoryLog`].
///
/// The clock starts when the sampler is created. Samples are taken at indices
/// `0, interval, 2 * interval, ...`.
pub struct MemorySampler<'a, P: MemoryProbe + ?Sized> {
    probe: &'a mut P,
    interval: usize,
    start: Instant,
    log: MemoryLog,
    probe_failed: bool,
}

impl<'a, P: MemoryProbe + ?Sized> MemorySampler<'a, P> {
    pub fn new(probe: &'a mut P, interval: usize) -> Result<Self> {
        if interval == 0 {
            return Err(ConversionError::InvalidConfig(
                "sample interval must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            probe,
            interval,
            start: Instant::now(),
            log: MemoryLog::new(),
            probe_failed: false,
        })
    }

    /// Records a sample if `index` falls on the interval and returns it.
    pub fn observe(&mut self, index: usize) -> Option<MemorySample> {
        if index % self.interval != 0 {
            return None;
        }

        let resident_mb = match self.probe.resident_bytes() {
            Some(bytes) => bytes as f64 / BYTES_PER_MB,
            None => {
                if !self.probe_failed {
                    warn!("Resident memory unavailable, recording 0 MB");
                    self.probe_failed = true;
                }
                0.0
            }
        };

        let sample = MemorySample {
            elapsed_secs: self.start.elapsed().as_secs_f64(),
            resident_mb,
        };
        self.log.push(sample);
        Some(sample)
    }

    pub fn into_log(self) -> MemoryLog {
        self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProbe(Option<u64>);

    impl MemoryProbe for FixedProbe {
        fn resident_bytes(&mut self) -> Option<u64> {
            self.0
        }
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut probe = FixedProbe(Some(0));
        let result = MemorySampler::new(&mut probe, 0);
        assert!(matches!(result, Err(ConversionError::InvalidConfig(_))));
    }

    #[test]
    fn samples_on_interval_boundaries_only() {
        let mut probe = FixedProbe(Some(64 * 1024 * 1024));
        let mut sampler = MemorySampler::new(&mut probe, 10).unwrap();

        let taken: Vec<usize> = (0..25).filter(|&i| sampler.observe(i).is_some()).collect();

        assert_eq!(taken, vec![0, 10, 20]);
        let log = sampler.into_log();
        assert_eq!(log.len(), 3);
        assert!(log.samples().iter().all(|s| s.resident_mb == 64.0));
        assert!(log
            .samples()
            .windows(2)
            .all(|w| w[0].elapsed_secs <= w[1].elapsed_secs));
    }

    #[test]
    fn unavailable_probe_records_zero() {
        let mut probe = FixedProbe(None);
        let mut sampler = MemorySampler::new(&mut probe, 1).unwrap();

        let sample = sampler.observe(0).unwrap();
        assert_eq!(sample.resident_mb, 0.0);
        assert_eq!(sampler.into_log().len(), 1);
    }
}
