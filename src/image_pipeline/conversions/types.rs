//! Generator and converter configuration types

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::memory::MemoryLog;
use crate::image_pipeline::tiff::TiffCompression;

use super::rescale::{DEFAULT_RESCALE_DIVISOR, check_divisor};

/// Iterations between two memory samples unless configured otherwise.
pub const DEFAULT_SAMPLE_INTERVAL: usize = 10;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Bytes per generated sample (unsigned 16-bit).
const GENERATED_SAMPLE_BYTES: u64 = 2;

/// Configuration for the 16-bit to 8-bit streaming conversion
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Every input sample is divided (truncating) by this value
    pub rescale_divisor: u32,
    /// A memory sample is taken every `sample_interval` pages
    pub sample_interval: usize,
    /// Compression of the output pages
    pub compression: TiffCompression,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            rescale_divisor: DEFAULT_RESCALE_DIVISOR,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            compression: TiffCompression::None,
        }
    }
}

impl ConversionConfig {
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        check_divisor(self.rescale_divisor)?;
        check_interval(self.sample_interval)
    }
}

/// Builder for ConversionConfig
#[derive(Default)]
pub struct ConversionConfigBuilder {
    rescale_divisor: Option<u32>,
    sample_interval: Option<usize>,
    compression: Option<TiffCompression>,
}

impl ConversionConfigBuilder {
    pub fn rescale_divisor(mut self, divisor: u32) -> Self {
        self.rescale_divisor = Some(divisor);
        self
    }

    pub fn sample_interval(mut self, interval: usize) -> Self {
        self.sample_interval = Some(interval);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn build(self) -> ConversionConfig {
        let default = ConversionConfig::default();
        ConversionConfig {
            rescale_divisor: self.rescale_divisor.unwrap_or(default.rescale_divisor),
            sample_interval: self.sample_interval.unwrap_or(default.sample_interval),
            compression: self.compression.unwrap_or(default.compression),
        }
    }
}

/// Configuration for synthetic BigTIFF generation
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Total pixel payload to aim for; rounded down to whole pages
    pub target_bytes: u64,
    /// Page shape as (height, width)
    pub chunk_shape: (usize, usize),
    /// A memory sample is taken every `sample_interval` pages
    pub sample_interval: usize,
    /// Compression of the generated pages
    pub compression: TiffCompression,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            target_bytes: 4 * 1024 * 1024 * 1024,
            chunk_shape: (2048, 2048),
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            compression: TiffCompression::None,
        }
    }
}

impl GeneratorConfig {
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::default()
    }

    /// Payload bytes of one page.
    pub fn chunk_bytes(&self) -> u64 {
        let (height, width) = self.chunk_shape;
        height as u64 * width as u64 * GENERATED_SAMPLE_BYTES
    }

    /// Number of whole pages that fit in the target size.
    pub fn page_count(&self) -> u64 {
        match self.chunk_bytes() {
            0 => 0,
            chunk_bytes => self.target_bytes / chunk_bytes,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let (height, width) = self.chunk_shape;
        if height == 0 || width == 0 || u32::try_from(height).is_err() || u32::try_from(width).is_err() {
            return Err(ConversionError::InvalidDimensions(width, height));
        }
        check_interval(self.sample_interval)
    }
}

/// Builder for GeneratorConfig
#[derive(Default)]
pub struct GeneratorConfigBuilder {
    target_bytes: Option<u64>,
    chunk_shape: Option<(usize, usize)>,
    sample_interval: Option<usize>,
    compression: Option<TiffCompression>,
}

impl GeneratorConfigBuilder {
    /// Target size in GiB. Negative or non-finite sizes become zero.
    pub fn target_size_gb(mut self, gb: f64) -> Self {
        self.target_bytes = Some((gb * BYTES_PER_GB).floor() as u64);
        self
    }

    pub fn target_bytes(mut self, bytes: u64) -> Self {
        self.target_bytes = Some(bytes);
        self
    }

    /// Page shape as (height, width).
    pub fn chunk_shape(mut self, height: usize, width: usize) -> Self {
        self.chunk_shape = Some((height, width));
        self
    }

    pub fn sample_interval(mut self, interval: usize) -> Self {
        self.sample_interval = Some(interval);
        self
    }

    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn build(self) -> GeneratorConfig {
        let default = GeneratorConfig::default();
        GeneratorConfig {
            target_bytes: self.target_bytes.unwrap_or(default.target_bytes),
            chunk_shape: self.chunk_shape.unwrap_or(default.chunk_shape),
            sample_interval: self.sample_interval.unwrap_or(default.sample_interval),
            compression: self.compression.unwrap_or(default.compression),
        }
    }
}

fn check_interval(interval: usize) -> Result<()> {
    if interval == 0 {
        return Err(ConversionError::InvalidConfig(
            "sample interval must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Outcome of a generation or conversion run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Pages written to the output container
    pub pages: usize,
    /// Size of the output file on disk
    pub output_bytes: u64,
    /// Memory samples taken while the loop ran
    pub memory_log: MemoryLog,
}

impl RunReport {
    pub fn output_gb(&self) -> f64 {
        self.output_bytes as f64 / BYTES_PER_GB
    }
}
