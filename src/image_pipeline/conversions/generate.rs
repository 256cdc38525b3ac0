use std::path::Path;

use tracing::{info, instrument};

use crate::image_pipeline::{
    common::error::{ConversionError, Result},
    memory::{MemoryLog, MemoryProbe, MemorySampler, ProgressEvent, ProgressSink, SysinfoProbe},
    tiff::{BigTiffWriter, Page, PageWriter},
};

use super::types::{GeneratorConfig, RunReport};

/// Gradient values wrap at this modulus.
const PATTERN_MODULUS: usize = 65535;

/// Builds the repeated page: `pattern[i] = i % 65535`, laid out row-major as height x width.
pub fn gradient_pattern(height: usize, width: usize) -> Result<Page<u16>> {
    let len = height
        .checked_mul(width)
        .ok_or(ConversionError::InvalidDimensions(width, height))?;
    let data = (0..len).map(|i| (i % PATTERN_MODULUS) as u16).collect();
    Page::new(width, height, data)
}

/// Writes one precomputed gradient page over and over until the target size is reached.
pub struct SyntheticGenerator<P: MemoryProbe = SysinfoProbe> {
    config: GeneratorConfig,
    probe: P,
}

impl SyntheticGenerator<SysinfoProbe> {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        Self::with_probe(config, SysinfoProbe::new())
    }
}

impl<P: MemoryProbe> SyntheticGenerator<P> {
    pub fn with_probe(config: GeneratorConfig, probe: P) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, probe })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Appends `page_count` copies of the gradient page to `writer` and finishes it.
    #[instrument(skip_all, fields(chunk_shape = ?self.config.chunk_shape))]
    pub fn write_pages<W: PageWriter>(
        &mut self,
        writer: &mut W,
        sink: &mut dyn ProgressSink,
    ) -> Result<(usize, MemoryLog)> {
        let page_count = usize::try_from(self.config.page_count()).map_err(|_| {
            ConversionError::InvalidConfig(format!(
                "{} pages do not fit in memory indices",
                self.config.page_count()
            ))
        })?;
        let (height, width) = self.config.chunk_shape;

        info!(
            page_count,
            chunk_bytes = self.config.chunk_bytes(),
            "Generating synthetic container"
        );

        let pattern = {
            let _span = tracing::info_span!("gradient_pattern", height, width).entered();
            gradient_pattern(height, width)?
        };

        let mut sampler = MemorySampler::new(&mut self.probe, self.config.sample_interval)?;

        for index in 0..page_count {
            writer.write_page_u16(&pattern)?;

            if let Some(sample) = sampler.observe(index) {
                sink.on_sample(&ProgressEvent {
                    index,
                    total: page_count,
                    sample,
                });
            }
        }

        writer.finish()?;
        sink.finish();

        Ok((page_count, sampler.into_log()))
    }

    /// Creates (or overwrites) a BigTIFF at `output_path` filled with the gradient page.
    #[instrument(skip(self, output_path, sink))]
    pub fn generate<Q: AsRef<Path>>(
        &mut self,
        output_path: Q,
        sink: &mut dyn ProgressSink,
    ) -> Result<RunReport> {
        let output_path = output_path.as_ref();

        info!(output = %output_path.display(), "Generating test TIFF");

        let (pages, memory_log) = {
            let mut writer = {
                let _span = tracing::info_span!("create_output_file").entered();
                BigTiffWriter::create(output_path, self.config.compression)?
            };
            self.write_pages(&mut writer, sink)?
        };

        let output_bytes = std::fs::metadata(output_path)?.len();
        let report = RunReport {
            pages,
            output_bytes,
            memory_log,
        };

        info!(
            pages,
            size_gb = report.output_gb(),
            "Created test TIFF"
        );
        Ok(report)
    }
}
