use std::path::Path;

use tracing::{info, instrument};

use crate::image_pipeline::{
    common::error::Result,
    memory::{MemoryLog, MemoryProbe, MemorySampler, ProgressEvent, ProgressSink, SysinfoProbe},
    tiff::{BigTiffWriter, MmapTiffReader, PageReader, PageWriter},
};

use super::rescale::rescale_page;
use super::types::{ConversionConfig, RunReport};

/// Streams a 16-bit container into an 8-bit one page at a time.
///
/// At most one source page and one rescaled page are alive at any point, so peak memory
/// stays around a page's worth of samples whatever the container size.
pub struct StreamingConverter<P: MemoryProbe = SysinfoProbe> {
    config: ConversionConfig,
    probe: P,
}

impl StreamingConverter<SysinfoProbe> {
    pub fn new(config: ConversionConfig) -> Result<Self> {
        Self::with_probe(config, SysinfoProbe::new())
    }
}

impl<P: MemoryProbe> StreamingConverter<P> {
    pub fn with_probe(config: ConversionConfig, probe: P) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, probe })
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Runs the page loop: read, rescale, append, sample. The writer is finished only once
    /// every page has been written; the first failure returns without finishing it.
    #[instrument(skip_all, fields(pages = reader.page_count()))]
    pub fn convert<R: PageReader, W: PageWriter>(
        &mut self,
        reader: &mut R,
        writer: &mut W,
        sink: &mut dyn ProgressSink,
    ) -> Result<MemoryLog> {
        let total = reader.page_count();
        let divisor = self.config.rescale_divisor;
        let mut sampler = MemorySampler::new(&mut self.probe, self.config.sample_interval)?;

        for (index, page) in reader.pages().enumerate() {
            let rescaled = {
                let _span = tracing::debug_span!("rescale_page", index).entered();
                let page = page?;
                rescale_page(&page, divisor)?
            };

            {
                let _span = tracing::debug_span!("write_page", index).entered();
                writer.write_page_u8(&rescaled)?;
            }

            if let Some(sample) = sampler.observe(index) {
                sink.on_sample(&ProgressEvent {
                    index,
                    total,
                    sample,
                });
            }
        }

        writer.finish()?;
        sink.finish();

        Ok(sampler.into_log())
    }

    /// Opens `input_path` memory-mapped and `output_path` for writing, then streams every page.
    ///
    /// Both files are held for the whole call and closed on every exit path. A failed run
    /// leaves the partially written output in place.
    #[instrument(skip(self, input_path, output_path, sink))]
    pub fn convert_file<P1: AsRef<Path>, P2: AsRef<Path>>(
        &mut self,
        input_path: P1,
        output_path: P2,
        sink: &mut dyn ProgressSink,
    ) -> Result<RunReport> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        info!(
            input = %input_path.display(),
            output = %output_path.display(),
            "Converting file"
        );

        let (pages, memory_log) = {
            let mut reader = {
                let _span = tracing::info_span!("open_input_file").entered();
                MmapTiffReader::open(input_path)?
            };
            let mut writer = {
                let _span = tracing::info_span!("create_output_file").entered();
                BigTiffWriter::create(output_path, self.config.compression)?
            };
            let log = self.convert(&mut reader, &mut writer, sink)?;
            (writer.pages_written(), log)
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
            "Created output TIFF"
        );
        Ok(report)
    }
}
