use std::fs::File;
use std::path::{Path, PathBuf};

use tiff::encoder::{TiffEncoder, TiffKindBig, colortype};
use tracing::{debug, instrument};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::tiff::types::{Page, TiffCompression};
use crate::image_pipeline::tiff::writer::PageWriter;

/// Append-only BigTIFF writer, one IFD per page.
///
/// The encoder writes straight to the file: each `write_image` call leaves a complete IFD
/// on disk, so nothing is held back in user-space buffers between pages.
pub struct BigTiffWriter {
    path: PathBuf,
    encoder: TiffEncoder<File, TiffKindBig>,
    sync_handle: File,
    pages_written: usize,
}

impl BigTiffWriter {
    /// Creates (or truncates) `path` and writes the BigTIFF header.
    #[instrument(skip_all)]
    pub fn create<P: AsRef<Path>>(path: P, compression: TiffCompression) -> Result<Self> {
        let path = path.as_ref();

        let file = File::create(path).map_err(|e| {
            ConversionError::OutputWriteError(format!("{}: {}", path.display(), e))
        })?;
        let sync_handle = file.try_clone()?;

        let encoder = TiffEncoder::new_big(file)
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?
            .with_compression(compression.to_encoder());

        debug!(path = %path.display(), ?compression, "Created BigTIFF output");

        Ok(Self {
            path: path.to_path_buf(),
            encoder,
            sync_handle,
            pages_written: 0,
        })
    }

    pub fn pages_written(&self) -> usize {
        self.pages_written
    }
}

impl PageWriter for BigTiffWriter {
    fn write_page_u16(&mut self, page: &Page<u16>) -> Result<()> {
        self.encoder
            .write_image::<colortype::Gray16>(page.width as u32, page.height as u32, &page.data)
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?;
        self.pages_written += 1;
        Ok(())
    }

    fn write_page_u8(&mut self, page: &Page<u8>) -> Result<()> {
        self.encoder
            .write_image::<colortype::Gray8>(page.width as u32, page.height as u32, &page.data)
            .map_err(|e| ConversionError::EncodeError(e.to_string()))?;
        self.pages_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.sync_handle.sync_all().map_err(|e| {
            ConversionError::OutputWriteError(format!("{}: {}", self.path.display(), e))
        })?;
        debug!(path = %self.path.display(), pages = self.pages_written, "BigTIFF output finalized");
        Ok(())
    }
}
