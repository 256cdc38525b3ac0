use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::tiff::types::Page;

/// Append-only sink for container pages.
pub trait PageWriter {
    fn write_page_u16(&mut self, page: &Page<u16>) -> Result<()>;

    fn write_page_u8(&mut self, page: &Page<u8>) -> Result<()>;

    /// Flushes everything written so far. Only called once every page made it out.
    fn finish(&mut self) -> Result<()>;
}
