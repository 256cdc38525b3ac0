use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::tiff::Page;

/// 16-bit to 8-bit: `v / 256`, i.e. `v >> 8`.
pub const DEFAULT_RESCALE_DIVISOR: u32 = 256;

/// At this divisor every 16-bit sample maps to 0.
const MAX_RESCALE_DIVISOR: u32 = 1 << 16;

pub(crate) fn check_divisor(divisor: u32) -> Result<()> {
    if divisor == 0 || divisor > MAX_RESCALE_DIVISOR {
        return Err(ConversionError::InvalidConfig(format!(
            "rescale divisor {} outside 1..={}",
            divisor, MAX_RESCALE_DIVISOR
        )));
    }
    if u32::from(u16::MAX) / divisor > u32::from(u8::MAX) {
        return Err(ConversionError::InvalidConfig(format!(
            "rescale divisor {} leaves values above 255",
            divisor
        )));
    }
    Ok(())
}

/// Reduces a 16-bit page to 8 bits by truncating division, keeping its shape.
pub fn rescale_page(page: &Page<u16>, divisor: u32) -> Result<Page<u8>> {
    check_divisor(divisor)?;

    let data: Vec<u8> = page
        .data
        .iter()
        .map(|&v| (u32::from(v) / divisor) as u8)
        .collect();

    Page::new(page.width, page.height, data)
}
