//! Memory-mapped multi-page TIFF reader.
//!
//! The input file is mapped read-only and handed to the `tiff` decoder through a cursor,
//! so page data is paged in by the OS as the decoder touches it instead of being read
//! into process memory up front. Only the page currently being decoded is materialized.

use std::fs::File;
use std::io::{Cursor, ErrorKind};
use std::path::Path;

use memmap2::{Mmap, MmapOptions};
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tracing::{debug, instrument};

use crate::image_pipeline::common::error::{ConversionError, Result};
use crate::image_pipeline::tiff::reader::PageReader;
use crate::image_pipeline::tiff::types::Page;

/// Classic TIFF header: byte order, magic 42, 32-bit first IFD offset.
const CLASSIC_HEADER_LEN: usize = 8;
/// BigTIFF header: byte order, magic 43, offset size, reserved, 64-bit first IFD offset.
const BIG_HEADER_LEN: usize = 16;

pub struct MmapTiffReader {
    /// `None` for a container without any IFD.
    decoder: Option<Decoder<Cursor<Mmap>>>,
    page_count: usize,
    current: usize,
}

impl MmapTiffReader {
    /// Maps `path` read-only and counts its pages.
    #[instrument(skip_all)]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConversionError::InputNotFound(path.display().to_string()),
            _ => ConversionError::InputReadError(format!("{}: {}", path.display(), e)),
        })?;

        let len = file.metadata()?.len();
        if len < CLASSIC_HEADER_LEN as u64 {
            return Err(ConversionError::DecodeError(format!(
                "{}: {} bytes is too short for a TIFF header",
                path.display(),
                len
            )));
        }

        // SAFETY: the mapping is read-only and the input is not modified while it is open.
        let mmap = unsafe { MmapOptions::new().map(&file) }.map_err(|e| {
            ConversionError::InputReadError(format!("{}: {}", path.display(), e))
        })?;

        if first_ifd_offset(&mmap)? == 0 {
            debug!(path = %path.display(), "Container has no pages");
            return Ok(Self {
                decoder: None,
                page_count: 0,
                current: 0,
            });
        }

        // Page size is bounded only by the container; one page is decoded at a time.
        let mut decoder = Decoder::new(Cursor::new(mmap))
            .map_err(decode_error)?
            .with_limits(Limits::unlimited());

        let mut page_count = 1;
        while decoder.more_images() {
            decoder.next_image().map_err(decode_error)?;
            page_count += 1;
        }
        decoder.seek_to_image(0).map_err(decode_error)?;

        debug!(path = %path.display(), page_count, bytes = len, "Mapped input container");

        Ok(Self {
            decoder: Some(decoder),
            page_count,
            current: 0,
        })
    }

}

impl PageReader for MmapTiffReader {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn read_page(&mut self, index: usize) -> Result<Page<u16>> {
        let decoder = match self.decoder.as_mut() {
            Some(decoder) if index < self.page_count => decoder,
            _ => {
                return Err(ConversionError::DecodeError(format!(
                    "page {} out of range, container has {} pages",
                    index, self.page_count
                )));
            }
        };

        if index != self.current {
            decoder.seek_to_image(index).map_err(decode_error)?;
            self.current = index;
        }

        match decoder.colortype().map_err(decode_error)? {
            ColorType::Gray(16) => {}
            other => {
                return Err(ConversionError::UnsupportedDepth(format!(
                    "page {} is {:?}, expected 16-bit grayscale",
                    index, other
                )));
            }
        }

        let (width, height) = decoder.dimensions().map_err(decode_error)?;

        let data = match decoder.read_image().map_err(decode_error)? {
            DecodingResult::U16(data) => data,
            _ => {
                return Err(ConversionError::UnsupportedDepth(format!(
                    "page {} does not hold unsigned 16-bit samples",
                    index
                )));
            }
        };

        debug!(index, width, height, "Decoded page");

        Page::new(width as usize, height as usize, data)
    }
}

fn decode_error(e: tiff::TiffError) -> ConversionError {
    ConversionError::DecodeError(e.to_string())
}

/// Reads the first IFD offset from a classic or BigTIFF header. Zero means no pages.
fn first_ifd_offset(bytes: &[u8]) -> Result<u64> {
    let little_endian = match &bytes[..2] {
        b"II" => true,
        b"MM" => false,
        other => {
            return Err(ConversionError::DecodeError(format!(
                "not a TIFF file, byte order mark {:02x?}",
                other
            )));
        }
    };

    let mut magic = [0u8; 2];
    magic.copy_from_slice(&bytes[2..4]);
    let magic = if little_endian {
        u16::from_le_bytes(magic)
    } else {
        u16::from_be_bytes(magic)
    };

    match magic {
        42 => {
            let mut offset = [0u8; 4];
            offset.copy_from_slice(&bytes[4..CLASSIC_HEADER_LEN]);
            Ok(u64::from(if little_endian {
                u32::from_le_bytes(offset)
            } else {
                u32::from_be_bytes(offset)
            }))
        }
        43 => {
            if bytes.len() < BIG_HEADER_LEN {
                return Err(ConversionError::DecodeError(
                    "truncated BigTIFF header".to_string(),
                ));
            }
            let mut offset = [0u8; 8];
            offset.copy_from_slice(&bytes[8..BIG_HEADER_LEN]);
            Ok(if little_endian {
                u64::from_le_bytes(offset)
            } else {
                u64::from_be_bytes(offset)
            })
        }
        other => Err(ConversionError::DecodeError(format!(
            "unknown TIFF magic number {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_offset_classic_little_endian() {
        let header = [b'I', b'I', 42, 0, 8, 0, 0, 0];
        assert_eq!(first_ifd_offset(&header).unwrap(), 8);
    }

    #[test]
    fn header_offset_classic_big_endian() {
        let header = [b'M', b'M', 0, 42, 0, 0, 1, 0];
        assert_eq!(first_ifd_offset(&header).unwrap(), 256);
    }

    #[test]
    fn header_offset_bigtiff_without_pages() {
        let header = [b'I', b'I', 43, 0, 8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(first_ifd_offset(&header).unwrap(), 0);
    }

    #[test]
    fn header_rejects_garbage() {
        let err = first_ifd_offset(b"PK\x03\x04abcd").unwrap_err();
        assert!(matches!(err, ConversionError::DecodeError(_)));

        let err = first_ifd_offset(&[b'I', b'I', 43, 0, 8, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, ConversionError::DecodeError(_)));
    }

    #[test]
    fn missing_input_is_reported_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            MmapTiffReader::open(dir.path().join("absent.tif")),
            Err(ConversionError::InputNotFound(_))
        ));
    }

    #[test]
    fn truncated_input_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.tif");
        std::fs::write(&path, b"II*").unwrap();
        assert!(matches!(
            MmapTiffReader::open(&path),
            Err(ConversionError::DecodeError(_))
        ));
    }
}
