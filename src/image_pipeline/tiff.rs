//! TIFF container module
//!
//! Page-level access to multi-page TIFF containers: memory-mapped reading and
//! append-only BigTIFF writing. The byte-level format is left to the `tiff` crate.

mod reader;
mod writer;
mod mmap_tiff_reader;
mod big_tiff_writer;
pub mod types;

pub use reader::{PageReader, Pages};
pub use writer::PageWriter;
pub use mmap_tiff_reader::MmapTiffReader;
pub use big_tiff_writer::BigTiffWriter;
pub use types::{Page, TiffCompression};
