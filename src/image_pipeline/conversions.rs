//! Pipeline conversions module
//!
//! The two page loops: synthesizing an oversized BigTIFF from a repeated gradient page,
//! and streaming a 16-bit container into an 8-bit one page at a time.

mod types;
mod rescale;
mod generate;
mod streaming;


pub use types::{
    ConversionConfig, ConversionConfigBuilder, GeneratorConfig, GeneratorConfigBuilder, RunReport,
};
pub use rescale::{DEFAULT_RESCALE_DIVISOR, rescale_page};
pub use generate::{SyntheticGenerator, gradient_pattern};
pub use streaming::StreamingConverter;
