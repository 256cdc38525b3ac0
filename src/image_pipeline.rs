//! Image processing pipeline module
//!
//! Container access lives in [`tiff`], memory observation in [`memory`], and the two
//! page loops (synthesis and 16-to-8-bit streaming) in [`conversions`].

pub mod tiff;
pub mod memory;
pub mod conversions;
pub mod common;

pub use self::common::{
    ConversionError,
    Result,
};

pub use self::tiff::{
    Page,
    PageReader,
    Pages,
    PageWriter,
    MmapTiffReader,
    BigTiffWriter,
    TiffCompression,
};

pub use self::memory::{
    MemoryProbe,
    SysinfoProbe,
    MemorySample,
    MemoryLog,
    MemorySampler,
    ProgressEvent,
    ProgressSink,
    ConsoleProgress,
    TracingProgress,
    NoProgress,
};

pub use self::conversions::{
    ConversionConfig,
    ConversionConfigBuilder,
    GeneratorConfig,
    GeneratorConfigBuilder,
    RunReport,
    DEFAULT_RESCALE_DIVISOR,
    StreamingConverter,
    SyntheticGenerator,
    gradient_pattern,
    rescale_page,
};
