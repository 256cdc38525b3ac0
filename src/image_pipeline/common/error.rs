use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Input file not found: {0}")]
    InputNotFound(String),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),
    
    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),
    
    #[error("Failed to decode TIFF page: {0}")]
    DecodeError(String),
    
    #[error("Failed to encode TIFF page: {0}")]
    EncodeError(String),

    #[error("Unsupported sample depth: {0}")]
    UnsupportedDepth(String),
    
    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),
    
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConversionError>;
