//! Common utilities module
//!
//! Shared error type used across the generator and the streaming converter.

pub mod error;

pub use error::{ConversionError, Result};
