//! Bounded-memory handling of oversized multi-page BigTIFF files.
//!
//! Two independent routines live here: a synthetic BigTIFF generator that repeats a
//! gradient page until a target size is reached, and a streaming converter that
//! rescales 16-bit pages to 8-bit one page at a time from a memory-mapped input.
//! Both sample process resident memory while they run.

pub mod image_pipeline;
pub mod logger;
