//! # Error Types
//!
//! This module defines error types used throughout the labelsheet library.
//!
//! Every variant is fatal: a label run either produces a complete document or
//! nothing at all.

use thiserror::Error;

/// Main error type for labelsheet operations
#[derive(Debug, Error)]
pub enum LabelError {
    /// Serial range rejected before any work began
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// Serial cannot be represented as a Code 128 symbol
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Symbol could not be rasterized at the requested size
    #[error("Render error: {0}")]
    Render(String),

    /// Raster could not be decoded back into a serial
    #[error("Decode error: {0}")]
    Decode(String),

    /// Document is structurally inconsistent and cannot be written
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Sheet geometry is unusable
    #[error("Config error: {0}")]
    Config(String),

    /// Image processing error
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
