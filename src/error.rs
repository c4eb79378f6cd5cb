//! # Error Types
//!
//! This module defines error types used throughout the blanki library.

use thiserror::Error;

/// Main error type for blanki operations
#[derive(Debug, Error)]
pub enum BlankiError {
    /// Unrecognized document type selector
    #[error("Invalid document type: {0}")]
    InvalidDocumentType(String),

    /// Font registration error
    #[error("Font error: {0}")]
    Font(String),

    /// Image decoding or embedding error
    #[error("Image error: {0}")]
    Image(String),

    /// PDF document construction or serialization error
    #[error("PDF error: {0}")]
    Pdf(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
