//! Error types for Plinth operations.
//!
//! This module provides the main error type [`PlinthError`] which wraps the
//! error conditions that can occur while loading or saving diagrams.

use std::io;

use thiserror::Error;

use plinth_codec::DecodeError;

/// The main error type for Plinth operations.
///
/// # Diagnostic Variants
///
/// The `Decode` variant keeps the source text next to the error, so a
/// syntax error position can be shown in context.
#[derive(Debug, Error)]
pub enum PlinthError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Decode { err: DecodeError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PlinthError {
    /// Create a new `Decode` error with the associated source text.
    pub fn new_decode_error(err: DecodeError, src: impl Into<String>) -> Self {
        Self::Decode {
            err,
            src: src.into(),
        }
    }
}
