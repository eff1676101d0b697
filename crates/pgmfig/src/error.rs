//! Error types for pgmfig operations.
//!
//! This module provides the main error type [`PgmError`] which covers
//! declaration, rendering and export failures.

use std::io;

use thiserror::Error;

use pgmfig_core::markup::MarkupError;

/// The main error type for pgmfig operations.
///
/// Every variant is fatal: a diagram that failed to build or render is not
/// written anywhere.
#[derive(Debug, Error)]
pub enum PgmError {
    /// A node id was declared twice.
    #[error("node `{id}` is already declared")]
    DuplicateKey { id: String },

    /// An edge names a node that has not been declared.
    #[error("edge endpoint `{id}` is not a declared node")]
    UnknownNode { id: String },

    /// A node has a size or position that cannot be drawn.
    #[error("node `{id}` cannot be drawn: {reason}")]
    InvalidNode { id: String, reason: String },

    /// A node label or plate caption is not valid markup.
    #[error(transparent)]
    Markup(#[from] MarkupError),

    /// A style or render setting cannot be used.
    #[error("configuration error: {0}")]
    Config(String),

    /// The SVG scene could not be rasterized.
    #[error("render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<png::EncodingError> for PgmError {
    fn from(error: png::EncodingError) -> Self {
        match error {
            png::EncodingError::IoError(err) => Self::Io(err),
            other => Self::Export(Box::new(other)),
        }
    }
}
