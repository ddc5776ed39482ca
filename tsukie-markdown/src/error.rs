//! Error types for rendering operations.
use std::{fmt, io, string::FromUtf8Error};

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while building a processor or rendering a document.
///
/// A render either succeeds completely or fails with one of these; there is no
/// partial output.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
  #[error("Invalid processor options: {0}")]
  InvalidOptions(String),

  #[error("Stage '{stage}' failed: {message}")]
  Stage {
    stage:   &'static str,
    message: String,
  },

  #[error("Failed to format markdown as HTML: {0}")]
  Format(#[from] fmt::Error),

  #[error("Failed to serialize HTML: {0}")]
  Serialize(#[source] io::Error),

  #[error("Rendered HTML is not valid UTF-8: {0}")]
  Utf8(#[from] FromUtf8Error),

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),
}

impl RenderError {
  /// Build a [`RenderError::Stage`] for the named pipeline stage.
  pub fn stage(stage: &'static str, message: impl Into<String>) -> Self {
    Self::Stage {
      stage,
      message: message.into(),
    }
  }
}
