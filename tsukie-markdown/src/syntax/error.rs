//! Errors reported by highlighting backends.

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
  /// No grammar matches the requested language or any of its aliases.
  #[error("No grammar for language '{0}'")]
  UnsupportedLanguage(String),

  #[error("Unknown highlighting theme '{0}'")]
  ThemeNotFound(String),

  /// The backend failed on a language it claims to support.
  #[error("Highlighter failed: {0}")]
  HighlightingFailed(String),

  #[error("Built without a highlighting backend; enable the 'syntect' feature")]
  NoBackendAvailable,
}
