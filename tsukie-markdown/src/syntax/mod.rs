//! Provides a trait-based architecture for syntax highlighting that allows
//! backends to be plugged in.
//! Currently supported backends:
//! - **Syntect** - Uses Sublime Text syntax definitions, with two-face added
//!   for extended syntax definitions and themes

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{SyntaxError, SyntaxResult};
pub use types::{SyntaxConfig, SyntaxHighlighter, SyntaxManager};

// Syntect backend implementation
#[cfg(feature = "syntect")] mod syntect;
#[cfg(feature = "syntect")] pub use syntect::*;

/// Create the default syntax manager based on available features.
///
/// # Errors
///
/// Returns [`SyntaxError::NoBackendAvailable`] if the crate was built without
/// a highlighting backend.
pub fn create_default_manager() -> SyntaxResult<SyntaxManager> {
  #[cfg(feature = "syntect")]
  {
    Ok(create_syntect_manager())
  }

  #[cfg(not(feature = "syntect"))]
  {
    Err(SyntaxError::NoBackendAvailable)
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn test_syntax_config_default() {
    let config = SyntaxConfig::default();
    assert!(config.default_theme.is_none());
    assert_eq!(config.language_aliases["js"], "javascript");
    assert_eq!(config.language_aliases["yml"], "yaml");
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_syntect_highlighter() {
    let highlighter = SyntectHighlighter::new();
    assert_eq!(highlighter.name(), "Syntect");
    assert!(!highlighter.supported_languages().is_empty());
    assert!(highlighter.has_theme("InspiredGitHub"));
    assert!(highlighter.has_theme("Nord"));
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_syntect_highlight_emits_prefixed_classes() {
    let highlighter = SyntectHighlighter::new();
    let html = highlighter
      .highlight("fn main() {}\n", "rust")
      .expect("Failed to highlight code");
    assert!(html.contains("<span class=\"hl-"));
    assert!(html.contains("main"));
    assert!(!html.contains("style="));
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_syntect_unknown_language_is_an_error() {
    let highlighter = SyntectHighlighter::new();
    let result = highlighter.highlight("whatever", "definitely-not-a-lang");
    assert!(matches!(result, Err(SyntaxError::UnsupportedLanguage(_))));
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_language_resolution() {
    let manager =
      create_default_manager().expect("Failed to create default manager");

    assert_eq!(manager.resolve_language("js"), "javascript");
    assert_eq!(manager.resolve_language("PY"), "python");
    assert_eq!(manager.resolve_language("rust"), "rust");

    assert!(manager.supports("js"));
    assert!(manager.supports("ts"));
    assert!(manager.supports("toml"));
    assert!(!manager.supports("klingon"));
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_manager_rejects_unknown_language() {
    let manager =
      create_default_manager().expect("Failed to create default manager");
    let result = manager.highlight_code("x", "klingon");
    assert!(
      matches!(result, Err(SyntaxError::UnsupportedLanguage(ref lang)) if lang == "klingon")
    );
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_highlight_from_filename() {
    let manager =
      create_default_manager().expect("Failed to create default manager");
    let html = manager
      .highlight_from_filename("let x = 1;\n", "main.rs")
      .expect("Failed to highlight by filename");
    assert!(html.contains("hl-"));
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_theme_css() {
    let manager =
      create_default_manager().expect("Failed to create default manager");

    let css = manager.theme_css(None).expect("default theme css");
    assert!(css.contains(".hl-"));

    let nord = manager.theme_css(Some("Nord")).expect("nord css");
    assert!(nord.contains(".hl-"));

    assert!(matches!(
      manager.theme_css(Some("NoSuchTheme")),
      Err(SyntaxError::ThemeNotFound(_))
    ));
  }

  #[cfg(not(feature = "syntect"))]
  #[test]
  fn test_no_backend() {
    assert!(matches!(
      create_default_manager(),
      Err(SyntaxError::NoBackendAvailable)
    ));
  }
}
