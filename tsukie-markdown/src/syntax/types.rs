//! The highlighting backend seam and the alias-aware manager in front of it.

use std::{collections::HashMap, path::Path};

use super::error::{SyntaxError, SyntaxResult};

/// Fence names that differ from the grammar name the backend knows.
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
  ("js", "javascript"),
  ("jsx", "javascript"),
  ("ts", "typescript"),
  ("py", "python"),
  ("rb", "ruby"),
  ("rs", "rust"),
  ("sh", "bash"),
  ("shell", "bash"),
  ("zsh", "bash"),
  ("yml", "yaml"),
  ("md", "markdown"),
  ("cs", "c#"),
  ("csharp", "c#"),
];

/// A syntax highlighting backend.
///
/// Backends emit class-based markup: `<span>` elements carrying CSS classes,
/// colored by the stylesheet [`SyntaxHighlighter::theme_css`] generates.
/// Rendered posts therefore do not depend on the theme the site ships.
pub trait SyntaxHighlighter: Send + Sync {
  /// Backend name, for logs.
  fn name(&self) -> &'static str;

  /// Lowercase names and extensions of every known grammar.
  fn supported_languages(&self) -> Vec<String>;

  /// Names of the themes [`SyntaxHighlighter::theme_css`] accepts.
  fn available_themes(&self) -> Vec<String>;

  fn supports_language(&self, language: &str) -> bool {
    self
      .supported_languages()
      .iter()
      .any(|lang| lang.eq_ignore_ascii_case(language))
  }

  fn has_theme(&self, theme: &str) -> bool {
    self
      .available_themes()
      .iter()
      .any(|t| t.eq_ignore_ascii_case(theme))
  }

  /// Highlight `code` as `language` (case-insensitive).
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::UnsupportedLanguage`] when the language is not
  /// known, or [`SyntaxError::HighlightingFailed`] when the backend fails
  /// mid-way.
  fn highlight(&self, code: &str, language: &str) -> SyntaxResult<String>;

  /// Stylesheet for the classes [`SyntaxHighlighter::highlight`] emits.
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::ThemeNotFound`] for an unknown theme.
  fn theme_css(&self, theme: &str) -> SyntaxResult<String>;

  fn language_from_extension(&self, extension: &str) -> Option<String>;

  fn language_from_filename(&self, filename: &str) -> Option<String> {
    Path::new(filename)
      .extension()
      .and_then(|ext| ext.to_str())
      .and_then(|ext| self.language_from_extension(ext))
  }
}

/// Settings the manager applies in front of the backend.
#[derive(Debug, Clone)]
pub struct SyntaxConfig {
  /// Theme used by [`SyntaxManager::theme_css`] when none is asked for.
  pub default_theme: Option<String>,

  /// Lowercase fence name to grammar name.
  pub language_aliases: HashMap<String, String>,
}

impl Default for SyntaxConfig {
  fn default() -> Self {
    Self {
      default_theme:    None,
      language_aliases: LANGUAGE_ALIASES
        .iter()
        .map(|(alias, target)| ((*alias).to_string(), (*target).to_string()))
        .collect(),
    }
  }
}

/// Resolves fence names through [`SyntaxConfig`] and hands code to a backend.
pub struct SyntaxManager {
  highlighter: Box<dyn SyntaxHighlighter>,
  config:      SyntaxConfig,
}

impl SyntaxManager {
  #[must_use]
  pub fn new(
    highlighter: Box<dyn SyntaxHighlighter>,
    config: SyntaxConfig,
  ) -> Self {
    Self {
      highlighter,
      config,
    }
  }

  #[must_use]
  pub fn highlighter(&self) -> &dyn SyntaxHighlighter {
    self.highlighter.as_ref()
  }

  #[must_use]
  pub const fn config(&self) -> &SyntaxConfig {
    &self.config
  }

  /// Lowercase `language` and follow its alias, if it has one.
  #[must_use]
  pub fn resolve_language(&self, language: &str) -> String {
    let lowered = language.to_lowercase();
    self
      .config
      .language_aliases
      .get(&lowered)
      .cloned()
      .unwrap_or(lowered)
  }

  /// Whether `language` (or its alias target) can be highlighted.
  #[must_use]
  pub fn supports(&self, language: &str) -> bool {
    self
      .highlighter
      .supports_language(&self.resolve_language(language))
  }

  /// Highlight `code` written in the fence language `language`.
  ///
  /// There is no plain-text fallback: callers decide what to do with code in
  /// a language the backend does not know.
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::UnsupportedLanguage`] with the resolved name if
  /// the backend has no grammar for it, or any error the backend reports.
  pub fn highlight_code(
    &self,
    code: &str,
    language: &str,
  ) -> SyntaxResult<String> {
    let resolved = self.resolve_language(language);
    if !self.highlighter.supports_language(&resolved) {
      return Err(SyntaxError::UnsupportedLanguage(resolved));
    }
    self.highlighter.highlight(code, &resolved)
  }

  /// Highlight code, detecting the language from a filename.
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::UnsupportedLanguage`] if no grammar matches the
  /// file extension.
  pub fn highlight_from_filename(
    &self,
    code: &str,
    filename: &str,
  ) -> SyntaxResult<String> {
    let language = self
      .highlighter
      .language_from_filename(filename)
      .ok_or_else(|| SyntaxError::UnsupportedLanguage(filename.to_string()))?;
    self.highlight_code(code, &language)
  }

  /// Stylesheet for `theme`, or the configured default theme.
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::ThemeNotFound`] if no theme was given and none is
  /// configured, or if the backend does not know the theme.
  pub fn theme_css(&self, theme: Option<&str>) -> SyntaxResult<String> {
    let theme = theme
      .or(self.config.default_theme.as_deref())
      .ok_or_else(|| SyntaxError::ThemeNotFound("<none>".to_string()))?;
    self.highlighter.theme_css(theme)
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use super::*;

  /// Wraps code in a single span naming the language.
  struct Echo;

  impl SyntaxHighlighter for Echo {
    fn name(&self) -> &'static str {
      "echo"
    }

    fn supported_languages(&self) -> Vec<String> {
      vec!["javascript".to_string(), "rust".to_string()]
    }

    fn available_themes(&self) -> Vec<String> {
      vec!["plain".to_string()]
    }

    fn highlight(&self, code: &str, language: &str) -> SyntaxResult<String> {
      Ok(format!("<span class=\"hl-{language}\">{code}</span>"))
    }

    fn theme_css(&self, theme: &str) -> SyntaxResult<String> {
      if self.has_theme(theme) {
        Ok(".hl-rust {}".to_string())
      } else {
        Err(SyntaxError::ThemeNotFound(theme.to_string()))
      }
    }

    fn language_from_extension(&self, extension: &str) -> Option<String> {
      (extension == "rs").then(|| "rust".to_string())
    }
  }

  fn manager(default_theme: Option<&str>) -> SyntaxManager {
    SyntaxManager::new(Box::new(Echo), SyntaxConfig {
      default_theme: default_theme.map(str::to_string),
      ..SyntaxConfig::default()
    })
  }

  #[test]
  fn test_aliases_resolve_before_backend() {
    let manager = manager(None);
    assert_eq!(
      manager.highlight_code("x", "JS").expect("alias resolves"),
      "<span class=\"hl-javascript\">x</span>"
    );
    assert!(manager.supports("RS"));
    assert!(!manager.supports("python"));
  }

  #[test]
  fn test_unsupported_reports_resolved_name() {
    let err = manager(None)
      .highlight_code("x", "py")
      .expect_err("python is unknown to the backend");
    assert!(matches!(err, SyntaxError::UnsupportedLanguage(ref l) if l == "python"));
  }

  #[test]
  fn test_filename_detection() {
    let manager = manager(None);
    assert!(manager.highlight_from_filename("x", "lib.rs").is_ok());
    assert!(matches!(
      manager.highlight_from_filename("x", "notes.txt"),
      Err(SyntaxError::UnsupportedLanguage(_))
    ));
  }

  #[test]
  fn test_theme_css_default() {
    assert!(manager(Some("plain")).theme_css(None).is_ok());
    assert!(matches!(
      manager(None).theme_css(None),
      Err(SyntaxError::ThemeNotFound(_))
    ));
    assert!(matches!(
      manager(None).theme_css(Some("neon")),
      Err(SyntaxError::ThemeNotFound(_))
    ));
  }
}
