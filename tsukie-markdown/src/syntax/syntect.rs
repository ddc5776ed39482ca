//! Syntect-based syntax highlighting backend enhanced with two-face.
//!
//! Uses Sublime Text syntax definitions (TextMate grammars) from the two-face
//! crate, which extends syntect's defaults with TypeScript, TOML, Dockerfile
//! and more. Output is class-based (`hl-` prefixed) so themes are applied with
//! a stylesheet instead of inline styles.

use std::sync::OnceLock;

use syntect::{
  highlighting::{Theme, ThemeSet},
  html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style},
  parsing::{SyntaxReference, SyntaxSet},
  util::LinesWithEndings,
};
use two_face::theme::{EmbeddedLazyThemeSet, EmbeddedThemeName};

use super::{
  error::{SyntaxError, SyntaxResult},
  types::{SyntaxConfig, SyntaxHighlighter, SyntaxManager},
};

/// Class style shared by highlighted markup and generated stylesheets. The
/// prefix keeps grammar scope names from colliding with site classes.
pub const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

/// Theme used when nothing else is configured.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

const EMBEDDED_THEMES: &[(&str, EmbeddedThemeName)] = &[
  ("Ansi", EmbeddedThemeName::Ansi),
  ("Base16", EmbeddedThemeName::Base16),
  ("Base16EightiesDark", EmbeddedThemeName::Base16EightiesDark),
  ("Base16MochaDark", EmbeddedThemeName::Base16MochaDark),
  ("Base16OceanDark", EmbeddedThemeName::Base16OceanDark),
  ("Base16OceanLight", EmbeddedThemeName::Base16OceanLight),
  ("Base16_256", EmbeddedThemeName::Base16_256),
  ("CatppuccinFrappe", EmbeddedThemeName::CatppuccinFrappe),
  ("CatppuccinLatte", EmbeddedThemeName::CatppuccinLatte),
  ("CatppuccinMacchiato", EmbeddedThemeName::CatppuccinMacchiato),
  ("CatppuccinMocha", EmbeddedThemeName::CatppuccinMocha),
  ("ColdarkCold", EmbeddedThemeName::ColdarkCold),
  ("ColdarkDark", EmbeddedThemeName::ColdarkDark),
  ("DarkNeon", EmbeddedThemeName::DarkNeon),
  ("Dracula", EmbeddedThemeName::Dracula),
  ("Github", EmbeddedThemeName::Github),
  ("GruvboxDark", EmbeddedThemeName::GruvboxDark),
  ("GruvboxLight", EmbeddedThemeName::GruvboxLight),
  ("InspiredGithub", EmbeddedThemeName::InspiredGithub),
  ("Leet", EmbeddedThemeName::Leet),
  ("MonokaiExtended", EmbeddedThemeName::MonokaiExtended),
  ("MonokaiExtendedBright", EmbeddedThemeName::MonokaiExtendedBright),
  ("MonokaiExtendedLight", EmbeddedThemeName::MonokaiExtendedLight),
  ("MonokaiExtendedOrigin", EmbeddedThemeName::MonokaiExtendedOrigin),
  ("Nord", EmbeddedThemeName::Nord),
  ("OneHalfDark", EmbeddedThemeName::OneHalfDark),
  ("OneHalfLight", EmbeddedThemeName::OneHalfLight),
  ("SolarizedDark", EmbeddedThemeName::SolarizedDark),
  ("SolarizedLight", EmbeddedThemeName::SolarizedLight),
  ("SublimeSnazzy", EmbeddedThemeName::SublimeSnazzy),
  ("TwoDark", EmbeddedThemeName::TwoDark),
  ("Zenburn", EmbeddedThemeName::Zenburn),
];

/// Syntect-based syntax highlighter
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntectHighlighter;

impl SyntectHighlighter {
  /// Create a new Syntect highlighter.
  #[must_use]
  pub const fn new() -> Self {
    Self
  }

  /// Get the syntect `SyntaxSet`. Built once, on first use.
  fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(two_face::syntax::extra_newlines)
  }

  /// Get the two-face theme set with extended themes.
  fn theme_set() -> &'static EmbeddedLazyThemeSet {
    static THEME_SET: OnceLock<EmbeddedLazyThemeSet> = OnceLock::new();
    THEME_SET.get_or_init(two_face::theme::extra)
  }

  /// Get the default syntect `ThemeSet`.
  fn default_theme_set() -> &'static ThemeSet {
    static DEFAULT_THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    DEFAULT_THEME_SET.get_or_init(ThemeSet::load_defaults)
  }

  fn find_syntax(language: &str) -> Option<&'static SyntaxReference> {
    Self::syntax_set().find_syntax_by_token(language)
  }

  /// Look a theme up by name, syntect defaults first, then two-face.
  fn find_theme(name: &str) -> Option<&'static Theme> {
    if let Some(theme) = Self::default_theme_set().themes.get(name) {
      return Some(theme);
    }

    EMBEDDED_THEMES
      .iter()
      .find(|(embedded, _)| embedded.eq_ignore_ascii_case(name))
      .map(|(_, embedded)| Self::theme_set().get(*embedded))
  }
}

impl SyntaxHighlighter for SyntectHighlighter {
  fn name(&self) -> &'static str {
    "Syntect"
  }

  fn supported_languages(&self) -> Vec<String> {
    Self::syntax_set()
      .syntaxes()
      .iter()
      .flat_map(|syntax| {
        std::iter::once(syntax.name.to_lowercase())
          .chain(syntax.file_extensions.iter().map(|ext| ext.to_lowercase()))
      })
      .collect()
  }

  fn available_themes(&self) -> Vec<String> {
    let mut themes: Vec<String> =
      Self::default_theme_set().themes.keys().cloned().collect();
    themes.extend(EMBEDDED_THEMES.iter().map(|(name, _)| (*name).to_string()));
    themes.sort();
    themes.dedup();
    themes
  }

  fn supports_language(&self, language: &str) -> bool {
    Self::find_syntax(language).is_some()
  }

  fn highlight(&self, code: &str, language: &str) -> SyntaxResult<String> {
    let syntax = Self::find_syntax(language)
      .ok_or_else(|| SyntaxError::UnsupportedLanguage(language.to_string()))?;

    let mut generator = ClassedHTMLGenerator::new_with_class_style(
      syntax,
      Self::syntax_set(),
      CLASS_STYLE,
    );
    for line in LinesWithEndings::from(code) {
      generator
        .parse_html_for_line_which_includes_newline(line)
        .map_err(|e| SyntaxError::HighlightingFailed(e.to_string()))?;
    }

    Ok(generator.finalize())
  }

  fn theme_css(&self, theme: &str) -> SyntaxResult<String> {
    let resolved = Self::find_theme(theme)
      .ok_or_else(|| SyntaxError::ThemeNotFound(theme.to_string()))?;

    css_for_theme_with_class_style(resolved, CLASS_STYLE)
      .map_err(|e| SyntaxError::HighlightingFailed(e.to_string()))
  }

  fn language_from_extension(&self, extension: &str) -> Option<String> {
    Self::syntax_set()
      .find_syntax_by_extension(extension)
      .map(|syntax| syntax.name.to_lowercase())
  }
}

/// Create a Syntect-based syntax manager with the default configuration.
#[must_use]
pub fn create_syntect_manager() -> SyntaxManager {
  let config = SyntaxConfig {
    default_theme: Some(DEFAULT_THEME.to_string()),
    ..SyntaxConfig::default()
  };
  SyntaxManager::new(Box::new(SyntectHighlighter::new()), config)
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn test_every_listed_theme_has_css() {
    let highlighter = SyntectHighlighter::new();
    for theme in highlighter.available_themes() {
      let css = highlighter.theme_css(&theme).expect("listed theme renders");
      assert!(css.contains(".hl-"), "{theme} has no prefixed classes");
    }
  }

  #[test]
  fn test_embedded_theme_lookup_ignores_case() {
    let highlighter = SyntectHighlighter::new();
    assert!(highlighter.has_theme("CatppuccinMocha"));
    assert!(highlighter.theme_css("catppuccinmocha").is_ok());
    assert!(matches!(
      highlighter.theme_css("VisualStudioDarkPlus"),
      Err(SyntaxError::ThemeNotFound(_))
    ));
  }
}
