//! Type definitions for the Markdown processor.
//!
//! Contains the core types used by the processor, including:
//! - Configuration options (`MarkdownOptions`) and their builder
//! - The main processor struct (`MarkdownProcessor`)
//! - The DOM transformation trait (`HtmlTransformer`)
//!
//! # Examples
//!
//! ```
//! use tsukie_markdown::{MarkdownOptions, MarkdownProcessor};
//!
//! let options = MarkdownOptions {
//!   site_domain: "example.org".to_string(),
//!   highlight_code: false,
//!   ..Default::default()
//! };
//!
//! let processor = MarkdownProcessor::new(options).expect("valid options");
//! ```

use std::sync::Arc;

use kuchikikiki::NodeRef;

use crate::{
  error::{RenderError, RenderResult},
  syntax::SyntaxManager,
};

/// Domain of the blog; links containing it are treated as internal.
pub const DEFAULT_SITE_DOMAIN: &str = "tsukie.com";

/// Class put on generated `<figure>` elements. The site stylesheet targets it.
pub const DEFAULT_FIGURE_CLASS: &str = "rehype-figure";

/// Options for configuring the Markdown processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownOptions {
  /// Enable GitHub Flavored Markdown (GFM) extensions: tables,
  /// strikethrough, task lists, autolinks and footnotes.
  pub gfm: bool,

  /// Enable syntax highlighting for fenced code blocks.
  pub highlight_code: bool,

  /// Canonical domain of the site. Anchors whose `href` contains `http` but
  /// not this substring open in a new tab with `rel="nofollow noopener
  /// noreferrer"`.
  pub site_domain: String,

  /// Class for `<figure>` elements wrapping standalone images. Several
  /// figures from one paragraph are grouped in a `{class}-container` div.
  pub figure_class: String,
}

impl MarkdownOptions {
  /// Check static options before a processor is assembled.
  ///
  /// # Errors
  ///
  /// Returns [`RenderError::InvalidOptions`] if the site domain or figure
  /// class is empty or contains whitespace.
  pub fn validate(&self) -> RenderResult<()> {
    if self.site_domain.trim().is_empty() {
      return Err(RenderError::InvalidOptions(
        "site domain must not be empty".to_string(),
      ));
    }
    if self.site_domain.chars().any(char::is_whitespace) {
      return Err(RenderError::InvalidOptions(format!(
        "site domain '{}' must not contain whitespace",
        self.site_domain
      )));
    }
    if self.figure_class.is_empty()
      || self.figure_class.chars().any(char::is_whitespace)
    {
      return Err(RenderError::InvalidOptions(format!(
        "figure class '{}' must be a single non-empty class name",
        self.figure_class
      )));
    }
    Ok(())
  }
}

impl Default for MarkdownOptions {
  fn default() -> Self {
    Self {
      gfm:            cfg!(feature = "gfm"),
      highlight_code: cfg!(feature = "syntect"),
      site_domain:    DEFAULT_SITE_DOMAIN.to_string(),
      figure_class:   DEFAULT_FIGURE_CLASS.to_string(),
    }
  }
}

/// A single stage of the HTML phase of the pipeline.
///
/// Stages run in a fixed order on the same parsed document; each sees the
/// result of the previous one. Implementations must not keep per-document
/// state between calls.
pub trait HtmlTransformer: Send + Sync {
  /// Short stage name, used in logs and in [`RenderError::Stage`].
  fn name(&self) -> &'static str;

  /// Rewrite `document` in place.
  ///
  /// # Errors
  ///
  /// Returns an error if the document cannot be traversed or rewritten.
  fn transform(&self, document: &NodeRef) -> RenderResult<()>;
}

/// Main Markdown processor.
///
/// Assembled once and reused for any number of documents. It holds no
/// per-document state, so a shared reference can render from several threads
/// at once, and cloning is cheap.
#[derive(Clone)]
pub struct MarkdownProcessor {
  pub(crate) options:        MarkdownOptions,
  pub(crate) syntax_manager: Option<Arc<SyntaxManager>>,
  pub(crate) transformers:   Arc<[Box<dyn HtmlTransformer>]>,
}

/// Builder for constructing `MarkdownOptions` with method chaining.
#[derive(Debug, Clone)]
pub struct MarkdownOptionsBuilder {
  options: MarkdownOptions,
}

impl MarkdownOptionsBuilder {
  /// Create a new builder with default options.
  #[must_use]
  pub fn new() -> Self {
    Self {
      options: MarkdownOptions::default(),
    }
  }

  /// Enable or disable GitHub Flavored Markdown.
  #[must_use]
  pub const fn gfm(mut self, enabled: bool) -> Self {
    self.options.gfm = enabled;
    self
  }

  /// Enable or disable syntax highlighting.
  #[must_use]
  pub const fn highlight_code(mut self, enabled: bool) -> Self {
    self.options.highlight_code = enabled;
    self
  }

  /// Set the canonical site domain.
  #[must_use]
  pub fn site_domain<S: Into<String>>(mut self, domain: S) -> Self {
    self.options.site_domain = domain.into();
    self
  }

  /// Set the class used for generated figures.
  #[must_use]
  pub fn figure_class<S: Into<String>>(mut self, class: S) -> Self {
    self.options.figure_class = class.into();
    self
  }

  /// Build the final `MarkdownOptions`.
  #[must_use]
  pub fn build(self) -> MarkdownOptions {
    self.options
  }
}

impl Default for MarkdownOptionsBuilder {
  fn default() -> Self {
    Self::new()
  }
}
