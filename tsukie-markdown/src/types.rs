//! Types for the tsukie-markdown public API.
use serde::{Deserialize, Serialize};

/// A heading found in rendered HTML, used to build a table of contents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Heading {
  /// Heading depth, 1 to 3.
  pub depth: u8,
  /// The `id` attribute of the heading element.
  pub id:    String,
  /// Inner text of the heading with nested tags stripped.
  pub text:  String,
}

/// Result of rendering a full document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkdownResult {
  /// Rendered HTML output.
  pub html: String,

  /// Extracted headings, in document order.
  pub headings: Vec<Heading>,

  /// Title of the document, if found (first depth-1 heading).
  pub title: Option<String>,
}
