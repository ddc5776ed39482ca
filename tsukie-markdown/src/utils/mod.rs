use std::sync::LazyLock;

pub mod slug;

use regex::Regex;
pub use slug::{Slugger, slugify};

use crate::types::Heading;

/// Paragraph emitted by the note export for blocks it could not convert.
pub const UNDEFINED_PARAGRAPH: &str = "<p>undefined</p>";

/// Remove every exact `<p>undefined</p>` from rendered HTML.
///
/// Only that exact paragraph goes; `<p>it is undefined behavior</p>` and any
/// other paragraph are left alone. Running it twice changes nothing.
#[must_use]
pub fn strip_undefined_paragraphs(html: &str) -> String {
  html.replace(UNDEFINED_PARAGRAPH, "")
}

/// Extract `h1`-`h3` headings that carry an `id` from rendered HTML.
///
/// This is a lexical scan, not an HTML parse. It expects `id` to be the first
/// attribute and headings not to nest, which holds for renderer output.
/// Nested tags are stripped from the captured text; entities are kept as-is.
#[must_use]
pub fn extract_headings(html: &str) -> Vec<Heading> {
  static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<h([123])\s+id="([^"]+)"[^>]*>(.*?)</h[123]>"#)
      .unwrap_or_else(|e| {
        log::error!("Failed to compile HEADING_RE regex: {e}");
        never_matching_regex()
      })
  });
  static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<[^>]+>").unwrap_or_else(|e| {
      log::error!("Failed to compile TAG_RE regex: {e}");
      never_matching_regex()
    })
  });

  HEADING_RE
    .captures_iter(html)
    .filter_map(|caps| {
      let depth = caps[1].parse::<u8>().ok()?;
      Some(Heading {
        depth,
        id: caps[2].to_string(),
        text: TAG_RE.replace_all(&caps[3], "").into_owned(),
      })
    })
    .collect()
}

/// Create a regex that never matches anything.
///
/// Used as a fallback when a regex fails to compile.
///
/// # Panics
///
/// Panics if the fallback pattern fails to compile, which should never happen.
#[must_use]
pub fn never_matching_regex() -> Regex {
  #[allow(
    clippy::expect_used,
    reason = "This pattern is guaranteed to be valid"
  )]
  Regex::new(r"[^\s\S]").expect("regex pattern [^\\s\\S] should always compile")
}
