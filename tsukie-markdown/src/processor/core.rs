//! Core implementation of the Markdown processor.
//!
//! Assembles the stage list once and runs it for every document: comrak turns
//! markdown into HTML text, kuchikikiki re-parses that text into a DOM, the
//! [`HtmlTransformer`] stages rewrite the DOM, and the body is serialized back.
use std::sync::Arc;

use comrak::{Arena, options::Options, parse_document};
use kuchikikiki::NodeRef;
use log::{debug, trace, warn};
use tendril::TendrilSink;

use super::{
  transforms::{
    CodeHighlightTransformer,
    ExternalLinkTransformer,
    FigureTransformer,
    HeadingIdTransformer,
    LazyImageTransformer,
  },
  types::{HtmlTransformer, MarkdownOptions, MarkdownProcessor},
};
use crate::{
  error::{RenderError, RenderResult},
  syntax::{SyntaxManager, create_default_manager},
  types::MarkdownResult,
  utils,
};

impl MarkdownProcessor {
  /// Create a new `MarkdownProcessor` with the given options.
  ///
  /// If highlighting is requested but the crate was built without a backend,
  /// a warning is logged and code blocks are left plain.
  ///
  /// # Errors
  ///
  /// Returns [`RenderError::InvalidOptions`] if `options` fail
  /// [`MarkdownOptions::validate`].
  pub fn new(options: MarkdownOptions) -> RenderResult<Self> {
    options.validate()?;

    let syntax_manager = if options.highlight_code {
      match create_default_manager() {
        Ok(manager) => Some(Arc::new(manager)),
        Err(e) => {
          warn!("Syntax highlighting disabled: {e}");
          None
        },
      }
    } else {
      None
    };

    let mut transformers: Vec<Box<dyn HtmlTransformer>> = vec![
      Box::new(FigureTransformer::new(options.figure_class.clone())),
      Box::new(LazyImageTransformer),
    ];
    if let Some(manager) = &syntax_manager {
      transformers.push(Box::new(CodeHighlightTransformer::new(Arc::clone(
        manager,
      ))));
    }
    transformers.push(Box::new(ExternalLinkTransformer::new(
      options.site_domain.clone(),
    )));
    transformers.push(Box::new(HeadingIdTransformer));

    debug!(
      "Markdown pipeline: {}",
      transformers
        .iter()
        .map(|t| t.name())
        .collect::<Vec<_>>()
        .join(" -> ")
    );

    Ok(Self {
      options,
      syntax_manager,
      transformers: transformers.into(),
    })
  }

  /// Access processor options.
  #[must_use]
  pub const fn options(&self) -> &MarkdownOptions {
    &self.options
  }

  /// The syntax manager used for code blocks, if highlighting is active.
  #[must_use]
  pub fn syntax_manager(&self) -> Option<&SyntaxManager> {
    self.syntax_manager.as_deref()
  }

  /// Names of the DOM stages in the order they run.
  #[must_use]
  pub fn stage_names(&self) -> Vec<&'static str> {
    self.transformers.iter().map(|t| t.name()).collect()
  }

  /// Render markdown to an HTML fragment.
  ///
  /// The output is the serialized content of the document body, without
  /// `<html>`, `<head>` or `<body>` wrappers.
  ///
  /// # Errors
  ///
  /// Returns an error if comrak output cannot be formatted, if a stage fails,
  /// or if the rewritten document cannot be serialized.
  pub fn render(&self, markdown: &str) -> RenderResult<String> {
    debug!("Rendering {} bytes of markdown", markdown.len());

    let html = self.markdown_to_html(markdown)?;
    let document = parse_fragment(&html);

    for transformer in self.transformers.iter() {
      trace!("Running stage '{}'", transformer.name());
      transformer.transform(&document)?;
    }

    let body = serialize_body(&document)?;
    Ok(utils::strip_undefined_paragraphs(&body))
  }

  /// Render markdown and collect its heading outline and title.
  ///
  /// The title is the text of the first `h1`, if any.
  ///
  /// # Errors
  ///
  /// Same as [`MarkdownProcessor::render`].
  pub fn render_document(&self, markdown: &str) -> RenderResult<MarkdownResult> {
    let html = self.render(markdown)?;
    let headings = utils::extract_headings(&html);
    let title = headings
      .iter()
      .find(|h| h.depth == 1)
      .map(|h| h.text.clone());

    Ok(MarkdownResult {
      html,
      headings,
      title,
    })
  }

  /// Convert markdown to HTML text using comrak and configured options.
  fn markdown_to_html(&self, markdown: &str) -> RenderResult<String> {
    let arena = Arena::new();
    let options = self.comrak_options();
    let root = parse_document(&arena, markdown, &options);

    let mut html = String::new();
    comrak::format_html(root, &options, &mut html)?;
    trace!("comrak produced {} bytes of HTML", html.len());
    Ok(html)
  }

  /// Build comrak options from `MarkdownOptions`.
  fn comrak_options(&self) -> Options<'_> {
    let mut options = Options::default();
    if self.options.gfm {
      options.extension.table = true;
      options.extension.strikethrough = true;
      options.extension.tasklist = true;
      options.extension.autolink = true;
      options.extension.footnotes = true;
    }
    // Ids come from the heading stage.
    options.extension.header_ids = None;
    options.render.r#unsafe = true;
    options
  }
}

/// Parse an HTML fragment into a full document.
///
/// The explicit `<body>` keeps a leading `<style>`, `<script>` or `<link>` in
/// the body instead of letting html5ever hoist it into `<head>`.
fn parse_fragment(html: &str) -> NodeRef {
  kuchikikiki::parse_html().one(format!("<!DOCTYPE html><body>{html}"))
}

/// Serialize the children of `<body>`.
fn serialize_body(document: &NodeRef) -> RenderResult<String> {
  let body = document
    .select_first("body")
    .map_err(|()| RenderError::stage("serialize", "document has no body"))?;

  let mut bytes = Vec::new();
  for child in body.as_node().children() {
    child.serialize(&mut bytes).map_err(RenderError::Serialize)?;
  }

  Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use super::*;

  fn plain_processor() -> MarkdownProcessor {
    let options = MarkdownOptions {
      highlight_code: false,
      ..Default::default()
    };
    MarkdownProcessor::new(options).expect("valid options")
  }

  #[test]
  fn test_stage_order() {
    let processor = plain_processor();
    assert_eq!(processor.stage_names(), vec![
      "figure",
      "lazy-images",
      "external-links",
      "heading-ids",
    ]);
    assert!(processor.syntax_manager().is_none());
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_stage_order_with_highlighting() {
    let processor =
      MarkdownProcessor::new(MarkdownOptions::default()).expect("valid options");
    assert_eq!(processor.stage_names(), vec![
      "figure",
      "lazy-images",
      "highlight",
      "external-links",
      "heading-ids",
    ]);
    assert!(processor.syntax_manager().is_some());
  }

  #[test]
  fn test_invalid_options_rejected() {
    let options = MarkdownOptions {
      site_domain: "tsukie .com".to_string(),
      ..Default::default()
    };
    assert!(matches!(
      MarkdownProcessor::new(options),
      Err(RenderError::InvalidOptions(_))
    ));

    let options = MarkdownOptions {
      figure_class: String::new(),
      ..Default::default()
    };
    assert!(matches!(
      MarkdownProcessor::new(options),
      Err(RenderError::InvalidOptions(_))
    ));
  }

  #[test]
  fn test_raw_style_stays_in_output() {
    let processor = plain_processor();
    let html = processor
      .render("<style>p { color: red; }</style>\n\ntext")
      .expect("render");
    assert!(html.starts_with("<style>"));
    assert!(html.contains("<p>text</p>"));
    assert!(!html.contains("<body>"));
    assert!(!html.contains("<head>"));
  }

  #[test]
  fn test_empty_input() {
    let processor = plain_processor();
    assert_eq!(processor.render("").expect("render"), "");

    let result = processor.render_document("").expect("render");
    assert!(result.headings.is_empty());
    assert!(result.title.is_none());
  }

  #[test]
  fn test_title_is_first_h1() {
    let processor = plain_processor();
    let result = processor
      .render_document("## Before\n\n# The *Title*\n\n# Second")
      .expect("render");
    assert_eq!(result.title.as_deref(), Some("The Title"));
    assert_eq!(result.headings.len(), 3);
    assert_eq!(result.headings[0].id, "before");
  }
}
