//! Markdown processing module.
//!
//! # Architecture
//!
//! - [`core`]: `MarkdownProcessor` construction and the rendering pipeline
//! - [`transforms`]: the DOM stages run on every document
//! - [`process`]: file and batch helpers
//! - [`types`]: options, the processor struct and the stage trait
pub mod core;
pub mod process;
pub mod transforms;
pub mod types;

pub use process::{
  collect_markdown_files,
  is_markdown_file,
  process_batch,
  process_markdown_file,
};
pub use transforms::{
  CodeHighlightTransformer,
  EXTERNAL_LINK_REL,
  ExternalLinkTransformer,
  FigureTransformer,
  HeadingIdTransformer,
  LazyImageTransformer,
};
pub use types::{
  DEFAULT_FIGURE_CLASS,
  DEFAULT_SITE_DOMAIN,
  HtmlTransformer,
  MarkdownOptions,
  MarkdownOptionsBuilder,
  MarkdownProcessor,
};

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn test_builder_matches_struct_literal() {
    let built = MarkdownOptionsBuilder::new()
      .gfm(false)
      .highlight_code(false)
      .site_domain("example.org")
      .figure_class("shot")
      .build();

    assert_eq!(built, MarkdownOptions {
      gfm:            false,
      highlight_code: false,
      site_domain:    "example.org".to_string(),
      figure_class:   "shot".to_string(),
    });
  }

  #[test]
  fn test_default_options() {
    let options = MarkdownOptions::default();
    assert_eq!(options.site_domain, DEFAULT_SITE_DOMAIN);
    assert_eq!(options.figure_class, DEFAULT_FIGURE_CLASS);
    assert!(options.validate().is_ok());
  }

  #[test]
  fn test_processor_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<MarkdownProcessor>();
  }

  #[test]
  fn test_gfm_toggle() {
    let markdown = "~~gone~~";
    let without_gfm = MarkdownProcessor::new(
      MarkdownOptionsBuilder::new()
        .gfm(false)
        .highlight_code(false)
        .build(),
    )
    .expect("valid options");
    assert!(!without_gfm.render(markdown).expect("render").contains("<del>"));

    let with_gfm = MarkdownProcessor::new(
      MarkdownOptionsBuilder::new()
        .gfm(true)
        .highlight_code(false)
        .build(),
    )
    .expect("valid options");
    assert!(with_gfm.render(markdown).expect("render").contains("<del>"));
  }
}
