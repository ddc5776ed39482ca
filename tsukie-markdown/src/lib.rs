//! # tsukie-markdown - Markdown renderer for the tsukie blog
//!
//! Turns a markdown article into the HTML fragment the blog serves: GFM
//! syntax, raw HTML passed through, standalone images turned into figures,
//! lazy-loaded images, off-site links opened in a new tab, slugged heading ids
//! and class-based syntax highlighting.
//!
//! ## Quick Start
//!
//! ```rust
//! use tsukie_markdown::{MarkdownOptions, MarkdownProcessor};
//!
//! let processor =
//!   MarkdownProcessor::new(MarkdownOptions::default()).expect("valid options");
//! let html = processor
//!   .render("# Hello World\n\nSome **text**.")
//!   .expect("render");
//!
//! assert!(html.contains(r#"<h1 id="hello-world">Hello World</h1>"#));
//! assert!(html.contains("<strong>text</strong>"));
//! ```
//!
//! ## Table of contents
//!
//! ```rust
//! use tsukie_markdown::{MarkdownOptions, MarkdownProcessor};
//!
//! let processor =
//!   MarkdownProcessor::new(MarkdownOptions::default()).expect("valid options");
//! let result = processor
//!   .render_document("# Post\n\n## Intro\n\n## Usage")
//!   .expect("render");
//!
//! assert_eq!(result.title.as_deref(), Some("Post"));
//! let ids: Vec<_> = result.headings.iter().map(|h| h.id.as_str()).collect();
//! assert_eq!(ids, ["post", "intro", "usage"]);
//! ```
//!
//! A processor is built once and shared; rendering takes `&self` and may run
//! on several threads at once.

mod error;
pub mod processor;
pub mod syntax;
mod types;
pub mod utils;

pub use crate::{
  error::{RenderError, RenderResult},
  processor::{
    HtmlTransformer,
    MarkdownOptions,
    MarkdownOptionsBuilder,
    MarkdownProcessor,
    collect_markdown_files,
    process_batch,
    process_markdown_file,
  },
  syntax::create_default_manager,
  types::{Heading, MarkdownResult},
  utils::{extract_headings, strip_undefined_paragraphs},
};
