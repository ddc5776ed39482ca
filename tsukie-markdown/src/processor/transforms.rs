//! DOM stages of the rendering pipeline.
//!
//! Each stage is an [`HtmlTransformer`] working on the kuchikikiki document
//! produced by re-parsing comrak's output, so raw HTML written in an article
//! is rewritten exactly like HTML generated from markdown syntax.
use std::sync::Arc;

use kuchikikiki::{Attribute, ExpandedName, NodeRef};
use log::{debug, trace, warn};
use markup5ever::{LocalName, QualName, local_name, ns};
use tendril::TendrilSink;

use super::types::HtmlTransformer;
use crate::{
  error::{RenderError, RenderResult},
  syntax::{SyntaxError, SyntaxManager},
  utils::Slugger,
};

/// `rel` value for links leaving the site.
pub const EXTERNAL_LINK_REL: &str = "nofollow noopener noreferrer";

/// Select every node matching `selector`, collected up front so callers can
/// rewrite the tree while walking the result.
pub(crate) fn select_nodes(
  document: &NodeRef,
  selector: &str,
  stage: &'static str,
) -> RenderResult<Vec<NodeRef>> {
  let selected = document.select(selector).map_err(|()| {
    RenderError::stage(stage, format!("invalid selector '{selector}'"))
  })?;
  Ok(selected.map(|node| node.as_node().clone()).collect())
}

/// Read an attribute of an element node.
fn attribute(node: &NodeRef, name: &str) -> Option<String> {
  node
    .as_element()
    .and_then(|element| element.attributes.borrow().get(name).map(str::to_string))
}

/// Set an attribute on an element node, replacing any previous value.
fn set_attribute(node: &NodeRef, name: &str, value: &str) {
  if let Some(element) = node.as_element() {
    element
      .attributes
      .borrow_mut()
      .insert(name, value.to_string());
  }
}

/// Create a new HTML element with the given attributes.
fn new_element(name: LocalName, attributes: &[(&str, &str)]) -> NodeRef {
  NodeRef::new_element(
    QualName::new(None, ns!(html), name),
    attributes.iter().map(|(key, value)| {
      (ExpandedName::new("", *key), Attribute {
        prefix: None,
        value:  (*value).to_string(),
      })
    }),
  )
}

/// Wraps images standing alone in a top-level paragraph in `<figure>`.
///
/// The image's `alt` text becomes the `<figcaption>`. A paragraph holding
/// several images becomes a `{class}-container` div of figures; hard line
/// breaks between them are dropped. Paragraphs
/// that mix images with text, or images nested in links, are left alone.
pub struct FigureTransformer {
  class: String,
}

impl FigureTransformer {
  #[must_use]
  pub fn new(class: impl Into<String>) -> Self {
    Self {
      class: class.into(),
    }
  }

  /// Images of `paragraph` if it contains nothing but images, line breaks
  /// and whitespace.
  fn standalone_images(paragraph: &NodeRef) -> Option<Vec<NodeRef>> {
    let mut images = Vec::new();

    for child in paragraph.children() {
      if let Some(element) = child.as_element() {
        if element.name.local == local_name!("img") {
          images.push(child.clone());
        } else if element.name.local != local_name!("br") {
          return None;
        }
      } else if let Some(text) = child.as_text() {
        if !text.borrow().trim().is_empty() {
          return None;
        }
      } else if child.as_comment().is_none() {
        return None;
      }
    }

    if images.is_empty() { None } else { Some(images) }
  }

  fn build_figure(&self, image: NodeRef) -> NodeRef {
    let caption = attribute(&image, "alt").unwrap_or_default();
    let figure = new_element(local_name!("figure"), &[("class", &self.class)]);
    figure.append(image);

    if !caption.trim().is_empty() {
      let figcaption = new_element(local_name!("figcaption"), &[]);
      figcaption.append(NodeRef::new_text(caption));
      figure.append(figcaption);
    }

    figure
  }
}

impl HtmlTransformer for FigureTransformer {
  fn name(&self) -> &'static str {
    "figure"
  }

  fn transform(&self, document: &NodeRef) -> RenderResult<()> {
    for paragraph in select_nodes(document, "body > p", self.name())? {
      let Some(images) = Self::standalone_images(&paragraph) else {
        continue;
      };

      let mut figures: Vec<NodeRef> =
        images.into_iter().map(|img| self.build_figure(img)).collect();

      let replacement = if figures.len() == 1 {
        figures.remove(0)
      } else {
        let container_class = format!("{}-container", self.class);
        let container =
          new_element(local_name!("div"), &[("class", &container_class)]);
        for figure in figures {
          container.append(figure);
        }
        container
      };

      paragraph.insert_after(replacement);
      paragraph.detach();
    }

    Ok(())
  }
}

/// Marks every image for lazy loading and async decoding.
pub struct LazyImageTransformer;

impl HtmlTransformer for LazyImageTransformer {
  fn name(&self) -> &'static str {
    "lazy-images"
  }

  fn transform(&self, document: &NodeRef) -> RenderResult<()> {
    for image in select_nodes(document, "img", self.name())? {
      set_attribute(&image, "loading", "lazy");
      set_attribute(&image, "decoding", "async");
    }
    Ok(())
  }
}

/// Highlights `<pre><code class="language-*">` blocks.
///
/// Blocks without a language, marked `no-highlight`, or in a language the
/// backend does not know are left as they are. A backend failure on one
/// block is logged and that block stays plain.
pub struct CodeHighlightTransformer {
  manager: Arc<SyntaxManager>,
}

impl CodeHighlightTransformer {
  #[must_use]
  pub const fn new(manager: Arc<SyntaxManager>) -> Self {
    Self { manager }
  }

  fn language_of(code: &NodeRef) -> Option<String> {
    let class = attribute(code, "class")?;
    class
      .split_whitespace()
      .find_map(|c| c.strip_prefix("language-"))
      .filter(|lang| !lang.is_empty())
      .map(str::to_string)
  }

  /// Parse highlighted markup into nodes that can be moved under `<code>`.
  ///
  /// The markup is parsed inside its own `<pre><code>` so leading whitespace
  /// survives html5ever's document-start rules.
  fn parse_highlighted(&self, highlighted: &str) -> RenderResult<Vec<NodeRef>> {
    let wrapped = format!("<!DOCTYPE html><body><pre><code>{highlighted}</code></pre>");
    let fragment = kuchikikiki::parse_html().one(wrapped);
    let code = fragment.select_first("pre > code").map_err(|()| {
      RenderError::stage(self.name(), "highlighted markup lost its container")
    })?;
    Ok(code.as_node().children().collect())
  }
}

impl HtmlTransformer for CodeHighlightTransformer {
  fn name(&self) -> &'static str {
    "highlight"
  }

  fn transform(&self, document: &NodeRef) -> RenderResult<()> {
    for code in select_nodes(document, "pre > code", self.name())? {
      let Some(language) = Self::language_of(&code) else {
        trace!("Code block without a language, leaving it plain");
        continue;
      };
      if matches!(language.as_str(), "no-highlight" | "nohighlight") {
        continue;
      }

      let source = code.text_contents();
      let highlighted = match self.manager.highlight_code(&source, &language) {
        Ok(highlighted) => highlighted,
        Err(SyntaxError::UnsupportedLanguage(lang)) => {
          debug!("No grammar for language '{lang}', leaving code block plain");
          continue;
        },
        Err(e) => {
          warn!("Failed to highlight '{language}' code block: {e}");
          continue;
        },
      };

      let nodes = self.parse_highlighted(&highlighted)?;
      for child in code.children().collect::<Vec<_>>() {
        child.detach();
      }
      for node in nodes {
        code.append(node);
      }

      if let Some(pre) = code.parent() {
        let class = match attribute(&pre, "class") {
          Some(existing) if !existing.trim().is_empty() => {
            format!("{existing} highlight")
          },
          _ => "highlight".to_string(),
        };
        set_attribute(&pre, "class", &class);
      }
    }

    Ok(())
  }
}

/// Opens off-site links in a new tab without leaking the referrer.
///
/// A link is off-site when its `href` contains `http` and does not contain the
/// site domain. This is plain substring matching: a relative path that happens
/// to contain `http` counts as off-site, and so does a subdomain spelled
/// differently from the configured domain.
pub struct ExternalLinkTransformer {
  site_domain: String,
}

impl ExternalLinkTransformer {
  #[must_use]
  pub fn new(site_domain: impl Into<String>) -> Self {
    Self {
      site_domain: site_domain.into(),
    }
  }

  /// Whether `href` points away from the site.
  #[must_use]
  pub fn is_external(&self, href: &str) -> bool {
    href.contains("http") && !href.contains(self.site_domain.as_str())
  }
}

impl HtmlTransformer for ExternalLinkTransformer {
  fn name(&self) -> &'static str {
    "external-links"
  }

  fn transform(&self, document: &NodeRef) -> RenderResult<()> {
    for anchor in select_nodes(document, "a[href]", self.name())? {
      let Some(href) = attribute(&anchor, "href") else {
        continue;
      };
      if self.is_external(&href) {
        set_attribute(&anchor, "target", "_blank");
        set_attribute(&anchor, "rel", EXTERNAL_LINK_REL);
      }
    }
    Ok(())
  }
}

/// Gives every heading without a non-empty `id` a unique slug of its text.
pub struct HeadingIdTransformer;

impl HtmlTransformer for HeadingIdTransformer {
  fn name(&self) -> &'static str {
    "heading-ids"
  }

  fn transform(&self, document: &NodeRef) -> RenderResult<()> {
    let mut slugger = Slugger::new();

    for heading in select_nodes(document, "h1, h2, h3, h4, h5, h6", self.name())?
    {
      if attribute(&heading, "id").is_some_and(|id| !id.is_empty()) {
        continue;
      }
      let id = slugger.slug(&heading.text_contents());
      set_attribute(&heading, "id", &id);
    }

    Ok(())
  }
}
