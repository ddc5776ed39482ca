//! Processing functions for markdown files and batches.
use std::{
  fs,
  io,
  path::{Path, PathBuf},
};

use log::{debug, error};
use walkdir::WalkDir;

use super::types::MarkdownProcessor;
use crate::{error::RenderResult, types::MarkdownResult};

/// Recursively collect all markdown files under `dir`, sorted by path.
///
/// Unreadable entries are logged and skipped.
#[must_use]
pub fn collect_markdown_files(dir: &Path) -> Vec<PathBuf> {
  let mut files: Vec<PathBuf> = WalkDir::new(dir)
    .follow_links(true)
    .into_iter()
    .filter_map(|entry| {
      entry
        .map_err(|e| error!("Failed to read entry under {}: {e}", dir.display()))
        .ok()
    })
    .filter(|entry| entry.file_type().is_file())
    .map(walkdir::DirEntry::into_path)
    .filter(|path| is_markdown_file(path))
    .collect();

  files.sort();
  debug!("Found {} markdown files in {}", files.len(), dir.display());
  files
}

/// Whether `path` has a markdown extension.
#[must_use]
pub fn is_markdown_file(path: &Path) -> bool {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown"))
}

/// Read and render one markdown file.
///
/// # Errors
///
/// Returns [`crate::RenderError::Io`] if the file cannot be read, or any
/// rendering error.
pub fn process_markdown_file(
  processor: &MarkdownProcessor,
  path: &Path,
) -> RenderResult<MarkdownResult> {
  let content = fs::read_to_string(path)?;
  debug!("Rendering {}", path.display());
  processor.render_document(&content)
}

/// Process a batch of markdown files with consistent error handling.
///
/// Every file is rendered with the same processor. A file that cannot be read
/// or rendered yields an `Err` entry and does not stop the batch.
///
/// # Arguments
/// * `processor` - The configured markdown processor
/// * `files` - Iterator of file paths to process
/// * `read_file_fn` - Function to read file content from path
///
/// # Returns
/// Vector of tuples containing (`file_path`, `processing_result`)
pub fn process_batch<I, F>(
  processor: &MarkdownProcessor,
  files: I,
  read_file_fn: F,
) -> Vec<(String, RenderResult<MarkdownResult>)>
where
  I: IntoIterator<Item = PathBuf>,
  F: Fn(&Path) -> io::Result<String>,
{
  files
    .into_iter()
    .map(|path| {
      let path_str = path.display().to_string();
      let result = read_file_fn(&path)
        .map_err(Into::into)
        .and_then(|content| processor.render_document(&content));
      if let Err(e) = &result {
        error!("Failed to process {path_str}: {e}");
      }
      (path_str, result)
    })
    .collect()
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]

  use super::*;
  use crate::{MarkdownOptions, RenderError};

  fn processor() -> MarkdownProcessor {
    MarkdownProcessor::new(MarkdownOptions {
      highlight_code: false,
      ..Default::default()
    })
    .expect("valid options")
  }

  #[test]
  fn test_is_markdown_file() {
    assert!(is_markdown_file(Path::new("post.md")));
    assert!(is_markdown_file(Path::new("dir/Post.MD")));
    assert!(is_markdown_file(Path::new("notes.markdown")));
    assert!(!is_markdown_file(Path::new("post.html")));
    assert!(!is_markdown_file(Path::new("README")));
  }

  #[test]
  fn test_collect_markdown_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let nested = dir.path().join("2024");
    fs::create_dir(&nested).expect("mkdir");
    fs::write(dir.path().join("b.md"), "# B").expect("write");
    fs::write(nested.join("a.md"), "# A").expect("write");
    fs::write(dir.path().join("image.png"), "").expect("write");

    let files = collect_markdown_files(dir.path());
    assert_eq!(files, vec![nested.join("a.md"), dir.path().join("b.md")]);
  }

  #[test]
  fn test_process_markdown_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("post.md");
    fs::write(&path, "# Post\n\nBody").expect("write");

    let result = process_markdown_file(&processor(), &path).expect("render");
    assert_eq!(result.title.as_deref(), Some("Post"));
    assert!(result.html.contains("<p>Body</p>"));

    let missing = process_markdown_file(&processor(), &dir.path().join("nope.md"));
    assert!(matches!(missing, Err(RenderError::Io(_))));
  }

  #[test]
  fn test_process_batch_continues_after_failure() {
    let files = vec![PathBuf::from("ok.md"), PathBuf::from("broken.md")];
    let results = process_batch(&processor(), files, |path| {
      if path.ends_with("broken.md") {
        Err(io::Error::new(io::ErrorKind::NotFound, "gone"))
      } else {
        Ok("# Fine".to_string())
      }
    });

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].0, "ok.md");
    assert_eq!(
      results[0].1.as_ref().expect("first renders").title.as_deref(),
      Some("Fine")
    );
    assert!(matches!(results[1].1, Err(RenderError::Io(_))));
  }
}
