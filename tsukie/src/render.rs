use std::{
  collections::HashMap,
  fs,
  io::{self, Write},
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Context, Result, bail};
use log::{debug, error, info};
use rayon::prelude::*;
use tsukie_config::Config;
use tsukie_markdown::{
  MarkdownProcessor,
  MarkdownResult,
  collect_markdown_files,
  process_markdown_file,
};

/// A markdown file to render and where its output goes, relative to the
/// output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Source {
  path:     PathBuf,
  relative: PathBuf,
}

/// Build the processor described by `config`.
pub fn build_processor(config: &Config) -> Result<MarkdownProcessor> {
  MarkdownProcessor::new(config.to_markdown_options())
    .wrap_err("Failed to set up the markdown processor")
}

/// Render `inputs` according to `config`.
///
/// A single file without `output` is printed to stdout. Everything else is
/// written below `output`, or below the configured output directory, keeping
/// the layout of each input directory.
pub fn run(
  config: &Config,
  inputs: &[PathBuf],
  output: Option<&Path>,
  write_headings: bool,
) -> Result<()> {
  let processor = build_processor(config)?;

  if let ([single], None) = (inputs, output)
    && single.is_file()
  {
    let result = process_markdown_file(&processor, single)
      .wrap_err_with(|| format!("Failed to render {}", single.display()))?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(result.html.as_bytes())?;
    return Ok(());
  }

  let sources = collect_sources(inputs)?;
  if sources.is_empty() {
    info!("No markdown files found");
    return Ok(());
  }

  let output_dir = output.unwrap_or(config.output_dir.as_path());
  fs::create_dir_all(output_dir).wrap_err_with(|| {
    format!("Failed to create output directory {}", output_dir.display())
  })?;
  info!(
    "Rendering {} files into {}",
    sources.len(),
    output_dir.display()
  );

  let thread_count = config.jobs.unwrap_or_else(num_cpus::get);
  let pool = rayon::ThreadPoolBuilder::new()
    .num_threads(thread_count)
    .build()
    .wrap_err("Failed to build the render thread pool")?;

  let failures: Vec<&Source> = pool.install(|| {
    sources
      .par_iter()
      .filter(|source| {
        match render_source(&processor, source, output_dir, write_headings) {
          Ok(()) => false,
          Err(e) => {
            error!("{}: {e:#}", source.path.display());
            true
          },
        }
      })
      .collect()
  });

  if !failures.is_empty() {
    bail!(
      "{} of {} files failed to render",
      failures.len(),
      sources.len()
    );
  }

  info!("Rendered {} files", sources.len());
  Ok(())
}

/// Print the heading outline of `file` as pretty JSON.
pub fn print_headings(config: &Config, file: &Path) -> Result<()> {
  let processor = build_processor(config)?;
  let result = process_markdown_file(&processor, file)
    .wrap_err_with(|| format!("Failed to render {}", file.display()))?;

  let mut stdout = io::stdout().lock();
  serde_json::to_writer_pretty(&mut stdout, &result.headings)?;
  writeln!(stdout)?;
  Ok(())
}

/// Expand files and directories into the list of markdown files to render.
///
/// Fails if two sources would be written to the same output path.
fn collect_sources(inputs: &[PathBuf]) -> Result<Vec<Source>> {
  let mut sources = Vec::new();

  for input in inputs {
    if input.is_dir() {
      for path in collect_markdown_files(input) {
        let relative = path
          .strip_prefix(input)
          .map(Path::to_path_buf)
          .wrap_err_with(|| {
            format!("{} is not inside {}", path.display(), input.display())
          })?;
        sources.push(Source { path, relative });
      }
    } else if input.is_file() {
      let Some(name) = input.file_name() else {
        bail!("Not a file: {}", input.display());
      };
      sources.push(Source {
        path:     input.clone(),
        relative: PathBuf::from(name),
      });
    } else {
      bail!("Input does not exist: {}", input.display());
    }
  }

  let mut seen: HashMap<PathBuf, &Path> =
    HashMap::with_capacity(sources.len());
  for source in &sources {
    let target = source.relative.with_extension("html");
    if let Some(previous) = seen.get(&target) {
      bail!(
        "{} and {} would both be written to {}",
        previous.display(),
        source.path.display(),
        target.display()
      );
    }
    seen.insert(target, &source.path);
  }

  Ok(sources)
}

/// Render one source and write its outputs.
fn render_source(
  processor: &MarkdownProcessor,
  source: &Source,
  output_dir: &Path,
  write_headings: bool,
) -> Result<()> {
  let result = process_markdown_file(processor, &source.path)?;
  let html_path = output_dir.join(source.relative.with_extension("html"));
  write_output(&html_path, &result.html)?;

  if write_headings {
    let headings_path =
      output_dir.join(source.relative.with_extension("headings.json"));
    write_output(&headings_path, &headings_json(&result)?)?;
  }

  debug!("{} -> {}", source.path.display(), html_path.display());
  Ok(())
}

fn headings_json(result: &MarkdownResult) -> Result<String> {
  Ok(serde_json::to_string_pretty(&result.headings)?)
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
  }
  fs::write(path, contents)
    .wrap_err_with(|| format!("Failed to write {}", path.display()))
}
