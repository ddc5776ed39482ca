use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for tsukie
#[derive(Parser, Debug)]
#[command(author, version, about = "tsukie: render blog posts from markdown")]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times). Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", global = true, action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", global = true, action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,

  /// Number of threads to use for parallel rendering.
  #[arg(short, long, global = true)]
  pub jobs: Option<usize>,
}

/// All supported subcommands for the tsukie CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Render markdown files or directories of markdown files to HTML.
  ///
  /// A single file without `--output` is printed to stdout.
  Render {
    /// Markdown files or directories to render.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory to write rendered HTML to (defaults to `output_dir` from the
    /// configuration when rendering more than one file).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the heading outline of each post as `<name>.headings.json`.
    #[arg(long)]
    headings: bool,
  },

  /// Print the heading outline of a markdown file as JSON.
  Headings {
    /// Markdown file to read.
    file: PathBuf,
  },

  /// Print the stylesheet for highlighted code blocks.
  Css {
    /// Theme to generate (defaults to `highlight_theme` from the
    /// configuration).
    #[arg(short, long)]
    theme: Option<String>,
  },

  /// Initialize a new tsukie configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "tsukie.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
