use std::io::{self, Write};

use color_eyre::eyre::{Context, Result, bail};
use log::{LevelFilter, info};

mod cli;
mod render;

use cli::{Cli, Commands};
use tsukie_config::Config;
use tsukie_markdown::create_default_manager;

fn main() -> Result<()> {
  color_eyre::install()?;

  // Parse command line arguments
  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  // Init runs before any existing configuration is loaded
  if let Commands::Init {
    output,
    format,
    force,
  } = &cli.command
  {
    if output.exists() && !force {
      bail!(
        "Configuration file already exists: {}. Use --force to overwrite.",
        output.display()
      );
    }

    Config::generate_default_config(format, output).wrap_err_with(|| {
      format!(
        "Failed to generate configuration file: {}",
        output.display()
      )
    })?;

    info!("Configuration file created successfully. Edit it to customize rendering.");
    return Ok(());
  }

  let mut config = Config::load(&cli.config_files, &cli.config_overrides)
    .wrap_err("Failed to load configuration")?;
  if let Some(jobs) = cli.jobs {
    if jobs == 0 {
      bail!("--jobs must be at least 1");
    }
    config.jobs = Some(jobs);
  }

  match &cli.command {
    Commands::Render {
      inputs,
      output,
      headings,
    } => render::run(&config, inputs, output.as_deref(), *headings),
    Commands::Headings { file } => render::print_headings(&config, file),
    Commands::Css { theme } => {
      print_css(theme.as_deref().unwrap_or(&config.highlight_theme))
    },
    Commands::Init { .. } => Ok(()),
  }
}

/// Print the stylesheet matching the class names of highlighted code.
fn print_css(theme: &str) -> Result<()> {
  let manager =
    create_default_manager().wrap_err("Syntax highlighting is unavailable")?;
  let css = manager
    .theme_css(Some(theme))
    .wrap_err_with(|| format!("Failed to generate CSS for theme '{theme}'"))?;

  io::stdout().lock().write_all(css.as_bytes())?;
  Ok(())
}
