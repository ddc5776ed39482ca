use std::{
  fs,
  path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tsukie_markdown::MarkdownOptions;

use crate::{error::ConfigError, templates};

/// Highlighting theme used when none is configured.
pub const DEFAULT_HIGHLIGHT_THEME: &str = "InspiredGitHub";

/// File names looked up in the working directory when no config file is given.
const CONFIG_FILENAMES: [&str; 6] = [
  "tsukie.toml",
  "tsukie.json",
  ".tsukie.toml",
  ".tsukie.json",
  ".config/tsukie.toml",
  ".config/tsukie.json",
];

/// Configuration for the tsukie renderer.
///
/// Fields are loaded from one or more TOML or JSON files and can be
/// overridden with `KEY=VALUE` pairs on the command line. Missing keys keep
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Domain of the blog; links containing it stay in the same tab.
  pub site_domain: String,

  /// Whether to enable GitHub Flavored Markdown.
  pub gfm: bool,

  /// Whether to highlight fenced code blocks.
  pub highlight_code: bool,

  /// Theme used to generate the highlighting stylesheet.
  pub highlight_theme: String,

  /// Class of generated `<figure>` elements.
  pub figure_class: String,

  /// Output directory for rendered HTML.
  pub output_dir: PathBuf,

  /// Number of threads to use for parallel rendering.
  pub jobs: Option<usize>,
}

impl Default for Config {
  fn default() -> Self {
    let markdown = MarkdownOptions::default();
    Self {
      site_domain:     markdown.site_domain,
      gfm:             true,
      highlight_code:  true,
      highlight_theme: DEFAULT_HIGHLIGHT_THEME.to_string(),
      figure_class:    markdown.figure_class,
      output_dir:      PathBuf::from("build"),
      jobs:            None,
    }
  }
}

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let value = read_value(path)?;
    serde_json::from_value(value).map_err(|e| {
      ConfigError::Config(format!(
        "Invalid configuration in {}: {e}",
        path.display()
      ))
    })
  }

  /// Load configuration from files and command line overrides.
  ///
  /// Files are merged in order, later files overriding keys of earlier ones.
  /// When no file is given, a config file in the usual locations is used if
  /// one exists. Overrides are applied last and the result is validated.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded, an override is malformed or
  /// the final configuration is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut merged = serde_json::to_value(Self::default())?;

    let discovered;
    let files = if config_files.is_empty() {
      discovered = Self::find_config_file();
      discovered.as_slice()
    } else {
      config_files
    };

    for path in files {
      log::debug!("Loading config from {}", path.display());
      let value = read_value(path).map_err(|e| {
        ConfigError::Config(format!(
          "Failed to load config from {}: {e}",
          path.display()
        ))
      })?;
      merge_values(&mut merged, value);
    }

    warn_unknown_keys(&merged);

    let mut config: Self = serde_json::from_value(merged)
      .map_err(|e| ConfigError::Config(format!("Invalid configuration: {e}")))?;
    config.apply_overrides(config_overrides)?;
    config.validate()?;

    Ok(config)
  }

  /// Apply configuration overrides from `KEY=VALUE` strings.
  ///
  /// Values are read according to the type of the key: booleans accept
  /// `true/false`, `yes/no`, `on/off` and `1/0`; an empty value unsets an
  /// optional key.
  ///
  /// # Errors
  ///
  /// Returns an error if an override is not `KEY=VALUE`, names an unknown key,
  /// or has a value of the wrong type.
  ///
  /// # Example
  ///
  /// ```rust
  /// # use tsukie_config::Config;
  /// let mut config = Config::default();
  /// config
  ///   .apply_overrides(&[
  ///     "highlight_code=no".to_string(),
  ///     "site_domain=example.org".to_string(),
  ///   ])
  ///   .expect("valid overrides");
  /// assert!(!config.highlight_code);
  /// assert_eq!(config.site_domain, "example.org");
  /// ```
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    if overrides.is_empty() {
      return Ok(());
    }

    let mut value = serde_json::to_value(&*self)?;
    for override_str in overrides {
      let (key, raw) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;
      apply_override(&mut value, key.trim(), raw.trim())?;
    }

    *self = serde_json::from_value(value).map_err(|e| {
      ConfigError::Config(format!("Invalid config override: {e}"))
    })?;
    Ok(())
  }

  /// Check values that deserialize fine but cannot be used.
  ///
  /// # Errors
  ///
  /// Returns an error if the site domain or figure class is empty or contains
  /// whitespace, the highlight theme is empty, or `jobs` is zero.
  pub fn validate(&self) -> Result<(), ConfigError> {
    self
      .to_markdown_options()
      .validate()
      .map_err(|e| ConfigError::Config(e.to_string()))?;

    if self.highlight_theme.trim().is_empty() {
      return Err(ConfigError::Config(
        "highlight_theme must not be empty".to_string(),
      ));
    }
    if self.jobs == Some(0) {
      return Err(ConfigError::Config(
        "jobs must be at least 1".to_string(),
      ));
    }

    Ok(())
  }

  /// Options for the markdown processor described by this configuration.
  #[must_use]
  pub fn to_markdown_options(&self) -> MarkdownOptions {
    MarkdownOptions {
      gfm:            self.gfm,
      highlight_code: self.highlight_code,
      site_domain:    self.site_domain.clone(),
      figure_class:   self.figure_class.clone(),
    }
  }

  /// Search for config files in common locations
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    if let Some(path) = find_config_file_in(&current_dir) {
      return Some(path);
    }

    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
      let xdg_config_dir = PathBuf::from(xdg_config_home).join("tsukie");
      for filename in &["config.toml", "config.json"] {
        let config_path = xdg_config_dir.join(filename);
        if config_path.exists() {
          return Some(config_path);
        }
      }
    }

    if let Ok(home) = std::env::var("HOME") {
      let home_config_dir = PathBuf::from(home).join(".config").join("tsukie");
      for filename in &["config.toml", "config.json"] {
        let config_path = home_config_dir.join(filename);
        if config_path.exists() {
          return Some(config_path);
        }
      }
    }

    None
  }

  /// Generate a default configuration file with commented explanations
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unsupported or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = templates::get_template(format)?;

    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent)?;
    }

    fs::write(path, config_content).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

/// First config file from [`CONFIG_FILENAMES`] present in `dir`.
fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
  CONFIG_FILENAMES
    .iter()
    .map(|filename| dir.join(filename))
    .find(|path| path.is_file())
}

/// Read a TOML or JSON file into an untyped value.
#[allow(
  clippy::option_if_let_else,
  reason = "Clearer with explicit match on extension"
)]
fn read_value(path: &Path) -> Result<Value, ConfigError> {
  let content = fs::read_to_string(path).map_err(|e| {
    ConfigError::Config(format!(
      "Failed to read config file: {}: {}",
      path.display(),
      e
    ))
  })?;

  match path.extension().and_then(|ext| ext.to_str()) {
    Some(ext) => {
      match ext.to_lowercase().as_str() {
        "json" => {
          serde_json::from_str(&content).map_err(|e| {
            ConfigError::Config(format!(
              "Failed to parse JSON config from {}: {}",
              path.display(),
              e
            ))
          })
        },
        "toml" => {
          toml::from_str(&content).map_err(|e| {
            ConfigError::Config(format!(
              "Failed to parse TOML config from {}: {}",
              path.display(),
              e
            ))
          })
        },
        _ => {
          Err(ConfigError::Config(format!(
            "Unsupported config file format: {}",
            path.display()
          )))
        },
      }
    },
    None => {
      Err(ConfigError::Config(format!(
        "Config file has no extension: {}",
        path.display()
      )))
    },
  }
}

/// Merge `overlay` into `base`. Objects merge key by key, anything else in
/// `overlay` replaces the value in `base`.
fn merge_values(base: &mut Value, overlay: Value) {
  match (base, overlay) {
    (Value::Object(base), Value::Object(overlay)) => {
      for (key, value) in overlay {
        match base.get_mut(&key) {
          Some(existing) => merge_values(existing, value),
          None => {
            base.insert(key, value);
          },
        }
      }
    },
    (base, overlay) => *base = overlay,
  }
}

/// Warn about top-level keys that no `Config` field reads.
fn warn_unknown_keys(merged: &Value) {
  let Ok(Value::Object(known)) = serde_json::to_value(Config::default()) else {
    return;
  };
  if let Value::Object(map) = merged {
    for key in map.keys().filter(|key| !known.contains_key(*key)) {
      log::warn!("Ignoring unknown config key '{key}'");
    }
  }
}

/// Set `key` in a serialized config, reading `raw` as the key's type.
fn apply_override(
  config: &mut Value,
  key: &str,
  raw: &str,
) -> Result<(), ConfigError> {
  let map: &mut Map<String, Value> = config.as_object_mut().ok_or_else(|| {
    ConfigError::Config("Configuration is not a table".to_string())
  })?;
  let slot = map.get_mut(key).ok_or_else(|| {
    ConfigError::Config(format!("Unknown config key: '{key}'"))
  })?;

  let value = match &*slot {
    Value::Null | Value::Number(_) if raw.is_empty() => Value::Null,
    Value::Bool(_) => {
      Value::Bool(parse_bool(raw).ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid boolean value for '{key}': '{raw}'"
        ))
      })?)
    },
    Value::Number(_) => {
      Value::from(raw.parse::<u64>().map_err(|e| {
        ConfigError::Config(format!(
          "Invalid numeric value for '{key}': '{raw}' ({e})"
        ))
      })?)
    },
    Value::Null => {
      serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
    },
    _ => Value::String(raw.to_string()),
  };
  *slot = value;

  Ok(())
}

fn parse_bool(raw: &str) -> Option<bool> {
  match raw.to_lowercase().as_str() {
    "true" | "yes" | "on" | "1" => Some(true),
    "false" | "no" | "off" | "0" => Some(false),
    _ => None,
  }
}
