use crate::error::ConfigError;

/// Default configuration template in TOML, with a comment for every key.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# tsukie configuration file

# Canonical domain of the blog. Links whose href contains "http" but not this
# domain open in a new tab with rel="nofollow noopener noreferrer".
site_domain = "tsukie.com"

# GitHub Flavored Markdown: tables, strikethrough, task lists, autolinks and
# footnotes
gfm = true

# Highlight fenced code blocks that name a language
highlight_code = true

# Theme used by `tsukie css` to generate the highlighting stylesheet
highlight_theme = "InspiredGitHub"

# Class of the <figure> wrapping standalone images
figure_class = "rehype-figure"

# Directory rendered HTML is written to
output_dir = "build"

# Number of threads to use for parallel rendering (defaults to number of CPU cores)
# jobs = 4
"#;

/// Default configuration template in JSON format.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "site_domain": "tsukie.com",
  "gfm": true,
  "highlight_code": true,
  "highlight_theme": "InspiredGitHub",
  "figure_class": "rehype-figure",
  "output_dir": "build"
}
"#;

/// Get the default configuration template for `format` (`toml` or `json`).
///
/// # Errors
///
/// Returns [`ConfigError::Config`] for any other format.
pub fn get_template(format: &str) -> Result<&'static str, ConfigError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => {
      Err(ConfigError::Config(format!(
        "Unsupported config format: {format}"
      )))
    },
  }
}
