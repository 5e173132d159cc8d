//! Configuration management for mdrfc.
//!
//! Parses `mdrfc.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [render]
//! fragment = false
//! skip_html = false
//! skip_images = true
//! callout = "<<"
//! comments = ["//", "#"]
//!
//! [markdown]
//! auto_heading_ids = true
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override fragment mode.
    pub fragment: Option<bool>,
    /// Override raw HTML suppression.
    pub skip_html: Option<bool>,
    /// Override image suppression.
    pub skip_images: Option<bool>,
    /// Override the callout prefix.
    pub callout: Option<String>,
    /// Override the comment markers that may precede a callout.
    pub comments: Option<Vec<String>>,
    /// Override automatic heading anchors.
    pub auto_heading_ids: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdrfc.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// XML rendering configuration.
    pub render: RenderConfig,
    /// Markdown parsing configuration.
    pub markdown: MarkdownConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// XML rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Render without the XML prolog and `<rfc>` wrapper.
    pub fragment: bool,
    /// Drop inline HTML instead of copying it through.
    pub skip_html: bool,
    /// Drop images (RFC 2629 has no inline images).
    pub skip_images: bool,
    /// Prefix that marks callouts inside code blocks, e.g. `<<`.
    pub callout: Option<String>,
    /// Comment markers that may precede a callout.
    pub comments: Vec<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fragment: false,
            skip_html: false,
            skip_images: true,
            callout: None,
            comments: Vec::new(),
        }
    }
}

/// Markdown parsing configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Derive anchors from heading text when no `{#id}` is given.
    pub auto_heading_ids: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            auto_heading_ids: true,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdrfc.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, so CLI arguments take
    /// precedence over config file values. The merged result is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the merged configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            tracing::debug!("No {CONFIG_FILENAME} found, using defaults");
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(fragment) = settings.fragment {
            self.render.fragment = fragment;
        }
        if let Some(skip_html) = settings.skip_html {
            self.render.skip_html = skip_html;
        }
        if let Some(skip_images) = settings.skip_images {
            self.render.skip_images = skip_images;
        }
        if let Some(callout) = &settings.callout {
            self.render.callout = Some(callout.clone());
        }
        if let Some(comments) = &settings.comments {
            self.render.comments.clone_from(comments);
        }
        if let Some(auto_heading_ids) = settings.auto_heading_ids {
            self.markdown.auto_heading_ids = auto_heading_ids;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_config_from(&current)
    }

    /// Search for config file in `start` and its parents.
    fn discover_config_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_render()
    }

    fn validate_render(&self) -> Result<(), ConfigError> {
        if let Some(callout) = &self.render.callout {
            if callout.is_empty() {
                return Err(ConfigError::Validation(
                    "render.callout cannot be empty".to_owned(),
                ));
            }
            if callout.contains(char::is_whitespace) {
                return Err(ConfigError::Validation(format!(
                    "render.callout cannot contain whitespace: {callout:?}"
                )));
            }
        }

        if self.render.comments.iter().any(String::is_empty) {
            return Err(ConfigError::Validation(
                "render.comments cannot contain empty markers".to_owned(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.render.fragment);
        assert!(!config.render.skip_html);
        assert!(config.render.skip_images);
        assert_eq!(config.render.callout, None);
        assert!(config.render.comments.is_empty());
        assert!(config.markdown.auto_heading_ids);
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.render.skip_images);
        assert!(config.markdown.auto_heading_ids);
    }

    #[test]
    fn test_parse_render_config() {
        let toml = r##"
[render]
fragment = true
skip_images = false
callout = "<<"
comments = ["//", "#"]

[markdown]
auto_heading_ids = false
"##;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.render.fragment);
        assert!(!config.render.skip_images);
        assert_eq!(config.render.callout.as_deref(), Some("<<"));
        assert_eq!(config.render.comments, vec!["//".to_owned(), "#".to_owned()]);
        assert!(!config.markdown.auto_heading_ids);
    }

    #[test]
    fn test_apply_cli_settings_callout() {
        let mut config = Config::default();
        let overrides = CliSettings {
            callout: Some("<<".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.render.callout.as_deref(), Some("<<"));
        assert!(config.render.skip_images); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_multiple() {
        let mut config = Config::default();
        config.render.comments = vec!["#".to_owned()];
        let overrides = CliSettings {
            fragment: Some(true),
            skip_html: Some(true),
            skip_images: Some(false),
            comments: Some(vec!["//".to_owned()]),
            auto_heading_ids: Some(false),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert!(config.render.fragment);
        assert!(config.render.skip_html);
        assert!(!config.render.skip_images);
        assert_eq!(config.render.comments, vec!["//".to_owned()]);
        assert!(!config.markdown.auto_heading_ids);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert!(config.render.skip_images);
        assert_eq!(config.render.callout, None);
    }

    #[test]
    fn test_validate_default_config_passes() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_callout_empty() {
        let mut config = Config::default();
        config.render.callout = Some(String::new());
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("render.callout"));
    }

    #[test]
    fn test_validate_callout_whitespace() {
        let mut config = Config::default();
        config.render.callout = Some("< <".to_owned());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("whitespace"));
    }

    #[test]
    fn test_validate_empty_comment_marker() {
        let mut config = Config::default();
        config.render.comments = vec!["//".to_owned(), String::new()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("render.comments"));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_explicit_path_with_cli_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[render]\ncallout = \"<<\"\nfragment = true\n").unwrap();

        let settings = CliSettings {
            fragment: Some(false),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.render.callout.as_deref(), Some("<<"));
        assert!(!config.render.fragment);
    }

    #[test]
    fn test_load_rejects_invalid_cli_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();

        let settings = CliSettings {
            callout: Some(String::new()),
            ..Default::default()
        };
        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[render\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();
        let nested = dir.path().join("drafts").join("v1");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(Config::discover_config_from(&nested), Some(path));
    }
}
