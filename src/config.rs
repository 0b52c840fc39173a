//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rstree/rstree.toml`
//! 3. Environment variables: `RSTREE_*` prefix

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error loading or rendering settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("config error: {message}")]
    Load { message: String },
}

/// Unified configuration for rstree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Separator between values in traversal output
    pub separator: String,
    /// Outline file used when a command is given no path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            separator: " ".into(),
            outline: None,
        }
    }
}

/// Get the XDG config directory for rstree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rstree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rstree.toml"))
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/rstree/rstree.toml`
    /// 3. Environment variables: `RSTREE_*` prefix (explicit override)
    pub fn load() -> Result<Self, SettingsError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("separator", defaults.separator.clone())
            .map_err(config_err)?;

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        // Without an explicit prefix separator the nesting separator
        // would be used, and only RSTREE__* keys would match.
        builder = builder.add_source(
            Environment::with_prefix("RSTREE")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build().map_err(config_err)?;
        let mut settings: Self = config.try_deserialize().map_err(config_err)?;

        // Expand ~ and $VAR in path-like fields
        settings.expand_paths();

        Ok(settings)
    }

    /// Expand shell variables and tilde in path-like fields.
    ///
    /// Handles `~`, `$VAR`, and `${VAR}` syntax.
    fn expand_paths(&mut self) {
        if let Some(outline) = &self.outline {
            let expanded = expand_env_vars(outline.to_string_lossy().as_ref());
            self.outline = Some(PathBuf::from(expanded));
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(|e| SettingsError::Load {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# rstree configuration
#
# Location: ~/.config/rstree/rstree.toml
# Environment overrides use the RSTREE_ prefix, e.g. RSTREE_SEPARATOR.

# Separator between values in traversal output
# separator = " "

# Outline file used when a command is given no path
# outline = "~/forests/main.outline"
"#
        .to_string()
    }
}

/// Expand environment variables in a path string.
///
/// Supports `$VAR`, `${VAR}` and `~`. Uses shellexpand for robust
/// expansion; an unexpandable string is passed through unchanged.
fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

fn config_err(e: ConfigError) -> SettingsError {
    SettingsError::Load {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    // Env-sensitive tests share process state and must not interleave
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let _guard = ENV_LOCK.lock().unwrap();
        let settings = Settings::load().expect("load defaults");
        assert_eq!(settings.separator, " ");
    }

    #[test]
    fn given_env_override_when_loading_then_env_wins() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("RSTREE_SEPARATOR", ",");
        std::env::set_var("RSTREE_OUTLINE", "/tmp/env.outline");

        let settings = Settings::load();

        std::env::remove_var("RSTREE_SEPARATOR");
        std::env::remove_var("RSTREE_OUTLINE");
        let settings = settings.expect("load with env overrides");
        assert_eq!(settings.separator, ",");
        assert_eq!(settings.outline, Some(PathBuf::from("/tmp/env.outline")));
    }

    #[test]
    fn given_tilde_in_outline_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            separator: " ".into(),
            outline: Some(PathBuf::from("~/forests/main.outline")),
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let outline = settings.outline.expect("outline should stay set");
        assert!(
            outline.to_string_lossy().starts_with(&home),
            "outline should start with home dir: {}",
            outline.display()
        );
        assert!(
            !outline.to_string_lossy().contains('~'),
            "outline should not contain tilde: {}",
            outline.display()
        );
    }

    #[test]
    fn given_env_var_in_outline_when_expand_paths_then_expands_variable() {
        let mut settings = Settings {
            separator: " ".into(),
            outline: Some(PathBuf::from("$HOME/forests/main.outline")),
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        assert!(
            settings
                .outline
                .expect("outline should stay set")
                .to_string_lossy()
                .starts_with(&home),
            "outline should expand $HOME"
        );
    }

    #[test]
    fn given_template_when_parsed_then_yields_defaults() {
        let settings: Settings = toml::from_str(&Settings::template()).expect("template parses");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn given_settings_when_rendered_then_round_trips() {
        let settings = Settings {
            separator: ", ".into(),
            outline: Some(PathBuf::from("/tmp/forest.outline")),
        };

        let rendered = settings.to_toml().expect("render");
        let parsed: Settings = toml::from_str(&rendered).expect("parse back");

        assert_eq!(parsed, settings);
    }
}
