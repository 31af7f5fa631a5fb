//! Shell configuration loaded from TOML.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{MinishError, Result};

/// Environment variable naming an optional configuration file.
pub const CONFIG_ENV_VAR: &str = "MINISH_CONFIG";

/// Runtime configuration for the interactive shell.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    /// Text appended to the current directory to form the prompt.
    pub prompt_suffix: String,
    /// Line printed once before the first prompt (empty = silent start).
    pub banner: String,
    /// `env_logger` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Directory that a bare `cd` jumps to.
    pub home: Option<PathBuf>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt_suffix: " >> ".to_string(),
            banner: "Command Line Interpreter (Type 'exit' to quit)".to_string(),
            log_filter: "warn".to_string(),
            home: None,
        }
    }
}

impl ShellConfig {
    /// Parse a configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        if config.prompt_suffix.contains('\n') {
            return Err(MinishError::Config(
                "prompt_suffix must not contain a newline".to_string(),
            ));
        }
        Ok(config)
    }

    /// Load a configuration file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            MinishError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = Self::from_toml(&text)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from `$MINISH_CONFIG` when set, otherwise fall back to defaults.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::load(Path::new(&path)),
            _ => Ok(Self::default()),
        }
    }

    /// Resolve the home directory for `cd` with no arguments.
    ///
    /// Order: the configured `home`, `$HOME`, `$USERPROFILE`, then `fallback`.
    pub fn resolve_home(&self, fallback: &Path) -> PathBuf {
        if let Some(home) = &self.home {
            return home.clone();
        }
        std::env::var_os("HOME")
            .filter(|h| !h.is_empty())
            .or_else(|| std::env::var_os("USERPROFILE").filter(|h| !h.is_empty()))
            .map(PathBuf::from)
            .unwrap_or_else(|| fallback.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ShellConfig::default();
        assert_eq!(config.prompt_suffix, " >> ");
        assert_eq!(config.log_filter, "warn");
        assert!(!config.banner.is_empty());
        assert!(config.home.is_none());
    }

    #[test]
    fn empty_toml_is_default() {
        let config = ShellConfig::from_toml("").unwrap();
        assert_eq!(config, ShellConfig::default());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = ShellConfig::from_toml("prompt_suffix = \" $ \"\n").unwrap();
        assert_eq!(config.prompt_suffix, " $ ");
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn empty_banner_disables_it() {
        let config = ShellConfig::from_toml("banner = \"\"\n").unwrap();
        assert!(config.banner.is_empty());
    }

    #[test]
    fn home_override_wins() {
        let config = ShellConfig::from_toml("home = \"/srv/home\"\n").unwrap();
        assert_eq!(
            config.resolve_home(Path::new("/fallback")),
            PathBuf::from("/srv/home")
        );
    }

    #[test]
    fn unknown_key_rejected() {
        let err = ShellConfig::from_toml("colour = true\n").unwrap_err();
        assert!(matches!(err, MinishError::TomlParse(_)));
    }

    #[test]
    fn newline_in_prompt_rejected() {
        let err = ShellConfig::from_toml("prompt_suffix = \"\\n\"\n").unwrap_err();
        assert!(matches!(err, MinishError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minish.toml");
        std::fs::write(&path, "log_filter = \"debug\"\n").unwrap();
        let config = ShellConfig::load(&path).unwrap();
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ShellConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, MinishError::Config(_)));
    }
}
