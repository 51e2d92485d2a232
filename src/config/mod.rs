//! Configuration loading
//!
//! The config file is optional. It supplies defaults for the desktop
//! environment identity and the preferred languages, both of which can be
//! overridden on the command line.

mod error;

pub use error::ConfigError;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming the running desktop environment(s)
pub const CURRENT_DESKTOP_VAR: &str = "XDG_CURRENT_DESKTOP";

/// User configuration
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Identity to filter shortcuts with when none is given on the command line
    #[serde(default)]
    pub identity: Option<String>,
    /// Preferred languages for display names, highest priority first
    #[serde(default)]
    pub languages: Option<Vec<String>>,
}

impl Config {
    /// Pick the identity: explicit value, then config, then the environment
    pub fn resolve_identity(
        &self,
        explicit: Option<String>,
        current_desktop: Option<String>,
    ) -> Option<String> {
        explicit
            .or_else(|| self.identity.clone())
            .or(current_desktop)
            .filter(|identity| !identity.is_empty())
    }
}

/// Default config location: `~/.config/desktop-shortcuts/config.toml`
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("desktop-shortcuts")
        .join("config.toml")
}

/// Load configuration from a file
pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let source_name = path.display().to_string();

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(&source_name, e))?;

    load_from_str(&source_name, content)
}

/// Load an explicitly requested file, or the default one if it exists
///
/// A missing default file yields the default configuration.
pub fn load_or_default(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        return load(path);
    }

    let path = default_path();
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    load(path)
}

/// Load configuration from a string
///
/// Useful for testing and when config content is already in memory.
pub fn load_from_str(source_name: &str, content: String) -> Result<Config, ConfigError> {
    toml::from_str(&content).map_err(|e| ConfigError::parse(source_name, content, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::assert;
    use std::io::Write;

    #[test]
    fn test_full_config() {
        let toml = r#"
            identity = "GNOME"
            languages = ["de_DE", "en"]
        "#;
        let config = load_from_str("test.toml", toml.to_string()).unwrap();
        assert!(config.identity.as_deref() == Some("GNOME"));
        assert!(config.languages == Some(vec!["de_DE".to_string(), "en".to_string()]));
    }

    #[test]
    fn test_empty_config() {
        let config = load_from_str("test.toml", String::new()).unwrap();
        assert!(config == Config::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = load_from_str("test.toml", "identiy = \"KDE\"\n".to_string()).unwrap_err();
        assert!(let ConfigError::Parse { .. } = &err);
        let msg = format!("{err:?}");
        assert!(msg.contains("identiy"));
    }

    #[test]
    fn test_wrong_type_rejected() {
        let result = load_from_str("test.toml", "languages = \"de\"\n".to_string());
        assert!(let Err(ConfigError::Parse { span: Some(_), .. }) = result);
    }

    #[test]
    fn test_resolve_identity_priority() {
        let config = Config {
            identity: Some("KDE".to_string()),
            languages: None,
        };
        let env = Some("ubuntu:GNOME".to_string());

        assert!(config.resolve_identity(Some("XFCE".to_string()), env.clone()).as_deref() == Some("XFCE"));
        assert!(config.resolve_identity(None, env.clone()).as_deref() == Some("KDE"));
        assert!(Config::default().resolve_identity(None, env).as_deref() == Some("ubuntu:GNOME"));
        assert!(Config::default().resolve_identity(None, Some(String::new())).is_none());
        assert!(Config::default().resolve_identity(None, None).is_none());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "identity = \"MATE\"").unwrap();

        let config = load_or_default(Some(file.path())).unwrap();
        assert!(config.identity.as_deref() == Some("MATE"));

        let missing = load_or_default(Some(Path::new("/nonexistent/config.toml")));
        assert!(let Err(ConfigError::Io { .. }) = missing);
    }
}
