//! Site configuration.
//!
//! # Responsibility
//! - Load site settings from a JSON file with per-field defaults.
//! - Apply `FOLIO_*` environment overrides on top of file values.
//!
//! # Invariants
//! - A validated config has non-blank `index_file` and `posts_dir`.
//! - `log_dir`, when set, is absolute.

use crate::source::{DEFAULT_INDEX_FILE, DEFAULT_POSTS_DIR};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_CONTENT_ROOT: &str = "FOLIO_CONTENT_ROOT";
pub const ENV_STATE_DB: &str = "FOLIO_STATE_DB";
pub const ENV_LOG_LEVEL: &str = "FOLIO_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "FOLIO_LOG_DIR";

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

/// Runtime settings for one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory holding the published index and posts.
    pub content_root: PathBuf,
    /// Index file name, relative to `content_root`.
    pub index_file: String,
    /// Full-post directory, relative to `content_root`.
    pub posts_dir: String,
    /// SQLite preference store; an in-memory store is used when unset.
    pub state_db: Option<PathBuf>,
    /// `trace|debug|info|warn|error`; build default when unset.
    pub log_level: Option<String>,
    /// File logging is disabled when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_root: PathBuf::from("."),
            index_file: DEFAULT_INDEX_FILE.to_string(),
            posts_dir: DEFAULT_POSTS_DIR.to_string(),
            state_db: None,
            log_level: None,
            log_dir: None,
        }
    }
}

impl SiteConfig {
    /// Parses and validates a JSON config document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a config file, applies environment overrides, then validates.
    ///
    /// Relative `content_root` / `state_db` values are resolved against the
    /// config file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = serde_json::from_str(&text).map_err(ConfigError::Parse)?;
        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        config.apply_overrides_from(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Applies `FOLIO_*` overrides using `lookup` as the environment.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let read = |key: &str| {
            let value = lookup(key)?;
            let trimmed = value.trim();
            if trimmed.is_empty() {
                warn!("event=config_override module=config status=skipped key={key} reason=blank");
                return None;
            }
            info!("event=config_override module=config status=ok key={key}");
            Some(trimmed.to_string())
        };

        if let Some(value) = read(ENV_CONTENT_ROOT) {
            self.content_root = PathBuf::from(value);
        }
        if let Some(value) = read(ENV_STATE_DB) {
            self.state_db = Some(PathBuf::from(value));
        }
        if let Some(value) = read(ENV_LOG_LEVEL) {
            self.log_level = Some(value);
        }
        if let Some(value) = read(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(value));
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.index_file.trim().is_empty() {
            return Err(ConfigError::Invalid("index_file must not be blank".to_string()));
        }
        if self.posts_dir.trim().is_empty() {
            return Err(ConfigError::Invalid("posts_dir must not be blank".to_string()));
        }
        if let Some(log_dir) = self.log_dir.as_ref() {
            if !log_dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "log_dir must be an absolute path, got `{}`",
                    log_dir.display()
                )));
            }
        }
        Ok(())
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        if self.content_root.is_relative() {
            self.content_root = base.join(&self.content_root);
        }
        if let Some(state_db) = self.state_db.as_mut() {
            if state_db.is_relative() {
                *state_db = base.join(&*state_db);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, SiteConfig, ENV_LOG_LEVEL, ENV_STATE_DB};
    use std::path::PathBuf;

    #[test]
    fn empty_document_uses_defaults() {
        let config = SiteConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.index_file, "index.json");
        assert_eq!(config.posts_dir, "posts");
    }

    #[test]
    fn unknown_fields_and_relative_log_dir_are_rejected() {
        let unknown = SiteConfig::from_json_str(r#"{"theme":"dark"}"#).unwrap_err();
        assert!(matches!(unknown, ConfigError::Parse(_)));

        let relative = SiteConfig::from_json_str(r#"{"log_dir":"logs"}"#).unwrap_err();
        assert!(relative.to_string().contains("absolute"));
    }

    #[test]
    fn overrides_replace_file_values_and_skip_blank_ones() {
        let mut config = SiteConfig::default();
        config.apply_overrides_from(|key| match key {
            ENV_STATE_DB => Some("/var/lib/folio/state.db".to_string()),
            ENV_LOG_LEVEL => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(
            config.state_db,
            Some(PathBuf::from("/var/lib/folio/state.db"))
        );
        assert_eq!(config.log_level, None);
    }
}
