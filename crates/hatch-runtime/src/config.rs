//! Runtime configuration
//!
//! ```toml
//! [policy]
//! reapply_cooldown_days = 30
//! default_next_milestone = "Validate the problem with ten customer interviews"
//!
//! [service]
//! conflict_retries = 1
//! notify_attempts = 3
//! notify_backoff_ms = 50
//! ```
//!
//! Every field has a default, so an empty file is a valid config.

use crate::error::ConfigError;
use hatch_engine::LifecyclePolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    pub policy: LifecyclePolicy,
    pub service: ServiceConfig,
}

/// Command execution settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Silent re-read-and-retry rounds after a version conflict
    pub conflict_retries: u32,
    /// Delivery attempts per notification, including the first
    pub notify_attempts: u32,
    /// Base delay between delivery attempts, doubled each time
    pub notify_backoff_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            conflict_retries: 1,
            notify_attempts: 3,
            notify_backoff_ms: 50,
        }
    }
}

impl ServiceConfig {
    #[inline]
    #[must_use]
    pub fn notify_backoff(&self) -> Duration {
        Duration::from_millis(self.notify_backoff_ms)
    }
}

impl RuntimeConfig {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_policy(mut self, policy: LifecyclePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_conflict_retries(mut self, retries: u32) -> Self {
        self.service.conflict_retries = retries;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_notify_attempts(mut self, attempts: u32) -> Self {
        self.service.notify_attempts = attempts;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_notify_backoff_ms(mut self, backoff_ms: u64) -> Self {
        self.service.notify_backoff_ms = backoff_ms;
        self
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service.notify_attempts == 0 {
            return Err(ConfigError::Invalid("service.notify_attempts must be at least 1".into()));
        }
        if self.policy.default_next_milestone.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "policy.default_next_milestone must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Render as TOML, e.g. for `hatchctl config`
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(RuntimeConfig::from_toml_str("").unwrap(), RuntimeConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [policy]
            reapply_cooldown_days = 14

            [service]
            notify_attempts = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.policy.reapply_cooldown_days, 14);
        assert_eq!(config.service.notify_attempts, 5);
        assert_eq!(config.service.conflict_retries, 1);
        assert_eq!(config.policy.default_gtm_scope, LifecyclePolicy::default().default_gtm_scope);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = RuntimeConfig::from_toml_str("[service]\nretries = 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_notify_attempts_is_invalid() {
        let err = RuntimeConfig::from_toml_str("[service]\nnotify_attempts = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rendered_config_parses_back() {
        let config = RuntimeConfig::new().with_conflict_retries(3);
        let rendered = config.to_toml_string().unwrap();
        assert_eq!(RuntimeConfig::from_toml_str(&rendered).unwrap(), config);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"[policy]\nreapply_cooldown_days = 7\n").unwrap();
        let config = RuntimeConfig::load(file.path()).unwrap();
        assert_eq!(config.policy.reapply_cooldown_days, 7);
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = RuntimeConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }
}
