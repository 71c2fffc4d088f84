//! Match configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::{GameSettings, SettingsError};

pub const DEFAULT_INBOX_CAPACITY: usize = 100;
pub const DEFAULT_SUBSCRIBER_CAPACITY: usize = 64;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("match name must not be empty")]
    EmptyName,
    #[error("inbox capacity must be at least 1")]
    ZeroInboxCapacity,
}

/// Match configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Display name used in listings and logs
    pub name: String,

    /// Rule parameters
    pub settings: GameSettings,

    /// Shuffle seed. A random one is drawn when unset.
    pub seed: Option<u64>,

    /// Bound of the actor's message inbox
    pub inbox_capacity: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            name: "Tableen".to_string(),
            settings: GameSettings::default(),
            seed: None,
            inbox_capacity: DEFAULT_INBOX_CAPACITY,
        }
    }
}

impl MatchConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.inbox_capacity == 0 {
            return Err(ConfigError::ZeroInboxCapacity);
        }
        self.settings.validate()?;
        Ok(())
    }

    /// The configured seed, or a fresh random one.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::DeckVariant;

    #[test]
    fn test_default_config_is_valid() {
        assert!(MatchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_settings_errors_surface() {
        let config = MatchConfig {
            settings: GameSettings::new(DeckVariant::Short40, 20, 21),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Settings(SettingsError::DeckTooSmall { .. }))
        ));
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let config = MatchConfig {
            name: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err(), ConfigError::EmptyName);
    }

    #[test]
    fn test_fixed_seed_is_used() {
        let config = MatchConfig {
            seed: Some(5),
            ..Default::default()
        };
        assert_eq!(config.resolve_seed(), 5);
    }
}
