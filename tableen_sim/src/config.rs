//! Simulation configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use tableen::game::{DeckVariant, GameSettings, SettingsError, UnclaimedTablePolicy};

/// Complete simulation configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of matches to play concurrently
    pub matches: usize,
    /// Rules every match is played with
    pub settings: GameSettings,
    /// Base seed; match `i` uses `seed + i`. Random when unset.
    pub seed: Option<u64>,
    /// Actions after which a match is terminated as stuck
    pub max_actions: usize,
}

impl SimConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `matches_override` - Optional match count (from CLI args)
    /// * `seed_override` - Optional base seed (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set to a value that cannot be used
    pub fn from_env(
        matches_override: Option<usize>,
        seed_override: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let deck = match std::env::var("TABLEEN_DECK").ok().as_deref() {
            None | Some("52") => DeckVariant::Standard52,
            Some("40") => DeckVariant::Short40,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "TABLEEN_DECK".to_string(),
                    reason: format!("expected 52 or 40, got {other}"),
                });
            }
        };

        let unclaimed_table = match std::env::var("TABLEEN_UNCLAIMED").ok().as_deref() {
            None | Some("leave") => UnclaimedTablePolicy::LeaveOnTable,
            Some("non-starter") => UnclaimedTablePolicy::AwardToNonStarter,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "TABLEEN_UNCLAIMED".to_string(),
                    reason: format!("expected leave or non-starter, got {other}"),
                });
            }
        };

        let mut settings = GameSettings::new(
            deck,
            parse_env_or("TABLEEN_HAND_SIZE", 4),
            parse_env_or("TABLEEN_SCORE_CAP", 21),
        );
        settings.unclaimed_table = unclaimed_table;

        Ok(SimConfig {
            matches: matches_override.unwrap_or_else(|| parse_env_or("TABLEEN_MATCHES", 4)),
            settings,
            seed: seed_override.or_else(|| {
                std::env::var("TABLEEN_SEED")
                    .ok()
                    .and_then(|v| v.parse().ok())
            }),
            max_actions: parse_env_or("TABLEEN_MAX_ACTIONS", 10_000),
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.matches == 0 {
            return Err(ConfigError::Invalid {
                var: "TABLEEN_MATCHES".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }
        if self.max_actions == 0 {
            return Err(ConfigError::Invalid {
                var: "TABLEEN_MAX_ACTIONS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }
        self.settings.validate()?;
        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error("Invalid game settings: {0}")]
    Settings(#[from] SettingsError),
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
