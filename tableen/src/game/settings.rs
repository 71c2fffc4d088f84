use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cards::DeckVariant;

pub const DEFAULT_HAND_SIZE: usize = 4;
pub const DEFAULT_TABLE_SIZE: usize = 4;
pub const DEFAULT_SCORE_CAP: u32 = 21;

/// What happens to cards left on the table at round end when nobody grabbed
/// during the round.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnclaimedTablePolicy {
    /// Cards stay where they are, uncollected and unscored.
    #[default]
    LeaveOnTable,
    /// Cards go to the seat that did not start the round.
    AwardToNonStarter,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("hand size must be at least 1")]
    EmptyHand,
    #[error("table size must be at least 1")]
    EmptyTable,
    #[error("score cap must be at least 1")]
    ZeroScoreCap,
    #[error("dealing {needed} cards needs a bigger deck than {available}")]
    DeckTooSmall { needed: usize, available: usize },
}

/// Rule parameters fixed for the lifetime of a match.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameSettings {
    pub deck: DeckVariant,
    pub hand_size: usize,
    pub table_size: usize,
    pub score_cap: u32,
    pub unclaimed_table: UnclaimedTablePolicy,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new(DeckVariant::Standard52, DEFAULT_HAND_SIZE, DEFAULT_SCORE_CAP)
    }
}

impl GameSettings {
    #[must_use]
    pub const fn new(deck: DeckVariant, hand_size: usize, score_cap: u32) -> Self {
        Self {
            deck,
            hand_size,
            table_size: DEFAULT_TABLE_SIZE,
            score_cap,
            unclaimed_table: UnclaimedTablePolicy::LeaveOnTable,
        }
    }

    /// Cards needed in the deck to deal both hands again.
    #[must_use]
    pub const fn refill_threshold(&self) -> usize {
        2 * self.hand_size
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.hand_size == 0 {
            return Err(SettingsError::EmptyHand);
        }
        if self.table_size == 0 {
            return Err(SettingsError::EmptyTable);
        }
        if self.score_cap == 0 {
            return Err(SettingsError::ZeroScoreCap);
        }
        let needed = self.refill_threshold() + self.table_size;
        let available = self.deck.size();
        if needed > available {
            return Err(SettingsError::DeckTooSmall { needed, available });
        }
        Ok(())
    }
}
