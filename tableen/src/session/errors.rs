use thiserror::Error;

use super::{MatchId, config::ConfigError};
use crate::game::{RuleError, SnapshotError};

/// Errors returned by the match registry and match actors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("match {0} not found")]
    MatchNotFound(MatchId),
    #[error("match is full")]
    MatchFull,
    #[error("unknown seat token")]
    UnknownSeatToken,
    #[error("waiting for an opponent to join")]
    WaitingForOpponent,
    #[error("match actor is unavailable")]
    ActorUnavailable,
    #[error("invalid match config: {0}")]
    InvalidConfig(#[from] ConfigError),
    #[error(transparent)]
    Rejected(#[from] RuleError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
