//! Rule violations reported back to the submitting seat.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons an action is rejected. None of these are fatal to the match and
/// none of them leave any trace in the match state.
#[derive(Clone, Debug, Deserialize, Eq, Error, Hash, PartialEq, Serialize)]
pub enum RuleError {
    #[error("stack not found")]
    StackNotFound,
    #[error("no card played")]
    NoCardPlayed,
    #[error("card not in your hand")]
    CardNotInHand,
    #[error("cannot create a stack above 14")]
    SumExceeds14,
    #[error("you do not hold a card matching the new stack value")]
    MissingSumCard,
    #[error("cannot pick up an ace with the other ace")]
    AceAceConflict,
    #[error("cannot boardstack a stack onto itself")]
    SameStack,
    #[error("not your turn")]
    NotYourTurn,
    #[error("unknown action type")]
    UnknownActionType,
    #[error("match is over")]
    MatchOver,
}
