use serde::{Deserialize, Serialize};
use std::fmt;

use super::cards::PlayedCard;
use super::errors::RuleError;
use super::stacks::StackId;

/// The four moves a seat can make.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum Action {
    /// Lay a hand card on the table as a new single-card stack.
    Normal { played_card: PlayedCard },
    /// Add a hand card onto an existing stack, as a pile or as a declared sum.
    Stack {
        stack_id: StackId,
        played_card: PlayedCard,
        #[serde(default)]
        stack_as_sum: bool,
    },
    /// Take a stack into the collected pile, optionally with a hand card.
    Grab {
        stack_id: StackId,
        #[serde(default)]
        played_card: Option<PlayedCard>,
    },
    /// Merge `from` into `to` without using a hand card.
    Boardstack {
        from: StackId,
        to: StackId,
        #[serde(default)]
        stack_as_sum: bool,
    },
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Normal,
    Stack,
    Grab,
    Boardstack,
}

impl ActionKind {
    /// Board reorganisation is free; everything else ends the turn.
    #[must_use]
    pub const fn passes_turn(self) -> bool {
        !matches!(self, Self::Boardstack)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Normal => "normal",
            Self::Stack => "stack",
            Self::Grab => "grab",
            Self::Boardstack => "boardstack",
        };
        write!(f, "{repr}")
    }
}

impl Action {
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::Normal { .. } => ActionKind::Normal,
            Self::Stack { .. } => ActionKind::Stack,
            Self::Grab { .. } => ActionKind::Grab,
            Self::Boardstack { .. } => ActionKind::Boardstack,
        }
    }

    #[must_use]
    pub fn played_card(&self) -> Option<&PlayedCard> {
        match self {
            Self::Normal { played_card } | Self::Stack { played_card, .. } => Some(played_card),
            Self::Grab { played_card, .. } => played_card.as_ref(),
            Self::Boardstack { .. } => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal { played_card } => write!(f, "play {played_card}"),
            Self::Stack {
                stack_id,
                played_card,
                stack_as_sum,
            } => {
                let mode = if *stack_as_sum { " as sum" } else { "" };
                write!(f, "stack {played_card} on #{stack_id}{mode}")
            }
            Self::Grab {
                stack_id,
                played_card: Some(played_card),
            } => write!(f, "grab #{stack_id} with {played_card}"),
            Self::Grab { stack_id, .. } => write!(f, "grab #{stack_id}"),
            Self::Boardstack {
                from,
                to,
                stack_as_sum,
            } => {
                let mode = if *stack_as_sum { " as sum" } else { "" };
                write!(f, "boardstack #{from} onto #{to}{mode}")
            }
        }
    }
}

/// Loosely-typed action record as it arrives from a client. Every field but
/// `type` is optional; [`Action::try_from`] decides what is missing.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub played_card: Option<PlayedCard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_id: Option<StackId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<StackId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<StackId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_as_sum: Option<bool>,
}

impl ActionRecord {
    /// Parse a record from the JSON a client sends.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl TryFrom<ActionRecord> for Action {
    type Error = RuleError;

    fn try_from(value: ActionRecord) -> Result<Self, Self::Error> {
        let stack_as_sum = value.stack_as_sum.unwrap_or(false);
        match value.kind.as_str() {
            "normal" => Ok(Self::Normal {
                played_card: value.played_card.ok_or(RuleError::NoCardPlayed)?,
            }),
            "stack" => {
                let stack_id = value.stack_id.ok_or(RuleError::StackNotFound)?;
                let played_card = value.played_card.ok_or(RuleError::NoCardPlayed)?;
                Ok(Self::Stack {
                    stack_id,
                    played_card,
                    stack_as_sum,
                })
            }
            "grab" => Ok(Self::Grab {
                stack_id: value.stack_id.ok_or(RuleError::StackNotFound)?,
                played_card: value.played_card,
            }),
            "boardstack" => match (value.from, value.to) {
                (Some(from), Some(to)) => Ok(Self::Boardstack {
                    from,
                    to,
                    stack_as_sum,
                }),
                _ => Err(RuleError::StackNotFound),
            },
            _ => Err(RuleError::UnknownActionType),
        }
    }
}

impl From<Action> for ActionRecord {
    fn from(value: Action) -> Self {
        let kind = value.kind().to_string();
        match value {
            Action::Normal { played_card } => Self {
                kind,
                played_card: Some(played_card),
                ..Default::default()
            },
            Action::Stack {
                stack_id,
                played_card,
                stack_as_sum,
            } => Self {
                kind,
                played_card: Some(played_card),
                stack_id: Some(stack_id),
                stack_as_sum: Some(stack_as_sum),
                ..Default::default()
            },
            Action::Grab {
                stack_id,
                played_card,
            } => Self {
                kind,
                played_card,
                stack_id: Some(stack_id),
                ..Default::default()
            },
            Action::Boardstack {
                from,
                to,
                stack_as_sum,
            } => Self {
                kind,
                from: Some(from),
                to: Some(to),
                stack_as_sum: Some(stack_as_sum),
                ..Default::default()
            },
        }
    }
}
