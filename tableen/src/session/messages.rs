//! Match actor message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use super::{MatchId, errors::SessionError};
use crate::game::{ActionRecord, GameEvent, MatchPhase, MatchState, PerSeat, PublicView, Seat};

/// Messages that can be sent to a MatchActor
#[derive(Debug)]
pub enum MatchMessage {
    /// Take the next free seat
    Join {
        response: oneshot::Sender<Result<SeatAssignment, SessionError>>,
    },

    /// Reclaim a seat with the token handed out on join
    Reconnect {
        token: Uuid,
        response: oneshot::Sender<Result<Seat, SessionError>>,
    },

    /// Play an action for a seat
    SubmitAction {
        seat: Seat,
        action: ActionRecord,
        response: oneshot::Sender<Result<ActionAccepted, SessionError>>,
    },

    /// Get the view for a specific seat
    GetView {
        seat: Seat,
        response: oneshot::Sender<PublicView>,
    },

    /// Get the full match state
    GetState {
        response: oneshot::Sender<MatchState>,
    },

    /// Get listing metadata
    GetMetadata {
        response: oneshot::Sender<MatchMetadata>,
    },

    /// Encode the match state
    Snapshot {
        response: oneshot::Sender<Result<Vec<u8>, SessionError>>,
    },

    /// Subscribe a seat to match notifications
    Subscribe {
        seat: Seat,
        sender: mpsc::Sender<MatchNotification>,
    },

    /// Unsubscribe a seat from match notifications
    Unsubscribe { seat: Seat },

    /// End the match and stop the actor
    Terminate {
        reason: String,
        response: oneshot::Sender<()>,
    },
}

/// Notification pushed to subscribers when a match changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchNotification {
    pub match_id: MatchId,
    pub event: GameEvent,
}

/// Seat handed out by a join
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAssignment {
    pub seat: Seat,
    /// Secret used to reclaim the seat after a reconnect
    pub token: Uuid,
}

/// Result of an accepted action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionAccepted {
    /// The submitting seat's view after the action
    pub view: PublicView,
    /// Events the action produced, in order
    pub events: Vec<GameEvent>,
}

/// Match metadata for discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchMetadata {
    pub id: MatchId,
    pub name: String,
    pub seats_taken: usize,
    pub round: u32,
    pub points: PerSeat<u32>,
    pub phase: MatchPhase,
    pub created_at: DateTime<Utc>,
}
