//! Match manager for spawning and managing match actors.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::{RwLock, mpsc, oneshot};
use uuid::Uuid;

use super::{
    MatchId,
    actor::{MatchActor, MatchHandle},
    config::{DEFAULT_INBOX_CAPACITY, MatchConfig},
    errors::SessionError,
    messages::{ActionAccepted, MatchMessage, MatchMetadata, MatchNotification, SeatAssignment},
};
use crate::game::{ActionRecord, MatchState, PublicView, Seat, snapshot};

/// Registry of running matches.
///
/// The id counter and the handle map are the only state shared between
/// matches; everything else lives inside each match's actor.
#[derive(Clone, Default)]
pub struct MatchManager {
    /// Active match handles
    matches: Arc<RwLock<HashMap<MatchId, MatchHandle>>>,

    /// Next match ID
    next_match_id: Arc<RwLock<MatchId>>,
}

impl MatchManager {
    pub fn new() -> Self {
        Self::default()
    }

    async fn allocate_id(&self) -> MatchId {
        let mut next_id = self.next_match_id.write().await;
        *next_id += 1;
        *next_id
    }

    async fn spawn(&self, actor: MatchActor, handle: MatchHandle) {
        let mut matches = self.matches.write().await;
        matches.insert(handle.match_id(), handle);
        drop(matches);

        tokio::spawn(async move {
            actor.run().await;
        });
    }

    /// Create and spawn a new match
    ///
    /// # Arguments
    ///
    /// * `config` - Match configuration
    ///
    /// # Returns
    ///
    /// * `Result<(MatchId, MatchState), SessionError>` - Match ID and the freshly dealt state
    pub async fn create_match(
        &self,
        config: MatchConfig,
    ) -> Result<(MatchId, MatchState), SessionError> {
        config.validate()?;
        let match_id = self.allocate_id().await;
        let (actor, handle) = MatchActor::new(match_id, &config)?;
        let initial = actor.state().clone();
        self.spawn(actor, handle).await;

        log::info!("Created match {} '{}'", match_id, config.name);
        Ok((match_id, initial))
    }

    /// Spawn a match from a snapshot produced by [`MatchManager::snapshot`].
    /// The restored match gets a new id and empty seats.
    pub async fn restore_match(&self, bytes: &[u8], name: &str) -> Result<MatchId, SessionError> {
        let state = snapshot::decode(bytes)?;
        let match_id = self.allocate_id().await;
        let (actor, handle) =
            MatchActor::with_state(match_id, name.to_string(), state, DEFAULT_INBOX_CAPACITY);
        self.spawn(actor, handle).await;

        log::info!("Restored match {} '{}' from snapshot", match_id, name);
        Ok(match_id)
    }

    /// Get a match handle
    pub async fn get_match(&self, match_id: MatchId) -> Option<MatchHandle> {
        let matches = self.matches.read().await;
        matches.get(&match_id).cloned()
    }

    async fn request<T>(
        &self,
        match_id: MatchId,
        message: impl FnOnce(oneshot::Sender<T>) -> MatchMessage,
    ) -> Result<T, SessionError> {
        let handle = self
            .get_match(match_id)
            .await
            .ok_or(SessionError::MatchNotFound(match_id))?;

        let (tx, rx) = oneshot::channel();
        handle.send(message(tx)).await?;
        rx.await.map_err(|_| SessionError::ActorUnavailable)
    }

    /// Take the next free seat of a match (A first, then B)
    pub async fn join_match(&self, match_id: MatchId) -> Result<SeatAssignment, SessionError> {
        self.request(match_id, |response| MatchMessage::Join { response })
            .await?
    }

    /// Map a reconnecting client back onto its seat
    pub async fn reconnect(&self, match_id: MatchId, token: Uuid) -> Result<Seat, SessionError> {
        self.request(match_id, |response| MatchMessage::Reconnect { token, response })
            .await?
    }

    /// Submit an action for a seat
    ///
    /// # Arguments
    ///
    /// * `match_id` - Match ID
    /// * `seat` - Acting seat
    /// * `action` - A typed [`crate::game::Action`] or a loose [`ActionRecord`]
    ///
    /// # Returns
    ///
    /// * `Result<ActionAccepted, SessionError>` - The seat's new view and the events, or why
    ///   the action was rejected
    pub async fn submit_action(
        &self,
        match_id: MatchId,
        seat: Seat,
        action: impl Into<ActionRecord>,
    ) -> Result<ActionAccepted, SessionError> {
        let action = action.into();
        self.request(match_id, |response| MatchMessage::SubmitAction {
            seat,
            action,
            response,
        })
        .await?
    }

    /// What `seat` may see of a match
    pub async fn public_view(
        &self,
        match_id: MatchId,
        seat: Seat,
    ) -> Result<PublicView, SessionError> {
        self.request(match_id, |response| MatchMessage::GetView { seat, response })
            .await
    }

    /// Full state of a match, both hands included
    pub async fn match_state(&self, match_id: MatchId) -> Result<MatchState, SessionError> {
        self.request(match_id, |response| MatchMessage::GetState { response })
            .await
    }

    pub async fn snapshot(&self, match_id: MatchId) -> Result<Vec<u8>, SessionError> {
        self.request(match_id, |response| MatchMessage::Snapshot { response })
            .await?
    }

    /// Register `sender` for a seat's notifications, replacing any earlier one
    pub async fn subscribe(
        &self,
        match_id: MatchId,
        seat: Seat,
        sender: mpsc::Sender<MatchNotification>,
    ) -> Result<(), SessionError> {
        let handle = self
            .get_match(match_id)
            .await
            .ok_or(SessionError::MatchNotFound(match_id))?;
        handle.send(MatchMessage::Subscribe { seat, sender }).await
    }

    pub async fn unsubscribe(&self, match_id: MatchId, seat: Seat) -> Result<(), SessionError> {
        let handle = self
            .get_match(match_id)
            .await
            .ok_or(SessionError::MatchNotFound(match_id))?;
        handle.send(MatchMessage::Unsubscribe { seat }).await
    }

    /// End a match for good and drop it from the registry
    pub async fn terminate_match(
        &self,
        match_id: MatchId,
        reason: impl Into<String>,
    ) -> Result<(), SessionError> {
        let reason = reason.into();
        self.request(match_id, |response| MatchMessage::Terminate {
            reason: reason.clone(),
            response,
        })
        .await?;

        let mut matches = self.matches.write().await;
        matches.remove(&match_id);
        drop(matches);

        log::info!("Terminated match {}: {}", match_id, reason);
        Ok(())
    }

    /// List all running matches, oldest first
    pub async fn list_matches(&self) -> Vec<MatchMetadata> {
        let handles: Vec<MatchHandle> = {
            let matches = self.matches.read().await;
            matches.values().cloned().collect()
        };

        let mut listing = Vec::with_capacity(handles.len());
        for handle in handles {
            let (tx, rx) = oneshot::channel();
            if handle
                .send(MatchMessage::GetMetadata { response: tx })
                .await
                .is_err()
            {
                continue;
            }
            if let Ok(metadata) = rx.await {
                listing.push(metadata);
            }
        }
        listing.sort_by_key(|m| m.id);
        listing
    }

    /// Get active match count
    pub async fn active_match_count(&self) -> usize {
        let matches = self.matches.read().await;
        matches.len()
    }
}
