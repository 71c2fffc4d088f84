//! Match actor implementation with async message handling.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::{
    MatchId,
    config::MatchConfig,
    errors::SessionError,
    messages::{ActionAccepted, MatchMessage, MatchMetadata, MatchNotification, SeatAssignment},
};
use crate::game::{ActionRecord, GameEvent, MatchState, PerSeat, Seat, snapshot};

/// Match actor handle for sending messages
#[derive(Clone, Debug)]
pub struct MatchHandle {
    sender: mpsc::Sender<MatchMessage>,
    match_id: MatchId,
}

impl MatchHandle {
    pub fn new(sender: mpsc::Sender<MatchMessage>, match_id: MatchId) -> Self {
        Self { sender, match_id }
    }

    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    /// Send a message to the match
    pub async fn send(&self, message: MatchMessage) -> Result<(), SessionError> {
        self.sender
            .send(message)
            .await
            .map_err(|_| SessionError::ActorUnavailable)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Match actor owning the state of a single match.
///
/// Messages are handled one at a time, so two actions on the same match never
/// interleave.
pub struct MatchActor {
    id: MatchId,

    name: String,

    state: MatchState,

    inbox: mpsc::Receiver<MatchMessage>,

    /// Reconnect token per seat, set on join
    seats: PerSeat<Option<Uuid>>,

    subscribers: HashMap<Seat, mpsc::Sender<MatchNotification>>,

    created_at: DateTime<Utc>,

    is_closed: bool,
}

impl MatchActor {
    /// Create a new match actor and deal the first round
    ///
    /// # Arguments
    ///
    /// * `id` - Match ID
    /// * `config` - Match configuration
    ///
    /// # Returns
    ///
    /// * `(MatchActor, MatchHandle)` - Actor and handle for sending messages
    pub fn new(id: MatchId, config: &MatchConfig) -> Result<(Self, MatchHandle), SessionError> {
        config.validate()?;
        let state = MatchState::new(config.settings.clone(), config.resolve_seed())
            .map_err(|e| SessionError::InvalidConfig(e.into()))?;
        Ok(Self::with_state(
            id,
            config.name.clone(),
            state,
            config.inbox_capacity,
        ))
    }

    /// Create an actor around an existing match state, e.g. one decoded from a
    /// snapshot. Both seats start empty.
    pub fn with_state(
        id: MatchId,
        name: String,
        state: MatchState,
        inbox_capacity: usize,
    ) -> (Self, MatchHandle) {
        let (sender, inbox) = mpsc::channel(inbox_capacity.max(1));
        let actor = Self {
            id,
            name,
            state,
            inbox,
            seats: PerSeat::default(),
            subscribers: HashMap::new(),
            created_at: Utc::now(),
            is_closed: false,
        };
        (actor, MatchHandle::new(sender, id))
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Run the match actor event loop
    pub async fn run(mut self) {
        log::info!("Match {} '{}' starting", self.id, self.name);

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message);
            if self.is_closed {
                break;
            }
        }

        log::info!("Match {} '{}' closed", self.id, self.name);
    }

    fn handle_message(&mut self, message: MatchMessage) {
        match message {
            MatchMessage::Join { response } => {
                let _ = response.send(self.handle_join());
            }

            MatchMessage::Reconnect { token, response } => {
                let _ = response.send(self.handle_reconnect(token));
            }

            MatchMessage::SubmitAction {
                seat,
                action,
                response,
            } => {
                let _ = response.send(self.handle_action(seat, action));
            }

            MatchMessage::GetView { seat, response } => {
                let _ = response.send(self.state.public_view(seat));
            }

            MatchMessage::GetState { response } => {
                let _ = response.send(self.state.clone());
            }

            MatchMessage::GetMetadata { response } => {
                let _ = response.send(self.metadata());
            }

            MatchMessage::Snapshot { response } => {
                let result = snapshot::encode(&self.state).map_err(SessionError::from);
                let _ = response.send(result);
            }

            MatchMessage::Subscribe { seat, sender } => {
                self.subscribers.insert(seat, sender);
                log::debug!("Seat {} subscribed to match {}", seat, self.id);
            }

            MatchMessage::Unsubscribe { seat } => {
                self.subscribers.remove(&seat);
                log::debug!("Seat {} unsubscribed from match {}", seat, self.id);
            }

            MatchMessage::Terminate { reason, response } => {
                let event = self.state.terminate(reason);
                self.notify_all(&event);
                self.is_closed = true;
                let _ = response.send(());
            }
        }
    }

    fn handle_join(&mut self) -> Result<SeatAssignment, SessionError> {
        let seat = Seat::BOTH
            .into_iter()
            .find(|&seat| self.seats[seat].is_none())
            .ok_or(SessionError::MatchFull)?;
        let token = Uuid::new_v4();
        self.seats[seat] = Some(token);
        log::info!("Seat {} joined match {}", seat, self.id);
        Ok(SeatAssignment { seat, token })
    }

    fn handle_reconnect(&mut self, token: Uuid) -> Result<Seat, SessionError> {
        let seat = Seat::BOTH
            .into_iter()
            .find(|&seat| self.seats[seat] == Some(token))
            .ok_or(SessionError::UnknownSeatToken)?;
        log::info!("Seat {} reconnected to match {}", seat, self.id);
        Ok(seat)
    }

    fn handle_action(
        &mut self,
        seat: Seat,
        record: ActionRecord,
    ) -> Result<ActionAccepted, SessionError> {
        if self.seats.a.is_none() || self.seats.b.is_none() {
            return Err(SessionError::WaitingForOpponent);
        }

        match self.state.submit_record(seat, record) {
            Ok(events) => {
                for event in &events {
                    self.notify_all(event);
                }
                Ok(ActionAccepted {
                    view: self.state.public_view(seat),
                    events,
                })
            }
            Err(reason) => {
                log::debug!("Match {}: seat {} rejected: {}", self.id, seat, reason);
                self.notify_seat(
                    seat,
                    GameEvent::ActionRejected {
                        reason: reason.clone(),
                    },
                );
                Err(SessionError::Rejected(reason))
            }
        }
    }

    fn metadata(&self) -> MatchMetadata {
        MatchMetadata {
            id: self.id,
            name: self.name.clone(),
            seats_taken: Seat::BOTH
                .iter()
                .filter(|&&seat| self.seats[seat].is_some())
                .count(),
            round: self.state.round_number(),
            points: self.state.points(),
            phase: self.state.phase().clone(),
            created_at: self.created_at,
        }
    }

    /// Broadcast an event to all subscribers
    fn notify_all(&mut self, event: &GameEvent) {
        let notification = MatchNotification {
            match_id: self.id,
            event: event.clone(),
        };
        self.subscribers
            .retain(|seat, sender| match sender.try_send(notification.clone()) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!("Seat {} channel full, dropping notification", seat);
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    log::debug!("Seat {} disconnected, removing subscriber", seat);
                    false
                }
            });
    }

    /// Deliver an event to one seat only
    fn notify_seat(&mut self, seat: Seat, event: GameEvent) {
        let Some(sender) = self.subscribers.get(&seat) else {
            return;
        };
        let notification = MatchNotification {
            match_id: self.id,
            event,
        };
        match sender.try_send(notification) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                log::warn!("Seat {} channel full, dropping notification", seat);
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.subscribers.remove(&seat);
            }
        }
    }
}
