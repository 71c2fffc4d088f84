//! Tableen rules engine.
//!
//! This module provides the whole game without any I/O:
//! - Cards, decks and the ace dual-value helpers
//! - The table's stack ledger
//! - Action validation and application on a staged copy of the round
//! - Round scoring
//! - The round/match controller, per-seat views and snapshots

pub mod actions;
pub mod cards;
pub mod errors;
pub mod round;
pub mod rules;
pub mod scoring;
pub mod seat;
pub mod seed;
pub mod settings;
pub mod snapshot;
pub mod stacks;
pub mod state;
pub mod view;

pub use actions::{Action, ActionKind, ActionRecord};
pub use cards::{Card, Deck, DeckVariant, PlayedCard, Suit, Value};
pub use errors::RuleError;
pub use round::{Hand, RoundState};
pub use rules::{Applied, apply_action};
pub use scoring::{RoundPoints, ScoreBreakdown, score};
pub use seat::{PerSeat, Seat};
pub use settings::{GameSettings, SettingsError, UnclaimedTablePolicy};
pub use snapshot::SnapshotError;
pub use stacks::{Stack, StackId, StackLedger};
pub use state::{GameEvent, MatchOutcome, MatchPhase, MatchState, RoundSummary};
pub use view::PublicView;
