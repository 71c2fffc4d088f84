//! # Tableen
//!
//! Rules engine and match coordinator for Tableen, a two-player card game
//! played by stacking, summing and grabbing cards from a shared table.
//!
//! ## Architecture
//!
//! The crate has two layers:
//!
//! - [`game`]: a pure, synchronous rules engine. Actions are validated and
//!   applied against a staged copy of the round, so a rejected action never
//!   leaves a trace. The [`game::MatchState`] controller drives dealing,
//!   turn order, refills, round scoring and the end of the match.
//! - [`session`]: one Tokio actor per match plus a registry. This is the
//!   surface a transport layer talks to: create, join, submit, view,
//!   subscribe, snapshot and terminate.
//!
//! ## Example
//!
//! ```
//! use tableen::{Action, GameSettings, MatchState, Seat};
//!
//! let mut state = MatchState::new(GameSettings::default(), 42).unwrap();
//! let card = state.round().hands[Seat::A].cards()[0];
//! let events = state
//!     .submit(Seat::A, &Action::Normal { played_card: card.into() })
//!     .unwrap();
//! assert!(!events.is_empty());
//! assert_eq!(state.current_turn(), Seat::B);
//! ```

/// Cards, rules, scoring and the match controller.
pub mod game;
pub use game::{
    Action, ActionRecord, Card, DeckVariant, GameEvent, GameSettings, MatchOutcome, MatchPhase,
    MatchState, PlayedCard, PublicView, RuleError, Seat, StackId, Suit,
};

/// Per-match actors and the match registry.
pub mod session;
pub use session::{MatchConfig, MatchId, MatchManager, SessionError};
