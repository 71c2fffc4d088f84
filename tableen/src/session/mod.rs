//! Session module running each match in its own async actor.
//!
//! This module implements:
//! - MatchActor: async actor owning a single match
//! - MatchManager: registry spawning and addressing match actors
//! - Message-based communication with tokio channels
//!
//! ## Architecture
//!
//! Each match runs in a separate Tokio task with an mpsc message inbox, so
//! actions on one match are applied strictly one after another while
//! different matches run in parallel. The MatchManager holds the only
//! cross-match state: the id counter and the map of handles.
//!
//! ## Example
//!
//! ```no_run
//! use tableen::session::{MatchConfig, MatchManager};
//!
//! # async fn demo() -> Result<(), tableen::session::SessionError> {
//! let manager = MatchManager::new();
//! let (match_id, _initial) = manager.create_match(MatchConfig::default()).await?;
//! let first = manager.join_match(match_id).await?;
//! let second = manager.join_match(match_id).await?;
//! let view = manager.public_view(match_id, first.seat).await?;
//! # let _ = (second, view);
//! # Ok(())
//! # }
//! ```

pub mod actor;
pub mod config;
pub mod errors;
pub mod manager;
pub mod messages;

/// Identifier of a running match.
pub type MatchId = u64;

pub use actor::{MatchActor, MatchHandle};
pub use config::{ConfigError, MatchConfig};
pub use errors::SessionError;
pub use manager::MatchManager;
pub use messages::{ActionAccepted, MatchMessage, MatchMetadata, MatchNotification, SeatAssignment};
