//! Binary snapshots of a match.
//!
//! A snapshot is the whole [`MatchState`] wrapped with a format version and
//! encoded with bincode's standard configuration.

use bincode::{
    config,
    serde::{decode_from_slice, encode_to_vec},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::MatchState;

/// Snapshots larger than this are refused in both directions.
pub const MAX_SNAPSHOT_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotVersion {
    V1,
}

impl SnapshotVersion {
    pub fn current() -> Self {
        SnapshotVersion::V1
    }
}

impl Default for SnapshotVersion {
    fn default() -> Self {
        Self::current()
    }
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("snapshot size {actual} exceeds maximum {max}")]
    TooLarge { actual: usize, max: usize },
    #[error("unsupported snapshot version {0:?}")]
    UnsupportedVersion(SnapshotVersion),
    #[error("{0} trailing bytes after snapshot")]
    TrailingBytes(usize),
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    version: SnapshotVersion,
    state: MatchState,
}

pub fn encode(state: &MatchState) -> Result<Vec<u8>, SnapshotError> {
    let envelope = Envelope {
        version: SnapshotVersion::current(),
        state: state.clone(),
    };
    let bytes = encode_to_vec(&envelope, config::standard())?;
    if bytes.len() > MAX_SNAPSHOT_SIZE {
        return Err(SnapshotError::TooLarge {
            actual: bytes.len(),
            max: MAX_SNAPSHOT_SIZE,
        });
    }
    Ok(bytes)
}

pub fn decode(bytes: &[u8]) -> Result<MatchState, SnapshotError> {
    if bytes.len() > MAX_SNAPSHOT_SIZE {
        return Err(SnapshotError::TooLarge {
            actual: bytes.len(),
            max: MAX_SNAPSHOT_SIZE,
        });
    }
    let (envelope, read): (Envelope, usize) = decode_from_slice(bytes, config::standard())?;
    if read != bytes.len() {
        return Err(SnapshotError::TrailingBytes(bytes.len() - read));
    }
    if envelope.version != SnapshotVersion::current() {
        return Err(SnapshotError::UnsupportedVersion(envelope.version));
    }
    Ok(envelope.state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{actions::Action, seat::Seat, settings::GameSettings};

    #[test]
    fn test_snapshot_restores_identical_match() {
        let mut state = MatchState::new(GameSettings::default(), 77).unwrap();
        let played = state.round().hands.a.cards()[0].into();
        state
            .submit(Seat::A, &Action::Normal { played_card: played })
            .unwrap();

        let bytes = encode(&state).unwrap();
        let restored = decode(&bytes).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_truncated_snapshot_fails() {
        let state = MatchState::new(GameSettings::default(), 1).unwrap();
        let bytes = encode(&state).unwrap();
        assert!(matches!(
            decode(&bytes[..bytes.len() / 2]),
            Err(SnapshotError::Decode(_))
        ));
    }

    #[test]
    fn test_trailing_bytes_are_rejected() {
        let state = MatchState::new(GameSettings::default(), 1).unwrap();
        let mut bytes = encode(&state).unwrap();
        bytes.push(0);
        assert!(matches!(decode(&bytes), Err(SnapshotError::TrailingBytes(1))));
    }

    #[test]
    fn test_oversized_input_is_refused() {
        let bytes = vec![0; MAX_SNAPSHOT_SIZE + 1];
        assert!(matches!(decode(&bytes), Err(SnapshotError::TooLarge { .. })));
    }
}
