//! Game persistence encoding.
//!
//! Snapshots carry the whole, unredacted game including what every player
//! has been told, so they belong in storage and never on the wire to a
//! player.

use bincode::config;
use thiserror::Error;

use crate::game::{Game, GameError};

/// Largest snapshot accepted, encoded either way.
pub const MAX_SNAPSHOT_SIZE: usize = 1024 * 1024;

/// Errors that can occur while encoding or decoding a snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to encode snapshot: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("Failed to decode snapshot: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("Failed to convert snapshot to or from JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot size {actual} exceeds maximum {max}")]
    TooLarge { actual: usize, max: usize },

    #[error("Snapshot holds an invalid game: {0}")]
    Invalid(#[from] GameError),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

fn check_size(actual: usize) -> SnapshotResult<()> {
    if actual > MAX_SNAPSHOT_SIZE {
        return Err(SnapshotError::TooLarge {
            actual,
            max: MAX_SNAPSHOT_SIZE,
        });
    }
    Ok(())
}

/// Compact binary form for storage.
pub fn encode(game: &Game) -> SnapshotResult<Vec<u8>> {
    let bytes = bincode::serde::encode_to_vec(game, config::standard())?;
    check_size(bytes.len())?;
    Ok(bytes)
}

/// Decode and check a stored game. Anything that wouldn't be safe to keep
/// playing is rejected with [`SnapshotError::Invalid`].
pub fn decode(bytes: &[u8]) -> SnapshotResult<Game> {
    check_size(bytes.len())?;
    let (game, _): (Game, usize) =
        bincode::serde::decode_from_slice(bytes, config::standard())?;
    game.validate()?;
    Ok(game)
}

/// Human-readable form, for logs and debugging tools.
pub fn to_json(game: &Game) -> SnapshotResult<String> {
    let json = serde_json::to_string(game)?;
    check_size(json.len())?;
    Ok(json)
}

pub fn from_json(json: &str) -> SnapshotResult<Game> {
    check_size(json.len())?;
    let game: Game = serde_json::from_str(json)?;
    game.validate()?;
    Ok(game)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        GameSettings,
        entities::{HintAttribute, Mode, Move, PlayerId},
    };

    fn played_game() -> Game {
        let settings = GameSettings {
            mode: Mode::Wildcard,
            ..GameSettings::default()
        };
        let mut game = Game::with_settings("snap".to_string(), "snapshot", settings).unwrap();
        let players = [PlayerId::new("a"), PlayerId::new("b")];
        for id in &players {
            game.add_player(id.clone(), id.as_str()).unwrap();
        }
        game.start().unwrap();
        let current = game.current_player().unwrap().id.clone();
        let other = players.iter().find(|p| **p != current).unwrap().clone();
        game.process_move(
            &current,
            Move::Hint {
                target: other,
                attribute: HintAttribute::Rank,
                card_index: 0,
                color: None,
            },
        )
        .unwrap();
        game
    }

    #[test]
    fn test_binary_round_trip_keeps_knowledge() {
        let game = played_game();
        let bytes = encode(&game).unwrap();
        let restored = decode(&bytes).unwrap();
        assert_eq!(restored, game);
        assert!(
            restored
                .players()
                .iter()
                .flat_map(|p| p.cards())
                .any(|c| c.known_rank.is_some())
        );
    }

    #[test]
    fn test_json_round_trip() {
        let game = played_game();
        let json = to_json(&game).unwrap();
        assert_eq!(from_json(&json).unwrap(), game);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(decode(&[0xff; 3]), Err(SnapshotError::Decode(_))));
        assert!(matches!(from_json("{"), Err(SnapshotError::Json(_))));
    }

    fn tampered(change: impl FnOnce(&mut serde_json::Value)) -> Game {
        let mut value = serde_json::to_value(played_game()).unwrap();
        change(&mut value);
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_out_of_range_seat_is_rejected() {
        let game = tampered(|v| v["table"]["current_player_index"] = 7.into());
        let json = serde_json::to_string(&game).unwrap();
        assert!(matches!(
            from_json(&json),
            Err(SnapshotError::Invalid(GameError::Inconsistent(_)))
        ));

        let bytes = encode(&game).unwrap();
        assert!(matches!(
            decode(&bytes),
            Err(SnapshotError::Invalid(GameError::Inconsistent(_)))
        ));
    }

    #[test]
    fn test_missing_pile_is_rejected() {
        let game = tampered(|v| {
            if let Some(piles) = v["table"]["piles"].as_array_mut() {
                piles.pop();
            }
        });
        let bytes = encode(&game).unwrap();
        assert!(matches!(decode(&bytes), Err(SnapshotError::Invalid(_))));
    }

    #[test]
    fn test_oversized_input_is_rejected() {
        let bytes = vec![0; MAX_SNAPSHOT_SIZE + 1];
        assert!(matches!(
            decode(&bytes),
            Err(SnapshotError::TooLarge { .. })
        ));
    }
}
