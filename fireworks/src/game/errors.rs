//! Engine error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    entities::{Color, PlayerId},
    state_machine::GameState,
};

/// Errors returned by engine operations. None of them leave the game
/// partially mutated.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("game hasn't been initialized")]
    NotInitialized,
    #[error("game is {actual}, needs to be {expected}")]
    WrongState {
        expected: GameState,
        actual: GameState,
    },
    #[error("not {player}'s turn, waiting on {current}")]
    OutOfTurn { player: PlayerId, current: PlayerId },
    #[error("player {0} isn't in this game")]
    UnknownPlayer(PlayerId),
    #[error("player {0} already joined")]
    PlayerAlreadyJoined(PlayerId),
    #[error("game is full")]
    CapacityReached,
    #[error("can't play with {0} players")]
    InvalidPlayerCount(usize),
    #[error("no hints remaining")]
    NoHintsRemaining,
    #[error("can't hint yourself")]
    CannotHintSelf,
    #[error("invalid hint color {0:?}")]
    InvalidHintColor(Option<Color>),
    #[error("card index {index} out of range for a hand of {len}")]
    CardIndexOutOfRange { index: usize, len: usize },
    #[error("hand already holds {capacity} cards")]
    HandFull { capacity: usize },
    #[error("deck is empty")]
    DeckEmpty,
    #[error("inconsistent game: {0}")]
    Inconsistent(String),
}

/// Result type for engine operations
pub type GameResult<T> = Result<T, GameError>;
