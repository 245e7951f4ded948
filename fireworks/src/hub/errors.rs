use thiserror::Error;

use crate::game::{GameError, GameId};

/// Errors returned by the hub and game handles.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum HubError {
    #[error("game {0} not found")]
    GameNotFound(GameId),
    #[error("game {0} is already hosted")]
    DuplicateGame(GameId),
    #[error("hub is already hosting {0} games")]
    CapacityReached(usize),
    #[error("game {0} is closed")]
    GameClosed(GameId),
    #[error("invalid hub config: {0}")]
    Config(String),
    #[error(transparent)]
    Game(#[from] GameError),
}

pub type HubResult<T> = Result<T, HubError>;
