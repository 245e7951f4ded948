//! Game actor message types.

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};

use crate::game::{
    Game, GameId, GameResult, GameState, GameView, MoveOutcome, TurnNotification,
    entities::{Mode, Move, PlayerId},
};

/// Messages that can be sent to a GameActor
#[derive(Debug)]
pub enum GameMessage {
    AddPlayer {
        player: PlayerId,
        name: String,
        response: oneshot::Sender<GameResult<()>>,
    },

    Start {
        response: oneshot::Sender<GameResult<TurnNotification>>,
    },

    Move {
        player: PlayerId,
        mv: Move,
        response: oneshot::Sender<GameResult<MoveOutcome>>,
    },

    Announce {
        player: PlayerId,
        text: String,
        response: oneshot::Sender<GameResult<()>>,
    },

    /// Redacted state for one player
    GetView {
        player: PlayerId,
        response: oneshot::Sender<GameResult<GameView>>,
    },

    /// Full, unredacted copy for persistence
    GetSnapshot { response: oneshot::Sender<Game> },

    GetSummary {
        response: oneshot::Sender<GameSummary>,
    },

    SetPushToken {
        player: PlayerId,
        token: Option<String>,
        response: oneshot::Sender<GameResult<()>>,
    },

    Subscribe { sender: mpsc::Sender<GameEvent> },

    Close { response: oneshot::Sender<()> },
}

/// Events pushed to subscribers when a game changes
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum GameEvent {
    PlayerJoined(PlayerId),
    /// Someone new has to move
    Turn(TurnNotification),
    Announcement { player: PlayerId, text: String },
    Finished { state: GameState, score: u32 },
}

/// Game metadata for discovery
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameSummary {
    pub id: GameId,
    pub name: String,
    pub mode: Mode,
    pub state: GameState,
    pub player_count: usize,
    pub public: bool,
    pub score: u32,
}

impl From<&Game> for GameSummary {
    fn from(game: &Game) -> Self {
        Self {
            id: game.id().to_string(),
            name: game.name().to_string(),
            mode: game.settings().mode,
            state: game.state(),
            player_count: game.players().len(),
            public: game.settings().public,
            score: game.score(),
        }
    }
}
