use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::game::{
    Game, GameId, GameState, MoveOutcome,
    entities::{HintAttribute, Mode, Move, MoveResult, PlayerId},
};

/// Move categories counted by statistics.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum MoveKind {
    Play,
    Discard,
    RankHint,
    ColorHint,
}

impl From<&Move> for MoveKind {
    fn from(value: &Move) -> Self {
        match value {
            Move::Play { .. } => Self::Play,
            Move::Discard { .. } => Self::Discard,
            Move::Hint {
                attribute: HintAttribute::Rank,
                ..
            } => Self::RankHint,
            Move::Hint {
                attribute: HintAttribute::Color,
                ..
            } => Self::ColorHint,
        }
    }
}

/// One accepted move, as handed to the statistics log.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct MoveRecord {
    pub game_id: GameId,
    pub game_name: String,
    pub mode: Mode,
    /// Every seat, in order. Finished games count for all of them.
    pub players: Vec<PlayerId>,
    pub actor: PlayerId,
    pub kind: MoveKind,
    pub result: MoveResult,
    pub state: GameState,
    pub score: u32,
    /// Unix seconds.
    pub timestamp: i64,
    pub start_time: Option<i64>,
    pub ignore_time: bool,
}

impl MoveRecord {
    #[must_use]
    pub fn new(game: &Game, actor: &PlayerId, mv: &Move, outcome: &MoveOutcome) -> Self {
        Self {
            game_id: game.id().to_string(),
            game_name: game.name().to_string(),
            mode: game.settings().mode,
            players: game.players().iter().map(|p| p.id.clone()).collect(),
            actor: actor.clone(),
            kind: MoveKind::from(mv),
            result: outcome.result,
            state: outcome.state,
            score: game.score(),
            timestamp: game.update_time().unwrap_or_else(|| Utc::now().timestamp()),
            start_time: game.start_time(),
            ignore_time: game.settings().ignore_time,
        }
    }

    #[must_use]
    pub fn num_players(&self) -> usize {
        self.players.len()
    }
}

/// Running counters for one slice of games.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct StatLog {
    pub moves: u64,
    pub plays: u64,
    pub bombs: u64,
    pub discards: u64,
    pub hints: u64,
    pub rank_hints: u64,
    pub color_hints: u64,
    pub bombs_losses: u64,
    pub turns_losses: u64,
    pub no_plays_losses: u64,
    /// Seconds spent between moves.
    pub turn_time: u64,
    /// Seconds from start to finish over finished games.
    pub game_time: u64,
    pub started_games: u64,
    pub finished_games: u64,
    /// Final score histogram.
    pub scores: BTreeMap<u32, u64>,
}

impl StatLog {
    pub(crate) fn add_move(&mut self, kind: MoveKind, result: MoveResult, turn_time: u64) {
        self.moves += 1;
        self.turn_time += turn_time;
        match (kind, result) {
            (MoveKind::Play, MoveResult::Bomb) => self.bombs += 1,
            (MoveKind::Play, _) => self.plays += 1,
            (MoveKind::Discard, _) => self.discards += 1,
            (MoveKind::RankHint, _) => {
                self.hints += 1;
                self.rank_hints += 1;
            }
            (MoveKind::ColorHint, _) => {
                self.hints += 1;
                self.color_hints += 1;
            }
        }
    }

    pub(crate) fn add_start(&mut self) {
        self.started_games += 1;
    }

    pub(crate) fn add_finish(&mut self, state: GameState, game_time: u64, score: u32) {
        match state {
            GameState::BombedOut => self.bombs_losses += 1,
            GameState::DeckEmpty => self.turns_losses += 1,
            GameState::NoPlays => self.no_plays_losses += 1,
            _ => {}
        }
        self.finished_games += 1;
        self.game_time += game_time;
        *self.scores.entry(score).or_default() += 1;
    }

    #[must_use]
    pub fn average_score(&self) -> Option<f64> {
        if self.finished_games == 0 {
            return None;
        }
        let total: u64 = self
            .scores
            .iter()
            .map(|(score, count)| u64::from(*score) * count)
            .sum();
        Some(total as f64 / self.finished_games as f64)
    }

    #[must_use]
    pub fn average_turn_time(&self) -> Option<f64> {
        (self.moves > 0).then(|| self.turn_time as f64 / self.moves as f64)
    }
}

/// A [`StatLog`] broken down by mode and by player count.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SlicedStatLog {
    pub overall: StatLog,
    pub modes: HashMap<Mode, StatLog>,
    pub num_players: HashMap<usize, StatLog>,
    pub modes_and_players: HashMap<Mode, HashMap<usize, StatLog>>,
}

impl SlicedStatLog {
    /// Apply `f` to every slice a game with `mode` and `num_players` counts in.
    pub(crate) fn update<F>(&mut self, mode: Mode, num_players: usize, mut f: F)
    where
        F: FnMut(&mut StatLog),
    {
        f(&mut self.overall);
        f(self.modes.entry(mode).or_default());
        f(self.num_players.entry(num_players).or_default());
        f(self
            .modes_and_players
            .entry(mode)
            .or_default()
            .entry(num_players)
            .or_default());
    }

    #[must_use]
    pub fn for_mode(&self, mode: Mode) -> Option<&StatLog> {
        self.modes.get(&mode)
    }

    #[must_use]
    pub fn for_player_count(&self, num_players: usize) -> Option<&StatLog> {
        self.num_players.get(&num_players)
    }

    #[must_use]
    pub fn for_mode_and_players(&self, mode: Mode, num_players: usize) -> Option<&StatLog> {
        self.modes_and_players
            .get(&mode)
            .and_then(|by_players| by_players.get(&num_players))
    }
}
