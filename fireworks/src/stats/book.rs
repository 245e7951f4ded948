use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::models::{MoveRecord, SlicedStatLog, StatLog};
use crate::game::{Game, GameId, entities::PlayerId};

/// Per-game counters plus when its last move happened.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct GameLog {
    pub name: String,
    pub stats: StatLog,
    /// Unix seconds of the last recorded move, or the start.
    pub last_move_time: Option<i64>,
}

/// Aggregate statistics over every game the hub has seen. Nothing in here
/// feeds back into a game. Per-game logs live until the game is removed;
/// the overall and per-player tallies are kept for good.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct StatsBook {
    overall: SlicedStatLog,
    players: HashMap<PlayerId, SlicedStatLog>,
    games: HashMap<GameId, GameLog>,
}

impl StatsBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a freshly started game for every seat.
    pub fn record_start(&mut self, game: &Game) {
        let mode = game.settings().mode;
        let num_players = game.players().len();
        let game_log = self.games.entry(game.id().to_string()).or_default();
        game_log.name = game.name().to_string();
        game_log.last_move_time = game.start_time();
        game_log.stats.add_start();

        self.overall.update(mode, num_players, StatLog::add_start);
        for player in game.players() {
            self.players
                .entry(player.id.clone())
                .or_default()
                .update(mode, num_players, StatLog::add_start);
        }
        debug!("Stats: game {} started", game.id());
    }

    pub fn record_move(&mut self, record: &MoveRecord) {
        let num_players = record.num_players();
        let game_log = self.games.entry(record.game_id.clone()).or_default();
        if game_log.name.is_empty() {
            game_log.name.clone_from(&record.game_name);
        }

        let previous = game_log
            .last_move_time
            .or(record.start_time)
            .unwrap_or(record.timestamp);
        let turn_time = if record.ignore_time {
            0
        } else {
            elapsed(previous, record.timestamp)
        };
        game_log.last_move_time = Some(record.timestamp);
        game_log
            .stats
            .add_move(record.kind, record.result, turn_time);

        let add_move = |log: &mut StatLog| log.add_move(record.kind, record.result, turn_time);
        self.overall.update(record.mode, num_players, add_move);
        self.players
            .entry(record.actor.clone())
            .or_default()
            .update(record.mode, num_players, add_move);

        if record.state.is_terminal() {
            let game_time = if record.ignore_time {
                0
            } else {
                elapsed(record.start_time.unwrap_or(record.timestamp), record.timestamp)
            };
            let add_finish =
                |log: &mut StatLog| log.add_finish(record.state, game_time, record.score);
            game_log.stats.add_finish(record.state, game_time, record.score);
            self.overall.update(record.mode, num_players, add_finish);
            for player in &record.players {
                self.players
                    .entry(player.clone())
                    .or_default()
                    .update(record.mode, num_players, add_finish);
            }
            debug!(
                "Stats: game {} finished {} with {}",
                record.game_id, record.state, record.score
            );
        }
    }

    #[must_use]
    pub const fn overall(&self) -> &SlicedStatLog {
        &self.overall
    }

    #[must_use]
    pub fn player(&self, id: &PlayerId) -> Option<&SlicedStatLog> {
        self.players.get(id)
    }

    #[must_use]
    pub fn game(&self, id: &str) -> Option<&GameLog> {
        self.games.get(id)
    }

    /// Drop a game's own log once it's no longer hosted.
    pub fn remove_game(&mut self, id: &str) -> Option<GameLog> {
        let removed = self.games.remove(id);
        if removed.is_some() {
            debug!("Stats: dropped log for game {id}");
        }
        removed
    }
}

fn elapsed(from: i64, to: i64) -> u64 {
    u64::try_from(to.saturating_sub(from)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        GameState,
        entities::{Mode, MoveResult},
    };
    use crate::stats::models::MoveKind;

    fn record(actor: &str, kind: MoveKind, result: MoveResult, timestamp: i64) -> MoveRecord {
        MoveRecord {
            game_id: "g1".to_string(),
            game_name: "friday".to_string(),
            mode: Mode::Rainbow,
            players: vec![PlayerId::new("a"), PlayerId::new("b")],
            actor: PlayerId::new(actor),
            kind,
            result,
            state: GameState::Started,
            score: 0,
            timestamp,
            start_time: Some(1_000),
            ignore_time: false,
        }
    }

    #[test]
    fn test_turn_time_measured_between_moves() {
        let mut book = StatsBook::new();
        book.record_move(&record("a", MoveKind::Play, MoveResult::Play, 1_010));
        book.record_move(&record("b", MoveKind::Discard, MoveResult::Other, 1_025));

        let game = book.game("g1").unwrap();
        assert_eq!(game.name, "friday");
        assert_eq!(game.stats.moves, 2);
        assert_eq!(game.stats.turn_time, 25);
        assert_eq!(game.last_move_time, Some(1_025));

        let a = book.player(&PlayerId::new("a")).unwrap();
        assert_eq!(a.overall.plays, 1);
        assert_eq!(a.overall.turn_time, 10);
        let b = book.player(&PlayerId::new("b")).unwrap();
        assert_eq!(b.overall.discards, 1);
        assert_eq!(b.overall.turn_time, 15);
    }

    #[test]
    fn test_ignore_time_skips_timing() {
        let mut book = StatsBook::new();
        let mut rec = record("a", MoveKind::RankHint, MoveResult::Other, 5_000);
        rec.ignore_time = true;
        book.record_move(&rec);
        assert_eq!(book.overall().overall.turn_time, 0);
        assert_eq!(book.overall().overall.rank_hints, 1);
    }

    #[test]
    fn test_finish_counts_for_every_seat() {
        let mut book = StatsBook::new();
        let mut rec = record("b", MoveKind::Play, MoveResult::Bomb, 1_600);
        rec.state = GameState::BombedOut;
        rec.score = 7;
        book.record_move(&rec);

        for id in ["a", "b"] {
            let stats = &book.player(&PlayerId::new(id)).unwrap().overall;
            assert_eq!(stats.finished_games, 1);
            assert_eq!(stats.bombs_losses, 1);
            assert_eq!(stats.game_time, 600);
        }
        let overall = book.overall();
        assert_eq!(overall.for_mode(Mode::Rainbow).map(|s| s.bombs), Some(1));
        assert_eq!(overall.for_player_count(2).map(|s| s.finished_games), Some(1));
        assert_eq!(overall.overall.average_score(), Some(7.0));
        assert_eq!(book.game("g1").map(|g| g.stats.finished_games), Some(1));
    }

    #[test]
    fn test_remove_game_keeps_tallies() {
        let mut book = StatsBook::new();
        book.record_move(&record("a", MoveKind::Play, MoveResult::Play, 1_010));

        let log = book.remove_game("g1").unwrap();
        assert_eq!(log.stats.plays, 1);
        assert!(book.game("g1").is_none());
        assert!(book.remove_game("g1").is_none());
        assert_eq!(book.overall().overall.plays, 1);
        assert_eq!(book.player(&PlayerId::new("a")).map(|s| s.overall.plays), Some(1));
    }

    #[test]
    fn test_elapsed_never_negative() {
        assert_eq!(elapsed(10, 4), 0);
        assert_eq!(elapsed(4, 10), 6);
    }
}
