//! Game statistics aggregated from accepted moves.
//!
//! Counters are kept overall, per mode, per player count, and per mode and
//! player count, for the whole hub, for each player, and for each game.

pub mod book;
pub mod models;

pub use book::{GameLog, StatsBook};
pub use models::{MoveKind, MoveRecord, SlicedStatLog, StatLog};
