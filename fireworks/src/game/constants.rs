//! Fixed rule parameters.

use super::entities::Rank;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 5;

pub const DEFAULT_MAX_HINTS: u8 = 8;
pub const DEFAULT_STARTING_HINTS: u8 = 8;
pub const DEFAULT_STARTING_BOMBS: u8 = 3;

/// Highest rank on a card; a pile at this rank is complete.
pub const MAX_RANK: Rank = 5;

/// Copies of each rank in one color, indexed by rank (index 0 unused).
pub const RANK_COPIES: [usize; MAX_RANK as usize + 1] = [0, 3, 2, 2, 2, 1];

/// Hand capacity indexed by player count. Zero marks an invalid count.
pub const CARDS_IN_HAND: [usize; MAX_PLAYERS + 1] = [0, 0, 5, 5, 4, 4];

/// Turn from which the engine starts scanning for games with no playable
/// card left.
pub const NO_PLAYS_MIN_TURN: u32 = 15;

pub const MAX_PLAYER_NAME_LENGTH: usize = 10;
pub const MAX_GAME_NAME_LENGTH: usize = 20;

/// Hand capacity for a player count, or `None` if the count can't play.
#[must_use]
pub fn hand_capacity(num_players: usize) -> Option<usize> {
    CARDS_IN_HAND
        .get(num_players)
        .copied()
        .filter(|&capacity| capacity > 0)
}
