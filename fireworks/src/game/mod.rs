//! Fireworks game engine - rules, lifecycle, and redacted views.
//!
//! This module provides:
//! - Cards, decks, and the five game modes
//! - Player hands and hint knowledge
//! - The shared table with tokens, piles, and the end-of-deck countdown
//! - The game state machine that validates and applies moves
//! - Per-player views that hide each player's own cards

pub mod constants;
pub mod entities;
pub mod errors;
pub mod player;
pub mod state_machine;
pub mod table;
pub mod view;

pub use errors::{GameError, GameResult};
pub use player::Player;
pub use state_machine::{Game, GameId, GameSettings, GameState, MoveOutcome, TurnNotification};
pub use table::Table;
pub use view::{CardView, GameView, GameViews, PlayerView, TableView};
