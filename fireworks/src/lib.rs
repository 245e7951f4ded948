//! # Fireworks
//!
//! A rules engine for a cooperative fireworks card game in the Hanabi
//! family. Players see everyone's cards but their own and have to build
//! five (or six) color piles in rank order using a limited supply of hint
//! tokens.
//!
//! ## Architecture
//!
//! A [`Game`] moves through a small lifecycle:
//!
//! - **NotStarted**: initialized with [`GameSettings`], players joining
//! - **Started**: players take turns to play, discard, or hint
//! - **BombedOut**: the last bomb token was spent on a misplay
//! - **Perfect**: every pile reached its top rank
//! - **DeckEmpty**: the deck ran out and every player had a final turn
//! - **NoPlays**: no remaining card can ever be played
//!
//! The engine types carry no locking. The [`hub`] hosts many games, each
//! owned by its own Tokio task, so calls against one game never overlap.
//!
//! ## Core Modules
//!
//! - [`game`]: cards, hands, the table, the move state machine, and
//!   per-player redacted views
//! - [`hub`]: actor-per-game hosting with subscriptions
//! - [`stats`]: aggregate statistics over accepted moves
//! - [`snapshot`]: bincode and JSON persistence of whole games
//!
//! ## Example
//!
//! ```
//! use fireworks::{Game, GameSettings, GameState, entities::{Move, PlayerId}};
//!
//! let mut game = Game::with_settings("g1".to_string(), "friday", GameSettings::default()).unwrap();
//! game.add_player(PlayerId::new("alice"), "alice").unwrap();
//! game.add_player(PlayerId::new("bob"), "bob").unwrap();
//! let first = game.start().unwrap();
//!
//! let outcome = game.process_move(&first.player, Move::Discard { card_index: 0 }).unwrap();
//! assert_eq!(outcome.state, GameState::Started);
//! ```

/// Core game logic, entities, and state machine.
pub mod game;
pub use game::{
    Game, GameError, GameId, GameResult, GameSettings, GameState, GameView, MoveOutcome,
    TurnNotification,
    constants::{self, MAX_PLAYERS, MIN_PLAYERS},
    entities::{self, Card, CardId, Color, Mode, Move, PlayerId},
};

/// Actor-per-game hosting.
pub mod hub;

pub mod snapshot;

/// Statistics over accepted moves.
pub mod stats;
