//! Hub module hosting many games with an async actor model.
//!
//! This module implements:
//! - GameActor: async actor owning a single game
//! - GameHub: spawns actors and keeps their handles for discovery
//! - Message-based communication with tokio channels
//! - Hub configuration
//!
//! ## Architecture
//!
//! Each game runs in a separate Tokio task with an mpsc message inbox and
//! answers on oneshot channels. Calls against one game are handled strictly
//! one after another, while different games run in parallel. Accepted
//! moves are recorded in a [`StatsBook`](crate::stats::StatsBook) shared by
//! every actor, and turn changes are pushed to subscribers.
//!
//! ## Example
//!
//! ```no_run
//! use fireworks::{GameSettings, entities::PlayerId, hub::{GameHub, HubConfig}};
//!
//! # async fn demo() -> Result<(), fireworks::hub::HubError> {
//! let hub = GameHub::new(HubConfig::default())?;
//! let game = hub.create_game("friday", GameSettings::default()).await?;
//! game.add_player(PlayerId::new("alice"), "alice").await?;
//! game.add_player(PlayerId::new("bob"), "bob").await?;
//! let first = game.start().await?;
//! println!("{} goes first", first.player);
//! # Ok(())
//! # }
//! ```

pub mod actor;
pub mod config;
pub mod errors;
pub mod manager;
pub mod messages;

pub use actor::{GameActor, GameHandle};
pub use config::HubConfig;
pub use errors::{HubError, HubResult};
pub use manager::GameHub;
pub use messages::{GameEvent, GameMessage, GameSummary};
