//! Game hub for spawning and managing game actors.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    actor::{GameActor, GameHandle},
    config::HubConfig,
    errors::{HubError, HubResult},
    messages::GameSummary,
};
use crate::{
    game::{Game, GameId, GameSettings},
    stats::StatsBook,
};

/// Hub hosting many games, one actor each
pub struct GameHub {
    config: HubConfig,

    /// Active game handles
    games: Arc<RwLock<HashMap<GameId, GameHandle>>>,

    /// Statistics shared by every actor
    stats: Arc<RwLock<StatsBook>>,
}

impl GameHub {
    pub fn new(config: HubConfig) -> HubResult<Self> {
        config.validate().map_err(HubError::Config)?;
        Ok(Self {
            config,
            games: Arc::new(RwLock::new(HashMap::new())),
            stats: Arc::new(RwLock::new(StatsBook::new())),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Create and spawn a new game with a fresh id
    pub async fn create_game(&self, name: &str, settings: GameSettings) -> HubResult<GameHandle> {
        let id = Uuid::new_v4().to_string();
        let game = Game::with_settings(id, name, settings)?;
        self.spawn(game).await
    }

    /// Spawn an actor around a previously persisted game. Games that fail
    /// [`Game::validate`] are refused rather than hosted.
    pub async fn restore_game(&self, game: Game) -> HubResult<GameHandle> {
        game.validate()?;
        self.spawn(game).await
    }

    async fn spawn(&self, game: Game) -> HubResult<GameHandle> {
        let mut games = self.games.write().await;
        games.retain(|_, handle| !handle.is_closed());
        if games.contains_key(game.id()) {
            return Err(HubError::DuplicateGame(game.id().to_string()));
        }
        if games.len() >= self.config.max_concurrent_games {
            return Err(HubError::CapacityReached(self.config.max_concurrent_games));
        }

        let (actor, handle) = GameActor::new(game, &self.config, self.stats.clone());
        games.insert(handle.game_id().to_string(), handle.clone());
        drop(games);

        tokio::spawn(async move {
            actor.run().await;
        });

        log::info!("Spawned game {}", handle.game_id());
        Ok(handle)
    }

    pub async fn handle(&self, id: &str) -> HubResult<GameHandle> {
        let games = self.games.read().await;
        games
            .get(id)
            .cloned()
            .ok_or_else(|| HubError::GameNotFound(id.to_string()))
    }

    /// Summaries of every open game
    pub async fn list_games(&self) -> Vec<GameSummary> {
        let handles: Vec<GameHandle> = self.games.read().await.values().cloned().collect();
        let mut summaries = Vec::with_capacity(handles.len());
        for handle in handles {
            if let Ok(summary) = handle.summary().await {
                summaries.push(summary);
            }
        }
        summaries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        summaries
    }

    pub async fn game_count(&self) -> usize {
        self.games.read().await.len()
    }

    /// Stop a game's actor and forget its handle. Its per-game stats go
    /// with it; the overall and per-player tallies stay.
    pub async fn close_game(&self, id: &str) -> HubResult<()> {
        let handle = self
            .games
            .write()
            .await
            .remove(id)
            .ok_or_else(|| HubError::GameNotFound(id.to_string()))?;
        // Already stopped is as good as closed.
        match handle.close().await {
            Ok(()) | Err(HubError::GameClosed(_)) => {}
            Err(e) => return Err(e),
        }
        self.stats.write().await.remove_game(id);
        log::info!("Closed game {id}");
        Ok(())
    }

    /// Close every game that has finished. Returns how many were closed.
    pub async fn remove_finished(&self) -> usize {
        let handles: Vec<GameHandle> = self.games.read().await.values().cloned().collect();
        let mut removed = 0;
        for handle in handles {
            let finished = match handle.summary().await {
                Ok(summary) => summary.state.is_terminal(),
                Err(_) => true,
            };
            if finished && self.close_game(handle.game_id()).await.is_ok() {
                removed += 1;
            }
        }
        removed
    }

    /// Shared statistics, for readers that want to hold the lock
    #[must_use]
    pub fn stats(&self) -> Arc<RwLock<StatsBook>> {
        self.stats.clone()
    }

    /// A point-in-time copy of the statistics
    pub async fn stats_snapshot(&self) -> StatsBook {
        self.stats.read().await.clone()
    }
}
