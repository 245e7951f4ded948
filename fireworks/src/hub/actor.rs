//! Game actor implementation with async message handling.

use std::sync::Arc;
use tokio::sync::{RwLock, mpsc, oneshot};

use super::{
    config::HubConfig,
    errors::{HubError, HubResult},
    messages::{GameEvent, GameMessage, GameSummary},
};
use crate::{
    game::{
        Game, GameId, GameResult, GameView, MoveOutcome, TurnNotification,
        entities::{Move, PlayerId},
    },
    stats::{MoveRecord, StatsBook},
};

/// Game actor handle for sending messages
#[derive(Clone, Debug)]
pub struct GameHandle {
    sender: mpsc::Sender<GameMessage>,
    game_id: GameId,
    subscriber_capacity: usize,
}

impl GameHandle {
    fn new(sender: mpsc::Sender<GameMessage>, game_id: GameId, subscriber_capacity: usize) -> Self {
        Self {
            sender,
            game_id,
            subscriber_capacity,
        }
    }

    #[must_use]
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// Whether the actor behind this handle has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    fn closed(&self) -> HubError {
        HubError::GameClosed(self.game_id.clone())
    }

    async fn send(&self, message: GameMessage) -> HubResult<()> {
        self.sender.send(message).await.map_err(|_| self.closed())
    }

    /// Send a message built around a reply channel and wait for the reply.
    async fn request<T, F>(&self, make: F) -> HubResult<T>
    where
        F: FnOnce(oneshot::Sender<T>) -> GameMessage,
    {
        let (response, reply) = oneshot::channel();
        self.send(make(response)).await?;
        reply.await.map_err(|_| self.closed())
    }

    pub async fn add_player(&self, player: PlayerId, name: &str) -> HubResult<()> {
        let name = name.to_string();
        self.request(|response| GameMessage::AddPlayer {
            player,
            name,
            response,
        })
        .await?
        .map_err(HubError::from)
    }

    pub async fn start(&self) -> HubResult<TurnNotification> {
        self.request(|response| GameMessage::Start { response })
            .await?
            .map_err(HubError::from)
    }

    pub async fn make_move(&self, player: PlayerId, mv: Move) -> HubResult<MoveOutcome> {
        self.request(|response| GameMessage::Move {
            player,
            mv,
            response,
        })
        .await?
        .map_err(HubError::from)
    }

    pub async fn announce(&self, player: PlayerId, text: &str) -> HubResult<()> {
        let text = text.to_string();
        self.request(|response| GameMessage::Announce {
            player,
            text,
            response,
        })
        .await?
        .map_err(HubError::from)
    }

    pub async fn view(&self, player: PlayerId) -> HubResult<GameView> {
        self.request(|response| GameMessage::GetView { player, response })
            .await?
            .map_err(HubError::from)
    }

    pub async fn snapshot(&self) -> HubResult<Game> {
        self.request(|response| GameMessage::GetSnapshot { response })
            .await
    }

    pub async fn summary(&self) -> HubResult<GameSummary> {
        self.request(|response| GameMessage::GetSummary { response })
            .await
    }

    pub async fn set_push_token(&self, player: PlayerId, token: Option<String>) -> HubResult<()> {
        self.request(|response| GameMessage::SetPushToken {
            player,
            token,
            response,
        })
        .await?
        .map_err(HubError::from)
    }

    /// Receive [`GameEvent`]s until the game closes or the receiver is dropped.
    pub async fn subscribe(&self) -> HubResult<mpsc::Receiver<GameEvent>> {
        let (sender, receiver) = mpsc::channel(self.subscriber_capacity);
        self.send(GameMessage::Subscribe { sender }).await?;
        Ok(receiver)
    }

    pub async fn close(&self) -> HubResult<()> {
        self.request(|response| GameMessage::Close { response })
            .await
    }
}

/// Game actor owning a single game
///
/// Messages are handled one at a time, so nothing else ever touches the
/// game while a move is being applied.
pub struct GameActor {
    game: Game,
    inbox: mpsc::Receiver<GameMessage>,
    stats: Arc<RwLock<StatsBook>>,
    subscribers: Vec<mpsc::Sender<GameEvent>>,
    is_closed: bool,
}

impl GameActor {
    pub fn new(game: Game, config: &HubConfig, stats: Arc<RwLock<StatsBook>>) -> (Self, GameHandle) {
        let (sender, inbox) = mpsc::channel(config.inbox_capacity);
        let handle = GameHandle::new(sender, game.id().to_string(), config.subscriber_capacity);
        let actor = Self {
            game,
            inbox,
            stats,
            subscribers: Vec::new(),
            is_closed: false,
        };
        (actor, handle)
    }

    /// Run the game actor event loop
    pub async fn run(mut self) {
        log::info!("Game {} '{}' starting", self.game.id(), self.game.name());

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message).await;
            if self.is_closed {
                break;
            }
        }

        log::info!("Game {} '{}' closed", self.game.id(), self.game.name());
    }

    async fn handle_message(&mut self, message: GameMessage) {
        match message {
            GameMessage::AddPlayer {
                player,
                name,
                response,
            } => {
                let result = self.game.add_player(player.clone(), &name);
                if result.is_ok() {
                    self.notify(GameEvent::PlayerJoined(player));
                }
                let _ = response.send(result);
            }

            GameMessage::Start { response } => {
                let result = self.handle_start().await;
                let _ = response.send(result);
            }

            GameMessage::Move {
                player,
                mv,
                response,
            } => {
                let result = self.handle_move(&player, mv).await;
                let _ = response.send(result);
            }

            GameMessage::Announce {
                player,
                text,
                response,
            } => {
                let result = self.game.process_announcement(&player, &text);
                if result.is_ok() {
                    self.notify(GameEvent::Announcement { player, text });
                }
                let _ = response.send(result);
            }

            GameMessage::GetView { player, response } => {
                let _ = response.send(self.game.create_state(&player));
            }

            GameMessage::GetSnapshot { response } => {
                let _ = response.send(self.game.clone());
            }

            GameMessage::GetSummary { response } => {
                let _ = response.send(GameSummary::from(&self.game));
            }

            GameMessage::SetPushToken {
                player,
                token,
                response,
            } => {
                let _ = response.send(self.game.set_push_token(&player, token));
            }

            GameMessage::Subscribe { sender } => {
                self.subscribers.push(sender);
            }

            GameMessage::Close { response } => {
                self.is_closed = true;
                self.inbox.close();
                let _ = response.send(());
            }
        }
    }

    async fn handle_start(&mut self) -> GameResult<TurnNotification> {
        let notification = self.game.start()?;
        self.stats.write().await.record_start(&self.game);
        self.notify(GameEvent::Turn(notification.clone()));
        Ok(notification)
    }

    async fn handle_move(&mut self, player: &PlayerId, mv: Move) -> GameResult<MoveOutcome> {
        let outcome = self.game.process_move(player, mv.clone())?;
        let record = MoveRecord::new(&self.game, player, &mv, &outcome);
        self.stats.write().await.record_move(&record);

        match &outcome.notification {
            Some(notification) => self.notify(GameEvent::Turn(notification.clone())),
            None => self.notify(GameEvent::Finished {
                state: outcome.state,
                score: self.game.score(),
            }),
        }
        Ok(outcome)
    }

    /// Broadcast an event to all subscribers
    fn notify(&mut self, event: GameEvent) {
        let game_id = self.game.id().to_string();
        self.subscribers
            .retain(|sender| match sender.try_send(event.clone()) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!("Game {game_id}: subscriber channel full, dropping event");
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    log::debug!("Game {game_id}: subscriber disconnected, removing");
                    false
                }
            });
    }
}
