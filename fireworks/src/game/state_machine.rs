//! Game lifecycle and move processing.
//!
//! A [`Game`] owns its players and its [`Table`] outright. Nothing in here
//! locks; whoever hosts a game has to make sure only one call runs against
//! it at a time (see [`crate::hub`]).

use chrono::Utc;
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt};

use super::{
    constants::{
        DEFAULT_MAX_HINTS, DEFAULT_STARTING_BOMBS, DEFAULT_STARTING_HINTS, MAX_GAME_NAME_LENGTH,
        MAX_PLAYERS, MAX_RANK, hand_capacity,
    },
    entities::{
        CardId, LastMove, Mode, Move, MoveResult, PlayerId, sanitize_name, sanitize_player_name,
    },
    errors::{GameError, GameResult},
    player::Player,
    table::Table,
};

/// Identity the host assigns to a game.
pub type GameId = String;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum GameState {
    #[default]
    NotStarted,
    Started,
    BombedOut,
    Perfect,
    DeckEmpty,
    NoPlays,
}

impl GameState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::NotStarted | Self::Started)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::NotStarted => "not started",
            Self::Started => "in progress",
            Self::BombedOut => "bombed out",
            Self::Perfect => "perfect",
            Self::DeckEmpty => "out of cards",
            Self::NoPlays => "out of plays",
        };
        write!(f, "{repr}")
    }
}

/// Game configuration settings
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GameSettings {
    pub mode: Mode,
    pub starting_hints: u8,
    pub max_hints: u8,
    pub starting_bombs: u8,
    /// Listed for anyone to join.
    pub public: bool,
    /// Turn times aren't counted in statistics.
    pub ignore_time: bool,
    pub sigh_button: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new(
            Mode::Normal,
            DEFAULT_STARTING_HINTS,
            DEFAULT_MAX_HINTS,
            DEFAULT_STARTING_BOMBS,
        )
    }
}

impl GameSettings {
    #[must_use]
    pub const fn new(
        mode: Mode,
        starting_hints: u8,
        max_hints: u8,
        starting_bombs: u8,
    ) -> Self {
        Self {
            mode,
            starting_hints,
            max_hints,
            starting_bombs,
            public: false,
            ignore_time: false,
            sigh_button: false,
        }
    }

    /// Replace out-of-range token counts with usable ones.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.max_hints < 1 {
            self.max_hints = DEFAULT_MAX_HINTS;
        }
        if self.starting_hints < 1 || self.starting_hints > self.max_hints {
            self.starting_hints = self.max_hints;
        }
        if self.starting_bombs < 1 {
            self.starting_bombs = DEFAULT_STARTING_BOMBS;
        }
        self
    }
}

/// Who has to move next, and how to reach them.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TurnNotification {
    pub game_id: GameId,
    pub player: PlayerId,
    pub push_token: Option<String>,
}

/// What an accepted move did.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct MoveOutcome {
    pub result: MoveResult,
    /// Cards played, discarded, drawn, or hinted by the move.
    pub cards_modified: Vec<CardId>,
    pub state: GameState,
    /// Set while the game goes on.
    pub notification: Option<TurnNotification>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Game {
    id: GameId,
    name: String,
    initialized: bool,
    settings: GameSettings,
    state: GameState,
    /// Unix seconds.
    start_time: Option<i64>,
    /// Unix seconds of the last accepted move or announcement.
    update_time: Option<i64>,
    players: Vec<Player>,
    pub(super) table: Table,
    current_score: u32,
    best_possible_score: u32,
    cards_last_modified: Vec<CardId>,
}

fn now() -> i64 {
    Utc::now().timestamp()
}

fn inconsistent<T>(reason: String) -> GameResult<T> {
    Err(GameError::Inconsistent(reason))
}

impl Game {
    /// An empty shell. It accepts nothing until [`Game::initialize`] runs.
    #[must_use]
    pub fn new(id: GameId, name: &str) -> Self {
        let settings = GameSettings::default();
        let table = Table::new(&settings);
        Self {
            id,
            name: sanitize_name(name, MAX_GAME_NAME_LENGTH),
            initialized: false,
            settings,
            state: GameState::NotStarted,
            start_time: None,
            update_time: None,
            players: Vec::with_capacity(MAX_PLAYERS),
            table,
            current_score: 0,
            best_possible_score: 0,
            cards_last_modified: Vec::new(),
        }
    }

    /// Shorthand for [`Game::new`] followed by [`Game::initialize`].
    pub fn with_settings(id: GameId, name: &str, settings: GameSettings) -> GameResult<Self> {
        let mut game = Self::new(id, name);
        game.initialize(settings)?;
        Ok(game)
    }

    /// Build the deck and board for `settings` and drop any joined players.
    pub fn initialize(&mut self, settings: GameSettings) -> GameResult<()> {
        self.ensure_state(GameState::NotStarted)?;
        let settings = settings.normalized();
        self.table = Table::new(&settings);
        self.settings = settings;
        self.players.clear();
        self.update_time = None;
        self.cards_last_modified.clear();
        self.initialized = true;
        self.refresh_scores();
        debug!(
            "Game {} initialized in {} mode with {} cards",
            self.id,
            self.settings.mode,
            self.table.cards_left()
        );
        Ok(())
    }

    pub fn add_player(&mut self, id: PlayerId, name: &str) -> GameResult<()> {
        if !self.initialized {
            return Err(GameError::NotInitialized);
        }
        self.ensure_state(GameState::NotStarted)?;
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::CapacityReached);
        }
        if self.player(&id).is_some() {
            return Err(GameError::PlayerAlreadyJoined(id));
        }
        debug!("Player {id} joined game {}", self.id);
        self.players
            .push(Player::new(id, sanitize_player_name(name)));
        self.table.turn += 1;
        Ok(())
    }

    pub fn start(&mut self) -> GameResult<TurnNotification> {
        self.start_with_rng(&mut rand::rng())
    }

    /// Deal every hand and pick a random starting player.
    pub fn start_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> GameResult<TurnNotification> {
        if !self.initialized {
            return Err(GameError::NotInitialized);
        }
        self.ensure_state(GameState::NotStarted)?;
        let num_players = self.players.len();
        let capacity =
            hand_capacity(num_players).ok_or(GameError::InvalidPlayerCount(num_players))?;
        if self.table.cards_left() < capacity * num_players {
            return Err(GameError::DeckEmpty);
        }

        for player in &mut self.players {
            player.initialize(capacity);
            for _ in 0..capacity {
                player.add_card(self.table.draw_card(rng)?)?;
            }
        }

        self.table.current_player_index = rng.random_range(0..num_players);
        self.state = GameState::Started;
        self.table.turn += 1;
        self.start_time = Some(now());
        self.update_time = self.start_time;
        self.refresh_scores();
        info!(
            "Game {} started with {} players in {} mode",
            self.id, num_players, self.settings.mode
        );
        self.notification()
            .ok_or(GameError::InvalidPlayerCount(num_players))
    }

    /// Leave a free-text note on the player's last move. Doesn't use a turn.
    pub fn process_announcement(&mut self, player_id: &PlayerId, text: &str) -> GameResult<()> {
        self.ensure_state(GameState::Started)?;
        let player = self
            .players
            .iter_mut()
            .find(|p| &p.id == player_id)
            .ok_or_else(|| GameError::UnknownPlayer(player_id.clone()))?;
        player.record(LastMove::Announcement(text.to_string()));
        self.update_time = Some(now());
        Ok(())
    }

    pub fn process_move(&mut self, player_id: &PlayerId, mv: Move) -> GameResult<MoveOutcome> {
        self.process_move_with_rng(player_id, mv, &mut rand::rng())
    }

    /// Validate and apply a turn-taking move. Every precondition is checked
    /// before anything changes, so an error leaves the game as it was.
    pub fn process_move_with_rng<R: Rng + ?Sized>(
        &mut self,
        player_id: &PlayerId,
        mv: Move,
        rng: &mut R,
    ) -> GameResult<MoveOutcome> {
        self.ensure_state(GameState::Started)?;
        let actor_idx = self
            .player_index(player_id)
            .ok_or_else(|| GameError::UnknownPlayer(player_id.clone()))?;
        let current_idx = self.table.current_player_index;
        if actor_idx != current_idx {
            return Err(GameError::OutOfTurn {
                player: player_id.clone(),
                current: self.players[current_idx].id.clone(),
            });
        }

        let mut cards_modified = Vec::new();
        let result = match &mv {
            Move::Play { card_index } => {
                let card = self.players[actor_idx].remove_card(*card_index)?;
                cards_modified.push(card.id);
                let result = self.table.play_card(card);
                match result {
                    MoveResult::Play => {
                        self.players[actor_idx].record(LastMove::Played(card));
                        if self.table.piles_complete() {
                            self.state = GameState::Perfect;
                        }
                    }
                    _ => {
                        self.players[actor_idx].record(LastMove::Bombed(card));
                        if self.table.bombs == 0 {
                            self.state = GameState::BombedOut;
                        }
                    }
                }
                result
            }
            Move::Discard { card_index } => {
                let card = self.players[actor_idx].remove_card(*card_index)?;
                cards_modified.push(card.id);
                self.table.discard_card(card);
                self.players[actor_idx].record(LastMove::Discarded(card));
                MoveResult::Other
            }
            Move::Hint {
                target,
                attribute,
                card_index,
                color,
            } => {
                if self.table.hints == 0 {
                    return Err(GameError::NoHintsRemaining);
                }
                let target_idx = self
                    .player_index(target)
                    .ok_or_else(|| GameError::UnknownPlayer(target.clone()))?;
                if target_idx == actor_idx {
                    return Err(GameError::CannotHintSelf);
                }
                let mode = self.settings.mode;
                let receiver = &mut self.players[target_idx];
                let (value, hinted) =
                    receiver.receive_hint(*card_index, *attribute, *color, mode)?;
                let target_name = receiver.name.clone();
                self.table.spend_hint()?;
                cards_modified.extend(hinted);
                self.players[actor_idx].record(LastMove::Hinted {
                    target: target_name,
                    value,
                });
                MoveResult::Other
            }
        };

        if mv.draws_card() && self.table.cards_left() > 0 {
            let drawn = self.table.draw_card(rng)?;
            cards_modified.push(drawn.id);
            self.players[actor_idx].add_card(drawn)?;
        }

        let num_players = self.players.len();
        let countdown_expired = self.table.advance_turn(num_players);
        if self.state == GameState::Started && countdown_expired {
            self.state = GameState::DeckEmpty;
        }
        if self.state == GameState::Started && !self.any_playable_cards() {
            self.state = GameState::NoPlays;
        }

        self.refresh_scores();
        self.update_time = Some(now());
        self.cards_last_modified = cards_modified.clone();

        debug!(
            "Game {} turn {}: {} -> {:?}, state {}",
            self.id,
            self.table.turn,
            player_id,
            result,
            self.state
        );
        if self.state.is_terminal() {
            info!(
                "Game {} finished {} with score {}",
                self.id, self.state, self.current_score
            );
        }

        Ok(MoveOutcome {
            result,
            cards_modified,
            state: self.state,
            notification: self.notification(),
        })
    }

    pub fn set_push_token(&mut self, player_id: &PlayerId, token: Option<String>) -> GameResult<()> {
        let player = self
            .players
            .iter_mut()
            .find(|p| &p.id == player_id)
            .ok_or_else(|| GameError::UnknownPlayer(player_id.clone()))?;
        player.push_token = token;
        Ok(())
    }

    /// Check the invariants every accepted operation keeps. Games built
    /// through this API always pass; ones read back from storage might not,
    /// and the engine indexes on these without further checks.
    pub fn validate(&self) -> GameResult<()> {
        let table = &self.table;
        let num_players = self.players.len();

        if num_players > MAX_PLAYERS {
            return inconsistent(format!("{num_players} players seated"));
        }
        let mut seated = HashSet::with_capacity(num_players);
        if let Some(twice) = self.players.iter().find(|p| !seated.insert(&p.id)) {
            return inconsistent(format!("player {} seated twice", twice.id));
        }
        if !self.initialized && (self.state != GameState::NotStarted || num_players > 0) {
            return inconsistent("uninitialized game in use".to_string());
        }

        if table.mode != self.settings.mode {
            return inconsistent(format!(
                "table plays {} but settings say {}",
                table.mode, self.settings.mode
            ));
        }
        if table.piles.len() != table.colors().len() {
            return inconsistent(format!(
                "{} piles for {} colors",
                table.piles.len(),
                table.colors().len()
            ));
        }
        if table.piles.iter().any(|&rank| rank > MAX_RANK) {
            return inconsistent("pile above the top rank".to_string());
        }
        if table.pile_cards.len() != table.score() as usize {
            return inconsistent(format!(
                "{} played cards for a score of {}",
                table.pile_cards.len(),
                table.score()
            ));
        }
        if table.hints > table.max_hints || table.bombs > table.starting_bombs {
            return inconsistent(format!(
                "tokens out of bounds: {}/{} hints, {}/{} bombs",
                table.hints, table.max_hints, table.bombs, table.starting_bombs
            ));
        }

        if self.state != GameState::NotStarted {
            let Some(capacity) = hand_capacity(num_players) else {
                return inconsistent(format!("{} with {num_players} players", self.state));
            };
            if table.current_player_index >= num_players {
                return inconsistent(format!(
                    "seat {} is up in a game of {num_players}",
                    table.current_player_index
                ));
            }
            if let Some(player) = self
                .players
                .iter()
                .find(|p| p.capacity() != capacity || p.cards().len() > capacity)
            {
                return inconsistent(format!(
                    "{} holds {} of {} cards, expected {capacity}",
                    player.id,
                    player.cards().len(),
                    player.capacity()
                ));
            }
        }
        if table
            .turns_left
            .is_some_and(|left| !table.deck.is_empty() || left > num_players)
        {
            return inconsistent(format!(
                "countdown running with {} cards in the deck",
                table.deck.len()
            ));
        }

        let cards: Vec<CardId> = table
            .deck
            .iter()
            .chain(&table.discard)
            .chain(&table.pile_cards)
            .chain(self.players.iter().flat_map(|p| p.cards()))
            .map(|card| card.id)
            .collect();
        let unique: HashSet<&CardId> = cards.iter().collect();
        if cards.len() != table.mode.max_cards() || unique.len() != cards.len() {
            return inconsistent(format!(
                "{} cards ({} distinct), {} mode has {}",
                cards.len(),
                unique.len(),
                table.mode,
                table.mode.max_cards()
            ));
        }
        Ok(())
    }

    fn ensure_state(&self, expected: GameState) -> GameResult<()> {
        if self.state != expected {
            return Err(GameError::WrongState {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }

    /// Oracle check over every hidden card, starting with the player to
    /// move. Only used to end games nobody can win points in anymore.
    fn any_playable_cards(&self) -> bool {
        let num_players = self.players.len();
        let current = self.table.current_player_index;
        let hands = (0..num_players).map(|offset| self.players[(current + offset) % num_players].cards());
        self.table.has_playable_card(hands)
    }

    fn refresh_scores(&mut self) {
        self.current_score = self.table.score();
        self.best_possible_score = if self.state.is_terminal() {
            self.current_score
        } else {
            let hand_cards = self.players.iter().flat_map(|p| p.cards());
            self.table
                .best_possible_score(hand_cards, self.players.len())
        };
    }

    fn player_index(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| &p.id == id)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    #[must_use]
    pub const fn settings(&self) -> &GameSettings {
        &self.settings
    }

    #[must_use]
    pub const fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub const fn start_time(&self) -> Option<i64> {
        self.start_time
    }

    #[must_use]
    pub const fn update_time(&self) -> Option<i64> {
        self.update_time
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    #[must_use]
    pub const fn table(&self) -> &Table {
        &self.table
    }

    #[must_use]
    pub const fn score(&self) -> u32 {
        self.current_score
    }

    #[must_use]
    pub const fn best_possible_score(&self) -> u32 {
        self.best_possible_score
    }

    #[must_use]
    pub fn cards_last_modified(&self) -> &[CardId] {
        &self.cards_last_modified
    }

    /// The player to move, once the game has started.
    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        if self.state == GameState::NotStarted {
            return None;
        }
        self.players.get(self.table.current_player_index)
    }

    /// Who the notification collaborator should ping, while the game is on.
    #[must_use]
    pub fn notification(&self) -> Option<TurnNotification> {
        if self.state != GameState::Started {
            return None;
        }
        self.current_player().map(|player| TurnNotification {
            game_id: self.id.clone(),
            player: player.id.clone(),
            push_token: player.push_token.clone(),
        })
    }
}
