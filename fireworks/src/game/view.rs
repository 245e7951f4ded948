//! Per-player views of a game with hidden information removed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{
    entities::{Card, CardId, Color, LastMove, Mode, PlayerId, Rank},
    errors::{GameError, GameResult},
    player::Player,
    state_machine::{Game, GameId, GameState},
};

/// A card as some player sees it. `color` and `rank` are `None` on the
/// viewer's own cards.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CardView {
    pub id: CardId,
    pub color: Option<Color>,
    pub rank: Option<Rank>,
    pub known_color: Option<Color>,
    pub known_rank: Option<Rank>,
}

impl CardView {
    fn visible(card: &Card) -> Self {
        Self {
            id: card.id,
            color: Some(card.color),
            rank: Some(card.rank),
            known_color: card.known_color,
            known_rank: card.known_rank,
        }
    }

    fn hidden(card: &Card) -> Self {
        Self {
            color: None,
            rank: None,
            ..Self::visible(card)
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub cards: Vec<CardView>,
    pub last_move: Option<LastMove>,
}

impl PlayerView {
    fn new(player: &Player, own_hand: bool) -> Self {
        let cards = player
            .cards()
            .iter()
            .map(|card| {
                if own_hand {
                    CardView::hidden(card)
                } else {
                    CardView::visible(card)
                }
            })
            .collect();
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            cards,
            last_move: player.last_move.clone(),
        }
    }
}

/// The board with the deck reduced to a count.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TableView {
    pub mode: Mode,
    pub colors: Vec<Color>,
    pub hints: u8,
    pub max_hints: u8,
    pub bombs: u8,
    pub starting_bombs: u8,
    pub cards_left: usize,
    pub discard: Vec<Card>,
    pub piles: Vec<Rank>,
    pub pile_cards: Vec<Card>,
    pub current_player_index: usize,
    pub turn: u32,
    pub turns_left: Option<usize>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GameView {
    pub id: GameId,
    pub name: String,
    pub viewer: PlayerId,
    pub public: bool,
    pub ignore_time: bool,
    pub sigh_button: bool,
    pub state: GameState,
    pub start_time: Option<i64>,
    pub update_time: Option<i64>,
    pub players: Vec<PlayerView>,
    pub table: TableView,
    pub current_player: Option<PlayerId>,
    pub score: u32,
    pub best_possible_score: u32,
    pub cards_last_modified: Vec<CardId>,
}

pub type GameViews = HashMap<PlayerId, GameView>;

impl Game {
    /// Everything `viewer` is allowed to see. The viewer's own cards keep
    /// only what hints revealed, and the deck is just a count.
    pub fn create_state(&self, viewer: &PlayerId) -> GameResult<GameView> {
        if self.player(viewer).is_none() {
            return Err(GameError::UnknownPlayer(viewer.clone()));
        }
        let table = self.table();
        let settings = self.settings();
        Ok(GameView {
            id: self.id().to_string(),
            name: self.name().to_string(),
            viewer: viewer.clone(),
            public: settings.public,
            ignore_time: settings.ignore_time,
            sigh_button: settings.sigh_button,
            state: self.state(),
            start_time: self.start_time(),
            update_time: self.update_time(),
            players: self
                .players()
                .iter()
                .map(|player| PlayerView::new(player, &player.id == viewer))
                .collect(),
            table: TableView {
                mode: table.mode(),
                colors: table.colors().to_vec(),
                hints: table.hints(),
                max_hints: table.max_hints(),
                bombs: table.bombs(),
                starting_bombs: table.starting_bombs(),
                cards_left: table.cards_left(),
                discard: table.discard().to_vec(),
                piles: table.piles().to_vec(),
                pile_cards: table.pile_cards().to_vec(),
                current_player_index: table.current_player_index(),
                turn: table.turn(),
                turns_left: table.turns_left(),
            },
            current_player: self.current_player().map(|p| p.id.clone()),
            score: self.score(),
            best_possible_score: self.best_possible_score(),
            cards_last_modified: self.cards_last_modified().to_vec(),
        })
    }

    /// One view per joined player, for broadcasting after a change.
    #[must_use]
    pub fn create_states(&self) -> GameViews {
        self.players()
            .iter()
            .filter_map(|player| {
                self.create_state(&player.id)
                    .ok()
                    .map(|view| (player.id.clone(), view))
            })
            .collect()
    }
}
