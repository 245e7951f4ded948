use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::{MAX_PLAYER_NAME_LENGTH, MAX_RANK, RANK_COPIES};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
    White,
    // Sixth color of every mode except normal. Depending on the mode it's
    // either a plain extra color or a wildcard for color hints.
    Rainbow,
}

impl Color {
    #[must_use]
    pub const fn is_rainbow(self) -> bool {
        matches!(self, Self::Rainbow)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Yellow => "yellow",
            Self::White => "white",
            Self::Rainbow => "rainbow",
        };
        write!(f, "{repr}")
    }
}

const NORMAL_COLORS: [Color; 5] = [
    Color::Red,
    Color::Green,
    Color::Blue,
    Color::Yellow,
    Color::White,
];

const RAINBOW_COLORS: [Color; 6] = [
    Color::Red,
    Color::Green,
    Color::Blue,
    Color::Yellow,
    Color::White,
    Color::Rainbow,
];

/// Card rank, 1 through 5.
pub type Rank = u8;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Normal,
    /// Rainbow is a sixth, ordinary color.
    Rainbow,
    /// Rainbow matches every color hint.
    Wildcard,
    /// Wildcard rainbow with a single copy of each rainbow rank.
    Hard,
    /// Ordinary rainbow with a single copy of each rainbow rank.
    RainbowLimited,
}

impl Mode {
    #[must_use]
    pub fn colors(self) -> &'static [Color] {
        match self {
            Self::Normal => &NORMAL_COLORS,
            _ => &RAINBOW_COLORS,
        }
    }

    /// Whether rainbow cards answer to every color hint.
    #[must_use]
    pub const fn is_wildcard_aware(self) -> bool {
        matches!(self, Self::Wildcard | Self::Hard)
    }

    /// Whether each rainbow rank is limited to one copy.
    #[must_use]
    pub const fn limits_rainbow(self) -> bool {
        matches!(self, Self::Hard | Self::RainbowLimited)
    }

    #[must_use]
    pub fn perfect_score(self) -> u32 {
        self.colors().len() as u32 * u32::from(MAX_RANK)
    }

    #[must_use]
    pub fn copies(self, color: Color, rank: Rank) -> usize {
        let count = RANK_COPIES.get(rank as usize).copied().unwrap_or(0);
        if color.is_rainbow() && self.limits_rainbow() {
            count.min(1)
        } else {
            count
        }
    }

    /// Total number of cards in a fresh deck for this mode.
    #[must_use]
    pub fn max_cards(self) -> usize {
        self.colors()
            .iter()
            .map(|&color| {
                (1..=MAX_RANK)
                    .map(|rank| self.copies(color, rank))
                    .sum::<usize>()
            })
            .sum()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Normal => "normal",
            Self::Rainbow => "rainbow",
            Self::Wildcard => "wildcard",
            Self::Hard => "hard",
            Self::RainbowLimited => "rainbow-limited",
        };
        write!(f, "{repr}")
    }
}

/// Identity assigned to a card when the deck is populated. Never reused
/// within a game.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A card's true attributes plus what its holder has been told about it.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Card {
    pub id: CardId,
    pub color: Color,
    pub rank: Rank,
    pub known_color: Option<Color>,
    pub known_rank: Option<Rank>,
}

impl Card {
    #[must_use]
    pub const fn new(id: CardId, color: Color, rank: Rank) -> Self {
        Self {
            id,
            color,
            rank,
            known_color: None,
            known_rank: None,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.color, self.rank)
    }
}

/// Cards not yet drawn. Order is irrelevant; draws pick uniformly.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Every card of the mode, ids assigned rank-major then color.
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        let mut cards = Vec::with_capacity(mode.max_cards());
        for rank in 1..=MAX_RANK {
            for &color in mode.colors() {
                for _ in 0..mode.copies(color, rank) {
                    let id = CardId(cards.len() as u32);
                    cards.push(Card::new(id, color, rank));
                }
            }
        }
        Self { cards }
    }

    /// Remove a uniformly random card. `None` when the deck is exhausted.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Card> {
        if self.cards.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..self.cards.len());
        Some(self.cards.swap_remove(idx))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    #[cfg(test)]
    pub(crate) fn take(&mut self, id: CardId) -> Option<Card> {
        let idx = self.cards.iter().position(|card| card.id == id)?;
        Some(self.cards.swap_remove(idx))
    }

    #[cfg(test)]
    pub(crate) fn put_back(&mut self, card: Card) {
        self.cards.push(card);
    }
}

/// External identity of a player, supplied by whoever authenticated them.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(s: &str) -> Self {
        Self(s.to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PlayerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Trim a display name to the allowed length.
#[must_use]
pub fn sanitize_name(name: &str, max_len: usize) -> String {
    name.trim().chars().take(max_len).collect()
}

#[must_use]
pub fn sanitize_player_name(name: &str) -> String {
    sanitize_name(name, MAX_PLAYER_NAME_LENGTH)
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HintAttribute {
    Rank,
    Color,
}

/// The value a hint revealed.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum HintValue {
    Rank(Rank),
    Color(Color),
}

impl fmt::Display for HintValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Rank(rank) => write!(f, "{rank}s"),
            Self::Color(color) => write!(f, "{color}s"),
        }
    }
}

/// A turn-taking move.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Move {
    Play {
        card_index: usize,
    },
    Discard {
        card_index: usize,
    },
    /// `card_index` points into the target's hand and selects the value
    /// being hinted. `color` only matters when that card is a wildcard.
    Hint {
        target: PlayerId,
        attribute: HintAttribute,
        card_index: usize,
        color: Option<Color>,
    },
}

impl Move {
    #[must_use]
    pub const fn draws_card(&self) -> bool {
        matches!(self, Self::Play { .. } | Self::Discard { .. })
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum MoveResult {
    #[default]
    Other,
    Play,
    Bomb,
}

/// What a player did most recently, shown next to their name.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum LastMove {
    Played(Card),
    Bombed(Card),
    Discarded(Card),
    Hinted { target: String, value: HintValue },
    Announcement(String),
}

impl fmt::Display for LastMove {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Played(card) => write!(f, "played {card}"),
            Self::Bombed(card) => write!(f, "bombed {card}"),
            Self::Discarded(card) => write!(f, "discarded {card}"),
            Self::Hinted { target, value } => write!(f, "➡ {target} {value}"),
            Self::Announcement(text) => write!(f, ": {text}"),
        }
    }
}
