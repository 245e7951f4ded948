//! A player's hand and what they've been told about it.

use serde::{Deserialize, Serialize};

use super::{
    entities::{Card, CardId, Color, HintAttribute, HintValue, LastMove, Mode, PlayerId},
    errors::{GameError, GameResult},
};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Hand in insertion order. Only the engine touches it.
    cards: Vec<Card>,
    capacity: usize,
    pub last_move: Option<LastMove>,
    /// Opaque token the notification collaborator uses to reach this player.
    pub push_token: Option<String>,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            cards: Vec::new(),
            capacity: 0,
            last_move: None,
            push_token: None,
        }
    }

    /// Empty the hand and size it for the game's player count.
    pub fn initialize(&mut self, capacity: usize) {
        self.cards = Vec::with_capacity(capacity);
        self.capacity = capacity;
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cards.len() >= self.capacity
    }

    pub fn card(&self, index: usize) -> GameResult<&Card> {
        self.cards.get(index).ok_or(GameError::CardIndexOutOfRange {
            index,
            len: self.cards.len(),
        })
    }

    pub fn add_card(&mut self, card: Card) -> GameResult<()> {
        if self.is_full() {
            return Err(GameError::HandFull {
                capacity: self.capacity,
            });
        }
        self.cards.push(card);
        Ok(())
    }

    /// Remove the card at `index`, shifting later cards down.
    pub fn remove_card(&mut self, index: usize) -> GameResult<Card> {
        self.card(index)?;
        Ok(self.cards.remove(index))
    }

    /// Work out which value a hint referencing `index` reveals without
    /// touching the hand.
    pub fn hint_value(
        &self,
        index: usize,
        attribute: HintAttribute,
        color: Option<Color>,
        mode: Mode,
    ) -> GameResult<HintValue> {
        let reference = self.card(index)?;
        let value = match attribute {
            HintAttribute::Rank => HintValue::Rank(reference.rank),
            HintAttribute::Color if mode.is_wildcard_aware() && reference.color.is_rainbow() => {
                // A wildcard has every color, so the giver has to name one.
                match color {
                    Some(named) if !named.is_rainbow() && mode.colors().contains(&named) => {
                        HintValue::Color(named)
                    }
                    other => return Err(GameError::InvalidHintColor(other)),
                }
            }
            HintAttribute::Color => HintValue::Color(reference.color),
        };
        Ok(value)
    }

    /// Reveal the hinted attribute on every matching card. Returns the
    /// revealed value and the ids of the cards it touched, in hand order.
    pub fn receive_hint(
        &mut self,
        index: usize,
        attribute: HintAttribute,
        color: Option<Color>,
        mode: Mode,
    ) -> GameResult<(HintValue, Vec<CardId>)> {
        let value = self.hint_value(index, attribute, color, mode)?;
        let mut changed = Vec::new();
        for card in &mut self.cards {
            match value {
                HintValue::Rank(rank) if card.rank == rank => {
                    card.known_rank = Some(rank);
                    changed.push(card.id);
                }
                HintValue::Color(hinted) if card.color == hinted => {
                    card.known_color = Some(hinted);
                    changed.push(card.id);
                }
                HintValue::Color(hinted) if mode.is_wildcard_aware() && card.color.is_rainbow() => {
                    card.known_color = Some(collapse_wildcard(card.known_color, hinted));
                    changed.push(card.id);
                }
                _ => {}
            }
        }
        Ok((value, changed))
    }

    pub(crate) fn record(&mut self, last_move: LastMove) {
        self.last_move = Some(last_move);
    }
}

/// Revealed color of a wildcard after another color hint. The first hint
/// names a color; a second, different one proves the card is a wildcard.
fn collapse_wildcard(known: Option<Color>, hinted: Color) -> Color {
    match known {
        None => hinted,
        Some(color) if color == hinted => hinted,
        Some(_) => Color::Rainbow,
    }
}
