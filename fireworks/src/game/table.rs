//! The shared board: tokens, deck, discard pile, and progress piles.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{
    constants::{MAX_RANK, NO_PLAYS_MIN_TURN},
    entities::{Card, Color, Deck, Mode, MoveResult, Rank},
    errors::{GameError, GameResult},
    state_machine::GameSettings,
};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Table {
    pub(super) mode: Mode,
    pub(super) hints: u8,
    pub(super) max_hints: u8,
    pub(super) bombs: u8,
    pub(super) starting_bombs: u8,
    pub(super) deck: Deck,
    /// Misplayed and discarded cards, oldest first.
    pub(super) discard: Vec<Card>,
    /// Top rank of each pile, indexed like `mode.colors()`. Zero is empty.
    pub(super) piles: Vec<Rank>,
    /// Successfully played cards, oldest first.
    pub(super) pile_cards: Vec<Card>,
    pub(super) current_player_index: usize,
    pub(super) turn: u32,
    /// Moves left once the deck ran out. `None` until then.
    pub(super) turns_left: Option<usize>,
}

impl Table {
    /// Fresh board for already-normalized settings.
    #[must_use]
    pub fn new(settings: &GameSettings) -> Self {
        let mode = settings.mode;
        Self {
            mode,
            hints: settings.starting_hints,
            max_hints: settings.max_hints,
            bombs: settings.starting_bombs,
            starting_bombs: settings.starting_bombs,
            deck: Deck::new(mode),
            discard: Vec::with_capacity(mode.max_cards()),
            piles: vec![0; mode.colors().len()],
            pile_cards: Vec::with_capacity(mode.perfect_score() as usize),
            current_player_index: 0,
            turn: 0,
            turns_left: None,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn colors(&self) -> &'static [Color] {
        self.mode.colors()
    }

    #[must_use]
    pub const fn hints(&self) -> u8 {
        self.hints
    }

    #[must_use]
    pub const fn max_hints(&self) -> u8 {
        self.max_hints
    }

    #[must_use]
    pub const fn bombs(&self) -> u8 {
        self.bombs
    }

    #[must_use]
    pub const fn starting_bombs(&self) -> u8 {
        self.starting_bombs
    }

    #[must_use]
    pub fn cards_left(&self) -> usize {
        self.deck.len()
    }

    #[must_use]
    pub fn discard(&self) -> &[Card] {
        &self.discard
    }

    #[must_use]
    pub fn piles(&self) -> &[Rank] {
        &self.piles
    }

    /// Top rank of a color's pile; zero for colors the mode doesn't use.
    #[must_use]
    pub fn pile(&self, color: Color) -> Rank {
        self.pile_index(color)
            .map_or(0, |idx| self.piles[idx])
    }

    #[must_use]
    pub fn pile_cards(&self) -> &[Card] {
        &self.pile_cards
    }

    #[must_use]
    pub const fn current_player_index(&self) -> usize {
        self.current_player_index
    }

    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    #[must_use]
    pub const fn turns_left(&self) -> Option<usize> {
        self.turns_left
    }

    pub fn draw_card<R: Rng + ?Sized>(&mut self, rng: &mut R) -> GameResult<Card> {
        self.deck.draw(rng).ok_or(GameError::DeckEmpty)
    }

    fn pile_index(&self, color: Color) -> Option<usize> {
        self.colors().iter().position(|&c| c == color)
    }

    /// Pile the card would extend on `piles`, if any.
    fn playable_on(&self, card: &Card, piles: &[Rank]) -> Option<usize> {
        self.pile_index(card.color)
            .filter(|&idx| piles[idx] + 1 == card.rank)
    }

    #[must_use]
    pub fn is_playable(&self, card: &Card) -> bool {
        self.playable_on(card, &self.piles).is_some()
    }

    /// Put the card on its pile if it fits. Otherwise it goes to the
    /// discard pile and costs a bomb.
    pub(super) fn play_card(&mut self, card: Card) -> MoveResult {
        match self.playable_on(&card, &self.piles) {
            Some(idx) => {
                self.piles[idx] += 1;
                self.pile_cards.push(card);
                if card.rank == MAX_RANK {
                    self.refund_hint();
                }
                MoveResult::Play
            }
            None => {
                self.discard.push(card);
                self.bombs = self.bombs.saturating_sub(1);
                MoveResult::Bomb
            }
        }
    }

    pub(super) fn discard_card(&mut self, card: Card) {
        self.discard.push(card);
        self.refund_hint();
    }

    fn refund_hint(&mut self) {
        self.hints = self.hints.saturating_add(1).min(self.max_hints);
    }

    pub(super) fn spend_hint(&mut self) -> GameResult<()> {
        if self.hints == 0 {
            return Err(GameError::NoHintsRemaining);
        }
        self.hints -= 1;
        Ok(())
    }

    #[must_use]
    pub fn piles_complete(&self) -> bool {
        self.piles.iter().all(|&rank| rank == MAX_RANK)
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.piles.iter().map(|&rank| u32::from(rank)).sum()
    }

    /// Finish a turn: bump the counter, run the end-of-deck countdown, and
    /// pass play to the next seat. Returns `true` when the countdown ran
    /// out on this turn.
    pub(super) fn advance_turn(&mut self, num_players: usize) -> bool {
        self.turn += 1;
        let mut expired = false;
        if let Some(left) = self.turns_left.as_mut() {
            *left = left.saturating_sub(1);
            expired = *left == 0;
        }
        if self.deck.is_empty() && self.turns_left.is_none() {
            self.turns_left = Some(num_players);
        }
        self.current_player_index = (self.current_player_index + 1) % num_players;
        expired
    }

    /// Optimistic upper bound on the final score: greedily play anything
    /// playable from the deck and the hands while simulated turns remain.
    /// For display only; it doesn't prove the score is reachable.
    #[must_use]
    pub fn best_possible_score<'a, I>(&'a self, hand_cards: I, num_players: usize) -> u32
    where
        I: IntoIterator<Item = &'a Card>,
    {
        let candidates: Vec<&Card> = self.deck.iter().chain(hand_cards).collect();
        let mut piles = self.piles.clone();
        let mut score = self.score();
        let mut budget = self.deck.len() + num_players;
        if let Some(left) = self.turns_left {
            budget = budget.min(left);
        }

        while budget > 0 {
            let hit = candidates
                .iter()
                .find_map(|card| self.playable_on(card, &piles));
            let Some(idx) = hit else {
                break;
            };
            piles[idx] += 1;
            score += 1;
            budget -= 1;
        }
        score
    }

    /// Whether any card that can still reach a player is playable right
    /// now. `hands` must start at the current player. Looks at hidden
    /// cards, so the answer is never shown to players.
    #[must_use]
    pub fn has_playable_card<'a, I>(&'a self, hands: I) -> bool
    where
        I: IntoIterator<Item = &'a [Card]>,
    {
        if self.turn < NO_PLAYS_MIN_TURN {
            return true;
        }
        let reachable = self.turns_left.unwrap_or(usize::MAX);
        hands
            .into_iter()
            .take(reachable)
            .flatten()
            .chain(self.deck.iter())
            .any(|card| self.is_playable(card))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::CardId;
    use rand::{SeedableRng, rngs::StdRng};

    fn table(mode: Mode) -> Table {
        Table::new(&GameSettings {
            mode,
            ..GameSettings::default()
        })
    }

    fn card(color: Color, rank: Rank) -> Card {
        Card::new(CardId(999), color, rank)
    }

    #[test]
    fn test_new_table() {
        let table = table(Mode::Normal);
        assert_eq!(table.hints(), 8);
        assert_eq!(table.bombs(), 3);
        assert_eq!(table.cards_left(), 50);
        assert_eq!(table.piles(), &[0, 0, 0, 0, 0]);
        assert_eq!(table.turns_left(), None);
        assert_eq!(table.score(), 0);

        assert_eq!(self::table(Mode::Rainbow).piles().len(), 6);
    }

    #[test]
    fn test_play_card_success() {
        let mut table = table(Mode::Normal);
        assert_eq!(table.play_card(card(Color::Red, 1)), MoveResult::Play);
        assert_eq!(table.pile(Color::Red), 1);
        assert_eq!(table.pile_cards().len(), 1);
        assert_eq!(table.score(), 1);
        assert_eq!(table.bombs(), 3);
    }

    #[test]
    fn test_play_card_bomb() {
        let mut table = table(Mode::Normal);
        assert_eq!(table.play_card(card(Color::Red, 2)), MoveResult::Bomb);
        assert_eq!(table.pile(Color::Red), 0);
        assert_eq!(table.discard().len(), 1);
        assert_eq!(table.bombs(), 2);
    }

    #[test]
    fn test_rainbow_card_is_bomb_in_normal_mode() {
        let mut table = table(Mode::Normal);
        assert!(!table.is_playable(&card(Color::Rainbow, 1)));
        assert_eq!(table.play_card(card(Color::Rainbow, 1)), MoveResult::Bomb);
    }

    #[test]
    fn test_five_refunds_capped_hint() {
        let mut table = table(Mode::Normal);
        table.piles[0] = 4;
        table.play_card(card(Color::Red, 5));
        assert_eq!(table.hints(), 8);

        table.piles[1] = 4;
        table.hints = 2;
        table.play_card(card(Color::Green, 5));
        assert_eq!(table.hints(), 3);
    }

    #[test]
    fn test_discard_refunds_capped_hint() {
        let mut table = table(Mode::Normal);
        table.discard_card(card(Color::Red, 1));
        assert_eq!(table.hints(), 8);
        table.hints = 0;
        table.discard_card(card(Color::Red, 1));
        assert_eq!(table.hints(), 1);
        assert_eq!(table.discard().len(), 2);
    }

    #[test]
    fn test_refund_at_largest_hint_limit() {
        let mut table = Table::new(&GameSettings::new(Mode::Normal, u8::MAX, u8::MAX, 3));
        table.discard_card(card(Color::Red, 1));
        assert_eq!(table.hints(), u8::MAX);
    }

    #[test]
    fn test_spend_hint_stops_at_zero() {
        let mut table = table(Mode::Normal);
        table.hints = 1;
        assert!(table.spend_hint().is_ok());
        assert_eq!(table.spend_hint(), Err(GameError::NoHintsRemaining));
        assert_eq!(table.hints(), 0);
    }

    #[test]
    fn test_draw_card_from_empty_deck() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut table = table(Mode::Normal);
        for _ in 0..50 {
            table.draw_card(&mut rng).unwrap();
        }
        assert_eq!(table.draw_card(&mut rng), Err(GameError::DeckEmpty));
    }

    #[test]
    fn test_countdown_starts_when_deck_empties() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut table = table(Mode::Normal);
        while table.draw_card(&mut rng).is_ok() {}

        assert!(!table.advance_turn(3));
        assert_eq!(table.turns_left(), Some(3));
        assert!(!table.advance_turn(3));
        assert!(!table.advance_turn(3));
        assert_eq!(table.turns_left(), Some(1));
        assert!(table.advance_turn(3));
        assert_eq!(table.turns_left(), Some(0));
        assert_eq!(table.turn(), 4);
    }

    #[test]
    fn test_advance_turn_wraps() {
        let mut table = table(Mode::Normal);
        table.current_player_index = 2;
        table.advance_turn(3);
        assert_eq!(table.current_player_index(), 0);
    }

    #[test]
    fn test_piles_complete() {
        let mut table = table(Mode::Normal);
        assert!(!table.piles_complete());
        table.piles = vec![5; 5];
        assert!(table.piles_complete());
        assert_eq!(table.score(), 25);
    }

    #[test]
    fn test_best_possible_score_fresh_deck() {
        assert_eq!(table(Mode::Normal).best_possible_score(std::iter::empty(), 0), 25);
        assert_eq!(table(Mode::Hard).best_possible_score(std::iter::empty(), 0), 30);
    }

    #[test]
    fn test_best_possible_score_limited_by_countdown() {
        let mut table = table(Mode::Normal);
        let mut rng = StdRng::seed_from_u64(3);
        while table.draw_card(&mut rng).is_ok() {}
        table.turns_left = Some(2);
        let hand = [card(Color::Red, 1), card(Color::Red, 2), card(Color::Red, 3)];
        assert_eq!(table.best_possible_score(hand.iter(), 3), 2);

        table.turns_left = Some(5);
        assert_eq!(table.best_possible_score(hand.iter(), 3), 3);
    }

    #[test]
    fn test_best_possible_score_stops_on_gap() {
        let mut table = table(Mode::Normal);
        let mut rng = StdRng::seed_from_u64(3);
        while table.draw_card(&mut rng).is_ok() {}
        table.piles[0] = 1;
        let hand = [card(Color::Red, 3), card(Color::Blue, 1), card(Color::Blue, 2)];
        assert_eq!(table.best_possible_score(hand.iter(), 3), 3);
    }

    #[test]
    fn test_has_playable_card_skipped_early() {
        let mut table = table(Mode::Normal);
        let mut rng = StdRng::seed_from_u64(9);
        while table.draw_card(&mut rng).is_ok() {}
        let hand = [card(Color::Red, 4)];
        assert!(table.has_playable_card([&hand[..]]));

        table.turn = NO_PLAYS_MIN_TURN;
        assert!(!table.has_playable_card([&hand[..]]));
    }

    #[test]
    fn test_has_playable_card_respects_countdown() {
        let mut table = table(Mode::Normal);
        let mut rng = StdRng::seed_from_u64(9);
        while table.draw_card(&mut rng).is_ok() {}
        table.turn = 40;
        table.turns_left = Some(1);
        let dead = [card(Color::Red, 4)];
        let live = [card(Color::Red, 1)];
        assert!(!table.has_playable_card([&dead[..], &live[..]]));
        table.turns_left = Some(2);
        assert!(table.has_playable_card([&dead[..], &live[..]]));
    }

    #[test]
    fn test_scans_accept_hands_borrowed_separately() {
        let table = table(Mode::Normal);
        let hands = vec![vec![card(Color::Red, 2)], vec![card(Color::Blue, 1)]];
        let score = table.best_possible_score(hands.iter().flatten(), hands.len());
        assert_eq!(score, 25);
        assert!(table.has_playable_card(hands.iter().map(Vec::as_slice)));
    }
}
