use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::card::{Card, Suit};

/// Number of tableau stacks.
pub const TABLEAU_STACKS: usize = 7;
/// Number of cards in play.
pub const DECK_SIZE: usize = 52;

/// The four foundation piles, each built Ace to King in one suit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Foundations {
    pub club: Vec<Card>,
    pub diamond: Vec<Card>,
    pub heart: Vec<Card>,
    pub spade: Vec<Card>,
}

impl Foundations {
    pub fn get(&self, suit: Suit) -> &Vec<Card> {
        match suit {
            Suit::Club => &self.club,
            Suit::Diamond => &self.diamond,
            Suit::Heart => &self.heart,
            Suit::Spade => &self.spade,
        }
    }

    pub fn get_mut(&mut self, suit: Suit) -> &mut Vec<Card> {
        match suit {
            Suit::Club => &mut self.club,
            Suit::Diamond => &mut self.diamond,
            Suit::Heart => &mut self.heart,
            Suit::Spade => &mut self.spade,
        }
    }

    /// Top card of a suit's foundation, if any.
    pub fn top(&self, suit: Suit) -> Option<Card> {
        self.get(suit).last().copied()
    }

    /// Cards across all four foundations.
    pub fn total(&self) -> usize {
        Suit::ALL.iter().map(|&s| self.get(s).len()).sum()
    }
}

/// The game state – the single source of truth for one deal in flight.
///
/// Holds no UI state: the selection cursor and move mode live in
/// [`crate::cursor::Cursor`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Remaining draw-pile cards, all face-up.
    pub draw_pile: Vec<Card>,
    /// Index of the inspected draw-pile card; 0 when the pile is empty.
    pub draw_cursor: usize,
    /// Seven stacks, bottom to top.
    pub tableau: [Vec<Card>; TABLEAU_STACKS],
    pub foundations: Foundations,
    /// Executed actions not yet undone, oldest first.
    pub history: Vec<Action>,
}

impl GameState {
    /// An empty table with no cards dealt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear everything back to the empty table.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The draw-pile card under the cursor.
    pub fn current_draw_card(&self) -> Option<Card> {
        self.draw_pile.get(self.draw_cursor).copied()
    }

    /// Returns the top card of a tableau stack, if any.
    pub fn tableau_top(&self, stack: usize) -> Option<Card> {
        self.tableau.get(stack).and_then(|s| s.last().copied())
    }

    /// Total number of cards on the table.
    pub fn card_count(&self) -> usize {
        self.draw_pile.len()
            + self.tableau.iter().map(Vec::len).sum::<usize>()
            + self.foundations.total()
    }

    /// Every card on the table, in no particular order.
    pub fn all_cards(&self) -> impl Iterator<Item = &Card> {
        self.draw_pile
            .iter()
            .chain(self.tableau.iter().flatten())
            .chain(Suit::ALL.into_iter().flat_map(move |s| self.foundations.get(s).iter()))
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Take the draw-pile card under the cursor and step the cursor back one
    /// place (never below zero).
    pub(crate) fn take_draw_card(&mut self) -> Option<Card> {
        if self.draw_cursor >= self.draw_pile.len() {
            return None;
        }
        let card = self.draw_pile.remove(self.draw_cursor);
        self.draw_cursor = self.draw_cursor.saturating_sub(1);
        Some(card)
    }

    /// Put a card back into the draw pile after undoing a draw-pile move or
    /// resolve.
    ///
    /// A cursor on the last card appends and points at the new last card;
    /// otherwise a non-zero cursor steps forward one and the card is
    /// inserted there.
    pub(crate) fn restore_draw_card(&mut self, card: Card) {
        if self.draw_cursor + 1 >= self.draw_pile.len() {
            self.draw_pile.push(card);
            self.draw_cursor = self.draw_pile.len() - 1;
        } else {
            if self.draw_cursor > 0 {
                self.draw_cursor += 1;
            }
            self.draw_pile.insert(self.draw_cursor, card);
        }
    }
}
