//! Selection cursor over the table, kept apart from [`GameState`].
//!
//! The table is a grid of seven columns. Row 0 is the top row: the draw-pile
//! card in column 0, two unused slots, then the Spade, Heart, Club and Diamond
//! foundations. Rows 1.. of column `x` are the cards of tableau stack `x`,
//! bottom first. While a move is being made the cursor instead picks one of
//! the destination stacks S1..S7.

use crate::action::{Action, MovePayload, ResolvePayload};
use crate::card::Suit;
use crate::state::{GameState, TABLEAU_STACKS};

/// What a move in progress picked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveMode {
    #[default]
    None,
    Stack,
    DrawPile,
    Foundation,
}

/// Foundation shown in top-row column `x`, if any.
pub fn foundation_at(x: usize) -> Option<Suit> {
    match x {
        3 => Some(Suit::Spade),
        4 => Some(Suit::Heart),
        5 => Some(Suit::Club),
        6 => Some(Suit::Diamond),
        _ => None,
    }
}

/// Columns 1 and 2 have nothing in the top row.
fn top_slot_empty(x: usize) -> bool {
    x == 1 || x == 2
}

/// Rows in column `x`: the top-row slot plus one per card in the stack.
fn rows(state: &GameState, x: usize) -> usize {
    state.tableau[x].len() + 1
}

/// The first stack with cards in it, else the last foundation.
fn nearest_card(state: &GameState) -> (usize, usize) {
    (0..TABLEAU_STACKS)
        .find(|&x| rows(state, x) > 1)
        .map_or((TABLEAU_STACKS - 1, 0), |x| (x, 1))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    pub x: usize,
    pub y: usize,
    pub mode: MoveMode,
    from_stack: usize,
    from_row: usize,
    from_suit: Option<Suit>,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cursor at a restored position, with no move in progress.
    pub fn at(x: usize, y: usize) -> Self {
        Cursor {
            x,
            y,
            ..Self::default()
        }
    }

    pub fn is_moving(&self) -> bool {
        self.mode != MoveMode::None
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    pub fn up(&mut self, state: &GameState) {
        if self.is_moving() || self.y == 0 {
            return;
        }

        if self.y == 1 && top_slot_empty(self.x) {
            self.y = 0;
            self.x = if state.current_draw_card().is_some() { 0 } else { 3 };
        } else {
            self.y -= 1;
        }
    }

    pub fn down(&mut self, state: &GameState) {
        if self.is_moving() {
            return;
        }

        if self.y + 1 > rows(state, self.x) - 1 {
            if self.y > 0 {
                return;
            }
            (self.x, self.y) = nearest_card(state);
        } else {
            self.y += 1;
        }
    }

    pub fn left(&mut self, state: &GameState) {
        if self.is_moving() {
            self.x = self.x.saturating_sub(1);
            return;
        }
        if self.x == 0 {
            return;
        }
        if let Some(x) = (0..self.x).rev().find(|&x| self.can_land(state, x)) {
            self.land(state, x);
        }
    }

    pub fn right(&mut self, state: &GameState) {
        if self.is_moving() {
            if self.x + 1 < TABLEAU_STACKS {
                self.x += 1;
            }
            return;
        }
        if let Some(x) = (self.x + 1..TABLEAU_STACKS).find(|&x| self.can_land(state, x)) {
            self.land(state, x);
        }
    }

    /// Sideways steps stay in the top row, or skip stacks with no cards.
    fn can_land(&self, state: &GameState, x: usize) -> bool {
        if self.y == 0 {
            !top_slot_empty(x)
        } else {
            rows(state, x) > 1
        }
    }

    fn land(&mut self, state: &GameState, x: usize) {
        self.x = x;
        if self.y > 0 {
            self.y = self.y.min(rows(state, x) - 1);
        }
    }

    /// Pull the cursor back onto something that exists after the table
    /// changed under it.
    pub fn settle(&mut self, state: &GameState) {
        if self.is_moving() {
            self.x = self.x.min(TABLEAU_STACKS - 1);
            return;
        }
        if self.x >= TABLEAU_STACKS {
            (self.x, self.y) = nearest_card(state);
            return;
        }

        if self.y == 0 {
            if top_slot_empty(self.x) {
                (self.x, self.y) = nearest_card(state);
            }
        } else if rows(state, self.x) == 1 {
            (self.x, self.y) = nearest_card(state);
        } else {
            self.y = self.y.min(rows(state, self.x) - 1);
        }
    }

    // -------------------------------------------------------------------------
    // Moves
    // -------------------------------------------------------------------------

    /// Pick up whatever is under the cursor. Returns `false` if there is
    /// nothing there that could move.
    pub fn start_move(&mut self, state: &GameState) -> bool {
        if self.is_moving() {
            return false;
        }

        if self.y == 0 {
            if self.x == 0 {
                if state.current_draw_card().is_none() {
                    return false;
                }
                self.mode = MoveMode::DrawPile;
                return true;
            }
            let Some(suit) = foundation_at(self.x) else {
                return false;
            };
            if state.foundations.get(suit).is_empty() {
                return false;
            }
            self.from_suit = Some(suit);
            self.x = 0;
            self.mode = MoveMode::Foundation;
            return true;
        }

        let count = rows(state, self.x).saturating_sub(self.y);
        let probe = Action::Move(MovePayload::stack(self.x, count, 0));
        if !probe.validate(state) {
            return false;
        }
        self.from_stack = self.x;
        self.from_row = self.y;
        self.mode = MoveMode::Stack;
        true
    }

    /// The move that dropping onto the stack under the cursor would make.
    pub fn drop_action(&self, state: &GameState) -> Option<Action> {
        let to = self.x;
        let payload = match self.mode {
            MoveMode::None => return None,
            MoveMode::Stack => {
                let count = rows(state, self.from_stack).saturating_sub(self.from_row);
                MovePayload::stack(self.from_stack, count, to)
            }
            MoveMode::DrawPile => MovePayload::draw_pile(to),
            MoveMode::Foundation => MovePayload::foundation(self.from_suit?, to),
        };
        Some(Action::Move(payload))
    }

    /// Leave move mode with the cursor on the destination's top card.
    pub fn finish_move(&mut self, state: &GameState) {
        self.y = state.tableau[self.x].len();
        self.cancel_move();
    }

    pub fn cancel_move(&mut self) {
        self.mode = MoveMode::None;
        self.from_suit = None;
    }

    /// The resolve for the card under the cursor: the draw-pile card, or the
    /// top card of a stack.
    pub fn resolve_action(&self, state: &GameState) -> Option<Action> {
        if self.is_moving() {
            return None;
        }
        if self.y == 0 {
            return (self.x == 0).then(|| Action::Resolve(ResolvePayload::draw_pile()));
        }
        (self.y == rows(state, self.x) - 1).then(|| Action::Resolve(ResolvePayload::stack(self.x)))
    }

    /// Is grid cell (`x`, `y`) under the cursor? In move mode only the
    /// destination row is focused.
    pub fn is_focused(&self, x: usize, y: usize) -> bool {
        !self.is_moving() && self.x == x && self.y == y
    }

    /// Is `x` the destination stack picked in move mode?
    pub fn is_target(&self, x: usize) -> bool {
        self.is_moving() && self.x == x
    }
}
