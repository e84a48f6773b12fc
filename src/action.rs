//! Player actions with validate / execute / undo.
//!
//! Every action that executes successfully is pushed onto
//! [`GameState::history`]; a failed one leaves the state and history
//! untouched and explains why in the returned message. Undo is only reachable
//! through [`GameState::undo_last`], which always reverses the newest entry.

use serde::{Deserialize, Serialize};

use crate::card::{Card, Suit};
use crate::state::GameState;

/// Where the cards of a [`MovePayload`] come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveSource {
    /// The top `count` cards of a tableau stack.
    Stack,
    /// The draw-pile card under the cursor.
    DrawPile,
    /// The top card of a foundation.
    Foundation,
}

/// Move cards onto a tableau stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePayload {
    pub source: MoveSource,
    pub from_stack: usize,
    /// Number of cards taken from the top of `from_stack`.
    pub count: usize,
    /// Foundation to take from when `source` is [`MoveSource::Foundation`].
    pub from_suit: Option<Suit>,
    pub to_stack: usize,
}

impl MovePayload {
    /// Move the top `count` cards of one stack onto another.
    pub fn stack(from_stack: usize, count: usize, to_stack: usize) -> Self {
        MovePayload {
            source: MoveSource::Stack,
            from_stack,
            count,
            from_suit: None,
            to_stack,
        }
    }

    /// Move the current draw-pile card onto a stack.
    pub fn draw_pile(to_stack: usize) -> Self {
        MovePayload {
            source: MoveSource::DrawPile,
            from_stack: 0,
            count: 1,
            from_suit: None,
            to_stack,
        }
    }

    /// Move a foundation's top card back onto a stack.
    pub fn foundation(suit: Suit, to_stack: usize) -> Self {
        MovePayload {
            source: MoveSource::Foundation,
            from_stack: 0,
            count: 1,
            from_suit: Some(suit),
            to_stack,
        }
    }
}

/// Where a resolved card comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolveSource {
    Stack,
    DrawPile,
}

/// Send one card to its foundation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvePayload {
    pub source: ResolveSource,
    pub from_stack: usize,
    /// Filled in on execute; undo needs it to find the foundation again.
    pub suit: Option<Suit>,
}

impl ResolvePayload {
    pub fn stack(from_stack: usize) -> Self {
        ResolvePayload {
            source: ResolveSource::Stack,
            from_stack,
            suit: None,
        }
    }

    pub fn draw_pile() -> Self {
        ResolvePayload {
            source: ResolveSource::DrawPile,
            from_stack: 0,
            suit: None,
        }
    }
}

/// Everything a player can do to the table. Also the history entry type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Move(MovePayload),
    Resolve(ResolvePayload),
    /// Rotate the draw-pile cursor to the next card.
    NextInPile,
}

fn describe(card: Option<Card>) -> String {
    match card {
        Some(c) => c.name(),
        None => "empty stack".to_string(),
    }
}

impl Action {
    /// Pure legality check; never mutates.
    pub fn validate(&self, state: &GameState) -> bool {
        match self {
            Action::Move(p) => validate_move(state, p),
            Action::Resolve(p) => validate_resolve(state, p),
            Action::NextInPile => !state.draw_pile.is_empty(),
        }
    }

    /// Apply the action if it is legal. Returns a message either way; only a
    /// successful action is pushed onto the history.
    pub fn execute(&self, state: &mut GameState) -> String {
        match self {
            Action::Move(p) => match p.source {
                MoveSource::Stack => move_from_stack(state, p),
                MoveSource::DrawPile => move_from_draw_pile(state, p),
                MoveSource::Foundation => move_from_foundation(state, p),
            },
            Action::Resolve(p) => resolve(state, p),
            Action::NextInPile => next_in_pile(state),
        }
    }

    /// Reverse this action. The entry has already been popped off history.
    fn undo(self, state: &mut GameState) -> String {
        match self {
            Action::Move(p) => match p.source {
                MoveSource::Stack => undo_move_from_stack(state, &p),
                MoveSource::DrawPile => undo_move_from_draw_pile(state, &p),
                MoveSource::Foundation => undo_move_from_foundation(state, &p),
            },
            Action::Resolve(p) => undo_resolve(state, &p),
            Action::NextInPile => undo_next_in_pile(state),
        }
    }
}

impl GameState {
    /// Pop the newest history entry and reverse it.
    ///
    /// History is trusted: the entry is not validated again.
    pub fn undo_last(&mut self) -> String {
        match self.history.pop() {
            Some(action) => action.undo(self),
            None => "Nothing left to undo!".to_string(),
        }
    }
}

// -----------------------------------------------------------------------------
// Move
// -----------------------------------------------------------------------------

/// The top `count` cards of a stack, if it has that many.
fn selected_run(state: &GameState, stack: usize, count: usize) -> Option<&[Card]> {
    let cards = state.tableau.get(stack)?;
    if count == 0 || count > cards.len() {
        return None;
    }
    Some(&cards[cards.len() - count..])
}

/// Every card in the run sits on the one below it by the placement rule.
fn is_valid_run(run: &[Card]) -> bool {
    run.windows(2).all(|w| w[1].can_place_on(Some(w[0])))
}

fn validate_move(state: &GameState, p: &MovePayload) -> bool {
    if p.to_stack >= state.tableau.len() {
        return false;
    }
    match p.source {
        MoveSource::Stack => {
            selected_run(state, p.from_stack, p.count).is_some_and(is_valid_run)
        }
        MoveSource::DrawPile => !state.draw_pile.is_empty(),
        MoveSource::Foundation => p.from_suit.is_some(),
    }
}

fn move_from_stack(state: &mut GameState, p: &MovePayload) -> String {
    if !validate_move(state, p) {
        return "Can't move that card!".to_string();
    }
    let Some(run) = selected_run(state, p.from_stack, p.count) else {
        return "Can't move that card!".to_string();
    };
    let bottom = run[0];
    if !bottom.face_up {
        return "Can't move that card!".to_string();
    }

    let to = state.tableau_top(p.to_stack);
    if !bottom.can_place_on(to) {
        return format!("Can't move {} to {}!", bottom.name(), describe(to));
    }

    let from = &mut state.tableau[p.from_stack];
    let start = from.len() - p.count;
    let moved: Vec<Card> = from.drain(start..).collect();
    state.tableau[p.to_stack].extend(moved);
    state.history.push(Action::Move(*p));

    format!("Moved {} to {}", bottom.name(), describe(to))
}

fn undo_move_from_stack(state: &mut GameState, p: &MovePayload) -> String {
    let to = &mut state.tableau[p.to_stack];
    let start = to.len().saturating_sub(p.count);
    let moved: Vec<Card> = to.drain(start..).collect();
    let name = describe(moved.first().copied());
    state.tableau[p.from_stack].extend(moved);

    format!("Undo: Moving {name}")
}

fn move_from_draw_pile(state: &mut GameState, p: &MovePayload) -> String {
    if !validate_move(state, p) {
        return "Can't move that card!".to_string();
    }
    let Some(card) = state.current_draw_card() else {
        return "Can't move that card!".to_string();
    };

    let to = state.tableau_top(p.to_stack);
    if !card.can_place_on(to) {
        return format!("Can't move {} to {}!", card.name(), describe(to));
    }

    if let Some(card) = state.take_draw_card() {
        state.tableau[p.to_stack].push(card);
    }
    state.history.push(Action::Move(*p));

    format!("Moved {} to {}", card.name(), describe(to))
}

fn undo_move_from_draw_pile(state: &mut GameState, p: &MovePayload) -> String {
    let Some(card) = state.tableau[p.to_stack].pop() else {
        return "Cannot undo moved card!".to_string();
    };
    state.restore_draw_card(card);

    format!("Undo: Moving {}", card.name())
}

fn move_from_foundation(state: &mut GameState, p: &MovePayload) -> String {
    if !validate_move(state, p) {
        return "Can't move that card!".to_string();
    }
    let Some(suit) = p.from_suit else {
        return "Can't move that card!".to_string();
    };
    let Some(card) = state.foundations.top(suit) else {
        return "Resolved is empty!".to_string();
    };

    let to = state.tableau_top(p.to_stack);
    if !card.can_place_on(to) {
        return format!("Can't move {} to {}!", card.name(), describe(to));
    }

    state.foundations.get_mut(suit).pop();
    state.tableau[p.to_stack].push(card);
    state.history.push(Action::Move(*p));

    format!("Moved {} to {}", card.name(), describe(to))
}

fn undo_move_from_foundation(state: &mut GameState, p: &MovePayload) -> String {
    let Some(suit) = p.from_suit else {
        return "Cannot undo moved card!".to_string();
    };
    let Some(card) = state.tableau[p.to_stack].pop() else {
        return "Cannot undo moved card!".to_string();
    };
    state.foundations.get_mut(suit).push(card);

    format!("Undo: Moving {}", card.name())
}

// -----------------------------------------------------------------------------
// Resolve
// -----------------------------------------------------------------------------

fn validate_resolve(state: &GameState, p: &ResolvePayload) -> bool {
    match p.source {
        ResolveSource::Stack => state.tableau_top(p.from_stack).is_some(),
        ResolveSource::DrawPile => !state.draw_pile.is_empty(),
    }
}

fn resolve(state: &mut GameState, p: &ResolvePayload) -> String {
    if !validate_resolve(state, p) {
        return "Can't resolve that card!".to_string();
    }
    let card = match p.source {
        ResolveSource::Stack => state.tableau_top(p.from_stack),
        ResolveSource::DrawPile => state.current_draw_card(),
    };
    let Some(card) = card else {
        return "Can't resolve that card!".to_string();
    };

    if !card.can_found_on(state.foundations.top(card.suit)) {
        return format!("Cannot resolve {}", card.name());
    }

    match p.source {
        ResolveSource::Stack => {
            state.tableau[p.from_stack].pop();
        }
        ResolveSource::DrawPile => {
            state.take_draw_card();
        }
    }
    state.foundations.get_mut(card.suit).push(card);
    state.history.push(Action::Resolve(ResolvePayload {
        suit: Some(card.suit),
        ..*p
    }));

    format!("Resolved {}", card.name())
}

fn undo_resolve(state: &mut GameState, p: &ResolvePayload) -> String {
    let Some(card) = p.suit.and_then(|s| state.foundations.get_mut(s).pop()) else {
        return "Cannot undo resolved card!".to_string();
    };
    match p.source {
        ResolveSource::Stack => state.tableau[p.from_stack].push(card),
        ResolveSource::DrawPile => state.restore_draw_card(card),
    }

    format!("Undo: Resolving {}", card.name())
}

// -----------------------------------------------------------------------------
// Next in pile
// -----------------------------------------------------------------------------

fn next_in_pile(state: &mut GameState) -> String {
    if state.draw_pile.is_empty() {
        return "Can't show next in pile!".to_string();
    }

    state.draw_cursor = (state.draw_cursor + 1) % state.draw_pile.len();
    state.history.push(Action::NextInPile);

    "Showing next in pile".to_string()
}

fn undo_next_in_pile(state: &mut GameState) -> String {
    state.draw_cursor = match state.draw_cursor {
        0 => state.draw_pile.len().saturating_sub(1),
        n => n - 1,
    };

    "Undo: Showing next in pile".to_string()
}
