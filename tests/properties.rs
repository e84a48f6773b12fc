//! Property-based tests for the action set.
//!
//! Random games are played with random (mostly illegal) actions and undos;
//! the table must never gain, lose or duplicate a card, foundations must
//! stay in order, and undo must put things back.

use proptest::prelude::*;

use soli_rs::card::{ACE, KING, full_deck};
use soli_rs::{Action, Card, GameState, MovePayload, MoveSource, ResolvePayload, ResolveSource, Suit};

/// (rank, suit) of every card on the table, sorted.
fn identities(state: &GameState) -> Vec<(u8, u8)> {
    let mut ids: Vec<(u8, u8)> = state.all_cards().map(|c| (c.rank, c.suit as u8)).collect();
    ids.sort_unstable();
    ids
}

fn full_identities() -> Vec<(u8, u8)> {
    let mut ids: Vec<(u8, u8)> = full_deck().iter().map(|c| (c.rank, c.suit as u8)).collect();
    ids.sort_unstable();
    ids
}

fn foundations_in_order(state: &GameState) -> bool {
    Suit::ALL.iter().all(|&suit| {
        state
            .foundations
            .get(suit)
            .iter()
            .enumerate()
            .all(|(i, c)| c.suit == suit && usize::from(c.rank) == i + 1)
    })
}

fn action_strategy() -> impl Strategy<Value = Action> {
    let stack = 0usize..7;
    let suit = prop::sample::select(Suit::ALL.to_vec());
    prop_oneof![
        3 => (stack.clone(), 1usize..14, stack.clone())
            .prop_map(|(f, n, t)| Action::Move(MovePayload::stack(f, n, t))),
        2 => stack.clone().prop_map(|t| Action::Move(MovePayload::draw_pile(t))),
        1 => (suit, stack.clone()).prop_map(|(s, t)| Action::Move(MovePayload::foundation(s, t))),
        3 => stack.prop_map(|f| Action::Resolve(ResolvePayload::stack(f))),
        2 => Just(Action::Resolve(ResolvePayload::draw_pile())),
        3 => Just(Action::NextInPile),
    ]
}

/// A step of play: an action, or an undo.
fn step_strategy() -> impl Strategy<Value = Option<Action>> {
    prop_oneof![
        6 => action_strategy().prop_map(Some),
        1 => Just(None),
    ]
}

/// Does putting a draw-pile card back restore the exact pile? Only a
/// cursor on the first of two cards, or on the second of three or more,
/// shifts the card to a different index.
fn draw_undo_is_exact(cursor: usize, len: usize) -> bool {
    !((cursor == 0 && len == 2) || (cursor == 1 && len > 2))
}

fn takes_from_draw_pile(action: &Action) -> bool {
    matches!(
        action,
        Action::Move(MovePayload { source: MoveSource::DrawPile, .. })
            | Action::Resolve(ResolvePayload { source: ResolveSource::DrawPile, .. })
    )
}

#[test]
fn placement_rule_over_every_pair() {
    let deck: Vec<Card> = full_deck().into_iter().map(|mut c| { c.show(); c }).collect();
    for &from in &deck {
        assert_eq!(from.can_place_on(None), from.rank == KING);
        for &to in &deck {
            let expected = i16::from(to.rank) - i16::from(from.rank) == 1 && to.color() != from.color();
            assert_eq!(from.can_place_on(Some(to)), expected, "{from:?} on {to:?}");
        }
    }
}

#[test]
fn foundation_rule_over_every_pair() {
    let deck = full_deck();
    for &card in &deck {
        assert_eq!(card.can_found_on(None), card.rank == ACE);
        for &top in deck.iter().filter(|c| c.suit == card.suit) {
            assert_eq!(card.can_found_on(Some(top)), card.rank == top.rank + 1);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// No sequence of actions and undos gains, loses or duplicates a card,
    /// and history only grows on success.
    #[test]
    fn prop_cards_are_never_lost(
        seed in any::<u64>(),
        steps in prop::collection::vec(step_strategy(), 0..200)
    ) {
        let mut state = GameState::deal_seeded(seed);
        state.reveal();
        let expected = full_identities();

        for step in steps {
            let before = state.history.len();
            match step {
                Some(action) => {
                    let valid = action.validate(&state);
                    action.execute(&mut state);
                    let grew = state.history.len() == before + 1;
                    prop_assert!(grew || state.history.len() == before);
                    prop_assert!(valid || !grew, "invalid action executed: {action:?}");
                }
                None => {
                    state.undo_last();
                    prop_assert_eq!(state.history.len(), before.saturating_sub(1));
                }
            }
            state.reveal();

            prop_assert_eq!(identities(&state), expected.clone());
            prop_assert!(foundations_in_order(&state));
            prop_assert!(state.draw_cursor < state.draw_pile.len().max(1));
        }
    }

    /// Executing an action and undoing it puts the table back.
    #[test]
    fn prop_undo_reverses_execute(
        seed in any::<u64>(),
        warmup in prop::collection::vec(action_strategy(), 0..100),
        action in action_strategy()
    ) {
        let mut state = GameState::deal_seeded(seed);
        for a in warmup {
            state.reveal();
            a.execute(&mut state);
        }
        state.reveal();

        let before = state.clone();
        let taken = state.current_draw_card();
        action.execute(&mut state);
        if state.history.len() == before.history.len() {
            prop_assert_eq!(&state, &before);
            return Ok(());
        }
        state.undo_last();

        if takes_from_draw_pile(&action)
            && !draw_undo_is_exact(before.draw_cursor, before.draw_pile.len())
        {
            prop_assert_eq!(&state.tableau, &before.tableau);
            prop_assert_eq!(&state.foundations, &before.foundations);
            prop_assert_eq!(state.current_draw_card(), taken);
        } else {
            prop_assert_eq!(&state, &before);
        }
    }

    /// Auto-resolve only ever adds cards to the foundations, in order, and
    /// stops.
    #[test]
    fn prop_auto_resolve_terminates(seed in any::<u64>()) {
        let mut state = GameState::deal_seeded(seed);
        let before = state.foundations.total();
        let resolved = state.auto_resolve().unwrap_or(0);
        prop_assert_eq!(state.foundations.total(), before + resolved);
        prop_assert_eq!(state.history.len(), resolved);
        prop_assert!(foundations_in_order(&state));
        prop_assert_eq!(state.auto_resolve(), None);
    }
}
