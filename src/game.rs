use rand::SeedableRng;
use rand::seq::SliceRandom;

use crate::action::{Action, ResolvePayload};
use crate::card::{Card, full_deck};
use crate::state::{DECK_SIZE, GameState, TABLEAU_STACKS};

impl GameState {
    // -------------------------------------------------------------------------
    // Construction / Dealing
    // -------------------------------------------------------------------------

    /// Deal a fresh shuffled game using a random seed.
    pub fn deal_random() -> Self {
        let mut rng = rand::rngs::SmallRng::from_os_rng();
        let mut deck = full_deck();
        deck.shuffle(&mut rng);
        Self::deal(deck)
    }

    /// Deal a game from a specific seed (useful for reproducible games).
    pub fn deal_seeded(seed: u64) -> Self {
        let mut rng = rand::rngs::SmallRng::seed_from_u64(seed);
        let mut deck = full_deck();
        deck.shuffle(&mut rng);
        Self::deal(deck)
    }

    /// Deal from an already-shuffled deck.
    ///
    /// Stack `i` gets `i + 1` face-down cards, taken in deck order; the 24
    /// cards left over form the face-up draw pile.
    pub fn deal(deck: Vec<Card>) -> Self {
        assert_eq!(deck.len(), DECK_SIZE, "Need exactly 52 cards to deal");

        let mut cards = deck.into_iter();
        let mut tableau: [Vec<Card>; TABLEAU_STACKS] = Default::default();
        for (i, stack) in tableau.iter_mut().enumerate() {
            stack.extend(cards.by_ref().take(i + 1).map(|mut c| {
                c.face_up = false;
                c
            }));
        }

        let draw_pile = cards
            .map(|mut c| {
                c.show();
                c
            })
            .collect();

        GameState {
            draw_pile,
            draw_cursor: 0,
            tableau,
            ..GameState::default()
        }
    }

    // -------------------------------------------------------------------------
    // Reveal / Win
    // -------------------------------------------------------------------------

    /// Turn the top card of every tableau stack face-up.
    ///
    /// Undo never turns a card back down again.
    pub fn reveal(&mut self) {
        for stack in self.tableau.iter_mut() {
            if let Some(top) = stack.last_mut() {
                top.show();
            }
        }
    }

    /// All 52 cards are on the foundations.
    pub fn is_won(&self) -> bool {
        self.foundations.total() == DECK_SIZE
    }

    // -------------------------------------------------------------------------
    // Auto-Resolve
    // -------------------------------------------------------------------------

    /// Send every card that can go to a foundation there, through the normal
    /// resolve action so each one can be undone.
    ///
    /// A pass tries the draw-pile card, then the top of each stack in order,
    /// and passes repeat until one resolves nothing. Returns the number of
    /// cards resolved, or `None` if there was nothing to do.
    pub fn auto_resolve(&mut self) -> Option<usize> {
        let initial = self.foundations.total();

        loop {
            let before = self.foundations.total();

            // A card exposed by the previous pass is turned over before it
            // can be resolved.
            self.reveal();

            let draw = Action::Resolve(ResolvePayload::draw_pile());
            if draw.validate(self) {
                draw.execute(self);
            }
            for stack in 0..TABLEAU_STACKS {
                let action = Action::Resolve(ResolvePayload::stack(stack));
                if action.validate(self) {
                    action.execute(self);
                }
            }

            if self.foundations.total() == before {
                break; // No progress – stop.
            }
        }

        match self.foundations.total() - initial {
            0 => None,
            n => Some(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;

    #[test]
    fn deal_shapes_the_table() {
        let mut state = GameState::deal(full_deck());

        let lens: Vec<usize> = state.tableau.iter().map(Vec::len).collect();
        assert_eq!(lens, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(state.draw_pile.len(), 24);
        assert!(state.draw_pile.iter().all(|c| c.face_up));
        assert!(state.tableau.iter().flatten().all(|c| !c.face_up));
        assert_eq!(state.draw_cursor, 0);
        assert_eq!(state.card_count(), 52);
        assert!(state.history.is_empty());

        state.reveal();
        for stack in &state.tableau {
            let (top, rest) = stack.split_last().unwrap();
            assert!(top.face_up);
            assert!(rest.iter().all(|c| !c.face_up));
        }
    }

    #[test]
    fn deal_follows_deck_order() {
        let deck = full_deck();
        let state = GameState::deal(deck.clone());
        assert!(state.tableau[0][0].same_card(deck[0]));
        assert!(state.tableau[1][1].same_card(deck[2]));
        assert!(state.tableau[6][6].same_card(deck[27]));
        assert!(state.draw_pile[0].same_card(deck[28]));
    }

    #[test]
    fn seeded_deals_are_reproducible() {
        assert_eq!(GameState::deal_seeded(7), GameState::deal_seeded(7));
        assert_eq!(GameState::deal_seeded(7).card_count(), 52);
    }

    #[test]
    fn reveal_is_idempotent() {
        let mut state = GameState::deal_seeded(1);
        state.reveal();
        let once = state.clone();
        state.reveal();
        assert_eq!(state, once);
    }

    #[test]
    fn reveal_skips_empty_stacks() {
        let mut state = GameState::new();
        state.tableau[3] = vec![Card::new(5, Suit::Club)];
        state.reveal();
        assert!(state.tableau[3][0].face_up);
    }

    #[test]
    fn won_when_every_card_is_home() {
        let mut state = GameState::new();
        assert!(!state.is_won());
        for suit in Suit::ALL {
            *state.foundations.get_mut(suit) = (1..=13).map(|r| Card::up(r, suit)).collect();
        }
        assert!(state.is_won());
    }

    #[test]
    fn auto_resolve_with_nothing_to_do() {
        let mut state = GameState::new();
        state.tableau[0] = vec![Card::up(5, Suit::Club)];
        state.draw_pile = vec![Card::up(9, Suit::Heart)];
        let before = state.clone();

        assert_eq!(state.auto_resolve(), None);
        assert_eq!(state, before);
    }

    #[test]
    fn auto_resolve_chains_across_passes() {
        let mut state = GameState::new();
        // 2♣ only becomes playable after A♣ from the draw pile; 3♣ sits
        // face-down under A♥ and has to be revealed first.
        state.draw_pile = vec![Card::up(1, Suit::Club)];
        state.tableau[0] = vec![Card::up(2, Suit::Club)];
        state.tableau[1] = vec![Card::new(3, Suit::Club), Card::up(1, Suit::Heart)];
        state.tableau[2] = vec![Card::up(2, Suit::Heart)];

        assert_eq!(state.auto_resolve(), Some(5));
        assert_eq!(state.foundations.club.len(), 3);
        assert_eq!(state.foundations.heart.len(), 2);
        assert_eq!(state.history.len(), 5);

        while state.can_undo() {
            state.undo_last();
        }
        assert_eq!(state.foundations.total(), 0);
        assert_eq!(state.card_count(), 5);
    }
}
