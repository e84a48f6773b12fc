use serde::{Deserialize, Serialize};

/// Lowest rank (Ace).
pub const ACE: u8 = 1;
/// Highest rank (King).
pub const KING: u8 = 13;

/// The four French suits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Club,
    Diamond,
    Heart,
    Spade,
}

/// Card colour, derived from the suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Red,
}

impl Suit {
    /// All four suits, in canonical order.
    pub const ALL: [Suit; 4] = [Suit::Club, Suit::Diamond, Suit::Heart, Suit::Spade];

    /// Glyph used when rendering a card name.
    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Club => "♣",
            Suit::Diamond => "♦",
            Suit::Heart => "♥",
            Suit::Spade => "♠",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Suit::Club | Suit::Spade => Color::Black,
            Suit::Diamond | Suit::Heart => Color::Red,
        }
    }
}

/// A playing card.
///
/// `rank` and `suit` never change; `face_up` belongs to whichever pile
/// currently holds the card. Everything else (name, colour, glyph) is
/// derived, so a card restored from a save file needs only these three fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// 1 = Ace .. 13 = King.
    pub rank: u8,
    pub suit: Suit,
    pub face_up: bool,
}

impl Card {
    /// A face-down card.
    pub fn new(rank: u8, suit: Suit) -> Self {
        debug_assert!((ACE..=KING).contains(&rank), "rank out of range: {rank}");
        Card {
            rank,
            suit,
            face_up: false,
        }
    }

    /// A face-up card.
    pub fn up(rank: u8, suit: Suit) -> Self {
        Card {
            face_up: true,
            ..Card::new(rank, suit)
        }
    }

    pub fn color(self) -> Color {
        self.suit.color()
    }

    pub fn is_king(self) -> bool {
        self.rank == KING
    }

    /// Same rank and suit, ignoring which way up the card lies.
    pub fn same_card(self, other: Card) -> bool {
        self.rank == other.rank && self.suit == other.suit
    }

    /// Flip the card face-up. Flipping an already visible card does nothing.
    pub fn show(&mut self) {
        self.face_up = true;
    }

    /// Rank glyph; ten is `X` so every code is one character wide.
    pub fn code(self) -> &'static str {
        match self.rank {
            1 => "A",
            2 => "2",
            3 => "3",
            4 => "4",
            5 => "5",
            6 => "6",
            7 => "7",
            8 => "8",
            9 => "9",
            10 => "X",
            11 => "J",
            12 => "Q",
            13 => "K",
            _ => "?",
        }
    }

    /// `--` while face-down, otherwise rank glyph plus suit glyph (`Q♥`).
    pub fn name(self) -> String {
        if self.face_up {
            format!("{}{}", self.code(), self.suit.symbol())
        } else {
            "--".to_string()
        }
    }

    /// Can this card land on a tableau stack whose top card is `to`?
    ///
    /// An empty stack only takes a King; otherwise the card must be exactly
    /// one rank lower and of the opposite colour.
    pub fn can_place_on(self, to: Option<Card>) -> bool {
        match to {
            None => self.is_king(),
            Some(to) => to.rank == self.rank + 1 && to.color() != self.color(),
        }
    }

    /// Can this card go onto a foundation whose top card is `top`?
    ///
    /// The foundation must belong to this card's suit; callers look it up
    /// by `self.suit`.
    pub fn can_found_on(self, top: Option<Card>) -> bool {
        match top {
            None => self.rank == ACE,
            Some(top) => self.rank == top.rank + 1,
        }
    }
}

/// The 52 cards, face-down, rank-major (A♣ A♦ A♥ A♠ 2♣ ...).
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(52);

    for rank in ACE..=KING {
        for &suit in &Suit::ALL {
            deck.push(Card::new(rank, suit));
        }
    }

    debug_assert_eq!(deck.len(), 52, "Deck must have exactly 52 cards");
    deck
}
