use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rank of a played ace when the player means it as the high ace.
pub const ACE_HIGH: Value = 14;
/// Canonical rank of an ace. Board, hands and collected piles only ever hold this.
pub const ACE_LOW: Value = 1;
/// Highest value a stack may declare.
pub const MAX_STACK_VALUE: Value = 14;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    #[serde(rename = "clubs")]
    Club,
    #[serde(rename = "diamonds")]
    Diamond,
    #[serde(rename = "hearts")]
    Heart,
    #[serde(rename = "spades")]
    Spade,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Club, Suit::Diamond, Suit::Heart, Suit::Spade];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Diamond => "♦",
            Self::Heart => "♥",
            Self::Spade => "♠",
        };
        write!(f, "{repr}")
    }
}

/// Placeholder for card values.
pub type Value = u8;

/// Whether two ranks name the same card value, treating 1 and 14 as the
/// same ace.
#[must_use]
pub const fn ranks_equivalent(a: Value, b: Value) -> bool {
    a == b || matches!((a, b), (ACE_LOW, ACE_HIGH) | (ACE_HIGH, ACE_LOW))
}

/// Map an ace played high back to its canonical rank.
#[must_use]
pub const fn normalize_rank(rank: Value) -> Value {
    if rank == ACE_HIGH { ACE_LOW } else { rank }
}

/// A card is a tuple of a uInt8 value (ace=1u8 ... king=13u8) and a suit.
///
/// Cards held anywhere in a match are always canonical; the high ace (14)
/// only exists on [`PlayedCard`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Value, pub Suit);

impl Card {
    #[must_use]
    pub const fn rank(self) -> Value {
        self.0
    }

    #[must_use]
    pub const fn suit(self) -> Suit {
        self.1
    }

    #[must_use]
    pub const fn is_ace(self) -> bool {
        self.0 == ACE_LOW || self.0 == ACE_HIGH
    }

    /// Whether this card is the physical card a player refers to with `played`.
    #[must_use]
    pub fn matches(self, played: &PlayedCard) -> bool {
        self.1 == played.suit && ranks_equivalent(self.0, played.card)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = match self.0 {
            1 | 14 => "A",
            11 => "J",
            12 => "Q",
            13 => "K",
            v => &v.to_string(),
        };
        let repr = format!("{value}/{}", self.1);
        write!(f, "{repr:>4}")
    }
}

/// A card as a client names it when playing: `card` is 1..=13, or 14 for an
/// ace the player intends as high.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct PlayedCard {
    pub card: Value,
    pub suit: Suit,
}

impl PlayedCard {
    #[must_use]
    pub const fn new(card: Value, suit: Suit) -> Self {
        Self { card, suit }
    }

    /// The canonical card this refers to.
    #[must_use]
    pub const fn card(&self) -> Card {
        Card(normalize_rank(self.card), self.suit)
    }

    #[must_use]
    pub const fn is_ace_high(&self) -> bool {
        self.card == ACE_HIGH
    }
}

impl From<Card> for PlayedCard {
    fn from(value: Card) -> Self {
        Self::new(value.0, value.1)
    }
}

impl fmt::Display for PlayedCard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_ace_high() {
            write!(f, "{} (high)", self.card())
        } else {
            self.card().fmt(f)
        }
    }
}

/// Which cards make up a full deck.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckVariant {
    /// Ranks 1..=13 in every suit.
    #[default]
    Standard52,
    /// Ranks 1..=10 in every suit (no court cards).
    Short40,
}

impl DeckVariant {
    #[must_use]
    pub const fn max_rank(self) -> Value {
        match self {
            Self::Standard52 => 13,
            Self::Short40 => 10,
        }
    }

    #[must_use]
    pub const fn size(self) -> usize {
        self.max_rank() as usize * Suit::ALL.len()
    }
}

impl fmt::Display for DeckVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckVariant::Standard52 => write!(f, "52"),
            DeckVariant::Short40 => write!(f, "40"),
        }
    }
}

/// One of each (rank, suit) pair for the variant, in suit-major order.
#[must_use]
pub fn build_deck(variant: DeckVariant) -> Vec<Card> {
    let mut cards = Vec::with_capacity(variant.size());
    for suit in Suit::ALL {
        for value in 1..=variant.max_rank() {
            cards.push(Card(value, suit));
        }
    }
    cards
}

/// Uniform Fisher-Yates permutation of `cards`. The input is left untouched.
#[must_use]
pub fn shuffled<R: Rng + ?Sized>(cards: &[Card], rng: &mut R) -> Vec<Card> {
    let mut out = cards.to_vec();
    out.shuffle(rng);
    out
}

/// Undealt cards of a round. Cards are drawn from the front.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// A freshly shuffled deck of `variant`.
    pub fn shuffled<R: Rng + ?Sized>(variant: DeckVariant, rng: &mut R) -> Self {
        Self {
            cards: shuffled(&build_deck(variant), rng),
        }
    }

    #[must_use]
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Draw up to `n` cards; fewer if the deck runs out.
    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        let n = n.min(self.cards.len());
        self.cards.drain(..n).collect()
    }
}
