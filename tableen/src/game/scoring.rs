use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::{
    cards::{Card, Suit},
    seat::{PerSeat, Seat},
};

pub const MOST_CARDS_POINTS: u32 = 3;
pub const ACE_POINTS: u32 = 1;
pub const TWO_OF_SPADES_POINTS: u32 = 1;
pub const TEN_OF_DIAMONDS_POINTS: u32 = 2;
pub const MOST_SPADES_POINTS: u32 = 1;

const TWO_OF_SPADES: Card = Card(2, Suit::Spade);
const TEN_OF_DIAMONDS: Card = Card(10, Suit::Diamond);

/// How one side earned its points for a round.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub most_cards: u32,
    pub aces: u32,
    pub two_of_spades: u32,
    pub ten_of_diamonds: u32,
    pub most_spades: u32,
}

impl ScoreBreakdown {
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.most_cards + self.aces + self.two_of_spades + self.ten_of_diamonds + self.most_spades
    }
}

pub type RoundPoints = PerSeat<ScoreBreakdown>;

/// Points for two collected piles. Only membership matters, never order.
#[must_use]
pub fn score(a: &[Card], b: &[Card]) -> RoundPoints {
    let piles = PerSeat::new(a, b);
    let mut points = RoundPoints::default();

    if let Some(seat) = strictly_more(a.len(), b.len()) {
        points[seat].most_cards = MOST_CARDS_POINTS;
    }

    let spades = piles.map(|pile| pile.iter().filter(|c| c.suit() == Suit::Spade).count());
    if let Some(seat) = strictly_more(spades.a, spades.b) {
        points[seat].most_spades = MOST_SPADES_POINTS;
    }

    for seat in Seat::BOTH {
        let pile = piles[seat];
        let aces = pile.iter().filter(|c| c.is_ace()).count();
        points[seat].aces = u32::try_from(aces).unwrap_or(u32::MAX) * ACE_POINTS;
        if pile.contains(&TWO_OF_SPADES) {
            points[seat].two_of_spades = TWO_OF_SPADES_POINTS;
        }
        if pile.contains(&TEN_OF_DIAMONDS) {
            points[seat].ten_of_diamonds = TEN_OF_DIAMONDS_POINTS;
        }
    }

    points
}

fn strictly_more(a: usize, b: usize) -> Option<Seat> {
    match a.cmp(&b) {
        Ordering::Greater => Some(Seat::A),
        Ordering::Less => Some(Seat::B),
        Ordering::Equal => None,
    }
}
