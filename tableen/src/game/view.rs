use serde::{Deserialize, Serialize};

use super::{
    cards::Card,
    seat::{PerSeat, Seat},
    stacks::Stack,
    state::{MatchPhase, MatchState},
};

/// What one seat is allowed to see of a match.
///
/// The opponent's hand is reduced to a card count; collected piles are
/// reduced to their sizes.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicView {
    pub seat: Seat,
    pub own_hand: Vec<Card>,
    pub table: Vec<Stack>,
    pub opponent_card_count: usize,
    pub current_turn: Seat,
    pub points: PerSeat<u32>,
    pub collected_counts: PerSeat<usize>,
    pub tableens: PerSeat<u32>,
    pub round: u32,
    pub deck_remaining: usize,
    pub phase: MatchPhase,
}

impl PublicView {
    #[must_use]
    pub fn of(state: &MatchState, seat: Seat) -> Self {
        let round = state.round();
        Self {
            seat,
            own_hand: round.hands[seat].cards().to_vec(),
            table: round.table.stacks().to_vec(),
            opponent_card_count: round.hands[seat.other()].len(),
            current_turn: state.current_turn(),
            points: state.points(),
            collected_counts: round.collected.map(Vec::len),
            tableens: round.tableens,
            round: state.round_number(),
            deck_remaining: round.deck.len(),
            phase: state.phase().clone(),
        }
    }

    #[must_use]
    pub fn is_my_turn(&self) -> bool {
        self.phase.is_in_progress() && self.current_turn == self.seat
    }
}
