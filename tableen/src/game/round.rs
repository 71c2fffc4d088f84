use serde::{Deserialize, Serialize};

use super::{
    cards::{Card, Deck, PlayedCard, Value, ranks_equivalent},
    errors::RuleError,
    seat::{PerSeat, Seat},
    settings::{GameSettings, UnclaimedTablePolicy},
    stacks::StackLedger,
};

/// Cards a seat holds. Only ever shrinks between deals.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Hand(Vec<Card>);

impl Hand {
    #[must_use]
    pub fn new(cards: Vec<Card>) -> Self {
        Self(cards)
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn position(&self, played: &PlayedCard) -> Option<usize> {
        self.0.iter().position(|c| c.matches(played))
    }

    /// Remove the held card `played` refers to.
    pub fn take(&mut self, played: &PlayedCard) -> Result<Card, RuleError> {
        let idx = self.position(played).ok_or(RuleError::CardNotInHand)?;
        Ok(self.0.remove(idx))
    }

    /// Whether a card other than `played` could later claim a stack worth `value`.
    #[must_use]
    pub fn holds_value_besides(&self, value: u32, played: &PlayedCard) -> bool {
        let Ok(value) = Value::try_from(value) else {
            return false;
        };
        self.0
            .iter()
            .any(|c| !c.matches(played) && ranks_equivalent(c.rank(), value))
    }

    pub(crate) fn extend(&mut self, cards: Vec<Card>) {
        self.0.extend(cards);
    }
}

/// Everything that changes card by card within a round.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RoundState {
    pub deck: Deck,
    pub table: StackLedger,
    pub hands: PerSeat<Hand>,
    pub collected: PerSeat<Vec<Card>>,
    /// Seat that most recently grabbed a stack this round.
    pub last_grabber: Option<Seat>,
    /// Times each seat emptied the table this round.
    pub tableens: PerSeat<u32>,
}

impl RoundState {
    /// Deal hands from the front of `deck`, then lay the table cards as
    /// single-card stacks.
    #[must_use]
    pub fn deal(mut deck: Deck, settings: &GameSettings) -> Self {
        let a = deck.draw_n(settings.hand_size);
        let b = deck.draw_n(settings.hand_size);
        let mut table = StackLedger::new();
        for card in deck.draw_n(settings.table_size) {
            table.push_single(card);
        }
        Self {
            deck,
            table,
            hands: PerSeat::new(Hand::new(a), Hand::new(b)),
            collected: PerSeat::default(),
            last_grabber: None,
            tableens: PerSeat::default(),
        }
    }

    #[must_use]
    pub fn hands_empty(&self) -> bool {
        self.hands.a.is_empty() && self.hands.b.is_empty()
    }

    /// Deal another hand to each seat if the deck still covers both.
    /// The table is left alone. Returns whether cards were dealt.
    pub fn refill(&mut self, settings: &GameSettings) -> bool {
        if self.deck.len() < settings.refill_threshold() {
            return false;
        }
        for seat in Seat::BOTH {
            let cards = self.deck.draw_n(settings.hand_size);
            self.hands[seat].extend(cards);
        }
        true
    }

    /// Move whatever is left on the table at round end. Returns the seat that
    /// received the cards, if any.
    pub fn sweep_remainder(
        &mut self,
        policy: UnclaimedTablePolicy,
        starter: Seat,
    ) -> Option<Seat> {
        if self.table.is_empty() {
            return None;
        }
        let recipient = match (self.last_grabber, policy) {
            (Some(seat), _) => seat,
            (None, UnclaimedTablePolicy::AwardToNonStarter) => starter.other(),
            (None, UnclaimedTablePolicy::LeaveOnTable) => return None,
        };
        let cards = self.table.sweep();
        self.collected[recipient].extend(cards);
        Some(recipient)
    }

    /// Cards accounted for anywhere in the round.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.deck.len()
            + self.table.card_count()
            + Seat::BOTH
                .iter()
                .map(|&s| self.hands[s].len() + self.collected[s].len())
                .sum::<usize>()
    }
}
