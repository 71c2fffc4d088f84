//! Scripted player that only sees its own public view.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use tableen::game::{Action, Card, PlayedCard, PublicView, Seat, Stack, cards::ranks_equivalent};

/// Chance of trying a sum stack before laying a card
const SUM_STACK_PROBABILITY: f64 = 0.6;

/// Plays by preference: grab a stack worth a held card, build a sum the bot
/// can claim later, otherwise lay a random card.
///
/// The bot does not know every rule. It proposes candidates in order and the
/// driver submits them until one is accepted, so some of its proposals are
/// expected to be rejected.
pub struct ScriptedBot {
    pub seat: Seat,
    rng: StdRng,
}

impl ScriptedBot {
    pub fn new(seat: Seat, seed: u64) -> Self {
        Self {
            seat,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Candidate actions for the bot's turn, most preferred first.
    ///
    /// The list always ends with a plain play of every held card, so at least
    /// one candidate is legal whenever the bot holds a card.
    pub fn candidates(&mut self, view: &PublicView) -> Vec<Action> {
        let hand = &view.own_hand;
        let mut grabs = Vec::new();
        let mut sums = Vec::new();

        for stack in &view.table {
            for &card in hand {
                if let Some(played) = grabbing_card(stack, card) {
                    let action = Action::Grab {
                        stack_id: stack.id.clone(),
                        played_card: Some(played),
                    };
                    grabs.push((stack.cards.len(), action));
                }
                if claimable_sum(stack, card, hand) {
                    sums.push(Action::Stack {
                        stack_id: stack.id.clone(),
                        played_card: card.into(),
                        stack_as_sum: true,
                    });
                }
            }
        }

        // Bigger grabs first.
        grabs.sort_by_key(|(size, _)| std::cmp::Reverse(*size));
        sums.shuffle(&mut self.rng);

        let mut plays: Vec<Action> = hand
            .iter()
            .map(|&card| Action::Normal {
                played_card: card.into(),
            })
            .collect();
        plays.shuffle(&mut self.rng);

        let mut out: Vec<Action> = grabs.into_iter().map(|(_, action)| action).collect();
        if self.rng.random_bool(SUM_STACK_PROBABILITY) {
            out.extend(sums);
        }
        out.extend(plays);
        out
    }
}

/// The card to grab `stack` with, if `card` is worth the stack's value.
fn grabbing_card(stack: &Stack, card: Card) -> Option<PlayedCard> {
    if !ranks_equivalent(card.rank(), stack.stack_number) {
        return None;
    }
    // A low ace may always take an ace; the high ace only a fourteen.
    let played = if card.is_ace() && stack.stack_number == 14 && !stack.is_single_ace() {
        PlayedCard::new(14, card.suit())
    } else {
        card.into()
    };
    Some(played)
}

/// Whether adding `card` to `stack` as a sum gives a value another held card
/// can claim.
fn claimable_sum(stack: &Stack, card: Card, hand: &[Card]) -> bool {
    let sum = stack.card_sum() + u32::from(card.rank());
    let Ok(sum) = u8::try_from(sum) else {
        return false;
    };
    sum <= 14
        && hand
            .iter()
            .any(|&other| other != card && ranks_equivalent(other.rank(), sum))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tableen::game::{GameSettings, MatchState, StackId, Suit};

    fn view_with(hand: Vec<Card>, table: Vec<Stack>) -> PublicView {
        let state = MatchState::new(GameSettings::default(), 3).unwrap();
        let mut view = state.public_view(Seat::A);
        view.own_hand = hand;
        view.table = table;
        view
    }

    #[test]
    fn test_prefers_matching_grab() {
        let mut bot = ScriptedBot::new(Seat::A, 1);
        let view = view_with(
            vec![Card(9, Suit::Heart), Card(4, Suit::Club)],
            vec![Stack {
                id: StackId::from("3"),
                cards: vec![Card(9, Suit::Spade)],
                stack_number: 9,
            }],
        );
        let candidates = bot.candidates(&view);
        assert_eq!(
            candidates[0],
            Action::Grab {
                stack_id: StackId::from("3"),
                played_card: Some(PlayedCard::new(9, Suit::Heart)),
            }
        );
    }

    #[test]
    fn test_always_offers_every_plain_play() {
        let mut bot = ScriptedBot::new(Seat::A, 2);
        let hand = vec![Card(2, Suit::Heart), Card(5, Suit::Club), Card(13, Suit::Spade)];
        let view = view_with(hand.clone(), vec![]);
        let candidates = bot.candidates(&view);
        for card in hand {
            assert!(candidates.contains(&Action::Normal {
                played_card: card.into()
            }));
        }
    }

    #[test]
    fn test_ace_grabs_fourteen_high() {
        let stack = Stack {
            id: StackId::from("1"),
            cards: vec![Card(6, Suit::Club), Card(8, Suit::Club)],
            stack_number: 14,
        };
        assert_eq!(
            grabbing_card(&stack, Card(1, Suit::Heart)),
            Some(PlayedCard::new(14, Suit::Heart))
        );
        assert_eq!(grabbing_card(&stack, Card(8, Suit::Heart)), None);
    }

    #[test]
    fn test_sum_needs_a_second_card() {
        let stack = Stack {
            id: StackId::from("1"),
            cards: vec![Card(3, Suit::Club)],
            stack_number: 3,
        };
        assert!(claimable_sum(
            &stack,
            Card(4, Suit::Heart),
            &[Card(4, Suit::Heart), Card(7, Suit::Spade)]
        ));
        assert!(!claimable_sum(&stack, Card(4, Suit::Heart), &[Card(4, Suit::Heart)]));
    }
}
