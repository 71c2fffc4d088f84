//! Round and match controller.
//!
//! [`MatchState`] owns one match from the first deal to the final score. It
//! enforces turn order, hands actions to [`apply_action`], refills hands,
//! ends rounds, scores them and decides when the match is over. Every call
//! that changes state returns the events it produced in order.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    actions::{Action, ActionRecord},
    errors::RuleError,
    round::RoundState,
    rules::apply_action,
    scoring::{RoundPoints, score},
    seat::{PerSeat, Seat},
    seed::round_deck,
    settings::{GameSettings, SettingsError},
    stacks::Stack,
    view::PublicView,
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    Winner(Seat),
    Draw,
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Winner(seat) => write!(f, "seat {seat} wins"),
            Self::Draw => write!(f, "draw"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    InProgress,
    Finished(MatchOutcome),
    Terminated { reason: String },
}

impl MatchPhase {
    #[must_use]
    pub const fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }
}

/// Result of one finished round.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSummary {
    pub round: u32,
    pub starter: Seat,
    pub breakdown: RoundPoints,
    pub tableens: PerSeat<u32>,
    /// Points earned this round, tableens included.
    pub round_points: PerSeat<u32>,
    /// Cumulative match points after this round.
    pub points: PerSeat<u32>,
    /// Who received the cards left on the table, if anyone.
    pub swept_to: Option<Seat>,
    /// Cards that stayed on the table unscored.
    pub left_on_table: usize,
}

/// Events that occur during a match
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GameEvent {
    TurnChanged { seat: Seat },
    TableUpdated { table: Vec<Stack> },
    HandsDealt { round: u32, deck_remaining: usize },
    RoundOver { summary: RoundSummary },
    MatchOver { outcome: MatchOutcome },
    ActionRejected { reason: RuleError },
    MatchTerminated { reason: String },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::TurnChanged { seat } => format!("seat {seat} to act"),
            Self::TableUpdated { table } => format!("table has {} stack(s)", table.len()),
            Self::HandsDealt {
                round,
                deck_remaining,
            } => format!("round {round}: hands dealt, {deck_remaining} left in deck"),
            Self::RoundOver { summary } => format!(
                "round {} over: A {} B {}",
                summary.round, summary.points.a, summary.points.b
            ),
            Self::MatchOver { outcome } => format!("match over, {outcome}"),
            Self::ActionRejected { reason } => format!("action rejected: {reason}"),
            Self::MatchTerminated { reason } => format!("match terminated: {reason}"),
        };
        write!(f, "{repr}")
    }
}

/// A whole match: settings, the round in play and everything scored so far.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MatchState {
    settings: GameSettings,
    seed: u64,
    round_number: u32,
    starter: Seat,
    current: Seat,
    round: RoundState,
    points: PerSeat<u32>,
    /// Tableens over all finished rounds.
    tableens: PerSeat<u32>,
    phase: MatchPhase,
    history: Vec<RoundSummary>,
}

impl MatchState {
    /// Start a match and deal its first round. Seat A starts.
    pub fn new(settings: GameSettings, seed: u64) -> Result<Self, SettingsError> {
        settings.validate()?;
        let round = RoundState::deal(round_deck(settings.deck, seed, 1), &settings);
        Ok(Self {
            settings,
            seed,
            round_number: 1,
            starter: Seat::A,
            current: Seat::A,
            round,
            points: PerSeat::default(),
            tableens: PerSeat::default(),
            phase: MatchPhase::InProgress,
            history: Vec::new(),
        })
    }

    #[must_use]
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn round_number(&self) -> u32 {
        self.round_number
    }

    #[must_use]
    pub const fn starter(&self) -> Seat {
        self.starter
    }

    #[must_use]
    pub const fn current_turn(&self) -> Seat {
        self.current
    }

    #[must_use]
    pub fn round(&self) -> &RoundState {
        &self.round
    }

    #[must_use]
    pub const fn points(&self) -> PerSeat<u32> {
        self.points
    }

    #[must_use]
    pub const fn tableens(&self) -> PerSeat<u32> {
        self.tableens
    }

    #[must_use]
    pub fn phase(&self) -> &MatchPhase {
        &self.phase
    }

    #[must_use]
    pub fn history(&self) -> &[RoundSummary] {
        &self.history
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        !self.phase.is_in_progress()
    }

    #[must_use]
    pub fn public_view(&self, seat: Seat) -> PublicView {
        PublicView::of(self, seat)
    }

    fn ensure_turn(&self, seat: Seat) -> Result<(), RuleError> {
        if !self.phase.is_in_progress() {
            return Err(RuleError::MatchOver);
        }
        if seat != self.current {
            return Err(RuleError::NotYourTurn);
        }
        Ok(())
    }

    /// Play a loose wire record for `seat`.
    ///
    /// Turn order is checked before anything in the record, then the
    /// referenced stack, then the record's shape.
    pub fn submit_record(
        &mut self,
        seat: Seat,
        record: ActionRecord,
    ) -> Result<Vec<GameEvent>, RuleError> {
        self.ensure_turn(seat)?;
        if matches!(record.kind.as_str(), "stack" | "grab")
            && let Some(stack_id) = &record.stack_id
        {
            self.round.table.find(stack_id)?;
        }
        let action = Action::try_from(record)?;
        self.submit(seat, &action)
    }

    /// Play `action` for `seat`. On error nothing changes.
    pub fn submit(&mut self, seat: Seat, action: &Action) -> Result<Vec<GameEvent>, RuleError> {
        self.ensure_turn(seat)?;

        let applied = apply_action(&self.round, action, seat)?;
        self.round = applied.round;

        let mut events = vec![GameEvent::TableUpdated {
            table: self.round.table.stacks().to_vec(),
        }];
        if applied.cleared_table {
            log::debug!("seat {seat} cleared the table in round {}", self.round_number);
        }
        if applied.kind.passes_turn() {
            self.pass_turn(seat, &mut events);
        }
        if self.round.hands_empty() {
            if self.round.refill(&self.settings) {
                events.push(GameEvent::HandsDealt {
                    round: self.round_number,
                    deck_remaining: self.round.deck.len(),
                });
            } else {
                self.finish_round(&mut events);
            }
        }
        Ok(events)
    }

    /// Stop the match for good. Later actions fail with [`RuleError::MatchOver`].
    pub fn terminate(&mut self, reason: impl Into<String>) -> GameEvent {
        let reason = reason.into();
        log::info!("match terminated in round {}: {reason}", self.round_number);
        self.phase = MatchPhase::Terminated {
            reason: reason.clone(),
        };
        GameEvent::MatchTerminated { reason }
    }

    /// The opponent acts next unless they are out of cards while the actor
    /// still holds some.
    fn pass_turn(&mut self, actor: Seat, events: &mut Vec<GameEvent>) {
        let opponent = actor.other();
        let next = if self.round.hands[opponent].is_empty() && !self.round.hands[actor].is_empty() {
            actor
        } else {
            opponent
        };
        if next != self.current {
            self.current = next;
            log::debug!("turn passes to seat {next}");
            events.push(GameEvent::TurnChanged { seat: next });
        }
    }

    fn finish_round(&mut self, events: &mut Vec<GameEvent>) {
        let left_before = self.round.table.card_count();
        let swept_to = self
            .round
            .sweep_remainder(self.settings.unclaimed_table, self.starter);
        let left_on_table = if swept_to.is_some() { 0 } else { left_before };

        let breakdown = score(&self.round.collected.a, &self.round.collected.b);
        let round_tableens = self.round.tableens;
        let round_points = PerSeat::new(
            breakdown.a.total() + round_tableens.a,
            breakdown.b.total() + round_tableens.b,
        );
        for seat in Seat::BOTH {
            self.points[seat] += round_points[seat];
            self.tableens[seat] += round_tableens[seat];
        }

        let summary = RoundSummary {
            round: self.round_number,
            starter: self.starter,
            breakdown,
            tableens: round_tableens,
            round_points,
            points: self.points,
            swept_to,
            left_on_table,
        };
        log::info!(
            "round {} over: A +{} ({}), B +{} ({})",
            self.round_number,
            round_points.a,
            self.points.a,
            round_points.b,
            self.points.b
        );
        self.history.push(summary.clone());
        events.push(GameEvent::RoundOver { summary });

        if let Some(outcome) = self.outcome() {
            log::info!("match over after round {}: {outcome}", self.round_number);
            self.phase = MatchPhase::Finished(outcome);
            events.push(GameEvent::MatchOver { outcome });
        } else {
            self.start_round(events);
        }
    }

    fn outcome(&self) -> Option<MatchOutcome> {
        let cap = self.settings.score_cap;
        let PerSeat { a, b } = self.points;
        if a < cap && b < cap {
            return None;
        }
        Some(match a.cmp(&b) {
            std::cmp::Ordering::Greater => MatchOutcome::Winner(Seat::A),
            std::cmp::Ordering::Less => MatchOutcome::Winner(Seat::B),
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
        })
    }

    fn start_round(&mut self, events: &mut Vec<GameEvent>) {
        self.round_number += 1;
        self.starter = self.starter.other();
        self.current = self.starter;
        self.round = RoundState::deal(
            round_deck(self.settings.deck, self.seed, self.round_number),
            &self.settings,
        );
        events.push(GameEvent::HandsDealt {
            round: self.round_number,
            deck_remaining: self.round.deck.len(),
        });
        events.push(GameEvent::TurnChanged { seat: self.current });
        events.push(GameEvent::TableUpdated {
            table: self.round.table.stacks().to_vec(),
        });
    }

    /// Replace the round in play. Used to set up positions directly.
    #[doc(hidden)]
    pub fn with_round(mut self, round: RoundState, current: Seat) -> Self {
        self.round = round;
        self.current = current;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{
        cards::{Card, Deck, PlayedCard, Suit},
        round::Hand,
        stacks::{StackId, StackLedger},
    };

    fn fresh() -> MatchState {
        MatchState::new(GameSettings::default(), 1234).unwrap()
    }

    fn first_card(state: &MatchState, seat: Seat) -> PlayedCard {
        state.round().hands[seat].cards()[0].into()
    }

    #[test]
    fn test_new_match_deals_first_round() {
        let state = fresh();
        assert_eq!(state.round_number(), 1);
        assert_eq!(state.current_turn(), Seat::A);
        assert_eq!(state.round().card_count(), 52);
        assert!(state.phase().is_in_progress());
    }

    #[test]
    fn test_same_seed_same_deal() {
        assert_eq!(fresh(), fresh());
        let other = MatchState::new(GameSettings::default(), 4321).unwrap();
        assert_ne!(fresh().round(), other.round());
    }

    #[test]
    fn test_out_of_turn_is_rejected_without_change() {
        let mut state = fresh();
        let before = state.clone();
        let action = Action::Normal {
            played_card: first_card(&state, Seat::B),
        };
        assert_eq!(state.submit(Seat::B, &action).unwrap_err(), RuleError::NotYourTurn);
        assert_eq!(state, before);
    }

    #[test]
    fn test_normal_play_passes_turn() {
        let mut state = fresh();
        let action = Action::Normal {
            played_card: first_card(&state, Seat::A),
        };
        let events = state.submit(Seat::A, &action).unwrap();
        assert_eq!(state.current_turn(), Seat::B);
        assert!(events.contains(&GameEvent::TurnChanged { seat: Seat::B }));
        assert_eq!(state.round().table.len(), 5);
    }

    #[test]
    fn test_boardstack_keeps_turn() {
        let round = RoundState {
            deck: Deck::default(),
            table: StackLedger::from_stacks(vec![
                Stack {
                    id: StackId::from("1"),
                    cards: vec![Card(5, Suit::Club)],
                    stack_number: 5,
                },
                Stack {
                    id: StackId::from("2"),
                    cards: vec![Card(9, Suit::Diamond)],
                    stack_number: 9,
                },
            ]),
            hands: PerSeat::new(
                Hand::new(vec![Card(3, Suit::Heart)]),
                Hand::new(vec![Card(4, Suit::Heart)]),
            ),
            collected: PerSeat::default(),
            last_grabber: None,
            tableens: PerSeat::default(),
        };
        let mut state = fresh().with_round(round, Seat::A);
        let action = Action::Boardstack {
            from: StackId::from("1"),
            to: StackId::from("2"),
            stack_as_sum: false,
        };
        let events = state.submit(Seat::A, &action).unwrap();

        assert_eq!(state.current_turn(), Seat::A);
        assert_eq!(events.len(), 1);
        assert_eq!(state.round().table.len(), 1);
    }

    #[test]
    fn test_empty_opponent_is_skipped() {
        let round = RoundState {
            deck: Deck::default(),
            table: StackLedger::new(),
            hands: PerSeat::new(
                Hand::new(vec![Card(3, Suit::Heart), Card(4, Suit::Heart)]),
                Hand::default(),
            ),
            collected: PerSeat::default(),
            last_grabber: None,
            tableens: PerSeat::default(),
        };
        let mut state = fresh().with_round(round, Seat::A);
        let action = Action::Normal {
            played_card: PlayedCard::new(3, Suit::Heart),
        };
        state.submit(Seat::A, &action).unwrap();
        assert_eq!(state.current_turn(), Seat::A);
    }

    #[test]
    fn test_round_end_sweeps_to_last_grabber_and_scores() {
        let round = RoundState {
            deck: Deck::from_cards(vec![Card(2, Suit::Club); 6]),
            table: StackLedger::from_stacks(vec![Stack {
                id: StackId::from("4"),
                cards: vec![Card(10, Suit::Diamond)],
                stack_number: 10,
            }]),
            hands: PerSeat::new(Hand::new(vec![Card(2, Suit::Spade)]), Hand::default()),
            collected: PerSeat::new(vec![Card(1, Suit::Heart)], vec![]),
            last_grabber: Some(Seat::B),
            tableens: PerSeat::default(),
        };
        let mut state = fresh().with_round(round, Seat::A);
        let action = Action::Normal {
            played_card: PlayedCard::new(2, Suit::Spade),
        };
        let events = state.submit(Seat::A, &action).unwrap();

        let summary = &state.history()[0];
        assert_eq!(summary.swept_to, Some(Seat::B));
        // B: 10♦ and 2♠ swept in, plus most cards and most spades.
        assert_eq!(summary.round_points.b, 2 + 1 + 3 + 1);
        assert_eq!(summary.round_points.a, 1);
        assert!(events.iter().any(|e| matches!(e, GameEvent::RoundOver { .. })));

        assert_eq!(state.round_number(), 2);
        assert_eq!(state.starter(), Seat::B);
        assert_eq!(state.current_turn(), Seat::B);
        assert_eq!(state.round().card_count(), 52);
        assert!(state.round().collected.a.is_empty());
    }

    #[test]
    fn test_reaching_cap_ends_match() {
        let mut settings = GameSettings::default();
        settings.score_cap = 1;
        let round = RoundState {
            deck: Deck::default(),
            table: StackLedger::new(),
            hands: PerSeat::new(Hand::new(vec![Card(5, Suit::Heart)]), Hand::default()),
            collected: PerSeat::new(vec![Card(1, Suit::Club), Card(7, Suit::Club)], vec![]),
            last_grabber: Some(Seat::A),
            tableens: PerSeat::default(),
        };
        let mut state = MatchState::new(settings, 9).unwrap().with_round(round, Seat::A);
        let action = Action::Normal {
            played_card: PlayedCard::new(5, Suit::Heart),
        };
        let events = state.submit(Seat::A, &action).unwrap();

        let outcome = MatchOutcome::Winner(Seat::A);
        assert_eq!(state.phase(), &MatchPhase::Finished(outcome));
        assert_eq!(events.last(), Some(&GameEvent::MatchOver { outcome }));
        assert_eq!(state.submit(Seat::A, &action).unwrap_err(), RuleError::MatchOver);
    }

    #[test]
    fn test_tableens_count_toward_round_points() {
        let round = RoundState {
            deck: Deck::default(),
            table: StackLedger::new(),
            hands: PerSeat::new(Hand::new(vec![Card(5, Suit::Heart)]), Hand::default()),
            collected: PerSeat::new(vec![Card(7, Suit::Club)], vec![Card(7, Suit::Diamond)]),
            last_grabber: None,
            tableens: PerSeat::new(2, 0),
        };
        let mut state = fresh().with_round(round, Seat::A);
        let action = Action::Normal {
            played_card: PlayedCard::new(5, Suit::Heart),
        };
        state.submit(Seat::A, &action).unwrap();

        let summary = &state.history()[0];
        assert_eq!(summary.breakdown.a.total(), 0);
        assert_eq!(summary.tableens, PerSeat::new(2, 0));
        assert_eq!(summary.round_points, PerSeat::new(2, 0));
        assert_eq!(state.points(), PerSeat::new(2, 0));
        assert_eq!(state.tableens(), PerSeat::new(2, 0));
        assert_eq!(state.round().tableens, PerSeat::default());
    }

    #[test]
    fn test_equal_totals_at_cap_draw() {
        let mut settings = GameSettings::default();
        settings.score_cap = 1;
        let round = RoundState {
            deck: Deck::default(),
            table: StackLedger::new(),
            hands: PerSeat::new(Hand::new(vec![Card(5, Suit::Heart)]), Hand::default()),
            collected: PerSeat::new(vec![Card(1, Suit::Club)], vec![Card(1, Suit::Diamond)]),
            last_grabber: None,
            tableens: PerSeat::default(),
        };
        let mut state = MatchState::new(settings, 9).unwrap().with_round(round, Seat::A);
        let action = Action::Normal {
            played_card: PlayedCard::new(5, Suit::Heart),
        };
        let events = state.submit(Seat::A, &action).unwrap();

        assert_eq!(state.points(), PerSeat::new(1, 1));
        assert_eq!(state.phase(), &MatchPhase::Finished(MatchOutcome::Draw));
        assert_eq!(
            events.last(),
            Some(&GameEvent::MatchOver {
                outcome: MatchOutcome::Draw
            })
        );
    }

    #[test]
    fn test_record_checks_turn_first() {
        let mut state = fresh();
        let before = state.clone();
        let record = ActionRecord {
            kind: "fly".to_string(),
            ..Default::default()
        };
        assert_eq!(
            state.submit_record(Seat::B, record.clone()).unwrap_err(),
            RuleError::NotYourTurn
        );
        assert_eq!(
            state.submit_record(Seat::A, record).unwrap_err(),
            RuleError::UnknownActionType
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_record_resolves_stack_before_card() {
        let mut state = fresh();
        let record = ActionRecord {
            kind: "stack".to_string(),
            stack_id: Some(StackId::from("99")),
            ..Default::default()
        };
        assert_eq!(
            state.submit_record(Seat::A, record).unwrap_err(),
            RuleError::StackNotFound
        );

        let record = ActionRecord {
            kind: "stack".to_string(),
            stack_id: Some(state.round().table.stacks()[0].id.clone()),
            ..Default::default()
        };
        assert_eq!(
            state.submit_record(Seat::A, record).unwrap_err(),
            RuleError::NoCardPlayed
        );
    }

    #[test]
    fn test_terminate_blocks_further_actions() {
        let mut state = fresh();
        let event = state.terminate("seat B disconnected");
        assert_eq!(
            event,
            GameEvent::MatchTerminated {
                reason: "seat B disconnected".to_string()
            }
        );
        let action = Action::Normal {
            played_card: first_card(&state, Seat::A),
        };
        assert_eq!(state.submit(Seat::A, &action).unwrap_err(), RuleError::MatchOver);
    }
}
