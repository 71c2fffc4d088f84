/// Property-based tests for the match controller and scoring using proptest
///
/// Random games are driven by picking among every syntactically possible
/// action for the seat to act, legal or not. After each step the invariants
/// of the engine must still hold.
use proptest::prelude::*;
use tableen::game::{
    Action, Card, DeckVariant, GameSettings, MatchState, PlayedCard, RuleError, Seat,
    UnclaimedTablePolicy, cards::build_deck, score,
};

fn candidates(state: &MatchState, seat: Seat) -> Vec<Action> {
    let round = state.round();
    let table = round.table.stacks();
    let mut out = Vec::new();

    for &card in round.hands[seat].cards() {
        let mut plays = vec![PlayedCard::from(card)];
        if card.is_ace() {
            plays.push(PlayedCard::new(14, card.suit()));
        }
        for played in plays {
            out.push(Action::Normal { played_card: played });
            for stack in table {
                for stack_as_sum in [false, true] {
                    out.push(Action::Stack {
                        stack_id: stack.id.clone(),
                        played_card: played,
                        stack_as_sum,
                    });
                }
                out.push(Action::Grab {
                    stack_id: stack.id.clone(),
                    played_card: Some(played),
                });
            }
        }
    }
    for from in table {
        for to in table {
            for stack_as_sum in [false, true] {
                out.push(Action::Boardstack {
                    from: from.id.clone(),
                    to: to.id.clone(),
                    stack_as_sum,
                });
            }
        }
    }
    out
}

fn settings_strategy() -> impl Strategy<Value = GameSettings> {
    (
        prop_oneof![Just(DeckVariant::Standard52), Just(DeckVariant::Short40)],
        4usize..=5,
        prop_oneof![
            Just(UnclaimedTablePolicy::LeaveOnTable),
            Just(UnclaimedTablePolicy::AwardToNonStarter)
        ],
    )
        .prop_map(|(deck, hand_size, policy)| {
            let mut settings = GameSettings::new(deck, hand_size, 21);
            settings.unclaimed_table = policy;
            settings
        })
}

fn check_invariants(state: &MatchState) -> Result<(), TestCaseError> {
    let round = state.round();
    prop_assert_eq!(round.card_count(), state.settings().deck.size());
    for stack in round.table.stacks() {
        prop_assert!(
            (1..=14).contains(&stack.stack_number),
            "stack {} declares {}",
            stack.id,
            stack.stack_number
        );
    }
    if state.phase().is_in_progress() {
        prop_assert!(!round.hands[state.current_turn()].is_empty());
    }
    Ok(())
}

proptest! {
    #[test]
    fn test_random_play_keeps_invariants(
        settings in settings_strategy(),
        seed in any::<u64>(),
        choices in prop::collection::vec(any::<prop::sample::Index>(), 1..300),
    ) {
        let mut state = MatchState::new(settings, seed).unwrap();
        check_invariants(&state)?;

        for choice in choices {
            if state.is_over() {
                break;
            }
            let seat = state.current_turn();
            let options = candidates(&state, seat);
            let action = choice.get(&options);

            let before = state.clone();
            match state.submit(seat, action) {
                Ok(_) => check_invariants(&state)?,
                Err(_) => prop_assert_eq!(&state, &before),
            }
        }
    }

    #[test]
    fn test_waiting_seat_is_always_refused(
        seed in any::<u64>(),
        choices in prop::collection::vec(any::<prop::sample::Index>(), 1..100),
    ) {
        let mut state = MatchState::new(GameSettings::default(), seed).unwrap();

        for choice in choices {
            if state.is_over() {
                break;
            }
            let waiting = state.current_turn().other();
            let before = state.clone();
            for action in candidates(&state, waiting) {
                prop_assert_eq!(state.submit(waiting, &action), Err(RuleError::NotYourTurn));
            }
            prop_assert_eq!(&state, &before);

            let seat = state.current_turn();
            let options = candidates(&state, seat);
            let _ = state.submit(seat, choice.get(&options));
        }
    }

    #[test]
    fn test_scoring_depends_only_on_membership(
        deck in Just(build_deck(DeckVariant::Standard52)).prop_shuffle(),
        split in 0usize..=52,
        rotate in 0usize..52,
    ) {
        let (a, b) = deck.split_at(split);
        let first = score(a, b);
        prop_assert_eq!(first, score(a, b));

        let mut rotated: Vec<Card> = a.to_vec();
        if !rotated.is_empty() {
            let by = rotate % rotated.len();
            rotated.rotate_left(by);
        }
        prop_assert_eq!(first, score(&rotated, b));

        let swapped = score(b, a);
        prop_assert_eq!(first.a, swapped.b);
        prop_assert_eq!(first.b, swapped.a);

        // 3 for cards, 4 aces, 1 for the two, 2 for the ten, 1 for spades.
        prop_assert!(first.a.total() + first.b.total() <= 11);
    }
}

/// Grab whenever the rules allow it, otherwise lay a card.
fn greedy_action(state: &MatchState, seat: Seat) -> Action {
    let options = candidates(state, seat);
    options
        .iter()
        .filter(|a| matches!(a, Action::Grab { .. }))
        .find(|a| tableen::game::apply_action(state.round(), a, seat).is_ok())
        .or_else(|| options.iter().find(|a| matches!(a, Action::Normal { .. })))
        .cloned()
        .unwrap()
}

#[test]
fn test_greedy_match_finishes() {
    let mut state = MatchState::new(GameSettings::default(), 2024).unwrap();
    for _ in 0..10_000 {
        if state.is_over() {
            break;
        }
        let seat = state.current_turn();
        let action = greedy_action(&state, seat);
        state.submit(seat, &action).unwrap();
    }

    assert!(state.is_over());
    let history = state.history();
    assert!(!history.is_empty());
    let last = history.last().unwrap();
    assert_eq!(last.points, state.points());
    assert!(last.points.a >= 21 || last.points.b >= 21);
    for (i, summary) in history.iter().enumerate() {
        assert_eq!(summary.round as usize, i + 1);
        let expected = if i % 2 == 0 { Seat::A } else { Seat::B };
        assert_eq!(summary.starter, expected);
    }
}
