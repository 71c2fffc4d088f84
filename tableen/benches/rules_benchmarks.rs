use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tableen::game::{
    Action, Card, DeckVariant, Deck, GameSettings, Hand, MatchState, PerSeat, PlayedCard,
    RoundState, Seat, Stack, StackId, StackLedger, Suit, apply_action, cards::build_deck, score,
};

/// A table of `n` single-card stacks and a hand that can sum onto them
fn setup_round(n_stacks: usize) -> RoundState {
    let stacks = (0..n_stacks)
        .map(|i| {
            let rank = (i % 6 + 2) as u8;
            Stack {
                id: StackId::from((i + 1).to_string()),
                cards: vec![Card(rank, Suit::Club)],
                stack_number: rank,
            }
        })
        .collect();
    RoundState {
        deck: Deck::default(),
        table: StackLedger::from_stacks(stacks),
        hands: PerSeat::new(
            Hand::new(vec![
                Card(3, Suit::Heart),
                Card(5, Suit::Heart),
                Card(6, Suit::Spade),
                Card(1, Suit::Diamond),
            ]),
            Hand::new(vec![Card(9, Suit::Heart)]),
        ),
        collected: PerSeat::default(),
        last_grabber: None,
        tableens: PerSeat::default(),
    }
}

/// Benchmark a fallback stack that absorbs equal stacks, by table size
fn bench_apply_stack(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_stack");

    for n_stacks in [4, 8, 16].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_stacks", n_stacks)),
            n_stacks,
            |b, &n| {
                let round = setup_round(n);
                let action = Action::Stack {
                    stack_id: StackId::from("1"),
                    played_card: PlayedCard::new(3, Suit::Heart),
                    stack_as_sum: false,
                };
                b.iter(|| apply_action(black_box(&round), &action, Seat::A));
            },
        );
    }

    group.finish();
}

/// Benchmark a rejected action (staging cost without commit)
fn bench_apply_rejected(c: &mut Criterion) {
    let round = setup_round(8);
    let action = Action::Boardstack {
        from: StackId::from("1"),
        to: StackId::from("1"),
        stack_as_sum: false,
    };

    c.bench_function("apply_rejected_boardstack", |b| {
        b.iter(|| apply_action(black_box(&round), &action, Seat::A));
    });
}

/// Benchmark scoring a full deck split between the two sides
fn bench_score(c: &mut Criterion) {
    let deck = build_deck(DeckVariant::Standard52);
    let (a, b) = deck.split_at(27);

    c.bench_function("score_full_deck", |bench| {
        bench.iter(|| score(black_box(a), black_box(b)));
    });
}

/// Benchmark dealing a fresh match
fn bench_new_match(c: &mut Criterion) {
    c.bench_function("new_match", |b| {
        b.iter(|| MatchState::new(GameSettings::default(), black_box(42)));
    });
}

criterion_group!(
    rules,
    bench_apply_stack,
    bench_apply_rejected,
    bench_score,
    bench_new_match,
);

criterion_main!(rules);
