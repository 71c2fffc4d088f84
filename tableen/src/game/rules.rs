//! Validation and application of a single action against a round.
//!
//! [`apply_action`] never touches the round it is given: it stages every
//! change on a copy and hands the copy back only when the whole action is
//! legal. A rejected action therefore leaves no trace.

use super::{
    actions::{Action, ActionKind},
    cards::{MAX_STACK_VALUE, PlayedCard, Value, ranks_equivalent},
    errors::RuleError,
    round::RoundState,
    seat::Seat,
    stacks::StackId,
};

/// The staged round after a legal action.
#[derive(Clone, Debug)]
pub struct Applied {
    pub round: RoundState,
    pub kind: ActionKind,
    /// The action took the last stack off the table.
    pub cleared_table: bool,
}

/// Validate `action` by `seat` against `round` and return the resulting round.
///
/// Turn order is not checked here; that belongs to the match controller.
pub fn apply_action(round: &RoundState, action: &Action, seat: Seat) -> Result<Applied, RuleError> {
    let mut next = round.clone();
    let kind = action.kind();
    let cleared_table = match action {
        Action::Normal { played_card } => {
            play_normal(&mut next, seat, played_card)?;
            false
        }
        Action::Stack {
            stack_id,
            played_card,
            stack_as_sum,
        } => {
            play_stack(&mut next, seat, stack_id, played_card, *stack_as_sum)?;
            false
        }
        Action::Grab {
            stack_id,
            played_card,
        } => grab(&mut next, seat, stack_id, played_card.as_ref())?,
        Action::Boardstack {
            from,
            to,
            stack_as_sum,
        } => {
            boardstack(&mut next, from, to, *stack_as_sum)?;
            false
        }
    };

    log::debug!("seat {seat} applied {action}");
    Ok(Applied {
        round: next,
        kind,
        cleared_table,
    })
}

fn bounded(sum: u32) -> Result<Value, RuleError> {
    Value::try_from(sum)
        .ok()
        .filter(|v| *v <= MAX_STACK_VALUE)
        .ok_or(RuleError::SumExceeds14)
}

fn play_normal(round: &mut RoundState, seat: Seat, played: &PlayedCard) -> Result<(), RuleError> {
    let card = round.hands[seat].take(played)?;
    round.table.push_single(card);
    Ok(())
}

/// How a stack action changes the target's declared value.
enum StackPlan {
    /// Same value as the stack: add to the pile.
    Pile,
    /// New declared sum. `absorb` folds in other stacks of the same value.
    Sum { value: Value, absorb: bool },
}

fn play_stack(
    round: &mut RoundState,
    seat: Seat,
    stack_id: &StackId,
    played: &PlayedCard,
    as_sum: bool,
) -> Result<(), RuleError> {
    let target = round.table.find(stack_id)?;
    let hand = &round.hands[seat];
    if hand.position(played).is_none() {
        return Err(RuleError::CardNotInHand);
    }

    let existing = target.card_sum();
    let plan = if as_sum {
        let value = bounded(existing + u32::from(played.card().rank()))?;
        StackPlan::Sum {
            value,
            absorb: false,
        }
    } else if ranks_equivalent(played.card, target.stack_number) {
        StackPlan::Pile
    } else {
        // Raw submitted rank: an ace played high counts 14 here.
        let value = bounded(existing + u32::from(played.card))?;
        StackPlan::Sum {
            value,
            absorb: true,
        }
    };

    if let StackPlan::Sum { value, .. } = plan
        && !hand.holds_value_besides(u32::from(value), played)
    {
        return Err(RuleError::MissingSumCard);
    }

    let card = round.hands[seat].take(played)?;
    let target = round.table.find_mut(stack_id)?;
    target.cards.push(card);
    if let StackPlan::Sum { value, absorb } = plan {
        target.stack_number = value;
        if absorb {
            let absorbed = round.table.absorb_equal(stack_id)?;
            if absorbed > 0 {
                log::debug!("stack #{stack_id} absorbed {absorbed} stack(s) worth {value}");
            }
        }
    }
    Ok(())
}

fn grab(
    round: &mut RoundState,
    seat: Seat,
    stack_id: &StackId,
    played: Option<&PlayedCard>,
) -> Result<bool, RuleError> {
    let target = round.table.find(stack_id)?;
    if let Some(played) = played {
        if target.is_single_ace() && played.is_ace_high() {
            return Err(RuleError::AceAceConflict);
        }
        if round.hands[seat].position(played).is_none() {
            return Err(RuleError::CardNotInHand);
        }
    }

    let taken = round.table.remove(stack_id)?;
    if let Some(played) = played {
        let card = round.hands[seat].take(played)?;
        round.collected[seat].push(card);
    }
    round.collected[seat].extend(taken.cards);
    round.last_grabber = Some(seat);

    let cleared = round.table.is_empty();
    if cleared {
        round.tableens[seat] += 1;
    }
    Ok(cleared)
}

fn boardstack(
    round: &mut RoundState,
    from: &StackId,
    to: &StackId,
    as_sum: bool,
) -> Result<(), RuleError> {
    let from_stack = round.table.find(from)?;
    let to_stack = round.table.find(to)?;
    if from == to {
        return Err(RuleError::SameStack);
    }

    let from_sum = from_stack.card_sum();
    let to_sum = to_stack.card_sum();
    let total = from_sum + to_sum;

    let value = if as_sum {
        bounded(total)?
    } else if from_stack.stack_number == to_stack.stack_number {
        // Declared values must be identical; an ace pile is not a fourteen.
        to_stack.stack_number
    } else if from_sum == to_sum && from_sum <= u32::from(MAX_STACK_VALUE) {
        bounded(to_sum)?
    } else {
        bounded(total)?
    };

    round.table.merge_into(from, to, value)
}
