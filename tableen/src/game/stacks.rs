use serde::{Deserialize, Serialize};
use std::fmt;

use super::cards::{Card, Value};
use super::errors::RuleError;

/// Table-unique stack identifier. Allocated monotonically per round and
/// never reused, even after the stack leaves the table.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct StackId(String);

impl StackId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for StackId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for StackId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A group of cards on the table with a declared value.
///
/// `stack_number` is either the shared face value of a pile or the declared
/// sum of a sum-stack; it is not necessarily the sum of `cards`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stack {
    pub id: StackId,
    pub cards: Vec<Card>,
    pub stack_number: Value,
}

impl Stack {
    /// Plain sum of the card ranks.
    #[must_use]
    pub fn card_sum(&self) -> u32 {
        card_sum(&self.cards)
    }

    #[must_use]
    pub fn is_single_ace(&self) -> bool {
        matches!(self.cards.as_slice(), [card] if card.is_ace())
    }
}

pub(crate) fn card_sum(cards: &[Card]) -> u32 {
    cards.iter().map(|c| u32::from(c.rank())).sum()
}

/// The stacks currently on the table plus the id allocator for the round.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct StackLedger {
    stacks: Vec<Stack>,
    next_id: u64,
}

impl Default for StackLedger {
    fn default() -> Self {
        Self {
            stacks: Vec::new(),
            next_id: 1,
        }
    }
}

impl StackLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a table from existing stacks. Allocation resumes after the
    /// highest numeric id present.
    #[must_use]
    pub fn from_stacks(stacks: Vec<Stack>) -> Self {
        let next_id = stacks
            .iter()
            .filter_map(|s| s.id.as_str().parse::<u64>().ok())
            .max()
            .map_or(1, |max| max + 1);
        Self { stacks, next_id }
    }

    pub fn allocate_id(&mut self) -> StackId {
        let id = StackId(self.next_id.to_string());
        self.next_id += 1;
        id
    }

    /// Put `card` on the table as a new single-card pile.
    pub fn push_single(&mut self, card: Card) -> StackId {
        let id = self.allocate_id();
        self.stacks.push(Stack {
            id: id.clone(),
            cards: vec![card],
            stack_number: card.rank(),
        });
        id
    }

    #[must_use]
    pub fn stacks(&self) -> &[Stack] {
        &self.stacks
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    #[must_use]
    pub fn card_count(&self) -> usize {
        self.stacks.iter().map(|s| s.cards.len()).sum()
    }

    pub fn find(&self, id: &StackId) -> Result<&Stack, RuleError> {
        self.stacks
            .iter()
            .find(|s| &s.id == id)
            .ok_or(RuleError::StackNotFound)
    }

    pub(crate) fn find_mut(&mut self, id: &StackId) -> Result<&mut Stack, RuleError> {
        self.stacks
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or(RuleError::StackNotFound)
    }

    pub(crate) fn remove(&mut self, id: &StackId) -> Result<Stack, RuleError> {
        let idx = self
            .stacks
            .iter()
            .position(|s| &s.id == id)
            .ok_or(RuleError::StackNotFound)?;
        Ok(self.stacks.remove(idx))
    }

    /// Move the cards of `from` onto the end of `to`, remove `from` and give
    /// `to` the declared value.
    pub(crate) fn merge_into(
        &mut self,
        from: &StackId,
        to: &StackId,
        stack_number: Value,
    ) -> Result<(), RuleError> {
        let absorbed = self.remove(from)?;
        let target = self.find_mut(to)?;
        target.cards.extend(absorbed.cards);
        target.stack_number = stack_number;
        Ok(())
    }

    /// Fold every other stack declaring the same value as `keep` into it.
    /// Returns how many stacks were absorbed.
    pub(crate) fn absorb_equal(&mut self, keep: &StackId) -> Result<usize, RuleError> {
        let value = self.find(keep)?.stack_number;
        let (absorbed, rest): (Vec<Stack>, Vec<Stack>) = self
            .stacks
            .drain(..)
            .partition(|s| &s.id != keep && s.stack_number == value);
        self.stacks = rest;

        let count = absorbed.len();
        let target = self.find_mut(keep)?;
        target.cards.extend(absorbed.into_iter().flat_map(|s| s.cards));
        Ok(count)
    }

    /// Remove every stack, returning their cards in table order.
    pub(crate) fn sweep(&mut self) -> Vec<Card> {
        self.stacks.drain(..).flat_map(|s| s.cards).collect()
    }
}
