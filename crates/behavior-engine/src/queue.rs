//! Per-pass candidate queue.

use crate::action::ActionNode;
use crate::event::Event;

/// A queued candidate.
#[derive(Debug, Clone)]
pub struct ActionBasket {
    node: ActionNode,
    relevance: f32,
    event: Event,
    prerequisite_rounds: u8,
}

impl ActionBasket {
    pub fn new(node: ActionNode, relevance: f32, event: Event) -> Self {
        Self {
            node,
            relevance,
            event,
            prerequisite_rounds: 0,
        }
    }

    /// Number of times this candidate already offered its prerequisites.
    pub fn with_prerequisite_rounds(mut self, rounds: u8) -> Self {
        self.prerequisite_rounds = rounds;
        self
    }

    pub fn node(&self) -> &ActionNode {
        &self.node
    }

    pub fn name(&self) -> &str {
        self.node.name().as_str()
    }

    pub fn relevance(&self) -> f32 {
        self.relevance
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn prerequisite_rounds(&self) -> u8 {
        self.prerequisite_rounds
    }

    pub fn into_parts(self) -> (ActionNode, f32, Event, u8) {
        (
            self.node,
            self.relevance,
            self.event,
            self.prerequisite_rounds,
        )
    }
}

/// Relevance-ordered candidate set, at most one basket per action name.
///
/// # Selection
///
/// [`pop`](Queue::pop) returns the basket with the highest relevance. Among
/// equal relevances the basket inserted first wins; a merge keeps the original
/// insertion position.
#[derive(Debug, Clone, Default)]
pub struct Queue {
    baskets: Vec<ActionBasket>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a basket or merges it into the existing one of the same name.
    ///
    /// On merge the existing basket keeps `max(existing, incoming)` relevance
    /// and its own node and event; the incoming basket is discarded.
    ///
    /// # Returns
    ///
    /// `true` if a new basket was inserted.
    pub fn push(&mut self, basket: ActionBasket) -> bool {
        match self
            .baskets
            .iter_mut()
            .find(|existing| existing.name() == basket.name())
        {
            Some(existing) => {
                if basket.relevance > existing.relevance {
                    existing.relevance = basket.relevance;
                }
                false
            }
            None => {
                self.baskets.push(basket);
                true
            }
        }
    }

    /// Removes and returns the most relevant basket.
    pub fn pop(&mut self) -> Option<ActionBasket> {
        let index = self.select()?;
        Some(self.baskets.remove(index))
    }

    pub fn peek(&self) -> Option<&ActionBasket> {
        self.select().map(|index| &self.baskets[index])
    }

    pub fn len(&self) -> usize {
        self.baskets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.baskets.is_empty()
    }

    pub fn clear(&mut self) {
        self.baskets.clear();
    }

    /// Baskets in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ActionBasket> {
        self.baskets.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.baskets.iter().any(|b| b.name() == name)
    }

    // Strict `>` keeps the earliest basket among equals.
    fn select(&self) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (index, basket) in self.baskets.iter().enumerate() {
            match best {
                Some((_, relevance)) if basket.relevance <= relevance => {}
                _ => best = Some((index, basket.relevance)),
            }
        }
        best.map(|(index, _)| index)
    }
}
