//! Shuffle order generation and navigation
//!
//! A shuffle order is a full permutation of queue indices, regenerated
//! from scratch on every shuffle enable and discarded on disable.

use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};

/// Permutation of queue indices used for next/previous while shuffling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShuffleOrder {
    order: Vec<usize>,
}

impl ShuffleOrder {
    /// Generate an unbiased permutation of `0..len`
    pub fn generate(len: usize) -> Self {
        Self::generate_with(len, &mut thread_rng())
    }

    /// Generate with a caller-supplied RNG (deterministic tests)
    ///
    /// Uses Fisher-Yates via [`SliceRandom::shuffle`]: every permutation is
    /// equally likely.
    pub fn generate_with<R: Rng>(len: usize, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..len).collect();
        order.shuffle(rng);
        Self { order }
    }

    #[cfg(test)]
    pub(crate) fn from_order(order: Vec<usize>) -> Self {
        Self { order }
    }

    /// Number of entries (equals the queue length while shuffle is active)
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the order is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The permutation as queue indices, in play order
    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    /// Position of `queue_index` within the play order
    pub fn position_of(&self, queue_index: usize) -> Option<usize> {
        self.order.iter().position(|&i| i == queue_index)
    }

    /// Step from the entry holding `queue_index` by `delta` (wrapping) and
    /// return the neighbouring queue index
    ///
    /// `None` when `queue_index` is not in the order; the caller falls
    /// back to catalog-order stepping.
    pub fn step_from(&self, queue_index: usize, delta: i64) -> Option<usize> {
        let position = self.position_of(queue_index)?;
        let len = self.order.len() as i64;
        let neighbour = (position as i64 + delta).rem_euclid(len) as usize;
        Some(self.order[neighbour])
    }

    /// Append a newly enqueued index so the order keeps covering the queue
    pub(crate) fn push(&mut self, queue_index: usize) {
        self.order.push(queue_index);
    }
}
