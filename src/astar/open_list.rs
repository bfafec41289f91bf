// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::BinaryHeap;

use crate::NodeIndex;

#[derive(Debug, Clone, Copy)]
pub(super) struct QueueItem {
    pub at: NodeIndex,
    pub cost: f32,
    pub score: f32,
    seq: u64,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for QueueItem {}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // NOTE: We revert the order of comparison,
        // as lower scores (and earlier insertions among equal scores)
        // are considered better ("higher"), and Rust's BinaryHeap is a max-heap.
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Frontier of discovered-but-not-yet-expanded nodes.
///
/// Pops nodes in order of increasing `score`. Nodes with equal scores are popped
/// in insertion order, the same order a stable re-sort of a plain list would produce.
#[derive(Debug, Default)]
pub(super) struct OpenList {
    heap: BinaryHeap<QueueItem>,
    next_seq: u64,
}

impl OpenList {
    pub fn push(&mut self, at: NodeIndex, cost: f32, score: f32) {
        self.heap.push(QueueItem {
            at,
            cost,
            score,
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    /// Removes and returns the item with the lowest score.
    ///
    /// # Panics
    ///
    /// Panics if the list is empty - callers must check [OpenList::is_empty] first.
    pub fn select_next(&mut self) -> QueueItem {
        match self.heap.pop() {
            Some(item) => item,
            None => panic!("select_next called on an empty open list"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Iterates over queued nodes, in arbitrary order.
    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.heap.iter().map(|item| item.at)
    }
}
