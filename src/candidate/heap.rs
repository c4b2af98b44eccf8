//! Indexed max-heap over candidate scores with change-key.
//!
//! Soft-NMS rescales scores after every selection; the heap keeps each
//! candidate's slot so a rescaled candidate is re-sifted in `O(log n)`
//! instead of re-sorting the whole set.

use crate::candidate::order::rank_cmp;
use crate::util::Element;
use std::cmp::Ordering;

pub(crate) struct ScoreHeap<T> {
    heap: Vec<usize>,
    slots: Vec<Option<usize>>,
    scores: Vec<T>,
}

impl<T: Element> ScoreHeap<T> {
    /// Builds a heap holding every candidate with its initial score.
    pub(crate) fn new(scores: Vec<T>) -> Self {
        let n = scores.len();
        let mut heap = Self {
            heap: (0..n).collect(),
            slots: (0..n).map(Some).collect(),
            scores,
        };
        for i in (0..n / 2).rev() {
            heap.sift_down(i);
        }
        heap
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    pub(crate) fn contains(&self, id: usize) -> bool {
        self.slots.get(id).is_some_and(Option::is_some)
    }

    /// Current score of candidate `id`, whether or not it is still queued.
    pub(crate) fn score(&self, id: usize) -> T {
        self.scores[id]
    }

    /// Removes and returns the best-ranked candidate.
    pub(crate) fn pop(&mut self) -> Option<(usize, T)> {
        let top = *self.heap.first()?;
        self.remove(top);
        Some((top, self.scores[top]))
    }

    /// Replaces the score of a queued candidate and restores heap order.
    pub(crate) fn set_score(&mut self, id: usize, score: T) {
        self.scores[id] = score;
        if let Some(slot) = self.slots[id] {
            let slot = self.sift_up(slot);
            self.sift_down(slot);
        }
    }

    /// Drops a candidate from the queue; no-op if it is not queued.
    pub(crate) fn remove(&mut self, id: usize) {
        let Some(slot) = self.slots[id].take() else {
            return;
        };
        let Some(last) = self.heap.pop() else {
            return;
        };
        if slot < self.heap.len() {
            self.heap[slot] = last;
            self.slots[last] = Some(slot);
            let slot = self.sift_up(slot);
            self.sift_down(slot);
        }
    }

    fn before(&self, a: usize, b: usize) -> bool {
        rank_cmp((self.scores[a], a), (self.scores[b], b)) == Ordering::Less
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.slots[self.heap[i]] = Some(i);
        self.slots[self.heap[j]] = Some(j);
    }

    fn sift_up(&mut self, mut i: usize) -> usize {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.before(self.heap[i], self.heap[parent]) {
                break;
            }
            self.swap(i, parent);
            i = parent;
        }
        i
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.heap.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut best = i;
            if left < n && self.before(self.heap[left], self.heap[best]) {
                best = left;
            }
            if right < n && self.before(self.heap[right], self.heap[best]) {
                best = right;
            }
            if best == i {
                return;
            }
            self.swap(i, best);
            i = best;
        }
    }
}
