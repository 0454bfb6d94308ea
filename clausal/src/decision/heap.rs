//! Priority queue of branching candidates.
//!
//! Each variable has an activity score. Conflict analysis bumps the score of the variables it
//! touches, so that decisions focus on the variables involved in recent conflicts. The heap hands
//! out the variable with the highest score. Assigned variables are not removed eagerly, instead
//! they are skipped when popped and reinserted when backtracking unassigns them.

use ordered_float::OrderedFloat;

use clausal_formula::Var;

/// Indexed binary max-heap of variables ordered by activity.
#[derive(Default)]
pub struct CandidateHeap {
    /// The activity of each variable.
    activity: Vec<OrderedFloat<f64>>,
    /// A binary heap of the variables.
    heap: Vec<Var>,
    /// The position in the binary heap for each variable.
    position: Vec<Option<usize>>,
}

impl CandidateHeap {
    /// Update structures for a new variable count.
    ///
    /// New variables start with zero activity and are available.
    pub fn set_var_count(&mut self, count: usize) {
        let old_count = self.activity.len();
        debug_assert!(!self.heap.iter().any(|&v| v.index() >= count));
        self.activity.resize(count, OrderedFloat(0.0));
        self.position.resize(count, None);

        for index in old_count..count {
            self.make_available(Var::from_index(index));
        }
    }

    /// Current activity of a variable.
    pub fn activity(&self, var: Var) -> f64 {
        self.activity[var.index()].0
    }

    /// Increase the activity of a variable, returning the new activity.
    pub fn bump(&mut self, var: Var, amount: f64) -> f64 {
        let value = &mut self.activity[var.index()];
        value.0 += amount;
        let new_value = value.0;
        if let Some(pos) = self.position[var.index()] {
            self.sift_up(pos);
        }
        new_value
    }

    /// Multiply all activities by a common factor.
    ///
    /// The order of the heap doesn't change, as long as the factor is positive.
    pub fn rescale(&mut self, factor: f64) {
        for activity in &mut self.activity {
            activity.0 *= factor;
        }
    }

    /// Insert a variable into the heap if not already present.
    pub fn make_available(&mut self, var: Var) {
        if self.position[var.index()].is_none() {
            let position = self.heap.len();
            self.position[var.index()] = Some(position);
            self.heap.push(var);
            self.sift_up(position);
        }
    }

    /// Whether a variable is currently contained in the heap.
    pub fn is_available(&self, var: Var) -> bool {
        self.position[var.index()].is_some()
    }

    /// Move a variable closer to the root until the heap property is satisfied.
    fn sift_up(&mut self, mut pos: usize) {
        let var = self.heap[pos];
        while pos > 0 {
            let parent_pos = (pos - 1) / 2;
            let parent_var = self.heap[parent_pos];
            if self.activity[parent_var.index()] >= self.activity[var.index()] {
                break;
            }
            self.position[parent_var.index()] = Some(pos);
            self.heap[pos] = parent_var;
            pos = parent_pos;
        }
        self.position[var.index()] = Some(pos);
        self.heap[pos] = var;
    }

    /// Move a variable away from the root until the heap property is satisfied.
    fn sift_down(&mut self, mut pos: usize) {
        let var = self.heap[pos];
        loop {
            let mut child_pos = pos * 2 + 1;
            if child_pos >= self.heap.len() {
                break;
            }
            let right_pos = child_pos + 1;
            if right_pos < self.heap.len()
                && self.activity[self.heap[child_pos].index()]
                    < self.activity[self.heap[right_pos].index()]
            {
                child_pos = right_pos;
            }
            let child_var = self.heap[child_pos];
            if self.activity[child_var.index()] <= self.activity[var.index()] {
                break;
            }
            self.position[child_var.index()] = Some(pos);
            self.heap[pos] = child_var;
            pos = child_pos;
        }
        self.position[var.index()] = Some(pos);
        self.heap[pos] = var;
    }
}

impl Iterator for CandidateHeap {
    type Item = Var;

    /// Remove and return the variable with the highest activity.
    fn next(&mut self) -> Option<Var> {
        if self.heap.is_empty() {
            return None;
        }
        let var = self.heap.swap_remove(0);
        self.position[var.index()] = None;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(var)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::{collection, prelude::*};

    fn drained(count: usize) -> CandidateHeap {
        let mut heap = CandidateHeap::default();
        heap.set_var_count(count);
        for _ in 0..count {
            heap.next();
        }
        heap
    }

    #[test]
    fn heap_sorts() {
        let mut heap = drained(8);

        for i in 0..8 {
            heap.bump(Var::from_index(i), i as f64);
        }

        for i in 0..8 {
            heap.make_available(Var::from_index((i * 5) % 8));
        }

        for i in (0..8).rev() {
            assert_eq!(heap.next(), Some(Var::from_index(i)));
        }
        assert_eq!(heap.next(), None);
    }

    #[test]
    fn heap_bump() {
        let mut heap = drained(8);

        for i in 0..8 {
            heap.bump(Var::from_index(i), i as f64);
        }

        for i in 0..8 {
            heap.make_available(Var::from_index((i * 5) % 8));
        }

        for i in (0..4).rev() {
            assert_eq!(heap.next(), Some(Var::from_index(i + 4)));
        }

        for i in 0..8 {
            heap.bump(Var::from_index(i), 20.0 * (8 - i) as f64);
        }

        for i in 0..4 {
            assert_eq!(heap.next(), Some(Var::from_index(i)));
        }

        assert_eq!(heap.next(), None);
    }

    #[test]
    fn rescale_keeps_order() {
        let mut heap = CandidateHeap::default();
        heap.set_var_count(3);

        heap.bump(var!(1), 1e99);
        heap.bump(var!(2), 3e99);
        heap.bump(var!(3), 2e99);
        heap.rescale(1e-100);

        assert_eq!(heap.activity(var!(2)), 3e99 * 1e-100);
        assert_eq!(heap.next(), Some(var!(2)));
        assert_eq!(heap.next(), Some(var!(3)));
        assert_eq!(heap.next(), Some(var!(1)));
    }

    #[test]
    fn reinsert_is_idempotent() {
        let mut heap = CandidateHeap::default();
        heap.set_var_count(2);
        heap.make_available(var!(1));
        heap.make_available(var!(1));

        assert!(heap.is_available(var!(1)));
        assert_eq!(heap.by_ref().count(), 2);
        assert!(!heap.is_available(var!(1)));
    }

    proptest! {
        #[test]
        fn pops_in_activity_order(bumps in collection::vec((0..20usize, 0.0..100.0f64), 0..100)) {
            let mut heap = CandidateHeap::default();
            heap.set_var_count(20);

            for &(index, amount) in bumps.iter() {
                heap.bump(Var::from_index(index), amount);
            }

            let order: Vec<_> = heap.by_ref().collect();
            prop_assert_eq!(order.len(), 20);

            for pair in order.windows(2) {
                prop_assert!(heap.activity(pair[0]) >= heap.activity(pair[1]));
            }
        }
    }
}
