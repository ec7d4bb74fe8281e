//! Bucket priority queue for small non-negative integer priorities
//!
//! Buckets hold the head of an intrusive singly-linked chain of cells with the
//! same priority. The links live in a flat `next` array parallel to the grid's
//! cell array, so the queue never stores references into the cells.
//!
//! The minimum watermark only drops when a cheaper cell is enqueued, which
//! keeps dequeue amortized O(1) for monotone searches.

use crate::cell::CellIndex;

/// Reusable min-priority queue keyed by cell priority
#[derive(Clone, Debug)]
pub struct CellPriorityQueue {
    /// Chain head per priority
    buckets: Vec<Option<CellIndex>>,
    /// Next cell with the same priority, indexed by cell
    next_with_same_priority: Vec<Option<CellIndex>>,
    count: usize,
    minimum: usize,
}

impl CellPriorityQueue {
    pub fn new(cell_count: usize) -> Self {
        Self {
            buckets: Vec::new(),
            next_with_same_priority: vec![None; cell_count],
            count: 0,
            minimum: usize::MAX,
        }
    }

    /// Resize the link array for a rebuilt grid. Empties the queue.
    pub fn resize(&mut self, cell_count: usize) {
        self.clear();
        self.next_with_same_priority.clear();
        self.next_with_same_priority.resize(cell_count, None);
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn enqueue(&mut self, cell: CellIndex, priority: i32) {
        let priority = bucket_index(priority);
        if self.minimum > priority {
            self.minimum = priority;
        }
        if self.buckets.len() <= priority {
            self.buckets.resize(priority + 1, None);
        }

        self.next_with_same_priority[cell.0] = self.buckets[priority];
        self.buckets[priority] = Some(cell);
        self.count += 1;
    }

    /// Pop a cell with the lowest priority
    pub fn dequeue(&mut self) -> Option<CellIndex> {
        if self.count == 0 {
            return None;
        }
        self.count -= 1;

        while self.minimum < self.buckets.len() {
            if let Some(cell) = self.buckets[self.minimum] {
                self.buckets[self.minimum] = self.next_with_same_priority[cell.0];
                return Some(cell);
            }
            self.minimum += 1;
        }

        None
    }

    /// Move a queued cell from `old_priority` to `new_priority`.
    ///
    /// # Panics
    ///
    /// If `cell` is not queued under `old_priority`. Callers must pass the
    /// priority the cell was enqueued with.
    pub fn change(&mut self, cell: CellIndex, old_priority: i32, new_priority: i32) {
        let old = bucket_index(old_priority);
        let Some(mut current) = self.buckets.get(old).copied().flatten() else {
            panic!("cell {:?} is not queued: bucket {} is empty", cell, old);
        };

        if current == cell {
            self.buckets[old] = self.next_with_same_priority[cell.0];
        } else {
            loop {
                match self.next_with_same_priority[current.0] {
                    Some(next) if next == cell => break,
                    Some(next) => current = next,
                    None => panic!("cell {:?} is not queued under priority {}", cell, old),
                }
            }
            self.next_with_same_priority[current.0] = self.next_with_same_priority[cell.0];
        }

        // Already counted
        self.enqueue(cell, new_priority);
        self.count -= 1;
    }

    /// Cost is proportional to the buckets used by the previous search, not
    /// to the number of cells.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.count = 0;
        self.minimum = usize::MAX;
    }
}

fn bucket_index(priority: i32) -> usize {
    usize::try_from(priority).unwrap_or_else(|_| panic!("negative search priority {}", priority))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_dequeue_in_priority_order() {
        let mut queue = CellPriorityQueue::new(8);
        queue.enqueue(CellIndex(0), 7);
        queue.enqueue(CellIndex(1), 3);
        queue.enqueue(CellIndex(2), 5);
        queue.enqueue(CellIndex(3), 3);
        assert_eq!(queue.len(), 4);

        let first = queue.dequeue().unwrap();
        let second = queue.dequeue().unwrap();
        assert!([first, second].contains(&CellIndex(1)));
        assert!([first, second].contains(&CellIndex(3)));
        assert_eq!(queue.dequeue(), Some(CellIndex(2)));
        assert_eq!(queue.dequeue(), Some(CellIndex(0)));
        assert_eq!(queue.dequeue(), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_ties_are_lifo() {
        let mut queue = CellPriorityQueue::new(4);
        queue.enqueue(CellIndex(0), 2);
        queue.enqueue(CellIndex(1), 2);
        queue.enqueue(CellIndex(2), 2);
        assert_eq!(queue.dequeue(), Some(CellIndex(2)));
        assert_eq!(queue.dequeue(), Some(CellIndex(1)));
        assert_eq!(queue.dequeue(), Some(CellIndex(0)));
    }

    #[test]
    fn test_change_head_and_middle() {
        let mut queue = CellPriorityQueue::new(4);
        queue.enqueue(CellIndex(0), 9);
        queue.enqueue(CellIndex(1), 9);
        queue.enqueue(CellIndex(2), 9);

        // middle of the chain
        queue.change(CellIndex(1), 9, 4);
        // head of the chain
        queue.change(CellIndex(2), 9, 6);
        assert_eq!(queue.len(), 3);

        assert_eq!(queue.dequeue(), Some(CellIndex(1)));
        assert_eq!(queue.dequeue(), Some(CellIndex(2)));
        assert_eq!(queue.dequeue(), Some(CellIndex(0)));
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn test_enqueue_below_watermark() {
        let mut queue = CellPriorityQueue::new(4);
        queue.enqueue(CellIndex(0), 5);
        queue.enqueue(CellIndex(1), 8);
        assert_eq!(queue.dequeue(), Some(CellIndex(0)));
        queue.enqueue(CellIndex(2), 1);
        assert_eq!(queue.dequeue(), Some(CellIndex(2)));
        assert_eq!(queue.dequeue(), Some(CellIndex(1)));
    }

    #[test]
    fn test_clear_resets() {
        let mut queue = CellPriorityQueue::new(4);
        queue.enqueue(CellIndex(0), 30);
        queue.enqueue(CellIndex(1), 2);
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.dequeue(), None);
        queue.enqueue(CellIndex(3), 0);
        assert_eq!(queue.dequeue(), Some(CellIndex(3)));
    }

    #[test]
    #[should_panic(expected = "not queued")]
    fn test_change_missing_cell_panics() {
        let mut queue = CellPriorityQueue::new(4);
        queue.enqueue(CellIndex(0), 3);
        queue.change(CellIndex(1), 3, 1);
    }

    #[test]
    #[should_panic(expected = "not queued")]
    fn test_change_stale_priority_panics() {
        let mut queue = CellPriorityQueue::new(4);
        queue.enqueue(CellIndex(0), 3);
        queue.change(CellIndex(0), 2, 1);
    }

    /// Random operation sequence checked against a naive scan
    #[test]
    fn test_matches_reference_model() {
        const CELLS: usize = 64;
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut queue = CellPriorityQueue::new(CELLS);
        // Reference: priority per resident cell
        let mut resident: Vec<Option<i32>> = vec![None; CELLS];

        for _ in 0..5000 {
            let op = rng.gen_range(0..10);
            if op < 4 {
                let free: Vec<usize> = (0..CELLS).filter(|&c| resident[c].is_none()).collect();
                if free.is_empty() {
                    continue;
                }
                let cell = free[rng.gen_range(0..free.len())];
                let priority = rng.gen_range(0..40);
                queue.enqueue(CellIndex(cell), priority);
                resident[cell] = Some(priority);
            } else if op < 7 {
                let min = resident.iter().flatten().min().copied();
                match queue.dequeue() {
                    Some(cell) => {
                        let priority = resident[cell.0].take().expect("dequeued a non-resident cell");
                        assert_eq!(Some(priority), min);
                    }
                    None => assert_eq!(min, None),
                }
            } else {
                let queued: Vec<usize> = (0..CELLS).filter(|&c| resident[c].is_some()).collect();
                if queued.is_empty() {
                    continue;
                }
                let cell = queued[rng.gen_range(0..queued.len())];
                let old = resident[cell].unwrap();
                if old == 0 {
                    continue;
                }
                let new = rng.gen_range(0..old);
                queue.change(CellIndex(cell), old, new);
                resident[cell] = Some(new);
            }

            let expected = resident.iter().filter(|p| p.is_some()).count();
            assert_eq!(queue.len(), expected);
        }
    }
}
