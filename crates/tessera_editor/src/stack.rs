//! Bounded undo/redo history of draw operations

use crate::notify::RenderNotifier;
use crate::operation::DrawOperation;
use std::collections::VecDeque;
use tessera_core::TileGrid;

/// Default number of batches kept in history
pub const DEFAULT_UNDO_CAPACITY: usize = 10;

/// Ordered batches plus a cursor.
///
/// Batches before the cursor are applied; batches from the cursor on can be
/// redone. Pushing drops the redo tail.
#[derive(Debug, Clone)]
pub struct OperationStack {
    batches: VecDeque<DrawOperation>,
    applied: usize,
    capacity: usize,
}

impl Default for OperationStack {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_UNDO_CAPACITY)
    }
}

impl OperationStack {
    /// History holding at most `capacity` batches (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            batches: VecDeque::new(),
            applied: 0,
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the capacity. Redo entries go first, then the oldest applied
    /// batches.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.batches.len() > self.capacity && self.can_redo() {
            self.batches.pop_back();
        }
        self.evict();
    }

    /// Push a committed batch, discarding anything that could be redone
    pub fn add(&mut self, op: DrawOperation) {
        self.batches.truncate(self.applied);
        self.batches.push_back(op);
        self.evict();
        self.applied = self.batches.len();
    }

    fn evict(&mut self) {
        while self.batches.len() > self.capacity {
            self.batches.pop_front();
            self.applied = self.applied.saturating_sub(1);
            bevy::log::debug!("Undo history full, dropped oldest batch");
        }
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub fn can_redo(&self) -> bool {
        self.applied < self.batches.len()
    }

    /// Revert the newest applied batch. Returns false at the start of history.
    pub fn undo(&mut self, grid: &mut TileGrid, notifier: &mut dyn RenderNotifier) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.applied -= 1;
        self.batches[self.applied].undo(grid, notifier);
        true
    }

    /// Re-apply the oldest undone batch. Returns false at the end of history.
    pub fn redo(&mut self, grid: &mut TileGrid, notifier: &mut dyn RenderNotifier) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.batches[self.applied].redo(grid, notifier);
        self.applied += 1;
        true
    }

    pub fn clear(&mut self) {
        self.batches.clear();
        self.applied = 0;
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::DirtyTracker;
    use crate::operation::{OpKind, TileOp};
    use tessera_core::BlockId;

    /// Set a floor on the grid and return the batch recording it
    fn paint(grid: &mut TileGrid, x: i32, floor: u16) -> DrawOperation {
        let tile = grid.get_mut(x, 0).unwrap();
        let mut op = DrawOperation::new();
        op.add_operation(TileOp::new(x as u16, 0, OpKind::Floor, tile.floor.0 as u32));
        tile.floor = BlockId(floor);
        op
    }

    fn floor(grid: &TileGrid, x: i32) -> u16 {
        grid.get(x, 0).unwrap().floor.0
    }

    #[test]
    fn test_undo_redo_moves_cursor() {
        let mut grid = TileGrid::new(4, 1, BlockId(1));
        let mut notifier = DirtyTracker::default();
        let mut stack = OperationStack::default();
        assert!(!stack.can_undo());

        let op = paint(&mut grid, 0, 7);
        stack.add(op);
        assert!(stack.can_undo());
        assert!(!stack.can_redo());

        assert!(stack.undo(&mut grid, &mut notifier));
        assert_eq!(floor(&grid, 0), 1);
        assert!(!stack.undo(&mut grid, &mut notifier));

        assert!(stack.redo(&mut grid, &mut notifier));
        assert_eq!(floor(&grid, 0), 7);
        assert!(!stack.redo(&mut grid, &mut notifier));
    }

    #[test]
    fn test_push_after_undo_discards_redo_tail() {
        let mut grid = TileGrid::new(4, 1, BlockId(1));
        let mut notifier = DirtyTracker::default();
        let mut stack = OperationStack::default();

        let op = paint(&mut grid, 0, 5);
        stack.add(op);
        let op = paint(&mut grid, 1, 6);
        stack.add(op);

        stack.undo(&mut grid, &mut notifier);
        stack.undo(&mut grid, &mut notifier);
        assert!(stack.can_redo());

        let op = paint(&mut grid, 2, 8);
        stack.add(op);
        assert!(!stack.can_redo());
        assert_eq!(stack.len(), 1);
        assert!(!stack.redo(&mut grid, &mut notifier));
        assert_eq!((floor(&grid, 0), floor(&grid, 1)), (1, 1));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut grid = TileGrid::new(4, 1, BlockId(1));
        let mut notifier = DirtyTracker::default();
        let mut stack = OperationStack::with_capacity(2);

        for (x, value) in [(0, 5), (1, 6), (2, 7)] {
            let op = paint(&mut grid, x, value);
            stack.add(op);
        }
        assert_eq!(stack.len(), 2);

        while stack.undo(&mut grid, &mut notifier) {}
        // The first edit fell out of history and stays applied
        assert_eq!(floor(&grid, 0), 5);
        assert_eq!((floor(&grid, 1), floor(&grid, 2)), (1, 1));
    }

    #[test]
    fn test_shrinking_capacity_drops_redo_first() {
        let mut grid = TileGrid::new(4, 1, BlockId(1));
        let mut notifier = DirtyTracker::default();
        let mut stack = OperationStack::with_capacity(4);
        for x in 0..3 {
            let op = paint(&mut grid, x, 9);
            stack.add(op);
        }
        stack.undo(&mut grid, &mut notifier);
        stack.set_capacity(1);

        assert_eq!(stack.len(), 1);
        assert!(!stack.can_redo());
        assert!(stack.undo(&mut grid, &mut notifier));
        assert_eq!((floor(&grid, 0), floor(&grid, 1), floor(&grid, 2)), (9, 1, 1));
    }

    #[test]
    fn test_shrinking_capacity_with_everything_undone() {
        let mut grid = TileGrid::new(4, 1, BlockId(1));
        let mut notifier = DirtyTracker::default();
        let mut stack = OperationStack::with_capacity(4);
        for x in 0..3 {
            let op = paint(&mut grid, x, 9);
            stack.add(op);
        }
        while stack.undo(&mut grid, &mut notifier) {}
        stack.set_capacity(1);

        // Only the first batch can be redone, so no edit lands without its predecessors
        assert_eq!(stack.len(), 1);
        assert!(stack.redo(&mut grid, &mut notifier));
        assert!(!stack.redo(&mut grid, &mut notifier));
        assert_eq!((floor(&grid, 0), floor(&grid, 1), floor(&grid, 2)), (9, 1, 1));
    }

    #[test]
    fn test_clear() {
        let mut grid = TileGrid::new(2, 1, BlockId(1));
        let mut stack = OperationStack::default();
        let op = paint(&mut grid, 0, 3);
        stack.add(op);
        stack.clear();
        assert!(stack.is_empty());
        assert!(!stack.can_undo() && !stack.can_redo());
    }
}
