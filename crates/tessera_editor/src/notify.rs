//! Renderer notifications
//!
//! The editor never draws. It reports which tiles changed and when the grid
//! was rebuilt; the renderer picks those up on its next frame.

use std::collections::HashSet;
use tessera_core::Point;

/// Sink for editor change notifications. Calls must not block.
pub trait RenderNotifier: Send + Sync + 'static {
    /// A tile's visible state changed
    fn notify_dirty(&mut self, x: i32, y: i32);

    /// The whole grid was replaced with one of the given size
    fn notify_resized(&mut self, width: i32, height: i32);
}

/// Notifier that accumulates changes until the renderer drains them
#[derive(Debug, Default)]
pub struct DirtyTracker {
    dirty: HashSet<Point>,
    resized: Option<(i32, i32)>,
}

impl DirtyTracker {
    /// Take the set of tiles changed since the last call
    pub fn take_dirty(&mut self) -> HashSet<Point> {
        std::mem::take(&mut self.dirty)
    }

    /// Take the pending grid size, if the grid was rebuilt
    pub fn take_resized(&mut self) -> Option<(i32, i32)> {
        self.resized.take()
    }

    pub fn is_dirty(&self, x: i32, y: i32) -> bool {
        self.dirty.contains(&Point::new(x, y))
    }
}

impl RenderNotifier for DirtyTracker {
    fn notify_dirty(&mut self, x: i32, y: i32) {
        self.dirty.insert(Point::new(x, y));
    }

    fn notify_resized(&mut self, width: i32, height: i32) {
        // A full rebuild supersedes individual tiles
        self.dirty.clear();
        self.resized = Some((width, height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirty_points_deduplicated_and_drained() {
        let mut tracker = DirtyTracker::default();
        tracker.notify_dirty(1, 2);
        tracker.notify_dirty(1, 2);
        tracker.notify_dirty(3, 4);
        assert!(tracker.is_dirty(3, 4));

        assert_eq!(tracker.take_dirty().len(), 2);
        assert!(tracker.take_dirty().is_empty());
    }

    #[test]
    fn test_resize_clears_pending_points() {
        let mut tracker = DirtyTracker::default();
        tracker.notify_dirty(1, 2);
        tracker.notify_resized(10, 12);

        assert!(tracker.take_dirty().is_empty());
        assert_eq!(tracker.take_resized(), Some((10, 12)));
        assert_eq!(tracker.take_resized(), None);
    }
}
