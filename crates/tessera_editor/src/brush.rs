//! Brush shapes and the tiles they cover

use serde::{Deserialize, Serialize};
use tessera_core::Point;

/// Brush sizes offered by the editor
pub const BRUSH_SIZES: [f32; 9] = [1.0, 1.5, 2.0, 3.0, 4.0, 5.0, 9.0, 15.0, 20.0];

pub const MIN_BRUSH_SIZE: f32 = BRUSH_SIZES[0];
pub const MAX_BRUSH_SIZE: f32 = BRUSH_SIZES[BRUSH_SIZES.len() - 1];

/// Added to the circle radius so cells exactly on the boundary stay stable
const CIRCLE_EPSILON: f32 = 0.0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrushShape {
    #[default]
    Circle,
    Square,
}

/// Size and shape of the active brush
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    pub size: f32,
    pub shape: BrushShape,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            size: 1.0,
            shape: BrushShape::Circle,
        }
    }
}

impl Brush {
    /// Brush with `size` clamped by [`clamp_brush_size`]
    pub fn new(size: f32, shape: BrushShape) -> Self {
        Self {
            size: clamp_brush_size(size),
            shape,
        }
    }

    /// Cells covered when centered at `(x, y)`, clipped to a
    /// `width` x `height` grid. Order is x-outer, y-inner.
    pub fn cells(&self, x: i32, y: i32, width: i32, height: i32) -> Vec<Point> {
        match self.shape {
            BrushShape::Circle => circle_cells(x, y, self.size, width, height),
            BrushShape::Square => square_cells(x, y, self.size, width, height),
        }
    }
}

/// Clamp to `MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE`; NaN becomes the minimum
pub fn clamp_brush_size(size: f32) -> f32 {
    if size.is_nan() {
        return MIN_BRUSH_SIZE;
    }
    size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE)
}

/// Cells within `size - 0.5` of the center
pub fn circle_cells(x: i32, y: i32, size: f32, width: i32, height: i32) -> Vec<Point> {
    let clamped = size as i32;
    let radius = size - 0.5 + CIRCLE_EPSILON;
    let mut cells = Vec::new();
    for rx in -clamped..=clamped {
        for ry in -clamped..=clamped {
            if ((rx * rx + ry * ry) as f32) < radius * radius {
                push_in_bounds(&mut cells, x + rx, y + ry, width, height);
            }
        }
    }
    cells
}

/// Every cell of the square window around the center
pub fn square_cells(x: i32, y: i32, size: f32, width: i32, height: i32) -> Vec<Point> {
    let clamped = size as i32;
    let mut cells = Vec::new();
    for rx in -clamped..=clamped {
        for ry in -clamped..=clamped {
            push_in_bounds(&mut cells, x + rx, y + ry, width, height);
        }
    }
    cells
}

fn push_in_bounds(cells: &mut Vec<Point>, x: i32, y: i32, width: i32, height: i32) {
    if x < 0 || y < 0 || x >= width || y >= height {
        return;
    }
    cells.push(Point::new(x, y));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn set(cells: Vec<Point>) -> HashSet<Point> {
        cells.into_iter().collect()
    }

    #[test]
    fn test_brush_size_clamped() {
        assert_eq!(Brush::new(1.0e10, BrushShape::Circle).size, MAX_BRUSH_SIZE);
        assert_eq!(Brush::new(0.0, BrushShape::Square).size, MIN_BRUSH_SIZE);
        assert_eq!(clamp_brush_size(f32::NAN), MIN_BRUSH_SIZE);
        assert_eq!(clamp_brush_size(4.0), 4.0);
    }

    #[test]
    fn test_smallest_circle_is_one_tile() {
        assert_eq!(circle_cells(5, 5, 1.0, 20, 20), vec![Point::new(5, 5)]);
    }

    #[test]
    fn test_radius_one_circle_is_plus_shape() {
        let cells = circle_cells(5, 5, 1.5, 20, 20);
        let expected: HashSet<Point> = [(5, 5), (4, 5), (6, 5), (5, 4), (5, 6)]
            .into_iter()
            .map(Point::from)
            .collect();
        assert_eq!(cells.len(), 5);
        assert_eq!(set(cells), expected);
    }

    #[test]
    fn test_boundary_cells_kept_by_epsilon() {
        // Size 3 gives radius 2.5; (2, 1) has distance sqrt(5) < 2.5, (2, 2) does not
        let cells = set(circle_cells(0, 0, 3.0, 10, 10));
        assert!(cells.contains(&Point::new(2, 1)));
        assert!(!cells.contains(&Point::new(2, 2)));
        // Size 2.5 gives radius exactly 2, kept only thanks to the epsilon
        let cells = set(circle_cells(3, 3, 2.5, 10, 10));
        assert!(cells.contains(&Point::new(5, 3)));
    }

    #[test]
    fn test_square_window() {
        let cells = square_cells(5, 5, 1.0, 20, 20);
        assert_eq!(cells.len(), 9);
        assert_eq!(cells[0], Point::new(4, 4));
        assert_eq!(cells[1], Point::new(4, 5));
    }

    #[test]
    fn test_cells_clipped_to_grid() {
        let cells = square_cells(0, 0, 2.0, 3, 3);
        assert_eq!(cells.len(), 9);
        assert!(cells.iter().all(|p| p.x >= 0 && p.y >= 0 && p.x < 3 && p.y < 3));

        assert!(circle_cells(-10, -10, 2.0, 5, 5).is_empty());
    }

    #[test]
    fn test_brush_dispatches_on_shape() {
        let brush = Brush::new(1.0, BrushShape::Square);
        assert_eq!(brush.cells(2, 2, 10, 10).len(), 9);
        assert_eq!(Brush::default().cells(2, 2, 10, 10).len(), 1);
    }
}
