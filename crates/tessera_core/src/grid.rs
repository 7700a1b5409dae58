//! Row-major tile storage

use crate::{BlockId, Point, Tile};

/// Largest accepted map edge length
pub const MAX_MAP_SIZE: i32 = 5000;

/// A rectangular grid of tiles
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Create a grid with every cell holding `floor` and nothing else.
    /// Dimensions are clamped to `1..=MAX_MAP_SIZE`.
    pub fn new(width: i32, height: i32, floor: BlockId) -> Self {
        let width = width.clamp(1, MAX_MAP_SIZE);
        let height = height.clamp(1, MAX_MAP_SIZE);
        let mut tiles = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                tiles.push(Tile::new(x as u16, y as u16, floor, BlockId::AIR, BlockId::AIR));
            }
        }
        Self {
            width,
            height,
            tiles,
        }
    }

    /// Build a grid from row-major tiles.
    ///
    /// Returns `None` if the dimensions are out of range, the tile count
    /// does not match them, or a tile fails [`Tile::is_valid`]. Tile
    /// coordinates are rewritten to their slot.
    pub fn from_tiles(width: i32, height: i32, mut tiles: Vec<Tile>) -> Option<Self> {
        if !(1..=MAX_MAP_SIZE).contains(&width)
            || !(1..=MAX_MAP_SIZE).contains(&height)
            || tiles.len() != (width * height) as usize
            || !tiles.iter().all(Tile::is_valid)
        {
            return None;
        }
        for (index, tile) in tiles.iter_mut().enumerate() {
            tile.x = (index as i32 % width) as u16;
            tile.y = (index as i32 / width) as u16;
        }
        Some(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y).then(|| (y * self.width + x) as usize)
    }

    /// Tile at a position, `None` outside the grid
    pub fn get(&self, x: i32, y: i32) -> Option<&Tile> {
        let index = self.index(x, y)?;
        Some(&self.tiles[index])
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        let index = self.index(x, y)?;
        Some(&mut self.tiles[index])
    }

    pub fn get_at(&self, point: Point) -> Option<&Tile> {
        self.get(point.x, point.y)
    }

    pub fn get_at_mut(&mut self, point: Point) -> Option<&mut Tile> {
        self.get_mut(point.x, point.y)
    }

    /// Tiles in row-major order
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut()
    }

    pub fn into_tiles(self) -> Vec<Tile> {
        self.tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_positions() {
        let grid = TileGrid::new(4, 3, BlockId(1));
        assert_eq!(grid.iter().count(), 12);
        let tile = grid.get(3, 2).unwrap();
        assert_eq!((tile.x, tile.y), (3, 2));
        assert_eq!(tile.floor, BlockId(1));
    }

    #[test]
    fn test_out_of_bounds_is_none() {
        let grid = TileGrid::new(4, 4, BlockId(1));
        assert!(grid.get(-1, 0).is_none());
        assert!(grid.get(0, 4).is_none());
        assert!(grid.get(4, 0).is_none());
        assert!(grid.get(3, 3).is_some());
    }

    #[test]
    fn test_dimensions_clamped() {
        let grid = TileGrid::new(0, -5, BlockId(1));
        assert_eq!((grid.width(), grid.height()), (1, 1));
    }

    #[test]
    fn test_from_tiles_validates_count() {
        let tiles = TileGrid::new(3, 3, BlockId(1)).into_tiles();
        assert!(TileGrid::from_tiles(2, 2, tiles.clone()).is_none());

        let grid = TileGrid::from_tiles(9, 1, tiles).unwrap();
        let tile = grid.get(7, 0).unwrap();
        assert_eq!((tile.x, tile.y), (7, 0));
    }

    #[test]
    fn test_from_tiles_rejects_unpackable_tiles() {
        let mut tiles = TileGrid::new(2, 2, BlockId(1)).into_tiles();
        tiles[3].block = BlockId(5000);
        assert!(TileGrid::from_tiles(2, 2, tiles.clone()).is_none());

        tiles[3].block = BlockId::AIR;
        tiles[1].link = (-40, 0);
        assert!(TileGrid::from_tiles(2, 2, tiles).is_none());
    }
}
