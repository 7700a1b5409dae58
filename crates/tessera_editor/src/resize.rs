//! Map resizing

use crate::editor::MapEditor;
use crate::notify::RenderNotifier;
use std::collections::HashSet;
use std::sync::Arc;
use tessera_core::{builtin, BlockId, Point, Team, Tile, TileGrid, MAX_MAP_SIZE};

impl<N: RenderNotifier> MapEditor<N> {
    /// Resize the map, keeping the centered region shifted by
    /// `(shift_x, shift_y)`.
    ///
    /// Tiles move to their new coordinates and positional building configs
    /// are re-homed by the same offset. New cells get a stone floor.
    /// Multiblocks cut by the new border are removed. History is cleared,
    /// since recorded ops refer to old coordinates.
    pub fn resize(&mut self, width: i32, height: i32, shift_x: i32, shift_y: i32) {
        self.clear_op();

        let width = width.clamp(1, MAX_MAP_SIZE);
        let height = height.clamp(1, MAX_MAP_SIZE);
        let offset_x = (self.width() - width) / 2 - shift_x;
        let offset_y = (self.height() - height) / 2 - shift_y;

        self.loading = true;

        let registry = Arc::clone(&self.registry);
        let previous = std::mem::replace(
            &mut self.grid,
            TileGrid::new(width, height, builtin::STONE),
        );
        let (old_width, old_height) = (previous.width(), previous.height());
        let mut old_tiles: Vec<Option<Tile>> = previous.into_tiles().into_iter().map(Some).collect();

        for y in 0..height {
            for x in 0..width {
                let (px, py) = (offset_x + x, offset_y + y);
                if px < 0 || py < 0 || px >= old_width || py >= old_height {
                    continue;
                }
                let Some(mut tile) = old_tiles[(py * old_width + px) as usize].take() else {
                    continue;
                };
                tile.x = x as u16;
                tile.y = y as u16;

                // Shift links to account for the moved origin
                if tile.is_center() {
                    let shifted = tile
                        .config
                        .as_ref()
                        .and_then(|config| registry.shift_config(tile.block, config, offset_x, offset_y));
                    if shifted.is_some() {
                        tile.config = shifted;
                    }
                }

                if let Some(slot) = self.grid.get_mut(x, y) {
                    *slot = tile;
                }
            }
        }

        self.clear_severed_buildings();
        self.loading = false;

        self.notifier.notify_resized(width, height);
        bevy::log::info!(
            "Resized map from {}x{} to {}x{} (offset {}, {})",
            old_width,
            old_height,
            width,
            height,
            offset_x,
            offset_y
        );
    }

    /// Remove multiblock cells whose center is gone or whose footprint no
    /// longer fits the grid
    fn clear_severed_buildings(&mut self) {
        let registry = Arc::clone(&self.registry);
        let grid = &self.grid;

        let broken_centers: HashSet<Point> = grid
            .iter()
            .filter(|tile| tile.is_center() && registry.block(tile.block).is_multiblock())
            .filter(|tile| {
                !registry
                    .block(tile.block)
                    .footprint(tile.pos())
                    .all(|cell| grid.in_bounds(cell.x, cell.y))
            })
            .map(Tile::pos)
            .collect();

        let severed: Vec<Point> = grid
            .iter()
            .filter(|tile| registry.block(tile.block).is_multiblock())
            .filter(|tile| {
                let center = tile.center();
                let anchored = grid
                    .get_at(center)
                    .is_some_and(|anchor| anchor.block == tile.block && anchor.is_center());
                !anchored || broken_centers.contains(&center)
            })
            .map(Tile::pos)
            .collect();

        for pos in severed {
            if let Some(tile) = self.grid.get_at_mut(pos) {
                tile.block = BlockId::AIR;
                tile.link = (0, 0);
                tile.team = Team::DERELICT;
                tile.rotation = 0;
                tile.config = None;
            }
        }
    }
}
