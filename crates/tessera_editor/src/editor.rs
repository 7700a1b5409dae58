//! The map editor
//!
//! [`MapEditor`] owns the tile grid and turns brush input into tile writes.
//! Every write records the field's previous value as a [`TileOp`] in the open
//! [`DrawOperation`]; flushing commits the batch to the [`OperationStack`].
//! Writes made while loading are applied but never recorded.

use crate::brush::{clamp_brush_size, Brush, BrushShape};
use crate::notify::{DirtyTracker, RenderNotifier};
use crate::operation::{DrawOperation, OpKind, TileOp};
use crate::preferences::EditorPreferences;
use crate::stack::OperationStack;
use bevy::prelude::Resource;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tessera_core::{
    builtin, BlockConfig, BlockId, BlockRegistry, MapData, MapError, Point, Team, Tile,
    TileGrid,
};
use uuid::Uuid;

/// Edge length of the grid used when no map is loaded
pub const DEFAULT_MAP_SIZE: i32 = 50;

/// Tile map editor with brush painting and undo/redo
#[derive(Resource)]
pub struct MapEditor<N: RenderNotifier = DirtyTracker> {
    pub(crate) registry: Arc<BlockRegistry>,
    pub(crate) notifier: N,
    pub(crate) grid: TileGrid,
    map_id: Uuid,
    tags: BTreeMap<String, String>,
    stack: OperationStack,
    current_op: Option<DrawOperation>,
    pub(crate) loading: bool,
    brush: Brush,
    rotation: u8,
    draw_block: BlockId,
    draw_team: Team,
    default_size: (i32, i32),
}

impl<N: RenderNotifier> MapEditor<N> {
    /// Create an editor over a default-sized stone grid
    pub fn new(registry: Arc<BlockRegistry>, notifier: N) -> Self {
        Self {
            registry,
            notifier,
            grid: TileGrid::new(DEFAULT_MAP_SIZE, DEFAULT_MAP_SIZE, builtin::STONE),
            map_id: Uuid::new_v4(),
            tags: BTreeMap::new(),
            stack: OperationStack::default(),
            current_op: None,
            loading: false,
            brush: Brush::default(),
            rotation: 0,
            draw_block: builtin::STONE,
            draw_team: Team::SHARDED,
            default_size: (DEFAULT_MAP_SIZE, DEFAULT_MAP_SIZE),
        }
    }

    /// Create an editor configured from saved preferences
    pub fn from_preferences(
        registry: Arc<BlockRegistry>,
        notifier: N,
        preferences: &EditorPreferences,
    ) -> Self {
        let mut editor = Self::new(registry, notifier);
        editor.default_size = (preferences.default_width, preferences.default_height);
        editor.stack.set_capacity(preferences.undo_capacity);
        editor.begin_edit(preferences.default_width, preferences.default_height);
        editor.set_brush_size(preferences.brush_size);
        editor.set_brush_shape(preferences.brush_shape);
        editor
    }

    // ------------------------------------------------------------------
    // Session lifecycle
    // ------------------------------------------------------------------

    /// Start a fresh stone map of the given size
    pub fn begin_edit(&mut self, width: i32, height: i32) {
        self.reset();
        self.map_id = Uuid::new_v4();

        self.loading = true;
        self.create_tiles(width, height);
        self.loading = false;

        self.notifier.notify_resized(self.width(), self.height());
    }

    /// Start editing a loaded map. A map whose tiles don't fit its
    /// dimensions is replaced by a default stone grid.
    pub fn begin_edit_map(&mut self, map: &MapData) {
        self.reset();
        self.map_id = map.id;

        self.loading = true;
        self.tags = map.tags.clone();
        match map.to_grid() {
            Ok(grid) => self.grid = grid,
            Err(e) => {
                bevy::log::warn!("Could not load map: {}. Using an empty map.", e);
                let (width, height) = self.default_size;
                self.create_tiles(width, height);
            }
        }
        self.loading = false;

        self.notifier.notify_resized(self.width(), self.height());
    }

    /// Start editing a map file (`.png` image or JSON map).
    ///
    /// Returns whether the file was loaded. On failure the editor falls back
    /// to an empty default-sized map.
    pub fn begin_edit_file(&mut self, path: &Path) -> bool {
        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));

        let error = if is_image {
            match image::open(path) {
                Ok(image) => {
                    self.begin_edit_image(&image.to_rgba8());
                    bevy::log::info!("Imported map image {}", path.display());
                    return true;
                }
                Err(e) => e.to_string(),
            }
        } else {
            match MapData::load(path) {
                Ok(map) => {
                    self.begin_edit_map(&map);
                    bevy::log::info!("Loaded map {}", path.display());
                    return true;
                }
                Err(e) => e.to_string(),
            }
        };

        bevy::log::warn!(
            "Could not open {}: {}. Using an empty map.",
            path.display(),
            error
        );
        let (width, height) = self.default_size;
        self.begin_edit(width, height);
        false
    }

    /// Run `f` with recording suppressed
    pub fn load(&mut self, f: impl FnOnce(&mut Self)) {
        let was_loading = self.loading;
        self.loading = true;
        f(self);
        self.loading = was_loading;
    }

    pub(crate) fn create_tiles(&mut self, width: i32, height: i32) {
        self.grid = TileGrid::new(width, height, builtin::STONE);
    }

    fn reset(&mut self) {
        self.clear_op();
        self.brush.size = 1.0;
        self.draw_block = builtin::STONE;
        self.tags.clear();
    }

    /// Snapshot the current map with its tags
    pub fn create_map(&self) -> MapData {
        MapData::from_grid(self.map_id, &self.grid, self.tags.clone())
    }

    pub fn save_map(&self, path: &Path) -> Result<(), MapError> {
        self.create_map().save(path)?;
        bevy::log::info!("Saved map to {}", path.display());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn tiles(&self) -> &TileGrid {
        &self.grid
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        self.grid.get(x, y)
    }

    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    pub fn map_id(&self) -> Uuid {
        self.map_id
    }

    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    pub fn tags_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.tags
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether a brush stroke has uncommitted edits
    pub fn is_recording(&self) -> bool {
        self.current_op.as_ref().is_some_and(|op| !op.is_empty())
    }

    pub fn brush(&self) -> Brush {
        self.brush
    }

    /// Set the brush size, clamped to the range of [`BRUSH_SIZES`](crate::brush::BRUSH_SIZES)
    pub fn set_brush_size(&mut self, size: f32) {
        self.brush.size = clamp_brush_size(size);
    }

    pub fn set_brush_shape(&mut self, shape: BrushShape) {
        self.brush.shape = shape;
    }

    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: u8) {
        self.rotation = rotation & 3;
    }

    pub fn draw_block(&self) -> BlockId {
        self.draw_block
    }

    pub fn set_draw_block(&mut self, block: BlockId) {
        self.draw_block = block;
    }

    pub fn draw_team(&self) -> Team {
        self.draw_team
    }

    pub fn set_draw_team(&mut self, team: Team) {
        self.draw_team = team;
    }

    // ------------------------------------------------------------------
    // Recorded tile writes
    // ------------------------------------------------------------------

    fn add_tile_op(&mut self, op: TileOp) {
        self.add_tile_op_with_config(op, None);
    }

    /// Record an op; `config` is the building config the op's write discards
    fn add_tile_op_with_config(&mut self, op: TileOp, config: Option<BlockConfig>) {
        if self.loading {
            return;
        }

        let batch = self.current_op.get_or_insert_with(DrawOperation::new);
        match config {
            Some(config) => batch.add_block_operation(op, config),
            None => batch.add_operation(op),
        }

        self.notifier.notify_dirty(op.x as i32, op.y as i32);
    }

    fn record(&mut self, point: Point, kind: OpKind, previous: u32) {
        self.add_tile_op(TileOp::new(point.x as u16, point.y as u16, kind, previous));
    }

    /// Set a tile's floor, clearing its overlay. Overlay blocks are routed to
    /// [`MapEditor::set_overlay`].
    pub fn set_floor(&mut self, x: i32, y: i32, floor: BlockId) {
        if self.registry.block(floor).is_overlay() {
            self.set_overlay(x, y, floor);
            return;
        }
        let Some(tile) = self.grid.get(x, y) else {
            return;
        };
        let (old_floor, old_overlay) = (tile.floor, tile.overlay);
        if old_floor == floor && old_overlay == BlockId::AIR {
            return;
        }

        let point = Point::new(x, y);
        if old_overlay != BlockId::AIR {
            self.record(point, OpKind::Overlay, old_overlay.0 as u32);
        }
        if old_floor != floor {
            self.record(point, OpKind::Floor, old_floor.0 as u32);
        }
        if let Some(tile) = self.grid.get_mut(x, y) {
            tile.floor = floor;
            tile.overlay = BlockId::AIR;
        }
    }

    pub fn set_overlay(&mut self, x: i32, y: i32, overlay: BlockId) {
        let Some(tile) = self.grid.get_mut(x, y) else {
            return;
        };
        let old_overlay = tile.overlay;
        if old_overlay == overlay {
            return;
        }
        tile.overlay = overlay;
        self.record(Point::new(x, y), OpKind::Overlay, old_overlay.0 as u32);
    }

    /// Set a tile's auxiliary byte
    pub fn set_data(&mut self, x: i32, y: i32, data: u8) {
        let Some(tile) = self.grid.get_mut(x, y) else {
            return;
        };
        let old_data = tile.data;
        if old_data == data {
            return;
        }
        tile.data = data;
        self.record(Point::new(x, y), OpKind::Data, old_data as u32);
    }

    /// Place a block centered at `(x, y)`, covering its whole footprint.
    ///
    /// Any other multiblock the footprint touches is removed first. Placement
    /// is skipped when the footprint leaves the grid.
    pub fn set_block(&mut self, x: i32, y: i32, block: BlockId, team: Team, rotation: u8) {
        let registry = Arc::clone(&self.registry);
        let def = registry.block(block);
        let center = Point::new(x, y);

        let Some(tile) = self.grid.get(x, y) else {
            return;
        };
        if !def
            .footprint(center)
            .all(|cell| self.grid.in_bounds(cell.x, cell.y))
        {
            return;
        }

        let rotation = if def.rotate { rotation & 3 } else { 0 };
        let team = if def.is_air() || def.is_static() {
            Team::DERELICT
        } else {
            team
        };
        if tile.block == def.id && tile.is_center() && tile.team == team && tile.rotation == rotation
        {
            return;
        }

        for cell in def.footprint(center) {
            let Some(existing) = self.grid.get_at(cell) else {
                continue;
            };
            let existing_def = registry.block(existing.block);
            let same_footprint = existing.center() == center && existing_def.size == def.size;
            if existing_def.is_multiblock() && !same_footprint {
                self.remove_block(cell.x, cell.y);
            }
        }

        for cell in def.footprint(center) {
            let link = ((x - cell.x) as i8, (y - cell.y) as i8);
            self.write_block(cell, def.id, link, team, rotation);
        }
    }

    /// Remove the block occupying `(x, y)`, including every cell of a
    /// multiblock it belongs to
    pub fn remove_block(&mut self, x: i32, y: i32) {
        let Some(tile) = self.grid.get(x, y) else {
            return;
        };
        if tile.block == BlockId::AIR {
            return;
        }
        let block = tile.block;
        let center = tile.center();

        let registry = Arc::clone(&self.registry);
        for cell in registry.block(block).footprint(center) {
            let belongs = self
                .grid
                .get_at(cell)
                .is_some_and(|other| other.block == block && other.center() == center);
            if belongs {
                self.write_block(cell, BlockId::AIR, (0, 0), Team::DERELICT, 0);
            }
        }
    }

    /// Write one cell's block fields, recording what changed
    fn write_block(&mut self, cell: Point, block: BlockId, link: (i8, i8), team: Team, rotation: u8) {
        let Some(tile) = self.grid.get_at(cell) else {
            return;
        };
        let (old_block, old_link, old_team, old_rotation) =
            (tile.block, tile.link, tile.team, tile.rotation);
        let old_config = tile.config.clone();

        if old_team != team {
            self.record(cell, OpKind::Team, old_team.0 as u32);
        }
        if old_rotation != rotation {
            self.record(cell, OpKind::Rotation, old_rotation as u32);
        }
        if old_block != block || old_link != link {
            let op = TileOp::block(cell.x as u16, cell.y as u16, old_block, old_link);
            self.add_tile_op_with_config(op, old_config);
        }

        if let Some(tile) = self.grid.get_at_mut(cell) {
            if tile.block != block || tile.link != link {
                tile.config = None;
            }
            tile.block = block;
            tile.link = link;
            tile.team = team;
            tile.rotation = rotation;
        }
    }

    // ------------------------------------------------------------------
    // Brush drawing
    // ------------------------------------------------------------------

    /// Paint the draw block with the current brush
    pub fn draw_blocks(&mut self, x: i32, y: i32) {
        let shape = self.brush.shape;
        self.draw_blocks_with(x, y, shape, false, |_| true);
    }

    /// Paint only over tiles that already hold a block (any tile for floors)
    pub fn draw_blocks_replace(&mut self, x: i32, y: i32) {
        let shape = self.brush.shape;
        let drawing_floor = self.registry.block(self.draw_block).is_floor();
        self.draw_blocks_with(x, y, shape, false, move |tile: &Tile| {
            tile.block != BlockId::AIR || drawing_floor
        });
    }

    /// Paint the draw block over every tile the brush covers that passes
    /// `tester`.
    ///
    /// Multiblocks are placed once, at `(x, y)` clamped so the footprint
    /// stays on the grid, and only where they don't overlap another
    /// multiblock. With `force_overlay`, floors are painted as overlays.
    pub fn draw_blocks_with(
        &mut self,
        x: i32,
        y: i32,
        shape: BrushShape,
        force_overlay: bool,
        tester: impl Fn(&Tile) -> bool,
    ) {
        let registry = Arc::clone(&self.registry);
        let block = registry.block(self.draw_block);
        let (team, rotation) = (self.draw_team, self.rotation);

        if block.is_multiblock() {
            let size = block.size as i32;
            if self.width() < size || self.height() < size {
                return;
            }
            let x = x.clamp((size - 1) / 2, self.width() - size / 2 - 1);
            let y = y.clamp((size - 1) / 2, self.height() - size / 2 - 1);

            let passes = self.grid.get(x, y).is_some_and(&tester);
            if passes && !self.has_overlap(x, y) {
                self.set_block(x, y, block.id, team, rotation);
            }
            return;
        }

        let is_floor = block.is_floor();
        let cells = Brush::new(self.brush.size, shape).cells(x, y, self.width(), self.height());

        for cell in cells {
            let (passes, current) = match self.grid.get_at(cell) {
                Some(tile) => (tester(tile), registry.block(tile.block)),
                None => continue,
            };
            if !passes {
                continue;
            }

            if is_floor {
                if force_overlay {
                    self.set_overlay(cell.x, cell.y, block.id);
                } else if !(block.is_wall_ore() && !current.solid) {
                    self.set_floor(cell.x, cell.y, block.id);
                }
            } else if !current.is_multiblock() {
                self.set_block(cell.x, cell.y, block.id, team, rotation);
            }
        }
    }

    /// Whether placing the draw block at `(x, y)` would intersect an existing
    /// multiblock. Replacing a different block of the same size at exactly
    /// the same center is allowed.
    pub fn has_overlap(&self, x: i32, y: i32) -> bool {
        let block = self.registry.block(self.draw_block);

        if let Some(tile) = self.grid.get(x, y) {
            let existing = self.registry.block(tile.block);
            if tile.is_center()
                && existing.is_multiblock()
                && tile.block != block.id
                && existing.size == block.size
            {
                return false;
            }
        }

        block.footprint(Point::new(x, y)).any(|cell| {
            self.grid
                .get_at(cell)
                .is_some_and(|other| self.registry.block(other.block).is_multiblock())
        })
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Commit the open batch. Empty batches are dropped.
    pub fn flush_op(&mut self) {
        if let Some(op) = self.current_op.take() {
            if !op.is_empty() {
                self.stack.add(op);
            }
        }
    }

    /// Drop all history and the open batch
    pub fn clear_op(&mut self) {
        self.stack.clear();
        self.current_op = None;
    }

    /// Revert the last batch, committing any open stroke first
    pub fn undo(&mut self) -> bool {
        self.flush_op();
        self.stack.undo(&mut self.grid, &mut self.notifier)
    }

    /// Re-apply the last undone batch
    pub fn redo(&mut self) -> bool {
        self.flush_op();
        self.stack.redo(&mut self.grid, &mut self.notifier)
    }

    pub fn can_undo(&self) -> bool {
        self.stack.can_undo() || self.is_recording()
    }

    /// An open stroke would discard the redo tail when committed
    pub fn can_redo(&self) -> bool {
        self.stack.can_redo() && !self.is_recording()
    }

    pub fn history(&self) -> &OperationStack {
        &self.stack
    }
}
