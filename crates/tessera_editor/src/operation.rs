//! Compact tile operations
//!
//! Every recorded edit is a [`TileOp`] packed into a `u64`:
//!
//! | bits   | field |
//! |--------|-------|
//! | 0..16  | x     |
//! | 16..32 | y     |
//! | 32..40 | kind  |
//! | 40..64 | value |
//!
//! The value is what the tile held *before* the edit. Applying an op swaps
//! that value with the tile's current one and keeps the displaced value, so
//! the same primitive undoes and redoes.
//!
//! Building configs don't fit in an op. A block op that replaced a configured
//! building keeps the old config in its batch, and applying the op swaps that
//! config with the tile's.

use crate::notify::RenderNotifier;
use std::collections::BTreeMap;
use tessera_core::{BlockConfig, BlockId, Team, Tile, TileGrid};

const VALUE_MASK: u32 = 0x00FF_FFFF;
const LINK_BITS: u32 = 6;
const LINK_MASK: u32 = (1 << LINK_BITS) - 1;
const BLOCK_ID_MASK: u32 = 0x0FFF;

/// Which field of a tile an op touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpKind {
    Floor = 0,
    Overlay = 1,
    /// Block id plus the link offset to the multiblock center
    Block = 2,
    Rotation = 3,
    Team = 4,
    Data = 5,
}

impl OpKind {
    fn from_u8(raw: u8) -> Option<Self> {
        Some(match raw {
            0 => OpKind::Floor,
            1 => OpKind::Overlay,
            2 => OpKind::Block,
            3 => OpKind::Rotation,
            4 => OpKind::Team,
            5 => OpKind::Data,
            _ => return None,
        })
    }
}

/// One reversible tile mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileOp {
    pub x: u16,
    pub y: u16,
    pub kind: OpKind,
    /// 24-bit payload
    pub value: u32,
}

impl TileOp {
    pub fn new(x: u16, y: u16, kind: OpKind, value: u32) -> Self {
        Self {
            x,
            y,
            kind,
            value: value & VALUE_MASK,
        }
    }

    /// Op restoring a block id and its link offset
    pub fn block(x: u16, y: u16, block: BlockId, link: (i8, i8)) -> Self {
        Self::new(x, y, OpKind::Block, pack_block(block, link))
    }

    pub fn pack(self) -> u64 {
        self.x as u64
            | (self.y as u64) << 16
            | (self.kind as u64) << 32
            | ((self.value & VALUE_MASK) as u64) << 40
    }

    /// Decode a packed op; `None` if the kind byte is unknown
    pub fn unpack(raw: u64) -> Option<Self> {
        Some(Self {
            x: raw as u16,
            y: (raw >> 16) as u16,
            kind: OpKind::from_u8((raw >> 32) as u8)?,
            value: (raw >> 40) as u32 & VALUE_MASK,
        })
    }

    /// Write the stored value into the grid, returning the op that reverts it.
    ///
    /// Returns `None` if the op's tile no longer exists.
    pub fn swap(self, grid: &mut TileGrid) -> Option<TileOp> {
        let tile = grid.get_mut(self.x as i32, self.y as i32)?;
        let previous = read_field(tile, self.kind);
        write_field(tile, self.kind, self.value);
        Some(TileOp {
            value: previous,
            ..self
        })
    }
}

/// Pack a block id with signed 6-bit link offsets
pub fn pack_block(block: BlockId, link: (i8, i8)) -> u32 {
    (block.0 as u32 & BLOCK_ID_MASK)
        | (link.0 as i32 as u32 & LINK_MASK) << 12
        | (link.1 as i32 as u32 & LINK_MASK) << (12 + LINK_BITS)
}

pub fn unpack_block(value: u32) -> (BlockId, (i8, i8)) {
    let block = BlockId((value & BLOCK_ID_MASK) as u16);
    let dx = sign_extend((value >> 12) & LINK_MASK);
    let dy = sign_extend((value >> (12 + LINK_BITS)) & LINK_MASK);
    (block, (dx, dy))
}

fn sign_extend(bits: u32) -> i8 {
    (((bits as i32) << (32 - LINK_BITS)) >> (32 - LINK_BITS)) as i8
}

fn read_field(tile: &Tile, kind: OpKind) -> u32 {
    match kind {
        OpKind::Floor => tile.floor.0 as u32,
        OpKind::Overlay => tile.overlay.0 as u32,
        OpKind::Block => pack_block(tile.block, tile.link),
        OpKind::Rotation => tile.rotation as u32,
        OpKind::Team => tile.team.0 as u32,
        OpKind::Data => tile.data as u32,
    }
}

fn write_field(tile: &mut Tile, kind: OpKind, value: u32) {
    match kind {
        OpKind::Floor => tile.floor = BlockId(value as u16),
        OpKind::Overlay => tile.overlay = BlockId(value as u16),
        OpKind::Block => {
            let (block, link) = unpack_block(value);
            if block != tile.block || link != tile.link {
                tile.config = None;
            }
            tile.block = block;
            tile.link = link;
        }
        OpKind::Rotation => tile.rotation = value as u8,
        OpKind::Team => tile.team = Team(value as u8),
        OpKind::Data => tile.data = value as u8,
    }
}

/// One undoable batch of tile ops, applied and reverted as a unit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawOperation {
    ops: Vec<u64>,
    /// Configs displaced by block ops, keyed by op index
    configs: BTreeMap<usize, Option<BlockConfig>>,
}

impl DrawOperation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_operation(&mut self, op: TileOp) {
        self.ops.push(op.pack());
    }

    /// Add a block op together with the config the tile held before it
    pub fn add_block_operation(&mut self, op: TileOp, config: BlockConfig) {
        self.configs.insert(self.ops.len(), Some(config));
        self.add_operation(op);
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn ops(&self) -> impl Iterator<Item = TileOp> + '_ {
        self.ops.iter().filter_map(|raw| TileOp::unpack(*raw))
    }

    /// Revert the batch, newest op first
    pub fn undo(&mut self, grid: &mut TileGrid, notifier: &mut dyn RenderNotifier) {
        for i in (0..self.ops.len()).rev() {
            self.apply(i, grid, notifier);
        }
    }

    /// Re-apply the batch, oldest op first
    pub fn redo(&mut self, grid: &mut TileGrid, notifier: &mut dyn RenderNotifier) {
        for i in 0..self.ops.len() {
            self.apply(i, grid, notifier);
        }
    }

    fn apply(&mut self, index: usize, grid: &mut TileGrid, notifier: &mut dyn RenderNotifier) {
        let Some(op) = TileOp::unpack(self.ops[index]) else {
            return;
        };
        let (x, y) = (op.x as i32, op.y as i32);

        // Taken before the swap, which clears configs on block changes
        let displaced = if self.configs.contains_key(&index) {
            grid.get_mut(x, y).and_then(|tile| tile.config.take())
        } else {
            None
        };

        let Some(reverse) = op.swap(grid) else {
            return;
        };
        self.ops[index] = reverse.pack();

        if let Some(stored) = self.configs.get_mut(&index) {
            let restored = std::mem::replace(stored, displaced);
            if let Some(tile) = grid.get_mut(x, y) {
                tile.config = restored;
            }
        }
        notifier.notify_dirty(x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::DirtyTracker;
    use tessera_core::Point;

    #[test]
    fn test_pack_preserves_fields() {
        let op = TileOp::new(4095, 65535, OpKind::Team, 0x00AB_CDEF);
        assert_eq!(TileOp::unpack(op.pack()), Some(op));

        let op = TileOp::block(3, 9, BlockId(4000), (-1, 1));
        let unpacked = TileOp::unpack(op.pack()).unwrap();
        assert_eq!(unpacked.kind, OpKind::Block);
        assert_eq!(unpack_block(unpacked.value), (BlockId(4000), (-1, 1)));
    }

    #[test]
    fn test_block_link_sign_extension() {
        for link in [(0, 0), (-8, 7), (31, -32), (-1, -1)] {
            let value = pack_block(BlockId(22), link);
            assert_eq!(unpack_block(value), (BlockId(22), link));
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let raw = 9u64 << 32;
        assert_eq!(TileOp::unpack(raw), None);
    }

    #[test]
    fn test_swap_is_its_own_inverse() {
        let mut grid = TileGrid::new(4, 4, BlockId(1));
        let op = TileOp::new(2, 2, OpKind::Floor, 5);
        let reverse = op.swap(&mut grid).unwrap();
        assert_eq!(grid.get(2, 2).unwrap().floor, BlockId(5));
        assert_eq!(reverse.value, 1);

        reverse.swap(&mut grid).unwrap();
        assert_eq!(grid.get(2, 2).unwrap().floor, BlockId(1));
    }

    #[test]
    fn test_swap_out_of_bounds_is_none() {
        let mut grid = TileGrid::new(2, 2, BlockId(1));
        assert!(TileOp::new(9, 9, OpKind::Data, 3).swap(&mut grid).is_none());
    }

    #[test]
    fn test_batch_undo_redo_with_repeated_tile() {
        let mut grid = TileGrid::new(4, 4, BlockId(1));
        let mut notifier = DirtyTracker::default();
        let mut batch = DrawOperation::new();

        // Two successive floor edits on one tile: 1 -> 2 -> 3
        batch.add_operation(TileOp::new(1, 1, OpKind::Floor, 1));
        grid.get_mut(1, 1).unwrap().floor = BlockId(2);
        batch.add_operation(TileOp::new(1, 1, OpKind::Floor, 2));
        grid.get_mut(1, 1).unwrap().floor = BlockId(3);

        batch.undo(&mut grid, &mut notifier);
        assert_eq!(grid.get(1, 1).unwrap().floor, BlockId(1));

        batch.redo(&mut grid, &mut notifier);
        assert_eq!(grid.get(1, 1).unwrap().floor, BlockId(3));
        assert_eq!(notifier.take_dirty().len(), 1);
    }

    #[test]
    fn test_block_op_swaps_config() {
        let mut grid = TileGrid::new(4, 4, BlockId(1));
        let mut notifier = DirtyTracker::default();
        let config = BlockConfig::Point(Point::new(3, 1));
        if let Some(tile) = grid.get_mut(1, 1) {
            tile.block = BlockId(17);
            tile.config = Some(config.clone());
        }

        // Bridge replaced by a router
        let mut batch = DrawOperation::new();
        batch.add_block_operation(TileOp::block(1, 1, BlockId(17), (0, 0)), config.clone());
        if let Some(tile) = grid.get_mut(1, 1) {
            tile.block = BlockId(15);
            tile.config = None;
        }

        batch.undo(&mut grid, &mut notifier);
        let tile = grid.get(1, 1).unwrap();
        assert_eq!((tile.block, tile.config.clone()), (BlockId(17), Some(config.clone())));

        batch.redo(&mut grid, &mut notifier);
        let tile = grid.get(1, 1).unwrap();
        assert_eq!((tile.block, tile.config.clone()), (BlockId(15), None));

        batch.undo(&mut grid, &mut notifier);
        assert_eq!(grid.get(1, 1).unwrap().config, Some(config));
    }
}
