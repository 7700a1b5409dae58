//! Block definitions and the block registry
//!
//! Every floor, overlay, wall and building is a [`Block`] identified by a
//! compact [`BlockId`]. The [`BlockRegistry`] owns the catalog and answers the
//! per-type questions the editor asks (size, kind, how configs react to a
//! resize).

use crate::{BlockConfig, Point};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Exclusive upper bound for block ids (ids must fit in 12 bits)
pub const MAX_BLOCK_ID: u16 = 1 << 12;

/// Largest supported multiblock edge length
pub const MAX_BLOCK_SIZE: u8 = 16;

/// Compact identifier of a block type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u16);

impl BlockId {
    /// The empty block. Always registered at id 0.
    pub const AIR: BlockId = BlockId(0);
}

/// Owner of a placed block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Team(pub u8);

impl Team {
    pub const DERELICT: Team = Team(0);
    pub const SHARDED: Team = Team(1);
    pub const CRUX: Team = Team(2);
}

/// What layer of a tile a block occupies and how it behaves there
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Air,
    /// Ground layer
    Floor,
    /// Drawn over the floor; wall ores only appear on solid blocks
    Overlay { wall_ore: bool },
    /// Natural terrain wall
    StaticWall,
    /// Boundary marker produced by cliff generation
    Cliff,
    /// Placeable structure, possibly larger than one tile
    Building,
}

/// How a block's configuration reacts when the map origin moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigShift {
    /// Config is not positional and is left alone
    #[default]
    Fixed,
    /// Config holds absolute tile positions that must be re-homed
    Positional,
}

/// A block type definition
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: BlockId,
    pub name: String,
    pub kind: BlockKind,
    /// Edge length of the square footprint
    pub size: u8,
    pub solid: bool,
    /// Whether the block keeps a rotation
    pub rotate: bool,
    /// Color used for map image import/export
    pub color: [u8; 3],
    pub config_shift: ConfigShift,
}

impl Block {
    /// Create a block with defaults derived from its kind.
    /// The id is assigned on registration.
    pub fn new(name: impl Into<String>, kind: BlockKind) -> Self {
        let solid = matches!(
            kind,
            BlockKind::StaticWall | BlockKind::Cliff | BlockKind::Building
        );
        Self {
            id: BlockId::AIR,
            name: name.into(),
            kind,
            size: 1,
            solid,
            rotate: false,
            color: [0, 0, 0],
            config_shift: ConfigShift::Fixed,
        }
    }

    pub fn with_size(mut self, size: u8) -> Self {
        self.size = size.clamp(1, MAX_BLOCK_SIZE);
        self
    }

    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn rotating(mut self) -> Self {
        self.rotate = true;
        self
    }

    pub fn positional(mut self) -> Self {
        self.config_shift = ConfigShift::Positional;
        self
    }

    pub fn is_air(&self) -> bool {
        self.kind == BlockKind::Air
    }

    /// Floors and overlays both live on the ground layer
    pub fn is_floor(&self) -> bool {
        matches!(self.kind, BlockKind::Floor | BlockKind::Overlay { .. })
    }

    pub fn is_overlay(&self) -> bool {
        matches!(self.kind, BlockKind::Overlay { .. })
    }

    pub fn is_wall_ore(&self) -> bool {
        matches!(self.kind, BlockKind::Overlay { wall_ore: true })
    }

    /// Terrain that cliff generation works on. Cliffs themselves count.
    pub fn is_static(&self) -> bool {
        matches!(self.kind, BlockKind::StaticWall | BlockKind::Cliff)
    }

    pub fn is_multiblock(&self) -> bool {
        self.size > 1
    }

    /// Offset from the center tile to the lower-left footprint cell
    pub fn footprint_origin(&self) -> i32 {
        -((self.size as i32 - 1) / 2)
    }

    /// Cells covered when centered at `center`
    pub fn footprint(&self, center: Point) -> impl Iterator<Item = Point> {
        let size = self.size as i32;
        let origin = center.offset(self.footprint_origin(), self.footprint_origin());
        (0..size).flat_map(move |dx| (0..size).map(move |dy| origin.offset(dx, dy)))
    }
}

/// The catalog of known blocks
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    blocks: Vec<Block>,
    by_name: HashMap<String, BlockId>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    /// Create a registry that only knows air
    pub fn new() -> Self {
        let mut registry = Self {
            blocks: Vec::new(),
            by_name: HashMap::new(),
        };
        registry.push(Block::new("air", BlockKind::Air));
        registry
    }

    /// Create the registry holding the [`builtin`] catalog
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for block in builtin::definitions() {
            registry.push(block);
        }
        registry
    }

    /// Register a block, assigning it the next id.
    ///
    /// Returns `None` if the name is taken or the id space is exhausted.
    pub fn register(&mut self, block: Block) -> Option<BlockId> {
        if self.by_name.contains_key(&block.name) || self.blocks.len() >= MAX_BLOCK_ID as usize {
            return None;
        }
        Some(self.push(block))
    }

    fn push(&mut self, mut block: Block) -> BlockId {
        let id = BlockId(self.blocks.len() as u16);
        block.id = id;
        self.by_name.insert(block.name.clone(), id);
        self.blocks.push(block);
        id
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.0 as usize)
    }

    /// Look up a block, resolving unknown ids to air
    pub fn block(&self, id: BlockId) -> &Block {
        self.blocks
            .get(id.0 as usize)
            .unwrap_or(&self.blocks[BlockId::AIR.0 as usize])
    }

    pub fn find(&self, name: &str) -> Option<&Block> {
        self.by_name.get(name).and_then(|id| self.get(*id))
    }

    /// First non-air block whose map color matches
    pub fn by_color(&self, color: [u8; 3]) -> Option<&Block> {
        self.blocks
            .iter()
            .find(|block| !block.is_air() && block.color == color)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// Re-home a block's config after the map origin moved by `(dx, dy)`.
    ///
    /// Returns `None` when the config stays as it is, either because the block
    /// type does not hold positions or because the variant carries none.
    pub fn shift_config(
        &self,
        block: BlockId,
        config: &BlockConfig,
        dx: i32,
        dy: i32,
    ) -> Option<BlockConfig> {
        match self.block(block).config_shift {
            ConfigShift::Fixed => None,
            ConfigShift::Positional => config.shifted(dx, dy),
        }
    }
}

/// Ids of the blocks in [`BlockRegistry::builtin`]
pub mod builtin {
    use super::{Block, BlockId, BlockKind};

    pub const AIR: BlockId = BlockId(0);
    pub const STONE: BlockId = BlockId(1);
    pub const SAND: BlockId = BlockId(2);
    pub const DARKSAND: BlockId = BlockId(3);
    pub const GRASS: BlockId = BlockId(4);
    pub const ICE: BlockId = BlockId(5);
    pub const METAL_FLOOR: BlockId = BlockId(6);
    pub const ORE_COPPER: BlockId = BlockId(7);
    pub const ORE_LEAD: BlockId = BlockId(8);
    pub const ORE_TITANIUM: BlockId = BlockId(9);
    pub const ORE_WALL_BERYLLIUM: BlockId = BlockId(10);
    pub const STONE_WALL: BlockId = BlockId(11);
    pub const SAND_WALL: BlockId = BlockId(12);
    pub const CLIFF: BlockId = BlockId(13);
    pub const CONVEYOR: BlockId = BlockId(14);
    pub const ROUTER: BlockId = BlockId(15);
    pub const SORTER: BlockId = BlockId(16);
    pub const BRIDGE_CONVEYOR: BlockId = BlockId(17);
    pub const POWER_NODE: BlockId = BlockId(18);
    pub const CONTAINER: BlockId = BlockId(19);
    pub const CORE_SHARD: BlockId = BlockId(20);
    pub const BATTERY_LARGE: BlockId = BlockId(21);
    pub const VAULT: BlockId = BlockId(22);

    /// Everything after air, in id order
    pub(super) fn definitions() -> Vec<Block> {
        vec![
            Block::new("stone", BlockKind::Floor).with_color([112, 112, 112]),
            Block::new("sand", BlockKind::Floor).with_color([210, 180, 120]),
            Block::new("darksand", BlockKind::Floor).with_color([90, 70, 55]),
            Block::new("grass", BlockKind::Floor).with_color([85, 140, 60]),
            Block::new("ice", BlockKind::Floor).with_color([180, 220, 240]),
            Block::new("metal-floor", BlockKind::Floor).with_color([120, 130, 145]),
            Block::new("ore-copper", BlockKind::Overlay { wall_ore: false })
                .with_color([217, 157, 115]),
            Block::new("ore-lead", BlockKind::Overlay { wall_ore: false })
                .with_color([140, 127, 169]),
            Block::new("ore-titanium", BlockKind::Overlay { wall_ore: false })
                .with_color([141, 161, 227]),
            Block::new("ore-wall-beryllium", BlockKind::Overlay { wall_ore: true })
                .with_color([58, 143, 100]),
            Block::new("stone-wall", BlockKind::StaticWall).with_color([60, 60, 60]),
            Block::new("sand-wall", BlockKind::StaticWall).with_color([170, 140, 90]),
            Block::new("cliff", BlockKind::Cliff).with_color([40, 40, 40]),
            Block::new("conveyor", BlockKind::Building)
                .rotating()
                .with_color([150, 150, 100]),
            Block::new("router", BlockKind::Building).with_color([200, 180, 70]),
            Block::new("sorter", BlockKind::Building).with_color([210, 210, 210]),
            Block::new("bridge-conveyor", BlockKind::Building)
                .positional()
                .with_color([110, 110, 90]),
            Block::new("power-node", BlockKind::Building)
                .positional()
                .with_color([230, 200, 90]),
            Block::new("container", BlockKind::Building)
                .with_size(2)
                .with_color([160, 160, 170]),
            Block::new("core-shard", BlockKind::Building)
                .with_size(3)
                .with_color([255, 180, 80]),
            Block::new("battery-large", BlockKind::Building)
                .with_size(3)
                .positional()
                .with_color([200, 200, 120]),
            Block::new("vault", BlockKind::Building)
                .with_size(3)
                .with_color([140, 140, 150]),
        ]
    }
}
