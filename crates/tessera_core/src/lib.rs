//! Core data structures for the tessera map editor
//!
//! This crate provides the engine-free types for representing tile maps:
//! - `Tile` - One cell's floor, overlay, block, team, rotation and data
//! - `TileGrid` - Row-major tile storage with bounds-checked access
//! - `Block` / `BlockRegistry` - Block definitions and the catalog
//! - `BlockConfig` - Building configuration payloads
//! - `MapData` - The saved map format (tags plus tiles)

mod block;
mod config;
mod grid;
mod map;
mod point;
mod tile;

pub use block::{
    builtin, Block, BlockId, BlockKind, BlockRegistry, ConfigShift, Team, MAX_BLOCK_ID,
    MAX_BLOCK_SIZE,
};
pub use config::BlockConfig;
pub use grid::{TileGrid, MAX_MAP_SIZE};
pub use map::{MapData, MapError, MAP_FILE_EXTENSION};
pub use point::{Point, D8};
pub use tile::{Tile, LINK_RANGE};
