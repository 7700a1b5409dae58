//! Serialized map format
//!
//! A map file is a JSON document carrying a tag table (name, author, rules,
//! anything string-valued) and the full tile grid in row-major order.

use crate::{Tile, TileGrid};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use uuid::Uuid;

/// File extension used for saved maps
pub const MAP_FILE_EXTENSION: &str = "json";

#[derive(Debug)]
pub enum MapError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    InvalidDimensions {
        width: i32,
        height: i32,
        tiles: usize,
    },
    /// A tile's ids or link exceed what the editor can record
    InvalidTile {
        x: i32,
        y: i32,
    },
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::IoError(e) => write!(f, "IO error: {}", e),
            MapError::ParseError(e) => write!(f, "Parse error: {}", e),
            MapError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            MapError::InvalidDimensions {
                width,
                height,
                tiles,
            } => write!(
                f,
                "Map is {}x{} but carries {} tiles",
                width, height, tiles
            ),
            MapError::InvalidTile { x, y } => write!(f, "Tile ({}, {}) is out of range", x, y),
        }
    }
}

impl std::error::Error for MapError {}

/// A saved map: tags plus tiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<Tile>,
}

impl MapData {
    /// Snapshot a grid together with its tags
    pub fn from_grid(id: Uuid, grid: &TileGrid, tags: BTreeMap<String, String>) -> Self {
        Self {
            id,
            tags,
            width: grid.width(),
            height: grid.height(),
            tiles: grid.iter().cloned().collect(),
        }
    }

    /// Rebuild the tile grid, checking the tile count against the dimensions
    /// and every tile against the editor's limits
    pub fn to_grid(&self) -> Result<TileGrid, MapError> {
        if let Some(index) = self.tiles.iter().position(|tile| !tile.is_valid()) {
            let width = self.width.max(1);
            return Err(MapError::InvalidTile {
                x: index as i32 % width,
                y: index as i32 / width,
            });
        }
        TileGrid::from_tiles(self.width, self.height, self.tiles.clone()).ok_or(
            MapError::InvalidDimensions {
                width: self.width,
                height: self.height,
                tiles: self.tiles.len(),
            },
        )
    }

    /// Display name from the `name` tag
    pub fn name(&self) -> Option<&str> {
        self.tags.get("name").map(String::as_str)
    }

    /// Load a map from file
    pub fn load(path: &Path) -> Result<Self, MapError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| MapError::IoError(e.to_string()))?;

        let map: MapData =
            serde_json::from_str(&content).map_err(|e| MapError::ParseError(e.to_string()))?;

        // Tiles must fill the declared dimensions and fit the editor limits
        map.to_grid()?;

        Ok(map)
    }

    /// Save map to file
    pub fn save(&self, path: &Path) -> Result<(), MapError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| MapError::SerializeError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| MapError::IoError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlockConfig, BlockId, Point};

    fn temp_path(label: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "tessera-{}-{}.{}",
            label,
            Uuid::new_v4(),
            MAP_FILE_EXTENSION
        ))
    }

    #[test]
    fn test_save_and_load() {
        let mut grid = TileGrid::new(3, 2, BlockId(1));
        if let Some(tile) = grid.get_mut(2, 1) {
            tile.block = BlockId(17);
            tile.config = Some(BlockConfig::Point(Point::new(0, 1)));
        }
        let mut tags = BTreeMap::new();
        tags.insert("name".to_string(), "Crossing".to_string());
        let map = MapData::from_grid(Uuid::new_v4(), &grid, tags);

        let path = temp_path("roundtrip");
        map.save(&path).unwrap();
        let loaded = MapData::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, map);
        assert_eq!(loaded.name(), Some("Crossing"));
        assert_eq!(loaded.to_grid().unwrap(), grid);
    }

    #[test]
    fn test_load_rejects_mismatched_tiles() {
        let grid = TileGrid::new(2, 2, BlockId(1));
        let mut map = MapData::from_grid(Uuid::new_v4(), &grid, BTreeMap::new());
        map.tiles.pop();
        let path = temp_path("mismatch");
        map.save(&path).unwrap();
        let result = MapData::load(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(
            result,
            Err(MapError::InvalidDimensions { tiles: 3, .. })
        ));
    }

    #[test]
    fn test_load_rejects_out_of_range_block() {
        let mut grid = TileGrid::new(3, 3, BlockId(1));
        if let Some(tile) = grid.get_mut(1, 1) {
            tile.block = BlockId(5000);
        }
        let map = MapData::from_grid(Uuid::new_v4(), &grid, BTreeMap::new());
        let path = temp_path("range");
        map.save(&path).unwrap();
        let result = MapData::load(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(MapError::InvalidTile { x: 1, y: 1 })));
    }

    #[test]
    fn test_load_malformed_json() {
        let path = temp_path("malformed");
        std::fs::write(&path, "{ not json").unwrap();
        let result = MapData::load(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(MapError::ParseError(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = MapData::load(&temp_path("missing"));
        assert!(matches!(result, Err(MapError::IoError(_))));
    }
}
