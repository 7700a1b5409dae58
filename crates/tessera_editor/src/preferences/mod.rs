//! User preferences for the map editor
//!
//! Preferences are stored as JSON in the platform config directory and
//! supply the defaults for new maps, the brush and the undo history.

mod file;

pub use file::*;

use crate::brush::BrushShape;
use crate::editor::DEFAULT_MAP_SIZE;
use crate::stack::DEFAULT_UNDO_CAPACITY;
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Maximum number of entries in the recent maps list
pub const MAX_RECENT_MAPS: usize = 10;

/// A recently opened or saved map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentMap {
    pub path: PathBuf,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct EditorPreferences {
    /// Width of maps created without a source
    pub default_width: i32,
    /// Height of maps created without a source
    pub default_height: i32,
    pub brush_size: f32,
    pub brush_shape: BrushShape,
    /// Number of batches kept for undo
    pub undo_capacity: usize,
    /// Most recent first
    pub recent_maps: Vec<RecentMap>,
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            default_width: DEFAULT_MAP_SIZE,
            default_height: DEFAULT_MAP_SIZE,
            brush_size: 1.0,
            brush_shape: BrushShape::Circle,
            undo_capacity: DEFAULT_UNDO_CAPACITY,
            recent_maps: Vec::new(),
        }
    }
}

impl EditorPreferences {
    /// Move a map to the front of the recent list
    pub fn add_recent_map(&mut self, path: PathBuf, name: String) {
        self.recent_maps.retain(|recent| recent.path != path);
        self.recent_maps.insert(0, RecentMap { path, name });
        self.recent_maps.truncate(MAX_RECENT_MAPS);
    }

    pub fn remove_recent_map(&mut self, path: &Path) {
        self.recent_maps.retain(|recent| recent.path != path);
    }

    pub fn clear_recent_maps(&mut self) {
        self.recent_maps.clear();
    }
}
