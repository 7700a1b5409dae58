//! Building configuration payloads

use crate::{BlockId, Point};
use serde::{Deserialize, Serialize};

/// Configuration stored on a building's center tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum BlockConfig {
    Int(i32),
    Text(String),
    /// A selected block type (sorter filters and similar)
    Content(BlockId),
    /// A single absolute tile position (bridge targets)
    Point(Point),
    /// Several absolute tile positions (power node links)
    Points(Vec<Point>),
}

impl BlockConfig {
    /// Config with every position moved by `(-dx, -dy)`.
    ///
    /// Returns `None` for variants that carry no position.
    pub fn shifted(&self, dx: i32, dy: i32) -> Option<BlockConfig> {
        match self {
            BlockConfig::Point(point) => Some(BlockConfig::Point(point.sub(dx, dy))),
            BlockConfig::Points(points) => Some(BlockConfig::Points(
                points.iter().map(|point| point.sub(dx, dy)).collect(),
            )),
            BlockConfig::Int(_) | BlockConfig::Text(_) | BlockConfig::Content(_) => None,
        }
    }
}
