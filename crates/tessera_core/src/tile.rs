//! A single grid cell

use crate::{BlockConfig, BlockId, Point, Team, MAX_BLOCK_ID};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Link offsets an editable tile may carry (6-bit signed)
pub const LINK_RANGE: RangeInclusive<i8> = -32..=31;

/// One cell's combined floor/overlay/block/rotation state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub x: u16,
    pub y: u16,
    pub floor: BlockId,
    #[serde(default)]
    pub overlay: BlockId,
    #[serde(default)]
    pub block: BlockId,
    #[serde(default)]
    pub team: Team,
    #[serde(default)]
    pub rotation: u8,
    /// Auxiliary byte (cliff neighbor mask)
    #[serde(default)]
    pub data: u8,
    /// Offset from this cell to its multiblock center; `(0, 0)` on centers
    #[serde(default)]
    pub link: (i8, i8),
    /// Building configuration, only present on centers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<BlockConfig>,
}

impl Tile {
    pub fn new(x: u16, y: u16, floor: BlockId, overlay: BlockId, block: BlockId) -> Self {
        Self {
            x,
            y,
            floor,
            overlay,
            block,
            team: Team::DERELICT,
            rotation: 0,
            data: 0,
            link: (0, 0),
            config: None,
        }
    }

    pub fn pos(&self) -> Point {
        Point::new(self.x as i32, self.y as i32)
    }

    /// Whether this cell anchors its block (always true for single tiles)
    pub fn is_center(&self) -> bool {
        self.link == (0, 0)
    }

    /// Position of the center tile of the block occupying this cell
    pub fn center(&self) -> Point {
        self.pos().offset(self.link.0 as i32, self.link.1 as i32)
    }

    /// Whether every id is below [`MAX_BLOCK_ID`] and the link fits
    /// [`LINK_RANGE`]
    pub fn is_valid(&self) -> bool {
        [self.floor, self.overlay, self.block]
            .iter()
            .all(|id| id.0 < MAX_BLOCK_ID)
            && LINK_RANGE.contains(&self.link.0)
            && LINK_RANGE.contains(&self.link.1)
    }
}
