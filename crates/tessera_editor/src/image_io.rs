//! Map image import and export
//!
//! Each block has a map color. Importing matches pixel colors against the
//! registry; exporting paints each tile with its topmost visible layer. Image
//! row 0 is the top of the map.

use crate::editor::MapEditor;
use crate::notify::RenderNotifier;
use image::{Rgba, RgbaImage};
use std::sync::Arc;
use tessera_core::{BlockId, BlockKind, Team};

impl<N: RenderNotifier> MapEditor<N> {
    /// Start editing a map read from an image of the same size
    pub fn begin_edit_image(&mut self, image: &RgbaImage) {
        self.begin_edit(image.width() as i32, image.height() as i32);
        self.load(|editor| editor.read_image(image));
    }

    /// Apply pixel colors to the grid. Transparent pixels and unknown colors
    /// are skipped.
    fn read_image(&mut self, image: &RgbaImage) {
        let registry = Arc::clone(&self.registry);
        let height = self.height();

        for (px, py, pixel) in image.enumerate_pixels() {
            let Rgba([r, g, b, a]) = *pixel;
            if a == 0 {
                continue;
            }
            let Some(block) = registry.by_color([r, g, b]) else {
                continue;
            };
            let (x, y) = (px as i32, height - 1 - py as i32);

            match block.kind {
                BlockKind::Floor => self.set_floor(x, y, block.id),
                BlockKind::Overlay { .. } => self.set_overlay(x, y, block.id),
                BlockKind::StaticWall | BlockKind::Cliff => {
                    self.set_block(x, y, block.id, Team::DERELICT, 0)
                }
                BlockKind::Air | BlockKind::Building => {}
            }
        }
    }

    /// Render the grid to an image, one pixel per tile
    pub fn export_image(&self) -> RgbaImage {
        let (width, height) = (self.width(), self.height());
        RgbaImage::from_fn(width as u32, height as u32, |px, py| {
            let Some(tile) = self.tile(px as i32, height - 1 - py as i32) else {
                return Rgba([0, 0, 0, 0]);
            };
            let shown = if tile.block != BlockId::AIR {
                tile.block
            } else if tile.overlay != BlockId::AIR {
                tile.overlay
            } else {
                tile.floor
            };
            let [r, g, b] = self.registry.block(shown).color;
            Rgba([r, g, b, 255])
        })
    }
}
