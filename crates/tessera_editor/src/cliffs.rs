//! Cliff generation
//!
//! Static walls bordering open ground become cliff markers whose data byte
//! holds an 8-neighbor mask (bit `i` set when `D8[i]` is not static). Walls
//! with no open neighbor are removed.

use crate::editor::MapEditor;
use crate::notify::RenderNotifier;
use std::sync::Arc;
use tessera_core::{BlockId, BlockKind, Point, Team, D8};

impl<N: RenderNotifier> MapEditor<N> {
    /// Outline static terrain with cliffs, as one undoable batch.
    ///
    /// Does nothing if the registry has no cliff block.
    pub fn add_cliffs(&mut self) {
        let registry = Arc::clone(&self.registry);
        let Some(cliff) = registry.iter().find(|b| b.kind == BlockKind::Cliff).map(|b| b.id)
        else {
            return;
        };

        self.flush_op();

        // First pass reads the untouched grid; every mask is computed before
        // any tile changes.
        let is_static = |block: BlockId| registry.block(block).is_static();
        let masks: Vec<(Point, u8)> = self
            .grid
            .iter()
            .filter(|tile| is_static(tile.block) && tile.block != cliff)
            .map(|tile| {
                let pos = tile.pos();
                let mask = D8.iter().enumerate().fold(0u8, |mask, (i, d)| {
                    let open = self
                        .grid
                        .get_at(pos.offset(d.x, d.y))
                        .is_some_and(|other| !is_static(other.block));
                    if open {
                        mask | (1 << i)
                    } else {
                        mask
                    }
                });
                (pos, mask)
            })
            .collect();

        for (pos, mask) in masks {
            if mask != 0 {
                self.set_block(pos.x, pos.y, cliff, Team::DERELICT, 0);
            }
            self.set_data(pos.x, pos.y, mask);
        }

        let leftover: Vec<Point> = self
            .grid
            .iter()
            .filter(|tile| tile.block != cliff && is_static(tile.block))
            .map(|tile| tile.pos())
            .collect();
        for pos in leftover {
            self.set_block(pos.x, pos.y, BlockId::AIR, Team::DERELICT, 0);
        }

        self.flush_op();
    }
}
