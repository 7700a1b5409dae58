//! tessera_editor - Tile map editing engine for Bevy
//!
//! This crate provides the editing core of a tile map editor:
//! - Brush painting of floors, overlays and blocks (circle and square brushes)
//! - Multiblock placement with overlap checks
//! - Compact undo/redo of batched tile writes
//! - Cliff generation and map resizing
//! - JSON map files and map image import/export
//!
//! # Usage
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use tessera_editor::{EditorAction, MapEditorPlugin};
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(MapEditorPlugin)
//!         .run();
//! }
//!
//! fn paint(mut actions: MessageWriter<EditorAction>) {
//!     actions.write(EditorAction::Paint { x: 10, y: 4 });
//!     actions.write(EditorAction::EndStroke);
//! }
//! ```

pub mod actions;
pub mod brush;
pub mod cliffs;
pub mod editor;
pub mod image_io;
pub mod notify;
pub mod operation;
pub mod preferences;
pub mod resize;
pub mod stack;

pub use tessera_core;

pub use actions::{apply_action, EditorAction};
pub use brush::{Brush, BrushShape, BRUSH_SIZES};
pub use editor::{MapEditor, DEFAULT_MAP_SIZE};
pub use notify::{DirtyTracker, RenderNotifier};
pub use operation::{DrawOperation, OpKind, TileOp};
pub use preferences::EditorPreferences;
pub use stack::OperationStack;

use bevy::prelude::*;
use std::sync::Arc;
use tessera_core::BlockRegistry;

/// Plugin exposing a [`MapEditor`] resource driven by [`EditorAction`]
/// messages.
///
/// The editor uses the built-in block registry and is sized from the saved
/// preferences. Renderers drain the editor's [`DirtyTracker`] each frame.
pub struct MapEditorPlugin;

impl Plugin for MapEditorPlugin {
    fn build(&self, app: &mut App) {
        let preferences = EditorPreferences::load();
        bevy::log::info!("Loaded editor preferences");

        let editor: MapEditor = MapEditor::from_preferences(
            Arc::new(BlockRegistry::builtin()),
            DirtyTracker::default(),
            &preferences,
        );

        app.insert_resource(preferences)
            .insert_resource(editor)
            .add_message::<EditorAction>()
            .add_systems(Update, actions::apply_editor_actions);
    }
}
