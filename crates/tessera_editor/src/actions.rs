//! Editor actions
//!
//! Hosts drive the editor by writing [`EditorAction`] messages. The
//! [`apply_editor_actions`] system applies them in order and persists
//! preferences when the recent maps list changes.

use crate::editor::MapEditor;
use crate::notify::RenderNotifier;
use crate::preferences::EditorPreferences;
use bevy::ecs::message::{Message, MessageReader};
use bevy::prelude::*;
use std::path::{Path, PathBuf};

/// A single edit requested by the host
#[derive(Message, Debug, Clone, PartialEq)]
pub enum EditorAction {
    /// Start a fresh map
    New { width: i32, height: i32 },
    /// Open a JSON map or `.png` image
    Open(PathBuf),
    Save(PathBuf),
    /// Paint the draw block with the current brush
    Paint { x: i32, y: i32 },
    /// Paint only over existing blocks
    PaintReplace { x: i32, y: i32 },
    /// Commit the open stroke
    EndStroke,
    Undo,
    Redo,
    AddCliffs,
    Resize {
        width: i32,
        height: i32,
        shift_x: i32,
        shift_y: i32,
    },
}

/// Apply one action. Returns whether `preferences` changed and should be
/// saved.
pub fn apply_action<N: RenderNotifier>(
    editor: &mut MapEditor<N>,
    preferences: &mut EditorPreferences,
    action: &EditorAction,
) -> bool {
    match action {
        EditorAction::New { width, height } => {
            editor.begin_edit(*width, *height);
            false
        }
        EditorAction::Open(path) => {
            if editor.begin_edit_file(path) {
                preferences.add_recent_map(path.clone(), map_name(editor, path));
                true
            } else {
                bevy::log::error!("Failed to open map {}", path.display());
                preferences.remove_recent_map(path);
                true
            }
        }
        EditorAction::Save(path) => match editor.save_map(path) {
            Ok(()) => {
                preferences.add_recent_map(path.clone(), map_name(editor, path));
                true
            }
            Err(e) => {
                bevy::log::error!("Failed to save map {}: {}", path.display(), e);
                false
            }
        },
        EditorAction::Paint { x, y } => {
            editor.draw_blocks(*x, *y);
            false
        }
        EditorAction::PaintReplace { x, y } => {
            editor.draw_blocks_replace(*x, *y);
            false
        }
        EditorAction::EndStroke => {
            editor.flush_op();
            false
        }
        EditorAction::Undo => {
            editor.undo();
            false
        }
        EditorAction::Redo => {
            editor.redo();
            false
        }
        EditorAction::AddCliffs => {
            editor.add_cliffs();
            false
        }
        EditorAction::Resize {
            width,
            height,
            shift_x,
            shift_y,
        } => {
            editor.resize(*width, *height, *shift_x, *shift_y);
            false
        }
    }
}

/// The `name` tag if set, else the file stem
fn map_name<N: RenderNotifier>(editor: &MapEditor<N>, path: &Path) -> String {
    editor
        .tags()
        .get("name")
        .cloned()
        .or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "Untitled".to_string())
}

pub(crate) fn apply_editor_actions(
    mut actions: MessageReader<EditorAction>,
    mut editor: ResMut<MapEditor>,
    mut preferences: ResMut<EditorPreferences>,
) {
    let mut changed = false;
    for action in actions.read() {
        changed |= apply_action(&mut *editor, &mut *preferences, action);
    }

    if changed {
        if let Err(e) = preferences.save() {
            bevy::log::error!("Failed to save preferences: {}", e);
        }
    }
}
