pub mod history;

use egui::Color32;

use crate::engine::EditEngine;
use crate::error::Result;
use crate::font::FontSpec;
use crate::surface::Surface;
use crate::tools::ToolMode;

pub use history::HistoryStack;

/// Result of running a command: whether it changed anything.
pub type CommandResult = Result<bool>;

/// Discrete editor actions issued by the toolbar and keyboard shortcuts.
///
/// Pointer gestures go through [`EditEngine::handle_event`] instead.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    /// Change the active tool
    SelectTool(ToolMode),
    Undo,
    Redo,
    /// Crop to the pending selection
    CommitCrop,
    ClearSelection,
    SetColor(Color32),
    SetPenWidth(u32),
    SetFont(FontSpec),
}

impl EditorCommand {
    /// Execute the command against the engine
    pub fn execute<S: Surface>(&self, engine: &mut EditEngine<S>) -> CommandResult {
        log::debug!("Executing {:?}", self);
        match self {
            EditorCommand::SelectTool(mode) => {
                let changed = engine.mode() != *mode;
                engine.set_mode(*mode);
                Ok(changed)
            }
            EditorCommand::Undo => Ok(engine.undo()),
            EditorCommand::Redo => Ok(engine.redo()),
            EditorCommand::CommitCrop => engine.commit_crop(),
            EditorCommand::ClearSelection => {
                let had_selection = engine.selection().overlay_rect().is_some()
                    || engine.selection().can_commit();
                engine.clear_selection();
                Ok(had_selection)
            }
            EditorCommand::SetColor(color) => {
                let changed = engine.pen().color != *color;
                engine.set_color(*color);
                Ok(changed)
            }
            EditorCommand::SetPenWidth(width) => {
                let before = engine.pen().pen_width;
                engine.set_pen_width(*width);
                Ok(engine.pen().pen_width != before)
            }
            EditorCommand::SetFont(font) => {
                let changed = engine.pen().font != *font;
                engine.set_font(font.clone());
                Ok(changed)
            }
        }
    }

    /// Whether the command is currently applicable, for enabling buttons.
    pub fn is_enabled<S: Surface>(&self, engine: &EditEngine<S>) -> bool {
        match self {
            EditorCommand::Undo => engine.can_undo(),
            EditorCommand::Redo => engine.can_redo(),
            EditorCommand::CommitCrop => engine.can_commit_crop(),
            _ => true,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EditorCommand::SelectTool(mode) => mode.name(),
            EditorCommand::Undo => "Undo",
            EditorCommand::Redo => "Redo",
            EditorCommand::CommitCrop => "Crop",
            EditorCommand::ClearSelection => "Clear Selection",
            EditorCommand::SetColor(_) => "Color",
            EditorCommand::SetPenWidth(_) => "Pen Width",
            EditorCommand::SetFont(_) => "Font",
        }
    }
}
