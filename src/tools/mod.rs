use serde::{Deserialize, Serialize};

mod selection_tool;
pub use selection_tool::CropSelection;

mod stroke_session;
pub use stroke_session::StrokeSession;

/// Pointer cursor shown over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Crosshair,
    Text,
}

/// The active tool. Decides how pointer input on the canvas is interpreted.
///
/// Only an explicit user pick changes it; switching cancels any gesture in
/// progress and drops the crop selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolMode {
    #[default]
    Draw,
    Text,
    Crop,
}

impl ToolMode {
    pub const ALL: [ToolMode; 3] = [ToolMode::Draw, ToolMode::Text, ToolMode::Crop];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Draw => "Draw",
            Self::Text => "Text",
            Self::Crop => "Crop",
        }
    }

    pub fn tooltip(&self) -> &'static str {
        match self {
            Self::Draw => "Draw freely on the image",
            Self::Text => "Add text annotations",
            Self::Crop => "Crop the image",
        }
    }

    pub fn cursor_hint(&self) -> CursorHint {
        match self {
            Self::Text => CursorHint::Text,
            Self::Draw | Self::Crop => CursorHint::Crosshair,
        }
    }
}
