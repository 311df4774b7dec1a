use egui::Color32;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::command::history::DEFAULT_CAPACITY;
use crate::font::FontSpec;

pub const MIN_PEN_WIDTH: u32 = 1;
pub const MAX_PEN_WIDTH: u32 = 50;
pub const DEFAULT_PEN_WIDTH: u32 = 5;

/// Color, pen width and font shared by strokes and text stamps.
/// Persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct PenSettings {
    pub color: Color32,
    pub pen_width: u32,
    pub font: FontSpec,
}

impl Default for PenSettings {
    fn default() -> Self {
        Self {
            color: Color32::RED,
            pen_width: DEFAULT_PEN_WIDTH,
            font: FontSpec::default(),
        }
    }
}

impl PenSettings {
    pub fn clamp_pen_width(width: u32) -> u32 {
        width.clamp(MIN_PEN_WIDTH, MAX_PEN_WIDTH)
    }

    /// Bring values read from storage back into range.
    pub fn sanitized(mut self) -> Self {
        self.pen_width = Self::clamp_pen_width(self.pen_width);
        self.font = FontSpec::new(self.font.family, self.font.size);
        self
    }
}

/// Everything the engine needs to start.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    pub history_capacity: usize,
    pub pen: PenSettings,
    /// Font file used for every text stamp instead of the bundled faces.
    pub font_file: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_CAPACITY,
            pen: PenSettings::default(),
            font_file: None,
        }
    }
}
