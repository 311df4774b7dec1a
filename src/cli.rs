use std::path::PathBuf;

use clap::Parser;
use clap::builder::TypedValueParser as _;

use crate::command::history::DEFAULT_CAPACITY;
use crate::font::FontSpec;
use crate::settings::{EditorConfig, MAX_PEN_WIDTH, MIN_PEN_WIDTH, PenSettings};

/// Annotate images with freehand strokes and text, then crop, copy or save
/// them.
///
/// With no IMAGE the clipboard image is opened, if there is one.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "eframe_annotator", version)]
pub struct Cli {
    /// Image file to open at startup.
    #[arg(value_name = "IMAGE")]
    pub image: Option<PathBuf>,

    /// Number of snapshots kept for undo.
    #[arg(long, default_value_t = DEFAULT_CAPACITY, value_parser = clap::value_parser!(u64).range(1..).map(|v| v as usize))]
    pub history_size: usize,

    /// Stroke width in pixels. Overrides the remembered value.
    #[arg(long, value_name = "1-50", value_parser = clap::value_parser!(u32).range(MIN_PEN_WIDTH as i64..=MAX_PEN_WIDTH as i64))]
    pub pen_width: Option<u32>,

    /// Text font such as "Sans 12" or "Monospace Bold 18". Overrides the
    /// remembered value.
    #[arg(long, value_name = "FONT")]
    pub font: Option<String>,

    /// TrueType/OpenType file used for all text instead of looking up families.
    #[arg(long, value_name = "FILE")]
    pub font_file: Option<PathBuf>,
}

impl Cli {
    /// Apply the explicitly given flags on top of `remembered` settings.
    pub fn editor_config(&self, remembered: Option<PenSettings>) -> EditorConfig {
        let mut pen = remembered.unwrap_or_default();
        if let Some(width) = self.pen_width {
            pen.pen_width = width;
        }
        if let Some(font) = &self.font {
            pen.font = FontSpec::parse(font);
        }
        EditorConfig {
            history_capacity: self.history_size,
            pen: pen.sanitized(),
            font_file: self.font_file.clone(),
        }
    }
}
