#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod cli;
pub mod clipboard;
pub mod command;
pub mod engine;
pub mod error;
pub mod file_handler;
pub mod font;
pub mod input;
pub mod panels;
pub mod prompt;
pub mod raster;
pub mod renderer;
pub mod settings;
pub mod surface;
pub mod tools;

pub use app::AnnotatorApp;
pub use cli::Cli;
pub use command::{EditorCommand, HistoryStack};
pub use engine::{CanvasEvent, EditEngine};
pub use error::{AnnotatorError, Result};
pub use raster::RasterBuffer;
pub use settings::{EditorConfig, PenSettings};
pub use surface::Surface;
pub use tools::{CursorHint, ToolMode};
