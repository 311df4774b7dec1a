use std::path::PathBuf;
use thiserror::Error;

/// Errors raised at the I/O boundaries of the annotator.
///
/// None of these are fatal: the engine reports them to the caller and keeps
/// its in-memory state exactly as it was before the failed call.
#[derive(Debug, Error)]
pub enum AnnotatorError {
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Crop region {x},{y} {width}x{height} lies outside a {image_width}x{image_height} image")]
    Bounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },

    #[error("Font unavailable: {0}")]
    Font(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

/// Result type for fallible annotator operations
pub type Result<T> = std::result::Result<T, AnnotatorError>;
