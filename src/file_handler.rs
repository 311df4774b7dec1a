use image::ImageFormat;
use std::path::{Path, PathBuf};

use crate::error::{AnnotatorError, Result};
use crate::raster::RasterBuffer;

/// File name offered by the save dialog.
pub const DEFAULT_SAVE_NAME: &str = "annotated.png";

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff"];

/// Turns encoded image files into buffers and back.
pub trait ImageCodec {
    fn decode(&self, bytes: &[u8]) -> Result<RasterBuffer>;

    fn encode(&self, buffer: &RasterBuffer, format: ImageFormat) -> Result<Vec<u8>>;
}

/// Codec backed by the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateCodec;

impl ImageCodec for ImageCrateCodec {
    fn decode(&self, bytes: &[u8]) -> Result<RasterBuffer> {
        RasterBuffer::load(bytes)
    }

    fn encode(&self, buffer: &RasterBuffer, format: ImageFormat) -> Result<Vec<u8>> {
        buffer.encode(format)
    }
}

/// Blocking open/save file choosers.
pub trait FilePrompt {
    fn prompt_open(&mut self) -> Option<PathBuf>;

    fn prompt_save(&mut self, default_name: &str) -> Option<PathBuf>;
}

/// Native dialogs, via rfd.
#[derive(Debug, Default)]
pub struct NativeFilePrompt;

impl FilePrompt for NativeFilePrompt {
    fn prompt_open(&mut self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Open Image")
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
    }

    fn prompt_save(&mut self, default_name: &str) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Save Image")
            .set_file_name(default_name)
            .add_filter("PNG", &["png"])
            .save_file()
    }
}

pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| AnnotatorError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `bytes` to `path` through a sibling temporary file, so a failed
/// write never leaves a truncated target behind.
pub fn write_replacing(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut temp_name = path.file_name().map(|name| name.to_os_string()).unwrap_or_default();
    temp_name.push(".partial");
    let temp_path = path.with_file_name(temp_name);

    let io_error = |source| AnnotatorError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Err(err) = std::fs::write(&temp_path, bytes) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(io_error(err));
    }
    if let Err(err) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(io_error(err));
    }
    Ok(())
}

/// Check if a path looks like an image based on its extension
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// An image file dropped onto the window.
#[derive(Debug, Clone)]
pub enum DroppedImage {
    /// Contents already in memory (e.g. on platforms without paths)
    Bytes { name: String, bytes: std::sync::Arc<[u8]> },
    Path(PathBuf),
}

impl DroppedImage {
    pub fn name(&self) -> String {
        match self {
            Self::Bytes { name, .. } => name.clone(),
            Self::Path(path) => path.display().to_string(),
        }
    }

    pub fn read(&self) -> Result<Vec<u8>> {
        match self {
            Self::Bytes { bytes, .. } => Ok(bytes.to_vec()),
            Self::Path(path) => read_file(path),
        }
    }
}

/// Picks the first image out of the files dropped this frame.
pub fn take_dropped_image(ctx: &egui::Context) -> Option<DroppedImage> {
    let dropped = ctx.input(|i| i.raw.dropped_files.clone());

    for file in dropped {
        let looks_like_image = file.mime.starts_with("image/")
            || file.path.as_deref().is_some_and(is_image_path)
            || is_image_path(Path::new(&file.name));

        if !looks_like_image {
            log::warn!("Dropped file is not a supported type: {}", file.name);
            continue;
        }

        if let Some(bytes) = file.bytes {
            return Some(DroppedImage::Bytes {
                name: file.name,
                bytes,
            });
        }
        if let Some(path) = file.path {
            return Some(DroppedImage::Path(path));
        }
        log::warn!("Dropped file has no accessible data: {}", file.name);
    }
    None
}

/// Darken the window and list the files being dragged over it.
pub fn preview_files_being_dropped(ctx: &egui::Context) {
    use egui::{Align2, Color32, Id, LayerId, Order, TextStyle};

    if ctx.input(|i| i.raw.hovered_files.is_empty()) {
        return;
    }

    let text = ctx.input(|i| {
        let mut text = "Drop to open:\n".to_owned();
        for file in &i.raw.hovered_files {
            match &file.path {
                Some(path) => text += &format!("\n{}", path.display()),
                None => text += "\n(Path not available)",
            }
        }
        text
    });

    let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
    let screen_rect = ctx.screen_rect();
    painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
    painter.text(
        screen_rect.center(),
        Align2::CENTER_CENTER,
        text,
        TextStyle::Heading.resolve(&ctx.style()),
        Color32::WHITE,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "eframe_annotator_{}_{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_image_path_detection() {
        assert!(is_image_path(Path::new("shot.PNG")));
        assert!(is_image_path(Path::new("/tmp/a.jpeg")));
        assert!(!is_image_path(Path::new("notes.txt")));
        assert!(!is_image_path(Path::new("no_extension")));
    }

    #[test]
    fn test_write_replacing_overwrites_and_cleans_up() {
        let dir = scratch_dir("write");
        let target = dir.join("out.png");
        write_replacing(&target, b"first").unwrap();
        write_replacing(&target, b"second").unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"second");
        assert!(!dir.join("out.png.partial").exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let target = Path::new("/definitely/missing/dir/out.png");
        assert!(matches!(
            write_replacing(target, b"data"),
            Err(AnnotatorError::Io { .. })
        ));
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        assert!(matches!(
            read_file(Path::new("/definitely/missing.png")),
            Err(AnnotatorError::Io { .. })
        ));
    }
}
