//! The editing state machine.
//!
//! `EditEngine` owns the live raster buffer, the undo history, the active
//! tool and the gesture in progress. Pointer events are dispatched on the
//! active [`ToolMode`]:
//!
//! ```text
//!            pointer down          pointer move            pointer up
//! Draw   anchor + seed slot   paint anchor->pos segment   checkpoint if moved
//! Text   prompt, stamp text,          -                        -
//!        checkpoint
//! Crop   anchor selection      move free corner        enable commit if > 1px
//! ```
//!
//! Every path that changes the live buffer bumps [`EditEngine::revision`]
//! and asks the surface for a redraw.

use egui::{Color32, Pos2, Rect};
use std::path::Path;

use crate::clipboard::ClipboardImageSource;
use crate::command::HistoryStack;
use crate::error::Result;
use crate::file_handler::{self, ImageCodec};
use crate::font::{FontBook, FontSpec};
use crate::prompt::{TEXT_PROMPT_TITLE, TextPrompt};
use crate::raster::RasterBuffer;
use crate::settings::{EditorConfig, PenSettings};
use crate::surface::{NullSurface, Surface};
use crate::tools::{CropSelection, StrokeSession, ToolMode};

/// Pointer input in canvas-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasEvent {
    PointerDown(Pos2),
    PointerMove(Pos2),
    PointerUp(Pos2),
}

impl CanvasEvent {
    pub fn position(&self) -> Pos2 {
        match self {
            Self::PointerDown(pos) | Self::PointerMove(pos) | Self::PointerUp(pos) => *pos,
        }
    }
}

#[derive(Debug)]
pub struct EditEngine<S: Surface = NullSurface> {
    buffer: Option<RasterBuffer>,
    history: HistoryStack,
    mode: ToolMode,
    stroke: StrokeSession,
    selection: CropSelection,
    pen: PenSettings,
    fonts: FontBook,
    surface: S,
    revision: u64,
}

impl Default for EditEngine<NullSurface> {
    fn default() -> Self {
        Self::new(EditorConfig::default(), NullSurface)
    }
}

impl<S: Surface> EditEngine<S> {
    pub fn new(config: EditorConfig, mut surface: S) -> Self {
        let mode = ToolMode::default();
        surface.set_cursor_hint(mode.cursor_hint());
        Self {
            buffer: None,
            history: HistoryStack::new(config.history_capacity),
            mode,
            stroke: StrokeSession::default(),
            selection: CropSelection::default(),
            pen: config.pen.sanitized(),
            fonts: FontBook::new(config.font_file),
            surface,
            revision: 0,
        }
    }

    // --- Queries ---------------------------------------------------------

    pub fn buffer(&self) -> Option<&RasterBuffer> {
        self.buffer.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.buffer.is_some()
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    pub fn pen(&self) -> &PenSettings {
        &self.pen
    }

    pub fn stroke(&self) -> &StrokeSession {
        &self.stroke
    }

    pub fn selection(&self) -> &CropSelection {
        &self.selection
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Incremented whenever the live buffer changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn can_commit_crop(&self) -> bool {
        self.buffer.is_some() && self.selection.can_commit()
    }

    /// Selection rectangle to draw over the canvas, in crop mode only.
    pub fn selection_overlay(&self) -> Option<Rect> {
        if self.mode == ToolMode::Crop && self.buffer.is_some() {
            self.selection.overlay_rect()
        } else {
            None
        }
    }

    // --- Loading and saving ----------------------------------------------

    /// Replace the image. History restarts with the new image as its only
    /// snapshot.
    pub fn load_image(&mut self, buffer: RasterBuffer) {
        log::info!("Loaded {}x{} image", buffer.width(), buffer.height());
        self.stroke.cancel();
        self.selection.clear();
        self.history.reset();
        self.history.push(&buffer);
        self.buffer = Some(buffer);
        self.touch();
    }

    pub fn load_bytes(&mut self, codec: &dyn ImageCodec, bytes: &[u8]) -> Result<()> {
        let buffer = codec.decode(bytes)?;
        self.load_image(buffer);
        Ok(())
    }

    pub fn load_file(&mut self, codec: &dyn ImageCodec, path: &Path) -> Result<()> {
        let bytes = file_handler::read_file(path)?;
        let buffer = codec.decode(&bytes)?;
        log::info!("Opened {}", path.display());
        self.load_image(buffer);
        Ok(())
    }

    /// Load whatever image the clipboard holds. Returns false, leaving the
    /// current image alone, when there is none.
    pub fn load_from_clipboard(&mut self, clipboard: &mut dyn ClipboardImageSource) -> bool {
        match clipboard.read_image() {
            Some(buffer) => {
                self.load_image(buffer);
                true
            }
            None => {
                log::info!("Clipboard holds no image");
                false
            }
        }
    }

    /// Write the live buffer as PNG. Returns false when there is no image.
    pub fn save_png(&self, codec: &dyn ImageCodec, path: &Path) -> Result<bool> {
        let Some(buffer) = &self.buffer else {
            return Ok(false);
        };
        let bytes = codec.encode(buffer, image::ImageFormat::Png)?;
        file_handler::write_replacing(path, &bytes)?;
        log::info!("Saved {}", path.display());
        Ok(true)
    }

    /// Put the live buffer on the clipboard. Returns false when there is no
    /// image.
    pub fn copy_to_clipboard(&self, clipboard: &mut dyn ClipboardImageSource) -> Result<bool> {
        let Some(buffer) = &self.buffer else {
            return Ok(false);
        };
        clipboard.write_image(buffer)?;
        Ok(true)
    }

    // --- Tool settings ---------------------------------------------------

    pub fn set_mode(&mut self, mode: ToolMode) {
        if mode == self.mode {
            return;
        }
        log::debug!("Tool mode {:?} -> {:?}", self.mode, mode);
        self.cancel_stroke();
        self.selection.clear();
        self.mode = mode;
        self.surface.set_cursor_hint(mode.cursor_hint());
        self.surface.request_redraw();
    }

    pub fn set_color(&mut self, color: Color32) {
        self.pen.color = color;
    }

    pub fn set_pen_width(&mut self, width: u32) {
        self.pen.pen_width = PenSettings::clamp_pen_width(width);
    }

    pub fn set_font(&mut self, font: FontSpec) {
        self.pen.font = FontSpec::new(font.family, font.size);
    }

    pub fn set_pen(&mut self, pen: PenSettings) {
        self.pen = pen.sanitized();
    }

    // --- Pointer protocol ------------------------------------------------

    pub fn handle_event(&mut self, event: CanvasEvent, prompt: &mut dyn TextPrompt) {
        match event {
            CanvasEvent::PointerDown(pos) => self.pointer_down(pos, prompt),
            CanvasEvent::PointerMove(pos) => self.pointer_move(pos),
            CanvasEvent::PointerUp(pos) => self.pointer_up(pos),
        }
    }

    pub fn pointer_down(&mut self, pos: Pos2, prompt: &mut dyn TextPrompt) {
        let Some(buffer) = &self.buffer else {
            return;
        };

        match self.mode {
            ToolMode::Text => self.stamp_text(pos, prompt),
            ToolMode::Crop => {
                self.selection.begin(pos);
                self.surface.request_redraw();
            }
            ToolMode::Draw => {
                self.stroke.begin(pos);
                // The slot under the cursor holds the pre-stroke image, so an
                // abandoned stroke can be rolled back from it.
                self.history.replace_current(buffer);
            }
        }
    }

    pub fn pointer_move(&mut self, pos: Pos2) {
        let Some(buffer) = &mut self.buffer else {
            return;
        };

        match self.mode {
            ToolMode::Text => {}
            ToolMode::Crop => {
                if self.selection.update(pos) {
                    self.surface.request_redraw();
                }
            }
            ToolMode::Draw => {
                if let Some((from, to)) = self.stroke.advance(pos) {
                    buffer.paint_stroke(from, to, self.pen.color, self.pen.pen_width as f32);
                    self.touch();
                }
            }
        }
    }

    pub fn pointer_up(&mut self, pos: Pos2) {
        let Some(buffer) = &self.buffer else {
            return;
        };

        match self.mode {
            ToolMode::Text => {}
            ToolMode::Crop => {
                if self.selection.is_selecting() {
                    let valid = self.selection.finish(pos);
                    log::debug!("Crop selection {:?} (valid: {})", self.selection.region(), valid);
                    self.surface.request_redraw();
                }
            }
            ToolMode::Draw => {
                if self.stroke.finish() == Some(true) {
                    self.history.push(buffer);
                    self.surface.request_redraw();
                }
            }
        }
    }

    fn stamp_text(&mut self, pos: Pos2, prompt: &mut dyn TextPrompt) {
        let Some(buffer) = &mut self.buffer else {
            return;
        };
        if self.history.is_empty() {
            self.history.push(buffer);
        }

        let text = match prompt.prompt(TEXT_PROMPT_TITLE) {
            Some(text) if !text.is_empty() => text,
            _ => {
                log::debug!("Text entry cancelled");
                return;
            }
        };

        let face = match self.fonts.face(&self.pen.font) {
            Ok(face) => face,
            Err(err) => {
                log::warn!("Cannot stamp text: {}", err);
                return;
            }
        };

        buffer.paint_text(pos, &text, self.pen.color, &face);
        self.history.push(buffer);
        self.touch();
    }

    // --- Explicit actions ------------------------------------------------

    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.cancel_stroke();
        match self.history.undo() {
            Some(snapshot) => {
                self.buffer = Some(snapshot);
                self.touch();
                true
            }
            None => false,
        }
    }

    /// Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.cancel_stroke();
        match self.history.redo() {
            Some(snapshot) => {
                self.buffer = Some(snapshot);
                self.touch();
                true
            }
            None => false,
        }
    }

    /// Crop the live buffer to the current selection.
    ///
    /// Returns `Ok(false)` when no valid selection is pending. A selection
    /// lying entirely past the right or bottom edge fails with
    /// [`AnnotatorError::Bounds`](crate::error::AnnotatorError::Bounds) and
    /// changes nothing.
    pub fn commit_crop(&mut self) -> Result<bool> {
        if !self.can_commit_crop() {
            return Ok(false);
        }
        self.cancel_stroke();
        let Some(buffer) = &self.buffer else {
            return Ok(false);
        };

        let (x, y, width, height) = self.selection.region();
        let cropped = buffer.subregion(x, y, width, height)?;
        log::debug!(
            "Cropped to {}x{} at {},{}",
            cropped.width(),
            cropped.height(),
            x.max(0),
            y.max(0)
        );

        if self.history.is_empty() {
            self.history.push(buffer);
        }
        self.history.push(&cropped);
        self.buffer = Some(cropped);
        self.selection.clear();
        self.touch();
        Ok(true)
    }

    pub fn clear_selection(&mut self) {
        if self.selection != CropSelection::default() {
            self.selection.clear();
            self.surface.request_redraw();
        }
    }

    /// Abandon a drag stroke, restoring the image it started from.
    fn cancel_stroke(&mut self) {
        if self.stroke.cancel() {
            if let Some(snapshot) = self.history.current() {
                self.buffer = Some(snapshot.copy());
                self.touch();
            }
        }
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        self.surface.request_redraw();
    }
}
