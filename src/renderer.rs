use egui::{Color32, Rect, Stroke, TextureHandle, TextureOptions};

use crate::raster::RasterBuffer;

/// Alpha of the mask laid over the area a crop would discard.
const MASK_ALPHA: u8 = 128;

/// The parts of `bounds` outside `selection`, as up to four rectangles
/// (top, bottom, left, right).
///
/// Filling these gives the even-odd "dim everything but the selection"
/// effect without a path fill.
pub fn mask_rects(bounds: Rect, selection: Rect) -> Vec<Rect> {
    let inner = bounds.intersect(selection);
    if !inner.is_positive() {
        return vec![bounds];
    }

    [
        Rect::from_min_max(bounds.min, egui::pos2(bounds.max.x, inner.min.y)),
        Rect::from_min_max(egui::pos2(bounds.min.x, inner.max.y), bounds.max),
        Rect::from_min_max(
            egui::pos2(bounds.min.x, inner.min.y),
            egui::pos2(inner.min.x, inner.max.y),
        ),
        Rect::from_min_max(
            egui::pos2(inner.max.x, inner.min.y),
            egui::pos2(bounds.max.x, inner.max.y),
        ),
    ]
    .into_iter()
    .filter(|rect| rect.is_positive())
    .collect()
}

/// Draws the live buffer and the crop overlay.
///
/// The GPU texture is re-uploaded only when the engine revision changes.
#[derive(Default)]
pub struct CanvasRenderer {
    texture: Option<TextureHandle>,
    revision: Option<u64>,
}

impl std::fmt::Debug for CanvasRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasRenderer")
            .field("has_texture", &self.texture.is_some())
            .field("revision", &self.revision)
            .finish()
    }
}

impl CanvasRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revision of the buffer currently uploaded, if any.
    pub fn uploaded_revision(&self) -> Option<u64> {
        self.revision
    }

    fn texture_for(&mut self, ctx: &egui::Context, buffer: &RasterBuffer, revision: u64) -> egui::TextureId {
        let stale = self.revision != Some(revision);
        let texture = match self.texture.take() {
            Some(mut texture) => {
                if stale {
                    texture.set(buffer.to_color_image(), TextureOptions::NEAREST);
                }
                texture
            }
            None => ctx.load_texture("canvas", buffer.to_color_image(), TextureOptions::NEAREST),
        };
        self.revision = Some(revision);
        let id = texture.id();
        self.texture = Some(texture);
        id
    }

    /// Paint one frame. `image_rect` is where the buffer lands on screen at
    /// 1:1; `selection` is in buffer coordinates.
    pub fn render(
        &mut self,
        painter: &egui::Painter,
        image_rect: Rect,
        buffer: Option<&RasterBuffer>,
        revision: u64,
        selection: Option<Rect>,
    ) {
        painter.rect_filled(painter.clip_rect(), 0.0, Color32::WHITE);

        let Some(buffer) = buffer else {
            return;
        };
        let texture_id = self.texture_for(painter.ctx(), buffer, revision);
        let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        painter.image(texture_id, image_rect, uv, Color32::WHITE);

        if let Some(selection) = selection {
            let selection = selection.translate(image_rect.min.to_vec2());
            for rect in mask_rects(image_rect, selection) {
                painter.rect_filled(rect, 0.0, Color32::from_black_alpha(MASK_ALPHA));
            }
            painter.rect_stroke(selection, 0.0, Stroke::new(1.0, Color32::WHITE));
        }
    }
}
