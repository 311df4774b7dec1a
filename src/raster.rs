use ab_glyph::{Font, ScaleFont};
use egui::{Color32, Pos2, Vec2};
use image::{ImageFormat, Rgba, RgbaImage};
use std::fmt;
use std::io::Cursor;

use crate::error::{AnnotatorError, Result};
use crate::font::TextFace;

/// An owned RGBA8 pixel buffer, row-major, straight (unpremultiplied) alpha.
///
/// Every mutating operation works in place; callers that need to roll back
/// take a [`RasterBuffer::copy`] first. Dimensions are always positive.
#[derive(Clone, PartialEq)]
pub struct RasterBuffer {
    pixels: RgbaImage,
}

impl fmt::Debug for RasterBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterBuffer")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

impl RasterBuffer {
    /// Create a buffer of the given size filled with one color.
    /// Zero dimensions are bumped to one pixel.
    pub fn filled(width: u32, height: u32, color: Color32) -> Self {
        let pixels = RgbaImage::from_pixel(
            width.max(1),
            height.max(1),
            Rgba(color.to_srgba_unmultiplied()),
        );
        Self { pixels }
    }

    /// Wrap raw RGBA bytes. Returns `None` when the length does not match
    /// `width * height * 4` or a dimension is zero.
    pub fn from_rgba(width: u32, height: u32, bytes: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        RgbaImage::from_raw(width, height, bytes).map(|pixels| Self { pixels })
    }

    pub fn from_image(pixels: RgbaImage) -> Option<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            None
        } else {
            Some(Self { pixels })
        }
    }

    /// Decode an encoded image file (PNG, JPEG, ...) into a buffer.
    pub fn load(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes).map_err(AnnotatorError::Decode)?;
        Self::from_image(decoded.to_rgba8()).ok_or_else(|| {
            AnnotatorError::Decode(image::ImageError::Limits(image::error::LimitError::from_kind(
                image::error::LimitErrorKind::DimensionError,
            )))
        })
    }

    /// Wrap a bitmap handed over by the system clipboard.
    pub fn from_clipboard_image(data: arboard::ImageData<'_>) -> Option<Self> {
        let width = u32::try_from(data.width).ok()?;
        let height = u32::try_from(data.height).ok()?;
        Self::from_rgba(width, height, data.bytes.into_owned())
    }

    pub fn to_clipboard_image(&self) -> arboard::ImageData<'_> {
        arboard::ImageData {
            width: self.width() as usize,
            height: self.height() as usize,
            bytes: std::borrow::Cow::Borrowed(self.pixels.as_raw()),
        }
    }

    /// Deep copy. The returned buffer never shares storage with `self`.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32)
    }

    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.width() && y < self.height() {
            Some(self.pixels.get_pixel(x, y).0)
        } else {
            None
        }
    }

    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied(
            [self.width() as usize, self.height() as usize],
            self.pixels.as_raw(),
        )
    }

    /// Extract a rectangular region as a new buffer.
    ///
    /// The origin is clamped to `[0, width] x [0, height]` and the extent to
    /// `[1, width - x] x [1, height - y]`. Only an origin that ends up on the
    /// right or bottom edge, leaving no pixel to take, is an error.
    pub fn subregion(&self, x: i32, y: i32, width: i32, height: i32) -> Result<Self> {
        let image_width = self.width() as i64;
        let image_height = self.height() as i64;

        let x = (x as i64).clamp(0, image_width);
        let y = (y as i64).clamp(0, image_height);
        let max_width = image_width - x;
        let max_height = image_height - y;

        if max_width < 1 || max_height < 1 {
            return Err(AnnotatorError::Bounds {
                x: x as u32,
                y: y as u32,
                width: width.max(0) as u32,
                height: height.max(0) as u32,
                image_width: self.width(),
                image_height: self.height(),
            });
        }

        let width = (width as i64).clamp(1, max_width) as u32;
        let height = (height as i64).clamp(1, max_height) as u32;
        let pixels = image::imageops::crop_imm(&self.pixels, x as u32, y as u32, width, height)
            .to_image();
        Ok(Self { pixels })
    }

    /// Rasterize one round-capped line segment and composite it over the
    /// buffer. Consecutive segments sharing an endpoint join roundly.
    pub fn paint_stroke(&mut self, from: Pos2, to: Pos2, color: Color32, width: f32) {
        let [r, g, b, a] = color.to_srgba_unmultiplied();
        if a == 0 || !(from.is_finite() && to.is_finite()) {
            return;
        }

        let radius = width.max(1.0) * 0.5;
        let pad = radius + 1.0;
        let (min_x, max_x) = self.span(from.x.min(to.x) - pad, from.x.max(to.x) + pad, self.width());
        let (min_y, max_y) = self.span(from.y.min(to.y) - pad, from.y.max(to.y) + pad, self.height());
        let opacity = a as f32 / 255.0;

        for y in min_y..max_y {
            for x in min_x..max_x {
                let center = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
                let coverage = (radius + 0.5 - distance_to_segment(center, from, to)).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    blend_over(self.pixels.get_pixel_mut(x, y), [r, g, b], opacity * coverage);
                }
            }
        }
    }

    /// Rasterize a single line of text with its baseline starting at
    /// `position`. No wrapping; control characters are skipped.
    pub fn paint_text(&mut self, position: Pos2, text: &str, color: Color32, face: &TextFace) {
        let [r, g, b, a] = color.to_srgba_unmultiplied();
        if a == 0 || !position.is_finite() {
            return;
        }

        let font = face.font();
        let scale = face.scale();
        let scaled = font.as_scaled(scale);
        let opacity = a as f32 / 255.0;
        let (width, height) = (self.width() as i64, self.height() as i64);

        let mut caret = position.x;
        let mut previous = None;
        for ch in text.chars().filter(|ch| !ch.is_control()) {
            let id = font.glyph_id(ch);
            if let Some(previous) = previous {
                caret += scaled.kern(previous, id);
            }
            let glyph = id.with_scale_and_position(scale, ab_glyph::point(caret, position.y));
            caret += scaled.h_advance(id);
            previous = Some(id);

            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            let pixels = &mut self.pixels;
            outlined.draw(|gx, gy, coverage| {
                let x = bounds.min.x.floor() as i64 + gx as i64;
                let y = bounds.min.y.floor() as i64 + gy as i64;
                if (0..width).contains(&x) && (0..height).contains(&y) && coverage > 0.0 {
                    blend_over(
                        pixels.get_pixel_mut(x as u32, y as u32),
                        [r, g, b],
                        opacity * coverage.min(1.0),
                    );
                }
            });
        }
    }

    /// Encode into the given container format.
    pub fn encode(&self, format: ImageFormat) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.pixels
            .write_to(&mut Cursor::new(&mut bytes), format)
            .map_err(AnnotatorError::Encode)?;
        Ok(bytes)
    }

    /// Clamp a float interval to pixel indices `[start, end)` within `limit`.
    fn span(&self, start: f32, end: f32, limit: u32) -> (u32, u32) {
        let limit = limit as f32;
        let start = start.floor().clamp(0.0, limit) as u32;
        let end = end.ceil().clamp(0.0, limit) as u32;
        (start, end.max(start))
    }
}

fn distance_to_segment(point: Pos2, from: Pos2, to: Pos2) -> f32 {
    let segment = to - from;
    let length_sq = segment.length_sq();
    let t = if length_sq > 0.0 {
        ((point - from).dot(segment) / length_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (point - (from + segment * t)).length()
}

/// Source-over compositing with straight alpha.
fn blend_over(dst: &mut Rgba<u8>, src: [u8; 3], src_alpha: f32) {
    let dst_alpha = dst[3] as f32 / 255.0;
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
    if out_alpha <= f32::EPSILON {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }

    for channel in 0..3 {
        let value = (src[channel] as f32 * src_alpha
            + dst[channel] as f32 * dst_alpha * (1.0 - src_alpha))
            / out_alpha;
        dst[channel] = value.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8;
}
