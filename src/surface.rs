use crate::tools::CursorHint;

/// The drawing surface the engine reports to.
///
/// Redraw requests are idempotent; several requests before the next paint
/// collapse into one repaint.
pub trait Surface {
    fn request_redraw(&mut self);

    fn set_cursor_hint(&mut self, hint: CursorHint);
}

/// A surface that ignores everything, for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn request_redraw(&mut self) {}

    fn set_cursor_hint(&mut self, _hint: CursorHint) {}
}

/// Surface backed by an egui context.
///
/// egui wants the cursor icon set every frame, so the hint is stored here
/// and applied by the canvas while it is hovered.
#[derive(Debug, Clone)]
pub struct EguiSurface {
    ctx: egui::Context,
    cursor: CursorHint,
}

impl EguiSurface {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            cursor: CursorHint::default(),
        }
    }

    pub fn cursor_icon(&self) -> egui::CursorIcon {
        match self.cursor {
            CursorHint::Crosshair => egui::CursorIcon::Crosshair,
            CursorHint::Text => egui::CursorIcon::Text,
        }
    }
}

impl Surface for EguiSurface {
    fn request_redraw(&mut self) {
        self.ctx.request_repaint();
    }

    fn set_cursor_hint(&mut self, hint: CursorHint) {
        self.cursor = hint;
    }
}
