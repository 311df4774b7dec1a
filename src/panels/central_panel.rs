use crate::AnnotatorApp;
use crate::input::PointerSample;

/// The image at 1:1, scrollable when it does not fit.
pub fn central_panel(app: &mut AnnotatorApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(egui::Color32::WHITE))
        .show(ctx, |ui| {
            egui::ScrollArea::both()
                .drag_to_scroll(false)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let size = match app.engine().buffer() {
                        Some(buffer) => buffer.size(),
                        None => ui.available_size(),
                    };
                    let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
                    let image_rect = response.rect;

                    if response.hovered() && app.engine().has_image() {
                        ctx.set_cursor_icon(app.engine().surface().cursor_icon());
                    }

                    app.handle_canvas_input(PointerSample::from_context(ctx), image_rect, response.hovered());
                    app.paint_canvas(&painter, image_rect);
                });
        });
}
