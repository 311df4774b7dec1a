use crate::AnnotatorApp;

pub fn status_bar(app: &mut AnnotatorApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let engine = app.engine();
            if let Some(buffer) = engine.buffer() {
                ui.label(format!("{} x {}", buffer.width(), buffer.height()));
                ui.separator();
                let history = engine.history();
                if let Some(cursor) = history.cursor() {
                    ui.label(format!("History {}/{}", cursor + 1, history.len()));
                    ui.separator();
                }
            }
            ui.label(engine.mode().tooltip());

            if let Some(status) = app.status() {
                ui.separator();
                ui.label(status);
            }
        });
    });
}
