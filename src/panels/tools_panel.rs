use egui::color_picker::{Alpha, color_edit_button_srgba};

use crate::AnnotatorApp;
use crate::command::EditorCommand;
use crate::font::{FontSpec, MAX_FONT_SIZE, MIN_FONT_SIZE};
use crate::settings::{MAX_PEN_WIDTH, MIN_PEN_WIDTH};
use crate::tools::ToolMode;

const FONT_FAMILIES: &[&str] = &["Sans", "Serif", "Monospace"];

/// Toolbar buttons that act on the app rather than on the pen.
enum ToolbarAction {
    Open,
    Save,
    Copy,
    Paste,
    Command(EditorCommand),
}

pub fn tools_panel(app: &mut AnnotatorApp, ctx: &egui::Context) {
    let mut actions = Vec::new();
    let mut pen = app.engine().pen().clone();

    egui::TopBottomPanel::top("tools_panel").show(ctx, |ui| {
        ui.horizontal_wrapped(|ui| {
            let engine = app.engine();
            let has_image = engine.has_image();

            if ui.button("Open").on_hover_text("Ctrl+O").clicked() {
                actions.push(ToolbarAction::Open);
            }
            if ui
                .add_enabled(has_image, egui::Button::new("Save"))
                .on_hover_text("Save as PNG (Ctrl+S)")
                .clicked()
            {
                actions.push(ToolbarAction::Save);
            }
            if ui
                .add_enabled(has_image, egui::Button::new("Copy"))
                .on_hover_text("Ctrl+C")
                .clicked()
            {
                actions.push(ToolbarAction::Copy);
            }
            if ui.button("Paste").on_hover_text("Ctrl+V").clicked() {
                actions.push(ToolbarAction::Paste);
            }
            ui.separator();

            for command in [EditorCommand::Undo, EditorCommand::Redo] {
                if ui
                    .add_enabled(command.is_enabled(engine), egui::Button::new(command.label()))
                    .clicked()
                {
                    actions.push(ToolbarAction::Command(command));
                }
            }
            ui.separator();

            for mode in ToolMode::ALL {
                if ui
                    .selectable_label(engine.mode() == mode, mode.name())
                    .on_hover_text(mode.tooltip())
                    .clicked()
                {
                    log::info!("Tool selected from UI: {}", mode.name());
                    actions.push(ToolbarAction::Command(EditorCommand::SelectTool(mode)));
                }
            }
            if engine.mode() == ToolMode::Crop {
                let crop = EditorCommand::CommitCrop;
                if ui
                    .add_enabled(crop.is_enabled(engine), egui::Button::new(crop.label()))
                    .on_hover_text("Crop to the selection (Enter)")
                    .clicked()
                {
                    actions.push(ToolbarAction::Command(crop));
                }
            }
            ui.separator();

            ui.label("Color:");
            color_edit_button_srgba(ui, &mut pen.color, Alpha::OnlyBlend);

            ui.label("Width:");
            ui.add(egui::Slider::new(&mut pen.pen_width, MIN_PEN_WIDTH..=MAX_PEN_WIDTH));

            ui.label("Font:");
            font_picker(ui, &mut pen.font);
        });
    });

    app.set_pen(pen);
    for action in actions {
        match action {
            ToolbarAction::Open => app.open_image(),
            ToolbarAction::Save => app.save_image(),
            ToolbarAction::Copy => app.copy_image(),
            ToolbarAction::Paste => app.paste_image(),
            ToolbarAction::Command(command) => app.execute(command),
        }
    }
}

fn font_picker(ui: &mut egui::Ui, font: &mut FontSpec) {
    egui::ComboBox::from_id_salt("font_family")
        .selected_text(font.family.as_str())
        .show_ui(ui, |ui| {
            for family in FONT_FAMILIES {
                ui.selectable_value(&mut font.family, (*family).to_owned(), *family);
            }
        });
    ui.add(
        egui::DragValue::new(&mut font.size)
            .range(MIN_FONT_SIZE..=MAX_FONT_SIZE)
            .speed(0.5)
            .suffix(" px"),
    );
}
