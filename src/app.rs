use egui::Pos2;

use crate::cli::Cli;
use crate::clipboard::SystemClipboard;
use crate::command::EditorCommand;
use crate::engine::{CanvasEvent, EditEngine};
use crate::error::AnnotatorError;
use crate::file_handler::{self, DEFAULT_SAVE_NAME, FilePrompt, ImageCrateCodec, NativeFilePrompt};
use crate::input::{self, CanvasInput, PointerSample, ShortcutAction};
use crate::panels::{central_panel, status_bar, tools_panel};
use crate::prompt::{AnsweredPrompt, TEXT_PROMPT_TITLE};
use crate::renderer::CanvasRenderer;
use crate::settings::PenSettings;
use crate::surface::EguiSurface;
use crate::tools::ToolMode;

/// Text typed into the "Enter Text" modal, for a click at `pos`.
#[derive(Debug, Clone)]
struct PendingText {
    pos: Pos2,
    text: String,
    focus_requested: bool,
}

/// Only the pen settings are persisted; image, history and tool mode always
/// start fresh.
pub struct AnnotatorApp {
    engine: EditEngine<EguiSurface>,
    renderer: CanvasRenderer,
    input: CanvasInput,
    codec: ImageCrateCodec,
    files: NativeFilePrompt,
    clipboard: SystemClipboard,
    pending_text: Option<PendingText>,
    status: Option<String>,
}

impl AnnotatorApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, cli: Cli) -> Self {
        let remembered = cc
            .storage
            .and_then(|storage| eframe::get_value::<PenSettings>(storage, eframe::APP_KEY));
        let config = cli.editor_config(remembered);
        log::debug!("Starting with {:?}", config);

        let mut app = Self {
            engine: EditEngine::new(config, EguiSurface::new(cc.egui_ctx.clone())),
            renderer: CanvasRenderer::new(),
            input: CanvasInput::new(),
            codec: ImageCrateCodec,
            files: NativeFilePrompt,
            clipboard: SystemClipboard::new(),
            pending_text: None,
            status: None,
        };

        match &cli.image {
            Some(path) => {
                if let Err(err) = app.engine.load_file(&app.codec, path) {
                    app.report("open image", err);
                }
            }
            None => {
                if !app.engine.load_from_clipboard(&mut app.clipboard) {
                    app.status = Some("Open an image or paste one from the clipboard".to_owned());
                }
            }
        }
        app
    }

    pub fn engine(&self) -> &EditEngine<EguiSurface> {
        &self.engine
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn paint_canvas(&mut self, painter: &egui::Painter, image_rect: egui::Rect) {
        self.renderer.render(
            painter,
            image_rect,
            self.engine.buffer(),
            self.engine.revision(),
            self.engine.selection_overlay(),
        );
    }

    fn report(&mut self, action: &str, err: AnnotatorError) {
        log::error!("Failed to {}: {}", action, err);
        self.status = Some(format!("Failed to {}: {}", action, err));
    }

    /// Run a command, surfacing any error in the status line.
    pub fn execute(&mut self, command: EditorCommand) {
        match command.execute(&mut self.engine) {
            Ok(_) => {
                if matches!(command, EditorCommand::SelectTool(_)) {
                    self.pending_text = None;
                }
            }
            Err(err) => self.report(&command.label().to_lowercase(), err),
        }
    }

    pub fn set_pen(&mut self, pen: PenSettings) {
        if &pen != self.engine.pen() {
            self.engine.set_pen(pen);
        }
    }

    pub fn open_image(&mut self) {
        let Some(path) = self.files.prompt_open() else {
            return;
        };
        match self.engine.load_file(&self.codec, &path) {
            Ok(()) => self.status = None,
            Err(err) => self.report("open image", err),
        }
    }

    pub fn save_image(&mut self) {
        if !self.engine.has_image() {
            return;
        }
        let Some(path) = self.files.prompt_save(DEFAULT_SAVE_NAME) else {
            return;
        };
        match self.engine.save_png(&self.codec, &path) {
            Ok(_) => self.status = Some(format!("Saved {}", path.display())),
            Err(err) => self.report("save image", err),
        }
    }

    pub fn copy_image(&mut self) {
        match self.engine.copy_to_clipboard(&mut self.clipboard) {
            Ok(true) => self.status = Some("Copied image to clipboard".to_owned()),
            Ok(false) => {}
            Err(err) => self.report("copy image", err),
        }
    }

    pub fn paste_image(&mut self) {
        if self.engine.load_from_clipboard(&mut self.clipboard) {
            self.status = None;
        } else {
            self.status = Some("Clipboard holds no image".to_owned());
        }
    }

    /// Route canvas pointer input to the engine. Text clicks open the modal
    /// instead; the press is replayed once the text is known.
    pub fn handle_canvas_input(&mut self, sample: PointerSample, image_rect: egui::Rect, hovered: bool) {
        if self.pending_text.is_some() {
            self.input.reset();
            return;
        }

        for event in self.input.process(sample, image_rect, hovered) {
            match event {
                CanvasEvent::PointerDown(pos)
                    if self.engine.mode() == ToolMode::Text && self.engine.has_image() =>
                {
                    self.pending_text = Some(PendingText {
                        pos,
                        text: String::new(),
                        focus_requested: false,
                    });
                }
                event => self
                    .engine
                    .handle_event(event, &mut AnsweredPrompt::cancelled()),
            }
        }
    }

    fn text_modal(&mut self, ctx: &egui::Context) {
        let Some(pending) = &mut self.pending_text else {
            return;
        };

        let mut answer: Option<Option<String>> = None;
        egui::Window::new(TEXT_PROMPT_TITLE)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                let response = ui.text_edit_singleline(&mut pending.text);
                if !pending.focus_requested {
                    response.request_focus();
                    pending.focus_requested = true;
                }
                let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() || entered {
                        answer = Some(Some(pending.text.clone()));
                    }
                    if ui.button("Cancel").clicked() {
                        answer = Some(None);
                    }
                });
            });
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            answer = Some(None);
        }

        if let Some(answer) = answer {
            let pos = pending.pos;
            self.pending_text = None;
            self.engine
                .handle_event(CanvasEvent::PointerDown(pos), &mut AnsweredPrompt::new(answer));
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if self.pending_text.is_some() {
            return;
        }
        for action in input::collect_shortcuts(ctx) {
            match action {
                ShortcutAction::Command(command) => self.execute(command),
                ShortcutAction::Open => self.open_image(),
                ShortcutAction::Save => self.save_image(),
                ShortcutAction::Copy => self.copy_image(),
                ShortcutAction::Paste => self.paste_image(),
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        file_handler::preview_files_being_dropped(ctx);

        let Some(dropped) = file_handler::take_dropped_image(ctx) else {
            return;
        };
        log::info!("Opening dropped file {}", dropped.name());
        let loaded = dropped
            .read()
            .and_then(|bytes| self.engine.load_bytes(&self.codec, &bytes));
        match loaded {
            Ok(()) => {
                self.pending_text = None;
                self.status = None;
            }
            Err(err) => self.report("open dropped image", err),
        }
    }
}

impl eframe::App for AnnotatorApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self.engine.pen());
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.handle_shortcuts(ctx);

        tools_panel(self, ctx);
        status_bar(self, ctx);
        central_panel(self, ctx);

        self.text_modal(ctx);
    }
}
