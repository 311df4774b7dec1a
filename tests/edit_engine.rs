use eframe_annotator::prompt::{AnsweredPrompt, TEXT_PROMPT_TITLE};
use eframe_annotator::{
    AnnotatorError, CanvasEvent, CursorHint, EditEngine, EditorConfig, RasterBuffer, Surface,
    ToolMode,
};
use egui::{Color32, Pos2, pos2};

const WHITE: [u8; 4] = [255, 255, 255, 255];
const RED: [u8; 4] = [255, 0, 0, 255];

/// Surface that remembers what the engine asked of it.
#[derive(Debug, Default)]
struct RecordingSurface {
    redraws: usize,
    hints: Vec<CursorHint>,
}

impl Surface for RecordingSurface {
    fn request_redraw(&mut self) {
        self.redraws += 1;
    }

    fn set_cursor_hint(&mut self, hint: CursorHint) {
        self.hints.push(hint);
    }
}

fn white(width: u32, height: u32) -> RasterBuffer {
    RasterBuffer::filled(width, height, Color32::WHITE)
}

fn engine_with(buffer: RasterBuffer) -> EditEngine<RecordingSurface> {
    let mut engine = EditEngine::new(EditorConfig::default(), RecordingSurface::default());
    engine.load_image(buffer);
    engine
}

fn no_text() -> AnsweredPrompt {
    AnsweredPrompt::cancelled()
}

fn drag<S: Surface>(engine: &mut EditEngine<S>, points: &[Pos2]) {
    let (first, rest) = points.split_first().expect("drag needs a point");
    engine.handle_event(CanvasEvent::PointerDown(*first), &mut no_text());
    for point in rest {
        engine.handle_event(CanvasEvent::PointerMove(*point), &mut no_text());
    }
    let last = points.last().copied().unwrap_or(*first);
    engine.handle_event(CanvasEvent::PointerUp(last), &mut no_text());
}

fn pixel<S: Surface>(engine: &EditEngine<S>, x: u32, y: u32) -> [u8; 4] {
    engine.buffer().and_then(|buffer| buffer.pixel(x, y)).unwrap()
}

fn dimensions<S: Surface>(engine: &EditEngine<S>) -> (u32, u32) {
    let buffer = engine.buffer().unwrap();
    (buffer.width(), buffer.height())
}

#[test]
fn test_stroke_undo_redo_scenario() {
    let mut engine = engine_with(white(100, 100));
    assert!(!engine.can_undo());

    drag(&mut engine, &[pos2(10.0, 10.0), pos2(90.0, 90.0)]);
    assert_eq!(pixel(&engine, 50, 50), RED);
    assert!(engine.can_undo());

    assert!(engine.undo());
    assert_eq!(engine.buffer(), Some(&white(100, 100)));
    assert!(engine.can_redo());

    assert!(engine.redo());
    assert_eq!(pixel(&engine, 50, 50), RED);
    assert!(!engine.can_redo());
}

#[test]
fn test_undo_then_redo_is_pixel_identical() {
    let mut engine = engine_with(white(60, 60));
    drag(&mut engine, &[pos2(5.0, 30.0), pos2(55.0, 30.0)]);
    let drawn = engine.buffer().cloned().unwrap();

    engine.undo();
    engine.redo();
    assert_eq!(engine.buffer(), Some(&drawn));
}

#[test]
fn test_crop_scenario() {
    let mut engine = engine_with(white(100, 100));
    engine.set_mode(ToolMode::Crop);

    drag(&mut engine, &[pos2(20.0, 20.0), pos2(50.0, 40.0), pos2(80.0, 60.0)]);
    assert!(engine.can_commit_crop());
    assert!(engine.commit_crop().unwrap());

    assert_eq!(dimensions(&engine), (60, 40));
    assert!(engine.can_undo());
    assert!(!engine.can_commit_crop());
    assert_eq!(engine.selection_overlay(), None);

    assert!(engine.undo());
    assert_eq!(dimensions(&engine), (100, 100));
}

#[test]
fn test_crop_outside_canvas_is_clamped_to_full_image() {
    let mut engine = engine_with(white(100, 100));
    engine.set_mode(ToolMode::Crop);

    drag(&mut engine, &[pos2(-10.0, -10.0), pos2(150.0, 150.0)]);
    assert!(engine.commit_crop().unwrap());
    assert_eq!(dimensions(&engine), (100, 100));
    assert_eq!(engine.history().len(), 2);
}

#[test]
fn test_crop_past_far_edge_fails_without_changes() {
    let mut engine = engine_with(white(100, 100));
    engine.set_mode(ToolMode::Crop);
    drag(&mut engine, &[pos2(100.0, 10.0), pos2(120.0, 50.0)]);
    let revision = engine.revision();

    let result = engine.commit_crop();
    assert!(matches!(result, Err(AnnotatorError::Bounds { .. })));
    assert_eq!(dimensions(&engine), (100, 100));
    assert_eq!(engine.history().len(), 1);
    assert_eq!(engine.revision(), revision);
}

#[test]
fn test_tiny_selection_cannot_be_committed() {
    let mut engine = engine_with(white(100, 100));
    engine.set_mode(ToolMode::Crop);
    drag(&mut engine, &[pos2(10.0, 10.0), pos2(11.0, 50.0)]);

    assert!(!engine.can_commit_crop());
    assert!(!engine.commit_crop().unwrap());
    assert_eq!(dimensions(&engine), (100, 100));
}

#[test]
fn test_selection_overlay_only_in_crop_mode() {
    let mut engine = engine_with(white(100, 100));
    engine.handle_event(CanvasEvent::PointerDown(pos2(10.0, 10.0)), &mut no_text());
    engine.handle_event(CanvasEvent::PointerMove(pos2(30.0, 30.0)), &mut no_text());
    assert_eq!(engine.selection_overlay(), None);
    engine.handle_event(CanvasEvent::PointerUp(pos2(30.0, 30.0)), &mut no_text());

    engine.set_mode(ToolMode::Crop);
    engine.handle_event(CanvasEvent::PointerDown(pos2(10.0, 10.0)), &mut no_text());
    engine.handle_event(CanvasEvent::PointerMove(pos2(30.0, 40.0)), &mut no_text());
    let overlay = engine.selection_overlay().unwrap();
    assert_eq!((overlay.width(), overlay.height()), (20.0, 30.0));

    engine.clear_selection();
    assert_eq!(engine.selection_overlay(), None);
}

#[test]
fn test_click_without_move_records_nothing() {
    let mut engine = engine_with(white(50, 50));
    let revision = engine.revision();

    drag(&mut engine, &[pos2(20.0, 20.0)]);
    assert_eq!(engine.history().len(), 1);
    assert!(!engine.can_undo());
    assert_eq!(engine.buffer(), Some(&white(50, 50)));
    assert_eq!(engine.revision(), revision);

    drag(&mut engine, &[pos2(20.0, 20.0), pos2(30.0, 30.0)]);
    assert_eq!(engine.history().len(), 2);
}

#[test]
fn test_stroke_is_a_connected_polyline() {
    let mut engine = engine_with(white(100, 100));
    drag(
        &mut engine,
        &[pos2(10.0, 10.0), pos2(50.0, 10.0), pos2(50.0, 50.0)],
    );

    assert_eq!(pixel(&engine, 30, 10), RED);
    assert_eq!(pixel(&engine, 50, 30), RED);
    // The chord between the first and last point stays untouched
    assert_eq!(pixel(&engine, 30, 30), WHITE);
    assert_eq!(engine.history().len(), 2);
}

#[test]
fn test_pen_settings_apply_to_next_stroke() {
    let mut engine = engine_with(white(100, 100));
    engine.set_color(Color32::BLUE);
    engine.set_pen_width(20);
    drag(&mut engine, &[pos2(10.0, 50.0), pos2(90.0, 50.0)]);

    assert_eq!(pixel(&engine, 50, 50), [0, 0, 255, 255]);
    assert_eq!(pixel(&engine, 50, 42), [0, 0, 255, 255]);
    assert_eq!(pixel(&engine, 50, 30), WHITE);
}

#[test]
fn test_new_edit_after_undo_discards_redo() {
    let mut engine = engine_with(white(100, 100));
    drag(&mut engine, &[pos2(10.0, 10.0), pos2(90.0, 10.0)]);
    drag(&mut engine, &[pos2(10.0, 50.0), pos2(90.0, 50.0)]);

    assert!(engine.undo());
    assert!(engine.can_redo());
    drag(&mut engine, &[pos2(10.0, 90.0), pos2(90.0, 90.0)]);

    assert!(!engine.can_redo());
    assert!(!engine.redo());
    assert_eq!(pixel(&engine, 50, 50), WHITE);
    assert_eq!(pixel(&engine, 50, 90), RED);
}

#[test]
fn test_history_capacity_limits_undo_depth() {
    let config = EditorConfig {
        history_capacity: 3,
        ..Default::default()
    };
    let mut engine = EditEngine::new(config, RecordingSurface::default());
    engine.load_image(white(100, 100));

    for row in [10.0, 30.0, 50.0, 70.0, 90.0] {
        drag(&mut engine, &[pos2(10.0, row), pos2(90.0, row)]);
    }
    assert_eq!(engine.history().len(), 3);

    assert!(engine.undo());
    assert!(engine.undo());
    assert!(!engine.undo());
    // The oldest retained snapshot still carries the first three strokes
    assert_eq!(pixel(&engine, 50, 50), RED);
    assert_eq!(pixel(&engine, 50, 70), WHITE);
}

#[test]
fn test_text_is_stamped_and_recorded() {
    let mut engine = engine_with(white(120, 60));
    engine.set_mode(ToolMode::Text);

    let mut seen_title = String::new();
    let mut prompt = |title: &str| {
        seen_title = title.to_owned();
        Some("Hello".to_owned())
    };
    engine.handle_event(CanvasEvent::PointerDown(pos2(10.0, 40.0)), &mut prompt);

    assert_eq!(seen_title, TEXT_PROMPT_TITLE);
    assert_ne!(engine.buffer(), Some(&white(120, 60)));
    assert_eq!(engine.history().len(), 2);
    assert!(engine.undo());
    assert_eq!(engine.buffer(), Some(&white(120, 60)));
}

#[test]
fn test_cancelled_or_empty_text_changes_nothing() {
    let mut engine = engine_with(white(120, 60));
    engine.set_mode(ToolMode::Text);
    let revision = engine.revision();

    engine.handle_event(CanvasEvent::PointerDown(pos2(10.0, 40.0)), &mut no_text());
    engine.handle_event(
        CanvasEvent::PointerDown(pos2(10.0, 40.0)),
        &mut AnsweredPrompt::new(Some(String::new())),
    );

    assert_eq!(engine.buffer(), Some(&white(120, 60)));
    assert_eq!(engine.history().len(), 1);
    assert_eq!(engine.revision(), revision);
}

#[test]
fn test_mode_switch_abandons_stroke_in_progress() {
    let mut engine = engine_with(white(100, 100));
    engine.handle_event(CanvasEvent::PointerDown(pos2(10.0, 10.0)), &mut no_text());
    engine.handle_event(CanvasEvent::PointerMove(pos2(90.0, 90.0)), &mut no_text());
    assert_eq!(pixel(&engine, 50, 50), RED);

    engine.set_mode(ToolMode::Crop);
    assert_eq!(engine.buffer(), Some(&white(100, 100)));
    assert!(!engine.can_undo());

    // The late release belongs to no gesture
    engine.handle_event(CanvasEvent::PointerUp(pos2(90.0, 90.0)), &mut no_text());
    assert!(!engine.can_commit_crop());
    assert_eq!(engine.history().len(), 1);
}

#[test]
fn test_undo_mid_stroke_discards_the_stroke() {
    let mut engine = engine_with(white(100, 100));
    engine.handle_event(CanvasEvent::PointerDown(pos2(10.0, 10.0)), &mut no_text());
    engine.handle_event(CanvasEvent::PointerMove(pos2(90.0, 90.0)), &mut no_text());

    assert!(!engine.undo());
    assert_eq!(engine.buffer(), Some(&white(100, 100)));
    engine.handle_event(CanvasEvent::PointerUp(pos2(90.0, 90.0)), &mut no_text());
    assert_eq!(engine.history().len(), 1);
}

#[test]
fn test_loading_resets_history() {
    let mut engine = engine_with(white(100, 100));
    drag(&mut engine, &[pos2(10.0, 10.0), pos2(90.0, 90.0)]);
    drag(&mut engine, &[pos2(90.0, 10.0), pos2(10.0, 90.0)]);
    engine.undo();

    engine.load_image(white(20, 10));
    assert_eq!(dimensions(&engine), (20, 10));
    assert_eq!(engine.history().len(), 1);
    assert!(!engine.can_undo());
    assert!(!engine.can_redo());
}

#[test]
fn test_events_without_image_are_ignored() {
    let mut engine = EditEngine::new(EditorConfig::default(), RecordingSurface::default());
    for mode in ToolMode::ALL {
        engine.set_mode(mode);
        let mut prompt = |_: &str| -> Option<String> { panic!("no prompt without an image") };
        engine.handle_event(CanvasEvent::PointerDown(pos2(5.0, 5.0)), &mut prompt);
        engine.handle_event(CanvasEvent::PointerMove(pos2(25.0, 25.0)), &mut no_text());
        engine.handle_event(CanvasEvent::PointerUp(pos2(25.0, 25.0)), &mut no_text());
    }

    assert!(!engine.has_image());
    assert!(engine.history().is_empty());
    assert!(!engine.undo());
    assert!(!engine.redo());
    assert!(!engine.commit_crop().unwrap());
    assert_eq!(engine.revision(), 0);
}

#[test]
fn test_surface_receives_cursor_hints_and_redraws() {
    let mut engine = EditEngine::new(EditorConfig::default(), RecordingSurface::default());
    assert_eq!(engine.surface().hints, vec![CursorHint::Crosshair]);

    engine.set_mode(ToolMode::Text);
    engine.set_mode(ToolMode::Text);
    engine.set_mode(ToolMode::Crop);
    assert_eq!(
        engine.surface().hints,
        vec![CursorHint::Crosshair, CursorHint::Text, CursorHint::Crosshair]
    );

    engine.set_mode(ToolMode::Draw);
    engine.load_image(white(40, 40));
    let before = engine.surface().redraws;
    engine.handle_event(CanvasEvent::PointerDown(pos2(5.0, 5.0)), &mut no_text());
    engine.handle_event(CanvasEvent::PointerMove(pos2(35.0, 35.0)), &mut no_text());
    assert!(engine.surface().redraws > before);
}
