use egui::{Context, Event, Key, Modifiers, PointerButton, Pos2, Rect};

use crate::command::EditorCommand;
use crate::engine::CanvasEvent;

/// Something a keyboard shortcut asks the app to do.
#[derive(Debug, Clone, PartialEq)]
pub enum ShortcutAction {
    Command(EditorCommand),
    Open,
    Save,
    Copy,
    Paste,
}

/// Map a key press to its action.
///
/// | Keys                    | Action           |
/// |-------------------------|------------------|
/// | Ctrl+Z                  | undo             |
/// | Ctrl+Shift+Z, Ctrl+Y    | redo             |
/// | Enter                   | commit crop      |
/// | Escape                  | clear selection  |
/// | Ctrl+O / Ctrl+S         | open / save      |
/// | Ctrl+C / Ctrl+V         | copy / paste     |
pub fn shortcut_for(key: Key, modifiers: Modifiers) -> Option<ShortcutAction> {
    if modifiers.alt {
        return None;
    }

    if modifiers.command {
        let action = match (key, modifiers.shift) {
            (Key::Z, false) => ShortcutAction::Command(EditorCommand::Undo),
            (Key::Z, true) | (Key::Y, false) => ShortcutAction::Command(EditorCommand::Redo),
            (Key::O, false) => ShortcutAction::Open,
            (Key::S, false) => ShortcutAction::Save,
            (Key::C, false) => ShortcutAction::Copy,
            (Key::V, false) => ShortcutAction::Paste,
            _ => return None,
        };
        return Some(action);
    }

    if modifiers.shift {
        return None;
    }
    match key {
        Key::Enter => Some(ShortcutAction::Command(EditorCommand::CommitCrop)),
        Key::Escape => Some(ShortcutAction::Command(EditorCommand::ClearSelection)),
        _ => None,
    }
}

/// Collect this frame's shortcuts.
///
/// Skipped while a text field has focus so typing is never hijacked.
pub fn collect_shortcuts(ctx: &Context) -> Vec<ShortcutAction> {
    if ctx.wants_keyboard_input() {
        return Vec::new();
    }

    ctx.input(|input| {
        input
            .events
            .iter()
            .filter_map(|event| match event {
                Event::Key {
                    key,
                    pressed: true,
                    repeat: false,
                    modifiers,
                    ..
                } => shortcut_for(*key, *modifiers),
                // Some backends turn Ctrl+C / Ctrl+V into clipboard events
                // instead of key presses.
                Event::Copy => Some(ShortcutAction::Copy),
                Event::Paste(_) => Some(ShortcutAction::Paste),
                _ => None,
            })
            .fold(Vec::new(), |mut actions, action| {
                if !actions.contains(&action) {
                    actions.push(action);
                }
                actions
            })
    })
}

/// Primary-button state for one frame, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSample {
    pub pos: Option<Pos2>,
    pub pressed: bool,
    pub released: bool,
}

impl PointerSample {
    pub fn from_context(ctx: &Context) -> Self {
        ctx.input(|input| Self {
            pos: input.pointer.latest_pos(),
            pressed: input.pointer.button_pressed(PointerButton::Primary),
            released: input.pointer.button_released(PointerButton::Primary),
        })
    }
}

/// Turns raw pointer state into canvas-local [`CanvasEvent`]s.
///
/// A press only counts when it lands on the image; once pressed, moves and
/// the release are delivered wherever the pointer goes, so strokes and
/// selections may be dragged past the image edge.
#[derive(Debug, Default)]
pub struct CanvasInput {
    dragging: bool,
    last_pos: Option<Pos2>,
}

impl CanvasInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Forget any press in progress, e.g. when a modal grabs the pointer.
    pub fn reset(&mut self) {
        self.dragging = false;
        self.last_pos = None;
    }

    /// `image_rect` is the on-screen rectangle of the image; its top-left
    /// corner is canvas coordinate (0, 0). `hovered` says whether the canvas
    /// is the topmost widget under the pointer.
    pub fn process(&mut self, sample: PointerSample, image_rect: Rect, hovered: bool) -> Vec<CanvasEvent> {
        let mut events = Vec::new();
        let to_local = |pos: Pos2| (pos - image_rect.min).to_pos2();

        if sample.pressed && !self.dragging {
            if let Some(pos) = sample.pos.filter(|pos| hovered && image_rect.contains(*pos)) {
                self.dragging = true;
                self.last_pos = Some(pos);
                events.push(CanvasEvent::PointerDown(to_local(pos)));
            }
        }

        if !self.dragging {
            return events;
        }

        if let Some(pos) = sample.pos {
            if Some(pos) != self.last_pos {
                events.push(CanvasEvent::PointerMove(to_local(pos)));
                self.last_pos = Some(pos);
            }
        }

        if sample.released {
            let pos = sample.pos.or(self.last_pos).unwrap_or(image_rect.min);
            events.push(CanvasEvent::PointerUp(to_local(pos)));
            self.reset();
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    fn image_rect() -> Rect {
        Rect::from_min_size(pos2(100.0, 50.0), vec2(200.0, 100.0))
    }

    fn sample(x: f32, y: f32) -> PointerSample {
        PointerSample {
            pos: Some(pos2(x, y)),
            ..Default::default()
        }
    }

    #[test]
    fn test_press_outside_image_is_ignored() {
        let mut input = CanvasInput::new();
        let events = input.process(
            PointerSample {
                pressed: true,
                ..sample(10.0, 10.0)
            },
            image_rect(),
            true,
        );
        assert!(events.is_empty());
        assert!(!input.is_dragging());
        assert!(input.process(sample(150.0, 60.0), image_rect(), true).is_empty());
    }

    #[test]
    fn test_press_under_another_widget_is_ignored() {
        let mut input = CanvasInput::new();
        let pressed = PointerSample {
            pressed: true,
            ..sample(150.0, 60.0)
        };
        assert!(input.process(pressed, image_rect(), false).is_empty());
    }

    #[test]
    fn test_drag_is_translated_to_image_coordinates() {
        let mut input = CanvasInput::new();
        let rect = image_rect();

        let down = input.process(
            PointerSample {
                pressed: true,
                ..sample(110.0, 60.0)
            },
            rect,
            true,
        );
        assert_eq!(down, vec![CanvasEvent::PointerDown(pos2(10.0, 10.0))]);

        // No movement, no event
        assert!(input.process(sample(110.0, 60.0), rect, true).is_empty());

        let moved = input.process(sample(130.0, 70.0), rect, true);
        assert_eq!(moved, vec![CanvasEvent::PointerMove(pos2(30.0, 20.0))]);

        // Dragging outside the image keeps reporting
        let outside = input.process(sample(400.0, 300.0), rect, false);
        assert_eq!(outside, vec![CanvasEvent::PointerMove(pos2(300.0, 250.0))]);

        let up = input.process(
            PointerSample {
                released: true,
                ..sample(400.0, 300.0)
            },
            rect,
            false,
        );
        assert_eq!(up, vec![CanvasEvent::PointerUp(pos2(300.0, 250.0))]);
        assert!(!input.is_dragging());
    }

    #[test]
    fn test_click_produces_down_and_up() {
        let mut input = CanvasInput::new();
        let events = input.process(
            PointerSample {
                pos: Some(pos2(120.0, 80.0)),
                pressed: true,
                released: true,
            },
            image_rect(),
            true,
        );
        assert_eq!(
            events,
            vec![
                CanvasEvent::PointerDown(pos2(20.0, 30.0)),
                CanvasEvent::PointerUp(pos2(20.0, 30.0)),
            ]
        );
    }

    #[test]
    fn test_release_without_position_uses_last_known() {
        let mut input = CanvasInput::new();
        input.process(
            PointerSample {
                pressed: true,
                ..sample(110.0, 60.0)
            },
            image_rect(),
            true,
        );
        let up = input.process(
            PointerSample {
                released: true,
                ..Default::default()
            },
            image_rect(),
            false,
        );
        assert_eq!(up, vec![CanvasEvent::PointerUp(pos2(10.0, 10.0))]);
    }

    #[test]
    fn test_shortcuts() {
        let ctrl = Modifiers::COMMAND;
        let ctrl_shift = Modifiers::COMMAND | Modifiers::SHIFT;

        assert_eq!(
            shortcut_for(Key::Z, ctrl),
            Some(ShortcutAction::Command(EditorCommand::Undo))
        );
        assert_eq!(
            shortcut_for(Key::Z, ctrl_shift),
            Some(ShortcutAction::Command(EditorCommand::Redo))
        );
        assert_eq!(
            shortcut_for(Key::Y, ctrl),
            Some(ShortcutAction::Command(EditorCommand::Redo))
        );
        assert_eq!(
            shortcut_for(Key::Enter, Modifiers::NONE),
            Some(ShortcutAction::Command(EditorCommand::CommitCrop))
        );
        assert_eq!(
            shortcut_for(Key::Escape, Modifiers::NONE),
            Some(ShortcutAction::Command(EditorCommand::ClearSelection))
        );
        assert_eq!(shortcut_for(Key::S, ctrl), Some(ShortcutAction::Save));
        assert_eq!(shortcut_for(Key::V, ctrl), Some(ShortcutAction::Paste));
        assert_eq!(shortcut_for(Key::Z, Modifiers::NONE), None);
        assert_eq!(shortcut_for(Key::Z, Modifiers::ALT | Modifiers::COMMAND), None);
    }
}
