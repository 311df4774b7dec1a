use egui::Pos2;

/// Tracks one freehand drag in draw mode, from pointer-down to pointer-up.
///
/// The anchor always holds the last processed pointer position, so a stroke
/// is painted as a polyline of short segments, one per pointer move.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StrokeSession {
    active: bool,
    anchor: Pos2,
    has_moved: bool,
}

impl StrokeSession {
    pub fn begin(&mut self, pos: Pos2) {
        self.active = true;
        self.anchor = pos;
        self.has_moved = false;
    }

    /// Returns the segment to paint, anchor to `pos`, and moves the anchor.
    /// `None` when no stroke is in progress.
    pub fn advance(&mut self, pos: Pos2) -> Option<(Pos2, Pos2)> {
        if !self.active {
            return None;
        }
        let from = self.anchor;
        self.anchor = pos;
        self.has_moved = true;
        Some((from, pos))
    }

    /// Ends the stroke. Returns whether it was a drag rather than a click,
    /// or `None` if no stroke was in progress.
    pub fn finish(&mut self) -> Option<bool> {
        if !self.active {
            return None;
        }
        let moved = self.has_moved;
        *self = Self::default();
        Some(moved)
    }

    /// Abandons the stroke. Returns true when segments had already been
    /// painted.
    pub fn cancel(&mut self) -> bool {
        let painted = self.active && self.has_moved;
        *self = Self::default();
        painted
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    pub fn anchor(&self) -> Pos2 {
        self.anchor
    }
}
