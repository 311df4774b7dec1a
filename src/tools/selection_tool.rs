use egui::{Pos2, Rect};

/// Width and height a selection must exceed before it can be cropped to.
pub const MIN_CROP_EXTENT: i32 = 1;

/// The rectangle dragged out in crop mode, plus whether committing it is
/// currently allowed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CropSelection {
    start: Pos2,
    end: Pos2,
    selecting: bool,
    commit_enabled: bool,
}

impl CropSelection {
    /// Anchor a new selection at `pos`, disabling commit until released.
    pub fn begin(&mut self, pos: Pos2) {
        self.start = pos;
        self.end = pos;
        self.selecting = true;
        self.commit_enabled = false;
    }

    /// Move the free corner. Returns false when no drag is under way.
    pub fn update(&mut self, pos: Pos2) -> bool {
        if self.selecting {
            self.end = pos;
        }
        self.selecting
    }

    /// Finalize the drag. Returns whether the selection can be committed.
    pub fn finish(&mut self, pos: Pos2) -> bool {
        if !self.selecting {
            return false;
        }
        self.end = pos;
        self.selecting = false;
        self.commit_enabled = self.is_valid();
        self.commit_enabled
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Integer extent of the selection, truncated toward zero.
    pub fn extent(&self) -> (i32, i32) {
        (
            (self.end.x - self.start.x).abs() as i32,
            (self.end.y - self.start.y).abs() as i32,
        )
    }

    pub fn is_valid(&self) -> bool {
        let (width, height) = self.extent();
        width > MIN_CROP_EXTENT && height > MIN_CROP_EXTENT
    }

    /// Normalized `(x, y, width, height)` to hand to the raster crop.
    pub fn region(&self) -> (i32, i32, i32, i32) {
        let (width, height) = self.extent();
        (
            self.start.x.min(self.end.x) as i32,
            self.start.y.min(self.end.y) as i32,
            width,
            height,
        )
    }

    pub fn rect(&self) -> Rect {
        Rect::from_two_pos(self.start, self.end)
    }

    /// The rectangle to draw as an overlay, if any.
    pub fn overlay_rect(&self) -> Option<Rect> {
        let spans_area = self.start.x != self.end.x && self.start.y != self.end.y;
        (self.selecting || spans_area).then(|| self.rect())
    }

    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    pub fn can_commit(&self) -> bool {
        self.commit_enabled
    }
}
