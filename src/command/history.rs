use crate::raster::RasterBuffer;

pub const DEFAULT_CAPACITY: usize = 20;

/// Bounded, linear undo/redo log of whole-buffer snapshots.
///
/// `cursor` marks the snapshot matching the live buffer; every entry after
/// it is redo-able until the next push truncates them. When full, the oldest
/// snapshot is evicted and the remaining ones shift down by one.
#[derive(Debug)]
pub struct HistoryStack {
    entries: Vec<RasterBuffer>,
    cursor: Option<usize>,
    capacity: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl HistoryStack {
    /// Create an empty history. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Vec::with_capacity(capacity),
            cursor: None,
            capacity,
        }
    }

    pub fn reset(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    /// Record a copy of `buffer` as the newest checkpoint.
    pub fn push(&mut self, buffer: &RasterBuffer) {
        match self.cursor {
            None => {
                self.entries.clear();
                self.entries.push(buffer.copy());
            }
            Some(cursor) => {
                // Branch overwrite: whatever was redo-able is gone for good.
                self.entries.truncate(cursor + 1);
                if self.entries.len() >= self.capacity {
                    self.entries.remove(0);
                }
                self.entries.push(buffer.copy());
            }
        }
        self.cursor = Some(self.entries.len() - 1);
        log::debug!(
            "History checkpoint {} of {} (capacity {})",
            self.entries.len() - 1,
            self.entries.len(),
            self.capacity
        );
    }

    /// Overwrite the snapshot under the cursor, or seed an empty history.
    /// Redo entries are left untouched.
    pub fn replace_current(&mut self, buffer: &RasterBuffer) {
        match self.cursor {
            Some(cursor) => self.entries[cursor] = buffer.copy(),
            None => self.push(buffer),
        }
    }

    /// Step back one checkpoint, returning a copy of the snapshot now under
    /// the cursor. `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<RasterBuffer> {
        let cursor = self.cursor.filter(|&cursor| cursor > 0)? - 1;
        self.cursor = Some(cursor);
        Some(self.entries[cursor].copy())
    }

    /// Step forward one checkpoint. `None` when nothing is redo-able.
    pub fn redo(&mut self) -> Option<RasterBuffer> {
        let high_water = self.high_water()?;
        let cursor = self.cursor.filter(|&cursor| cursor < high_water)? + 1;
        self.cursor = Some(cursor);
        Some(self.entries[cursor].copy())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|cursor| cursor > 0)
    }

    pub fn can_redo(&self) -> bool {
        match (self.cursor, self.high_water()) {
            (Some(cursor), Some(high_water)) => cursor < high_water,
            _ => false,
        }
    }

    pub fn current(&self) -> Option<&RasterBuffer> {
        self.cursor.map(|cursor| &self.entries[cursor])
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Furthest index reachable by redo.
    pub fn high_water(&self) -> Option<usize> {
        self.entries.len().checked_sub(1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
