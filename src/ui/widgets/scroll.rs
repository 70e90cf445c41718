/// Viewport scroll state for the dropdown panel.
#[derive(Debug, Default, Clone)]
pub struct PanelScroll {
    pub offset: usize,
    len: usize,
}

impl PanelScroll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the total number of rows. Clamps the offset if needed.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if self.offset >= len && len > 0 {
            self.offset = len - 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn scroll_down(&mut self, visible_height: usize) {
        let max = self.len.saturating_sub(visible_height);
        if self.offset < max {
            self.offset += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    /// True when the last row sits inside the viewport, i.e. the scroll
    /// position has reached the end of the content.
    pub fn at_bottom(&self, visible_height: usize) -> bool {
        self.offset + visible_height >= self.len
    }

    /// Absolute row index for a visible row (relative to the inner area).
    pub fn row_at(&self, visible_row: usize) -> Option<usize> {
        let target = self.offset + visible_row;
        (target < self.len).then_some(target)
    }
}
