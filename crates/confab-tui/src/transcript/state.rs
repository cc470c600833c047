//! Transcript scroll state.
//!
//! Tracks the scroll offset and follow mode for the message viewport.
//! Follow mode keeps the view pinned to the bottom as messages reveal; a
//! user scroll up pauses it until the user returns near the bottom
//! (within one line).

/// Lines scrolled per key press or mouse wheel tick.
pub const SCROLL_SPEED: usize = 3;

/// Scroll/follow state for the transcript viewport.
#[derive(Debug, Clone)]
pub struct TranscriptState {
    /// First visible line.
    scroll_offset: usize,
    /// Whether to auto-follow new content.
    follow: bool,
    /// Total rendered lines, updated each frame.
    total_lines: usize,
    /// Viewport height in lines, updated each frame.
    viewport_height: usize,
}

impl Default for TranscriptState {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptState {
    /// Create a new state with follow enabled.
    pub fn new() -> Self {
        Self {
            scroll_offset: 0,
            follow: true,
            total_lines: 0,
            viewport_height: 0,
        }
    }

    /// Get the scroll offset.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Check if follow mode is enabled.
    pub fn is_following(&self) -> bool {
        self.follow
    }

    fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.viewport_height)
    }

    /// Record the rendered extent for this frame. While following, snaps
    /// to the bottom; otherwise clamps the offset into range.
    pub fn set_extent(&mut self, total_lines: usize, viewport_height: usize) {
        self.total_lines = total_lines;
        self.viewport_height = viewport_height;
        if self.follow {
            self.scroll_offset = self.max_offset();
        } else {
            self.scroll_offset = self.scroll_offset.min(self.max_offset());
        }
    }

    /// Scroll up by `amount` lines. Pauses follow mode.
    pub fn scroll_up(&mut self, amount: usize) {
        self.follow = false;
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    /// Scroll down by `amount` lines. Re-enables follow mode once the
    /// view is back within one line of the bottom.
    pub fn scroll_down(&mut self, amount: usize) {
        self.scroll_offset = (self.scroll_offset + amount).min(self.max_offset());
        if self.scroll_offset + 1 >= self.max_offset() {
            self.follow = true;
        }
    }

    /// Toggle follow mode. Enabling snaps to the bottom.
    pub fn toggle_follow(&mut self) {
        self.follow = !self.follow;
        if self.follow {
            self.scroll_offset = self.max_offset();
        }
    }

    /// Handle a scroll-to-bottom request from the sequencer. Ignored
    /// while the user has scrolled away.
    pub fn request_bottom(&mut self) {
        if self.follow {
            self.scroll_offset = self.max_offset();
        }
    }

    /// Reset to the initial state (restart).
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
