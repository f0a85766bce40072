//! Bounded log history with autoscroll.
//!
//! Keeps the most recent decoded lines in arrival order. When full, the
//! oldest line is evicted to make room for the new one.

use std::collections::VecDeque;

use crate::ansi::LineRecord;

/// Default number of lines kept by the console.
pub const DEFAULT_LOG_CAPACITY: usize = 2000;

/// Append-only sink for decoded log lines (FIFO eviction)
#[derive(Debug, Clone)]
pub struct LogStreamView {
    lines: VecDeque<LineRecord>,
    capacity: usize,
    autoscroll: bool,
    /// Index one past the last visible line
    scroll_position: usize,
}

impl LogStreamView {
    /// Creates an empty view holding at most `capacity` lines (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
            autoscroll: true,
            scroll_position: 0,
        }
    }

    /// Adds a line, evicting the oldest one once the bound is exceeded
    pub fn append(&mut self, line: LineRecord) {
        self.lines.push_back(line);
        if self.lines.len() > self.capacity {
            self.lines.pop_front();
        }

        if self.autoscroll {
            self.scroll_to_newest();
        } else {
            self.scroll_position = self.scroll_position.min(self.lines.len());
        }
    }

    /// Empties the view; the autoscroll flag is kept
    pub fn clear(&mut self) {
        self.lines.clear();
        self.scroll_position = 0;
    }

    pub fn autoscroll(&self) -> bool {
        self.autoscroll
    }

    /// Toggles autoscroll; enabling it jumps to the newest line
    pub fn set_autoscroll(&mut self, enabled: bool) {
        self.autoscroll = enabled;
        if enabled {
            self.scroll_to_newest();
        }
    }

    pub fn scroll_position(&self) -> usize {
        self.scroll_position
    }

    /// Manual scroll, clamped to the stored lines
    pub fn scroll_to(&mut self, position: usize) {
        self.scroll_position = position.min(self.lines.len());
    }

    pub fn is_at_newest(&self) -> bool {
        self.scroll_position == self.lines.len()
    }

    fn scroll_to_newest(&mut self) {
        self.scroll_position = self.lines.len();
    }

    /// Lines in arrival order (oldest first)
    pub fn lines(&self) -> impl Iterator<Item = &LineRecord> {
        self.lines.iter()
    }

    pub fn newest(&self) -> Option<&LineRecord> {
        self.lines.back()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for LogStreamView {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> LineRecord {
        LineRecord::plain(format!("line {}", n))
    }

    #[test]
    fn test_new_view_is_empty() {
        let view = LogStreamView::default();
        assert!(view.is_empty());
        assert_eq!(view.capacity(), 2000);
        assert!(view.autoscroll());
    }

    #[test]
    fn test_overflow_by_one_evicts_oldest() {
        let mut view = LogStreamView::default();
        for n in 0..2001 {
            view.append(line(n));
        }
        assert_eq!(view.len(), 2000);
        assert_eq!(view.lines().next().unwrap().text, "line 1");
        assert_eq!(view.newest().unwrap().text, "line 2000");
    }

    #[test]
    fn test_at_capacity_nothing_evicted() {
        let mut view = LogStreamView::new(3);
        for n in 0..3 {
            view.append(line(n));
        }
        assert_eq!(view.lines().next().unwrap().text, "line 0");
    }

    #[test]
    fn test_clear_then_append_leaves_one() {
        let mut view = LogStreamView::new(10);
        for n in 0..5 {
            view.append(line(n));
        }
        view.set_autoscroll(false);
        view.clear();
        view.append(line(99));
        assert_eq!(view.len(), 1);
        assert!(!view.autoscroll());
    }

    #[test]
    fn test_autoscroll_follows_appends() {
        let mut view = LogStreamView::new(10);
        view.append(line(0));
        view.append(line(1));
        assert!(view.is_at_newest());
        assert_eq!(view.scroll_position(), 2);
    }

    #[test]
    fn test_disabled_autoscroll_keeps_position() {
        let mut view = LogStreamView::new(10);
        view.append(line(0));
        view.append(line(1));
        view.set_autoscroll(false);
        view.scroll_to(1);
        view.append(line(2));
        assert_eq!(view.scroll_position(), 1);
        assert!(!view.is_at_newest());
    }

    #[test]
    fn test_enabling_autoscroll_jumps_to_newest() {
        let mut view = LogStreamView::new(10);
        view.set_autoscroll(false);
        view.append(line(0));
        view.append(line(1));
        assert_eq!(view.scroll_position(), 0);
        view.set_autoscroll(true);
        assert!(view.is_at_newest());
    }
}
