//! View windows and presentation requests.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A contiguous range of the filtered set: `size` rows starting at `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ViewWindow {
    /// Index of the first row.
    pub offset: usize,
    /// Number of rows.
    pub size: usize,
}

impl ViewWindow {
    /// Create a window.
    pub const fn new(offset: usize, size: usize) -> Self {
        Self { offset, size }
    }

    /// The same size at another offset.
    pub const fn with_offset(self, offset: usize) -> Self {
        Self {
            offset,
            size: self.size,
        }
    }

    /// One past the last row.
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.size)
    }

    /// The rows of a set of `len` elements this window actually covers.
    pub fn clamp_to(&self, len: usize) -> Range<usize> {
        let start = self.offset.min(len);
        let count = self.size.min(len - start);
        start..start + count
    }

    /// Whether `index` lies inside the window.
    pub fn contains(&self, index: usize) -> bool {
        index >= self.offset && index < self.end()
    }
}

impl fmt::Display for ViewWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.offset, self.size)
    }
}

/// A request to present a window, optionally animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PresentationRequest {
    /// The window to present.
    pub window: ViewWindow,
    /// Whether the transition should be animated.
    pub animate: bool,
}

impl PresentationRequest {
    /// Create a request.
    pub const fn new(window: ViewWindow, animate: bool) -> Self {
        Self { window, animate }
    }
}

impl fmt::Display for PresentationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Present {} (Animate = {})", self.window, self.animate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_past_end_is_empty() {
        assert_eq!(ViewWindow::new(10, 20).clamp_to(5), 5..5);
    }

    #[test]
    fn test_clamp_truncates_tail() {
        assert_eq!(ViewWindow::new(3, 20).clamp_to(10), 3..10);
        assert_eq!(ViewWindow::new(0, 4).clamp_to(10), 0..4);
    }

    #[test]
    fn test_display() {
        let window = ViewWindow::new(4, 16);
        assert_eq!(window.to_string(), "4 -> 16");
        assert_eq!(
            PresentationRequest::new(window, true).to_string(),
            "Present 4 -> 16 (Animate = true)"
        );
    }

    #[test]
    fn test_contains() {
        let window = ViewWindow::new(2, 3);
        assert!(!window.contains(1));
        assert!(window.contains(2));
        assert!(window.contains(4));
        assert!(!window.contains(5));
    }
}
