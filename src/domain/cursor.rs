//! Wrapping position over a fixed-length slide list.
//!
//! Drives the hero and Facebook carousels and the gallery lightbox, where
//! stepping past either end wraps around.

use std::time::Duration;

/// Default autoplay delay of the hero banner carousel.
pub const HERO_AUTOPLAY: Duration = Duration::from_millis(5000);

/// Default autoplay delay of the Facebook post carousel.
pub const FACEBOOK_AUTOPLAY: Duration = Duration::from_millis(8000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CyclicCursor {
    len: usize,
    index: usize,
}

impl CyclicCursor {
    /// Returns `None` for an empty list; there is nothing to point at.
    pub fn new(len: usize) -> Option<Self> {
        (len > 0).then_some(Self { len, index: 0 })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn next(&mut self) -> usize {
        self.index = (self.index + 1) % self.len;
        self.index
    }

    pub fn prev(&mut self) -> usize {
        self.index = (self.index + self.len - 1) % self.len;
        self.index
    }

    /// Move to `index`, clamped to the last slide.
    pub fn jump(&mut self, index: usize) -> usize {
        self.index = index.min(self.len - 1);
        self.index
    }

    /// Indicators are only worth showing with more than one slide.
    pub fn shows_indicators(&self) -> bool {
        self.len > 1
    }
}
