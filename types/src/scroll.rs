//! Scroll phase of the page viewport.
//!
//! The header switches its visual treatment once the page body has been
//! scrolled past a small fixed threshold. The phase is always a pure function
//! of the most recent offset: no hysteresis, no history.

use serde::{Deserialize, Serialize};

/// Rows the page must be scrolled past before the header counts as scrolled.
pub const SCROLL_THRESHOLD: u16 = 20;

/// Vertical distance, in rows, between the top of the viewport and the top
/// of the page.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ScrollOffset(u16);

impl ScrollOffset {
    pub const TOP: Self = Self(0);

    #[must_use]
    pub const fn new(rows: u16) -> Self {
        Self(rows)
    }

    #[must_use]
    pub const fn rows(self) -> u16 {
        self.0
    }

    /// Move by `delta` rows, clamped to `0..=max`.
    #[must_use]
    pub fn offset_by(self, delta: i32, max: Self) -> Self {
        let target = i32::from(self.0).saturating_add(delta);
        let clamped = target.clamp(0, i32::from(max.0));
        Self(clamped as u16)
    }

    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }
}

impl From<u16> for ScrollOffset {
    fn from(rows: u16) -> Self {
        Self(rows)
    }
}

/// Whether `offset` lies past [`SCROLL_THRESHOLD`].
#[must_use]
pub const fn is_scrolled(offset: ScrollOffset) -> bool {
    offset.0 > SCROLL_THRESHOLD
}

/// Two-state machine driving the header treatment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ScrollPhase {
    #[default]
    AtTop,
    Scrolled,
}

impl ScrollPhase {
    #[must_use]
    pub const fn from_offset(offset: ScrollOffset) -> Self {
        if is_scrolled(offset) {
            Self::Scrolled
        } else {
            Self::AtTop
        }
    }

    #[must_use]
    pub const fn is_scrolled(self) -> bool {
        matches!(self, Self::Scrolled)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AtTop => "at_top",
            Self::Scrolled => "scrolled",
        }
    }
}
