//! Screen-space geometry

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point in screen space
///
/// Signed so that panel-relative arithmetic may go negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    /// Horizontal position, pixels from the left edge
    pub x: i32,
    /// Vertical position, pixels from the top edge
    pub y: i32,
}

impl Point {
    /// Create a point
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The origin (top left pixel)
    pub const fn zero() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Offset this point by another, saturating at the i32 range
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Canonical reference points of a rectangular area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PositionTag {
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl PositionTag {
    /// All tags, center first
    pub const ALL: [PositionTag; 5] = [
        PositionTag::Center,
        PositionTag::TopLeft,
        PositionTag::TopRight,
        PositionTag::BottomLeft,
        PositionTag::BottomRight,
    ];

    /// Resolve the tag inside an area of `width` x `height` pixels at `origin`
    ///
    /// Corners are inclusive pixel coordinates, so the bottom right corner
    /// of a 480x480 area at the origin is (479, 479). An empty area
    /// collapses every tag onto the origin.
    pub fn resolve(self, origin: Point, width: u32, height: u32) -> Point {
        let w = clamp_extent(width);
        let h = clamp_extent(height);
        let right = (w - 1).max(0);
        let bottom = (h - 1).max(0);

        let (dx, dy) = match self {
            PositionTag::Center => (w / 2, h / 2),
            PositionTag::TopLeft => (0, 0),
            PositionTag::TopRight => (right, 0),
            PositionTag::BottomLeft => (0, bottom),
            PositionTag::BottomRight => (right, bottom),
        };
        origin.offset(dx, dy)
    }
}

fn clamp_extent(extent: u32) -> i32 {
    i32::try_from(extent).unwrap_or(i32::MAX)
}
