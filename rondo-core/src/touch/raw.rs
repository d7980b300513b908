//! Raw touch controller readings
//!
//! One [`RawTouchSnapshot`] is what a single poll of the touch controller
//! returns: the number of contacts it currently reports and the decoded
//! point registers.

use crate::geometry::Point;

use super::event::MAX_TOUCH_POINTS;

/// Per-point event flag reported by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchContact {
    /// Finger just landed
    PressDown,
    /// Finger just left the panel
    LiftUp,
    /// Finger is resting or moving on the panel
    Contact,
    /// Register holds no valid event
    #[default]
    NoEvent,
}

/// One decoded touch point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawTouch {
    /// Panel X coordinate
    pub x: u16,
    /// Panel Y coordinate
    pub y: u16,
    /// Event flag for this point
    pub contact: TouchContact,
}

impl RawTouch {
    pub const fn new(x: u16, y: u16, contact: TouchContact) -> Self {
        Self { x, y, contact }
    }

    /// Screen-space position of this touch
    pub fn point(&self) -> Point {
        Point::new(i32::from(self.x), i32::from(self.y))
    }
}

/// Result of one touch controller poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawTouchSnapshot {
    /// Number of contacts the controller reports as down
    pub count: u8,
    /// Point registers, only the first `active_count()` are meaningful
    pub touches: [RawTouch; MAX_TOUCH_POINTS],
}

impl RawTouchSnapshot {
    /// Snapshot with nothing touching
    pub const fn released() -> Self {
        Self {
            count: 0,
            touches: [RawTouch::new(0, 0, TouchContact::NoEvent); MAX_TOUCH_POINTS],
        }
    }

    /// Snapshot with a single contact
    pub const fn single(x: u16, y: u16) -> Self {
        Self {
            count: 1,
            touches: [
                RawTouch::new(x, y, TouchContact::Contact),
                RawTouch::new(0, 0, TouchContact::NoEvent),
            ],
        }
    }

    /// Snapshot with two contacts
    pub const fn pair(first: (u16, u16), second: (u16, u16)) -> Self {
        Self {
            count: 2,
            touches: [
                RawTouch::new(first.0, first.1, TouchContact::Contact),
                RawTouch::new(second.0, second.1, TouchContact::Contact),
            ],
        }
    }

    /// Number of point registers that hold a contact
    ///
    /// The controller may report more contacts than the panel tracks.
    pub fn active_count(&self) -> usize {
        usize::from(self.count).min(MAX_TOUCH_POINTS)
    }

    /// Check if nothing is touching
    pub fn is_released(&self) -> bool {
        self.count == 0
    }

    /// Active touch points
    pub fn active(&self) -> &[RawTouch] {
        &self.touches[..self.active_count()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_count_is_capped() {
        let mut snapshot = RawTouchSnapshot::pair((1, 2), (3, 4));
        assert_eq!(snapshot.active_count(), 2);

        snapshot.count = 5;
        assert_eq!(snapshot.active_count(), 2);
        assert_eq!(snapshot.active().len(), 2);
    }

    #[test]
    fn test_released() {
        let snapshot = RawTouchSnapshot::released();
        assert!(snapshot.is_released());
        assert!(snapshot.active().is_empty());
    }

    #[test]
    fn test_point_conversion() {
        let touch = RawTouch::new(479, 12, TouchContact::Contact);
        assert_eq!(touch.point(), Point::new(479, 12));
    }
}
