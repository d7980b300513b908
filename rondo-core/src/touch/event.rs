//! Touch events delivered to drawables

use heapless::Vec;

use crate::geometry::Point;

/// Maximum simultaneous contacts the touch panel reports
pub const MAX_TOUCH_POINTS: usize = 2;

/// Points carried by a touch event
pub type TouchPoints = Vec<Point, MAX_TOUCH_POINTS>;

/// Phase of a touch gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchPhase {
    /// First contact after nothing was touching
    Start,
    /// Contact continues (position may or may not have changed)
    Move,
    /// Nothing is touching anymore
    Stop,
}

impl TouchPhase {
    /// Check if a finger is on the panel in this phase
    pub fn is_active(&self) -> bool {
        matches!(self, TouchPhase::Start | TouchPhase::Move)
    }
}

/// A single phase transition of a touch gesture
///
/// Immutable once built. The id identifies this transition, not the
/// gesture as a whole: every event of a gesture carries a fresh id.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchEvent {
    id: u64,
    phase: TouchPhase,
    points: TouchPoints,
}

impl TouchEvent {
    /// Create an event that carries no points
    pub fn new(id: u64, phase: TouchPhase) -> Self {
        Self {
            id,
            phase,
            points: Vec::new(),
        }
    }

    /// Create an event carrying `points`
    ///
    /// Only the first [`MAX_TOUCH_POINTS`] points are kept, the rest are
    /// dropped silently.
    pub fn with_points(id: u64, phase: TouchPhase, points: &[Point]) -> Self {
        let mut kept = Vec::new();
        for point in points.iter().take(MAX_TOUCH_POINTS) {
            // Cannot fail, take() bounds the count
            let _ = kept.push(*point);
        }
        Self {
            id,
            phase,
            points: kept,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn phase(&self) -> TouchPhase {
        self.phase
    }

    /// Contact points, in controller order
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Check if the event carries no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
