//! Touch gesture synthesis
//!
//! The touch controller only tells us how many fingers are down right
//! now. [`TouchEventDevice`] compares each reading with the previous one
//! and turns the stream into discrete phase transitions:
//!
//! ```text
//! count == 0                     -> Stop  (always)
//! previous Stop                  -> Start
//! previous Start or Move         -> Move
//! ```
//!
//! A Stop that follows another Stop is not delivered. A delivered Stop
//! carries the points of the previous event so listeners know where the
//! finger left the panel. Only one gesture is tracked at a time.

use core::cell::{Cell, RefCell};

use crate::traits::{RawTouchListener, TouchEventListener};

use super::event::{TouchEvent, TouchPhase, TouchPoints};
use super::raw::RawTouchSnapshot;

/// Converts raw touch snapshots into phased touch events
pub struct TouchEventDevice<'a> {
    /// Phase of the last processed snapshot
    last_phase: Cell<TouchPhase>,
    /// Id of the next generated event
    next_event_id: Cell<u64>,
    /// Points of the last generated event
    last_points: RefCell<TouchPoints>,
    listener: Cell<Option<&'a dyn TouchEventListener>>,
}

impl Default for TouchEventDevice<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> TouchEventDevice<'a> {
    /// Create a device in the Stop phase with no listener
    pub fn new() -> Self {
        Self {
            last_phase: Cell::new(TouchPhase::Stop),
            next_event_id: Cell::new(0),
            last_points: RefCell::new(TouchPoints::new()),
            listener: Cell::new(None),
        }
    }

    /// Deliver events to `listener`, replacing any previous one
    pub fn register_listener(&self, listener: &'a dyn TouchEventListener) {
        self.listener.set(Some(listener));
    }

    /// Stop delivering events
    pub fn unregister_listener(&self) {
        self.listener.set(None);
    }

    /// The registered listener
    pub fn listener(&self) -> Option<&'a dyn TouchEventListener> {
        self.listener.get()
    }

    /// Phase of the last processed snapshot
    pub fn last_phase(&self) -> TouchPhase {
        self.last_phase.get()
    }

    /// Id the next event will get
    pub fn next_event_id(&self) -> u64 {
        self.next_event_id.get()
    }

    /// Next phase for a reading with `count` contacts
    pub fn next_phase(last_phase: TouchPhase, count: u8) -> TouchPhase {
        match (count, last_phase) {
            (0, _) => TouchPhase::Stop,
            (_, TouchPhase::Stop) => TouchPhase::Start,
            (_, TouchPhase::Start | TouchPhase::Move) => TouchPhase::Move,
        }
    }

    /// Process one controller reading
    ///
    /// Returns the event that was generated, or `None` if it was a
    /// repeated Stop and got suppressed. A suppressed Stop still uses up
    /// an id. Delivery to the listener happens before this returns.
    pub fn process(&self, snapshot: &RawTouchSnapshot) -> Option<TouchEvent> {
        let previous_phase = self.last_phase.get();
        let phase = Self::next_phase(previous_phase, snapshot.count);

        let id = self.next_event_id.get();
        self.next_event_id.set(id.wrapping_add(1));
        self.last_phase.set(phase);

        if phase == TouchPhase::Stop && previous_phase == TouchPhase::Stop {
            #[cfg(feature = "defmt")]
            defmt::trace!("touch: suppressed repeated stop (id {})", id);
            return None;
        }

        let event = {
            let mut last_points = self.last_points.borrow_mut();
            let event = match phase {
                // Replay where the finger was last seen
                TouchPhase::Stop => TouchEvent::with_points(id, phase, &last_points),
                TouchPhase::Start | TouchPhase::Move => {
                    let mut fresh = TouchPoints::new();
                    for touch in snapshot.active() {
                        let _ = fresh.push(touch.point());
                    }
                    TouchEvent::with_points(id, phase, &fresh)
                }
            };
            last_points.clear();
            let _ = last_points.extend_from_slice(event.points());
            event
        };

        #[cfg(feature = "defmt")]
        defmt::debug!("touch: {:?}", event);

        if let Some(listener) = self.listener.get() {
            listener.on_touch_event(&event);
        }
        Some(event)
    }
}

impl RawTouchListener for TouchEventDevice<'_> {
    fn on_raw_touch(&self, snapshot: &RawTouchSnapshot) {
        self.process(snapshot);
    }
}
