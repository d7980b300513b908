//! Touch source and listener traits

use crate::touch::{RawTouchSnapshot, TouchEvent};

/// Receiver of raw controller snapshots
pub trait RawTouchListener {
    /// A poll of the controller produced `snapshot`
    fn on_raw_touch(&self, snapshot: &RawTouchSnapshot);
}

/// Receiver of phased touch events
pub trait TouchEventListener {
    /// A touch phase transition happened
    fn on_touch_event(&self, event: &TouchEvent);
}

impl<F: Fn(&TouchEvent)> TouchEventListener for F {
    fn on_touch_event(&self, event: &TouchEvent) {
        self(event)
    }
}

/// A touch controller driver
///
/// Each [`poll`](TouchSource::poll) (typically triggered by the
/// controller's data-ready interrupt) reads one snapshot and hands it to
/// the registered callback. With no callback registered the snapshot is
/// read and dropped.
pub trait TouchSource<'a> {
    /// Error type for controller access
    type Error;

    /// Deliver snapshots to `listener`, replacing any previous one
    fn register_touch_event_callback(&mut self, listener: &'a dyn RawTouchListener);

    /// Stop delivering snapshots
    fn unregister_touch_event_callback(&mut self);

    /// Read the controller and deliver the snapshot
    fn poll(&mut self) -> Result<RawTouchSnapshot, Self::Error>;
}
