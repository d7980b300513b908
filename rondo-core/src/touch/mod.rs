//! Touch input
//!
//! Raw controller snapshots come in through [`RawTouchSnapshot`], the
//! [`TouchEventDevice`] turns them into phased [`TouchEvent`]s.

pub mod device;
pub mod event;
pub mod raw;

pub use device::TouchEventDevice;
pub use event::{TouchEvent, TouchPhase, TouchPoints, MAX_TOUCH_POINTS};
pub use raw::{RawTouch, RawTouchSnapshot, TouchContact};
