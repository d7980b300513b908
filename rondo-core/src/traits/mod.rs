//! Capability traits
//!
//! These traits define the interface between the scene engine and the
//! hardware-backed collaborators (frame buffer memory, drawable widgets,
//! touch controller drivers).

pub mod drawable;
pub mod framebuffer;
pub mod touch;

pub use drawable::{DrawCompletedListener, DrawHardware, DrawableObject, MeasurementNotAvailable};
pub use framebuffer::{same_frame_buffer, ColorFormat, FrameBuffer};
pub use touch::{RawTouchListener, TouchEventListener, TouchSource};
