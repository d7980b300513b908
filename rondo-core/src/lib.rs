//! Board-agnostic core of the Rondo display stack
//!
//! This crate contains the GUI logic that does not depend on specific
//! display or touch hardware:
//!
//! - Capability traits for frame buffers, drawables and touch sources
//! - Bounded, allocation-free ordered list
//! - Touch events and the gesture phase state machine
//! - Z-ordered scene container (draw sequencing, hit-testing, dispatch)
//! - Touch controller glue between touch events and a scene
//! - Panel configuration records
//!
//! Everything here runs in a single execution context; interrupt handlers
//! call back into the engine through the listener traits in [`traits`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod geometry;
pub mod list;
pub mod scene;
pub mod touch;
pub mod traits;

#[cfg(test)]
mod testing;

pub use controller::TouchController;
pub use geometry::{Point, PositionTag};
pub use list::{BoundedOrderedList, ListError};
pub use scene::{Container, ObjectEntry, SceneError, TouchDispatch};
pub use touch::{TouchEvent, TouchEventDevice, TouchPhase, MAX_TOUCH_POINTS};
