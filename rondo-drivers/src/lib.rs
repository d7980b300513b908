//! Hardware-facing implementations of the Rondo core traits
//!
//! This crate provides concrete collaborators for the scene engine in
//! `rondo-core`:
//!
//! - Touch controller driver (FT6x36 family over I2C)
//! - RAM-backed frame buffer with CPU pixel access
//! - Solid fill widget with CPU and accelerated draw paths
//! - `embassy-sync` bridges that hand completion and touch callbacks
//!   over to async tasks

#![no_std]
#![deny(unsafe_code)]

pub mod framebuffer;
pub mod sync;
pub mod touch;
pub mod widgets;

pub use framebuffer::{Area, Color, FrameBufferError, RamFrameBuffer};
pub use sync::{DrawCompletedSignal, TouchEventQueue};
pub use touch::{Ft6x36, Ft6x36Config, TouchError};
pub use widgets::{AcceleratorBusy, FillAccelerator, FillRequest, FillTiming, FilledRect};
