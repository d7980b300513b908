//! Drawable widgets

pub mod rect;

pub use rect::{AcceleratorBusy, FillAccelerator, FillRequest, FillTiming, FilledRect};
