//! Touch controller drivers

pub mod ft6x36;

pub use ft6x36::{Ft6x36, Ft6x36Config, Orientation, TouchError};
