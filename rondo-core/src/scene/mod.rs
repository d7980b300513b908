//! Scene compositing
//!
//! A [`Container`] holds drawables in z order, draws them one after the
//! other and routes touch events to the topmost object that was hit.

pub mod container;

pub use container::{Container, ObjectEntry, Objects, SceneError, TouchDispatch};
