//! Touch controller glue
//!
//! Connects the touch event stream to a scene: every event is hit-tested
//! against the registered [`Container`] and delivered to the object on top.

use core::cell::Cell;

use crate::scene::Container;
use crate::touch::TouchEvent;
use crate::traits::{DrawableObject, TouchEventListener};

/// Routes touch events into a scene
pub struct TouchController<'a, const N: usize> {
    container: Cell<Option<&'a Container<'a, N>>>,
}

impl<const N: usize> Default for TouchController<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const N: usize> TouchController<'a, N> {
    /// Create a controller with no scene attached
    pub const fn new() -> Self {
        Self {
            container: Cell::new(None),
        }
    }

    /// Route events into `container`, replacing any previous one
    pub fn register_container(&self, container: &'a Container<'a, N>) {
        self.container.set(Some(container));
    }

    /// Detach the scene; the scene itself is left untouched
    pub fn unregister_container(&self) {
        self.container.set(None);
    }

    pub fn container(&self) -> Option<&'a Container<'a, N>> {
        self.container.get()
    }

    /// Hit-test `event` and deliver it to the object on top
    ///
    /// Returns the object the event was delivered to.
    pub fn notify(&self, event: &TouchEvent) -> Option<&'a dyn DrawableObject<'a>> {
        let container = self.container.get()?;
        let dispatch = container.resolve(event.clone());
        container.dispatch_event(&dispatch);
        dispatch.target()
    }
}

impl<const N: usize> TouchEventListener for TouchController<'_, N> {
    fn on_touch_event(&self, event: &TouchEvent) {
        self.notify(event);
    }
}
