//! Z-ordered scene container
//!
//! The container keeps a bounded list of `(drawable, z_index)` entries in
//! ascending z order. Drawing walks the list bottom to top:
//!
//! - **CPU**: every object is drawn in turn and the container spins until
//!   each one reports completion. `draw()` returns with the scene done.
//! - **DMA**: only the lowest object is started and `draw()` returns. Each
//!   object's completion notification (delivered to the container, which
//!   is registered as every object's [`DrawCompletedListener`]) starts the
//!   next one. After the last, the container's own listener fires.
//!
//! Only one draw may be in flight. Nothing enforces this: the scene runs
//! in a single context and callers wait for [`Container::is_draw_completed`]
//! (or the completion listener) before touching the object list or the
//! frame buffer again.

use core::cell::{Cell, RefCell};
use core::fmt;
use core::time::Duration;

use crate::geometry::{Point, PositionTag};
use crate::list::BoundedOrderedList;
use crate::touch::TouchEvent;
use crate::traits::{
    DrawCompletedListener, DrawHardware, DrawableObject, FrameBuffer, MeasurementNotAvailable,
};

/// Errors when adding objects to a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SceneError {
    /// Another object already uses this z-index
    ZIndexInUse,
    /// Scene is at capacity
    Full,
}

/// A drawable registered at a z-index
#[derive(Clone, Copy)]
pub struct ObjectEntry<'a> {
    drawable: &'a dyn DrawableObject<'a>,
    z_index: u32,
}

impl<'a> ObjectEntry<'a> {
    pub fn drawable(&self) -> &'a dyn DrawableObject<'a> {
        self.drawable
    }

    pub fn z_index(&self) -> u32 {
        self.z_index
    }

    /// Check if this entry refers to `drawable` (identity, not equality)
    pub fn is(&self, drawable: &dyn DrawableObject<'a>) -> bool {
        core::ptr::addr_eq(self.drawable, drawable)
    }
}

impl fmt::Debug for ObjectEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectEntry")
            .field("drawable", &core::ptr::from_ref(self.drawable).cast::<()>())
            .field("z_index", &self.z_index)
            .finish()
    }
}

/// A touch event paired with the object it was resolved to
#[derive(Clone)]
pub struct TouchDispatch<'a> {
    event: TouchEvent,
    target: Option<&'a dyn DrawableObject<'a>>,
}

impl<'a> TouchDispatch<'a> {
    pub fn new(event: TouchEvent, target: Option<&'a dyn DrawableObject<'a>>) -> Self {
        Self { event, target }
    }

    pub fn event(&self) -> &TouchEvent {
        &self.event
    }

    pub fn target(&self) -> Option<&'a dyn DrawableObject<'a>> {
        self.target
    }
}

impl fmt::Debug for TouchDispatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TouchDispatch")
            .field("event", &self.event)
            .field(
                "target",
                &self.target.map(|t| core::ptr::from_ref(t).cast::<()>()),
            )
            .finish()
    }
}

/// Z-ordered scene of up to `N` drawables sharing one frame buffer
pub struct Container<'a, const N: usize> {
    frame_buffer: Cell<&'a dyn FrameBuffer>,
    /// Entries sorted by ascending, unique z-index
    objects: RefCell<BoundedOrderedList<ObjectEntry<'a>, N>>,
    drawing: Cell<bool>,
    active_hardware: Cell<DrawHardware>,
    /// Index of the object being drawn, DMA path only
    cursor: Cell<usize>,
    completed_listener: Cell<Option<&'a dyn DrawCompletedListener>>,
}

impl<'a, const N: usize> Container<'a, N> {
    /// Create an empty, idle scene rendering into `frame_buffer`
    pub fn new(frame_buffer: &'a dyn FrameBuffer) -> Self {
        Self {
            frame_buffer: Cell::new(frame_buffer),
            objects: RefCell::new(BoundedOrderedList::new()),
            drawing: Cell::new(false),
            active_hardware: Cell::new(DrawHardware::Cpu),
            cursor: Cell::new(0),
            completed_listener: Cell::new(None),
        }
    }

    /// Maximum number of objects
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.objects.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.borrow().is_empty()
    }

    /// Object registered at `z_index`
    pub fn object(&self, z_index: u32) -> Option<&'a dyn DrawableObject<'a>> {
        self.iter()
            .find(|entry| entry.z_index == z_index)
            .map(|entry| entry.drawable)
    }

    /// Add `drawable` at `z_index`
    ///
    /// The object adopts the scene's frame buffer and reports its draw
    /// completion to the scene from now on.
    pub fn add_object(
        &'a self,
        drawable: &'a dyn DrawableObject<'a>,
        z_index: u32,
    ) -> Result<(), SceneError> {
        {
            let mut objects = self.objects.borrow_mut();
            if objects.iter().any(|entry| entry.z_index == z_index) {
                return Err(SceneError::ZIndexInUse);
            }
            if objects.is_full() {
                return Err(SceneError::Full);
            }

            let index = objects
                .position(|entry| entry.z_index > z_index)
                .unwrap_or(objects.len());
            objects
                .insert_at(index, ObjectEntry { drawable, z_index })
                .map_err(|_| SceneError::Full)?;
        }

        drawable.set_frame_buffer(self.frame_buffer.get());
        drawable.register_draw_completed_listener(self);
        Ok(())
    }

    /// Remove the object at `z_index` and detach its completion listener
    ///
    /// Removing an object while a DMA draw is in flight shifts the draw
    /// order under it; wait for the draw to complete first.
    pub fn remove_object(&self, z_index: u32) -> Option<&'a dyn DrawableObject<'a>> {
        let removed = {
            let mut objects = self.objects.borrow_mut();
            let index = objects.position(|entry| entry.z_index == z_index)?;
            objects.remove_at(index).ok()?
        };
        removed.drawable.unregister_draw_completed_listener();
        Some(removed.drawable)
    }

    /// Frame buffer the scene renders into
    pub fn frame_buffer(&self) -> &'a dyn FrameBuffer {
        self.frame_buffer.get()
    }

    /// Switch every object to `buffer`
    ///
    /// Applied immediately, even while a draw is in flight.
    pub fn set_frame_buffer(&self, buffer: &'a dyn FrameBuffer) {
        self.frame_buffer.set(buffer);
        for entry in self.iter() {
            entry.drawable.set_frame_buffer(buffer);
        }
    }

    /// Reference point of the whole frame buffer
    pub fn position(&self, tag: PositionTag) -> Point {
        let buffer = self.frame_buffer.get();
        tag.resolve(Point::zero(), buffer.width(), buffer.height())
    }

    /// Draw every object in ascending z order
    ///
    /// See the module documentation for how the CPU and DMA paths differ.
    /// An empty scene reports completion right away.
    pub fn draw(&self, hardware: DrawHardware) {
        let Some(first) = self.entry_at(0) else {
            self.notify_completed();
            return;
        };

        #[cfg(feature = "defmt")]
        defmt::trace!("scene: draw {} objects on {:?}", self.len(), hardware);

        self.active_hardware.set(hardware);
        self.cursor.set(0);
        self.drawing.set(true);

        match hardware {
            DrawHardware::Cpu => {
                let mut index = 0;
                while let Some(entry) = self.entry_at(index) {
                    entry.drawable.draw(DrawHardware::Cpu);
                    while !entry.drawable.is_draw_completed() {
                        core::hint::spin_loop();
                    }
                    index += 1;
                }
                self.finish();
            }
            DrawHardware::Dma => first.drawable.draw(DrawHardware::Dma),
        }
    }

    /// Check if no draw is in flight
    pub fn is_draw_completed(&self) -> bool {
        !self.drawing.get()
    }

    /// Hardware path of the current (or last) draw
    pub fn active_hardware(&self) -> DrawHardware {
        self.active_hardware.get()
    }

    /// Total time to draw every object on `hardware`
    ///
    /// Fails as soon as one object cannot report its time; no partial sum
    /// is returned.
    pub fn drawing_time(&self, hardware: DrawHardware) -> Result<Duration, MeasurementNotAvailable> {
        self.iter().try_fold(Duration::ZERO, |total, entry| {
            Ok(total.saturating_add(entry.drawable.drawing_time(hardware)?))
        })
    }

    /// Notify `listener` whenever a whole scene draw finishes
    pub fn register_draw_completed_listener(&self, listener: &'a dyn DrawCompletedListener) {
        self.completed_listener.set(Some(listener));
    }

    pub fn unregister_draw_completed_listener(&self) {
        self.completed_listener.set(None);
    }

    /// Topmost object hit by any of the event's points
    ///
    /// Every object is tested, bottom to top, against every point; the
    /// last object hit wins. An event without points hits nothing.
    pub fn event_target(&self, event: &TouchEvent) -> Option<&'a dyn DrawableObject<'a>> {
        if event.is_empty() {
            return None;
        }

        let mut target = None;
        for entry in self.iter() {
            let mut hit = false;
            for point in event.points() {
                if entry.drawable.contains_point(*point) {
                    hit = true;
                }
            }
            if hit {
                target = Some(entry.drawable);
            }
        }
        target
    }

    /// Pair `event` with its hit-test target
    pub fn resolve(&self, event: TouchEvent) -> TouchDispatch<'a> {
        let target = self.event_target(&event);
        TouchDispatch::new(event, target)
    }

    /// Deliver a resolved event to its target
    ///
    /// Nothing happens if there is no target or if the target is not part
    /// of this scene.
    pub fn dispatch_event(&self, dispatch: &TouchDispatch<'a>) {
        let Some(target) = dispatch.target() else {
            return;
        };

        match self.iter().find(|entry| entry.is(target)) {
            Some(entry) => entry.drawable.notify(dispatch.event()),
            None => {
                #[cfg(feature = "defmt")]
                defmt::trace!("scene: touch target not in scene, dropped");
            }
        }
    }

    /// Iterate over entries in ascending z order
    ///
    /// Entries are copied out one at a time, so objects may call back into
    /// the scene while iterating. Adding or removing objects mid-iteration
    /// makes the iterator skip or repeat entries.
    pub fn iter(&self) -> Objects<'_, 'a, N> {
        Objects {
            container: self,
            index: 0,
        }
    }

    fn entry_at(&self, index: usize) -> Option<ObjectEntry<'a>> {
        self.objects.borrow().get(index).ok().copied()
    }

    fn finish(&self) {
        self.drawing.set(false);

        #[cfg(feature = "defmt")]
        defmt::debug!("scene: draw completed on {:?}", self.active_hardware.get());

        self.notify_completed();
    }

    fn notify_completed(&self) {
        if let Some(listener) = self.completed_listener.get() {
            listener.draw_completed();
        }
    }
}

/// Completion handler for the objects of this scene
///
/// During a DMA draw each notification starts the next object. Outside of
/// a DMA draw notifications are ignored: CPU draws wait on
/// [`DrawableObject::is_draw_completed`] instead.
impl<'a, const N: usize> DrawCompletedListener for Container<'a, N> {
    fn draw_completed(&self) {
        if !self.drawing.get() || self.active_hardware.get() != DrawHardware::Dma {
            #[cfg(feature = "defmt")]
            defmt::trace!("scene: completion ignored, no DMA draw in flight");
            return;
        }

        let next = self.cursor.get() + 1;
        self.cursor.set(next);
        match self.entry_at(next) {
            Some(entry) => entry.drawable.draw(DrawHardware::Dma),
            None => self.finish(),
        }
    }
}

impl<const N: usize> fmt::Debug for Container<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("objects", &*self.objects.borrow())
            .field("drawing", &self.drawing.get())
            .field("active_hardware", &self.active_hardware.get())
            .field("cursor", &self.cursor.get())
            .finish_non_exhaustive()
    }
}

/// Iterator over the entries of a [`Container`]
pub struct Objects<'c, 'a, const N: usize> {
    container: &'c Container<'a, N>,
    index: usize,
}

impl<'a, const N: usize> Iterator for Objects<'_, 'a, N> {
    type Item = ObjectEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.container.entry_at(self.index)?;
        self.index += 1;
        Some(entry)
    }
}
