//! Test doubles shared by the unit tests

use core::cell::{Cell, RefCell};
use core::time::Duration;

use heapless::Vec;

use crate::geometry::{Point, PositionTag};
use crate::touch::TouchEvent;
use crate::traits::{
    ColorFormat, DrawCompletedListener, DrawHardware, DrawableObject, FrameBuffer,
    MeasurementNotAvailable,
};

/// Small ARGB8888 frame buffer
pub struct TestBuffer {
    bytes: [Cell<u8>; 64],
    width: u32,
    height: u32,
}

impl TestBuffer {
    /// Dimensions only matter for geometry, the backing store is fixed
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            bytes: core::array::from_fn(|_| Cell::new(0)),
            width,
            height,
        }
    }
}

impl FrameBuffer for TestBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn color_format(&self) -> ColorFormat {
        ColorFormat::Argb8888
    }

    fn data(&self) -> &[Cell<u8>] {
        &self.bytes
    }
}

/// Order in which drawables started drawing
pub struct DrawLog {
    entries: RefCell<Vec<u32, 32>>,
}

impl DrawLog {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
        }
    }

    pub fn record(&self, id: u32) {
        self.entries.borrow_mut().push(id).unwrap();
    }

    pub fn entries(&self) -> Vec<u32, 32> {
        self.entries.borrow().clone()
    }
}

/// Rectangular drawable that records every call
///
/// CPU draws complete inside `draw()`. DMA draws stay pending until the
/// test calls [`MockDrawable::finish`], standing in for the transfer
/// complete interrupt.
pub struct MockDrawable<'a> {
    pub id: u32,
    origin: Point,
    width: u32,
    height: u32,
    timing: Option<Duration>,
    log: Option<&'a DrawLog>,
    frame_buffer: Cell<Option<&'a dyn FrameBuffer>>,
    listener: Cell<Option<&'a dyn DrawCompletedListener>>,
    completed: Cell<bool>,
    draws: Cell<u32>,
    last_hardware: Cell<Option<DrawHardware>>,
    hit_tests: Cell<u32>,
    notified: RefCell<Vec<TouchEvent, 8>>,
}

impl<'a> MockDrawable<'a> {
    pub fn new(id: u32, origin: Point, width: u32, height: u32) -> Self {
        Self {
            id,
            origin,
            width,
            height,
            timing: None,
            log: None,
            frame_buffer: Cell::new(None),
            listener: Cell::new(None),
            completed: Cell::new(true),
            draws: Cell::new(0),
            last_hardware: Cell::new(None),
            hit_tests: Cell::new(0),
            notified: RefCell::new(Vec::new()),
        }
    }

    /// Covers the whole of a 100x100 panel
    pub fn full(id: u32) -> Self {
        Self::new(id, Point::zero(), 100, 100)
    }

    pub fn with_log(mut self, log: &'a DrawLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn with_timing(mut self, timing: Duration) -> Self {
        self.timing = Some(timing);
        self
    }

    /// Complete the pending draw and notify the listener
    pub fn finish(&self) {
        self.completed.set(true);
        if let Some(listener) = self.listener.get() {
            listener.draw_completed();
        }
    }

    pub fn draws(&self) -> u32 {
        self.draws.get()
    }

    pub fn last_hardware(&self) -> Option<DrawHardware> {
        self.last_hardware.get()
    }

    pub fn hit_tests(&self) -> u32 {
        self.hit_tests.get()
    }

    pub fn notified_ids(&self) -> Vec<u64, 8> {
        self.notified.borrow().iter().map(|e| e.id()).collect()
    }

    pub fn frame_buffer(&self) -> Option<&'a dyn FrameBuffer> {
        self.frame_buffer.get()
    }

    pub fn has_listener(&self) -> bool {
        self.listener.get().is_some()
    }
}

impl<'a> DrawableObject<'a> for MockDrawable<'a> {
    fn set_frame_buffer(&self, buffer: &'a dyn FrameBuffer) {
        self.frame_buffer.set(Some(buffer));
    }

    fn position(&self, tag: PositionTag) -> Point {
        tag.resolve(self.origin, self.width, self.height)
    }

    fn draw(&self, hardware: DrawHardware) {
        self.draws.set(self.draws.get() + 1);
        self.last_hardware.set(Some(hardware));
        self.completed.set(false);
        if let Some(log) = self.log {
            log.record(self.id);
        }
        if hardware == DrawHardware::Cpu {
            self.finish();
        }
    }

    fn is_draw_completed(&self) -> bool {
        self.completed.get()
    }

    fn drawing_time(&self, _hardware: DrawHardware) -> Result<Duration, MeasurementNotAvailable> {
        self.timing.ok_or(MeasurementNotAvailable)
    }

    fn register_draw_completed_listener(&self, listener: &'a dyn DrawCompletedListener) {
        self.listener.set(Some(listener));
    }

    fn unregister_draw_completed_listener(&self) {
        self.listener.set(None);
    }

    fn contains_point(&self, point: Point) -> bool {
        self.hit_tests.set(self.hit_tests.get() + 1);
        let right = self.origin.x + self.width as i32;
        let bottom = self.origin.y + self.height as i32;
        point.x >= self.origin.x && point.x < right && point.y >= self.origin.y && point.y < bottom
    }

    fn notify(&self, event: &TouchEvent) {
        self.notified.borrow_mut().push(event.clone()).unwrap();
    }
}

/// Counts draw completion notifications
pub struct CompletionCounter {
    count: Cell<u32>,
}

impl CompletionCounter {
    pub fn new() -> Self {
        Self {
            count: Cell::new(0),
        }
    }

    pub fn count(&self) -> u32 {
        self.count.get()
    }
}

impl DrawCompletedListener for CompletionCounter {
    fn draw_completed(&self) {
        self.count.set(self.count.get() + 1);
    }
}
