//! Solid fill rectangle
//!
//! The simplest useful drawable: a clipped rectangle of one colour. On the
//! CPU path the pixels are written before `draw` returns. On the DMA path
//! the fill is described as a [`FillRequest`] and handed to a
//! [`FillAccelerator`] (a DMA2D-style engine in register-to-memory mode);
//! the accelerator's transfer-complete interrupt must then call
//! [`FilledRect::transfer_complete`] to report completion.
//!
//! ```text
//! draw(Dma) --> start_fill(request) ...... IRQ --> transfer_complete()
//!                                                       |
//!                                      listener.draw_completed()
//! ```

use core::cell::Cell;
use core::time::Duration;

use rondo_core::geometry::{Point, PositionTag};
use rondo_core::traits::{
    ColorFormat, DrawCompletedListener, DrawHardware, DrawableObject, FrameBuffer,
    MeasurementNotAvailable, TouchEventListener,
};
use rondo_core::TouchEvent;

use crate::framebuffer::{fill_area, pixel_offset, Area, Color};

/// The accelerator cannot take a transfer right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AcceleratorBusy;

/// One register-to-memory fill transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FillRequest {
    /// Address of the first destination pixel
    pub address: usize,
    /// Pixels per line
    pub width: u32,
    /// Number of lines
    pub height: u32,
    /// Pixels to skip between the end of one line and the start of the next
    pub line_offset: u32,
    pub color: Color,
    pub format: ColorFormat,
}

impl FillRequest {
    /// Pixels written by the transfer
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Hardware able to fill memory with a constant colour
pub trait FillAccelerator {
    /// Program and start a transfer
    ///
    /// Returns once the transfer is running; completion is signalled from
    /// the accelerator's interrupt.
    fn start_fill(&self, request: &FillRequest) -> Result<(), AcceleratorBusy>;
}

/// Fill throughput used to estimate drawing time
///
/// A path with unknown throughput cannot report a drawing time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FillTiming {
    /// CPU fill rate in pixels per microsecond
    pub cpu_pixels_per_us: Option<u32>,
    /// Accelerated fill rate in pixels per microsecond
    pub dma_pixels_per_us: Option<u32>,
    /// Fixed cost of programming one accelerated transfer
    pub dma_setup_us: u32,
}

impl FillTiming {
    /// Nothing measured
    pub const UNKNOWN: Self = Self {
        cpu_pixels_per_us: None,
        dma_pixels_per_us: None,
        dma_setup_us: 0,
    };

    /// Time to fill `pixels` on `hardware`
    pub fn estimate(
        &self,
        hardware: DrawHardware,
        pixels: u64,
    ) -> Result<Duration, MeasurementNotAvailable> {
        let (rate, setup_us) = match hardware {
            DrawHardware::Cpu => (self.cpu_pixels_per_us, 0),
            DrawHardware::Dma => (self.dma_pixels_per_us, self.dma_setup_us),
        };
        let rate = rate.filter(|r| *r > 0).ok_or(MeasurementNotAvailable)?;

        let fill = Duration::from_nanos(pixels.saturating_mul(1000) / u64::from(rate));
        Ok(fill + Duration::from_micros(u64::from(setup_us)))
    }
}

/// Rectangle filled with a solid colour
pub struct FilledRect<'a> {
    area: Cell<Area>,
    color: Cell<Color>,
    timing: FillTiming,
    accelerator: Option<&'a dyn FillAccelerator>,
    frame_buffer: Cell<Option<&'a dyn FrameBuffer>>,
    completed: Cell<bool>,
    /// An accelerated transfer is running
    pending: Cell<bool>,
    completed_listener: Cell<Option<&'a dyn DrawCompletedListener>>,
    touch_listener: Cell<Option<&'a dyn TouchEventListener>>,
}

impl<'a> FilledRect<'a> {
    pub const fn new(area: Area, color: Color) -> Self {
        Self {
            area: Cell::new(area),
            color: Cell::new(color),
            timing: FillTiming::UNKNOWN,
            accelerator: None,
            frame_buffer: Cell::new(None),
            completed: Cell::new(true),
            pending: Cell::new(false),
            completed_listener: Cell::new(None),
            touch_listener: Cell::new(None),
        }
    }

    /// Use `accelerator` for DMA draws instead of falling back to the CPU
    pub fn with_accelerator(mut self, accelerator: &'a dyn FillAccelerator) -> Self {
        self.accelerator = Some(accelerator);
        self
    }

    pub fn with_timing(mut self, timing: FillTiming) -> Self {
        self.timing = timing;
        self
    }

    pub fn area(&self) -> Area {
        self.area.get()
    }

    /// Move or resize; takes effect on the next draw
    pub fn set_area(&self, area: Area) {
        self.area.set(area);
    }

    pub fn color(&self) -> Color {
        self.color.get()
    }

    pub fn set_color(&self, color: Color) {
        self.color.set(color);
    }

    /// Forward touch events that hit this rectangle to `listener`
    pub fn set_touch_listener(&self, listener: Option<&'a dyn TouchEventListener>) {
        self.touch_listener.set(listener);
    }

    /// Check if an accelerated transfer is running
    pub fn is_transfer_pending(&self) -> bool {
        self.pending.get()
    }

    /// Accelerator transfer-complete handler
    ///
    /// Call from the accelerator's interrupt. Ignored when no transfer
    /// started by this rectangle is running.
    pub fn transfer_complete(&self) {
        if !self.pending.replace(false) {
            return;
        }
        self.complete();
    }

    /// Describe the fill of the visible part of the rectangle
    pub fn fill_request(&self, buffer: &dyn FrameBuffer) -> Option<FillRequest> {
        let clipped = self.area.get().clip(buffer.width(), buffer.height())?;
        // Clipped origin is inside the buffer, so never negative
        let offset = pixel_offset(buffer, clipped.origin.x as u32, clipped.origin.y as u32)?;

        Some(FillRequest {
            address: buffer.data().as_ptr() as usize + offset,
            width: clipped.width,
            height: clipped.height,
            line_offset: buffer.width() - clipped.width,
            color: self.color.get(),
            format: buffer.color_format(),
        })
    }

    fn visible_pixels(&self) -> u64 {
        let area = self.area.get();
        let visible = match self.frame_buffer.get() {
            Some(buffer) => area.clip(buffer.width(), buffer.height()),
            None => Some(area),
        };
        visible.map_or(0, |a| u64::from(a.width) * u64::from(a.height))
    }

    fn fill_cpu(&self, buffer: &dyn FrameBuffer) {
        fill_area(buffer, self.area.get(), self.color.get());
        self.complete();
    }

    fn complete(&self) {
        self.completed.set(true);
        if let Some(listener) = self.completed_listener.get() {
            listener.draw_completed();
        }
    }
}

impl<'a> DrawableObject<'a> for FilledRect<'a> {
    fn set_frame_buffer(&self, buffer: &'a dyn FrameBuffer) {
        self.frame_buffer.set(Some(buffer));
    }

    fn position(&self, tag: PositionTag) -> Point {
        let area = self.area.get();
        tag.resolve(area.origin, area.width, area.height)
    }

    fn draw(&self, hardware: DrawHardware) {
        let Some(buffer) = self.frame_buffer.get() else {
            #[cfg(feature = "defmt")]
            defmt::warn!("rect: draw without a frame buffer");
            self.complete();
            return;
        };

        self.completed.set(false);

        let (DrawHardware::Dma, Some(accelerator)) = (hardware, self.accelerator) else {
            self.fill_cpu(buffer);
            return;
        };
        let Some(request) = self.fill_request(buffer) else {
            // Entirely off screen
            self.complete();
            return;
        };

        // Set before starting: the completion interrupt may fire right away
        self.pending.set(true);
        if accelerator.start_fill(&request).is_err() {
            self.pending.set(false);

            #[cfg(feature = "defmt")]
            defmt::debug!("rect: accelerator busy, filling on CPU");

            self.fill_cpu(buffer);
        }
    }

    fn is_draw_completed(&self) -> bool {
        self.completed.get()
    }

    fn drawing_time(&self, hardware: DrawHardware) -> Result<Duration, MeasurementNotAvailable> {
        self.timing.estimate(hardware, self.visible_pixels())
    }

    fn register_draw_completed_listener(&self, listener: &'a dyn DrawCompletedListener) {
        self.completed_listener.set(Some(listener));
    }

    fn unregister_draw_completed_listener(&self) {
        self.completed_listener.set(None);
    }

    fn contains_point(&self, point: Point) -> bool {
        self.area.get().contains(point)
    }

    fn notify(&self, event: &TouchEvent) {
        if let Some(listener) = self.touch_listener.get() {
            listener.on_touch_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::RamFrameBuffer;
    use core::cell::RefCell;
    use rondo_core::config::PanelConfig;
    use rondo_core::touch::TouchPhase;
    use rondo_core::Container;

    const PANEL: PanelConfig = PanelConfig::new(8, 8, ColorFormat::Argb8888);

    /// Records fill requests without touching memory
    struct MockAccelerator {
        requests: RefCell<heapless::Vec<FillRequest, 8>>,
        busy: Cell<bool>,
    }

    impl MockAccelerator {
        fn new() -> Self {
            Self {
                requests: RefCell::new(heapless::Vec::new()),
                busy: Cell::new(false),
            }
        }

        fn count(&self) -> usize {
            self.requests.borrow().len()
        }

        fn last(&self) -> Option<FillRequest> {
            self.requests.borrow().last().copied()
        }
    }

    impl FillAccelerator for MockAccelerator {
        fn start_fill(&self, request: &FillRequest) -> Result<(), AcceleratorBusy> {
            if self.busy.get() {
                return Err(AcceleratorBusy);
            }
            self.requests.borrow_mut().push(*request).map_err(|_| AcceleratorBusy)
        }
    }

    fn red() -> Color {
        Color::rgb(0xFF, 0, 0)
    }

    #[test]
    fn test_cpu_draw_fills_and_completes() {
        let mut storage = [0u8; 8 * 8 * 4];
        let fb = RamFrameBuffer::new(&mut storage, PANEL).unwrap();
        let calls = Cell::new(0u32);
        let on_done = || calls.set(calls.get() + 1);

        let rect = FilledRect::new(Area::new(Point::new(2, 2), 3, 3), red());
        rect.set_frame_buffer(&fb);
        rect.register_draw_completed_listener(&on_done);
        rect.draw(DrawHardware::Cpu);

        assert!(rect.is_draw_completed());
        assert_eq!(calls.get(), 1);
        assert_eq!(fb.pixel(2, 2), Some(red()));
        assert_eq!(fb.pixel(4, 4), Some(red()));
        assert_eq!(fb.pixel(5, 5), Some(Color::TRANSPARENT));
    }

    #[test]
    fn test_draw_without_buffer_completes() {
        let calls = Cell::new(0u32);
        let on_done = || calls.set(calls.get() + 1);
        let rect = FilledRect::new(Area::new(Point::zero(), 3, 3), red());
        rect.register_draw_completed_listener(&on_done);

        rect.draw(DrawHardware::Dma);
        assert!(rect.is_draw_completed());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_dma_without_accelerator_falls_back() {
        let mut storage = [0u8; 8 * 8 * 4];
        let fb = RamFrameBuffer::new(&mut storage, PANEL).unwrap();
        let rect = FilledRect::new(Area::new(Point::zero(), 2, 2), Color::WHITE);
        rect.set_frame_buffer(&fb);

        rect.draw(DrawHardware::Dma);
        assert!(rect.is_draw_completed());
        assert_eq!(fb.pixel(1, 1), Some(Color::WHITE));
    }

    #[test]
    fn test_dma_draw_waits_for_transfer() {
        let mut storage = [0u8; 8 * 8 * 4];
        let fb = RamFrameBuffer::new(&mut storage, PANEL).unwrap();
        let accelerator = MockAccelerator::new();
        let calls = Cell::new(0u32);
        let on_done = || calls.set(calls.get() + 1);

        let rect = FilledRect::new(Area::new(Point::new(6, 1), 4, 2), red())
            .with_accelerator(&accelerator);
        rect.set_frame_buffer(&fb);
        rect.register_draw_completed_listener(&on_done);

        rect.draw(DrawHardware::Dma);
        assert!(!rect.is_draw_completed());
        assert!(rect.is_transfer_pending());
        assert_eq!(calls.get(), 0);

        let request = accelerator.last().unwrap();
        assert_eq!(request.address, fb.data().as_ptr() as usize + 8 * 4 + 6 * 4);
        assert_eq!(request.width, 2);
        assert_eq!(request.height, 2);
        assert_eq!(request.line_offset, 6);
        assert_eq!(request.pixel_count(), 4);
        assert_eq!(request.color, red());
        assert_eq!(request.format, ColorFormat::Argb8888);

        rect.transfer_complete();
        assert!(rect.is_draw_completed());
        assert_eq!(calls.get(), 1);

        // Stray interrupt
        rect.transfer_complete();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_busy_accelerator_falls_back() {
        let mut storage = [0u8; 8 * 8 * 4];
        let fb = RamFrameBuffer::new(&mut storage, PANEL).unwrap();
        let accelerator = MockAccelerator::new();
        accelerator.busy.set(true);

        let rect = FilledRect::new(Area::new(Point::zero(), 8, 8), Color::WHITE)
            .with_accelerator(&accelerator);
        rect.set_frame_buffer(&fb);
        rect.draw(DrawHardware::Dma);

        assert!(rect.is_draw_completed());
        assert!(!rect.is_transfer_pending());
        assert_eq!(fb.pixel(7, 7), Some(Color::WHITE));
    }

    #[test]
    fn test_off_screen_dma_draw_completes() {
        let mut storage = [0u8; 8 * 8 * 4];
        let fb = RamFrameBuffer::new(&mut storage, PANEL).unwrap();
        let accelerator = MockAccelerator::new();
        let rect = FilledRect::new(Area::new(Point::new(20, 20), 4, 4), red())
            .with_accelerator(&accelerator);
        rect.set_frame_buffer(&fb);

        rect.draw(DrawHardware::Dma);
        assert!(rect.is_draw_completed());
        assert_eq!(accelerator.count(), 0);
    }

    #[test]
    fn test_drawing_time() {
        let rect = FilledRect::new(Area::new(Point::zero(), 100, 10), red());
        assert_eq!(
            rect.drawing_time(DrawHardware::Cpu),
            Err(MeasurementNotAvailable)
        );

        let timing = FillTiming {
            cpu_pixels_per_us: Some(10),
            dma_pixels_per_us: Some(100),
            dma_setup_us: 5,
        };
        let rect = rect.with_timing(timing);
        assert_eq!(rect.drawing_time(DrawHardware::Cpu), Ok(Duration::from_micros(100)));
        assert_eq!(rect.drawing_time(DrawHardware::Dma), Ok(Duration::from_micros(15)));
    }

    #[test]
    fn test_drawing_time_counts_visible_pixels() {
        let mut storage = [0u8; 8 * 8 * 4];
        let fb = RamFrameBuffer::new(&mut storage, PANEL).unwrap();
        let rect = FilledRect::new(Area::new(Point::new(4, 0), 100, 100), red()).with_timing(
            FillTiming {
                cpu_pixels_per_us: Some(1),
                ..FillTiming::UNKNOWN
            },
        );
        rect.set_frame_buffer(&fb);

        assert_eq!(rect.drawing_time(DrawHardware::Cpu), Ok(Duration::from_micros(32)));
        assert_eq!(
            rect.drawing_time(DrawHardware::Dma),
            Err(MeasurementNotAvailable)
        );
    }

    #[test]
    fn test_position_and_hit_test() {
        let rect = FilledRect::new(Area::new(Point::new(10, 20), 5, 4), red());
        assert_eq!(rect.position(PositionTag::TopLeft), Point::new(10, 20));
        assert_eq!(rect.position(PositionTag::BottomRight), Point::new(14, 23));
        assert!(rect.contains_point(Point::new(14, 23)));
        assert!(!rect.contains_point(Point::new(15, 23)));

        rect.set_area(Area::new(Point::zero(), 1, 1));
        assert!(rect.contains_point(Point::zero()));
        assert!(!rect.contains_point(Point::new(10, 20)));
    }

    #[test]
    fn test_cpu_scene_draws_in_z_order() {
        let mut storage = [0u8; 8 * 8 * 4];
        let fb = RamFrameBuffer::new(&mut storage, PANEL).unwrap();
        let back = FilledRect::new(Area::new(Point::zero(), 8, 8), Color::WHITE);
        let front = FilledRect::new(Area::new(Point::new(2, 2), 2, 2), red());

        let scene: Container<'_, 4> = Container::new(&fb);
        scene.add_object(&front, 7).unwrap();
        scene.add_object(&back, 1).unwrap();
        scene.draw(DrawHardware::Cpu);

        assert!(scene.is_draw_completed());
        assert_eq!(fb.pixel(0, 0), Some(Color::WHITE));
        assert_eq!(fb.pixel(3, 3), Some(red()));
    }

    #[test]
    fn test_dma_scene_chains_transfers() {
        let mut storage = [0u8; 8 * 8 * 4];
        let fb = RamFrameBuffer::new(&mut storage, PANEL).unwrap();
        let accelerator = MockAccelerator::new();
        let scene_done = Cell::new(0u32);
        let on_scene_done = || scene_done.set(scene_done.get() + 1);

        let back = FilledRect::new(Area::new(Point::zero(), 8, 8), Color::WHITE)
            .with_accelerator(&accelerator);
        let front = FilledRect::new(Area::new(Point::new(2, 2), 2, 2), red())
            .with_accelerator(&accelerator);

        let scene: Container<'_, 4> = Container::new(&fb);
        scene.add_object(&front, 2).unwrap();
        scene.add_object(&back, 1).unwrap();
        scene.register_draw_completed_listener(&on_scene_done);

        scene.draw(DrawHardware::Dma);
        assert_eq!(accelerator.count(), 1);
        assert_eq!(accelerator.last().map(|r| r.color), Some(Color::WHITE));
        assert!(!scene.is_draw_completed());

        back.transfer_complete();
        assert_eq!(accelerator.count(), 2);
        assert_eq!(accelerator.last().map(|r| r.color), Some(red()));
        assert!(!scene.is_draw_completed());

        front.transfer_complete();
        assert!(scene.is_draw_completed());
        assert_eq!(scene_done.get(), 1);
    }

    #[test]
    fn test_touch_forwarding() {
        let mut storage = [0u8; 8 * 8 * 4];
        let fb = RamFrameBuffer::new(&mut storage, PANEL).unwrap();
        let hits = Cell::new(0u32);
        let on_touch = |event: &TouchEvent| {
            assert_eq!(event.phase(), TouchPhase::Start);
            hits.set(hits.get() + 1);
        };

        let back = FilledRect::new(Area::new(Point::zero(), 8, 8), Color::WHITE);
        let button = FilledRect::new(Area::new(Point::new(2, 2), 2, 2), red());
        button.set_touch_listener(Some(&on_touch as &dyn TouchEventListener));

        let scene: Container<'_, 4> = Container::new(&fb);
        scene.add_object(&back, 0).unwrap();
        scene.add_object(&button, 1).unwrap();

        let dispatch = scene.resolve(TouchEvent::with_points(
            0,
            TouchPhase::Start,
            &[Point::new(3, 3)],
        ));
        scene.dispatch_event(&dispatch);
        assert_eq!(hits.get(), 1);

        // Background has no listener
        let dispatch = scene.resolve(TouchEvent::with_points(
            1,
            TouchPhase::Start,
            &[Point::new(6, 6)],
        ));
        scene.dispatch_event(&dispatch);
        assert_eq!(hits.get(), 1);

        button.set_touch_listener(None);
        let dispatch = scene.resolve(TouchEvent::with_points(
            2,
            TouchPhase::Start,
            &[Point::new(3, 3)],
        ));
        scene.dispatch_event(&dispatch);
        assert_eq!(hits.get(), 1);
    }
}
