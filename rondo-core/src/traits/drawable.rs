//! Drawable object trait
//!
//! A drawable is a leaf the scene composites into its frame buffer. The
//! scene does not own drawables: it borrows them for `'a` and talks to
//! them through `&self`, so implementations keep their mutable state in
//! cells. Completion is reported back through a [`DrawCompletedListener`]
//! the scene registers when the object is added.

use core::time::Duration;

use crate::geometry::{Point, PositionTag};
use crate::touch::TouchEvent;

use super::framebuffer::FrameBuffer;

/// Hardware path used to render a drawable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrawHardware {
    /// Synchronous CPU rendering
    #[default]
    Cpu,
    /// Asynchronous DMA-accelerated rendering
    Dma,
}

/// A drawable could not report its drawing time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MeasurementNotAvailable;

/// Receiver of draw completion notifications
///
/// Implemented by the scene container (to chain DMA draws) and by
/// anything that wants to know when a whole scene is on screen.
/// Closures work too.
pub trait DrawCompletedListener {
    /// Drawing finished
    fn draw_completed(&self);
}

impl<F: Fn()> DrawCompletedListener for F {
    fn draw_completed(&self) {
        self()
    }
}

/// Something a scene can draw, hit-test and notify
pub trait DrawableObject<'a> {
    /// Render into `buffer` from now on
    fn set_frame_buffer(&self, buffer: &'a dyn FrameBuffer);

    /// Reference point of the object's bounds
    fn position(&self, tag: PositionTag) -> Point;

    /// Start drawing
    ///
    /// On [`DrawHardware::Cpu`] this renders before returning. On
    /// [`DrawHardware::Dma`] it may return immediately; completion is
    /// reported later through the registered listener.
    fn draw(&self, hardware: DrawHardware);

    /// Check if the last draw has finished
    fn is_draw_completed(&self) -> bool;

    /// Time a draw takes on `hardware`
    fn drawing_time(&self, hardware: DrawHardware) -> Result<Duration, MeasurementNotAvailable>;

    /// Report completion of every draw to `listener`, replacing any previous one
    fn register_draw_completed_listener(&self, listener: &'a dyn DrawCompletedListener);

    /// Stop reporting completion
    fn unregister_draw_completed_listener(&self);

    /// Hit-test a screen point
    fn contains_point(&self, point: Point) -> bool;

    /// Deliver a touch event that hit this object
    fn notify(&self, event: &TouchEvent);
}
