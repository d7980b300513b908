//! Interrupt-to-task bridges
//!
//! Completion and touch callbacks arrive in interrupt context. These
//! wrappers are listeners on one side and `embassy-sync` primitives on
//! the other, so a render or UI task can simply await them. Both are
//! usable as statics:
//!
//! ```ignore
//! static FRAME_DONE: DrawCompletedSignal = DrawCompletedSignal::new();
//! static TOUCH_EVENTS: TouchEventQueue<8> = TouchEventQueue::new();
//!
//! scene.register_draw_completed_listener(&FRAME_DONE);
//! device.register_listener(&TOUCH_EVENTS);
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use rondo_core::traits::{DrawCompletedListener, TouchEventListener};
use rondo_core::TouchEvent;

/// Draw completion as an awaitable signal
pub struct DrawCompletedSignal {
    signal: Signal<CriticalSectionRawMutex, ()>,
}

impl DrawCompletedSignal {
    pub const fn new() -> Self {
        Self {
            signal: Signal::new(),
        }
    }

    /// Wait for the next completion
    pub async fn wait(&self) {
        self.signal.wait().await
    }

    /// Check if a completion is pending, without consuming it
    pub fn signaled(&self) -> bool {
        self.signal.signaled()
    }

    /// Discard a pending completion
    pub fn reset(&self) {
        self.signal.reset()
    }
}

impl Default for DrawCompletedSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawCompletedListener for DrawCompletedSignal {
    fn draw_completed(&self) {
        self.signal.signal(());
    }
}

/// Bounded queue of touch events for a UI task
///
/// Events that do not fit are dropped and counted; the producer never
/// blocks.
pub struct TouchEventQueue<const N: usize> {
    channel: Channel<CriticalSectionRawMutex, TouchEvent, N>,
    dropped: AtomicU32,
}

impl<const N: usize> TouchEventQueue<N> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Wait for the next event
    pub async fn receive(&self) -> TouchEvent {
        self.channel.receive().await
    }

    /// Take the next event if one is queued
    pub fn try_receive(&self) -> Option<TouchEvent> {
        self.channel.try_receive().ok()
    }

    /// Number of queued events
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// Events lost because the queue was full
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<const N: usize> Default for TouchEventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TouchEventListener for TouchEventQueue<N> {
    fn on_touch_event(&self, event: &TouchEvent) {
        if self.channel.try_send(event.clone()).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);

            #[cfg(feature = "defmt")]
            defmt::warn!("touch queue full, dropped event {=u64}", event.id());
        }
    }
}
