//! Frame buffer trait

use core::cell::Cell;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pixel format of a frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ColorFormat {
    /// 32-bit with alpha
    #[default]
    Argb8888,
    /// 24-bit packed
    Rgb888,
}

impl ColorFormat {
    /// Bytes per pixel
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            ColorFormat::Argb8888 => 4,
            ColorFormat::Rgb888 => 3,
        }
    }
}

/// Frame buffer memory shared by a scene and its drawables
///
/// The byte span is shared between the CPU and the display/DMA engines,
/// so it is exposed as cells rather than as a mutable slice. Its start
/// address (`data().as_ptr()`) is what DMA transfers are programmed with.
pub trait FrameBuffer {
    /// Width in pixels
    fn width(&self) -> u32;

    /// Height in pixels
    fn height(&self) -> u32;

    /// Pixel format
    fn color_format(&self) -> ColorFormat;

    /// Raw pixel memory, row-major, no padding between rows
    fn data(&self) -> &[Cell<u8>];

    /// Size of one frame in bytes
    fn size_bytes(&self) -> usize {
        self.width() as usize * self.height() as usize * self.color_format().bytes_per_pixel()
    }

    /// Bytes per row
    fn pitch_bytes(&self) -> usize {
        self.width() as usize * self.color_format().bytes_per_pixel()
    }
}

/// Check if two frame buffer handles refer to the same buffer
pub fn same_frame_buffer(a: &dyn FrameBuffer, b: &dyn FrameBuffer) -> bool {
    core::ptr::addr_eq(a, b)
}
