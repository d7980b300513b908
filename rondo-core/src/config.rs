//! Panel configuration
//!
//! Immutable records describing the display the scene renders to. They
//! are built once at startup and passed to whatever needs them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::traits::ColorFormat;

/// Display panel geometry and pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelConfig {
    /// Visible width in pixels
    pub width: u16,
    /// Visible height in pixels
    pub height: u16,
    /// Frame buffer pixel format
    pub color_format: ColorFormat,
}

impl PanelConfig {
    pub const fn new(width: u16, height: u16, color_format: ColorFormat) -> Self {
        Self {
            width,
            height,
            color_format,
        }
    }

    /// Bytes in one row of the frame buffer
    pub const fn bytes_per_line(&self) -> usize {
        self.width as usize * self.color_format.bytes_per_pixel()
    }

    /// Bytes in one full frame
    pub const fn frame_size_bytes(&self) -> usize {
        self.bytes_per_line() * self.height as usize
    }

    /// Check if the frame is square, as it is for round panels
    pub const fn is_square(&self) -> bool {
        self.width == self.height
    }
}
