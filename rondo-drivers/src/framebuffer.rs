//! RAM frame buffer
//!
//! Wraps a caller-provided byte buffer (usually a static in SRAM or
//! external PSRAM that the DSI host scans out) as a [`FrameBuffer`].
//! Pixels are stored row-major in little-endian order: ARGB8888 as
//! B, G, R, A and RGB888 as B, G, R.

use core::cell::Cell;

use rondo_core::config::PanelConfig;
use rondo_core::geometry::Point;
use rondo_core::traits::{ColorFormat, FrameBuffer};

/// Errors when wrapping memory as a frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameBufferError {
    /// Panel width or height is zero
    ZeroSize,
    /// Backing storage is smaller than one frame
    TooSmall,
}

/// 32-bit ARGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Self = Self(0xFF00_0000);
    pub const WHITE: Self = Self(0xFFFF_FFFF);
    pub const TRANSPARENT: Self = Self(0x0000_0000);

    /// Opaque color from 8-bit channels
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Memory representation in `format`; only the first
    /// `format.bytes_per_pixel()` bytes are meaningful
    pub const fn to_bytes(self, format: ColorFormat) -> [u8; 4] {
        let [b, g, r, a] = self.0.to_le_bytes();
        match format {
            ColorFormat::Argb8888 => [b, g, r, a],
            ColorFormat::Rgb888 => [b, g, r, 0],
        }
    }

    /// Decode a pixel from its memory representation
    pub fn from_bytes(bytes: &[u8], format: ColorFormat) -> Option<Self> {
        match (format, bytes) {
            (ColorFormat::Argb8888, &[b, g, r, a, ..]) => {
                Some(Self(u32::from_le_bytes([b, g, r, a])))
            }
            (ColorFormat::Rgb888, &[b, g, r, ..]) => Some(Self::rgb(r, g, b)),
            _ => None,
        }
    }
}

/// Axis-aligned pixel area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Area {
    /// Top left corner
    pub origin: Point,
    pub width: u32,
    pub height: u32,
}

impl Area {
    pub const fn new(origin: Point, width: u32, height: u32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if `point` lies inside the area
    pub fn contains(&self, point: Point) -> bool {
        let dx = i64::from(point.x) - i64::from(self.origin.x);
        let dy = i64::from(point.y) - i64::from(self.origin.y);
        dx >= 0 && dy >= 0 && dx < i64::from(self.width) && dy < i64::from(self.height)
    }

    /// Part of the area inside a `width` x `height` surface at the origin
    pub fn clip(&self, width: u32, height: u32) -> Option<Area> {
        let left = i64::from(self.origin.x).max(0);
        let top = i64::from(self.origin.y).max(0);
        let right = (i64::from(self.origin.x) + i64::from(self.width)).min(i64::from(width));
        let bottom = (i64::from(self.origin.y) + i64::from(self.height)).min(i64::from(height));

        if right <= left || bottom <= top {
            return None;
        }
        // Bounded by the surface size, which fits u32
        Some(Area {
            origin: Point::new(left as i32, top as i32),
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        })
    }
}

/// Byte offset of pixel (x, y) inside `buffer`
pub fn pixel_offset(buffer: &dyn FrameBuffer, x: u32, y: u32) -> Option<usize> {
    if x >= buffer.width() || y >= buffer.height() {
        return None;
    }
    Some(y as usize * buffer.pitch_bytes() + x as usize * buffer.color_format().bytes_per_pixel())
}

/// Fill `area` of any frame buffer with `color` using the CPU
///
/// The area is clipped to the buffer. Returns the number of pixels written.
pub fn fill_area(buffer: &dyn FrameBuffer, area: Area, color: Color) -> usize {
    let Some(clipped) = area.clip(buffer.width(), buffer.height()) else {
        return 0;
    };

    let format = buffer.color_format();
    let bpp = format.bytes_per_pixel();
    let bytes = color.to_bytes(format);
    let data = buffer.data();
    let mut written = 0;

    for row in 0..clipped.height {
        let y = clipped.origin.y as u32 + row;
        let Some(start) = pixel_offset(buffer, clipped.origin.x as u32, y) else {
            continue;
        };
        let end = start + clipped.width as usize * bpp;
        let Some(line) = data.get(start..end) else {
            continue;
        };
        for pixel in line.chunks_exact(bpp) {
            for (cell, byte) in pixel.iter().zip(bytes.iter()) {
                cell.set(*byte);
            }
            written += 1;
        }
    }
    written
}

/// Frame buffer over borrowed RAM
pub struct RamFrameBuffer<'b> {
    cells: &'b [Cell<u8>],
    config: PanelConfig,
}

impl<'b> RamFrameBuffer<'b> {
    /// Wrap `storage` as a frame for `config`
    ///
    /// Storage beyond one frame is left unused.
    pub fn new(storage: &'b mut [u8], config: PanelConfig) -> Result<Self, FrameBufferError> {
        if config.width == 0 || config.height == 0 {
            return Err(FrameBufferError::ZeroSize);
        }
        let size = config.frame_size_bytes();
        let frame = storage.get_mut(..size).ok_or(FrameBufferError::TooSmall)?;

        Ok(Self {
            cells: Cell::from_mut(frame).as_slice_of_cells(),
            config,
        })
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Color at (x, y), `None` outside the frame
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let offset = pixel_offset(self, x, y)?;
        let bpp = self.config.color_format.bytes_per_pixel();
        let mut bytes = [0u8; 4];
        for (byte, cell) in bytes.iter_mut().zip(&self.cells[offset..offset + bpp]) {
            *byte = cell.get();
        }
        Color::from_bytes(&bytes[..bpp], self.config.color_format)
    }

    /// Write one pixel; returns false outside the frame
    pub fn write_pixel(&self, x: u32, y: u32, color: Color) -> bool {
        let Some(offset) = pixel_offset(self, x, y) else {
            return false;
        };
        let bpp = self.config.color_format.bytes_per_pixel();
        let bytes = color.to_bytes(self.config.color_format);
        for (cell, byte) in self.cells[offset..offset + bpp].iter().zip(bytes.iter()) {
            cell.set(*byte);
        }
        true
    }

    /// Fill `area`, clipped to the frame; returns the pixels written
    pub fn fill_rect(&self, area: Area, color: Color) -> usize {
        fill_area(self, area, color)
    }

    /// Fill the whole frame
    pub fn clear(&self, color: Color) {
        self.fill_rect(Area::new(Point::zero(), self.width(), self.height()), color);
    }
}

impl FrameBuffer for RamFrameBuffer<'_> {
    fn width(&self) -> u32 {
        u32::from(self.config.width)
    }

    fn height(&self) -> u32 {
        u32::from(self.config.height)
    }

    fn color_format(&self) -> ColorFormat {
        self.config.color_format
    }

    fn data(&self) -> &[Cell<u8>] {
        self.cells
    }
}
