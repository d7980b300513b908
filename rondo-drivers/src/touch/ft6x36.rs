//! FT6x36 capacitive touch controller (I2C)
//!
//! The FT6x36 family (FT6206, FT6236, FT6336, FT3267) tracks up to two
//! contacts. All touch data lives in one register block starting at
//! `TD_STATUS`, so a poll is a single write-read transaction:
//!
//! ```text
//! 0x02        TD_STATUS   [3:0] number of touch points
//! 0x03..0x08  P1          XH, XL, YH, YL, WEIGHT, MISC
//! 0x09..0x0E  P2          XH, XL, YH, YL, WEIGHT, MISC
//! ```
//!
//! `Pn_XH[7:6]` holds the event flag (00 press down, 01 lift up,
//! 10 contact, 11 no event); `Pn_XH[3:0]` and `Pn_YH[3:0]` are the high
//! nibbles of the 12-bit coordinates.

use rondo_core::touch::{RawTouch, RawTouchSnapshot, TouchContact, MAX_TOUCH_POINTS};
use rondo_core::traits::{RawTouchListener, TouchSource};
use rondo_hal::I2cBus;

/// FT6x36 register addresses
pub mod reg {
    /// Device mode (0 = working mode)
    pub const DEV_MODE: u8 = 0x00;
    /// Gesture id
    pub const GEST_ID: u8 = 0x01;
    /// Number of touch points
    pub const TD_STATUS: u8 = 0x02;
    /// First touch point block
    pub const P1_XH: u8 = 0x03;
    /// Second touch point block
    pub const P2_XH: u8 = 0x09;
    /// Touch detection threshold
    pub const TH_GROUP: u8 = 0x80;
    /// Report rate in active mode
    pub const PERIOD_ACTIVE: u8 = 0x88;
    /// Chip id
    pub const CHIP_ID: u8 = 0xA3;
    /// Interrupt mode (0 = polling, 1 = trigger)
    pub const G_MODE: u8 = 0xA4;
    /// Firmware version
    pub const FIRMWARE_ID: u8 = 0xA6;
    /// Vendor id
    pub const VENDOR_ID: u8 = 0xA8;
}

/// Default 7-bit I2C address
pub const DEFAULT_ADDRESS: u8 = 0x38;

/// Bytes per touch point block
const POINT_BLOCK_LEN: usize = 6;

/// TD_STATUS plus two point blocks
const TOUCH_DATA_LEN: usize = 1 + MAX_TOUCH_POINTS * POINT_BLOCK_LEN;

/// Errors from the touch controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchError<E> {
    /// I2C transfer failed
    Bus(E),
    /// Controller returned an impossible touch count
    InvalidData,
}

impl<E> From<E> for TouchError<E> {
    fn from(e: E) -> Self {
        TouchError::Bus(e)
    }
}

/// Mapping from controller axes to screen axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Orientation {
    /// Exchange X and Y before mirroring
    pub swap_xy: bool,
    /// Mirror horizontally
    pub mirror_x: bool,
    /// Mirror vertically
    pub mirror_y: bool,
}

/// Touch controller configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ft6x36Config {
    /// 7-bit I2C address
    pub address: u8,
    /// Axis mapping for the panel mounting
    pub orientation: Orientation,
    /// Screen width in pixels (after swap)
    pub width: u16,
    /// Screen height in pixels (after swap)
    pub height: u16,
    /// Touch detection threshold, `None` keeps the controller default
    pub threshold: Option<u8>,
    /// Pulse the interrupt line on each report instead of holding it
    pub trigger_mode: bool,
}

impl Default for Ft6x36Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            orientation: Orientation::default(),
            width: 480,
            height: 480,
            threshold: None,
            trigger_mode: true,
        }
    }
}

impl Ft6x36Config {
    /// Map a controller coordinate onto the screen
    pub fn map(&self, raw_x: u16, raw_y: u16) -> (u16, u16) {
        let (mut x, mut y) = if self.orientation.swap_xy {
            (raw_y, raw_x)
        } else {
            (raw_x, raw_y)
        };

        let max_x = self.width.saturating_sub(1);
        let max_y = self.height.saturating_sub(1);
        x = x.min(max_x);
        y = y.min(max_y);

        if self.orientation.mirror_x {
            x = max_x - x;
        }
        if self.orientation.mirror_y {
            y = max_y - y;
        }
        (x, y)
    }
}

/// Decode the touch data block read from `TD_STATUS`
///
/// Returns `None` when the controller reports more contacts than it can
/// track, which some panels do while idle (status reads 0x0F).
pub fn decode_touch_data(
    data: &[u8; TOUCH_DATA_LEN],
    config: &Ft6x36Config,
) -> Option<RawTouchSnapshot> {
    let count = data[0] & 0x0F;
    if usize::from(count) > MAX_TOUCH_POINTS {
        return None;
    }

    let mut snapshot = RawTouchSnapshot {
        count,
        ..RawTouchSnapshot::released()
    };

    for (index, touch) in snapshot.touches.iter_mut().enumerate() {
        let block = &data[1 + index * POINT_BLOCK_LEN..1 + (index + 1) * POINT_BLOCK_LEN];
        let contact = match block[0] >> 6 {
            0b00 => TouchContact::PressDown,
            0b01 => TouchContact::LiftUp,
            0b10 => TouchContact::Contact,
            _ => TouchContact::NoEvent,
        };
        let raw_x = (u16::from(block[0] & 0x0F) << 8) | u16::from(block[1]);
        let raw_y = (u16::from(block[2] & 0x0F) << 8) | u16::from(block[3]);
        let (x, y) = config.map(raw_x, raw_y);
        *touch = RawTouch::new(x, y, contact);
    }

    Some(snapshot)
}

/// FT6x36 driver
pub struct Ft6x36<'a, I2C> {
    bus: I2C,
    config: Ft6x36Config,
    listener: Option<&'a dyn RawTouchListener>,
}

impl<'a, I2C: I2cBus> Ft6x36<'a, I2C> {
    /// Create a driver; call [`init`](Self::init) before polling
    pub fn new(bus: I2C, config: Ft6x36Config) -> Self {
        Self {
            bus,
            config,
            listener: None,
        }
    }

    pub fn config(&self) -> &Ft6x36Config {
        &self.config
    }

    /// Put the controller in working mode and apply the configuration
    pub fn init(&mut self) -> Result<(), TouchError<I2C::Error>> {
        let address = self.config.address;
        self.bus.write_register(address, reg::DEV_MODE, 0x00)?;
        self.bus
            .write_register(address, reg::G_MODE, u8::from(self.config.trigger_mode))?;
        if let Some(threshold) = self.config.threshold {
            self.bus.write_register(address, reg::TH_GROUP, threshold)?;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("ft6x36: initialized at {=u8:#x}", address);

        Ok(())
    }

    /// Read the chip id register
    pub fn chip_id(&mut self) -> Result<u8, TouchError<I2C::Error>> {
        Ok(self.bus.read_register(self.config.address, reg::CHIP_ID)?)
    }

    /// Read the firmware version register
    pub fn firmware_version(&mut self) -> Result<u8, TouchError<I2C::Error>> {
        Ok(self.bus.read_register(self.config.address, reg::FIRMWARE_ID)?)
    }

    /// Read the current touch state
    pub fn read_snapshot(&mut self) -> Result<RawTouchSnapshot, TouchError<I2C::Error>> {
        let mut data = [0u8; TOUCH_DATA_LEN];
        self.bus
            .write_read(self.config.address, &[reg::TD_STATUS], &mut data)?;
        decode_touch_data(&data, &self.config).ok_or(TouchError::InvalidData)
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.bus
    }
}

impl<'a, I2C: I2cBus> TouchSource<'a> for Ft6x36<'a, I2C> {
    type Error = TouchError<I2C::Error>;

    fn register_touch_event_callback(&mut self, listener: &'a dyn RawTouchListener) {
        self.listener = Some(listener);
    }

    fn unregister_touch_event_callback(&mut self) {
        self.listener = None;
    }

    fn poll(&mut self) -> Result<RawTouchSnapshot, Self::Error> {
        let snapshot = match self.read_snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("ft6x36: touch read failed");
                return Err(e);
            }
        };

        if let Some(listener) = self.listener {
            listener.on_raw_touch(&snapshot);
        }
        Ok(snapshot)
    }
}
