//! Rondo Hardware Abstraction Layer
//!
//! This crate defines the bus traits that chip-specific HALs implement
//! for the peripheral drivers in `rondo-drivers`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  rondo-core (scene, touch dispatch)     │
//! └─────────────────────────────────────────┘
//!                     ▲
//!                     │
//! ┌─────────────────────────────────────────┐
//! │  rondo-drivers (touch panel, widgets)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  rondo-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - I2C master used by the touch controller

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;

pub use i2c::{I2cBus, I2cConfig};
