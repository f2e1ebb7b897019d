//! Framebuffer driver for chains of 8x8 LED matrix modules built on the
//! MAX7219 / MAX7221.
//!
//! The modules form a `h_displays x v_displays` grid. Each one can sit anywhere
//! in the daisy chain and be mounted in any of four orientations; the whole
//! canvas can additionally be rotated. Drawing only touches an in-memory
//! bitmap, [`Panel::write`] streams it to the hardware.
//!
//! ```ignore
//! use max72xx_panel::{Panel, Rotation};
//!
//! let mut panel = Panel::from_spi_cs(spi, cs, 4, 1)?;
//! for module in 0..4 {
//!     panel.set_module_rotation(module, Rotation::Deg270);
//! }
//! panel.draw_pixel(9, 3, true);
//! panel.write()?;
//! ```
//!
//! # Testing
//!
//! ```bash
//! cargo test --lib --target x86_64-unknown-linux-gnu
//! ```
//!
//! Tests run with `std` (via `cfg_attr`); the driver itself is `no_std`.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod address;
pub mod command;
pub mod connector;
pub mod error;
pub mod graphics;
pub mod panel;

#[cfg(test)]
mod mock;

pub use address::{address_to_pixel, pixel_to_address, BitAddress, Geometry, Rotation};
pub use command::Command;
pub use connector::{Connector, PinConnector, SpiConnector};
pub use error::DataError;
pub use graphics::PixelSurface;
pub use panel::{ClipRegion, Panel, PowerState};

/// Maximum number of modules in one chain supported by this crate.
pub const MAX_DISPLAYS: usize = 32;

/// Rows (and columns) per module.
pub const MODULE_SIZE: usize = 8;

/// Size of the largest bitmap buffer, one byte per module column.
pub const BITMAP_CAPACITY: usize = MAX_DISPLAYS * MODULE_SIZE;

/// Brightness programmed at power-up and on [`Panel::reset`].
pub const DEFAULT_INTENSITY: u8 = 7;

/// Brightest level the intensity register decodes.
pub const MAX_INTENSITY: u8 = 0x0F;
