//! The panel controller: bitmap, module tables and the transfer protocol.

use heapless::Vec;

use crate::address::{pixel_to_address, Geometry, Rotation};
use crate::connector::{Connector, PinConnector, SpiConnector};
use crate::{Command, DataError, BITMAP_CAPACITY, DEFAULT_INTENSITY, MAX_DISPLAYS, MODULE_SIZE};

use embedded_hal::blocking::spi::Write;
use embedded_hal::digital::v2::OutputPin;

/// Power state of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Shutdown register cleared, LEDs dark, registers retained.
    ShutDown,
    Active,
}

/// Inclusive clip rectangle, in translated canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClipRegion {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl ClipRegion {
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }
}

///
/// A grid of 8x8 modules driven as one monochrome canvas.
///
/// Drawing only changes the in-memory bitmap. Call [`Panel::write`] to
/// send it to the chain.
///
pub struct Panel<CONNECTOR> {
    c: CONNECTOR,
    bitmap: Vec<u8, BITMAP_CAPACITY>,
    h_displays: usize,
    v_displays: usize,
    /// Grid slot to chain index
    positions: Vec<u8, MAX_DISPLAYS>,
    /// Chain index to module rotation
    rotations: Vec<Rotation, MAX_DISPLAYS>,
    rotation: Rotation,
    clip: Option<ClipRegion>,
    focused_line: Option<usize>,
    tx: i32,
    ty: i32,
    optimize_hint: bool,
    power: PowerState,
    intensity: u8,
}

impl<SPI, CS> Panel<SpiConnector<SPI, CS>>
where
    SPI: Write<u8>,
    CS: OutputPin,
{
    ///
    /// Construct a panel on a hardware SPI bus with its own chip select pin.
    ///
    /// # Arguments
    ///
    /// * `spi` - SPI bus, mode 0, MSB first, up to 10 MHz
    /// * `cs` - chip select (LOAD) pin
    /// * `h_displays` / `v_displays` - module grid dimensions
    ///
    /// # Errors
    ///
    /// * `DataError` - returned in case there was an error during the init sequence
    ///
    pub fn from_spi_cs(spi: SPI, cs: CS, h_displays: usize, v_displays: usize) -> Result<Self, DataError> {
        Self::new(SpiConnector::new(spi, cs), h_displays, v_displays)
    }
}

impl<DATA, CS, SCK> Panel<PinConnector<DATA, CS, SCK>>
where
    DATA: OutputPin,
    CS: OutputPin,
    SCK: OutputPin,
{
    /// Construct a panel on three bit-banged GPIO pins.
    ///
    /// # Errors
    ///
    /// * `DataError` - returned in case there was an error during the init sequence
    pub fn from_pins(data: DATA, cs: CS, sck: SCK, h_displays: usize, v_displays: usize) -> Result<Self, DataError> {
        Self::new(PinConnector::new(data, cs, sck), h_displays, v_displays)
    }
}

impl<CONNECTOR> Panel<CONNECTOR>
where
    CONNECTOR: Connector,
{
    ///
    /// Construct a panel over any connector and bring the chain up: blank
    /// bitmap, init registers, display on, medium brightness.
    ///
    /// # Panics
    ///
    /// If the grid is empty or holds more than [`MAX_DISPLAYS`] modules.
    ///
    /// # Errors
    ///
    /// * `DataError` - returned in case there was an error during the init sequence
    ///
    pub fn new(connector: CONNECTOR, h_displays: usize, v_displays: usize) -> Result<Self, DataError> {
        let displays = h_displays * v_displays;
        assert!(displays > 0, "module grid must not be empty");
        assert!(
            displays <= MAX_DISPLAYS,
            "{} modules exceed the supported {}",
            displays,
            MAX_DISPLAYS
        );

        let mut panel = Self {
            c: connector,
            bitmap: core::iter::repeat(0).take(displays * MODULE_SIZE).collect(),
            h_displays,
            v_displays,
            positions: (0..displays as u8).collect(),
            rotations: core::iter::repeat(Rotation::Deg0).take(displays).collect(),
            rotation: Rotation::Deg0,
            clip: None,
            focused_line: None,
            tx: 0,
            ty: 0,
            optimize_hint: false,
            power: PowerState::ShutDown,
            intensity: DEFAULT_INTENSITY,
        };

        info!("panel: {}x{} modules", h_displays, v_displays);
        panel.reset()?;
        Ok(panel)
    }

    ///
    /// Clear the bitmap and put every chip back into its initial state.
    ///
    /// # Errors
    ///
    /// * `DataError` - returned in case there was an error during data transfer
    ///
    pub fn reset(&mut self) -> Result<(), DataError> {
        self.fill_screen(false);

        // Leave test mode, scan all eight digits, raw bitmap data
        self.spi_transfer(Command::DisplayTest, 0)?;
        self.spi_transfer(Command::ScanLimit, 7)?;
        self.spi_transfer(Command::DecodeMode, 0)?;

        self.write()?;
        self.shutdown(false)?;
        self.set_intensity(DEFAULT_INTENSITY)
    }

    /// Destroy the panel and hand back the connector.
    pub fn release(self) -> CONNECTOR {
        self.c
    }

    pub fn connector(&self) -> &CONNECTOR {
        &self.c
    }

    fn geometry(&self) -> Geometry<'_> {
        Geometry {
            h_displays: self.h_displays,
            v_displays: self.v_displays,
            positions: &self.positions,
            rotations: &self.rotations,
        }
    }

    /// Number of modules in the chain.
    pub fn displays(&self) -> usize {
        self.h_displays * self.v_displays
    }

    pub fn h_displays(&self) -> usize {
        self.h_displays
    }

    pub fn v_displays(&self) -> usize {
        self.v_displays
    }

    /// Packed bitmap in chain order, eight bytes per module.
    pub fn bitmap(&self) -> &[u8] {
        &self.bitmap
    }

    ///
    /// Define how the modules are ordered. Module 0 is the one closest to
    /// the microcontroller.
    ///
    /// # Arguments
    ///
    /// * `display` - chain index of the module
    /// * `x`, `y` - grid slot it occupies
    ///
    /// # Panics
    ///
    /// If `display` or the slot lies outside the grid.
    ///
    pub fn set_position(&mut self, display: usize, x: usize, y: usize) {
        assert!(
            x < self.h_displays && y < self.v_displays,
            "grid slot ({}, {}) outside {}x{} grid",
            x,
            y,
            self.h_displays,
            self.v_displays
        );
        assert!(display < self.displays(), "no module {} in the chain", display);
        self.positions[x + self.h_displays * y] = display as u8;
    }

    /// Chain index of the module in grid slot `(x, y)`.
    pub fn position(&self, x: usize, y: usize) -> usize {
        assert!(x < self.h_displays && y < self.v_displays, "grid slot ({}, {}) outside grid", x, y);
        usize::from(self.positions[x + self.h_displays * y])
    }

    ///
    /// Define if and how a module is mounted rotated.
    ///
    /// # Panics
    ///
    /// If `display` is not in the chain.
    ///
    pub fn set_module_rotation(&mut self, display: usize, rotation: Rotation) {
        assert!(display < self.displays(), "no module {} in the chain", display);
        self.rotations[display] = rotation;
    }

    pub fn module_rotation(&self, display: usize) -> Rotation {
        self.rotations[display]
    }

    /// Rotate the canvas as a whole. Applied before the per module rotation.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Canvas width as seen through the canvas rotation.
    pub fn width(&self) -> u32 {
        self.geometry().rotated_size(self.rotation).0 as u32
    }

    /// Canvas height as seen through the canvas rotation.
    pub fn height(&self) -> u32 {
        self.geometry().rotated_size(self.rotation).1 as u32
    }

    /// Height of the addressable area: one module row while focused.
    pub fn focused_height(&self) -> u32 {
        match self.focused_line {
            Some(_) => MODULE_SIZE as u32,
            None => self.height(),
        }
    }

    /// Shortcut hint for sequential, uniformly rotated chains. Stored only.
    pub fn set_optimize_hint(&mut self, hint: bool) {
        self.optimize_hint = hint;
    }

    pub fn optimize_hint(&self) -> bool {
        self.optimize_hint
    }

    ///
    /// Restrict drawing to an inclusive rectangle.
    ///
    /// A degenerate rectangle, or one starting outside the canvas, turns
    /// clipping off instead.
    ///
    pub fn clip(&mut self, x_min: u16, y_min: u16, x_max: u16, y_max: u16) {
        if x_min >= x_max
            || y_min >= y_max
            || u32::from(x_min) >= self.width()
            || u32::from(y_min) >= self.height()
        {
            warn!("clip ({}, {})..({}, {}) rejected, clipping disabled", x_min, y_min, x_max, y_max);
            self.reset_clip();
            return;
        }
        self.clip = Some(ClipRegion {
            x_min: i32::from(x_min),
            y_min: i32::from(y_min),
            x_max: i32::from(x_max),
            y_max: i32::from(y_max),
        });
    }

    pub fn reset_clip(&mut self) {
        self.clip = None;
    }

    pub fn clip_region(&self) -> Option<ClipRegion> {
        self.clip
    }

    ///
    /// Act as if module row `line` was the entire canvas. `None` restores
    /// the full canvas.
    ///
    /// Drawing outside the row is dropped and y coordinates of
    /// [`Panel::draw_pixel`] are shifted down to it.
    ///
    /// # Panics
    ///
    /// If `line` is not a row of the grid.
    ///
    pub fn focus_on_line(&mut self, line: Option<usize>) {
        if let Some(line) = line {
            assert!(line < self.v_displays, "no module row {}", line);
        }
        self.focused_line = line;
        self.ty = line.map_or(0, |line| (line * MODULE_SIZE) as i32);
        trace!("focus offset {}", self.ty);
    }

    /// Focus on `line` and return the line focused before.
    pub fn swap_focus(&mut self, line: Option<usize>) -> Option<usize> {
        let previous = self.focused_line;
        self.focus_on_line(line);
        previous
    }

    pub fn focused_line(&self) -> Option<usize> {
        self.focused_line
    }

    /// Shift every drawn pixel `tx` columns to the right.
    pub fn set_x_offset(&mut self, tx: i32) {
        self.tx = tx;
    }

    /// Current `(tx, ty)` added to drawing coordinates.
    pub fn translation(&self) -> (i32, i32) {
        (self.tx, self.ty)
    }

    ///
    /// Set or clear one pixel in the bitmap.
    ///
    /// Pixels outside the canvas, the clip region or the focused row are
    /// silently dropped.
    ///
    pub fn draw_pixel(&mut self, x: i32, y: i32, on: bool) {
        if self.focused_line.is_some() && !(0..MODULE_SIZE as i32).contains(&y) {
            return;
        }

        let (Some(x), Some(y)) = (x.checked_add(self.tx), y.checked_add(self.ty)) else {
            return;
        };
        if let Some(clip) = &self.clip {
            if !clip.contains(x, y) {
                return;
            }
        }

        let Some(address) = pixel_to_address(&self.geometry(), self.rotation, x, y) else {
            return;
        };

        if on {
            self.bitmap[address.byte] |= address.mask();
        } else {
            self.bitmap[address.byte] &= !address.mask();
        }
    }

    ///
    /// Read one pixel back from the bitmap, `false` outside the canvas.
    ///
    /// The translation used by [`Panel::draw_pixel`] is not applied here: with
    /// a focused line, reads still address the full canvas.
    ///
    pub fn read_pixel(&self, x: i32, y: i32) -> bool {
        match pixel_to_address(&self.geometry(), self.rotation, x, y) {
            Some(address) => self.bitmap[address.byte] & address.mask() != 0,
            None => false,
        }
    }

    /// Set every pixel, ignoring clip and focus.
    pub fn fill_screen(&mut self, on: bool) {
        let value = if on { 0xFF } else { 0x00 };
        self.bitmap.iter_mut().for_each(|b| *b = value);
    }

    ///
    /// Set the shutdown (power saving) mode of every module.
    ///
    /// Waking up re-sends the init registers, so the chain ends up in a
    /// known state whatever happened before.
    ///
    /// # Errors
    ///
    /// * `DataError` - returned in case there was an error during data transfer
    ///
    pub fn shutdown(&mut self, enable: bool) -> Result<(), DataError> {
        if enable {
            self.spi_transfer(Command::Shutdown, 0)?;
            self.power = PowerState::ShutDown;
        } else {
            self.spi_transfer(Command::DisplayTest, 0)?;
            self.spi_transfer(Command::ScanLimit, 7)?;
            self.spi_transfer(Command::DecodeMode, 0)?;
            self.spi_transfer(Command::Shutdown, 1)?;
            self.power = PowerState::Active;
        }
        debug!("power {}", self.power);
        Ok(())
    }

    pub fn power_state(&self) -> PowerState {
        self.power
    }

    ///
    /// Sets the brightness of every module.
    ///
    /// # Arguments
    ///
    /// * `intensity` - `0x00` to [`MAX_INTENSITY`](crate::MAX_INTENSITY), sent
    ///   unchanged. The chip only decodes the low nibble, so `0x40` is level 0.
    ///
    /// # Errors
    ///
    /// * `DataError` - returned in case there was an error during data transfer
    ///
    pub fn set_intensity(&mut self, intensity: u8) -> Result<(), DataError> {
        self.spi_transfer(Command::Intensity, intensity)?;
        self.intensity = intensity;
        Ok(())
    }

    pub fn intensity(&self) -> u8 {
        self.intensity
    }

    ///
    /// Send the bitmap to the modules, one burst per digit register.
    ///
    /// # Errors
    ///
    /// * `DataError` - returned in case there was an error during data transfer
    ///
    pub fn write(&mut self) -> Result<(), DataError> {
        for row in (0..MODULE_SIZE as u8).rev() {
            self.spi_transfer(Command::digit(row), 0)?;
        }
        trace!("bitmap written");
        Ok(())
    }

    // Digit registers carry each module's own byte, control registers get the
    // same (command, data) pair everywhere. The last module goes out first.
    fn spi_transfer(&mut self, command: Command, data: u8) -> Result<(), DataError> {
        let displays = self.displays();
        let mut frame = [0u8; 2 * MAX_DISPLAYS];

        for (pair, display) in frame.chunks_exact_mut(2).zip((0..displays).rev()) {
            pair[0] = command.into();
            pair[1] = match command.row() {
                Some(row) => self.bitmap[display * MODULE_SIZE + row],
                None => data,
            };
        }

        self.c.write_frame(&frame[..2 * displays])
    }
}
