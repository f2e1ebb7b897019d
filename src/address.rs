//! Pixel to bitmap address translation.
//!
//! The bitmap is kept in chain order so [`crate::Panel::write`] can stream it
//! without reshuffling: module `k` owns bytes `8k..8k + 8`, byte `n` of a
//! module is its digit register `n`, and bit `b` of that byte is row `b` of
//! the column (LSB first).
//!
//! A canvas coordinate goes through four steps on its way to a bit:
//!
//! 1. canvas rotation (mirror x, mirror y, swap; in that order),
//! 2. grid slot lookup through the position table,
//! 3. the module's own rotation, same composition on an 8x8 square,
//! 4. re-embedding into the chain-ordered layout.
//!
//! [`address_to_pixel`] walks the same steps backwards.

use crate::MODULE_SIZE;

/// Quarter turns, clockwise.
///
/// Used both for the canvas as a whole and for individual modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Rotation {
    /// No rotation
    #[default]
    Deg0 = 0,
    /// 90 degrees clockwise
    Deg90 = 1,
    /// 180 degrees
    Deg180 = 2,
    /// 90 degrees counter clockwise
    Deg270 = 3,
}

impl Rotation {
    /// Build from a quarter-turn count, only the two low bits are used.
    pub const fn from_quarter_turns(turns: u8) -> Self {
        match turns & 0b11 {
            0 => Self::Deg0,
            1 => Self::Deg90,
            2 => Self::Deg180,
            _ => Self::Deg270,
        }
    }

    pub const fn quarter_turns(self) -> u8 {
        self as u8
    }

    /// True for 90 and 270 degrees, where width and height trade places.
    pub const fn is_transposed(self) -> bool {
        self as u8 & 1 == 1
    }

    /// Rotate `(x, y)` inside a `width x height` area as seen before the
    /// rotation.
    ///
    /// Mirror x for 180/270, mirror y for 90/180, then swap for 90/270. The
    /// order matters on the boundary, keep it.
    pub const fn apply(self, x: i32, y: i32, width: i32, height: i32) -> (i32, i32) {
        let r = self as u8;
        let mut x = x;
        let mut y = y;
        if r >= 2 {
            x = width - 1 - x;
        }
        if r == 1 || r == 2 {
            y = height - 1 - y;
        }
        if r & 1 == 1 {
            (y, x)
        } else {
            (x, y)
        }
    }

    /// Undo [`Rotation::apply`] for the same `width x height` area.
    pub const fn invert(self, x: i32, y: i32, width: i32, height: i32) -> (i32, i32) {
        let r = self as u8;
        let (mut x, mut y) = if r & 1 == 1 { (y, x) } else { (x, y) };
        if r == 1 || r == 2 {
            y = height - 1 - y;
        }
        if r >= 2 {
            x = width - 1 - x;
        }
        (x, y)
    }
}

impl From<u8> for Rotation {
    fn from(turns: u8) -> Self {
        Self::from_quarter_turns(turns)
    }
}

/// Location of one pixel in the bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitAddress {
    /// Byte offset into the bitmap.
    pub byte: usize,
    /// Bit inside that byte, `0..8`.
    pub bit: u8,
}

impl BitAddress {
    pub const fn mask(&self) -> u8 {
        1 << (self.bit & 0b111)
    }
}

/// Module layout the translation works on.
#[derive(Debug, Clone, Copy)]
pub struct Geometry<'a> {
    /// Modules per grid row.
    pub h_displays: usize,
    /// Modules per grid column.
    pub v_displays: usize,
    /// Grid slot (row-major) to chain index.
    pub positions: &'a [u8],
    /// Rotation of each module, indexed by chain index.
    pub rotations: &'a [Rotation],
}

impl Geometry<'_> {
    /// Unrotated canvas width in pixels.
    pub const fn width(&self) -> i32 {
        (self.h_displays * MODULE_SIZE) as i32
    }

    /// Unrotated canvas height in pixels.
    pub const fn height(&self) -> i32 {
        (self.v_displays * MODULE_SIZE) as i32
    }

    /// Canvas extents as seen through `rotation`.
    pub const fn rotated_size(&self, rotation: Rotation) -> (i32, i32) {
        if rotation.is_transposed() {
            (self.height(), self.width())
        } else {
            (self.width(), self.height())
        }
    }

    pub const fn displays(&self) -> usize {
        self.h_displays * self.v_displays
    }
}

/// Resolve a canvas pixel to its bit in the bitmap.
///
/// Returns `None` for pixels outside the canvas.
pub fn pixel_to_address(geometry: &Geometry<'_>, rotation: Rotation, x: i32, y: i32) -> Option<BitAddress> {
    let (view_w, view_h) = geometry.rotated_size(rotation);
    if x < 0 || x >= view_w || y < 0 || y >= view_h {
        return None;
    }
    let (x, y) = rotation.apply(x, y, view_w, view_h);

    let slot = (x >> 3) as usize + geometry.h_displays * (y >> 3) as usize;
    let display = usize::from(geometry.positions[slot]);

    let side = MODULE_SIZE as i32;
    let (x, y) = geometry.rotations[display].apply(x & 0b111, y & 0b111, side, side);

    // Re-embed into the chain layout: display d sits at column d % h, row d / h
    let d = display / geometry.h_displays;
    let x = x as usize + ((display - d * geometry.h_displays) << 3);
    let y = y as usize + (d << 3);

    Some(BitAddress {
        byte: x + geometry.width() as usize * (y >> 3),
        bit: (y & 0b111) as u8,
    })
}

/// Resolve a bit in the bitmap back to the canvas pixel it shows.
///
/// Returns `None` when the address is past the bitmap or its module is not
/// placed anywhere in the grid.
pub fn address_to_pixel(geometry: &Geometry<'_>, rotation: Rotation, address: BitAddress) -> Option<(i32, i32)> {
    let display = address.byte / MODULE_SIZE;
    if display >= geometry.displays() || address.bit >= MODULE_SIZE as u8 {
        return None;
    }

    let slot = geometry
        .positions
        .iter()
        .take(geometry.displays())
        .position(|&p| usize::from(p) == display)?;

    let side = MODULE_SIZE as i32;
    let local_x = (address.byte % MODULE_SIZE) as i32;
    let local_y = i32::from(address.bit);
    let (x, y) = geometry.rotations[display].invert(local_x, local_y, side, side);

    let x = x + ((slot % geometry.h_displays) * MODULE_SIZE) as i32;
    let y = y + ((slot / geometry.h_displays) * MODULE_SIZE) as i32;

    let (view_w, view_h) = geometry.rotated_size(rotation);
    Some(rotation.invert(x, y, view_w, view_h))
}
