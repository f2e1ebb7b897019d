//! Firmware configuration constants.

use max72xx_panel::{Rotation, MAX_INTENSITY};

// =============================================================================
// Panel
// =============================================================================

/// Modules in the FC16 strip, left to right.
pub const MODULES: usize = 4;

/// FC16 boards wire digit registers as rows, MSB on the left.
pub const MODULE_ROTATION: Rotation = Rotation::Deg270;

/// The module nearest the MCU is the rightmost one.
pub const CHAIN_REVERSED: bool = true;

/// Brightness, `0..=15`.
pub const INTENSITY: u8 = 0;
const _: () = assert!(INTENSITY <= MAX_INTENSITY);

/// SPI clock in Hz. The MAX7219 tops out at 10 MHz.
pub const SPI_FREQ_HZ: u32 = 2_000_000;

// =============================================================================
// Clock
// =============================================================================

/// Time shown after power-up.
pub const INITIAL_TIME: (u8, u8, u8) = (12, 34, 56);

/// Timer period in microseconds.
pub const TICK_US: u32 = 1_000_000;

/// Pause before a held button starts repeating, in microseconds.
pub const REPEAT_DELAY_US: u32 = 500_000;

/// Fastest auto-repeat interval, in microseconds.
pub const REPEAT_MIN_US: u32 = 20_000;

/// Each repeat shortens the interval by this ratio (numerator / 10).
pub const REPEAT_ACCEL_TENTHS: u64 = 8;

/// Next auto-repeat interval while the button is held.
pub const fn next_repeat_delay(delay: u32) -> u32 {
    if delay <= REPEAT_MIN_US {
        return REPEAT_MIN_US;
    }
    let next = (delay as u64 * REPEAT_ACCEL_TENTHS / 10) as u32;
    if next < REPEAT_MIN_US {
        REPEAT_MIN_US
    } else {
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_delay_accelerates_to_floor() {
        assert_eq!(next_repeat_delay(REPEAT_DELAY_US), 400_000);
        assert_eq!(next_repeat_delay(24_000), REPEAT_MIN_US);
        assert_eq!(next_repeat_delay(REPEAT_MIN_US), REPEAT_MIN_US);

        let mut delay = REPEAT_DELAY_US;
        for _ in 0..100 {
            delay = next_repeat_delay(delay);
        }
        assert_eq!(delay, REPEAT_MIN_US);
    }
}
