//! MAX7219 / MAX7221 register opcodes.
//!
//! Datasheet: <https://datasheets.maximintegrated.com/en/ds/MAX7219-MAX7221.pdf>

/// Possible command register values on the display chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    Noop = 0x00,
    Digit0 = 0x01,
    Digit1 = 0x02,
    Digit2 = 0x03,
    Digit3 = 0x04,
    Digit4 = 0x05,
    Digit5 = 0x06,
    Digit6 = 0x07,
    Digit7 = 0x08,
    DecodeMode = 0x09,
    Intensity = 0x0A,
    ScanLimit = 0x0B,
    Shutdown = 0x0C,
    DisplayTest = 0x0F,
}

impl Command {
    /// Digit register holding bitmap row `row` (`0..8`).
    pub const fn digit(row: u8) -> Self {
        match row & 0b111 {
            0 => Self::Digit0,
            1 => Self::Digit1,
            2 => Self::Digit2,
            3 => Self::Digit3,
            4 => Self::Digit4,
            5 => Self::Digit5,
            6 => Self::Digit6,
            _ => Self::Digit7,
        }
    }

    /// Bitmap row carried by a digit register, `None` for control registers.
    pub const fn row(self) -> Option<usize> {
        match self {
            Self::Digit0
            | Self::Digit1
            | Self::Digit2
            | Self::Digit3
            | Self::Digit4
            | Self::Digit5
            | Self::Digit6
            | Self::Digit7 => Some(self as usize - Self::Digit0 as usize),
            _ => None,
        }
    }
}

impl From<Command> for u8 {
    fn from(command: Command) -> u8 {
        command as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_values() {
        assert_eq!(u8::from(Command::Noop), 0);
        assert_eq!(u8::from(Command::Digit0), 1);
        assert_eq!(u8::from(Command::Digit7), 8);
        assert_eq!(u8::from(Command::DecodeMode), 9);
        assert_eq!(u8::from(Command::Intensity), 10);
        assert_eq!(u8::from(Command::ScanLimit), 11);
        assert_eq!(u8::from(Command::Shutdown), 12);
        assert_eq!(u8::from(Command::DisplayTest), 15);
    }

    #[test]
    fn test_digit_and_row_agree() {
        for row in 0..8u8 {
            assert_eq!(Command::digit(row).row(), Some(usize::from(row)));
            assert_eq!(u8::from(Command::digit(row)), row + 1);
        }
        assert_eq!(Command::Intensity.row(), None);
        assert_eq!(Command::Noop.row(), None);
    }
}
