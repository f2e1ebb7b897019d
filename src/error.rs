use core::fmt;

///
/// Error raised in case there was an error
/// during communication with the MAX7219 chain.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataError {
    /// An error occurred when working with SPI
    Spi,
    /// An error occurred when working with a PIN
    Pin,
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spi => write!(f, "SPI transfer failed"),
            Self::Pin => write!(f, "GPIO pin update failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn test_data_error_display_format() {
        assert_eq!(DataError::Spi.to_string(), "SPI transfer failed");
        assert_eq!(DataError::Pin.to_string(), "GPIO pin update failed");
    }
}
