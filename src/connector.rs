//! Serial links to the module chain.
//!
//! A [`Connector`] moves one burst: chip select goes low, the frame is shifted
//! out, chip select goes high and the chips latch what they received. The
//! first bytes of a frame end up in the module furthest down the chain.

use embedded_hal::blocking::spi::Write;
use embedded_hal::digital::v2::OutputPin;

use crate::DataError;

/// Sink for chip-select framed bursts.
pub trait Connector {
    /// Shift `frame` into the chain and latch it.
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), DataError>;
}

/// Hardware SPI plus a software driven chip select pin.
pub struct SpiConnector<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS> SpiConnector<SPI, CS>
where
    SPI: Write<u8>,
    CS: OutputPin,
{
    pub fn new(spi: SPI, cs: CS) -> Self {
        Self { spi, cs }
    }

    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }
}

impl<SPI, CS> Connector for SpiConnector<SPI, CS>
where
    SPI: Write<u8>,
    CS: OutputPin,
{
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), DataError> {
        self.cs.set_low().map_err(|_| DataError::Pin)?;
        let sent = self.spi.write(frame).map_err(|_| DataError::Spi);
        // Release the bus even if the transfer failed
        self.cs.set_high().map_err(|_| DataError::Pin)?;
        sent
    }
}

/// Bit-banged link over three GPIO pins, MSB first.
///
/// The chips sample DIN on the rising clock edge.
pub struct PinConnector<DATA, CS, SCK> {
    data: DATA,
    cs: CS,
    sck: SCK,
}

impl<DATA, CS, SCK> PinConnector<DATA, CS, SCK>
where
    DATA: OutputPin,
    CS: OutputPin,
    SCK: OutputPin,
{
    pub fn new(data: DATA, cs: CS, sck: SCK) -> Self {
        Self { data, cs, sck }
    }

    pub fn release(self) -> (DATA, CS, SCK) {
        (self.data, self.cs, self.sck)
    }

    fn shift_out(&mut self, value: u8) -> Result<(), DataError> {
        for bit in (0..8).rev() {
            if value & (1 << bit) != 0 {
                self.data.set_high().map_err(|_| DataError::Pin)?;
            } else {
                self.data.set_low().map_err(|_| DataError::Pin)?;
            }
            self.sck.set_high().map_err(|_| DataError::Pin)?;
            self.sck.set_low().map_err(|_| DataError::Pin)?;
        }
        Ok(())
    }
}

impl<DATA, CS, SCK> Connector for PinConnector<DATA, CS, SCK>
where
    DATA: OutputPin,
    CS: OutputPin,
    SCK: OutputPin,
{
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), DataError> {
        self.cs.set_low().map_err(|_| DataError::Pin)?;
        for &byte in frame {
            self.shift_out(byte)?;
        }
        self.cs.set_high().map_err(|_| DataError::Pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{BusEvent, BusLog, FakePin, FakeSpi};

    #[test]
    fn test_spi_connector_frames_transfer_with_chip_select() {
        let log = BusLog::default();
        let mut connector = SpiConnector::new(FakeSpi::new(&log), FakePin::new(&log, "cs"));

        connector.write_frame(&[0x0C, 0x01, 0x0C, 0x01]).unwrap();

        assert_eq!(
            log.events(),
            vec![
                BusEvent::Low("cs"),
                BusEvent::Spi(vec![0x0C, 0x01, 0x0C, 0x01]),
                BusEvent::High("cs"),
            ]
        );
    }

    #[test]
    fn test_spi_connector_raises_chip_select_after_spi_failure() {
        let log = BusLog::default();
        let mut spi = FakeSpi::new(&log);
        spi.fail = true;
        let mut connector = SpiConnector::new(spi, FakePin::new(&log, "cs"));

        assert_eq!(connector.write_frame(&[0x0A, 0x07]), Err(DataError::Spi));
        assert_eq!(log.events().last(), Some(&BusEvent::High("cs")));
    }

    #[test]
    fn test_spi_connector_reports_pin_failure() {
        let log = BusLog::default();
        let mut cs = FakePin::new(&log, "cs");
        cs.fail = true;
        let mut connector = SpiConnector::new(FakeSpi::new(&log), cs);

        assert_eq!(connector.write_frame(&[0x00, 0x00]), Err(DataError::Pin));
        assert!(log.events().is_empty());
    }

    #[test]
    fn test_pin_connector_shifts_msb_first() {
        let log = BusLog::default();
        let mut connector = PinConnector::new(
            FakePin::new(&log, "din"),
            FakePin::new(&log, "cs"),
            FakePin::new(&log, "clk"),
        );

        connector.write_frame(&[0b1010_0001]).unwrap();

        let events = log.events();
        assert_eq!(events.first(), Some(&BusEvent::Low("cs")));
        assert_eq!(events.last(), Some(&BusEvent::High("cs")));

        // Sample DIN at every rising clock edge
        let mut level = false;
        let mut sampled = Vec::new();
        for event in &events {
            match event {
                BusEvent::High("din") => level = true,
                BusEvent::Low("din") => level = false,
                BusEvent::High("clk") => sampled.push(level),
                _ => {}
            }
        }
        assert_eq!(sampled, vec![true, false, true, false, false, false, false, true]);
    }
}
