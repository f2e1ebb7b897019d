//! Test doubles for the bus.

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::blocking::spi::Write;
use embedded_hal::digital::v2::OutputPin;

use crate::{Connector, DataError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent {
    Low(&'static str),
    High(&'static str),
    Spi(Vec<u8>),
}

/// Shared, ordered record of everything the fakes saw.
#[derive(Debug, Clone, Default)]
pub struct BusLog(Rc<RefCell<Vec<BusEvent>>>);

impl BusLog {
    pub fn events(&self) -> Vec<BusEvent> {
        self.0.borrow().clone()
    }

    fn push(&self, event: BusEvent) {
        self.0.borrow_mut().push(event);
    }
}

pub struct FakeSpi {
    log: BusLog,
    pub fail: bool,
}

impl FakeSpi {
    pub fn new(log: &BusLog) -> Self {
        Self { log: log.clone(), fail: false }
    }
}

impl Write<u8> for FakeSpi {
    type Error = ();

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        if self.fail {
            return Err(());
        }
        self.log.push(BusEvent::Spi(words.to_vec()));
        Ok(())
    }
}

pub struct FakePin {
    log: BusLog,
    name: &'static str,
    pub fail: bool,
}

impl FakePin {
    pub fn new(log: &BusLog, name: &'static str) -> Self {
        Self { log: log.clone(), name, fail: false }
    }
}

impl OutputPin for FakePin {
    type Error = ();

    fn set_low(&mut self) -> Result<(), Self::Error> {
        if self.fail {
            return Err(());
        }
        self.log.push(BusEvent::Low(self.name));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if self.fail {
            return Err(());
        }
        self.log.push(BusEvent::High(self.name));
        Ok(())
    }
}

/// Keeps every burst as one frame.
#[derive(Debug, Default)]
pub struct RecordingConnector {
    pub frames: Vec<Vec<u8>>,
    pub fail: bool,
}

impl RecordingConnector {
    /// Decode frame `n` into `(opcode, data)` pairs, furthest module first.
    pub fn pairs(&self, n: usize) -> Vec<(u8, u8)> {
        self.frames[n].chunks(2).map(|c| (c[0], c[1])).collect()
    }
}

impl Connector for RecordingConnector {
    fn write_frame(&mut self, frame: &[u8]) -> Result<(), DataError> {
        if self.fail {
            return Err(DataError::Spi);
        }
        self.frames.push(frame.to_vec());
        Ok(())
    }
}
