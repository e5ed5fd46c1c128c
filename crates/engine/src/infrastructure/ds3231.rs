//! DS3231 transport over any `embedded-hal` I2C bus.

use embedded_hal::i2c::I2c;
use rtcbridge_domain::{RegisterFrame, RtcTime, READ_FRAME_LEN, TIME_REGISTER};

use crate::infrastructure::ports::{BusOp, RtcTransport, TransportError};

/// Factory-fixed DS3231 address.
pub const DEFAULT_ADDRESS: u8 = 0x68;

/// Range probed by [`scan_bus`]; 0x00-0x02 and 0x78-0x7F are reserved.
const SCAN_RANGE: std::ops::Range<u8> = 0x03..0x78;

/// A DS3231 at a fixed 7-bit address, owning its bus.
pub struct Ds3231<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> Ds3231<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Probe the bus for anything that acknowledges. Debug aid only.
    pub fn scan(&mut self) -> Vec<u8> {
        scan_bus(&mut self.i2c)
    }

    /// Give the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> RtcTransport for Ds3231<I2C>
where
    I2C: I2c + Send,
{
    fn read_raw(&mut self) -> Result<RtcTime, TransportError> {
        let mut data = [0u8; READ_FRAME_LEN];
        self.i2c
            .write_read(self.address, &[TIME_REGISTER], &mut data)
            .map_err(|e| TransportError::bus(BusOp::Read, &e))?;

        Ok(RegisterFrame::from_bytes(data).decode())
    }

    fn write_raw(&mut self, time: &RtcTime) -> Result<(), TransportError> {
        let frame = RegisterFrame::encode(time).to_write_frame();
        self.i2c
            .write(self.address, &frame)
            .map_err(|e| TransportError::bus(BusOp::Write, &e))
    }
}

/// Addresses that acknowledge an empty write.
pub fn scan_bus<I: I2c>(i2c: &mut I) -> Vec<u8> {
    SCAN_RANGE
        .filter(|&address| i2c.write(address, &[]).is_ok())
        .collect()
}
