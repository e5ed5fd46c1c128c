//! In-process stand-in for a DS3231 on an I2C bus.
//!
//! Used when no hardware bus is configured and by the end-to-end tests. It
//! speaks the same register protocol as the chip: a write sets the register
//! pointer and stores any following bytes, a read streams registers from the
//! pointer, and the pointer wraps at the end of the register file.

use std::time::Instant;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use rtcbridge_domain::{encode_bcd, RegisterFrame, READ_FRAME_LEN};

/// Registers 0x00-0x12.
const REGISTER_COUNT: usize = 0x13;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedBusError(ErrorKind);

impl embedded_hal::i2c::Error for SimulatedBusError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// A DS3231 that keeps time with the host's monotonic clock.
pub struct SimulatedDs3231 {
    address: u8,
    registers: [u8; REGISTER_COUNT],
    pointer: usize,
    /// `None` once an impossible date has been written; the registers then
    /// hold still.
    anchor: Option<(NaiveDateTime, Instant)>,
}

impl SimulatedDs3231 {
    /// A device at `address` that starts at the host's current UTC time.
    pub fn new(address: u8) -> Self {
        Self::starting_at(address, Utc::now().naive_utc())
    }

    pub fn starting_at(address: u8, start: NaiveDateTime) -> Self {
        let mut device = Self {
            address,
            registers: [0u8; REGISTER_COUNT],
            pointer: 0,
            anchor: Some((start, Instant::now())),
        };
        device.latch_time();
        device
    }

    /// Copy the running time into the timekeeping registers.
    fn latch_time(&mut self) {
        let Some((anchor, since)) = self.anchor else {
            return;
        };
        let elapsed = i64::try_from(since.elapsed().as_secs()).unwrap_or(0);
        let now = anchor
            .checked_add_signed(chrono::Duration::seconds(elapsed))
            .unwrap_or(anchor);

        self.registers[..READ_FRAME_LEN].copy_from_slice(&[
            bcd(now.second()),
            bcd(now.minute()),
            bcd(now.hour()),
            bcd(now.weekday().number_from_sunday()),
            bcd(now.day()),
            bcd(now.month()),
            bcd(now.year().rem_euclid(100).unsigned_abs()),
        ]);
    }

    /// Restart the running time from whatever the registers now hold.
    fn reanchor(&mut self) {
        let mut frame = [0u8; READ_FRAME_LEN];
        frame.copy_from_slice(&self.registers[..READ_FRAME_LEN]);
        let t = RegisterFrame::from_bytes(frame).decode();

        self.anchor = NaiveDate::from_ymd_opt(
            i32::from(t.full_year()),
            u32::from(t.month()),
            u32::from(t.day()),
        )
        .and_then(|date| {
            date.and_hms_opt(
                u32::from(t.hour()),
                u32::from(t.minute()),
                u32::from(t.second()),
            )
        })
        .map(|start| (start, Instant::now()));

        if self.anchor.is_none() {
            tracing::debug!(time = %t, "Simulated RTC holding non-calendar time");
        }
    }

    fn advance(&mut self) {
        self.pointer = (self.pointer + 1) % REGISTER_COUNT;
    }
}

fn bcd(value: u32) -> u8 {
    encode_bcd(u8::try_from(value % 100).unwrap_or(0))
}

impl ErrorType for SimulatedDs3231 {
    type Error = SimulatedBusError;
}

impl I2c for SimulatedDs3231 {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != self.address {
            return Err(SimulatedBusError(ErrorKind::NoAcknowledge(
                NoAcknowledgeSource::Address,
            )));
        }

        self.latch_time();
        let mut touched_time = false;

        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    let Some((register, data)) = bytes.split_first() else {
                        continue;
                    };
                    self.pointer = usize::from(*register) % REGISTER_COUNT;
                    for byte in data {
                        touched_time |= self.pointer < READ_FRAME_LEN;
                        self.registers[self.pointer] = *byte;
                        self.advance();
                    }
                }
                Operation::Read(buf) => {
                    for slot in buf.iter_mut() {
                        *slot = self.registers[self.pointer];
                        self.advance();
                    }
                }
            }
        }

        if touched_time {
            self.reanchor();
        }
        Ok(())
    }
}
