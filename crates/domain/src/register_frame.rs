//! DS3231 timekeeping register layout.
//!
//! The seven timekeeping registers start at address `0x00`:
//!
//! | Offset | Register | Mask used on read |
//! |--------|----------|-------------------|
//! | 0      | seconds  | `0x7F`            |
//! | 1      | minutes  | `0x7F`            |
//! | 2      | hours    | `0x3F` (24h)      |
//! | 3      | weekday  | not read          |
//! | 4      | day      | `0x3F`            |
//! | 5      | month    | `0x1F` (century)  |
//! | 6      | year     | none              |
//!
//! A write is the register address followed by the same seven bytes.

use crate::bcd::{decode_bcd, encode_bcd};
use crate::rtc_time::RtcTime;

/// Number of data bytes in a timekeeping read.
pub const READ_FRAME_LEN: usize = 7;

/// Register address byte plus seven data bytes.
pub const WRITE_FRAME_LEN: usize = 8;

/// First timekeeping register (seconds).
pub const TIME_REGISTER: u8 = 0x00;

/// Written into the weekday register; never read back.
pub const WEEKDAY_PLACEHOLDER: u8 = 1;

/// Bit 6 of the hours register selects 12-hour mode.
const HOURS_24H_MASK: u8 = 0x3F;

/// Bytes sent to the device for a full time write.
pub type WriteFrame = [u8; WRITE_FRAME_LEN];

/// The seven timekeeping registers, in device order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterFrame([u8; READ_FRAME_LEN]);

impl RegisterFrame {
    pub fn from_bytes(bytes: [u8; READ_FRAME_LEN]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> &[u8; READ_FRAME_LEN] {
        &self.0
    }

    /// Encodes a time into register bytes, forcing 24-hour mode.
    pub fn encode(time: &RtcTime) -> Self {
        Self([
            encode_bcd(time.second()),
            encode_bcd(time.minute()),
            encode_bcd(time.hour()) & HOURS_24H_MASK,
            WEEKDAY_PLACEHOLDER,
            encode_bcd(time.day()),
            encode_bcd(time.month()),
            encode_bcd(time.year()),
        ])
    }

    /// Decodes register bytes, ignoring the weekday, the 12/24h bit and the
    /// century bit.
    pub fn decode(&self) -> RtcTime {
        let b = &self.0;
        RtcTime::from_registers(
            decode_bcd(b[2] & HOURS_24H_MASK),
            decode_bcd(b[1] & 0x7F),
            decode_bcd(b[0] & 0x7F),
            decode_bcd(b[4] & 0x3F),
            decode_bcd(b[5] & 0x1F),
            decode_bcd(b[6]),
        )
    }

    /// Prefixes the register address for a single write transaction.
    pub fn to_write_frame(&self) -> WriteFrame {
        let mut frame = [0u8; WRITE_FRAME_LEN];
        frame[0] = TIME_REGISTER;
        frame[1..].copy_from_slice(&self.0);
        frame
    }
}
