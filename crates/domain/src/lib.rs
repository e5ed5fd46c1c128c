//! RTC Bridge Domain - clock values and the DS3231 register format.
//!
//! Everything here is pure: no I/O, no locking. The engine owns the bus and
//! arbitrates access; this crate only knows how bytes map to time fields.

pub mod bcd;
pub mod error;
pub mod register_frame;
pub mod rtc_time;

pub use bcd::{decode_bcd, encode_bcd};
pub use error::DomainError;
pub use register_frame::{
    RegisterFrame, WriteFrame, READ_FRAME_LEN, TIME_REGISTER, WEEKDAY_PLACEHOLDER, WRITE_FRAME_LEN,
};
pub use rtc_time::{RtcTime, TimeFields};
