//! Binary-coded decimal helpers for the clock registers.

/// Decodes a BCD byte (high nibble tens, low nibble units).
///
/// Non-BCD input yields a meaningless value rather than a panic.
pub fn decode_bcd(byte: u8) -> u8 {
    (byte >> 4).wrapping_mul(10).wrapping_add(byte & 0x0F)
}

/// Encodes a value in `0..=99` as BCD.
///
/// Callers validate first; out-of-range input produces garbage, not an error.
pub fn encode_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}
