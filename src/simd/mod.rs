//! Vector kernels and the constant tables they broadcast into registers.
//!
//! Both kernels only process whole blocks and hand the rest of the input to
//! [`crate::scalar`], so their output always matches the scalar codec.

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub(crate) mod avx2;
#[cfg(target_arch = "aarch64")]
pub(crate) mod neon;

// ======================================================================
// Encode: 6-bit value -> ASCII offset
// ======================================================================
//
// Index 0 covers 'A'..'Z', index 1 covers 'a'..'z', 2..=11 cover '0'..'9',
// 12 and 13 cover the two symbols. The lane index is
// `saturating_sub(v, 51) + (v > 25)`.

/// Offsets for `A-Z a-z 0-9 + /`.
pub(crate) const ENCODE_LUT_STANDARD: [u8; 16] = [
    65, 71,
    (-4i8) as u8, (-4i8) as u8, (-4i8) as u8, (-4i8) as u8, (-4i8) as u8,
    (-4i8) as u8, (-4i8) as u8, (-4i8) as u8, (-4i8) as u8, (-4i8) as u8,
    (-19i8) as u8, (-16i8) as u8, 0, 0,
];

/// Offsets for `A-Z a-z 0-9 - _`.
pub(crate) const ENCODE_LUT_URL_SAFE: [u8; 16] = [
    65, 71,
    (-4i8) as u8, (-4i8) as u8, (-4i8) as u8, (-4i8) as u8, (-4i8) as u8,
    (-4i8) as u8, (-4i8) as u8, (-4i8) as u8, (-4i8) as u8, (-4i8) as u8,
    (-17i8) as u8, 32, 0, 0,
];

// ======================================================================
// Decode: nibble validation and roll (standard alphabet)
// ======================================================================
//
// `DECODE_LUT_LO[c & 0xF] & DECODE_LUT_HI[c >> 4]` is non-zero exactly when `c`
// is outside `A-Z a-z 0-9 + /`. Every byte >= 0x80 hits the 0x10 bit, which is
// set in every low-nibble entry.

/// Validation bits keyed by the low nibble.
pub(crate) const DECODE_LUT_LO: [u8; 16] = [
    0x15, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11,
    0x11, 0x11, 0x13, 0x1A, 0x1B, 0x1B, 0x1B, 0x1A,
];

/// Validation bits keyed by the high nibble.
pub(crate) const DECODE_LUT_HI: [u8; 16] = [
    0x10, 0x10, 0x01, 0x02, 0x04, 0x08, 0x04, 0x08,
    0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10,
];

/// ASCII -> 6-bit delta keyed by `high nibble + (c == '/' ? -1 : 0)`.
///
/// `'/'` is the only valid byte sharing its high nibble (0x2) with `'+'` that
/// needs a different delta, so it is moved down to slot 1.
pub(crate) const DECODE_LUT_ROLL: [u8; 16] = [
    0, 16, 19, 4,
    (-65i8) as u8, (-65i8) as u8, (-71i8) as u8, (-71i8) as u8,
    0, 0, 0, 0, 0, 0, 0, 0,
];
