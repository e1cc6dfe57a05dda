// Intrinsics became safe to call inside `#[target_feature]` functions in newer
// toolchains; the explicit blocks keep older ones compiling.
#![allow(unused_unsafe)]

use crate::{Error, Config, scalar};
use super::{DECODE_LUT_HI, DECODE_LUT_LO, DECODE_LUT_ROLL};

use core::arch::aarch64::*;

/// Input bytes one decode iteration needs: a 64-byte block plus the same 13-byte
/// margin the AVX2 kernel keeps.
pub(crate) const DECODE_MIN_INPUT: usize = 77;

/// NEON Base64 decoding (standard alphabet). Returns the number of bytes written.
///
/// Each iteration de-interleaves 64 characters into four registers (character 0,
/// 1, 2 and 3 of 16 groups), decodes them to 6-bit values, and re-interleaves
/// 48 output bytes on store. A block with any invalid byte stops the vector loop;
/// the scalar codec then decodes from that block onward and reports the error.
///
/// # Safety
/// The CPU must support NEON. Memory accesses are bounds-checked; an `output`
/// shorter than `Engine::estimate_decoded_len(input.len())` panics.
#[target_feature(enable = "neon")]
pub(crate) unsafe fn decode(config: &Config, input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
    let len = input.len();
    let mut src = 0;
    let mut dst = 0;

    if !config.url_safe && len >= DECODE_MIN_INPUT {
        unsafe {
            let luts = Luts {
                lo: vld1q_u8(DECODE_LUT_LO.as_ptr()),
                hi: vld1q_u8(DECODE_LUT_HI.as_ptr()),
                roll: vld1q_u8(DECODE_LUT_ROLL.as_ptr()),
            };

            while len - src >= DECODE_MIN_INPUT {
                let block = &input[src..src + 64];
                let chars = vld4q_u8(block.as_ptr());

                let (a, err_a) = decode_lane(chars.0, &luts);
                let (b, err_b) = decode_lane(chars.1, &luts);
                let (c, err_c) = decode_lane(chars.2, &luts);
                let (d, err_d) = decode_lane(chars.3, &luts);

                let err = vorrq_u8(vorrq_u8(err_a, err_b), vorrq_u8(err_c, err_d));
                if vmaxvq_u8(err) != 0 {
                    break;
                }

                let bytes = uint8x16x3_t(
                    vorrq_u8(vshlq_n_u8(a, 2), vshrq_n_u8(b, 4)),
                    vorrq_u8(vshlq_n_u8(b, 4), vshrq_n_u8(c, 2)),
                    vorrq_u8(vshlq_n_u8(c, 6), d),
                );
                vst3q_u8(output[dst..dst + 48].as_mut_ptr(), bytes);

                src += 64;
                dst += 48;
            }
        }
    }

    Ok(dst + scalar::decode(config, &input[src..], &mut output[dst..])?)
}

struct Luts {
    lo: uint8x16_t,
    hi: uint8x16_t,
    roll: uint8x16_t,
}

/// Returns the 6-bit values of 16 characters and a register that is non-zero in
/// every lane holding a byte outside the alphabet.
#[inline]
#[target_feature(enable = "neon")]
unsafe fn decode_lane(chars: uint8x16_t, luts: &Luts) -> (uint8x16_t, uint8x16_t) {
    unsafe {
        let lo_nibbles = vandq_u8(chars, vdupq_n_u8(0x0F));
        let hi_nibbles = vshrq_n_u8(chars, 4);

        let err = vandq_u8(vqtbl1q_u8(luts.lo, lo_nibbles), vqtbl1q_u8(luts.hi, hi_nibbles));

        let eq_2f = vceqq_u8(chars, vdupq_n_u8(b'/'));
        let roll = vqtbl1q_u8(luts.roll, vaddq_u8(eq_2f, hi_nibbles));

        (vaddq_u8(chars, roll), err)
    }
}
