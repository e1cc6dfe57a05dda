// Intrinsics became safe to call inside `#[target_feature]` functions in newer
// toolchains; the explicit blocks keep older ones compiling.
#![allow(unused_unsafe)]

use crate::{Error, Config, scalar};
use super::{DECODE_LUT_HI, DECODE_LUT_LO, DECODE_LUT_ROLL, ENCODE_LUT_STANDARD, ENCODE_LUT_URL_SAFE};

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

/// Input bytes one encode iteration needs: 24 consumed plus the 4 trailing bytes
/// the 32-byte window reads past them.
pub(crate) const ENCODE_MIN_INPUT: usize = 28;

/// Input bytes one decode iteration needs: a 32-byte block plus a 13-byte margin,
/// which keeps the padded final group in the scalar tail.
pub(crate) const DECODE_MIN_INPUT: usize = 45;

/// AVX2 Base64 encoding. Returns the number of bytes written.
///
/// Consumes 24 input bytes per iteration while at least [`ENCODE_MIN_INPUT`] remain,
/// then encodes the rest with the scalar codec.
///
/// The first block is assembled from two 16-byte loads (`input[0..16]`,
/// `input[12..28]`). Later blocks use a single 32-byte load starting 4 bytes behind
/// the cursor, which is always inside the buffer once one block has been consumed.
///
/// # Safety
/// The CPU must support AVX2. Memory accesses are bounds-checked; an `output`
/// shorter than `Engine::encoded_len(input.len())` panics.
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn encode(config: &Config, input: &[u8], output: &mut [u8]) -> usize {
    let len = input.len();
    let mut src = 0;
    let mut dst = 0;

    if len >= ENCODE_MIN_INPUT {
        unsafe {
            let lut = broadcast_lut(if config.url_safe { &ENCODE_LUT_URL_SAFE } else { &ENCODE_LUT_STANDARD });

            // Both lanes hold their 12 bytes at offset 0
            let shuffle_first = _mm256_setr_epi8(
                1, 0, 2, 1, 4, 3, 5, 4, 7, 6, 8, 7, 10, 9, 11, 10,
                1, 0, 2, 1, 4, 3, 5, 4, 7, 6, 8, 7, 10, 9, 11, 10,
            );
            // Low lane holds its 12 bytes at offset 4, high lane at offset 0
            let shuffle_next = _mm256_setr_epi8(
                5, 4, 6, 5, 8, 7, 9, 8, 11, 10, 12, 11, 14, 13, 15, 14,
                1, 0, 2, 1, 4, 3, 5, 4, 7, 6, 8, 7, 10, 9, 11, 10,
            );

            let window = &input[..ENCODE_MIN_INPUT];
            let lo = _mm_loadu_si128(window.as_ptr().cast());
            let hi = _mm_loadu_si128(window[12..].as_ptr().cast());
            let block = _mm256_inserti128_si256(_mm256_castsi128_si256(lo), hi, 1);

            let chars = translate(reshuffle(_mm256_shuffle_epi8(block, shuffle_first)), lut);
            _mm256_storeu_si256(output[..32].as_mut_ptr().cast(), chars);
            src += 24;
            dst += 32;

            while len - src >= ENCODE_MIN_INPUT {
                let window = &input[src - 4..src + 28];
                let block = _mm256_loadu_si256(window.as_ptr().cast());

                let chars = translate(reshuffle(_mm256_shuffle_epi8(block, shuffle_next)), lut);
                _mm256_storeu_si256(output[dst..dst + 32].as_mut_ptr().cast(), chars);

                src += 24;
                dst += 32;
            }
        }
    }

    dst + scalar::encode(config, &input[src..], &mut output[dst..])
}

/// AVX2 Base64 decoding (standard alphabet). Returns the number of bytes written.
///
/// Consumes 32 characters per iteration while at least [`DECODE_MIN_INPUT`] remain.
/// A block containing any byte outside the alphabet stops the vector loop without
/// writing; the scalar codec then decodes from that block onward and reports the
/// error. URL-safe input is left to the scalar codec entirely.
///
/// # Safety
/// The CPU must support AVX2. Memory accesses are bounds-checked; an `output`
/// shorter than `Engine::estimate_decoded_len(input.len())` panics.
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn decode(config: &Config, input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
    let len = input.len();
    let mut src = 0;
    let mut dst = 0;

    if !config.url_safe && len >= DECODE_MIN_INPUT {
        unsafe {
            let lut_lo = broadcast_lut(&DECODE_LUT_LO);
            let lut_hi = broadcast_lut(&DECODE_LUT_HI);
            let lut_roll = broadcast_lut(&DECODE_LUT_ROLL);

            // Doubles as the nibble mask and as '/'
            let mask_2f = _mm256_set1_epi8(0x2F);

            while len - src >= DECODE_MIN_INPUT {
                let block = &input[src..src + 32];
                let chars = _mm256_loadu_si256(block.as_ptr().cast());

                let hi_nibbles = _mm256_and_si256(_mm256_srli_epi32(chars, 4), mask_2f);
                let lo_nibbles = _mm256_and_si256(chars, mask_2f);

                let lo = _mm256_shuffle_epi8(lut_lo, lo_nibbles);
                let hi = _mm256_shuffle_epi8(lut_hi, hi_nibbles);

                if _mm256_testz_si256(lo, hi) == 0 {
                    break;
                }

                let eq_2f = _mm256_cmpeq_epi8(chars, mask_2f);
                let roll = _mm256_shuffle_epi8(lut_roll, _mm256_add_epi8(eq_2f, hi_nibbles));
                let values = _mm256_add_epi8(chars, roll);

                // 24 valid bytes, then 8 bytes the next store overwrites
                _mm256_storeu_si256(output[dst..dst + 32].as_mut_ptr().cast(), pack(values));

                src += 32;
                dst += 24;
            }
        }
    }

    Ok(dst + scalar::decode(config, &input[src..], &mut output[dst..])?)
}

/// Loads a 16-byte table into both lanes.
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn broadcast_lut(table: &[u8; 16]) -> __m256i {
    unsafe { _mm256_broadcastsi128_si256(_mm_loadu_si128(table.as_ptr().cast())) }
}

/// Splits each `[b1, b0, b2, b1]` lane into four 6-bit values, one per byte.
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn reshuffle(shuffled: __m256i) -> __m256i {
    unsafe {
        // Fields 0 and 2 via multiply-high, fields 1 and 3 via multiply-low
        let t0 = _mm256_and_si256(shuffled, _mm256_set1_epi32(0x0FC0_FC00));
        let t1 = _mm256_mulhi_epu16(t0, _mm256_set1_epi32(0x0400_0040));

        let t2 = _mm256_and_si256(shuffled, _mm256_set1_epi32(0x003F_03F0));
        let t3 = _mm256_mullo_epi16(t2, _mm256_set1_epi32(0x0100_0010));

        _mm256_or_si256(t1, t3)
    }
}

/// Maps 6-bit values to ASCII by adding a per-range offset from `lut`.
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn translate(values: __m256i, lut: __m256i) -> __m256i {
    unsafe {
        let mut index = _mm256_subs_epu8(values, _mm256_set1_epi8(51));
        let past_upper = _mm256_cmpgt_epi8(values, _mm256_set1_epi8(25));
        index = _mm256_sub_epi8(index, past_upper);

        _mm256_add_epi8(values, _mm256_shuffle_epi8(lut, index))
    }
}

/// Packs 32 6-bit values into 24 bytes at the bottom of the register.
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn pack(values: __m256i) -> __m256i {
    unsafe {
        // [a, b] -> a << 6 | b, then [ab, cd] -> ab << 12 | cd
        let merged = _mm256_maddubs_epi16(values, _mm256_set1_epi32(0x0140_0140));
        let merged = _mm256_madd_epi16(merged, _mm256_set1_epi32(0x0001_1000));

        let compact = _mm256_shuffle_epi8(merged, _mm256_setr_epi8(
            2, 1, 0, 6, 5, 4, 10, 9, 8, 14, 13, 12, -1, -1, -1, -1,
            2, 1, 0, 6, 5, 4, 10, 9, 8, 14, 13, 12, -1, -1, -1, -1,
        ));

        _mm256_permutevar8x32_epi32(compact, _mm256_setr_epi32(0, 1, 2, 4, 5, 6, -1, -1))
    }
}
