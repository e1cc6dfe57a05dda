//! C-callable entry points.
//!
//! Both functions use the standard padded alphabet and report failure with the
//! [`ERROR`] sentinel. Callers must compare against it before trusting a count;
//! on failure the contents of `dest` are unspecified.

use crate::STANDARD;

/// Returned instead of a byte count when a call fails.
pub const ERROR: usize = usize::MAX;

/// Encodes `len` bytes from `src` into `dest`.
///
/// Returns the number of bytes written, `4 * ceil(len / 3)`, or [`ERROR`] if a
/// pointer is null while `len` is non-zero.
///
/// # Safety
/// * `src` must be valid for reads of `len` bytes.
/// * `dest` must be valid for writes of `4 * ceil(len / 3)` bytes and must not
///   overlap `src`.
#[no_mangle]
pub unsafe extern "C" fn b64_lanes_encode(dest: *mut u8, src: *const u8, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    if dest.is_null() || src.is_null() {
        return ERROR;
    }

    let out_len = STANDARD.encoded_len(len);

    // SAFETY: Guaranteed by the caller contract above.
    let (input, output) = unsafe {
        (
            core::slice::from_raw_parts(src, len),
            core::slice::from_raw_parts_mut(dest, out_len),
        )
    };

    STANDARD.encode_into(input, output).unwrap_or(ERROR)
}

/// Decodes `srclen` Base64 characters from `src` into `dest`.
///
/// Returns the number of bytes written, or [`ERROR`] if the input is not valid
/// padded Base64 or a pointer is null while `srclen` is non-zero. The result is
/// mirrored into `*outlen` when `outlen` is non-null (`0` on failure).
///
/// # Safety
/// * `src` must be valid for reads of `srclen` bytes.
/// * `dest` must be valid for writes of `3 * ceil(srclen / 4)` bytes and must not
///   overlap `src`.
/// * `outlen` must be null or valid for a `usize` write.
#[no_mangle]
pub unsafe extern "C" fn b64_lanes_decode(
    dest: *mut u8,
    src: *const u8,
    srclen: usize,
    outlen: *mut usize,
) -> usize {
    let written = if srclen == 0 {
        Some(0)
    } else if dest.is_null() || src.is_null() {
        None
    } else {
        let out_len = STANDARD.estimate_decoded_len(srclen);

        // SAFETY: Guaranteed by the caller contract above.
        let (input, output) = unsafe {
            (
                core::slice::from_raw_parts(src, srclen),
                core::slice::from_raw_parts_mut(dest, out_len),
            )
        };

        STANDARD.decode_into(input, output).ok()
    };

    if !outlen.is_null() {
        // SAFETY: Non-null `outlen` is valid for writes per the caller contract.
        unsafe { outlen.write(written.unwrap_or(0)) };
    }

    written.unwrap_or(ERROR)
}
