//! # base64-lanes
//!
//! RFC 4648 Base64 with SIMD kernels picked at runtime.
//!
//! The first call probes the CPU and caches the answer; from then on every call
//! goes straight to the matching kernel:
//!
//! | CPU | Encode | Decode |
//! |-----|--------|--------|
//! | aarch64, NEON | scalar | NEON, 64 chars -> 48 bytes per step |
//! | x86 / x86_64, AVX2 | AVX2, 24 bytes -> 32 chars per step | AVX2, 32 chars -> 24 bytes per step |
//! | other | scalar | scalar |
//!
//! Kernels stop at the last whole block and hand the remainder, padding
//! included, to the scalar codec. Results are byte-identical across backends.
//!
//! ## Examples
//!
//! Allocating helpers (`std` feature):
//!
//! ```rust
//! # #[cfg(feature = "std")]
//! # {
//! use base64_lanes::STANDARD;
//!
//! let text = STANDARD.encode(b"lanes");
//! assert_eq!(text, "bGFuZXM=");
//! assert_eq!(STANDARD.decode(&text).unwrap(), b"lanes");
//! # }
//! ```
//!
//! Caller-owned buffers, usable without `std`:
//!
//! ```rust
//! use base64_lanes::{Error, STANDARD};
//!
//! let mut text = [0u8; 8];
//! let n = STANDARD.encode_into(b"Man", &mut text).unwrap();
//! assert_eq!(&text[..n], b"TWFu");
//!
//! let mut bytes = [0u8; 3];
//! assert_eq!(STANDARD.decode_into(b"TW!u", &mut bytes), Err(Error::InvalidCharacter));
//! ```
//!
//! For C callers, [`ffi`] exports `b64_lanes_encode` and `b64_lanes_decode`,
//! which signal failure with [`ffi::ERROR`].
//!
//! ## Cargo features
//!
//! | Feature | Default | Effect |
//! |---------|---------|--------|
//! | `std` | yes | `String`/`Vec` helpers and runtime CPU detection. Without it the crate is `no_std` and only compile-time target features are consulted. |
//! | `simd` | yes | Builds the AVX2 and NEON kernels. Off means scalar everywhere. |
//! | `tracing` | yes | One `debug` event with the chosen backend when the probe runs. |
//! | `parallel` | no | Splits payloads of 512 KiB and up across the Rayon pool. |
//!
//! ## Memory safety
//!
//! Kernels take their vector loads and stores from bounds-checked subslices, so
//! they never touch memory outside `input` or `output`.

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

#[cfg(feature = "parallel")]
use rayon::prelude::*;

mod backend;
mod error;
mod scalar;
#[cfg(feature = "simd")]
#[cfg(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64"))]
mod simd;

pub mod ffi;

pub use backend::Backend;
pub use error::Error;

/// Bytes per parallel encode job. Divisible by 3, so only the last job can pad.
#[cfg(feature = "parallel")]
const PAR_ENCODE_CHUNK: usize = 24 * 1024;

/// Characters per parallel decode job, the encoded size of one encode job.
#[cfg(feature = "parallel")]
const PAR_DECODE_CHUNK: usize = PAR_ENCODE_CHUNK / 3 * 4;

#[cfg(feature = "parallel")]
const PAR_MIN_LEN: usize = 512 * 1024;

const PAD: u8 = b'=';

const STANDARD_ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const URL_SAFE_ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Character -> 6-bit value. Anything outside the alphabet maps to `0xFF`.
const STANDARD_DECODE_TABLE: [u8; 256] = decode_table(STANDARD_ALPHABET);
const URL_SAFE_DECODE_TABLE: [u8; 256] = decode_table(URL_SAFE_ALPHABET);

const fn decode_table(alphabet: &[u8; 64]) -> [u8; 256] {
    let mut table = [0xFF; 256];
    let mut value = 0;
    while value < alphabet.len() {
        table[alphabet[value] as usize] = value as u8;
        value += 1;
    }
    table
}

/// Alphabet and padding choice shared by every backend.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Config {
    /// `-` and `_` in place of `+` and `/`.
    pub url_safe: bool,
    /// Emit `=` when encoding, require it when decoding.
    pub padding: bool,
}

/// A Base64 codec for one alphabet/padding combination.
///
/// Engines carry no state beyond that choice; use the four presets and share
/// them freely across threads.
///
/// ```rust
/// # #[cfg(feature = "std")]
/// # {
/// use base64_lanes::URL_SAFE_NO_PAD;
///
/// let token = URL_SAFE_NO_PAD.encode([0xFB, 0xFF]);
/// assert_eq!(token, "-_8");
/// assert_eq!(URL_SAFE_NO_PAD.decode(&token).unwrap(), [0xFB, 0xFF]);
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Engine {
    pub(crate) config: Config,
}

const fn preset(url_safe: bool, padding: bool) -> Engine {
    Engine { config: Config { url_safe, padding } }
}

/// `A-Z a-z 0-9 + /`, padded with `=`.
pub const STANDARD: Engine = preset(false, true);

/// `A-Z a-z 0-9 + /`, no padding.
pub const STANDARD_NO_PAD: Engine = preset(false, false);

/// `A-Z a-z 0-9 - _`, padded with `=`.
///
/// Only encoding is vectorized for this alphabet; decoding always runs through
/// the scalar codec.
pub const URL_SAFE: Engine = preset(true, true);

/// `A-Z a-z 0-9 - _`, no padding. Vectorized like [`URL_SAFE`].
pub const URL_SAFE_NO_PAD: Engine = preset(true, false);

impl Engine {
    /// Exact output size for encoding `input_len` bytes.
    ///
    /// ```
    /// use base64_lanes::{STANDARD, STANDARD_NO_PAD};
    ///
    /// assert_eq!(STANDARD.encoded_len(1), 4);
    /// assert_eq!(STANDARD.encoded_len(3), 4);
    /// assert_eq!(STANDARD_NO_PAD.encoded_len(1), 2);
    /// ```
    #[inline]
    #[must_use]
    pub const fn encoded_len(&self, input_len: usize) -> usize {
        if self.config.padding {
            input_len.div_ceil(3) * 4
        } else {
            (input_len * 4).div_ceil(3)
        }
    }

    /// Output capacity the decoder demands for `input_len` characters:
    /// `3 * ceil(input_len / 4)`.
    ///
    /// Padding can make the decoded data up to 2 bytes shorter; the count returned
    /// by [`decode_into`](Self::decode_into) is authoritative.
    #[inline]
    #[must_use]
    pub const fn estimate_decoded_len(&self, input_len: usize) -> usize {
        input_len.div_ceil(4) * 3
    }

    /// Encodes `input` into `output` on the detected backend and returns the
    /// number of bytes written.
    ///
    /// # Errors
    /// [`Error::BufferTooSmall`] if `output` is shorter than
    /// [`encoded_len`](Self::encoded_len).
    #[inline]
    pub fn encode_into<T: AsRef<[u8]> + Sync>(&self, input: T, output: &mut [u8]) -> Result<usize, Error> {
        self.encode_with_backend(Backend::detect(), input, output)
    }

    /// Decodes `input` into `output` on the detected backend and returns the
    /// number of bytes written.
    ///
    /// # Errors
    /// [`Error::BufferTooSmall`] if `output` is shorter than
    /// [`estimate_decoded_len`](Self::estimate_decoded_len), otherwise whatever
    /// is wrong with the input.
    #[inline]
    pub fn decode_into<T: AsRef<[u8]> + Sync>(&self, input: T, output: &mut [u8]) -> Result<usize, Error> {
        self.decode_with_backend(Backend::detect(), input, output)
    }

    /// [`encode_into`](Self::encode_into) on a chosen backend.
    ///
    /// A backend the CPU cannot run falls back to [`Backend::Scalar`], so this is
    /// safe to call with any variant.
    ///
    /// ```
    /// use base64_lanes::{Backend, STANDARD};
    ///
    /// let mut out = [0u8; 4];
    /// let n = STANDARD.encode_with_backend(Backend::Scalar, b"Man", &mut out).unwrap();
    /// assert_eq!(&out[..n], b"TWFu");
    /// ```
    pub fn encode_with_backend<T: AsRef<[u8]> + Sync>(
        &self,
        backend: Backend,
        input: T,
        output: &mut [u8],
    ) -> Result<usize, Error> {
        let input = input.as_ref();
        if input.is_empty() {
            return Ok(0);
        }

        let out_len = self.encoded_len(input.len());
        let output = output.get_mut(..out_len).ok_or(Error::BufferTooSmall)?;
        let backend = backend.or_scalar().encodes_with();

        #[cfg(feature = "parallel")]
        {
            if input.len() >= PAR_MIN_LEN {
                output
                    .par_chunks_mut(PAR_DECODE_CHUNK)
                    .zip(input.par_chunks(PAR_ENCODE_CHUNK))
                    .for_each(|(out, chunk)| {
                        self.encode_on(backend, chunk, out);
                    });
                return Ok(out_len);
            }
        }

        Ok(self.encode_on(backend, input, output))
    }

    /// [`decode_into`](Self::decode_into) on a chosen backend, with the same
    /// fallback as [`encode_with_backend`](Self::encode_with_backend).
    pub fn decode_with_backend<T: AsRef<[u8]> + Sync>(
        &self,
        backend: Backend,
        input: T,
        output: &mut [u8],
    ) -> Result<usize, Error> {
        let input = input.as_ref();
        if input.is_empty() {
            return Ok(0);
        }

        let out_len = self.estimate_decoded_len(input.len());
        let output = output.get_mut(..out_len).ok_or(Error::BufferTooSmall)?;
        let backend = backend.or_scalar();

        // Jobs write at fixed strides, so each one but the last must decode to a
        // full `PAR_ENCODE_CHUNK`. A job ending in `=` would not; those inputs are
        // invalid anyway and go to the serial path for the error.
        #[cfg(feature = "parallel")]
        {
            if input.len() >= PAR_MIN_LEN
                && !input.chunks_exact(PAR_DECODE_CHUNK).any(|job| job.last() == Some(&PAD))
            {
                let written = output
                    .par_chunks_mut(PAR_ENCODE_CHUNK)
                    .zip(input.par_chunks(PAR_DECODE_CHUNK))
                    .map(|(out, chunk)| self.decode_on(backend, chunk, out))
                    .try_reduce(|| 0, |a, b| Ok(a + b))?;
                return Ok(written);
            }
        }

        self.decode_on(backend, input, output)
    }

    /// Encodes into a new `String`.
    ///
    /// ```
    /// use base64_lanes::STANDARD;
    /// assert_eq!(STANDARD.encode(b"hello"), "aGVsbG8=");
    /// ```
    #[cfg(feature = "std")]
    #[inline]
    pub fn encode<T: AsRef<[u8]> + Sync>(&self, input: T) -> String {
        let input = input.as_ref();
        let mut text = vec![0u8; self.encoded_len(input.len())];

        // Sized by `encoded_len`, the only thing `encode_into` checks.
        let written = self.encode_into(input, &mut text).expect("encode buffer sized by encoded_len");
        debug_assert_eq!(written, text.len());

        // SAFETY: Alphabets and padding are ASCII.
        unsafe { String::from_utf8_unchecked(text) }
    }

    /// Decodes into a new `Vec<u8>`.
    ///
    /// # Errors
    /// [`Error::InvalidLength`] or [`Error::InvalidCharacter`] for malformed input.
    ///
    /// ```
    /// use base64_lanes::STANDARD;
    /// assert_eq!(STANDARD.decode("aGVsbG8=").unwrap(), b"hello");
    /// ```
    #[cfg(feature = "std")]
    #[inline]
    pub fn decode<T: AsRef<[u8]> + Sync>(&self, input: T) -> Result<Vec<u8>, Error> {
        let input = input.as_ref();
        let mut bytes = vec![0u8; self.estimate_decoded_len(input.len())];

        let written = self.decode_into(input, &mut bytes)?;
        bytes.truncate(written);
        Ok(bytes)
    }

    // Callers resolve `backend` with `Backend::or_scalar` first.
    #[inline(always)]
    fn encode_on(&self, backend: Backend, input: &[u8], output: &mut [u8]) -> usize {
        match backend {
            #[cfg(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64")))]
            // SAFETY: AVX2 passed the runtime probe.
            Backend::Avx2 => unsafe { simd::avx2::encode(&self.config, input, output) },
            _ => scalar::encode(&self.config, input, output),
        }
    }

    #[inline(always)]
    fn decode_on(&self, backend: Backend, input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
        match backend {
            #[cfg(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64")))]
            // SAFETY: AVX2 passed the runtime probe.
            Backend::Avx2 => unsafe { simd::avx2::decode(&self.config, input, output) },
            #[cfg(all(feature = "simd", target_arch = "aarch64"))]
            // SAFETY: NEON passed the runtime probe.
            Backend::Neon => unsafe { simd::neon::decode(&self.config, input, output) },
            _ => scalar::decode(&self.config, input, output),
        }
    }
}
