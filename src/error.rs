use core::fmt;

/// Why an encode or decode call was refused.
///
/// Decoding reports the first problem it meets, scanning left to right. The
/// vector kernels never report errors themselves; they hand the offending block
/// to the scalar codec, so every backend returns the same variant for the same
/// input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The number of characters cannot form valid Base64.
    ///
    /// Padded engines need a multiple of 4. No engine accepts a final group of
    /// a single character, since 6 bits cannot carry a byte.
    InvalidLength,

    /// A byte outside the engine's alphabet, or `=` before the final group.
    InvalidCharacter,

    /// `output` is shorter than [`Engine::encoded_len`](crate::Engine::encoded_len)
    /// or [`Engine::estimate_decoded_len`](crate::Engine::estimate_decoded_len).
    ///
    /// Checked before anything is written.
    BufferTooSmall,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::InvalidLength => "invalid base64 length",
            Error::InvalidCharacter => "invalid base64 character",
            Error::BufferTooSmall => "output buffer too small",
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
