use crate::{
    Error,
    Config,
    PAD,
    STANDARD_ALPHABET,
    URL_SAFE_ALPHABET,
    STANDARD_DECODE_TABLE,
    URL_SAFE_DECODE_TABLE,
};

/// Encodes `input` into `output` and returns the number of bytes written.
///
/// # Performance
/// The main loop is unrolled to consume **6 bytes of input** and produce **8 bytes of
/// output** per iteration, written as a single 64-bit word.
///
/// # Panics
/// If `output` is shorter than `Engine::encoded_len(input.len())`. The public API
/// checks this before dispatching.
#[inline]
pub(crate) fn encode(config: &Config, input: &[u8], output: &mut [u8]) -> usize {
    let alphabet = if config.url_safe {
        URL_SAFE_ALPHABET
    } else {
        STANDARD_ALPHABET
    };

    let mut written = 0;
    let mut chunks = input.chunks_exact(6);

    // --- MAIN LOOP (6 bytes -> 8 chars) ---
    for chunk in &mut chunks {
        let n1 = u32::from_be_bytes([0, chunk[0], chunk[1], chunk[2]]) as usize;
        let n2 = u32::from_be_bytes([0, chunk[3], chunk[4], chunk[5]]) as usize;

        let pack =
            (alphabet[(n1 >> 18) & 0x3F] as u64) |
            ((alphabet[(n1 >> 12) & 0x3F] as u64) << 8) |
            ((alphabet[(n1 >> 6) & 0x3F] as u64) << 16) |
            ((alphabet[n1 & 0x3F] as u64) << 24) |
            ((alphabet[(n2 >> 18) & 0x3F] as u64) << 32) |
            ((alphabet[(n2 >> 12) & 0x3F] as u64) << 40) |
            ((alphabet[(n2 >> 6) & 0x3F] as u64) << 48) |
            ((alphabet[n2 & 0x3F] as u64) << 56);

        output[written..written + 8].copy_from_slice(&pack.to_le_bytes());
        written += 8;
    }

    // --- TAIL HANDLING (0 to 5 bytes left) ---
    let mut rest = chunks.remainder();

    if let [b0, b1, b2, tail @ ..] = rest {
        let n = u32::from_be_bytes([0, *b0, *b1, *b2]) as usize;
        output[written] = alphabet[(n >> 18) & 0x3F];
        output[written + 1] = alphabet[(n >> 12) & 0x3F];
        output[written + 2] = alphabet[(n >> 6) & 0x3F];
        output[written + 3] = alphabet[n & 0x3F];
        written += 4;
        rest = tail;
    }

    // Final 1 or 2 bytes, with padding when configured
    match *rest {
        [b0] => {
            let n = (b0 as usize) << 16;
            output[written] = alphabet[(n >> 18) & 0x3F];
            output[written + 1] = alphabet[(n >> 12) & 0x3F];
            written += 2;
            if config.padding {
                output[written] = PAD;
                output[written + 1] = PAD;
                written += 2;
            }
        }
        [b0, b1] => {
            let n = ((b0 as usize) << 16) | ((b1 as usize) << 8);
            output[written] = alphabet[(n >> 18) & 0x3F];
            output[written + 1] = alphabet[(n >> 12) & 0x3F];
            output[written + 2] = alphabet[(n >> 6) & 0x3F];
            written += 3;
            if config.padding {
                output[written] = PAD;
                written += 1;
            }
        }
        _ => {}
    }

    written
}

/// Decodes `input` into `output` and returns the number of bytes written.
///
/// # Performance
/// The bulk of the input goes through a fast loop consuming **8 characters** per
/// iteration. Lookups map valid characters to `00xxxxxx` and invalid ones to `0xFF`,
/// so a single `& 0xC0` over the OR of all eight validates the whole group.
///
/// The last 4 characters always go through the tail, which is the only place
/// padding is accepted.
///
/// # Panics
/// If `output` is shorter than `Engine::estimate_decoded_len(input.len())`.
#[inline]
pub(crate) fn decode(config: &Config, input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
    if input.is_empty() {
        return Ok(0);
    }

    let table = if config.url_safe {
        &URL_SAFE_DECODE_TABLE
    } else {
        &STANDARD_DECODE_TABLE
    };

    let len = input.len();
    let len_safe = len.saturating_sub(4);
    let fast_len = len_safe - (len_safe % 8);

    let mut written = 0;

    // --- FAST LOOP (8 chars -> 6 bytes) ---
    for chunk in input[..fast_len].chunks_exact(8) {
        let d0 = table[chunk[0] as usize];
        let d1 = table[chunk[1] as usize];
        let d2 = table[chunk[2] as usize];
        let d3 = table[chunk[3] as usize];
        let d4 = table[chunk[4] as usize];
        let d5 = table[chunk[5] as usize];
        let d6 = table[chunk[6] as usize];
        let d7 = table[chunk[7] as usize];

        if (d0 | d1 | d2 | d3 | d4 | d5 | d6 | d7) & 0xC0 != 0 {
            return Err(Error::InvalidCharacter);
        }

        let n1 = ((d0 as u32) << 18) | ((d1 as u32) << 12) | ((d2 as u32) << 6) | (d3 as u32);
        let n2 = ((d4 as u32) << 18) | ((d5 as u32) << 12) | ((d6 as u32) << 6) | (d7 as u32);

        output[written..written + 3].copy_from_slice(&n1.to_be_bytes()[1..]);
        output[written + 3..written + 6].copy_from_slice(&n2.to_be_bytes()[1..]);
        written += 6;
    }

    // --- TAIL HANDLING ---
    let mut rest = &input[fast_len..];

    while let &[b0, b1, b2, b3, ref tail @ ..] = rest {
        let d0 = table[b0 as usize];
        let d1 = table[b1 as usize];

        // Padding only terminates the final group
        if b3 == PAD && tail.is_empty() {
            if b2 == PAD {
                // "XX==" -> 1 byte
                if (d0 | d1) & 0xC0 != 0 {
                    return Err(Error::InvalidCharacter);
                }
                let n = ((d0 as u32) << 18) | ((d1 as u32) << 12);
                output[written] = (n >> 16) as u8;
                return Ok(written + 1);
            }

            // "XXX=" -> 2 bytes
            let d2 = table[b2 as usize];
            if (d0 | d1 | d2) & 0xC0 != 0 {
                return Err(Error::InvalidCharacter);
            }
            let n = ((d0 as u32) << 18) | ((d1 as u32) << 12) | ((d2 as u32) << 6);
            output[written..written + 2].copy_from_slice(&n.to_be_bytes()[1..3]);
            return Ok(written + 2);
        }

        // "XXXX" -> 3 bytes
        let d2 = table[b2 as usize];
        let d3 = table[b3 as usize];
        if (d0 | d1 | d2 | d3) & 0xC0 != 0 {
            return Err(Error::InvalidCharacter);
        }

        let n = ((d0 as u32) << 18) | ((d1 as u32) << 12) | ((d2 as u32) << 6) | (d3 as u32);
        output[written..written + 3].copy_from_slice(&n.to_be_bytes()[1..]);
        written += 3;
        rest = tail;
    }

    // Partial group (1 to 3 chars), only legal without padding
    match *rest {
        [] => Ok(written),
        _ if config.padding => Err(Error::InvalidLength),
        [_] => Err(Error::InvalidLength),
        [b0, b1] => {
            let d0 = table[b0 as usize];
            let d1 = table[b1 as usize];
            if (d0 | d1) & 0xC0 != 0 {
                return Err(Error::InvalidCharacter);
            }
            let n = ((d0 as u32) << 18) | ((d1 as u32) << 12);
            output[written] = (n >> 16) as u8;
            Ok(written + 1)
        }
        [b0, b1, b2] => {
            let d0 = table[b0 as usize];
            let d1 = table[b1 as usize];
            let d2 = table[b2 as usize];
            if (d0 | d1 | d2) & 0xC0 != 0 {
                return Err(Error::InvalidCharacter);
            }
            let n = ((d0 as u32) << 18) | ((d1 as u32) << 12) | ((d2 as u32) << 6);
            output[written..written + 2].copy_from_slice(&n.to_be_bytes()[1..3]);
            Ok(written + 2)
        }
        _ => unreachable!("the tail loop consumes every full group"),
    }
}

#[cfg(kani)]
mod kani_verification_scalar {
    use super::*;
    use crate::{STANDARD, STANDARD_NO_PAD};

    const INPUT_LEN: usize = 17;

    #[kani::proof]
    #[kani::unwind(18)]
    fn check_roundtrip_safety() {
        let config = Config {
            url_safe: kani::any(),
            padding: kani::any(),
        };
        let input: [u8; INPUT_LEN] = kani::any();

        let enc_len = if config.padding {
            STANDARD.encoded_len(INPUT_LEN)
        } else {
            STANDARD_NO_PAD.encoded_len(INPUT_LEN)
        };
        let mut enc_buf = [0u8; 24];
        let mut dec_buf = [0u8; 24];

        let written = encode(&config, &input, &mut enc_buf);
        assert_eq!(written, enc_len);

        let decoded = decode(&config, &enc_buf[..enc_len], &mut dec_buf).expect("Decoder failed");
        assert_eq!(&dec_buf[..decoded], &input);
    }

    #[kani::proof]
    #[kani::unwind(18)]
    fn check_decoder_robustness() {
        let config = Config {
            url_safe: kani::any(),
            padding: kani::any(),
        };
        let input: [u8; INPUT_LEN] = kani::any();
        let mut dec_buf = [0u8; 15];

        // Never panics on arbitrary input
        let _ = decode(&config, &input, &mut dec_buf);
    }
}
