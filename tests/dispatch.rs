#[cfg(test)]
mod dispatch_tests {
    use base64_lanes::{Backend, Engine, Error, STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
    use rand::{Rng, rng};

    const ENGINES: [(&str, &Engine); 4] = [
        ("standard", &STANDARD),
        ("standard_no_pad", &STANDARD_NO_PAD),
        ("url_safe", &URL_SAFE),
        ("url_safe_no_pad", &URL_SAFE_NO_PAD),
    ];

    fn random_bytes(len: usize) -> Vec<u8> {
        let mut rng = rng();
        (0..len).map(|_| rng.random()).collect()
    }

    fn encode_with(engine: &Engine, backend: Backend, input: &[u8]) -> Vec<u8> {
        let mut out = vec![0u8; engine.encoded_len(input.len())];
        let n = engine.encode_with_backend(backend, input, &mut out).expect("encode failed");
        out.truncate(n);
        out
    }

    fn decode_with(engine: &Engine, backend: Backend, input: &[u8]) -> Result<Vec<u8>, Error> {
        let mut out = vec![0u8; engine.estimate_decoded_len(input.len())];
        let n = engine.decode_with_backend(backend, input, &mut out)?;
        out.truncate(n);
        Ok(out)
    }

    // ======================================================================
    // Known answers at the dispatch boundary
    // ======================================================================

    #[test]
    fn test_known_answers() {
        assert_eq!(STANDARD.encode(b""), "");
        assert_eq!(STANDARD.encode(b"Man"), "TWFu");
        assert_eq!(STANDARD.encode(b"Ma"), "TWE=");
        assert_eq!(STANDARD.encode(b"M"), "TQ==");
        assert_eq!(STANDARD_NO_PAD.encode(b"M"), "TQ");

        assert_eq!(STANDARD.decode(b"").unwrap(), b"");
        assert_eq!(STANDARD.decode(b"TWFu").unwrap(), b"Man");
        assert_eq!(STANDARD.decode(b"TWE=").unwrap(), b"Ma");
        assert_eq!(STANDARD.decode(b"TQ==").unwrap(), b"M");
    }

    #[test]
    fn test_empty_input_writes_nothing() {
        for backend in [Backend::detect(), Backend::Scalar] {
            let mut out = [0xAAu8; 4];
            assert_eq!(STANDARD.encode_with_backend(backend, b"", &mut out), Ok(0));
            assert_eq!(STANDARD.decode_with_backend(backend, b"", &mut out), Ok(0));
            assert_eq!(out, [0xAA; 4]);

            // An empty output buffer is enough for empty input.
            assert_eq!(STANDARD.encode_with_backend(backend, b"", &mut []), Ok(0));
            assert_eq!(STANDARD.decode_with_backend(backend, b"", &mut []), Ok(0));
        }
    }

    // ======================================================================
    // Detected backend == scalar reference
    // ======================================================================

    #[test]
    fn test_detected_backend_matches_scalar() {
        let detected = Backend::detect();

        for len in 0..=600 {
            let input = random_bytes(len);
            for (name, engine) in ENGINES {
                let fast = encode_with(engine, detected, &input);
                let slow = encode_with(engine, Backend::Scalar, &input);
                assert_eq!(fast, slow, "{name}: encode mismatch at len {len} ({detected})");

                let fast_dec = decode_with(engine, detected, &slow).expect("detected decode failed");
                let slow_dec = decode_with(engine, Backend::Scalar, &slow).expect("scalar decode failed");
                assert_eq!(fast_dec, slow_dec, "{name}: decode mismatch at len {len} ({detected})");
                assert_eq!(fast_dec, input, "{name}: round trip failed at len {len}");
            }
        }
    }

    #[test]
    fn test_one_encode_block_matches_scalar() {
        // 24 input bytes: one AVX2 block if the window allowed it, scalar otherwise.
        let input: Vec<u8> = (0u8..24).collect();
        assert_eq!(
            encode_with(&STANDARD, Backend::detect(), &input),
            encode_with(&STANDARD, Backend::Scalar, &input),
        );
        assert_eq!(STANDARD.encode(&input), "AAECAwQFBgcICQoLDA0ODxAREhMUFRYX");
    }

    #[test]
    fn test_forty_four_char_decode_matches_scalar() {
        // 44 characters is one short of the AVX2 decode window.
        let input = random_bytes(33);
        let encoded = STANDARD.encode(&input);
        assert_eq!(encoded.len(), 44);

        let fast = decode_with(&STANDARD, Backend::detect(), encoded.as_bytes()).unwrap();
        let slow = decode_with(&STANDARD, Backend::Scalar, encoded.as_bytes()).unwrap();
        assert_eq!(fast, slow);
        assert_eq!(fast, input);
    }

    #[test]
    fn test_unavailable_backend_degrades_to_scalar() {
        let input = random_bytes(300);
        let expected = encode_with(&STANDARD, Backend::Scalar, &input);

        for backend in [Backend::Avx2, Backend::Neon] {
            assert_eq!(encode_with(&STANDARD, backend, &input), expected, "{backend}");
            assert_eq!(decode_with(&STANDARD, backend, &expected).unwrap(), input, "{backend}");
        }
    }

    // ======================================================================
    // Error detection inside vector blocks
    // ======================================================================

    #[test]
    fn test_invalid_final_character_of_a_block() {
        let mut input = [b'A'; 32];
        input[31] = b'!';
        assert_eq!(STANDARD.decode(&input), Err(Error::InvalidCharacter));

        let mut input = [b'A'; 128];
        input[31] = b'!';
        assert_eq!(STANDARD.decode(&input), Err(Error::InvalidCharacter));
    }

    #[test]
    fn test_invalid_byte_at_every_position() {
        // Long enough for two AVX2 blocks and one NEON block followed by a tail.
        let valid = STANDARD.encode(random_bytes(120));
        assert_eq!(valid.len(), 160);

        let bad_bytes: Vec<u8> = (0..=255u8)
            .filter(|&b| !(b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'='))
            .collect();

        for backend in [Backend::detect(), Backend::Scalar] {
            for pos in 0..valid.len() {
                for &bad in &bad_bytes {
                    let mut input = valid.clone().into_bytes();
                    input[pos] = bad;
                    assert_eq!(
                        decode_with(&STANDARD, backend, &input),
                        Err(Error::InvalidCharacter),
                        "{backend}: byte {bad:#04x} at {pos} was accepted",
                    );
                }
            }
        }
    }

    #[test]
    fn test_early_padding_is_rejected_by_every_backend() {
        let mut input = STANDARD.encode(random_bytes(150)).into_bytes();
        input[10] = b'=';
        input[11] = b'=';

        for backend in [Backend::detect(), Backend::Scalar] {
            assert!(decode_with(&STANDARD, backend, &input).is_err(), "{backend}");
        }
    }

    #[test]
    fn test_url_safe_rejects_standard_symbols() {
        let input = STANDARD.encode(vec![0xFBu8; 90]);
        assert!(input.contains('+') || input.contains('/'));
        assert_eq!(URL_SAFE.decode(input.as_bytes()), Err(Error::InvalidCharacter));

        let input = URL_SAFE.encode(vec![0xFBu8; 90]);
        assert!(input.contains('-') || input.contains('_'));
        assert_eq!(STANDARD.decode(input.as_bytes()), Err(Error::InvalidCharacter));
    }

    // ======================================================================
    // Buffer sizing
    // ======================================================================

    #[test]
    fn test_short_buffers_are_rejected_up_front() {
        let input = random_bytes(96);
        let encoded = STANDARD.encode(&input);

        for backend in [Backend::detect(), Backend::Scalar] {
            let mut out = vec![0u8; encoded.len() - 1];
            assert_eq!(STANDARD.encode_with_backend(backend, &input, &mut out), Err(Error::BufferTooSmall));

            let mut out = vec![0u8; STANDARD.estimate_decoded_len(encoded.len()) - 1];
            assert_eq!(
                STANDARD.decode_with_backend(backend, encoded.as_bytes(), &mut out),
                Err(Error::BufferTooSmall),
            );
        }
    }

    #[test]
    fn test_backend_probe_is_stable() {
        let first = Backend::detect();
        assert!(first.is_available());
        for _ in 0..100 {
            assert_eq!(Backend::detect(), first);
        }
    }
}
