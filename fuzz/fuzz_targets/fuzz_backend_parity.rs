#![no_main]
use libfuzzer_sys::fuzz_target;
use base64_lanes::{Backend, Engine, STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};

// The detected backend must agree with the scalar codec on every input,
// including which error a malformed input produces.
fuzz_target!(|data: &[u8]| {
    let Some((&selector, payload)) = data.split_first() else {
        return;
    };

    let engine = match selector % 4 {
        0 => &STANDARD,
        1 => &STANDARD_NO_PAD,
        2 => &URL_SAFE,
        _ => &URL_SAFE_NO_PAD,
    };

    let detected = Backend::detect();
    compare_encode(engine, detected, payload);
    compare_decode(engine, detected, payload);

    let valid = engine.encode(payload);
    compare_decode(engine, detected, valid.as_bytes());
});

fn compare_encode(engine: &Engine, backend: Backend, input: &[u8]) {
    let len = engine.encoded_len(input.len());
    let mut fast = vec![0u8; len];
    let mut slow = vec![0u8; len];

    let a = engine.encode_with_backend(backend, input, &mut fast);
    let b = engine.encode_with_backend(Backend::Scalar, input, &mut slow);
    assert_eq!(a, b, "{backend}: encode result differs, len {}", input.len());
    assert!(fast == slow, "{backend}: encode bytes differ, len {}", input.len());
}

fn compare_decode(engine: &Engine, backend: Backend, input: &[u8]) {
    let len = engine.estimate_decoded_len(input.len());
    let mut fast = vec![0u8; len];
    let mut slow = vec![0u8; len];

    let a = engine.decode_with_backend(backend, input, &mut fast);
    let b = engine.decode_with_backend(Backend::Scalar, input, &mut slow);
    assert_eq!(a, b, "{backend}: decode result differs, len {}", input.len());
    if let Ok(n) = a {
        assert!(fast[..n] == slow[..n], "{backend}: decode bytes differ, len {}", input.len());
    }
}
