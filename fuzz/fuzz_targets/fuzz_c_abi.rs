#![no_main]
use libfuzzer_sys::fuzz_target;
use base64_lanes::{ffi, STANDARD};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as Base64 text
    let mut dest = vec![0u8; STANDARD.estimate_decoded_len(data.len())];
    let mut outlen = 0usize;
    let n = unsafe { ffi::b64_lanes_decode(dest.as_mut_ptr(), data.as_ptr(), data.len(), &mut outlen) };

    match STANDARD.decode(data) {
        Ok(expected) => {
            assert_eq!(n, expected.len());
            assert_eq!(outlen, n);
            assert!(dest[..n] == expected[..]);
        }
        Err(_) => {
            assert_eq!(n, ffi::ERROR);
            assert_eq!(outlen, 0);
        }
    }

    // Arbitrary bytes as payload
    let mut encoded = vec![0u8; STANDARD.encoded_len(data.len())];
    let m = unsafe { ffi::b64_lanes_encode(encoded.as_mut_ptr(), data.as_ptr(), data.len()) };
    assert_eq!(m, encoded.len());

    let mut decoded = vec![0u8; STANDARD.estimate_decoded_len(m)];
    let k = unsafe { ffi::b64_lanes_decode(decoded.as_mut_ptr(), encoded.as_ptr(), m, core::ptr::null_mut()) };
    assert_eq!(k, data.len());
    assert!(decoded[..k] == data[..]);
});
