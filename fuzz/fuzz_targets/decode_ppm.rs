#![no_main]

use graymill::codecs::ppm;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes may fail; we're interested only in panics,
    // integer overflow, and oversized allocations.
    if let Ok((header, pixels)) = ppm::decode(data) {
        assert_eq!(pixels.len(), header.expected_len());
        let _ = ppm::encode(&header, &pixels);
    }
});
