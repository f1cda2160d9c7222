#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use graymill::engine::process_image;
use graymill::pixmap::{PixelBuffer, CHANNELS};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct RunSeed {
    pixels: u16,
    workers: u8,
    max_active: u8,
    fill: u8,
}

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let mut unstructured = Unstructured::new(data);
    let seed: RunSeed = match RunSeed::arbitrary(&mut unstructured) {
        Ok(seed) => seed,
        Err(_) => return,
    };

    let pixels = usize::from(seed.pixels) % 1024;
    let workers = usize::from(seed.workers) % 8 + 1;
    let max_active = usize::from(seed.max_active) % workers + 1;

    let mut samples = vec![seed.fill; pixels * CHANNELS];
    let _ = unstructured.fill_buffer(&mut samples);

    let mut buffer = match PixelBuffer::from_vec(samples) {
        Ok(buffer) => buffer,
        Err(_) => return,
    };

    // Any (workers, max_active) pair in range must complete without panics
    // or deadlocks and leave every pixel with three equal channels.
    if process_image(&mut buffer, workers, max_active).is_ok() {
        for px in buffer.as_slice().chunks_exact(CHANNELS) {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
        }
    }
});
