// src/codecs/mod.rs
//
// Image format support. PPM is the only wire format graymill speaks.

pub mod ppm;
