// tests/edge_cases.rs
//
// Edge case tests for graymill
// Tests boundary values, invalid inputs, and error handling

use graymill::codecs::ppm;
use graymill::engine::{process_image, MAX_WORKERS};
use graymill::error::GraymillError;
use graymill::pixmap::PixelBuffer;

// Helper to build a P6 file from a header string and raw payload
fn ppm_file(header: &str, payload: &[u8]) -> Vec<u8> {
    let mut bytes = header.as_bytes().to_vec();
    bytes.extend_from_slice(payload);
    bytes
}

mod header_tests {
    use super::*;

    #[test]
    fn test_empty_input_rejected() {
        let err = ppm::decode(b"").unwrap_err();
        assert!(matches!(err, GraymillError::InvalidHeader { .. }));
    }

    #[test]
    fn test_wrong_magic_rejected() {
        let err = ppm::decode(&ppm_file("P5\n2 2\n255\n", &[0; 12])).unwrap_err();
        assert!(matches!(err, GraymillError::InvalidHeader { .. }));
    }

    #[test]
    fn test_missing_separator_after_magic_rejected() {
        // "P62" could be read as magic "P6" and width 2; it must not be
        let err = ppm::decode(b"P62 2 255 ").unwrap_err();
        assert!(matches!(err, GraymillError::InvalidHeader { .. }));
    }

    #[test]
    fn test_comments_between_header_fields_accepted() {
        let bytes = ppm_file("P6\n# made by graymill\n2 2 # width height\n255\n", &[7; 12]);
        let (header, pixels) = ppm::decode(&bytes).unwrap();
        assert_eq!((header.width, header.height), (2, 2));
        assert_eq!(pixels.len(), 12);
    }

    #[test]
    fn test_maxval_zero_rejected() {
        let err = ppm::decode(&ppm_file("P6\n2 2\n0\n", &[0; 12])).unwrap_err();
        assert!(matches!(
            err,
            GraymillError::UnsupportedMaxValue { value: 0 }
        ));
    }

    #[test]
    fn test_sixteen_bit_maxval_rejected() {
        // maxval > 255 means two bytes per sample, which graymill does not read
        let err = ppm::decode(&ppm_file("P6\n2 2\n65535\n", &[0; 24])).unwrap_err();
        assert!(matches!(
            err,
            GraymillError::UnsupportedMaxValue { value: 65535 }
        ));
    }

    #[test]
    fn test_width_beyond_limit_rejected() {
        // 32769はNG
        let err = ppm::decode(b"P6\n32769 1\n255\n").unwrap_err();
        assert!(matches!(err, GraymillError::DimensionExceedsLimit { .. }));
    }

    #[test]
    fn test_pixel_bomb_rejected_before_allocation() {
        // 10001 * 10000 = 100,010,000 pixels, just over the cap; no payload
        // is attached, so reaching the truncation check would allocate
        let err = ppm::decode(b"P6\n10001 10000\n255\n").unwrap_err();
        assert!(matches!(err, GraymillError::PixelCountExceedsLimit { .. }));
    }

    #[test]
    fn test_truncated_payload_reports_counts() {
        let err = ppm::decode(&ppm_file("P6\n2 2\n255\n", &[0; 11])).unwrap_err();
        match err {
            GraymillError::TruncatedPixelData { expected, actual } => {
                assert_eq!(expected, 12);
                assert_eq!(actual, 11);
            }
            other => panic!("expected TruncatedPixelData, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_width_decodes_to_empty_buffer() {
        let (header, pixels) = ppm::decode(b"P6\n0 2\n255\n").unwrap();
        assert_eq!(header.width, 0);
        assert!(pixels.is_empty());
    }

    #[test]
    fn test_width_overflowing_u32_rejected() {
        // 20 digits overflow the accumulator; must error, not wrap
        let err = ppm::decode(b"P6\n99999999999999999999 1\n255\n").unwrap_err();
        assert!(matches!(err, GraymillError::InvalidHeader { .. }));
    }

    #[test]
    fn test_u32_max_dimensions_rejected() {
        // width * height would overflow u32; the per-axis cap fires first
        let err = ppm::decode(b"P6\n4294967295 4294967295\n255\n").unwrap_err();
        assert!(matches!(err, GraymillError::DimensionExceedsLimit { .. }));
    }

    #[test]
    fn test_comment_running_to_end_of_input() {
        // Comment with no closing newline; scanning must stop at end of input
        let err = ppm::decode(b"P6 # unterminated").unwrap_err();
        assert!(matches!(err, GraymillError::InvalidHeader { .. }));
    }
}

mod config_tests {
    use super::*;

    fn two_pixels() -> PixelBuffer {
        PixelBuffer::from_vec(vec![1, 2, 3, 4, 5, 6]).unwrap()
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut pixels = two_pixels();
        let err = process_image(&mut pixels, 0, 1).unwrap_err();
        assert!(matches!(err, GraymillError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_zero_limit_rejected() {
        let mut pixels = two_pixels();
        let err = process_image(&mut pixels, 2, 0).unwrap_err();
        assert!(matches!(err, GraymillError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_limit_above_workers_rejected() {
        let mut pixels = two_pixels();
        let err = process_image(&mut pixels, 2, 3).unwrap_err();
        assert!(matches!(err, GraymillError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_worker_cap_enforced() {
        let mut pixels = two_pixels();
        let err = process_image(&mut pixels, MAX_WORKERS + 1, 1).unwrap_err();
        assert!(matches!(err, GraymillError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_rejection_leaves_buffer_untouched() {
        let mut pixels = two_pixels();
        let before = pixels.clone();

        assert!(process_image(&mut pixels, 0, 1).is_err());
        assert!(process_image(&mut pixels, 4, 0).is_err());
        assert!(process_image(&mut pixels, 2, 5).is_err());
        assert_eq!(pixels, before);
    }
}

mod degenerate_tests {
    use super::*;

    #[test]
    fn test_1x1_image() {
        let (_, mut pixels) = ppm::decode(&ppm_file("P6\n1 1\n255\n", &[10, 20, 30])).unwrap();
        process_image(&mut pixels, 4, 2).unwrap();
        assert_eq!(pixels.as_slice(), &[20, 20, 20]);
    }

    #[test]
    fn test_empty_image_every_worker_count() {
        for workers in 1..=8 {
            let (_, mut pixels) = ppm::decode(b"P6\n0 0\n255\n").unwrap();
            let report = process_image(&mut pixels, workers, workers).unwrap();
            assert!(pixels.is_empty());
            assert_eq!(report.bytes, 0);
        }
    }

    #[test]
    fn test_more_workers_than_pixels() {
        // 画素数より多いワーカーでも結果は変わらない
        let (_, mut pixels) =
            ppm::decode(&ppm_file("P6\n2 1\n255\n", &[30, 60, 90, 3, 6, 9])).unwrap();
        process_image(&mut pixels, 16, 16).unwrap();
        assert_eq!(pixels.as_slice(), &[60, 60, 60, 6, 6, 6]);
    }
}
