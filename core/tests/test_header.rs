// Header suite: wire layout, validation and the frame-count policy.

// * byte order and field offsets
// * truncation below 12 bytes
// * shape rejection (zero / negative dims, negative steps)
// * inclusive vs exclusive counts

#[cfg(test)]
mod tests {

use rdframes_core::{
    config::StepPolicy,
    headers::{decode_header_le, encode_header_le, Header, HeaderError},
    stream::framing::FrameError,
};

// ## 1. Wire layout

    #[test]
    fn encode_is_three_le_i32() {
        let wire = encode_header_le(&Header::new(3, 2, 7));
        assert_eq!(
            wire,
            [3, 0, 0, 0, 2, 0, 0, 0, 7, 0, 0, 0]
        );
    }

    #[test]
    fn encode_negative_values_verbatim() {
        let wire = encode_header_le(&Header::new(-1, 0, i32::MIN));
        assert_eq!(&wire[0..4], &[0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(&wire[4..8], &[0, 0, 0, 0]);
        assert_eq!(&wire[8..12], &[0, 0, 0, 0x80]);
    }

    #[test]
    fn decode_reads_fields_in_order() {
        let h = decode_header_le(&[0x10, 0x01, 0, 0, 5, 0, 0, 0, 0, 0, 1, 0]).unwrap();
        assert_eq!(h.width, 0x110);
        assert_eq!(h.height, 5);
        assert_eq!(h.steps, 0x10000);
    }

    #[test]
    fn decode_ignores_extra_bytes() {
        let mut wire = encode_header_le(&Header::test_header()).to_vec();
        wire.extend_from_slice(&[0xAA; 9]);
        assert_eq!(decode_header_le(&wire).unwrap(), Header::test_header());
    }

    #[test]
    fn encode_decode_roundtrip() {
        for h in [Header::new(1, 1, 0), Header::new(640, 480, 150), Header::new(0, -4, -1)] {
            assert_eq!(decode_header_le(&encode_header_le(&h)).unwrap(), h);
        }
    }

// ## 2. Truncation

    #[test]
    fn decode_every_short_length_is_truncated() {
        let wire = encode_header_le(&Header::test_header());
        for n in 0..Header::LEN {
            let err = decode_header_le(&wire[..n]).unwrap_err();
            assert_eq!(err, HeaderError::Truncated { have: n, need: 12 });
            assert!(err.is_truncated());
            assert!(!err.is_shape());
        }
    }

// ## 3. Validation

    #[test]
    fn test_header_is_valid() {
        Header::test_header().validate().unwrap();
    }

    #[test]
    fn zero_or_negative_dims_are_shape_errors() {
        for (w, h) in [(0, 2), (2, 0), (0, 0), (-1, 3), (3, -7)] {
            let err = Header::new(w, h, 1).validate().unwrap_err();
            assert_eq!(err, HeaderError::InvalidShape { width: w, height: h });
            assert!(err.is_shape());
        }
    }

    #[test]
    fn negative_steps_is_a_shape_error() {
        let err = Header::new(2, 2, -1).validate().unwrap_err();
        assert!(matches!(err, HeaderError::NegativeSteps { steps: -1 }));
        assert!(err.is_shape());
    }

    #[test]
    fn zero_steps_is_valid() {
        Header::new(5, 5, 0).validate().unwrap();
    }

// ## 4. Counts and lengths

    #[test]
    fn frame_count_by_policy() {
        let h = Header::new(2, 2, 1);
        assert_eq!(h.frame_count(StepPolicy::Exclusive), 1);
        assert_eq!(h.frame_count(StepPolicy::Inclusive), 2);

        let empty = Header::new(2, 2, 0);
        assert_eq!(empty.frame_count(StepPolicy::Exclusive), 0);
        assert_eq!(empty.frame_count(StepPolicy::Inclusive), 1);
    }

    #[test]
    fn max_steps_inclusive_does_not_overflow() {
        let h = Header::new(1, 1, i32::MAX);
        assert_eq!(h.frame_count(StepPolicy::Inclusive), i32::MAX as u64 + 1);
    }

    #[test]
    fn frame_len_is_two_fields_of_doubles() {
        assert_eq!(Header::new(3, 2, 0).frame_len().unwrap(), 2 * 3 * 2 * 8);
        assert_eq!(Header::new(3, 2, 0).cells(), 6);
    }

    #[test]
    fn expected_stream_len_includes_header() {
        let h = Header::test_header();
        assert_eq!(h.expected_stream_len(StepPolicy::Inclusive).unwrap(), 12 + 2 * 64);
        assert_eq!(h.expected_stream_len(StepPolicy::Exclusive).unwrap(), 12 + 64);
    }

    #[test]
    fn frame_len_rejects_bad_shape() {
        let err = Header::new(0, 4, 1).frame_len().unwrap_err();
        assert!(matches!(err, FrameError::InvalidShape { width: 0, height: 4 }));
    }

    #[test]
    fn summary_format() {
        assert_eq!(Header::new(4, 3, 9).summary(), "4x3 grid, 9 steps");
    }
}
