// Decoder suite: the stream contract end to end.

// * header -> frames -> exhausted, in index order
// * truncation anywhere is an error, never a short frame
// * shape errors surface before any frame read
// * step policy decides the frame count
// * strict trailing-bytes mode

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor, Read};

    use rdframes_core::{
        config::{DecoderConfig, StepPolicy},
        decode_all, read_frame, read_header,
        headers::{encode_header_le, Header},
        stream::{
            decode_file, framing::encode_frame, open_file, DecoderState, Frame, FrameDecoder,
        },
        types::StreamError,
    };

    fn stream_bytes(header: Header, frames: &[Frame]) -> Vec<u8> {
        let mut out = encode_header_le(&header).to_vec();
        for f in frames {
            out.extend(encode_frame(f).unwrap());
        }
        out
    }

    /// Frame `k` holds `k` in A and `-k` in B.
    fn counting_frames(n: u64, height: usize, width: usize) -> Vec<Frame> {
        (0..n)
            .map(|k| Frame::test_frame(k, height, width, k as f64, -(k as f64)))
            .collect()
    }

    fn inclusive() -> DecoderConfig {
        DecoderConfig::with_policy(StepPolicy::Inclusive)
    }

    fn exclusive() -> DecoderConfig {
        DecoderConfig::with_policy(StepPolicy::Exclusive)
    }

    /// Reader that fails the test if anything past `limit` bytes is requested.
    struct Fence {
        data: Cursor<Vec<u8>>,
        limit: u64,
    }

    impl Read for Fence {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.data.position() >= self.limit && !buf.is_empty() {
                return Err(io::Error::new(io::ErrorKind::Other, "read past fence"));
            }
            let room = (self.limit - self.data.position()) as usize;
            let n = buf.len().min(room);
            self.data.read(&mut buf[..n])
        }
    }

// # 1. The 2x2, one-step scenario

    #[test]
    fn two_by_two_inclusive_yields_two_frames() {
        let header = Header::new(2, 2, 1);
        let frames = vec![
            Frame::test_frame(0, 2, 2, 0.5, -0.5),
            Frame::test_frame(1, 2, 2, 0.5, -0.5),
        ];
        let bytes = stream_bytes(header, &frames);

        let (h, decoder) = decode_all(Cursor::new(bytes), inclusive()).unwrap();
        assert_eq!(h, header);

        let decoded: Vec<Frame> = decoder.collect::<Result<_, _>>().unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].index, 0);
        assert_eq!(decoded[0].field_a.to_rows(), vec![vec![0.5, 0.5], vec![0.5, 0.5]]);
        assert_eq!(decoded[0].field_b.to_rows(), vec![vec![-0.5, -0.5], vec![-0.5, -0.5]]);
        assert_eq!(decoded[1].index, 1);
    }

    #[test]
    fn two_by_two_from_raw_bytes() {
        let mut bytes = Vec::new();
        for v in [2i32, 2, 1] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        for _ in 0..2 {
            for _ in 0..4 {
                bytes.extend_from_slice(&0.5f64.to_le_bytes());
            }
            for _ in 0..4 {
                bytes.extend_from_slice(&(-0.5f64).to_le_bytes());
            }
        }
        assert_eq!(bytes.len(), 12 + 2 * 64);

        let (h, decoder) = decode_all(Cursor::new(bytes), inclusive()).unwrap();
        assert_eq!((h.width, h.height, h.steps), (2, 2, 1));
        let frames: Vec<Frame> = decoder.collect::<Result<_, _>>().unwrap();
        assert_eq!(frames.len(), 2);
        for (k, f) in frames.iter().enumerate() {
            assert_eq!(f.index, k as u64);
            assert_eq!(f.field_a.to_rows(), vec![vec![0.5; 2]; 2]);
            assert_eq!(f.field_b.to_rows(), vec![vec![-0.5; 2]; 2]);
        }
    }

    #[test]
    fn default_config_is_inclusive() {
        let bytes = stream_bytes(Header::new(2, 2, 1), &counting_frames(2, 2, 2));
        let (_, decoder) = decode_all(Cursor::new(bytes), DecoderConfig::default()).unwrap();
        assert_eq!(decoder.count(), 2);
    }

    #[test]
    fn exclusive_reads_steps_frames_and_ignores_rest() {
        let bytes = stream_bytes(Header::new(2, 2, 1), &counting_frames(2, 2, 2));
        let (_, decoder) = decode_all(Cursor::new(bytes), exclusive()).unwrap();
        let frames: Vec<_> = decoder.collect::<Result<_, _>>().unwrap();
        assert_eq!(frames.len(), 1);
    }

// # 2. Ordering

    #[test]
    fn frames_come_out_in_index_order() {
        let bytes = stream_bytes(Header::new(3, 2, 4), &counting_frames(5, 2, 3));
        let (_, decoder) = decode_all(Cursor::new(bytes), inclusive()).unwrap();

        for (k, frame) in decoder.enumerate() {
            let frame = frame.unwrap();
            assert_eq!(frame.index, k as u64);
            assert_eq!(frame.field_a[(1, 2)], k as f64);
            assert_eq!(frame.field_b[(0, 0)], -(k as f64));
            assert_eq!(frame.shape(), (2, 3));
        }
    }

    #[test]
    fn non_square_grid_is_height_rows_by_width_cols() {
        let mut a = rdframes_core::stream::Grid::zeros(2, 3);
        a[(0, 2)] = 7.0;
        a[(1, 0)] = 8.0;
        let frame = Frame::new(0, a, rdframes_core::stream::Grid::zeros(2, 3)).unwrap();
        let bytes = stream_bytes(Header::new(3, 2, 0), &[frame]);

        let (_, mut decoder) = decode_all(Cursor::new(bytes), inclusive()).unwrap();
        let f = decoder.next_frame().unwrap().unwrap();
        assert_eq!(f.field_a.to_rows(), vec![vec![0.0, 0.0, 7.0], vec![8.0, 0.0, 0.0]]);
    }

// # 3. Truncation

    #[test]
    fn truncation_at_every_offset_is_an_error() {
        let header = Header::new(2, 2, 1);
        let full = stream_bytes(header, &counting_frames(2, 2, 2));

        for cut in 0..full.len() {
            let result: Result<Vec<Frame>, StreamError> = (|| {
                let (_, decoder) = decode_all(Cursor::new(full[..cut].to_vec()), inclusive())?;
                decoder.collect()
            })();
            let err = result.expect_err(&format!("cut at {cut} decoded cleanly"));
            assert!(err.is_truncated(), "cut at {cut}: {err}");
        }
    }

    #[test]
    fn truncated_frame_keeps_earlier_frames() {
        let full = stream_bytes(Header::new(2, 2, 2), &counting_frames(3, 2, 2));
        let cut = full.len() - 10;

        let (_, mut decoder) = decode_all(Cursor::new(full[..cut].to_vec()), inclusive()).unwrap();
        assert_eq!(decoder.next_frame().unwrap().unwrap().index, 0);
        assert_eq!(decoder.next_frame().unwrap().unwrap().index, 1);

        let err = decoder.next_frame().unwrap_err();
        assert!(matches!(
            err,
            StreamError::Frame(rdframes_core::stream::FrameError::Truncated { index: 2, have: 54, need: 64 })
        ));
        assert_eq!(decoder.state(), DecoderState::Failed);
    }

    #[test]
    fn short_header_is_truncated() {
        let err = decode_all(Cursor::new(vec![2, 0, 0, 0, 2]), inclusive()).err().unwrap();
        assert!(err.is_truncated());
        assert!(!err.is_shape());
    }

// # 4. Shape rejection

    #[test]
    fn zero_dimension_fails_before_frames() {
        for (w, h) in [(0, 2), (2, 0), (-3, 2)] {
            let bytes = encode_header_le(&Header::new(w, h, 3)).to_vec();
            let fence = Fence { data: Cursor::new(bytes), limit: 12 };
            let err = decode_all(fence, inclusive()).err().unwrap();
            assert!(err.is_shape(), "{w}x{h}: {err}");
        }
    }

    #[test]
    fn zero_dimension_with_zero_frames_still_fails() {
        let bytes = encode_header_le(&Header::new(0, 4, 0)).to_vec();
        let err = decode_all(Cursor::new(bytes), exclusive()).err().unwrap();
        assert!(err.is_shape());
    }

    #[test]
    fn negative_steps_fails() {
        let bytes = encode_header_le(&Header::new(2, 2, -1)).to_vec();
        assert!(decode_all(Cursor::new(bytes), inclusive()).err().unwrap().is_shape());
    }

// # 5. Empty stream

    #[test]
    fn zero_steps_exclusive_reads_nothing_after_header() {
        let mut bytes = encode_header_le(&Header::new(4, 4, 0)).to_vec();
        bytes.extend_from_slice(&[0xEE; 40]);
        let fence = Fence { data: Cursor::new(bytes), limit: 12 };

        let (_, mut decoder) = decode_all(fence, exclusive()).unwrap();
        assert_eq!(decoder.frames_remaining(), 0);
        assert!(decoder.next_frame().unwrap().is_none());
        assert_eq!(decoder.state(), DecoderState::Exhausted);
    }

    #[test]
    fn zero_steps_inclusive_reads_one_frame() {
        let bytes = stream_bytes(Header::new(2, 1, 0), &counting_frames(1, 1, 2));
        let (_, decoder) = decode_all(Cursor::new(bytes), inclusive()).unwrap();
        assert_eq!(decoder.count(), 1);
    }

// # 6. State machine

    #[test]
    fn states_follow_the_stream() {
        let bytes = stream_bytes(Header::new(1, 1, 1), &counting_frames(2, 1, 1));
        let mut decoder = FrameDecoder::new(Cursor::new(bytes), inclusive());
        assert_eq!(decoder.state(), DecoderState::Unopened);
        assert!(decoder.header().is_none());

        decoder.read_header().unwrap();
        assert_eq!(decoder.state(), DecoderState::HeaderRead);
        assert_eq!(decoder.frames_remaining(), 2);

        decoder.next_frame().unwrap();
        assert_eq!(decoder.state(), DecoderState::FrameRead { index: 0 });
        decoder.next_frame().unwrap();
        assert_eq!(decoder.state(), DecoderState::FrameRead { index: 1 });

        assert!(decoder.next_frame().unwrap().is_none());
        assert_eq!(decoder.state(), DecoderState::Exhausted);
        assert!(decoder.next_frame().unwrap().is_none());
    }

    #[test]
    fn header_cannot_be_read_twice() {
        let bytes = stream_bytes(Header::new(1, 1, 0), &counting_frames(1, 1, 1));
        let mut decoder = FrameDecoder::new(Cursor::new(bytes), inclusive());
        decoder.read_header().unwrap();
        assert!(matches!(decoder.read_header(), Err(StreamError::InvalidState(_))));
    }

    #[test]
    fn next_frame_reads_header_on_demand() {
        let bytes = stream_bytes(Header::new(1, 1, 0), &counting_frames(1, 1, 1));
        let mut decoder = FrameDecoder::new(Cursor::new(bytes), inclusive());
        assert_eq!(decoder.next_frame().unwrap().unwrap().index, 0);
        assert_eq!(decoder.header(), Some(&Header::new(1, 1, 0)));
    }

    #[test]
    fn iterator_is_fused_after_failure() {
        let bytes = stream_bytes(Header::new(2, 2, 3), &counting_frames(1, 2, 2));
        let (_, mut decoder) = decode_all(Cursor::new(bytes), inclusive()).unwrap();
        assert!(decoder.next().unwrap().is_ok());
        assert!(decoder.next().unwrap().is_err());
        assert!(decoder.next().is_none());
        assert!(decoder.next().is_none());
        assert!(matches!(decoder.next_frame(), Err(StreamError::InvalidState(_))));
    }

    #[test]
    fn into_inner_releases_the_reader() {
        let mut bytes = stream_bytes(Header::new(1, 1, 0), &counting_frames(1, 1, 1));
        bytes.push(0x42);
        let (_, mut decoder) = decode_all(Cursor::new(bytes), inclusive()).unwrap();
        while decoder.next_frame().unwrap().is_some() {}

        let mut rest = Vec::new();
        decoder.into_inner().read_to_end(&mut rest).unwrap();
        assert_eq!(rest, vec![0x42]);
    }

// # 7. Trailing bytes

    #[test]
    fn trailing_bytes_allowed_by_default() {
        let mut bytes = stream_bytes(Header::new(2, 2, 0), &counting_frames(1, 2, 2));
        bytes.extend_from_slice(b"junk");
        let (_, decoder) = decode_all(Cursor::new(bytes), inclusive()).unwrap();
        assert_eq!(decoder.collect::<Result<Vec<_>, _>>().unwrap().len(), 1);
    }

    #[test]
    fn trailing_bytes_rejected_in_strict_mode() {
        let mut bytes = stream_bytes(Header::new(2, 2, 0), &counting_frames(1, 2, 2));
        bytes.push(0);
        let config = DecoderConfig {
            reject_trailing_bytes: true,
            ..inclusive()
        };
        let (_, mut decoder) = decode_all(Cursor::new(bytes), config).unwrap();
        decoder.next_frame().unwrap();
        assert!(matches!(decoder.next_frame(), Err(StreamError::TrailingBytes { last_index: 0 })));
        assert_eq!(decoder.state(), DecoderState::Failed);
    }

    #[test]
    fn strict_mode_accepts_exact_stream() {
        let bytes = stream_bytes(Header::new(2, 2, 0), &counting_frames(1, 2, 2));
        let config = DecoderConfig {
            reject_trailing_bytes: true,
            ..inclusive()
        };
        let (_, decoder) = decode_all(Cursor::new(bytes), config).unwrap();
        assert_eq!(decoder.collect::<Result<Vec<_>, _>>().unwrap().len(), 1);
    }

// # 8. Free functions and files

    #[test]
    fn read_header_then_read_frame() {
        let bytes = stream_bytes(Header::new(3, 1, 0), &counting_frames(1, 1, 3));
        let mut cursor = Cursor::new(bytes);
        let h = read_header(&mut cursor).unwrap();
        let f = read_frame(&mut cursor, h.width, h.height).unwrap();
        assert_eq!(f.shape(), (1, 3));
    }

    #[test]
    fn read_frame_checks_shape_before_reading() {
        let fence = &mut Fence { data: Cursor::new(vec![0; 64]), limit: 0 };
        let err = read_frame(fence, 0, 2).unwrap_err();
        assert!(err.is_shape());
    }

    #[test]
    fn decode_file_visits_every_frame() -> anyhow::Result<()> {
        let path = std::env::temp_dir().join(format!("rdframes-decode-{}.bin", std::process::id()));
        std::fs::write(&path, stream_bytes(Header::new(2, 3, 2), &counting_frames(3, 3, 2)))?;

        let mut seen = Vec::new();
        let snapshot = decode_file(&path, DecoderConfig::default(), |h, f| {
            assert_eq!(h.width, 2);
            seen.push(f.index);
        })?;
        assert_eq!(seen, vec![0, 1, 2]);
        assert_eq!(snapshot.frames, 3);
        assert_eq!(snapshot.bytes_header, 12);
        assert_eq!(snapshot.bytes_payload, 3 * 2 * 6 * 8);

        let (h, _) = open_file(&path, DecoderConfig::default())?;
        assert_eq!(h, Header::new(2, 3, 2));

        std::fs::remove_file(&path)?;
        Ok(())
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = open_file("/nonexistent/rdframes.bin", DecoderConfig::default()).err().unwrap();
        assert!(matches!(err, StreamError::Io(_)));
    }
}
