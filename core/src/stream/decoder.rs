//! Lazy, forward-only frame decoder.
//!
//! State machine:
//!
//! ```text
//! Unopened -> HeaderRead -> (FrameRead)* -> Exhausted
//!     \            \              \
//!      `------------`--------------`----> Failed
//! ```
//!
//! The decoder owns its reader, so one stream has exactly one sequential
//! reader and is released when the decoder is dropped.

use std::fs::File;
use std::io::{BufReader, Read};
use std::iter::FusedIterator;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::{DecoderConfig, StepPolicy};
use crate::constants::{CELL_LEN, FIELDS_PER_FRAME};
use crate::headers::Header;
use crate::stream::framing::Frame;
use crate::stream::io::{has_remaining, open_input, read_frame_at, read_header};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::StreamError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderState {
    Unopened,
    HeaderRead,
    /// Last frame handed out.
    FrameRead { index: u64 },
    Exhausted,
    /// A decode error occurred; nothing more will be read.
    Failed,
}

impl DecoderState {
    pub fn is_terminal(self) -> bool {
        matches!(self, DecoderState::Exhausted | DecoderState::Failed)
    }
}

pub struct FrameDecoder<R: Read> {
    inner: R,
    config: DecoderConfig,
    state: DecoderState,
    header: Option<Header>,
    next_index: u64,
    frame_count: u64,
    counters: TelemetryCounters,
    timer: TelemetryTimer,
}

impl<R: Read> FrameDecoder<R> {
    /// Wrap a reader without touching it.
    pub fn new(inner: R, config: DecoderConfig) -> Self {
        Self {
            inner,
            config,
            state: DecoderState::Unopened,
            header: None,
            next_index: 0,
            frame_count: 0,
            counters: TelemetryCounters::default(),
            timer: TelemetryTimer::new(),
        }
    }

    /// Consume and validate the header. Allowed once, from `Unopened`.
    ///
    /// Shape is checked here so a zero-sized grid is rejected before any
    /// frame read, even when the policy announces no frames.
    pub fn read_header(&mut self) -> Result<Header, StreamError> {
        if self.state != DecoderState::Unopened {
            return Err(StreamError::InvalidState("header already read"));
        }

        let inner = &mut self.inner;
        let header = match self
            .timer
            .time(Stage::Read, || read_header(inner))
            .and_then(|h| h.validate().map(|_| h).map_err(StreamError::from))
        {
            Ok(h) => h,
            Err(e) => return Err(self.fail(e)),
        };

        self.counters.add_header(Header::LEN);
        self.frame_count = header.frame_count(self.policy());
        self.header = Some(header);
        self.state = DecoderState::HeaderRead;

        info!(
            width = header.width,
            height = header.height,
            steps = header.steps,
            frames = self.frame_count,
            policy = ?self.policy(),
            "frame stream opened"
        );
        Ok(header)
    }

    /// Next frame in index order, `Ok(None)` once all announced frames
    /// have been read. Reads the header first if needed.
    pub fn next_frame(&mut self) -> Result<Option<Frame>, StreamError> {
        match self.state {
            DecoderState::Unopened => {
                self.read_header()?;
            }
            DecoderState::Exhausted => return Ok(None),
            DecoderState::Failed => return Err(StreamError::InvalidState("decoder already failed")),
            DecoderState::HeaderRead | DecoderState::FrameRead { .. } => {}
        }

        if self.next_index >= self.frame_count {
            self.exhaust()?;
            return Ok(None);
        }

        let Some(header) = self.header else {
            return Err(StreamError::InvalidState("header missing"));
        };
        let index = self.next_index;

        let inner = &mut self.inner;
        let frame = match self
            .timer
            .time(Stage::Decode, || read_frame_at(inner, index, header.width, header.height))
        {
            Ok(f) => f,
            Err(e) => return Err(self.fail(e)),
        };

        let cells = frame.field_a.len() * FIELDS_PER_FRAME;
        self.counters.add_frame(cells * CELL_LEN, cells);
        self.state = DecoderState::FrameRead { index };
        self.next_index += 1;

        debug!(index, "decoded frame");
        Ok(Some(frame))
    }

    fn exhaust(&mut self) -> Result<(), StreamError> {
        if self.config.reject_trailing_bytes {
            match has_remaining(&mut self.inner) {
                Ok(false) => {}
                Ok(true) => {
                    let last_index = self.frame_count.saturating_sub(1);
                    return Err(self.fail(StreamError::TrailingBytes { last_index }));
                }
                Err(e) => return Err(self.fail(e)),
            }
        }
        self.state = DecoderState::Exhausted;
        self.timer.finish();
        info!(frames = self.counters.frames, "frame stream exhausted");
        Ok(())
    }

    fn fail(&mut self, e: StreamError) -> StreamError {
        warn!(error = %e, next_index = self.next_index, "frame stream failed");
        self.state = DecoderState::Failed;
        self.timer.finish();
        e
    }

    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    pub fn policy(&self) -> StepPolicy {
        self.config.step_policy()
    }

    /// Frames announced but not yet read. Zero before the header is read.
    pub fn frames_remaining(&self) -> u64 {
        if self.state.is_terminal() {
            return 0;
        }
        self.frame_count.saturating_sub(self.next_index)
    }

    pub fn counters(&self) -> &TelemetryCounters {
        &self.counters
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::from(&self.counters, &self.timer)
    }

    /// Give back the reader, positioned after whatever was consumed.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Iterator for FrameDecoder<R> {
    type Item = Result<Frame, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state.is_terminal() {
            return None;
        }
        self.next_frame().transpose()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.state == DecoderState::Unopened {
            return (0, None);
        }
        let remaining = usize::try_from(self.frames_remaining()).unwrap_or(usize::MAX);
        (0, Some(remaining))
    }
}

impl<R: Read> FusedIterator for FrameDecoder<R> {}

/// Read the header, then hand back the lazy frame sequence.
pub fn decode_all<R: Read>(reader: R, config: DecoderConfig) -> Result<(Header, FrameDecoder<R>), StreamError> {
    let mut decoder = FrameDecoder::new(reader, config);
    let header = decoder.read_header()?;
    Ok((header, decoder))
}

/// Open `path` and start decoding it.
pub fn open_file(
    path: impl AsRef<Path>,
    config: DecoderConfig,
) -> Result<(Header, FrameDecoder<BufReader<File>>), StreamError> {
    decode_all(open_input(path.as_ref())?, config)
}

/// Decode every frame of `path`, calling `visit` once per frame in order.
///
/// The file is closed on return, including on error.
pub fn decode_file<F>(path: impl AsRef<Path>, config: DecoderConfig, mut visit: F) -> Result<TelemetrySnapshot, StreamError>
where
    F: FnMut(&Header, Frame),
{
    let (header, mut decoder) = open_file(path, config)?;
    while let Some(frame) = decoder.next_frame()? {
        visit(&header, frame);
    }
    Ok(decoder.snapshot())
}
