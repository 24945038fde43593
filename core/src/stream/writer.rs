//! Streaming frame writer: header first, then frames in index order.

use std::io::Write;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::StepPolicy;
use crate::headers::Header;
use crate::stream::framing::{encode_frame_into, Frame, FrameError};
use crate::stream::grid::Grid;
use crate::stream::io::write_header;
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::StreamError;

pub struct FrameWriter<W: Write> {
    inner: W,
    header: Header,
    policy: StepPolicy,
    expected: u64,
    written: u64,
    buf: Vec<u8>,
    /// An encode or write error left the sink in an unknown state.
    failed: bool,
    counters: TelemetryCounters,
    timer: TelemetryTimer,
}

impl<W: Write> FrameWriter<W> {
    /// Validate `header` and write it. The writer then accepts exactly
    /// `header.frame_count(policy)` frames.
    pub fn new(mut inner: W, header: Header, policy: StepPolicy) -> Result<Self, StreamError> {
        header.validate()?;
        let frame_len = header.frame_len()?;

        let mut timer = TelemetryTimer::new();
        timer.time(Stage::Write, || write_header(&mut inner, &header))?;

        let mut counters = TelemetryCounters::default();
        counters.add_header(Header::LEN);

        let expected = header.frame_count(policy);
        info!(header = %header.summary(), frames = expected, ?policy, "frame stream created");

        Ok(Self {
            inner,
            header,
            policy,
            expected,
            written: 0,
            buf: Vec::with_capacity(frame_len),
            failed: false,
            counters,
            timer,
        })
    }

    /// Append one frame. Returns the index it was written at.
    ///
    /// Shape and count errors leave the writer usable. An encode or I/O
    /// error is terminal: every later call fails with `InvalidState`.
    pub fn write_fields(&mut self, field_a: &Grid, field_b: &Grid) -> Result<u64, StreamError> {
        self.ensure_usable()?;
        if self.written >= self.expected {
            return Err(StreamError::FrameCountMismatch {
                expected: self.expected,
                actual: self.written + 1,
            });
        }

        let shape = (self.header.height as usize, self.header.width as usize);
        for field in [field_a, field_b] {
            if field.shape() != shape {
                return Err(FrameError::ShapeMismatch {
                    expected: shape,
                    actual: field.shape(),
                }
                .into());
            }
        }

        self.buf.clear();
        let buf = &mut self.buf;
        let encoded = self
            .timer
            .time(Stage::Encode, || encode_frame_into(field_a, field_b, buf));
        self.check(encoded.map_err(StreamError::from))?;

        let (inner, buf) = (&mut self.inner, &self.buf);
        let written = self.timer.time(Stage::Write, || inner.write_all(buf));
        self.check(written.map_err(StreamError::from))?;

        let index = self.written;
        self.written += 1;
        self.counters.add_frame(self.buf.len(), field_a.len() + field_b.len());

        debug!(index, "wrote frame");
        Ok(index)
    }

    /// Append `frame`; its index must be the next one in sequence.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<u64, StreamError> {
        self.ensure_usable()?;
        if frame.index != self.written {
            return Err(StreamError::InvalidState("frame index out of sequence"));
        }
        self.write_fields(&frame.field_a, &frame.field_b)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn policy(&self) -> StepPolicy {
        self.policy
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    pub fn frames_written(&self) -> u64 {
        self.written
    }

    pub fn frames_remaining(&self) -> u64 {
        self.expected - self.written
    }

    pub fn counters(&self) -> &TelemetryCounters {
        &self.counters
    }

    /// Count wall time from `start` rather than from construction, so work
    /// done before the header (building the initial state) is covered.
    pub fn started_at(mut self, start: Instant) -> Self {
        self.timer.start_time = start;
        self
    }

    /// Record integrator work in this stream's telemetry.
    pub fn add_stage_time(&mut self, stage: Stage, dur: Duration) {
        self.timer.add_stage_time(stage, dur);
    }

    pub fn add_integration_steps(&mut self, n: u64) {
        self.counters.add_integration_steps(n);
    }

    /// Check the frame count, flush, and hand back the sink.
    pub fn finish(mut self) -> Result<(W, TelemetrySnapshot), StreamError> {
        self.ensure_usable()?;
        if self.written != self.expected {
            return Err(StreamError::FrameCountMismatch {
                expected: self.expected,
                actual: self.written,
            });
        }
        let flushed = self.inner.flush();
        self.check(flushed.map_err(StreamError::from))?;
        self.timer.finish();

        let snapshot = TelemetrySnapshot::from(&self.counters, &self.timer);
        info!(frames = self.written, bytes = snapshot.total_bytes(), "frame stream finished");
        Ok((self.inner, snapshot))
    }

    fn ensure_usable(&self) -> Result<(), StreamError> {
        if self.failed {
            return Err(StreamError::InvalidState("writer already failed"));
        }
        Ok(())
    }

    /// Latch the failed state on error.
    fn check<T>(&mut self, result: Result<T, StreamError>) -> Result<T, StreamError> {
        if let Err(e) = &result {
            warn!(index = self.written, error = %e, "frame stream failed");
            self.failed = true;
        }
        result
    }
}
