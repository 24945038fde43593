//! telemetry/counters.rs
//! Mutable counters used while reading or writing a frame stream.
//!
//! Converted into an immutable `TelemetrySnapshot` when the stream ends.

use serde::{Deserialize, Serialize};

/// Deterministic counters collected during stream processing
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub headers: u64,
    pub frames: u64,
    pub bytes_header: u64,
    pub bytes_payload: u64,
    /// Grid cells moved, both fields counted.
    pub cells: u64,
    /// Integrator updates performed (simulation only).
    pub integration_steps: u64,
}

impl TelemetryCounters {
    /// Record the stream header.
    pub fn add_header(&mut self, header_len: usize) {
        self.headers += 1;
        self.bytes_header += header_len as u64;
    }

    /// Record one frame read or written.
    ///
    /// - `payload_len`: encoded frame length in bytes
    /// - `cells`: number of cells across both fields
    pub fn add_frame(&mut self, payload_len: usize, cells: usize) {
        self.frames += 1;
        self.bytes_payload += payload_len as u64;
        self.cells += cells as u64;
    }

    pub fn add_integration_steps(&mut self, n: u64) {
        self.integration_steps += n;
    }

    pub fn total_bytes(&self) -> u64 {
        self.bytes_header + self.bytes_payload
    }
}
