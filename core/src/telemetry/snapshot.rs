//! telemetry/snapshot.rs
//!
//! Immutable view over counters and timers at the end of a run.
//! Serializable so callers can log or ship it as JSON.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub headers: u64,
    pub frames: u64,
    pub bytes_header: u64,
    pub bytes_payload: u64,
    pub cells: u64,
    pub integration_steps: u64,
    pub throughput_bytes_per_sec: f64,
    pub frames_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer) -> Self {
        let elapsed = timer.elapsed();
        let secs = elapsed.as_secs_f64();

        let (throughput, fps) = if secs > 0.0 {
            (counters.total_bytes() as f64 / secs, counters.frames as f64 / secs)
        } else {
            (0.0, 0.0)
        };

        Self {
            headers: counters.headers,
            frames: counters.frames,
            bytes_header: counters.bytes_header,
            bytes_payload: counters.bytes_payload,
            cells: counters.cells,
            integration_steps: counters.integration_steps,
            throughput_bytes_per_sec: throughput,
            frames_per_sec: fps,
            elapsed,
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn total_bytes(&self) -> u64 {
        self.bytes_header + self.bytes_payload
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        self.stage_times.has_all(expected)
    }

    /// Internal invariants:
    /// - at most one header per stream
    /// - payload bytes only with frames
    /// - stage time never exceeds wall time
    pub fn sanity_check(&self) -> bool {
        self.headers <= 1
            && (self.frames > 0 || self.bytes_payload == 0)
            && self.total_stage_time() <= self.elapsed
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
