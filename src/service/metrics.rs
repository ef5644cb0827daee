//! Timing around engine calls.

use std::time::Instant;

use serde::Serialize;

/// Cost of one engine call as reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Wall-clock time spent in the engine, in milliseconds.
    pub time_ms: f64,
    /// Key comparisons the engine reported.
    pub comparisons: u64,
}

/// Run `f`, returning its value and the elapsed milliseconds.
pub(crate) fn timed<T>(f: impl FnOnce() -> T) -> (T, f64) {
    let start = Instant::now();
    let value = f();
    let elapsed_ms = start.elapsed().as_secs_f64() * 1_000.0;
    (value, elapsed_ms)
}
