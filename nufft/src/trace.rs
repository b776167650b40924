//! Structured traces of operator planning and application.
//!
//! Collection is off until enabled with [`set_tracing`].  Traces then accumulate in a process-wide
//! log until drained with [`take_operator_traces`].

use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

/// The kind of work an [`OperatorTrace`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Plan,
    Forward,
    Adjoint,
}

/// One planning or application event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorTrace {
    pub operation_id: String,
    pub operator: String,
    pub direction: Direction,
    pub rows: usize,
    pub cols: usize,
    pub timing_ns: u128,
}

impl OperatorTrace {
    #[must_use]
    pub fn to_json_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

static TRACE_LOG: OnceLock<Mutex<Vec<OperatorTrace>>> = OnceLock::new();
static OPERATION_COUNTER: AtomicU64 = AtomicU64::new(1);
static TRACING: AtomicBool = AtomicBool::new(false);

fn trace_log() -> &'static Mutex<Vec<OperatorTrace>> {
    TRACE_LOG.get_or_init(|| Mutex::new(Vec::new()))
}

fn next_operation_id() -> String {
    let next = OPERATION_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("op-{next:016x}")
}

/// Enables or disables trace collection.
pub fn set_tracing(enabled: bool) {
    TRACING.store(enabled, Ordering::Relaxed);
}

fn tracing_enabled() -> bool {
    TRACING.load(Ordering::Relaxed)
}

pub(crate) fn record(
    operator: &str,
    direction: Direction,
    shape: (usize, usize),
    started: Instant,
) {
    if !tracing_enabled() {
        return;
    }
    let trace = OperatorTrace {
        operation_id: next_operation_id(),
        operator: operator.to_owned(),
        direction,
        rows: shape.0,
        cols: shape.1,
        timing_ns: started.elapsed().as_nanos(),
    };
    if let Ok(mut log) = trace_log().lock() {
        log.push(trace);
    }
}

/// Drains and returns every trace recorded so far.
#[must_use]
pub fn take_operator_traces() -> Vec<OperatorTrace> {
    if let Ok(mut log) = trace_log().lock() {
        return std::mem::take(&mut *log);
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_line_is_flat() {
        let trace = OperatorTrace {
            operation_id: "op-0000000000000001".into(),
            operator: "F".into(),
            direction: Direction::Adjoint,
            rows: 3,
            cols: 4,
            timing_ns: 12,
        };
        assert_eq!(
            trace.to_json_line(),
            r#"{"operation_id":"op-0000000000000001","operator":"F","direction":"adjoint","rows":3,"cols":4,"timing_ns":12}"#
        );
    }

    fn traces_named(operator: &str) -> usize {
        take_operator_traces()
            .iter()
            .filter(|trace| trace.operator == operator)
            .count()
    }

    #[test]
    fn collection_is_opt_in() {
        let started = Instant::now();
        for _ in 0..100 {
            record("opt-in", Direction::Forward, (2, 2), started);
        }
        assert_eq!(traces_named("opt-in"), 0);

        set_tracing(true);
        record("opt-in", Direction::Adjoint, (2, 2), started);
        set_tracing(false);
        record("opt-in", Direction::Adjoint, (2, 2), started);
        assert_eq!(traces_named("opt-in"), 1);
    }

    #[test]
    fn operation_ids_increase() {
        let a = next_operation_id();
        let b = next_operation_id();
        assert!(b > a);
    }
}
