#![allow(dead_code)]

use schedsim::{ProcessDef, SimFormat};

/// Initialize tracing from `RUST_LOG` with the simulated-tick formatter.
///
/// `try_init()` is idempotent: first call in the process succeeds,
/// subsequent calls are silently ignored. The simulated clock is
/// thread-local, so tests need no lock.
pub fn setup_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .event_format(SimFormat)
        .try_init();
}

/// Four processes with mixed CPU and I/O demand.
pub fn classic_workload() -> Vec<ProcessDef> {
    vec![
        ProcessDef::new("P0", 0, 24).with_io(2, 5),
        ProcessDef::new("P1", 3, 17).with_io(3, 6),
        ProcessDef::new("P2", 8, 50).with_io(2, 5),
        ProcessDef::new("P3", 15, 10).with_io(3, 6),
    ]
}

/// Assert a float metric to two decimal places.
pub fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < 0.005,
        "{what}: expected {expected:.2}, got {actual:.2}"
    );
}
