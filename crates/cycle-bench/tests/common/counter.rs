//! Deterministic counter for tests that need a calibrated store.

use cycle_bench::CycleCounter;
use std::cell::Cell;

/// Start/stop pairs are `deltas[i % len]` cycles apart.
pub struct ScriptedCounter {
    now: Cell<u64>,
    next: Cell<usize>,
    deltas: Vec<u64>,
}

impl ScriptedCounter {
    pub fn new(deltas: Vec<u64>) -> Self {
        Self {
            now: Cell::new(0),
            next: Cell::new(0),
            deltas,
        }
    }

    /// Every pair costs `overhead` cycles.
    pub fn constant(overhead: u64) -> Self {
        Self::new(vec![overhead])
    }
}

impl CycleCounter for ScriptedCounter {
    fn start(&self) -> u64 {
        self.now.get()
    }

    fn stop(&self) -> u64 {
        let i = self.next.get();
        self.next.set(i + 1);
        let now = self.now.get() + self.deltas[i % self.deltas.len()];
        self.now.set(now);
        now
    }
}

/// Route crate logs to the test harness; safe to call from every test.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cycle_bench=debug")),
        )
        .with_test_writer()
        .try_init();
}
