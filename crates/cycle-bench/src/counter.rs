//! Hardware cycle counters.
//!
//! Reads are serialized so the measured code cannot drift across them:
//! - x86_64: `lfence; rdtsc` to start, `rdtscp; lfence` to stop
//! - aarch64: `isb; mrs cntvct_el0` (virtual timer count, not core cycles)
//! - Fallback: nanoseconds since first use via `std::time::Instant`
//!
//! Counters are per core. Pin the benchmarking thread when comparing runs;
//! nothing here synchronizes counters across cores.

/// A source of start/stop counter readings around a measured region.
pub trait CycleCounter {
    /// Read the counter before the measured region.
    fn start(&self) -> u64;

    /// Read the counter after the measured region.
    fn stop(&self) -> u64;
}

/// The platform's cycle counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct TscCounter;

impl CycleCounter for TscCounter {
    #[inline(always)]
    fn start(&self) -> u64 {
        read_start()
    }

    #[inline(always)]
    fn stop(&self) -> u64 {
        read_stop()
    }
}

#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn read_start() -> u64 {
    use std::sync::atomic::{compiler_fence, Ordering};

    compiler_fence(Ordering::SeqCst);
    let cycles: u64;
    // SAFETY: lfence and rdtsc are available on every x86_64 CPU and only
    // write the named registers.
    unsafe {
        std::arch::asm!(
            "lfence",
            "rdtsc",
            "shl rdx, 32",
            "or rax, rdx",
            out("rax") cycles,
            out("rdx") _,
            options(nostack, nomem),
        );
    }
    compiler_fence(Ordering::SeqCst);
    cycles
}

#[cfg(target_arch = "x86_64")]
#[inline(always)]
fn read_stop() -> u64 {
    use std::sync::atomic::{compiler_fence, Ordering};

    compiler_fence(Ordering::SeqCst);
    let cycles: u64;
    // SAFETY: rdtscp waits for prior instructions to retire; lfence keeps
    // later instructions from starting before the read. Both are x86_64
    // baseline on the CPUs this crate targets.
    unsafe {
        std::arch::asm!(
            "rdtscp",
            "lfence",
            "shl rdx, 32",
            "or rax, rdx",
            out("rax") cycles,
            out("rdx") _,
            out("rcx") _,
            options(nostack, nomem),
        );
    }
    compiler_fence(Ordering::SeqCst);
    cycles
}

#[cfg(target_arch = "aarch64")]
#[inline(always)]
fn read_counter() -> u64 {
    use std::sync::atomic::{compiler_fence, Ordering};

    compiler_fence(Ordering::SeqCst);
    let cycles: u64;
    // SAFETY: CNTVCT_EL0 is readable from EL0 and has no side effects.
    unsafe {
        std::arch::asm!(
            "isb",
            "mrs {}, cntvct_el0",
            out(reg) cycles,
            options(nostack, nomem),
        );
    }
    compiler_fence(Ordering::SeqCst);
    cycles
}

#[cfg(target_arch = "aarch64")]
#[inline(always)]
fn read_start() -> u64 {
    read_counter()
}

#[cfg(target_arch = "aarch64")]
#[inline(always)]
fn read_stop() -> u64 {
    read_counter()
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn read_fallback() -> u64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static START: OnceLock<Instant> = OnceLock::new();
    let start = START.get_or_init(Instant::now);
    start.elapsed().as_nanos() as u64
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline(always)]
fn read_start() -> u64 {
    read_fallback()
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline(always)]
fn read_stop() -> u64 {
    read_fallback()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_advances_over_work() {
        let counter = TscCounter;
        let start = counter.start();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let stop = counter.stop();
        assert!(stop > start);
    }
}
