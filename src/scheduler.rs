//! Task runtime.
//!
//! Every sampler, the monitor, the display and the failover trigger run as
//! their own named OS thread executing a sleep-then-act loop at a fixed
//! period. There is no shared scheduler and no task waits on another; they
//! meet only in [`SharedReadings`](crate::state::SharedReadings).
//!
//! ```text
//!  climate ─┐                        ┌─ display
//!  uplink  ─┼──▶ SharedReadings ◀────┼─ monitor ──▶ notifier
//!  power   ─┤                        │     │
//!  button  ─┘                        │     ▼ failover_requested
//!                                    └─ failover ──▶ dial-up link
//! ```
//!
//! Shutdown is cooperative: sleeps are sliced so the [`Shutdown`] flag is
//! noticed quickly. The main thread joins the display task (which clears
//! the panel) and the failover task (which hangs up a dialed link) before
//! exiting; the sampler and monitor threads are not joined.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;
use log::{error, info};

/// Longest uninterrupted sleep inside a periodic loop.
const SLEEP_SLICE: Duration = Duration::from_millis(250);

/// Process-wide stop flag.
#[derive(Debug, Clone, Default)]
pub struct Shutdown(Arc<AtomicBool>);

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Sleep for `period`, returning early (with `false`) on shutdown.
    pub fn sleep(&self, period: Duration) -> bool {
        let deadline = Instant::now() + period;
        loop {
            if self.is_triggered() {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            std::thread::sleep((deadline - now).min(SLEEP_SLICE));
        }
    }

    /// A [`DelayNs`] that ends early once shutdown is triggered.
    pub fn delay(&self) -> ShutdownDelay {
        ShutdownDelay(self.clone())
    }
}

/// Blocking delay cut short by [`Shutdown`].
#[derive(Debug, Clone)]
pub struct ShutdownDelay(Shutdown);

impl DelayNs for ShutdownDelay {
    fn delay_ns(&mut self, ns: u32) {
        let _ = self.0.sleep(Duration::from_nanos(ns.into()));
    }

    fn delay_ms(&mut self, ms: u32) {
        let _ = self.0.sleep(Duration::from_millis(ms.into()));
    }
}

/// Blocking delay backed by `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(ns.into()));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms.into()));
    }
}

/// Milliseconds since the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock(Instant);

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self(Instant::now())
    }

    pub fn now_ms(&self) -> u64 {
        self.0.elapsed().as_millis() as u64
    }
}

/// Spawn a named thread.
///
/// Thread creation only fails when the OS is out of resources, in which
/// case the monitor cannot run at all.
pub fn spawn_task(
    name: &'static str,
    stack_kb: usize,
    f: impl FnOnce() + Send + 'static,
) -> std::io::Result<JoinHandle<()>> {
    info!("Spawning '{}' (stack={}KB)", name, stack_kb);
    std::thread::Builder::new()
        .name(name.into())
        .stack_size(stack_kb * 1024)
        .spawn(f)
}

/// Run `step` every `period` until shutdown or until `step` fails.
///
/// A failing step is fatal for this task only: it is logged and the loop
/// ends, while every other task keeps running on the last values this one
/// published.
pub fn run_periodic<E: core::fmt::Display>(
    name: &str,
    period: Duration,
    shutdown: &Shutdown,
    mut step: impl FnMut() -> Result<(), E>,
) {
    info!("Task '{}' running every {:?}", name, period);
    while !shutdown.is_triggered() {
        if let Err(e) = step() {
            error!("Task '{}' stopped: {}", name, e);
            return;
        }
        if !shutdown.sleep(period) {
            break;
        }
    }
    info!("Task '{}' exiting", name);
}
