//! Mock adapters for integration tests.
//!
//! Every port the core talks to has a recording stand-in here so tests can
//! assert on the full history without devices, processes, or sleeping.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use sitewatch::app::events::AppEvent;
use sitewatch::app::ports::{
    ClimateSensor, EventSink, FailoverLink, LinkStatus, Notifier, ReachabilityProbe, UpsLine,
};
use sitewatch::error::{LinkError, NotifyError, SensorError, SerialError};
use sitewatch::state::SharedReadings;

// ── Notifier ──────────────────────────────────────────────────

/// Records every message; recipients listed in `failing` are rejected.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Vec<(String, String)>,
    pub failing: Vec<String>,
    /// Failover flag as seen at each send, when a store is attached.
    pub failover_at_send: Vec<bool>,
    readings: Option<Rc<SharedReadings>>,
}

#[allow(dead_code)]
impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(recipient: &str) -> Self {
        Self {
            failing: vec![recipient.to_string()],
            ..Self::default()
        }
    }

    /// Snapshot the failover flag on every send.
    pub fn observing(readings: Rc<SharedReadings>) -> Self {
        Self {
            readings: Some(readings),
            ..Self::default()
        }
    }

    pub fn bodies(&self) -> Vec<&str> {
        self.sent.iter().map(|(_, b)| b.as_str()).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn send(&mut self, recipient: &str, body: &str) -> Result<(), NotifyError> {
        if let Some(r) = &self.readings {
            self.failover_at_send.push(r.failover_requested());
        }
        if self.failing.iter().any(|f| f == recipient) {
            return Err(NotifyError::Unreachable);
        }
        self.sent.push((recipient.to_string(), body.to_string()));
        Ok(())
    }
}

// ── Delay ─────────────────────────────────────────────────────

/// Records requested delays instead of sleeping.
#[derive(Clone, Default)]
pub struct RecordingDelay {
    pub total_ns: Rc<RefCell<u64>>,
}

#[allow(dead_code)]
impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_ms(&self) -> u64 {
        *self.total_ns.borrow() / 1_000_000
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.total_ns.borrow_mut() += u64::from(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        *self.total_ns.borrow_mut() += u64::from(ms) * 1_000_000;
    }
}

// ── Failover link ─────────────────────────────────────────────

#[derive(Default)]
pub struct MockLink {
    pub up: bool,
    pub bring_ups: u32,
    pub tear_downs: u32,
    pub fail_bring_up: bool,
}

#[allow(dead_code)]
impl MockLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn already_up() -> Self {
        Self {
            up: true,
            ..Self::default()
        }
    }

    pub fn broken() -> Self {
        Self {
            fail_bring_up: true,
            ..Self::default()
        }
    }
}

impl LinkStatus for MockLink {
    fn failover_active(&self) -> bool {
        self.up
    }
}

impl FailoverLink for MockLink {
    fn bring_up(&mut self) -> Result<(), LinkError> {
        self.bring_ups += 1;
        if self.fail_bring_up {
            return Err(LinkError::SpawnFailed);
        }
        self.up = true;
        Ok(())
    }

    fn tear_down(&mut self) -> Result<(), LinkError> {
        self.tear_downs += 1;
        self.up = false;
        Ok(())
    }
}

// ── Sensors ───────────────────────────────────────────────────

/// Plays back scripted temperature/humidity results, then `Ok(None)`.
#[derive(Default)]
pub struct ScriptedClimate {
    pub temperatures: VecDeque<Result<Option<f32>, SensorError>>,
    pub humidities: VecDeque<Result<Option<f32>, SensorError>>,
}

#[allow(dead_code)]
impl ScriptedClimate {
    pub fn temperatures(values: impl IntoIterator<Item = Result<Option<f32>, SensorError>>) -> Self {
        Self {
            temperatures: values.into_iter().collect(),
            humidities: VecDeque::new(),
        }
    }
}

impl ClimateSensor for ScriptedClimate {
    fn read_temperature(&mut self) -> Result<Option<f32>, SensorError> {
        self.temperatures.pop_front().unwrap_or(Ok(None))
    }

    fn read_humidity(&mut self) -> Result<Option<f32>, SensorError> {
        self.humidities.pop_front().unwrap_or(Ok(None))
    }
}

/// Plays back scripted UPS lines, then times out.
#[derive(Default)]
pub struct ScriptedUps {
    pub lines: VecDeque<Result<String, SerialError>>,
}

#[allow(dead_code)]
impl ScriptedUps {
    pub fn lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            lines: lines.into_iter().map(|l| Ok(l.to_string())).collect(),
        }
    }
}

impl UpsLine for ScriptedUps {
    fn read_line(&mut self) -> Result<String, SerialError> {
        self.lines.pop_front().unwrap_or(Err(SerialError::Timeout))
    }
}

/// Probe with a fixed answer that counts its calls.
pub struct FixedProbe {
    pub reachable: bool,
    pub calls: u32,
}

#[allow(dead_code)]
impl FixedProbe {
    pub fn new(reachable: bool) -> Self {
        Self {
            reachable,
            calls: 0,
        }
    }
}

impl ReachabilityProbe for FixedProbe {
    fn is_reachable(&mut self) -> bool {
        self.calls += 1;
        self.reachable
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
