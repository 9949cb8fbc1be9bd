//! Shared readings: the blackboard every task reads from and writes to.
//!
//! Each field is an independent atomic cell with exactly one category of
//! writer:
//!
//! | Field                | Writer                 |
//! |----------------------|------------------------|
//! | temperature/humidity | environment sampler    |
//! | connected            | connectivity sampler   |
//! | power_good/battery   | power sampler          |
//! | screen/display       | button classifier      |
//! | failover_requested   | threshold monitor (set), failover trigger (clear) |
//!
//! No group of fields is read atomically; a reader may observe the
//! temperature of this tick next to the humidity of the previous one.
//! Nothing downstream depends on cross-field consistency.

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};

/// Temperature written before the first real reading (°F).
pub const DEFAULT_TEMPERATURE_F: f32 = 65.0;
/// Humidity written before the first real reading (%RH).
pub const DEFAULT_HUMIDITY_RH: f32 = 50.0;

/// `f32` stored as its bit pattern in an `AtomicU32`.
#[derive(Debug)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Acquire))
    }

    pub fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Release);
    }
}

/// The screens a short press cycles through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Screen {
    /// Temperature and humidity.
    Climate = 0,
    /// Internet reachability.
    Internet = 1,
    /// External power and UPS battery.
    Power = 2,
}

impl Screen {
    pub const ALL: [Screen; 3] = [Screen::Climate, Screen::Internet, Screen::Power];

    /// Next screen in the cycle, wrapping from the last to the first.
    pub fn next(self) -> Self {
        Self::ALL[(self as usize + 1) % Self::ALL.len()]
    }

    fn from_index(index: u8) -> Self {
        Self::ALL
            .get(index as usize)
            .copied()
            .unwrap_or(Screen::Climate)
    }
}

/// Current value of every monitored quantity plus the UI state.
#[derive(Debug)]
pub struct SharedReadings {
    temperature_f: AtomicF32,
    humidity_rh: AtomicF32,
    battery_percent: AtomicU8,
    connected: AtomicBool,
    power_good: AtomicBool,
    screen: AtomicU8,
    display_enabled: AtomicBool,
    failover_requested: AtomicBool,
}

impl Default for SharedReadings {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedReadings {
    /// Safe defaults: nothing is out of bounds until a sampler says so.
    pub fn new() -> Self {
        Self {
            temperature_f: AtomicF32::new(DEFAULT_TEMPERATURE_F),
            humidity_rh: AtomicF32::new(DEFAULT_HUMIDITY_RH),
            battery_percent: AtomicU8::new(100),
            connected: AtomicBool::new(true),
            power_good: AtomicBool::new(true),
            screen: AtomicU8::new(Screen::Climate as u8),
            display_enabled: AtomicBool::new(true),
            failover_requested: AtomicBool::new(false),
        }
    }

    // ── Climate ───────────────────────────────────────────────

    pub fn temperature(&self) -> f32 {
        self.temperature_f.load()
    }

    pub fn set_temperature(&self, fahrenheit: f32) {
        self.temperature_f.store(fahrenheit);
    }

    pub fn humidity(&self) -> f32 {
        self.humidity_rh.load()
    }

    pub fn set_humidity(&self, rh: f32) {
        self.humidity_rh.store(rh);
    }

    // ── Power ─────────────────────────────────────────────────

    pub fn battery(&self) -> u8 {
        self.battery_percent.load(Ordering::Acquire)
    }

    /// Clamped to 0–100.
    pub fn set_battery(&self, percent: u8) {
        self.battery_percent
            .store(percent.min(100), Ordering::Release);
    }

    pub fn power_good(&self) -> bool {
        self.power_good.load(Ordering::Acquire)
    }

    pub fn set_power_good(&self, good: bool) {
        self.power_good.store(good, Ordering::Release);
    }

    // ── Uplink ────────────────────────────────────────────────

    pub fn connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
    }

    pub fn failover_requested(&self) -> bool {
        self.failover_requested.load(Ordering::Acquire)
    }

    pub fn request_failover(&self) {
        self.failover_requested.store(true, Ordering::Release);
    }

    pub fn clear_failover_request(&self) {
        self.failover_requested.store(false, Ordering::Release);
    }

    // ── Display ───────────────────────────────────────────────

    pub fn screen(&self) -> Screen {
        Screen::from_index(self.screen.load(Ordering::Acquire))
    }

    pub fn set_screen(&self, screen: Screen) {
        self.screen.store(screen as u8, Ordering::Release);
    }

    pub fn display_enabled(&self) -> bool {
        self.display_enabled.load(Ordering::Acquire)
    }

    pub fn set_display_enabled(&self, enabled: bool) {
        self.display_enabled.store(enabled, Ordering::Release);
    }
}
