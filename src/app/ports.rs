//! Port traits: the boundary between the monitoring core and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ samplers / monitor / display / failover
//! ```
//!
//! Driven adapters (sensor drivers, serial port, SMS gateway, dial-up link)
//! implement these traits. The core consumes them via generics, so nothing
//! in the core touches a device node or spawns a process directly.
//! The button is the exception: it is consumed through
//! [`embedded_hal::digital::InputPin`], which already is the right port.

use crate::display::ScreenLines;
use crate::error::{LinkError, NotifyError, SensorError, SerialError};

// ───────────────────────────────────────────────────────────────
// Climate sensor (hardware → core)
// ───────────────────────────────────────────────────────────────

/// Temperature/humidity source.
///
/// `Ok(None)` means "no new reading this time"; the sampler keeps the last
/// value it saw. Errors are split by [`SensorError::is_transient`].
pub trait ClimateSensor {
    /// Degrees Fahrenheit.
    fn read_temperature(&mut self) -> Result<Option<f32>, SensorError>;

    /// Relative humidity, percent.
    fn read_humidity(&mut self) -> Result<Option<f32>, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// UPS serial line (hardware → core)
// ───────────────────────────────────────────────────────────────

/// Line-oriented status source of the UPS.
pub trait UpsLine {
    /// Block until one line arrives or the port's read timeout expires.
    fn read_line(&mut self) -> Result<String, SerialError>;
}

// ───────────────────────────────────────────────────────────────
// Uplink (network → core)
// ───────────────────────────────────────────────────────────────

/// Bounded-time reachability test of the primary uplink.
pub trait ReachabilityProbe {
    /// True if the configured host answered before the timeout.
    fn is_reachable(&mut self) -> bool;
}

/// Reports whether the failover link currently exists.
pub trait LinkStatus {
    fn failover_active(&self) -> bool;
}

/// Secondary network path brought up on demand for alert delivery.
pub trait FailoverLink: LinkStatus {
    /// Start dialing. Returns once the dial has been launched.
    fn bring_up(&mut self) -> Result<(), LinkError>;

    /// Hang up.
    fn tear_down(&mut self) -> Result<(), LinkError>;
}

// ───────────────────────────────────────────────────────────────
// Display (core → hardware)
// ───────────────────────────────────────────────────────────────

/// Two-line character display.
pub trait DisplayPort {
    fn render(&mut self, lines: &ScreenLines) -> crate::error::Result<()>;

    fn clear(&mut self) -> crate::error::Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Alert transport (core → SMS gateway)
// ───────────────────────────────────────────────────────────────

/// Delivers one alert body to one recipient.
///
/// Two implementations ship: a console notifier used in debug mode and a
/// live gateway notifier. The choice is made once, at construction.
pub trait Notifier {
    fn send(&mut self, recipient: &str, body: &str) -> Result<(), NotifyError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink (core → logging)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
