//! Alert composition and fan-out.
//!
//! An [`AlertMessage`] is built from the live readings at dispatch time,
//! rendered to text, and handed to the [`Notifier`] once per recipient.
//! Nothing is persisted.
//!
//! When the primary uplink is down the dispatcher first raises the
//! failover request and waits out a grace period so the secondary link has
//! time to come up before the message is composed.

use core::fmt;

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, Notifier};
use crate::monitor::Policy;
use crate::state::SharedReadings;

/// Time between raising the failover request and composing the message.
pub const FAILOVER_GRACE_MS: u32 = 15_000;

/// A monitored quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Temperature,
    Humidity,
    Internet,
    Power,
}

impl Channel {
    /// Fixed evaluation order of the monitor.
    pub const ALL: [Channel; 4] = [
        Channel::Temperature,
        Channel::Humidity,
        Channel::Internet,
        Channel::Power,
    ];

    /// Current value of this channel as a number (booleans as 0/1).
    pub fn value(self, readings: &SharedReadings) -> f32 {
        match self {
            Self::Temperature => readings.temperature(),
            Self::Humidity => readings.humidity(),
            Self::Internet => f32::from(u8::from(readings.connected())),
            Self::Power => f32::from(u8::from(readings.power_good())),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temperature => write!(f, "temp"),
            Self::Humidity => write!(f, "humid"),
            Self::Internet => write!(f, "internet"),
            Self::Power => write!(f, "power"),
        }
    }
}

/// Which side of its policy a failing channel is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Low,
    High,
    /// Boolean channel whose flag is false.
    Absent,
}

/// One alert, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertMessage {
    pub channel: Channel,
    pub direction: Direction,
    /// Temperature, humidity, or battery percentage; `None` for the uplink.
    pub current_value: Option<f32>,
    pub location: String,
}

impl AlertMessage {
    /// Build from the live readings.
    ///
    /// A range channel that drifted back inside its band since it was
    /// evaluated keeps the `observed` direction.
    pub fn compose(
        channel: Channel,
        policy: &Policy,
        observed: Direction,
        readings: &SharedReadings,
        location: &str,
    ) -> Self {
        let (direction, current_value) = match channel {
            Channel::Temperature | Channel::Humidity => {
                let value = channel.value(readings);
                let direction = policy.direction(value).unwrap_or(observed);
                (direction, Some(value))
            }
            Channel::Internet => (Direction::Absent, None),
            Channel::Power => (Direction::Absent, Some(f32::from(readings.battery()))),
        };
        Self {
            channel,
            direction,
            current_value,
            location: location.to_string(),
        }
    }

    /// Template identifier, e.g. `temp_hot`.
    pub fn kind(&self) -> &'static str {
        match (self.channel, self.direction) {
            (Channel::Temperature, Direction::Low) => "temp_cold",
            (Channel::Temperature, _) => "temp_hot",
            (Channel::Humidity, Direction::Low) => "humid_low",
            (Channel::Humidity, _) => "humid_high",
            (Channel::Internet, _) => "internet",
            (Channel::Power, _) => "power",
        }
    }

    /// Header plus channel body with the live value substituted.
    pub fn render(&self) -> String {
        let v = self.current_value.unwrap_or_default();
        let body = match self.kind() {
            "temp_hot" => format!("Room temperature is too hot.\nCurrent Temperature: {v:.1} F"),
            "temp_cold" => {
                format!("Room temperature is too cold.\nCurrent Temperature: {v:.1} F")
            }
            "humid_high" => format!("Room humidity is too high.\nCurrent Value: {v:.1} rH"),
            "humid_low" => format!("Room humidity is too low.\nCurrent Value: {v:.1} rH"),
            "internet" => "Internet connection status:\nDisconnected".to_string(),
            _ => format!("External power unavailable.\nServer Monitor UPS Capacity: {v:.0}%"),
        };
        format!("{} SERVER ALERT\n{}", self.location, body)
    }
}

/// Composes alerts and fans them out to every recipient.
pub struct AlertDispatcher<N, D> {
    notifier: N,
    delay: D,
    location: String,
    recipients: Vec<String>,
    grace_ms: u32,
}

impl<N: Notifier, D: DelayNs> AlertDispatcher<N, D> {
    pub fn new(notifier: N, delay: D, location: String, recipients: Vec<String>) -> Self {
        Self {
            notifier,
            delay,
            location,
            recipients,
            grace_ms: FAILOVER_GRACE_MS,
        }
    }

    /// Override the failover grace period.
    pub fn with_grace_ms(mut self, grace_ms: u32) -> Self {
        self.grace_ms = grace_ms;
        self
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Send the alert for `channel`. Returns how many recipients accepted it.
    ///
    /// A failed send is logged and does not stop delivery to the rest.
    pub fn dispatch(
        &mut self,
        channel: Channel,
        policy: &Policy,
        observed: Direction,
        readings: &SharedReadings,
        sink: &mut impl EventSink,
    ) -> usize {
        if !readings.connected() {
            readings.request_failover();
            sink.emit(&AppEvent::FailoverRequested(channel));
            info!(
                "Uplink down, waiting {} ms for failover before sending '{}' alert",
                self.grace_ms, channel
            );
            self.delay.delay_ms(self.grace_ms);
        }

        let message = AlertMessage::compose(channel, policy, observed, readings, &self.location);
        let body = message.render();

        let mut delivered = 0;
        for recipient in &self.recipients {
            match self.notifier.send(recipient, &body) {
                Ok(()) => delivered += 1,
                Err(e) => warn!("Alert '{}' to {} failed: {}", message.kind(), recipient, e),
            }
        }

        sink.emit(&AppEvent::AlertDispatched {
            channel,
            delivered,
            recipients: self.recipients.len(),
        });
        delivered
    }
}
