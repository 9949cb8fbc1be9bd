//! Threshold monitor.
//!
//! Runs every `monitor_interval` seconds and evaluates each channel, in the
//! fixed order temperature → humidity → internet → power, against its
//! policy. A per-channel counter turns sensor noise into deliberate alerts:
//!
//! ## Counter lifecycle
//!
//! 1. Each failing evaluation adds one strike (`0 → 1 → 2 → 3`).
//! 2. The third consecutive strike dispatches the alert and drops the
//!    counter to a negative cooldown value.
//! 3. Further failures count the cooldown back up; the next alert fires
//!    when the counter reaches the strike limit again, which takes exactly
//!    one cooldown window of failing ticks.
//! 4. A passing evaluation resets a positive streak to zero. A negative
//!    (cooldown) counter is left alone: passing does not shorten cooldown.
//!
//! Channels are independent; a power alert never delays an internet alert.

use embedded_hal::delay::DelayNs;
use log::{debug, error, info};

use crate::alert::{AlertDispatcher, Channel, Direction};
use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, Notifier};
use crate::config::SiteConfig;
use crate::state::SharedReadings;

/// Consecutive failing evaluations required before an alert.
pub const STRIKES: i32 = 3;

/// Pass/fail rule of one channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Policy {
    /// Passes while `low <= value <= high`.
    Range { low: f32, high: f32 },
    /// Passes while the flag is set (value non-zero).
    Flag,
}

impl Policy {
    /// `None` when the value passes, otherwise which side it failed on.
    pub fn direction(&self, value: f32) -> Option<Direction> {
        match *self {
            Self::Range { low, high } => {
                if value < low {
                    Some(Direction::Low)
                } else if value > high {
                    Some(Direction::High)
                } else {
                    None
                }
            }
            Self::Flag => (value == 0.0).then_some(Direction::Absent),
        }
    }

    pub fn fails(&self, value: f32) -> bool {
        self.direction(value).is_some()
    }
}

/// Debounce bookkeeping for one channel.
#[derive(Debug, Clone, Copy)]
pub struct ChannelState {
    pub channel: Channel,
    pub policy: Policy,
    /// Strikes so far (positive) or cooldown ticks remaining (negative).
    pub consecutive_failures: i32,
}

/// The threshold monitor.
pub struct ThresholdMonitor {
    channels: [ChannelState; 4],
    /// Counter value written right after an alert fires.
    cooldown_value: i32,
}

impl ThresholdMonitor {
    pub fn new(config: &SiteConfig) -> Self {
        let (t_low, t_high) = config.monitor.temp_range;
        let (h_low, h_high) = config.monitor.humidity_range;
        Self::with_policies(
            Policy::Range {
                low: t_low,
                high: t_high,
            },
            Policy::Range {
                low: h_low,
                high: h_high,
            },
            config.cooldown_ticks(),
        )
    }

    /// Build with explicit range policies and a cooldown measured in ticks.
    pub fn with_policies(temperature: Policy, humidity: Policy, cooldown_ticks: i32) -> Self {
        let state = |channel, policy| ChannelState {
            channel,
            policy,
            consecutive_failures: 0,
        };
        Self {
            channels: [
                state(Channel::Temperature, temperature),
                state(Channel::Humidity, humidity),
                state(Channel::Internet, Policy::Flag),
                state(Channel::Power, Policy::Flag),
            ],
            cooldown_value: STRIKES - cooldown_ticks.max(1),
        }
    }

    /// Run one monitor tick, dispatching every alert that falls due.
    /// Returns the number of alerts dispatched.
    pub fn tick<N: Notifier, D: DelayNs>(
        &mut self,
        readings: &SharedReadings,
        dispatcher: &mut AlertDispatcher<N, D>,
        sink: &mut impl EventSink,
    ) -> usize {
        let mut fired = 0;
        for idx in 0..self.channels.len() {
            if let Some(direction) = self.evaluate_channel(idx, readings, sink) {
                let ChannelState { channel, policy, .. } = self.channels[idx];
                error!("ALERT: {channel} out of bounds ({direction:?}), notifying");
                dispatcher.dispatch(channel, &policy, direction, readings, sink);
                fired += 1;
            }
        }
        fired
    }

    /// Evaluate every channel without dispatching.
    /// Returns the channels whose alert fell due, in evaluation order.
    pub fn evaluate(
        &mut self,
        readings: &SharedReadings,
        sink: &mut impl EventSink,
    ) -> Vec<(Channel, Direction)> {
        (0..self.channels.len())
            .filter_map(|idx| {
                self.evaluate_channel(idx, readings, sink)
                    .map(|d| (self.channels[idx].channel, d))
            })
            .collect()
    }

    /// Current counter of `channel`.
    pub fn failures(&self, channel: Channel) -> i32 {
        self.state(channel).consecutive_failures
    }

    pub fn policy(&self, channel: Channel) -> Policy {
        self.state(channel).policy
    }

    /// Counter value right after an alert.
    pub fn cooldown_value(&self) -> i32 {
        self.cooldown_value
    }

    // ── Internal ──────────────────────────────────────────────────

    fn state(&self, channel: Channel) -> &ChannelState {
        // Every channel is present exactly once.
        let idx = Channel::ALL.iter().position(|c| *c == channel).unwrap_or(0);
        &self.channels[idx]
    }

    fn evaluate_channel(
        &mut self,
        idx: usize,
        readings: &SharedReadings,
        sink: &mut impl EventSink,
    ) -> Option<Direction> {
        let cooldown_value = self.cooldown_value;
        let state = &mut self.channels[idx];
        let value = state.channel.value(readings);

        match state.policy.direction(value) {
            Some(direction) => {
                if state.consecutive_failures < STRIKES {
                    state.consecutive_failures += 1;
                }
                if state.consecutive_failures >= STRIKES {
                    state.consecutive_failures = cooldown_value;
                    return Some(direction);
                }
                debug!(
                    "{} failing ({}), counter {}",
                    state.channel, value, state.consecutive_failures
                );
                if state.consecutive_failures > 0 {
                    sink.emit(&AppEvent::Strike {
                        channel: state.channel,
                        strikes: state.consecutive_failures,
                    });
                }
                None
            }
            None => {
                if state.consecutive_failures > 0 {
                    info!("{} back in bounds, streak cleared", state.channel);
                    state.consecutive_failures = 0;
                    sink.emit(&AppEvent::Recovered(state.channel));
                }
                None
            }
        }
    }
}
