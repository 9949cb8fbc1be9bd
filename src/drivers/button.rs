//! Front-panel button gesture classifier.
//!
//! ## Hardware
//!
//! Momentary switch on a GPIO read through [`InputPin`]. The pin is polled
//! every [`POLL_MS`]; the classifier only ever sees discrete samples, so
//! tests drive it with synthetic timestamps instead of wall-clock spinning.
//!
//! ## Gesture detection
//!
//! | Gesture    | Condition                          | Effect               | Settle |
//! |------------|------------------------------------|----------------------|--------|
//! | Short press| Released with 0 < held < 3 s       | Next screen (wraps)  | 500 ms |
//! | Long hold  | Still pressed at held >= 3 s       | Toggle display       | 1 s    |
//!
//! A long hold fires while the button is still down and then waits for the
//! release, so one hold toggles the display exactly once. A press shorter
//! than one sample interval is never seen and produces nothing.

use embedded_hal::digital::InputPin;
use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::state::SharedReadings;

/// Sampling period of the button loop.
pub const POLL_MS: u64 = 20;
/// Hold time that turns a press into a display toggle.
pub const HOLD_MS: u64 = 3000;
/// Dead time after a short press.
const SHORT_SETTLE_MS: u64 = 500;
/// Dead time after a long hold.
const HOLD_SETTLE_MS: u64 = 1000;

/// Classified gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    ShortPress,
    LongHold,
}

/// Internal state machine for gesture detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureState {
    Idle,
    Pressed { since_ms: u64 },
    /// Ignoring input until the deadline passes.
    Settling { until_ms: u64, after_hold: bool },
    /// Long hold already fired; waiting for the release.
    AwaitRelease,
}

pub struct ButtonClassifier {
    state: GestureState,
}

impl Default for ButtonClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonClassifier {
    pub fn new() -> Self {
        Self {
            state: GestureState::Idle,
        }
    }

    /// Feed one sample. `now_ms` is monotonic milliseconds, `pressed` the
    /// debounced-by-polling input level. Returns a gesture, if one completed.
    pub fn tick(&mut self, now_ms: u64, pressed: bool) -> Option<ButtonEvent> {
        match self.state {
            GestureState::Idle => {
                if pressed {
                    self.state = GestureState::Pressed { since_ms: now_ms };
                }
                None
            }

            GestureState::Pressed { since_ms } => {
                let held_ms = now_ms.saturating_sub(since_ms);

                if pressed {
                    if held_ms >= HOLD_MS {
                        self.state = GestureState::Settling {
                            until_ms: now_ms + HOLD_SETTLE_MS,
                            after_hold: true,
                        };
                        return Some(ButtonEvent::LongHold);
                    }
                    return None;
                }

                if held_ms == 0 {
                    self.state = GestureState::Idle;
                    return None;
                }
                self.state = GestureState::Settling {
                    until_ms: now_ms + SHORT_SETTLE_MS,
                    after_hold: false,
                };
                Some(ButtonEvent::ShortPress)
            }

            GestureState::Settling {
                until_ms,
                after_hold,
            } => {
                if now_ms >= until_ms {
                    self.state = match (pressed, after_hold) {
                        (false, _) => GestureState::Idle,
                        (true, true) => GestureState::AwaitRelease,
                        (true, false) => GestureState::Pressed { since_ms: now_ms },
                    };
                }
                None
            }

            GestureState::AwaitRelease => {
                if !pressed {
                    self.state = GestureState::Idle;
                }
                None
            }
        }
    }
}

/// Apply a gesture to the display state it owns.
pub fn apply(event: ButtonEvent, readings: &SharedReadings, sink: &mut impl EventSink) {
    match event {
        ButtonEvent::ShortPress => {
            let screen = readings.screen().next();
            readings.set_screen(screen);
            info!("Button: short press, screen = {:?}", screen);
            sink.emit(&AppEvent::ScreenChanged(screen));
        }
        ButtonEvent::LongHold => {
            let enabled = !readings.display_enabled();
            readings.set_display_enabled(enabled);
            info!("Button: long hold, display {}", if enabled { "on" } else { "off" });
            sink.emit(&AppEvent::DisplayToggled { enabled });
        }
    }
}

/// Couples a GPIO pin to the classifier.
pub struct ButtonDriver<P> {
    pin: P,
    active_low: bool,
    classifier: ButtonClassifier,
}

impl<P: InputPin> ButtonDriver<P> {
    pub fn new(pin: P, active_low: bool) -> Self {
        Self {
            pin,
            active_low,
            classifier: ButtonClassifier::new(),
        }
    }

    /// Sample the pin once and apply any completed gesture.
    pub fn poll(
        &mut self,
        now_ms: u64,
        readings: &SharedReadings,
        sink: &mut impl EventSink,
    ) -> Option<ButtonEvent> {
        let level = match self.pin.is_high() {
            Ok(level) => level,
            Err(e) => {
                warn!("Button: GPIO read failed: {e:?}");
                return None;
            }
        };
        let pressed = level != self.active_low;
        let event = self.classifier.tick(now_ms, pressed)?;
        apply(event, readings, sink);
        Some(event)
    }
}
