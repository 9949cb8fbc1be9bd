//! Failover trigger.
//!
//! Watches the failover-request flag raised by the alert dispatcher. When
//! it is set and the secondary link is not already up, the link is dialed,
//! held open for [`HOLD_MS`] (long enough for one alert burst), then hung
//! up. The flag is cleared at the end of every handled request, whether
//! or not the link was actually dialed, so a request can never retrigger
//! itself.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, FailoverLink};
use crate::state::SharedReadings;

/// How long the link stays up per request.
pub const HOLD_MS: u32 = 60_000;
/// Flag polling period of the trigger loop.
pub const POLL_MS: u32 = 1_000;

pub struct FailoverTrigger<L, D> {
    link: L,
    delay: D,
    hold_ms: u32,
}

impl<L: FailoverLink, D: DelayNs> FailoverTrigger<L, D> {
    pub fn new(link: L, delay: D) -> Self {
        Self {
            link,
            delay,
            hold_ms: HOLD_MS,
        }
    }

    /// Override the hold window.
    pub fn with_hold_ms(mut self, hold_ms: u32) -> Self {
        self.hold_ms = hold_ms;
        self
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    /// Handle a pending request, if any. Returns `true` if one was handled.
    ///
    /// Blocks for the hold window when the link is dialed.
    pub fn poll(&mut self, readings: &SharedReadings, sink: &mut impl EventSink) -> bool {
        if !readings.failover_requested() {
            return false;
        }

        let mut dialed = false;
        if self.link.failover_active() {
            info!("Failover: link already up, nothing to do");
        } else {
            match self.link.bring_up() {
                Ok(()) => {
                    dialed = true;
                    info!("Failover: link started, holding {} ms", self.hold_ms);
                    sink.emit(&AppEvent::FailoverStarted);
                    self.delay.delay_ms(self.hold_ms);
                    if let Err(e) = self.link.tear_down() {
                        warn!("Failover: {e}");
                    }
                    info!("Failover: link stopped");
                }
                Err(e) => warn!("Failover: {e}"),
            }
        }

        readings.clear_failover_request();
        sink.emit(&AppEvent::FailoverEnded { dialed });
        true
    }
}
