//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each application event as one
//! tagged log line. Every task owns its own (zero-sized) sink.

use log::{info, warn};

use crate::alert::Channel;
use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::monitor::STRIKES;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn strike_line(channel: Channel, strikes: i32) -> String {
    format!("STRIKE | {} | {}/{}", channel, strikes, STRIKES)
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Strike { channel, strikes } => {
                info!("{}", strike_line(*channel, *strikes));
            }
            AppEvent::Recovered(channel) => {
                info!("RECOVER | {}", channel);
            }
            AppEvent::AlertDispatched {
                channel,
                delivered,
                recipients,
            } => {
                if delivered == recipients {
                    info!("ALERT | {} | delivered {}/{}", channel, delivered, recipients);
                } else {
                    warn!("ALERT | {} | delivered {}/{}", channel, delivered, recipients);
                }
            }
            AppEvent::FailoverRequested(channel) => {
                info!("FAILOVER | requested for {} alert", channel);
            }
            AppEvent::FailoverStarted => {
                info!("FAILOVER | link up");
            }
            AppEvent::FailoverEnded { dialed } => {
                info!("FAILOVER | request cleared (dialed={})", dialed);
            }
            AppEvent::ScreenChanged(screen) => {
                info!("BUTTON | screen -> {:?}", screen);
            }
            AppEvent::DisplayToggled { enabled } => {
                info!("BUTTON | display {}", if *enabled { "on" } else { "off" });
            }
        }
    }
}
