//! Outbound application events.
//!
//! The samplers, monitor, button classifier and failover trigger emit these
//! through the [`EventSink`](super::ports::EventSink) port. The shipped
//! adapter writes them to the log.

use crate::alert::Channel;
use crate::state::Screen;

/// Structured events emitted by the core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A channel failed an evaluation but has not reached the strike limit.
    Strike { channel: Channel, strikes: i32 },

    /// A channel failing streak ended before an alert went out.
    Recovered(Channel),

    /// An alert was composed and handed to the notifier.
    AlertDispatched {
        channel: Channel,
        delivered: usize,
        recipients: usize,
    },

    /// Alert composition is waiting for the failover link.
    FailoverRequested(Channel),

    /// The failover link was dialed.
    FailoverStarted,

    /// The failover window closed and the request flag was cleared.
    FailoverEnded { dialed: bool },

    /// A short press advanced the screen.
    ScreenChanged(Screen),

    /// A long hold toggled the display.
    DisplayToggled { enabled: bool },
}
