//! Application boundary: port traits and the events the core emits.
//!
//! All interaction with hardware, the network and the SMS gateway happens
//! through the traits in [`ports`], keeping the samplers, monitor and
//! classifier testable without real peripherals.

pub mod events;
pub mod ports;
