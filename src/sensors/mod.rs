//! Samplers, one per physical source, each the sole writer of its fields
//! in [`SharedReadings`](crate::state::SharedReadings).
//!
//! | Sampler               | Source                  | Writes                     |
//! |-----------------------|-------------------------|----------------------------|
//! | [`ClimateSampler`]    | DHT22                   | temperature, humidity      |
//! | [`UplinkSampler`]     | TCP probe + link status | connected                  |
//! | [`PowerSampler`]      | UPS serial line         | power_good, battery        |
//!
//! Each exposes a `sample()` step; the periodic loop around it lives in
//! [`scheduler`](crate::scheduler). A single flaky read must never clobber
//! a good value, so every sampler retains its previous reading when the
//! source produces nothing usable.

pub mod climate;
pub mod uplink;
pub mod ups;

pub use climate::ClimateSampler;
pub use uplink::UplinkSampler;
pub use ups::{PowerSampler, UpsFrame};
