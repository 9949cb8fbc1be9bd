//! Primary-uplink sampler.
//!
//! While the failover link is up the probe is skipped entirely: the dial-up
//! route would make the probe succeed and flap the flag back to "connected"
//! for the duration of the failover window.

use log::{debug, info, warn};

use crate::app::ports::{LinkStatus, ReachabilityProbe};
use crate::state::SharedReadings;

pub struct UplinkSampler<P, L> {
    probe: P,
    link: L,
}

impl<P: ReachabilityProbe, L: LinkStatus> UplinkSampler<P, L> {
    pub fn new(probe: P, link: L) -> Self {
        Self { probe, link }
    }

    /// Probe once and publish the result. Returns `None` when skipped.
    pub fn sample(&mut self, readings: &SharedReadings) -> Option<bool> {
        if self.link.failover_active() {
            debug!("Uplink: failover link active, probe skipped");
            return None;
        }

        let reachable = self.probe.is_reachable();
        let was = readings.connected();
        if was && !reachable {
            warn!("Uplink: probe failed, marking disconnected");
        } else if !was && reachable {
            info!("Uplink: probe succeeded, connection restored");
        }
        readings.set_connected(reachable);
        Some(reachable)
    }
}
