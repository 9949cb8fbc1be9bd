//! TCP reachability probe.

use std::net::{IpAddr, SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use crate::app::ports::ReachabilityProbe;

/// Budget for one probe, name resolution included.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Succeeds if a TCP connection to `host:port` opens in time.
///
/// An IP literal skips name resolution. A hostname is resolved on a helper
/// thread so a stalled resolver cannot hold the probe past its budget.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: PROBE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl TcpProbe {
    fn resolve(&self, deadline: Instant) -> Option<Vec<SocketAddr>> {
        if let Ok(ip) = self.host.parse::<IpAddr>() {
            return Some(vec![SocketAddr::new(ip, self.port)]);
        }
        let (tx, rx) = mpsc::channel();
        let target = (self.host.clone(), self.port);
        thread::Builder::new()
            .name("probe-dns".into())
            .spawn(move || {
                let resolved = target.to_socket_addrs().map(|a| a.collect::<Vec<_>>());
                let _ = tx.send(resolved);
            })
            .ok()?;
        match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            Ok(Ok(addrs)) => Some(addrs),
            Ok(Err(e)) => {
                debug!("Probe: cannot resolve {}: {}", self.host, e);
                None
            }
            Err(_) => {
                debug!("Probe: resolving {} timed out", self.host);
                None
            }
        }
    }
}

impl ReachabilityProbe for TcpProbe {
    fn is_reachable(&mut self) -> bool {
        let deadline = Instant::now() + self.timeout;
        let Some(addrs) = self.resolve(deadline) else {
            return false;
        };
        for addr in addrs {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                debug!("Probe: {} budget spent", self.host);
                break;
            }
            match TcpStream::connect_timeout(&addr, remaining) {
                Ok(_stream) => return true,
                Err(e) => debug!("Probe: {} unreachable: {}", addr, e),
            }
        }
        false
    }
}
