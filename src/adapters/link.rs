//! Cellular failover link adapters.
//!
//! The dial-up is a ppp peer managed by the standard `pon` / `poff`
//! scripts. The link counts as up while its network interface exists.

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use log::{info, warn};

use crate::app::ports::{FailoverLink, LinkStatus};
use crate::error::LinkError;

/// Link status from `/sys/class/net/<iface>`.
#[derive(Debug, Clone)]
pub struct InterfaceLinkStatus {
    path: PathBuf,
}

impl InterfaceLinkStatus {
    pub fn new(interface: &str) -> Self {
        Self::with_root("/sys/class/net", interface)
    }

    /// Resolve the interface under a different sysfs root.
    pub fn with_root(root: impl Into<PathBuf>, interface: &str) -> Self {
        Self {
            path: root.into().join(interface),
        }
    }
}

impl LinkStatus for InterfaceLinkStatus {
    fn failover_active(&self) -> bool {
        self.path.exists()
    }
}

/// Dials with `pon`, hangs up with `poff`.
pub struct PonLink {
    status: InterfaceLinkStatus,
    dialer: Option<Child>,
}

impl PonLink {
    pub fn new(status: InterfaceLinkStatus) -> Self {
        Self {
            status,
            dialer: None,
        }
    }
}

impl LinkStatus for PonLink {
    fn failover_active(&self) -> bool {
        self.status.failover_active()
    }
}

impl FailoverLink for PonLink {
    fn bring_up(&mut self) -> Result<(), LinkError> {
        let child = Command::new("pon")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|_| LinkError::SpawnFailed)?;
        info!("pon started (pid {})", child.id());
        self.dialer = Some(child);
        Ok(())
    }

    fn tear_down(&mut self) -> Result<(), LinkError> {
        let status = Command::new("poff")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        if let Some(mut child) = self.dialer.take() {
            if let Err(e) = child.kill() {
                warn!("pon already exited: {e}");
            }
            let _ = child.wait();
        }
        match status {
            Ok(s) if s.success() => Ok(()),
            _ => Err(LinkError::TeardownFailed),
        }
    }
}

/// Debug-mode link: logs instead of dialing.
#[derive(Debug, Default)]
pub struct SimulatedLink {
    up: bool,
    dials: u32,
}

impl SimulatedLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dials(&self) -> u32 {
        self.dials
    }
}

impl LinkStatus for SimulatedLink {
    fn failover_active(&self) -> bool {
        self.up
    }
}

impl FailoverLink for SimulatedLink {
    fn bring_up(&mut self) -> Result<(), LinkError> {
        info!("Starting failover link (simulated)...");
        self.up = true;
        self.dials += 1;
        Ok(())
    }

    fn tear_down(&mut self) -> Result<(), LinkError> {
        info!("Ending failover link (simulated)...");
        self.up = false;
        Ok(())
    }
}
