//! # Headset Discovery Service
//!
//! Implements the `connect` use case: find the headset somewhere on the team
//! subnet and leave the transport daemon with a live session to it.
//!
//! The service orchestrates three collaborators:
//! 1. the subnet resolver, turning a team number into `10.TE.AM.0/24`;
//! 2. a [`NetworkScanner`] sweeping that range for responsive hosts;
//! 3. a [`DebugBridge`] probing each candidate until one verifies.
//!
//! The first candidate that verifies wins. A single headset is expected on the
//! subnet, so candidates are not ranked.

use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::sync::Arc;

use hmdlink_common::config::Config;
use hmdlink_common::error::{HmdError, Result};
use hmdlink_common::network::address::NetworkAddress;
use hmdlink_common::network::identifier::DeviceIdentifier;
use hmdlink_common::network::subnet::{self, Subnet};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::scanner::NetworkScanner;
use crate::transport::{self, DebugBridge, SessionState};

/// How a candidate answered the connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Verified,
    /// Listed, but the headset has not accepted this computer's key yet.
    Unauthorized,
    Rejected,
}

/// Called before each probe with `(index, total, candidate)`.
pub type ProbeCallback = Box<dyn Fn(usize, usize, Ipv4Addr) + Send + Sync>;

pub struct DiscoveryService<'a> {
    bridge: Arc<dyn DebugBridge>,
    scanner: Box<dyn NetworkScanner>,
    cfg: &'a Config,
    on_probe: Option<ProbeCallback>,
}

impl<'a> DiscoveryService<'a> {
    pub fn new(bridge: Arc<dyn DebugBridge>, scanner: Box<dyn NetworkScanner>, cfg: &'a Config) -> Self {
        Self {
            bridge,
            scanner,
            cfg,
            on_probe: None,
        }
    }

    pub fn with_progress(mut self, on_probe: ProbeCallback) -> Self {
        self.on_probe = Some(on_probe);
        self
    }

    /// Resolves the team subnet and searches it.
    pub async fn discover(&self, id: &DeviceIdentifier) -> Result<NetworkAddress> {
        let subnet = subnet::resolve(id)?;
        self.ensure_tools().await?;
        self.search(subnet).await
    }

    /// Searches an explicitly given subnet.
    pub async fn discover_in(&self, subnet: Subnet) -> Result<NetworkAddress> {
        self.ensure_tools().await?;
        self.search(subnet).await
    }

    async fn ensure_tools(&self) -> Result<()> {
        self.bridge.ensure_available().await?;
        self.scanner.ensure_available().await
    }

    async fn search(&self, subnet: Subnet) -> Result<NetworkAddress> {
        // Drop whatever sessions a previous run (or an interrupted one) left behind.
        info!("Restarting the adb server");
        self.bridge.kill_server().await?;
        self.bridge.start_server().await?;

        let range = subnet.network();
        info!("Scanning {range} for responsive hosts");
        let scanned = self.scanner.scan(range, &subnet.reserved()).await?;
        let candidates = filter_candidates(&subnet, scanned);
        info!("{} candidate(s) found", candidates.len());

        let mut unauthorized = None;
        for (idx, ip) in candidates.iter().copied().enumerate() {
            if let Some(on_probe) = &self.on_probe {
                on_probe(idx, candidates.len(), ip);
            }

            let addr = NetworkAddress::new(ip, self.cfg.port);
            match self.probe(addr).await {
                Verdict::Verified => return Ok(addr),
                Verdict::Unauthorized => {
                    unauthorized.get_or_insert(addr);
                }
                Verdict::Rejected => {}
            }
        }

        Err(HmdError::DiscoveryNotFound {
            subnet,
            probed: candidates.len(),
            unauthorized,
        })
    }

    /// Connects to `addr` and checks how the daemon lists it. Backs the session
    /// out again if it does not verify.
    async fn probe(&self, addr: NetworkAddress) -> Verdict {
        match timeout(self.cfg.connect_timeout, self.bridge.connect(addr)).await {
            Ok(Ok(())) => debug!("{addr}: connect accepted"),
            Ok(Err(e)) => debug!("{addr}: {e}"),
            Err(_) => debug!("{addr}: connect timed out"),
        }

        let verdict = match transport::list_sessions(self.bridge.as_ref(), self.cfg.verify_timeout).await {
            Ok(sessions) => judge(&sessions, addr),
            Err(e) => {
                debug!("{addr}: could not verify: {e}");
                Verdict::Rejected
            }
        };

        match verdict {
            Verdict::Verified => {
                info!("{addr} answered as a debug target");
                return verdict;
            }
            Verdict::Unauthorized => warn!("{addr} is waiting for the debugging prompt to be accepted"),
            Verdict::Rejected => {}
        }

        if let Err(e) = self.bridge.disconnect(addr).await {
            debug!("{addr}: disconnect failed: {e}");
        }
        verdict
    }
}

fn judge(sessions: &[transport::Session], addr: NetworkAddress) -> Verdict {
    let listed = sessions.iter().find(|session| session.address() == Some(addr));
    match listed.map(|session| &session.state) {
        Some(SessionState::Device) => Verdict::Verified,
        Some(SessionState::Unauthorized) => Verdict::Unauthorized,
        _ => Verdict::Rejected,
    }
}

/// Keeps scan order while dropping reserved hosts, hosts outside the subnet
/// and repeats, so no address is probed twice.
fn filter_candidates(subnet: &Subnet, scanned: Vec<Ipv4Addr>) -> Vec<Ipv4Addr> {
    let mut seen: HashSet<Ipv4Addr> = HashSet::new();
    scanned
        .into_iter()
        .filter(|ip| subnet.contains(*ip) && !subnet.is_reserved(*ip))
        .filter(|ip| seen.insert(*ip))
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
