//! In-memory stand-ins for `adb` and `nmap`.
//!
//! [`FakeBridge`] keeps a session list the same way the real daemon does:
//! `connect` to a reachable headset adds it, restarting the app can drop it,
//! and `devices` reports whatever is currently listed.

use std::collections::{BTreeMap, BTreeSet};
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use hmdlink_common::config::Config;
use hmdlink_common::error::{HmdError, Result};
use hmdlink_common::network::address::NetworkAddress;
use hmdlink_core::scanner::NetworkScanner;
use hmdlink_core::transport::{DebugBridge, Session, SessionState};
use pnet::ipnetwork::Ipv4Network;

pub const PORT: u16 = 5555;

pub fn addr(last: u8) -> NetworkAddress {
    NetworkAddress::new(Ipv4Addr::new(10, 51, 52, last), PORT)
}

pub fn ip(last: u8) -> Ipv4Addr {
    Ipv4Addr::new(10, 51, 52, last)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    KillServer,
    StartServer,
    Connect(NetworkAddress),
    Disconnect(NetworkAddress),
    Devices,
    Shell(NetworkAddress, String),
    Install(NetworkAddress, PathBuf),
    Logcat(NetworkAddress),
}

#[derive(Default)]
struct BridgeState {
    calls: Vec<Call>,
    /// What `devices` lists as online.
    sessions: BTreeSet<NetworkAddress>,
    /// Hosts that accept a connection and then show up in the listing.
    headsets: BTreeSet<NetworkAddress>,
    /// Hosts that report "connected" but never appear in the listing.
    ghosts: BTreeSet<NetworkAddress>,
    /// Hosts whose connect never returns.
    hanging: BTreeSet<NetworkAddress>,
    /// Hosts that accept a connection but wait for the debug prompt.
    unauthorized: BTreeSet<NetworkAddress>,
    /// What `devices` lists as unauthorized.
    pending: BTreeSet<NetworkAddress>,
    /// Connects to a headset that fail before one succeeds.
    connect_failures: u32,
    /// Remote commands containing this text drop every session.
    drops_on: Option<String>,
    install_fails: bool,
    missing: bool,
    log_lines: Vec<String>,
}

#[derive(Default)]
pub struct FakeBridge {
    state: Mutex<BridgeState>,
}

impl FakeBridge {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn state(&self) -> MutexGuard<'_, BridgeState> {
        self.state.lock().unwrap()
    }

    pub fn with_headset(self: Arc<Self>, addr: NetworkAddress) -> Arc<Self> {
        self.state().headsets.insert(addr);
        self
    }

    pub fn with_ghost(self: Arc<Self>, addr: NetworkAddress) -> Arc<Self> {
        self.state().ghosts.insert(addr);
        self
    }

    pub fn with_hanging(self: Arc<Self>, addr: NetworkAddress) -> Arc<Self> {
        self.state().hanging.insert(addr);
        self
    }

    pub fn with_unauthorized(self: Arc<Self>, addr: NetworkAddress) -> Arc<Self> {
        self.state().unauthorized.insert(addr);
        self
    }

    /// A headset that is already connected.
    pub fn with_session(self: Arc<Self>, addr: NetworkAddress) -> Arc<Self> {
        {
            let mut state = self.state();
            state.headsets.insert(addr);
            state.sessions.insert(addr);
        }
        self
    }

    pub fn dropping_on(self: Arc<Self>, command: &str) -> Arc<Self> {
        self.state().drops_on = Some(command.to_string());
        self
    }

    pub fn failing_connects(self: Arc<Self>, count: u32) -> Arc<Self> {
        self.state().connect_failures = count;
        self
    }

    pub fn failing_install(self: Arc<Self>) -> Arc<Self> {
        self.state().install_fails = true;
        self
    }

    pub fn missing(self: Arc<Self>) -> Arc<Self> {
        self.state().missing = true;
        self
    }

    pub fn with_logs(self: Arc<Self>, lines: &[&str]) -> Arc<Self> {
        self.state().log_lines = lines.iter().map(|line| line.to_string()).collect();
        self
    }

    /// Makes the headset unreachable from now on.
    pub fn unplug(&self, addr: NetworkAddress) {
        let mut state = self.state();
        state.headsets.remove(&addr);
        state.sessions.remove(&addr);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn connects(&self) -> Vec<NetworkAddress> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Connect(addr) => Some(addr),
                _ => None,
            })
            .collect()
    }

    pub fn disconnects(&self) -> Vec<NetworkAddress> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Disconnect(addr) => Some(addr),
                _ => None,
            })
            .collect()
    }

    pub fn shell_commands(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Shell(_, command) => Some(command),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) -> Result<()> {
        let mut state = self.state();
        if state.missing {
            return Err(HmdError::MissingTool { tool: "adb".into() });
        }
        state.calls.push(call);
        Ok(())
    }
}

#[async_trait]
impl DebugBridge for FakeBridge {
    async fn ensure_available(&self) -> Result<()> {
        if self.state().missing {
            return Err(HmdError::MissingTool { tool: "adb".into() });
        }
        Ok(())
    }

    async fn kill_server(&self) -> Result<()> {
        self.record(Call::KillServer)?;
        self.state().sessions.clear();
        Ok(())
    }

    async fn start_server(&self) -> Result<()> {
        self.record(Call::StartServer)
    }

    async fn connect(&self, addr: NetworkAddress) -> Result<()> {
        self.record(Call::Connect(addr))?;

        let hangs = self.state().hanging.contains(&addr);
        if hangs {
            std::future::pending::<()>().await;
        }

        let mut state = self.state();
        if state.ghosts.contains(&addr) {
            return Ok(());
        }
        if state.unauthorized.contains(&addr) {
            state.pending.insert(addr);
            return Ok(());
        }
        if !state.headsets.contains(&addr) {
            return Err(HmdError::transport(format!("adb connect {addr}"), "Connection refused"));
        }
        if state.connect_failures > 0 {
            state.connect_failures -= 1;
            return Err(HmdError::transport(format!("adb connect {addr}"), "No route to host"));
        }
        state.sessions.insert(addr);
        Ok(())
    }

    async fn disconnect(&self, addr: NetworkAddress) -> Result<()> {
        self.record(Call::Disconnect(addr))?;
        let mut state = self.state();
        state.sessions.remove(&addr);
        state.pending.remove(&addr);
        Ok(())
    }

    async fn devices(&self) -> Result<Vec<Session>> {
        self.record(Call::Devices)?;
        let state = self.state();
        let online = state.sessions.iter().map(|addr| Session {
            serial: addr.to_string(),
            state: SessionState::Device,
            properties: BTreeMap::from([("model".to_string(), "Quest_3".to_string())]),
        });
        let pending = state.pending.iter().map(|addr| Session {
            serial: addr.to_string(),
            state: SessionState::Unauthorized,
            properties: BTreeMap::new(),
        });
        Ok(online.chain(pending).collect())
    }

    async fn shell(&self, target: NetworkAddress, command: &str) -> Result<String> {
        self.record(Call::Shell(target, command.to_string()))?;
        let mut state = self.state();
        if !state.sessions.contains(&target) {
            return Err(device_not_found(target, "shell"));
        }
        if state.drops_on.as_deref().is_some_and(|trigger| command.contains(trigger)) {
            state.sessions.clear();
        }
        Ok(String::new())
    }

    async fn install(&self, target: NetworkAddress, apk: &Path) -> Result<()> {
        self.record(Call::Install(target, apk.to_path_buf()))?;
        let state = self.state();
        if !state.sessions.contains(&target) {
            return Err(device_not_found(target, "install"));
        }
        if state.install_fails {
            return Err(HmdError::transport(
                format!("adb -s {target} install -r {}", apk.display()),
                "Failure [INSTALL_FAILED_UPDATE_INCOMPATIBLE]",
            ));
        }
        Ok(())
    }

    async fn logcat(&self, target: NetworkAddress, sink: &mut (dyn for<'l> FnMut(&'l str) + Send)) -> Result<()> {
        self.record(Call::Logcat(target))?;
        let lines = self.state().log_lines.clone();
        for line in &lines {
            sink(line);
        }
        Ok(())
    }
}

/// What adb says when a command targets a serial it no longer lists.
fn device_not_found(target: NetworkAddress, verb: &str) -> HmdError {
    HmdError::transport(
        format!("adb -s {target} {verb}"),
        format!("error: device '{target}' not found"),
    )
}

/// Returns `hosts` for every sweep and remembers what it was asked.
#[derive(Clone, Default)]
pub struct FakeScanner {
    hosts: Vec<Ipv4Addr>,
    missing: bool,
    scans: Arc<Mutex<Vec<(Ipv4Network, Vec<Ipv4Addr>)>>>,
}

impl FakeScanner {
    pub fn new(hosts: &[Ipv4Addr]) -> Self {
        Self {
            hosts: hosts.to_vec(),
            ..Self::default()
        }
    }

    pub fn missing() -> Self {
        Self {
            missing: true,
            ..Self::default()
        }
    }

    pub fn scans(&self) -> Vec<(Ipv4Network, Vec<Ipv4Addr>)> {
        self.scans.lock().unwrap().clone()
    }
}

#[async_trait]
impl NetworkScanner for FakeScanner {
    async fn ensure_available(&self) -> Result<()> {
        if self.missing {
            return Err(HmdError::MissingTool { tool: "nmap".into() });
        }
        Ok(())
    }

    async fn scan(&self, range: Ipv4Network, exclude: &[Ipv4Addr]) -> Result<Vec<Ipv4Addr>> {
        self.scans.lock().unwrap().push((range, exclude.to_vec()));
        Ok(self.hosts.clone())
    }
}

/// Default timings, with each backoff wait spent in a single sleep.
pub fn config() -> Config {
    Config {
        port: PORT,
        poll_interval: std::time::Duration::from_secs(60),
        ..Config::default()
    }
}
