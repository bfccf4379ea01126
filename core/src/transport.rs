//! The **debug-bridge transport** seam.
//!
//! Everything the tool asks of the transport daemon goes through
//! [`DebugBridge`]. The daemon's session list is the only source of truth for
//! "is the headset connected": it is queried at each decision point through
//! [`active_sessions`] and never cached.
//!
//! The concrete implementation shells out to `adb` ([`adb::AdbClient`]).

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use hmdlink_common::error::{HmdError, Result};
use hmdlink_common::network::address::NetworkAddress;
use tokio::time::timeout;

pub mod adb;

/// Lifecycle and session operations of the transport daemon.
///
/// Every call may block on an external process and may fail. Callers bound
/// them with their own timeouts where the flow requires it.
#[async_trait]
pub trait DebugBridge: Send + Sync {
    /// Fails with [`HmdError::MissingTool`] when the client cannot be started.
    async fn ensure_available(&self) -> Result<()>;

    async fn kill_server(&self) -> Result<()>;

    async fn start_server(&self) -> Result<()>;

    async fn connect(&self, addr: NetworkAddress) -> Result<()>;

    async fn disconnect(&self, addr: NetworkAddress) -> Result<()>;

    /// Every session the daemon currently knows about, in listing order.
    async fn devices(&self) -> Result<Vec<Session>>;

    /// Runs `command` in a remote shell and returns its standard output.
    async fn shell(&self, target: NetworkAddress, command: &str) -> Result<String>;

    async fn install(&self, target: NetworkAddress, apk: &Path) -> Result<()>;

    /// Streams device log lines into `sink` until the stream ends.
    async fn logcat(&self, target: NetworkAddress, sink: &mut (dyn for<'l> FnMut(&'l str) + Send)) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Device,
    Offline,
    Unauthorized,
    Other(String),
}

impl From<&str> for SessionState {
    fn from(value: &str) -> Self {
        match value {
            "device" => Self::Device,
            "offline" => Self::Offline,
            "unauthorized" => Self::Unauthorized,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Device => f.write_str("device"),
            Self::Offline => f.write_str("offline"),
            Self::Unauthorized => f.write_str("unauthorized"),
            Self::Other(state) => f.write_str(state),
        }
    }
}

/// One entry of the daemon's device listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub serial: String,
    pub state: SessionState,
    /// `key:value` pairs trailing the state (`model`, `product`, `transport_id`, ...).
    pub properties: BTreeMap<String, String>,
}

impl Session {
    /// The network address behind the serial, or `None` for USB serials.
    pub fn address(&self) -> Option<NetworkAddress> {
        self.serial.parse().ok()
    }

    pub fn is_online(&self) -> bool {
        self.state == SessionState::Device
    }

    pub fn model(&self) -> Option<&str> {
        self.properties.get("model").map(String::as_str)
    }
}

/// Parses the output of `adb devices -l`.
pub fn parse_devices(output: &str) -> Vec<Session> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with("List of devices") && !line.starts_with('*'))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let serial = fields.next()?.to_string();
            let state = SessionState::from(fields.next()?);
            let properties = fields
                .filter_map(|field| field.split_once(':'))
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect();

            Some(Session {
                serial,
                state,
                properties,
            })
        })
        .collect()
}

/// Network addresses with a fully established session.
pub fn online_addresses(sessions: &[Session]) -> BTreeSet<NetworkAddress> {
    sessions
        .iter()
        .filter(|session| session.is_online())
        .filter_map(Session::address)
        .collect()
}

/// The full device listing, in any state, giving up after `within`.
pub async fn list_sessions(bridge: &dyn DebugBridge, within: Duration) -> Result<Vec<Session>> {
    timeout(within, bridge.devices())
        .await
        .map_err(|_| HmdError::transport("devices", format!("no answer within {within:?}")))?
}

/// Queries the live session list, giving up after `within`.
pub async fn active_sessions(
    bridge: &dyn DebugBridge,
    within: Duration,
) -> Result<BTreeSet<NetworkAddress>> {
    let sessions = list_sessions(bridge, within).await?;
    Ok(online_addresses(&sessions))
}

/// The first online session on `port`, if any.
pub async fn connected_on_port(
    bridge: &dyn DebugBridge,
    port: u16,
    within: Duration,
) -> Result<Option<NetworkAddress>> {
    let sessions = active_sessions(bridge, within).await?;
    Ok(sessions.into_iter().find(|addr| addr.port() == port))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
