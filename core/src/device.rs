//! Actions performed on the headset over an established debug session.
//!
//! Every action except [`DeviceManager::status`] first asks the daemon for a
//! live session on the well-known port and fails fast with
//! [`HmdError::NoConnection`] when there is none. Actions that restart the
//! application run under the [`ReconnectSupervisor`].

use std::path::Path;
use std::sync::Arc;

use hmdlink_common::config::Config;
use hmdlink_common::error::{HmdError, Result};
use hmdlink_common::network::address::NetworkAddress;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::supervisor::{ReconnectSupervisor, Recovery};
use crate::transport::{self, DebugBridge, Session};

const DISABLE_GUARDIAN: &str = "setprop debug.oculus.guardian_pause 1";
const DISABLE_WIFI: &str = "svc wifi disable";
const DISABLE_BLUETOOTH: &str = "svc bluetooth disable";
const REBOOT: &str = "reboot";
const POWER_OFF: &str = "reboot -p";

pub struct DeviceManager<'a> {
    bridge: Arc<dyn DebugBridge>,
    cfg: &'a Config,
}

impl<'a> DeviceManager<'a> {
    pub fn new(bridge: Arc<dyn DebugBridge>, cfg: &'a Config) -> Self {
        Self { bridge, cfg }
    }

    /// The address of the live session on the well-known port.
    pub async fn require_connection(&self) -> Result<NetworkAddress> {
        self.bridge.ensure_available().await?;
        transport::connected_on_port(self.bridge.as_ref(), self.cfg.port, self.cfg.verify_timeout)
            .await?
            .ok_or(HmdError::NoConnection { port: self.cfg.port })
    }

    /// Every session the daemon reports, connected or not.
    pub async fn status(&self) -> Result<Vec<Session>> {
        self.bridge.devices().await
    }

    /// Force-stops and relaunches the application, reconnecting if needed.
    pub async fn restart(&self) -> Result<Recovery> {
        let target = self.require_connection().await?;
        self.supervisor()
            .supervise(|| self.restart_app(target))
            .await
    }

    /// Pauses the guardian boundary, then restarts the application.
    pub async fn setup(&self) -> Result<Recovery> {
        let target = self.require_connection().await?;
        info!("Disabling guardian");
        self.bridge.shell(target, DISABLE_GUARDIAN).await?;
        self.supervisor()
            .supervise(|| self.restart_app(target))
            .await
    }

    /// Installs `apk` over the current build and restarts the application.
    pub async fn redeploy(&self, apk: &Path) -> Result<Recovery> {
        validate_apk(apk)?;
        let target = self.require_connection().await?;

        self.supervisor()
            .supervise(|| async move {
                info!("Installing {}", apk.display());
                self.bridge.install(target, apk).await?;
                self.restart_app(target).await
            })
            .await
    }

    /// Turns off Wi-Fi and Bluetooth, then reboots. The session does not survive.
    pub async fn stop_wireless(&self) -> Result<()> {
        let target = self.require_connection().await?;
        info!("Disabling Wi-Fi and Bluetooth");
        self.bridge.shell(target, DISABLE_WIFI).await?;
        self.bridge.shell(target, DISABLE_BLUETOOTH).await?;
        self.power(target, REBOOT).await
    }

    pub async fn reboot(&self) -> Result<()> {
        let target = self.require_connection().await?;
        self.power(target, REBOOT).await
    }

    pub async fn shutdown(&self) -> Result<()> {
        let target = self.require_connection().await?;
        self.power(target, POWER_OFF).await
    }

    /// Streams device logs, keeping only lines containing `filter` when given.
    pub async fn logs(&self, filter: Option<&str>, sink: &mut (dyn for<'l> FnMut(&'l str) + Send)) -> Result<()> {
        let target = self.require_connection().await?;
        match filter {
            Some(needle) => {
                let mut filtered = |line: &str| {
                    if line.contains(needle) {
                        sink(line);
                    }
                };
                self.bridge.logcat(target, &mut filtered).await
            }
            None => self.bridge.logcat(target, sink).await,
        }
    }

    /// Stops and relaunches the app. Both steps are best-effort: the force-stop
    /// can take the session down with it, and deciding whether it came back is
    /// the supervisor's job.
    async fn restart_app(&self, target: NetworkAddress) -> Result<()> {
        let package = &self.cfg.package;

        info!("Stopping {package}");
        self.remote_best_effort(target, &format!("am force-stop {package}")).await;
        sleep(self.cfg.stop_settle).await;

        info!("Launching {package}");
        self.remote_best_effort(
            target,
            &format!("monkey -p {package} -c android.intent.category.LAUNCHER 1"),
        )
        .await;
        sleep(self.cfg.launch_settle).await;

        Ok(())
    }

    async fn remote_best_effort(&self, target: NetworkAddress, command: &str) {
        if let Err(e) = self.bridge.shell(target, command).await {
            debug!("{target}: '{command}' failed: {e}");
        }
    }

    async fn power(&self, target: NetworkAddress, command: &str) -> Result<()> {
        info!("Sending '{command}' to {target}");
        self.bridge.shell(target, command).await.map(|_| ())
    }

    fn supervisor(&self) -> ReconnectSupervisor<'a> {
        ReconnectSupervisor::new(Arc::clone(&self.bridge), self.cfg)
    }
}

/// Rejects paths that do not point at an existing `.apk` file.
pub fn validate_apk(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(HmdError::invalid(format!(
            "APK '{}' does not exist",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(HmdError::invalid(format!(
            "APK '{}' is not a file",
            path.display()
        )));
    }

    let is_apk = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("apk"));
    if !is_apk {
        return Err(HmdError::invalid(format!(
            "'{}' is not an .apk file",
            path.display()
        )));
    }

    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
