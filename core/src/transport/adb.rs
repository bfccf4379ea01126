use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use hmdlink_common::error::{HmdError, Result};
use hmdlink_common::network::address::NetworkAddress;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use super::{DebugBridge, Session, parse_devices};
use crate::system;

/// [`DebugBridge`] backed by the `adb` command-line client.
pub struct AdbClient {
    program: String,
}

impl AdbClient {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        system::run_checked(&self.program, args).await
    }

    async fn run_on(&self, target: NetworkAddress, args: &[&str]) -> Result<String> {
        let serial = target.to_string();
        let mut full: Vec<&str> = vec!["-s", serial.as_str()];
        full.extend_from_slice(args);
        self.run(&full).await
    }
}

#[async_trait]
impl DebugBridge for AdbClient {
    async fn ensure_available(&self) -> Result<()> {
        system::require_tool(&self.program, "version").await
    }

    async fn kill_server(&self) -> Result<()> {
        // A daemon that is not running is already in the state we want.
        if let Err(e) = self.run(&["kill-server"]).await {
            if matches!(e, HmdError::MissingTool { .. }) {
                return Err(e);
            }
            debug!("kill-server: {e}");
        }
        Ok(())
    }

    async fn start_server(&self) -> Result<()> {
        self.run(&["start-server"]).await.map(|_| ())
    }

    async fn connect(&self, addr: NetworkAddress) -> Result<()> {
        let target = addr.to_string();
        let stdout = self.run(&["connect", target.as_str()]).await?;

        // adb exits 0 even when the connection is refused.
        if is_connect_success(&stdout) {
            Ok(())
        } else {
            Err(HmdError::transport(
                format!("adb connect {target}"),
                stdout.trim().to_string(),
            ))
        }
    }

    async fn disconnect(&self, addr: NetworkAddress) -> Result<()> {
        let target = addr.to_string();
        self.run(&["disconnect", target.as_str()]).await.map(|_| ())
    }

    async fn devices(&self) -> Result<Vec<Session>> {
        let stdout = self.run(&["devices", "-l"]).await?;
        Ok(parse_devices(&stdout))
    }

    async fn shell(&self, target: NetworkAddress, command: &str) -> Result<String> {
        self.run_on(target, &["shell", command]).await
    }

    async fn install(&self, target: NetworkAddress, apk: &Path) -> Result<()> {
        let path = apk.to_string_lossy();
        let stdout = self.run_on(target, &["install", "-r", path.as_ref()]).await?;

        if stdout.lines().any(|line| line.trim() == "Success") {
            Ok(())
        } else {
            Err(HmdError::transport(
                format!("adb install -r {path}"),
                stdout.trim().to_string(),
            ))
        }
    }

    async fn logcat(&self, target: NetworkAddress, sink: &mut (dyn for<'l> FnMut(&'l str) + Send)) -> Result<()> {
        let serial = target.to_string();
        let mut child = system::command(&self.program, &["-s", serial.as_str(), "logcat"])
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| system::spawn_error(&self.program, e))?;

        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            while let Some(line) = lines.next_line().await? {
                sink(&line);
            }
        }

        let status = child.wait().await?;
        if status.success() {
            Ok(())
        } else {
            Err(HmdError::transport(
                format!("adb -s {serial} logcat"),
                format!("log stream ended with {status}"),
            ))
        }
    }
}

fn is_connect_success(stdout: &str) -> bool {
    let line = stdout.trim();
    line.starts_with("connected to") || line.starts_with("already connected to")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
