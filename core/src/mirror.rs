//! Screen mirroring through `scrcpy`.

use hmdlink_common::error::{HmdError, Result};
use hmdlink_common::network::address::NetworkAddress;
use tracing::info;

use crate::system;

/// One eye of the headset's side-by-side framebuffer, at a bitrate the robot
/// network can carry.
const CROP: &str = "1730:974:1934:450";
const VIDEO_BIT_RATE: &str = "8M";
const MAX_FPS: &str = "30";

pub struct ScreenMirror {
    program: String,
}

impl ScreenMirror {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub async fn ensure_available(&self) -> Result<()> {
        system::require_tool(&self.program, "--version").await
    }

    /// Opens the mirror window for `target` and blocks until it is closed.
    pub async fn launch(&self, target: NetworkAddress) -> Result<()> {
        self.ensure_available().await?;

        let serial = target.to_string();
        let args = mirror_args(&serial);
        info!("Mirroring {target}, close the window to return");

        let status = system::command(&self.program, &args)
            .status()
            .await
            .map_err(|e| system::spawn_error(&self.program, e))?;

        if !status.success() {
            return Err(HmdError::transport(
                system::describe(&self.program, &args),
                format!("exited with {status}"),
            ));
        }
        Ok(())
    }
}

fn mirror_args(serial: &str) -> Vec<&str> {
    vec![
        "-s",
        serial,
        "--crop",
        CROP,
        "--video-bit-rate",
        VIDEO_BIT_RATE,
        "--max-fps",
        MAX_FPS,
        "--no-audio",
    ]
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
