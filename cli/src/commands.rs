pub mod connect;
pub mod device;
pub mod logs;
pub mod screen;
pub mod status;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use hmdlink_common::config::{self, Config};
use hmdlink_common::utils::timing::{DEFAULT_BACKOFF_STEP, DEFAULT_MAX_ATTEMPTS, RetryPlan};

#[derive(Parser)]
#[command(name = "hmdlink", version)]
#[command(about = "Find, connect to and manage a headset over adb.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Port the headset's debug agent listens on
    #[arg(long, global = true, default_value_t = config::DEFAULT_PORT)]
    pub port: u16,

    /// Path to the adb executable
    #[arg(long, global = true, default_value = config::DEFAULT_ADB)]
    pub adb: String,

    /// Path to the nmap executable
    #[arg(long, global = true, default_value = config::DEFAULT_NMAP)]
    pub nmap: String,

    /// Path to the scrcpy executable
    #[arg(long, global = true, default_value = config::DEFAULT_SCRCPY)]
    pub scrcpy: String,

    /// Package restarted by restart, setup and redeploy
    #[arg(long, global = true, default_value = config::DEFAULT_PACKAGE)]
    pub package: String,

    /// Reconnect attempts after a restart drops the session
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_ATTEMPTS, value_parser = clap::value_parser!(u32).range(1..))]
    pub retries: u32,

    /// Less output; repeat for even less
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    /// Show every tool invocation
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find the headset on the team network and connect to it
    #[command(alias = "c")]
    Connect {
        /// Team number, e.g. 5152 for 10.51.52.0/24
        #[arg(required_unless_present = "subnet", conflicts_with = "subnet")]
        team: Option<String>,
        /// Scan this /24 instead of deriving it from a team number
        #[arg(long, value_name = "A.B.C")]
        subnet: Option<String>,
    },
    /// Disable Wi-Fi and Bluetooth, then reboot
    #[command(name = "stopwireless")]
    StopWireless,
    /// Pause the guardian boundary and restart the app
    Setup,
    /// Force-stop and relaunch the app
    Restart,
    /// Install an APK over the current build and restart the app
    Redeploy { apk: PathBuf },
    /// Mirror the headset's screen
    Screen,
    Reboot,
    /// Power the headset off
    Shutdown,
    /// List the sessions adb knows about
    Status,
    /// Stream device logs
    Logs {
        /// Only print lines containing this text
        filter: Option<String>,
    },
}

impl CommandLine {
    pub fn config(&self) -> Config {
        Config {
            port: self.port,
            adb_path: self.adb.clone(),
            nmap_path: self.nmap.clone(),
            scrcpy_path: self.scrcpy.clone(),
            package: self.package.clone(),
            retry: RetryPlan::new(self.retries, DEFAULT_BACKOFF_STEP),
            quiet: self.quiet,
            ..Config::default()
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
