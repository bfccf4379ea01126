use std::time::Duration;

use crate::utils::timing::RetryPlan;

/// Port the headset's debug agent listens on for TCP connections.
pub const DEFAULT_PORT: u16 = 5555;
/// Application restarted by `restart`, `setup` and `redeploy`.
pub const DEFAULT_PACKAGE: &str = "gg.QuestNav.QuestNav";

pub const DEFAULT_ADB: &str = "adb";
pub const DEFAULT_NMAP: &str = "nmap";
pub const DEFAULT_SCRCPY: &str = "scrcpy";

pub struct Config {
    /// Well-known port of the debug agent. Fixed for the whole run.
    pub port: u16,

    pub adb_path: String,
    pub nmap_path: String,
    pub scrcpy_path: String,

    /// Package name of the on-device application.
    pub package: String,

    /// Upper bound for a single `connect` call.
    pub connect_timeout: Duration,
    /// Upper bound for listing sessions when verifying a connection.
    pub verify_timeout: Duration,

    /// Pause after force-stopping the application.
    pub stop_settle: Duration,
    /// Pause after relaunching the application, while its network interface comes back.
    pub launch_settle: Duration,

    pub retry: RetryPlan,
    /// How often the session listing is re-checked while a retry waits.
    pub poll_interval: Duration,

    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            adb_path: DEFAULT_ADB.to_string(),
            nmap_path: DEFAULT_NMAP.to_string(),
            scrcpy_path: DEFAULT_SCRCPY.to_string(),
            package: DEFAULT_PACKAGE.to_string(),
            connect_timeout: Duration::from_secs(3),
            verify_timeout: Duration::from_secs(1),
            stop_settle: Duration::from_secs(1),
            launch_settle: Duration::from_secs(3),
            retry: RetryPlan::default(),
            poll_interval: Duration::from_millis(500),
            quiet: 0,
        }
    }
}
