use hmdlink_common::config::Config;
use tracing::info;

use crate::commands::device;
use crate::terminal::print;

/// Streams until adb closes the stream or the process is interrupted.
pub async fn logs(filter: Option<&str>, cfg: &Config) -> anyhow::Result<()> {
    let manager = device::manager(cfg);
    match filter {
        Some(needle) => info!("Streaming logs containing '{needle}'"),
        None => info!("Streaming logs"),
    }

    manager.logs(filter, &mut |line: &str| print::print(line)).await?;
    Ok(())
}
