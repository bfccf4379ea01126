use std::path::Path;
use std::sync::Arc;

use colored::*;
use hmdlink_common::config::Config;
use hmdlink_common::success;
use hmdlink_core::device::{self, DeviceManager};
use hmdlink_core::supervisor::Recovery;
use hmdlink_core::transport::adb::AdbClient;

use crate::terminal::{colors, print};

pub fn manager(cfg: &Config) -> DeviceManager<'_> {
    DeviceManager::new(Arc::new(AdbClient::new(cfg.adb_path.as_str())), cfg)
}

pub async fn restart(cfg: &Config) -> anyhow::Result<()> {
    print::header("restarting app", cfg.quiet);
    let recovery = manager(cfg).restart().await?;
    report_recovery(&recovery, cfg);
    Ok(())
}

pub async fn setup(cfg: &Config) -> anyhow::Result<()> {
    print::header("preparing headset", cfg.quiet);
    let recovery = manager(cfg).setup().await?;
    report_recovery(&recovery, cfg);
    Ok(())
}

pub async fn redeploy(apk: &Path, cfg: &Config) -> anyhow::Result<()> {
    device::validate_apk(apk)?;
    print::header("redeploying", cfg.quiet);
    let recovery = manager(cfg).redeploy(apk).await?;
    report_recovery(&recovery, cfg);
    Ok(())
}

pub async fn stop_wireless(cfg: &Config) -> anyhow::Result<()> {
    manager(cfg).stop_wireless().await?;
    success!("Wireless disabled, headset is rebooting");
    Ok(())
}

pub async fn reboot(cfg: &Config) -> anyhow::Result<()> {
    manager(cfg).reboot().await?;
    success!("Headset is rebooting");
    Ok(())
}

pub async fn shutdown(cfg: &Config) -> anyhow::Result<()> {
    manager(cfg).shutdown().await?;
    success!("Headset is powering off");
    Ok(())
}

fn report_recovery(recovery: &Recovery, cfg: &Config) {
    match recovery {
        Recovery::Survived => success!("{} restarted, connection intact", cfg.package.color(colors::PRIMARY)),
        Recovery::Restored {
            address,
            attempts,
            waited,
        } => {
            success!(
                "{} restarted, reconnected to {} after {} attempt(s) ({:.1}s)",
                cfg.package.color(colors::PRIMARY),
                address.to_string().color(colors::ADDRESS),
                attempts,
                waited.as_secs_f64()
            );
        }
    }
}
