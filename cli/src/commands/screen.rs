use hmdlink_common::config::Config;
use hmdlink_core::mirror::ScreenMirror;

use crate::commands::device;

pub async fn screen(cfg: &Config) -> anyhow::Result<()> {
    let target = device::manager(cfg).require_connection().await?;
    ScreenMirror::new(cfg.scrcpy_path.as_str()).launch(target).await?;
    Ok(())
}
