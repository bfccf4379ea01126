//! The **network scanner** seam.
//!
//! A scanner only answers "which hosts in this range respond?". Choosing which
//! of them is the headset is the discovery engine's job, so implementations
//! stay thin wrappers around whatever tool does the sweeping.

use std::net::Ipv4Addr;

use async_trait::async_trait;
use hmdlink_common::error::Result;
use pnet::ipnetwork::Ipv4Network;

pub mod nmap;

#[async_trait]
pub trait NetworkScanner: Send + Sync {
    /// Fails with [`hmdlink_common::error::HmdError::MissingTool`] when the
    /// scanner cannot be started.
    async fn ensure_available(&self) -> Result<()>;

    /// Responsive hosts in `range`, minus `exclude`, in scan order.
    async fn scan(&self, range: Ipv4Network, exclude: &[Ipv4Addr]) -> Result<Vec<Ipv4Addr>>;
}
