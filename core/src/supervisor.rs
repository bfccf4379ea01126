//! # Reconnection Supervisor
//!
//! Restarting the on-device application bounces the headset's network
//! interface, which regularly drops the debug session. The supervisor wraps
//! such disruptive actions:
//!
//! ```text
//! Connected ──(action)──▶ Unknown ──▶ Connected (survived or restored)
//!                                 └─▶ Disconnected (retries exhausted)
//! ```
//!
//! The address is captured *before* the action, because afterwards the daemon
//! may no longer list it. Nothing is remembered between invocations.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use hmdlink_common::config::Config;
use hmdlink_common::error::{HmdError, Result};
use hmdlink_common::network::address::NetworkAddress;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::transport::{self, DebugBridge};
use crate::wait;

/// How a supervised action ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// The session was still listed right after the action.
    Survived,
    /// The session dropped and was re-established.
    Restored {
        address: NetworkAddress,
        attempts: u32,
        /// Time spent in backoff waits, excluding settle windows.
        waited: Duration,
    },
}

pub struct ReconnectSupervisor<'a> {
    bridge: Arc<dyn DebugBridge>,
    cfg: &'a Config,
}

impl<'a> ReconnectSupervisor<'a> {
    pub fn new(bridge: Arc<dyn DebugBridge>, cfg: &'a Config) -> Self {
        Self { bridge, cfg }
    }

    /// Runs `action` and repairs the session if it dropped.
    pub async fn supervise<F, Fut>(&self, action: F) -> Result<Recovery>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let captured = self.capture_address().await;
        match captured {
            Some(addr) => debug!("captured {addr} before disruptive action"),
            None => debug!("no session on port {} before disruptive action", self.cfg.port),
        }

        action().await?;

        if self.is_connected().await {
            return Ok(Recovery::Survived);
        }

        let Some(addr) = captured else {
            return Err(HmdError::ReconnectExhausted {
                address: None,
                attempts: 0,
            });
        };

        warn!("Connection to {addr} dropped, reconnecting");
        self.reconnect(addr).await
    }

    async fn reconnect(&self, addr: NetworkAddress) -> Result<Recovery> {
        // Clear the stale registration once; later attempts reuse the fresh one.
        if let Err(e) = self.bridge.disconnect(addr).await {
            debug!("{addr}: disconnect failed: {e}");
        }

        let mut waited = Duration::ZERO;
        let plan = self.cfg.retry;

        for (attempt, delay) in plan.attempts() {
            info!("Reconnect attempt {attempt}/{} to {addr}", plan.max_attempts);

            match timeout(self.cfg.connect_timeout, self.bridge.connect(addr)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => debug!("{addr}: {e}"),
                Err(_) => debug!("{addr}: connect timed out"),
            }

            let outcome = wait::poll_until(delay, self.cfg.poll_interval, move || self.is_connected()).await;
            match outcome {
                Some(elapsed) => {
                    waited += elapsed;
                    return Ok(Recovery::Restored {
                        address: addr,
                        attempts: attempt,
                        waited,
                    });
                }
                None => waited += delay,
            }
        }

        Err(HmdError::ReconnectExhausted {
            address: Some(addr),
            attempts: plan.max_attempts,
        })
    }

    /// Best-effort: a failed listing counts as "nothing captured".
    async fn capture_address(&self) -> Option<NetworkAddress> {
        transport::connected_on_port(self.bridge.as_ref(), self.cfg.port, self.cfg.verify_timeout)
            .await
            .unwrap_or_else(|e| {
                debug!("could not list sessions: {e}");
                None
            })
    }

    async fn is_connected(&self) -> bool {
        matches!(
            transport::connected_on_port(self.bridge.as_ref(), self.cfg.port, self.cfg.verify_timeout).await,
            Ok(Some(_))
        )
    }
}
