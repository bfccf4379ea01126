use std::net::Ipv4Addr;

use async_trait::async_trait;
use hmdlink_common::error::Result;
use pnet::ipnetwork::Ipv4Network;
use tracing::debug;

use super::NetworkScanner;
use crate::system;

/// Ping sweep through `nmap -sn`, read back in grepable format.
pub struct NmapScanner {
    program: String,
}

impl NmapScanner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl NetworkScanner for NmapScanner {
    async fn ensure_available(&self) -> Result<()> {
        system::require_tool(&self.program, "--version").await
    }

    async fn scan(&self, range: Ipv4Network, exclude: &[Ipv4Addr]) -> Result<Vec<Ipv4Addr>> {
        let target = range.to_string();
        let excluded = exclude
            .iter()
            .map(Ipv4Addr::to_string)
            .collect::<Vec<String>>()
            .join(",");

        let mut args: Vec<&str> = vec!["-sn", "-n", "-oG", "-"];
        if !excluded.is_empty() {
            args.extend_from_slice(&["--exclude", excluded.as_str()]);
        }
        args.push(target.as_str());

        let stdout = system::run_checked(&self.program, &args).await?;
        let hosts = parse_grepable(&stdout);
        debug!("nmap reported {} responsive hosts in {target}", hosts.len());

        Ok(hosts)
    }
}

/// Extracts `Status: Up` hosts from `nmap -oG` output, keeping their order.
pub fn parse_grepable(output: &str) -> Vec<Ipv4Addr> {
    output
        .lines()
        .filter(|line| line.starts_with("Host:") && line.contains("Status: Up"))
        .filter_map(|line| line.split_whitespace().nth(1))
        .filter_map(|addr| addr.parse::<Ipv4Addr>().ok())
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
