use std::sync::Arc;
use std::time::Instant;

use colored::*;
use hmdlink_common::config::Config;
use hmdlink_common::network::identifier::DeviceIdentifier;
use hmdlink_common::network::subnet::{self, Subnet};
use hmdlink_common::success;
use hmdlink_core::discovery::DiscoveryService;
use hmdlink_core::scanner::nmap::NmapScanner;
use hmdlink_core::transport::adb::AdbClient;
use tracing::{Instrument, info_span};

use crate::terminal::{colors, print, spinner};

/// Where to look: a team number, or a subnet given outright.
#[derive(Debug, PartialEq, Eq)]
enum Search {
    Team(DeviceIdentifier, Subnet),
    Subnet(Subnet),
}

impl Search {
    /// `--subnet` wins over a team number. Both forms are validated here,
    /// before adb or nmap is touched.
    fn from_args(team: Option<String>, subnet: Option<String>) -> anyhow::Result<Self> {
        match (team, subnet) {
            (_, Some(raw)) => Ok(Self::Subnet(raw.parse()?)),
            (Some(team), None) => {
                let id: DeviceIdentifier = team.parse()?;
                let resolved = subnet::resolve(&id)?;
                Ok(Self::Team(id, resolved))
            }
            (None, None) => anyhow::bail!("either a team number or --subnet is required"),
        }
    }

    fn subnet(&self) -> Subnet {
        match self {
            Self::Team(_, subnet) | Self::Subnet(subnet) => *subnet,
        }
    }
}

pub async fn connect(team: Option<String>, subnet: Option<String>, cfg: &Config) -> anyhow::Result<()> {
    let search = Search::from_args(team, subnet)?;
    let subnet = search.subnet();

    print::header("headset discovery", cfg.quiet);
    if cfg.quiet == 0 {
        print::aligned_line("Subnet", format!("{subnet}.0/24"));
        print::aligned_line("Port", cfg.port.to_string());
    }

    let span = info_span!("discovery");
    spinner::attach(&span, "Resetting adb and scanning the subnet");

    let progress = span.clone();
    let service = DiscoveryService::new(
        Arc::new(AdbClient::new(cfg.adb_path.as_str())),
        Box::new(NmapScanner::new(cfg.nmap_path.as_str())),
        cfg,
    )
    .with_progress(Box::new(move |idx, total, ip| {
        spinner::report_probe_progress(&progress, idx, total, &ip.to_string());
    }));

    let start_time = Instant::now();
    let address = match &search {
        Search::Team(id, _) => service.discover(id).instrument(span).await?,
        Search::Subnet(subnet) => service.discover_in(*subnet).instrument(span).await?,
    };

    let elapsed: ColoredString = format!("{:.2}s", start_time.elapsed().as_secs_f64()).color(colors::ACCENT);
    let output: String = format!(
        "Connected to {} in {elapsed}",
        address.to_string().color(colors::ADDRESS).bold()
    );

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output);
        }
        _ => success!("{output}"),
    }
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
