use colored::*;
use hmdlink_common::config::Config;
use hmdlink_core::transport::{Session, SessionState};
use tracing::warn;

use crate::commands::device;
use crate::hprint;
use crate::terminal::{colors, print};

type Detail = (String, ColoredString);

/// Never fails: a missing or broken adb is reported, not propagated.
pub async fn status(cfg: &Config) -> anyhow::Result<()> {
    print::header("adb sessions", cfg.quiet);

    let sessions = match device::manager(cfg).status().await {
        Ok(sessions) => sessions,
        Err(e) => {
            warn!("Could not list sessions: {e}");
            return Ok(());
        }
    };

    if sessions.is_empty() {
        print::print_status("No devices attached");
        return Ok(());
    }

    for (idx, session) in sessions.iter().enumerate() {
        print::tree_head(idx, &session.serial);
        print::as_tree_one_level(&session_details(session, cfg.port));
        if idx + 1 != sessions.len() {
            hprint!();
        }
    }
    Ok(())
}

fn session_details(session: &Session, port: u16) -> Vec<Detail> {
    let state_color = match session.state {
        SessionState::Device => colors::STATE_ONLINE,
        _ => colors::STATE_OFFLINE,
    };
    let mut details: Vec<Detail> = vec![("State".to_string(), session.state.to_string().color(state_color))];

    if let Some(model) = session.model() {
        details.push(("Model".to_string(), model.color(colors::TEXT_DEFAULT)));
    }

    let link = match session.address() {
        Some(addr) if addr.port() == port => "network".normal(),
        Some(_) => "network (other port)".color(colors::SEPARATOR),
        None => "usb".normal(),
    };
    details.push(("Link".to_string(), link));
    details
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
