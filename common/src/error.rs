//! # Error Taxonomy
//!
//! Every failure the tool can report to the operator. Each variant is raised
//! where the precondition is checked and travels unchanged to the command
//! dispatcher, which decides how loudly to print it.

use std::io;

use thiserror::Error;

use crate::network::address::NetworkAddress;
use crate::network::subnet::Subnet;

pub type Result<T> = std::result::Result<T, HmdError>;

#[derive(Debug, Error)]
pub enum HmdError {
    /// A required external program could not be started.
    #[error("required tool '{tool}' was not found on this machine")]
    MissingTool { tool: String },

    /// No session on the well-known port is registered with the transport daemon.
    #[error("no headset is connected on port {port}")]
    NoConnection { port: u16 },

    /// The scan finished but no candidate could be verified. `unauthorized`
    /// holds the first candidate that answered but is waiting for the
    /// debugging prompt to be accepted.
    #[error("{}", not_found_message(.subnet, .probed, .unauthorized))]
    DiscoveryNotFound {
        subnet: Subnet,
        probed: usize,
        unauthorized: Option<NetworkAddress>,
    },

    #[error("{0}")]
    InvalidArgument(String),

    /// A disruptive action dropped the session and it could not be restored.
    #[error("{}", reconnect_message(.address, .attempts))]
    ReconnectExhausted {
        address: Option<NetworkAddress>,
        attempts: u32,
    },

    /// A tool ran but reported failure.
    #[error("'{command}' failed: {message}")]
    Transport { command: String, message: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl HmdError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn transport(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Whether the operator can fix this by reconnecting, as opposed to
    /// installing a tool or correcting an argument.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NoConnection { .. }
                | Self::DiscoveryNotFound { .. }
                | Self::ReconnectExhausted { .. }
        )
    }

    /// Follow-up instruction printed under the error, if there is one.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NoConnection { .. } | Self::ReconnectExhausted { .. } => {
                Some("try reconnecting manually with `hmdlink connect <team>`")
            }
            Self::DiscoveryNotFound { unauthorized: Some(_), .. } => {
                Some("accept the USB debugging prompt inside the headset, then run connect again")
            }
            Self::DiscoveryNotFound { .. } => {
                Some("check the headset is powered on, on the robot network, and has wireless debugging enabled")
            }
            Self::MissingTool { .. } => Some("install it or point hmdlink at it with the matching --<tool> flag"),
            _ => None,
        }
    }
}

fn not_found_message(subnet: &Subnet, probed: &usize, unauthorized: &Option<NetworkAddress>) -> String {
    match unauthorized {
        Some(addr) => format!("headset at {addr} on {subnet}.0/24 has not authorized this computer"),
        None => format!("no headset found on {subnet}.0/24 ({probed} candidates probed)"),
    }
}

fn reconnect_message(address: &Option<NetworkAddress>, attempts: &u32) -> String {
    match address {
        Some(addr) => format!("lost connection to {addr} and {attempts} reconnect attempts failed"),
        None => "lost connection and no previous address is known to reconnect to".to_string(),
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
