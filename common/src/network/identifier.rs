use std::fmt;
use std::str::FromStr;

use crate::error::HmdError;

const MAX_DIGITS: usize = 5;

/// The team number the headset's network is derived from.
///
/// Only guarantees "one to five ASCII digits"; whether those digits map to a
/// usable subnet is the resolver's call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceIdentifier(String);

impl DeviceIdentifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn digits(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl FromStr for DeviceIdentifier {
    type Err = HmdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(HmdError::invalid("team number is required"));
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(HmdError::invalid(format!(
                "team number '{trimmed}' must contain only digits"
            )));
        }
        if trimmed.len() > MAX_DIGITS {
            return Err(HmdError::invalid(format!(
                "team number '{trimmed}' has more than {MAX_DIGITS} digits"
            )));
        }

        Ok(Self(trimmed.to_string()))
    }
}

impl fmt::Display for DeviceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
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
