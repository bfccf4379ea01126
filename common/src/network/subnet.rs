//! # Subnet Resolution
//!
//! Robot networks follow the `10.TE.AM.0/24` convention: the team number is
//! split into two pairs of digits which become the second and third octets.
//!
//! This module turns a [`DeviceIdentifier`] into that [`Subnet`], and also
//! parses a literal `a.b.c` prefix for networks that do not follow the scheme.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use pnet::ipnetwork::Ipv4Network;

use crate::error::{HmdError, Result};
use crate::network::identifier::DeviceIdentifier;

const FIRST_OCTET: u8 = 10;
const PREFIX_LEN: u8 = 24;

/// Hosts reserved for network infrastructure (radio and gateway).
const RESERVED_HOSTS: [u8; 2] = [1, 2];

/// A `/24` network identified by its first three octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subnet {
    octets: [u8; 3],
}

impl Subnet {
    pub fn new(a: u8, b: u8, c: u8) -> Self {
        Self { octets: [a, b, c] }
    }

    /// Address `<prefix>.<last>` inside this subnet.
    pub fn host(&self, last: u8) -> Ipv4Addr {
        let [a, b, c] = self.octets;
        Ipv4Addr::new(a, b, c, last)
    }

    pub fn network(&self) -> Ipv4Network {
        Ipv4Network::new(self.host(0), PREFIX_LEN).expect("/24 is a valid prefix length")
    }

    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        self.network().contains(ip)
    }

    /// Infrastructure addresses that must never be treated as the headset.
    pub fn reserved(&self) -> [Ipv4Addr; 2] {
        RESERVED_HOSTS.map(|last| self.host(last))
    }

    pub fn is_reserved(&self, ip: Ipv4Addr) -> bool {
        self.reserved().contains(&ip)
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.octets;
        write!(f, "{a}.{b}.{c}")
    }
}

impl FromStr for Subnet {
    type Err = HmdError;

    /// Parses a literal prefix such as `10.2.54` (a trailing `.0/24` is tolerated).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let prefix = trimmed.strip_suffix("/24").unwrap_or(trimmed);

        let octets: Vec<u8> = prefix
            .split('.')
            .map(|octet| octet.parse::<u8>())
            .collect::<std::result::Result<Vec<u8>, _>>()
            .map_err(|e| HmdError::invalid(format!("invalid subnet '{s}': {e}")))?;

        match octets.as_slice() {
            [a, b, c] | [a, b, c, 0] => Ok(Self::new(*a, *b, *c)),
            _ => Err(HmdError::invalid(format!(
                "invalid subnet '{s}': expected three octets like 10.51.52"
            ))),
        }
    }
}

/// Derives the team subnet: `5152` becomes `10.51.52`.
///
/// Only four-digit identifiers split unambiguously into two octets. Anything
/// else is rejected instead of producing a truncated prefix.
pub fn resolve(id: &DeviceIdentifier) -> Result<Subnet> {
    let digits = id.digits();

    if digits.len() != 4 {
        return Err(HmdError::invalid(format!(
            "cannot derive a subnet from team number '{id}': expected exactly 4 digits \
             (pad with zeros, e.g. 0254, or pass --subnet 10.x.y)"
        )));
    }

    let pair = |hi: u8, lo: u8| (hi - b'0') * 10 + (lo - b'0');
    Ok(Subnet::new(
        FIRST_OCTET,
        pair(digits[0], digits[1]),
        pair(digits[2], digits[3]),
    ))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
