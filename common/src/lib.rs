//! Shared building blocks for `hmdlink`.
//!
//! Holds the pieces every other crate in the workspace agrees on: the runtime
//! [`config::Config`], the [`error::HmdError`] taxonomy, and the network value
//! types used to talk about the headset ([`network::identifier`],
//! [`network::subnet`], [`network::address`]).

pub mod config;
pub mod error;
pub mod network;
pub mod print;
pub mod utils;
