//! # hmdlink core
//!
//! Finds the headset on the robot network and keeps a debug session to it.
//!
//! * **[`discovery`]**: scan the team subnet and bind to the first host that verifies.
//! * **[`supervisor`]**: survive application restarts that bounce the headset's network.
//! * **[`device`]**: the actions performed over a live session.
//! * **[`transport`]** and **[`scanner`]**: the seams to `adb` and `nmap`.

pub mod device;
pub mod discovery;
pub mod mirror;
pub mod scanner;
pub mod supervisor;
pub mod system;
pub mod transport;
pub mod wait;
