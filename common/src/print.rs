//! Log macros shared by every crate.
//!
//! Plain levels go through `tracing` directly; these cover the two kinds of
//! line the terminal formatter renders specially.

/// Target for lines that are already formatted and must be printed verbatim.
pub const PRINT_TARGET: &str = "hmdlink::print";
/// Target for completion lines ("Connected to ...").
pub const SUCCESS_TARGET: &str = "hmdlink::success";

/// Reports that an operation finished successfully.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "hmdlink::success", $($arg)*)
    };
}
