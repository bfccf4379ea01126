use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep};

/// Waits up to `budget`, re-running `check` every `interval`.
///
/// Each slice sleeps `min(interval, remaining)` and then checks, so the total
/// wait never exceeds `budget`. With `interval >= budget` this is a single
/// sleep followed by one check. Returns how long it waited when `check`
/// passes, `None` once the budget is spent.
pub async fn poll_until<F, Fut>(budget: Duration, interval: Duration, mut check: F) -> Option<Duration>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let start = Instant::now();
    let interval = if interval.is_zero() { budget } else { interval };

    loop {
        let remaining = budget.saturating_sub(start.elapsed());
        sleep(interval.min(remaining)).await;

        if check().await {
            return Some(start.elapsed());
        }
        if start.elapsed() >= budget {
            return None;
        }
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
