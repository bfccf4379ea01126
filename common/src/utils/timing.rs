use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_BACKOFF_STEP: Duration = Duration::from_secs(2);

/// Bounded reconnection schedule: attempt `i` (1-based) waits `step * i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPlan {
    pub max_attempts: u32,
    pub step: Duration,
}

impl RetryPlan {
    pub fn new(max_attempts: u32, step: Duration) -> Self {
        Self { max_attempts, step }
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.step * attempt
    }

    /// `(attempt, delay)` pairs in the order they are executed.
    pub fn attempts(&self) -> impl Iterator<Item = (u32, Duration)> + '_ {
        (1..=self.max_attempts).map(|attempt| (attempt, self.delay_for(attempt)))
    }

    /// Longest the plan can wait if every attempt fails.
    pub fn total_budget(&self) -> Duration {
        self.attempts().map(|(_, delay)| delay).sum()
    }
}

impl Default for RetryPlan {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BACKOFF_STEP)
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
