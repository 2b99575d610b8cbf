use std::time::{Duration, Instant};

/// Single-slot tick timer.
///
/// At most one deadline is pending. Each firing re-arms the next deadline from
/// the firing instant, so a slow frame delays the cadence instead of producing
/// a burst of catch-up ticks.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct TickTimer {
    interval: Duration,
    deadline: Option<Instant>,
}

impl TickTimer {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deadline: None,
        }
    }

    /// Arms the timer to fire one interval after `now`.
    pub fn start(&mut self, now: Instant, interval: Duration) {
        self.interval = interval;
        self.deadline = Some(now + interval);
    }

    /// Replaces the pending deadline with one based on `interval`.
    ///
    /// A stopped timer only records the interval and stays stopped.
    pub fn reschedule(&mut self, now: Instant, interval: Duration) {
        self.interval = interval;
        if self.deadline.is_some() {
            self.deadline = Some(now + interval);
        }
    }

    /// Cancels the pending deadline.
    pub fn stop(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns true at most once per elapsed deadline and re-arms the timer.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    /// Time left until the pending deadline, if armed.
    #[must_use]
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}
