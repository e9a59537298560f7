//! Fixed-period polling timer
//!
//! The UI loop calls [`Ticker::poll`] every frame with the current instant;
//! the ticker reports how many whole periods have elapsed since the last
//! poll. A cancelled ticker never reports ticks again until restarted.

use std::time::{Duration, Instant};

/// A cancellable fixed-period timer driven by explicit instants
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next_due: Option<Instant>,
    ticks: u64,
}

impl Ticker {
    /// Create a stopped ticker with the given period
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            next_due: None,
            ticks: 0,
        }
    }

    /// Start (or restart) the ticker; the first tick is due one period after `now`
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
        self.ticks = 0;
    }

    /// Stop the ticker. Subsequent polls report nothing.
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Whether the ticker is running
    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// The period between ticks
    pub fn period(&self) -> Duration {
        self.period
    }

    /// When the next tick is due, if running
    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Total ticks delivered since the last start
    pub fn total_ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of ticks that became due up to `now`
    ///
    /// Frames can arrive late, so several periods may be delivered at once.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };

        let mut fired = 0;
        while now >= due {
            fired += 1;
            due += self.period;
        }

        self.next_due = Some(due);
        self.ticks += u64::from(fired);
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopped_ticker_never_fires() {
        let mut ticker = Ticker::new(Duration::from_secs(1));
        let now = Instant::now();
        assert!(!ticker.is_active());
        assert_eq!(ticker.poll(now + Duration::from_secs(10)), 0);
    }

    #[test]
    fn test_fires_once_per_period() {
        let mut ticker = Ticker::new(Duration::from_secs(1));
        let start = Instant::now();
        ticker.start(start);

        assert_eq!(ticker.poll(start + Duration::from_millis(999)), 0);
        assert_eq!(ticker.poll(start + Duration::from_millis(1000)), 1);
        assert_eq!(ticker.poll(start + Duration::from_millis(1500)), 0);
        assert_eq!(ticker.poll(start + Duration::from_millis(2000)), 1);
        assert_eq!(ticker.total_ticks(), 2);
    }

    #[test]
    fn test_late_poll_catches_up() {
        let mut ticker = Ticker::new(Duration::from_secs(1));
        let start = Instant::now();
        ticker.start(start);

        assert_eq!(ticker.poll(start + Duration::from_millis(3500)), 3);
        assert_eq!(ticker.next_due(), Some(start + Duration::from_secs(4)));
    }

    #[test]
    fn test_cancel_stops_ticks() {
        let mut ticker = Ticker::new(Duration::from_secs(1));
        let start = Instant::now();
        ticker.start(start);
        assert_eq!(ticker.poll(start + Duration::from_secs(1)), 1);

        ticker.cancel();
        assert!(!ticker.is_active());
        assert_eq!(ticker.poll(start + Duration::from_secs(5)), 0);
        assert_eq!(ticker.next_due(), None);
    }

    #[test]
    fn test_restart_resets_count() {
        let mut ticker = Ticker::new(Duration::from_secs(1));
        let start = Instant::now();
        ticker.start(start);
        ticker.poll(start + Duration::from_secs(2));

        let later = start + Duration::from_secs(10);
        ticker.start(later);
        assert_eq!(ticker.total_ticks(), 0);
        assert_eq!(ticker.poll(later + Duration::from_secs(1)), 1);
    }
}
