use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

const SLEEP_SLICE: Duration = Duration::from_millis(500);

/// Fixed-interval pacing between iterations. The full interval elapses
/// regardless of what the previous iteration did; the sleep is sliced
/// only so a shutdown signal is noticed within half a second.
pub struct IntervalPacer {
    interval: Duration,
}

impl IntervalPacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn sleep(&self, shutdown: &AtomicBool) {
        let mut remaining = self.interval;
        while remaining > Duration::ZERO && !shutdown.load(Ordering::Relaxed) {
            let step = remaining.min(SLEEP_SLICE);
            thread::sleep(step);
            remaining -= step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn sleeps_the_full_interval() {
        let pacer = IntervalPacer::new(Duration::from_millis(50));
        let shutdown = AtomicBool::new(false);

        let start = Instant::now();
        pacer.sleep(&shutdown);

        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn returns_immediately_when_shutdown_is_set() {
        let pacer = IntervalPacer::new(Duration::from_secs(240));
        let shutdown = AtomicBool::new(true);

        let start = Instant::now();
        pacer.sleep(&shutdown);

        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
