// This file is only compiled during tests

use std::cell::Cell;
use std::time::{Duration, Instant};

use crate::button::Clock;

/// Manually-advanced clock so timed state machines run without sleeping.
pub struct MockClock {
    base: Instant,
    offset: Cell<Duration>,
}

impl MockClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Cell::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.base + self.offset.get()
    }
}
