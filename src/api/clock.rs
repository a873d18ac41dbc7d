use chrono::{DateTime, TimeDelta, Utc};

/// Source of the current instant for range cutoffs, debounce deadlines and
/// export file names.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Host-driven clock; only moves when told to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualClock {
    now: DateTime<Utc>,
}

impl ManualClock {
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    pub fn set(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }

    pub fn advance(&mut self, delta: TimeDelta) {
        self.now += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
