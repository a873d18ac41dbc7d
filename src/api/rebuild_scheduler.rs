use chrono::{DateTime, TimeDelta, Utc};
use tracing::trace;

/// Pending debounced rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRebuild {
    pub due_at: DateTime<Utc>,
    /// Selection generation the rebuild was scheduled under.
    pub generation: u64,
}

/// Coalesces bursts of rebuild triggers into one rebuild after a quiet period.
///
/// Scheduling replaces any pending rebuild; a rebuild scheduled under an older
/// generation never fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildScheduler {
    delay: TimeDelta,
    pending: Option<PendingRebuild>,
}

impl RebuildScheduler {
    #[must_use]
    pub fn new(delay: TimeDelta) -> Self {
        Self {
            delay: delay.max(TimeDelta::zero()),
            pending: None,
        }
    }

    #[must_use]
    pub fn delay(self) -> TimeDelta {
        self.delay
    }

    #[must_use]
    pub fn pending(self) -> Option<PendingRebuild> {
        self.pending
    }

    #[must_use]
    pub fn is_pending(self) -> bool {
        self.pending.is_some()
    }

    pub fn schedule(&mut self, now: DateTime<Utc>, generation: u64) {
        let due_at = now + self.delay;
        trace!(%due_at, generation, replaced = self.pending.is_some(), "rebuild scheduled");
        self.pending = Some(PendingRebuild { due_at, generation });
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Consumes the pending rebuild when due; returns whether it should run.
    pub fn poll(&mut self, now: DateTime<Utc>, current_generation: u64) -> bool {
        let Some(pending) = self.pending else {
            return false;
        };
        if pending.generation != current_generation {
            trace!(
                scheduled = pending.generation,
                current_generation,
                "dropping rebuild from older generation"
            );
            self.pending = None;
            return false;
        }
        if now < pending.due_at {
            return false;
        }
        self.pending = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone, Utc};

    use super::RebuildScheduler;

    #[test]
    fn burst_of_triggers_fires_once_after_last_one() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("valid instant");
        let mut scheduler = RebuildScheduler::new(TimeDelta::milliseconds(250));

        scheduler.schedule(start, 0);
        scheduler.schedule(start + TimeDelta::milliseconds(200), 0);

        assert!(!scheduler.poll(start + TimeDelta::milliseconds(300), 0));
        assert!(scheduler.poll(start + TimeDelta::milliseconds(450), 0));
        assert!(!scheduler.poll(start + TimeDelta::milliseconds(900), 0));
    }

    #[test]
    fn generation_change_drops_pending_rebuild() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("valid instant");
        let mut scheduler = RebuildScheduler::new(TimeDelta::milliseconds(10));

        scheduler.schedule(start, 3);
        assert!(!scheduler.poll(start + TimeDelta::seconds(1), 4));
        assert!(!scheduler.is_pending());
    }
}
