//! Combined-edit dispatch tracking
//!
//! Saving the edit dialog may fire an update-description call and a
//! change-cover call as two independent requests. The dialog closes only
//! once every dispatched call reports success; a failure leaves it open,
//! and a call that already succeeded is not rolled back.

/// Which half of a combined edit a result belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPart {
    /// The `posts/{id}` description update
    Description,
    /// The `posts/{id}/cover` upload
    Cover,
}

/// Progress of one combined edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditTracker {
    dispatched: u32,
    succeeded: u32,
    failed: u32,
}

impl EditTracker {
    /// Start tracking `dispatched` independent calls
    pub const fn new(dispatched: u32) -> Self {
        Self {
            dispatched,
            succeeded: 0,
            failed: 0,
        }
    }

    /// Record one successful call
    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    /// Record one failed call
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Every dispatched call succeeded; the dialog may close
    pub const fn is_complete(&self) -> bool {
        self.dispatched > 0 && self.succeeded == self.dispatched
    }

    /// Every dispatched call reported a terminal outcome
    pub const fn is_settled(&self) -> bool {
        self.succeeded + self.failed == self.dispatched
    }

    /// At least one call failed
    pub const fn has_failure(&self) -> bool {
        self.failed > 0
    }

    /// How many calls were dispatched
    pub const fn dispatched(&self) -> u32 {
        self.dispatched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closes_only_after_every_part_succeeds() {
        let mut tracker = EditTracker::new(2);
        tracker.record_success();
        assert!(!tracker.is_complete());
        assert!(!tracker.is_settled());

        tracker.record_success();
        assert!(tracker.is_complete());
        assert!(tracker.is_settled());
    }

    #[test]
    fn failure_settles_without_completing() {
        let mut tracker = EditTracker::new(2);
        tracker.record_success();
        tracker.record_failure();

        assert!(tracker.is_settled());
        assert!(!tracker.is_complete());
        assert!(tracker.has_failure());
    }

    #[test]
    fn single_part_edit() {
        let mut tracker = EditTracker::new(1);
        tracker.record_success();
        assert!(tracker.is_complete());
    }

    #[test]
    fn zero_dispatched_never_completes() {
        let tracker = EditTracker::new(0);
        assert!(!tracker.is_complete());
        assert!(tracker.is_settled());
    }
}
