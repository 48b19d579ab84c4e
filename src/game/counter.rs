//! Counter + threshold
//!
//! Counts events and reports the moment a fixed limit is first reached.
//! Used for combo specials, wave completion and game-over checks.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdCounter {
    count: u32,
    threshold: u32,
    fired: bool,
}

impl ThresholdCounter {
    pub fn new(threshold: u32) -> Self {
        Self {
            count: 0,
            threshold,
            fired: false,
        }
    }

    /// Add one. Returns true exactly once: on the increment that first
    /// brings the count to the threshold. Later increments return false
    /// until `reset`.
    pub fn increment(&mut self) -> bool {
        self.add(1)
    }

    pub fn add(&mut self, amount: u32) -> bool {
        self.count = self.count.saturating_add(amount);
        if !self.fired && self.count >= self.threshold {
            self.fired = true;
            return true;
        }
        false
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Events still needed to reach the threshold
    pub fn remaining(&self) -> u32 {
        self.threshold.saturating_sub(self.count)
    }

    /// Back to zero and re-armed
    pub fn reset(&mut self) {
        self.count = 0;
        self.fired = false;
    }

    /// Reset with a new threshold (e.g. next wave size)
    pub fn rearm(&mut self, threshold: u32) {
        self.threshold = threshold;
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_exactly_once() {
        let mut counter = ThresholdCounter::new(3);
        let fired: Vec<bool> = (0..6).map(|_| counter.increment()).collect();
        assert_eq!(fired, vec![false, false, true, false, false, false]);
        assert_eq!(counter.count(), 6);
        assert!(counter.has_fired());
    }

    #[test]
    fn test_reset_rearms() {
        let mut counter = ThresholdCounter::new(2);
        counter.increment();
        assert!(counter.increment());
        counter.reset();
        assert_eq!(counter.remaining(), 2);
        assert!(!counter.increment());
        assert!(counter.increment());
    }

    #[test]
    fn test_bulk_add_crossing_threshold() {
        let mut counter = ThresholdCounter::new(5);
        assert!(!counter.add(4));
        assert!(counter.add(10));
        assert!(!counter.add(1));
    }

    #[test]
    fn test_rearm_with_new_threshold() {
        let mut counter = ThresholdCounter::new(3);
        counter.add(3);
        counter.rearm(4);
        assert_eq!(counter.count(), 0);
        assert_eq!(counter.threshold(), 4);
        assert!(!counter.has_fired());
    }
}
