//! Single-slot debounce scheduler for the lookup trigger.
//!
//! The cockpit owns exactly one pending lookup timer: arming the slot
//! replaces any not-yet-fired deadline (last-keystroke-wins), and the
//! slot fires at most once per arm when the UI tick reaches the deadline.

/// A single-slot tick-deadline scheduler.
///
/// Holds at most one pending deadline; `arm` is an explicit replace, so
/// two timers can never coexist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebounceSlot {
    deadline: Option<u64>,
}

impl DebounceSlot {
    #[must_use]
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Schedule (or reschedule) the slot to fire `quiet_ticks` after
    /// `now_tick`. Any previously pending deadline is replaced.
    pub fn arm(&mut self, now_tick: u64, quiet_ticks: u64) {
        self.deadline = Some(now_tick.saturating_add(quiet_ticks));
    }

    /// Drop any pending deadline.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` exactly once when the deadline is reached; the slot
    /// returns to idle afterwards.
    pub fn fire_if_due(&mut self, now_tick: u64) -> bool {
        match self.deadline {
            Some(deadline) if now_tick >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Convert a quiet period in milliseconds to UI ticks, rounding up so the
/// quiet period is never shortened.
#[must_use]
pub fn quiet_ticks(debounce_ms: u64, tick_interval_ms: u64) -> u64 {
    if tick_interval_ms == 0 {
        return debounce_ms;
    }
    debounce_ms.div_ceil(tick_interval_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn idle_slot_never_fires() {
        let mut slot = DebounceSlot::new();
        assert!(!slot.is_pending());
        for tick in 0..100 {
            assert!(!slot.fire_if_due(tick));
        }
    }

    #[test]
    fn fires_once_after_quiet_period() {
        let mut slot = DebounceSlot::new();
        slot.arm(10, 20);
        assert!(slot.is_pending());
        assert!(!slot.fire_if_due(29));
        assert!(slot.fire_if_due(30));
        assert!(!slot.is_pending());
        assert!(!slot.fire_if_due(31));
    }

    #[test]
    fn rearm_replaces_pending_deadline() {
        let mut slot = DebounceSlot::new();
        slot.arm(0, 20);
        // A later keystroke pushes the deadline out; the first never fires.
        slot.arm(15, 20);
        assert!(!slot.fire_if_due(20));
        assert!(!slot.fire_if_due(34));
        assert!(slot.fire_if_due(35));
    }

    #[test]
    fn cancel_clears_pending() {
        let mut slot = DebounceSlot::new();
        slot.arm(0, 20);
        slot.cancel();
        assert!(!slot.is_pending());
        assert!(!slot.fire_if_due(100));
    }

    #[test]
    fn quiet_ticks_rounds_up() {
        assert_eq!(quiet_ticks(2000, 100), 20);
        assert_eq!(quiet_ticks(2000, 33), 61);
        assert_eq!(quiet_ticks(50, 100), 1);
        assert_eq!(quiet_ticks(0, 100), 0);
    }

    proptest! {
        /// Rapid keystrokes within the quiet period collapse to exactly
        /// one fire, at the deadline of the last arm.
        #[test]
        fn burst_of_arms_fires_exactly_once(
            gaps in proptest::collection::vec(0_u64..19, 1..20),
        ) {
            let quiet = 20_u64;
            let mut slot = DebounceSlot::new();
            let mut tick = 0_u64;
            let mut fires = 0_u32;
            for gap in &gaps {
                // Advance strictly less than the quiet period, so the
                // pending deadline never elapses between keystrokes.
                for _ in 0..*gap {
                    tick += 1;
                    if slot.fire_if_due(tick) {
                        fires += 1;
                    }
                }
                slot.arm(tick, quiet);
            }
            let last_arm_tick = tick;
            // Run well past the final deadline.
            for _ in 0..(quiet * 2) {
                tick += 1;
                if slot.fire_if_due(tick) {
                    fires += 1;
                    prop_assert_eq!(tick, last_arm_tick + quiet);
                }
            }
            prop_assert_eq!(fires, 1);
        }
    }
}
