//! Dual-cadence poll scheduler.

use crate::datapoints::config::PollConfig;
use crate::datapoints::data::Group;
use std::time::Duration;

/// Milliseconds on a free-running clock that wraps at `u32::MAX`.
pub type Millis = u32;

/// Groups found due on a single tick.
pub type DueGroups = heapless::Vec<Group, 2>;

/// Tracks when one group was last polled.
#[derive(Debug, Clone, Copy)]
pub struct GroupTimer {
    interval: Millis,
    last_poll: Option<Millis>,
}

impl GroupTimer {
    pub fn new(interval: Millis) -> Self {
        Self {
            interval,
            last_poll: None,
        }
    }

    pub fn interval(&self) -> Millis {
        self.interval
    }

    /// A timer that has never fired is always due.
    pub fn is_due(&self, now: Millis) -> bool {
        match self.last_poll {
            None => true,
            Some(last) => now.wrapping_sub(last) >= self.interval,
        }
    }

    /// Fire and restart the timer if due.
    pub fn fire_if_due(&mut self, now: Millis) -> bool {
        if self.is_due(now) {
            self.last_poll = Some(now);
            true
        } else {
            false
        }
    }
}

/// Decides on each tick which polling groups must be re-read.
///
/// Ticks are driven by the caller; elapsed time is computed with wrapping
/// subtraction so a clock rollover between two ticks is harmless.
#[derive(Debug, Clone)]
pub struct PollScheduler {
    fast: GroupTimer,
    slow: GroupTimer,
}

impl PollScheduler {
    pub fn new(fast: Millis, slow: Millis) -> Self {
        Self {
            fast: GroupTimer::new(fast),
            slow: GroupTimer::new(slow),
        }
    }

    pub fn from_config(config: &PollConfig) -> Self {
        Self::new(
            duration_to_millis(config.fast_interval),
            duration_to_millis(config.slow_interval),
        )
    }

    fn timer_mut(&mut self, group: Group) -> &mut GroupTimer {
        match group {
            Group::Fast => &mut self.fast,
            Group::Slow => &mut self.slow,
        }
    }

    pub fn interval(&self, group: Group) -> Millis {
        match group {
            Group::Fast => self.fast.interval(),
            Group::Slow => self.slow.interval(),
        }
    }

    /// Return every group that is due at `now`, restarting their timers.
    pub fn tick(&mut self, now: Millis) -> DueGroups {
        let mut due = DueGroups::new();
        for group in Group::ALL {
            if self.timer_mut(group).fire_if_due(now) {
                // capacity equals the number of groups
                let _ = due.push(group);
            }
        }
        due
    }
}

fn duration_to_millis(duration: Duration) -> Millis {
    Millis::try_from(duration.as_millis()).unwrap_or(Millis::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_at_start_and_after_full_interval() {
        let mut timer = GroupTimer::new(5);
        let fired: Vec<Millis> = [0, 1, 2, 5, 6]
            .into_iter()
            .filter(|&now| timer.fire_if_due(now))
            .collect();
        assert_eq!(fired, vec![0, 5]);
    }

    #[test]
    fn test_first_tick_polls_both_groups() {
        let mut scheduler = PollScheduler::new(300_000, 3_600_000);
        let due = scheduler.tick(12_345);
        assert_eq!(due.as_slice(), &[Group::Slow, Group::Fast]);
        assert!(scheduler.tick(12_346).is_empty());
    }

    #[test]
    fn test_groups_run_independently() {
        let mut scheduler = PollScheduler::new(10, 100);
        scheduler.tick(0);
        assert_eq!(scheduler.tick(10).as_slice(), &[Group::Fast]);
        assert_eq!(scheduler.tick(20).as_slice(), &[Group::Fast]);
        assert_eq!(scheduler.tick(100).as_slice(), &[Group::Slow, Group::Fast]);
    }

    #[test]
    fn test_clock_wraparound() {
        let mut timer = GroupTimer::new(5);
        assert!(timer.fire_if_due(u32::MAX - 1));
        // 2 ms elapsed across the rollover
        assert!(!timer.fire_if_due(0));
        // 5 ms elapsed
        assert!(timer.fire_if_due(3));
        assert!(!timer.fire_if_due(4));
    }

    #[test]
    fn test_late_tick_fires_once() {
        let mut timer = GroupTimer::new(5);
        timer.fire_if_due(0);
        assert!(timer.fire_if_due(17));
        assert!(!timer.fire_if_due(18));
        assert!(timer.fire_if_due(22));
    }

    #[test]
    fn test_from_config() {
        let scheduler = PollScheduler::from_config(&PollConfig::default());
        assert_eq!(scheduler.interval(Group::Fast), 300_000);
        assert_eq!(scheduler.interval(Group::Slow), 3_600_000);
    }
}
