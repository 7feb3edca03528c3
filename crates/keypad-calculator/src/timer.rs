//! Scheduled callbacks: error auto-clear and cosmetic pulses
//!
//! The session never waits; it hands a [`TimerTask`] to a [`Scheduler`] and
//! gets it back through [`crate::session::CalculatorSession::fire`] when the
//! delay has passed. [`ManualScheduler`] keeps a virtual clock so tests
//! decide when time moves.

use crate::display::DisplayFlag;
use std::time::Duration;

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Work to run when a timer fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerTask {
    /// Reset the calculator after an error
    AutoClear,
    /// Lower a transient state flag
    RemoveFlag(DisplayFlag),
    /// Release the pressed state of a keypad button
    Release(String),
}

/// Schedules tasks to run after a delay
pub trait Scheduler {
    /// Schedules `task` to fire once after `delay`
    fn schedule(&mut self, delay: Duration, task: TimerTask) -> TimerId;

    /// Cancels a scheduled task; unknown or already fired ids are ignored
    fn cancel(&mut self, id: TimerId);
}

#[derive(Debug, Clone)]
struct Scheduled {
    id: TimerId,
    due: Duration,
    task: TimerTask,
}

/// Deterministic scheduler with a virtual clock
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    queue: Vec<Scheduled>,
}

impl ManualScheduler {
    /// Creates a scheduler at time zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of tasks still waiting to fire
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Whether a task equal to `task` is waiting
    #[must_use]
    pub fn is_scheduled(&self, task: &TimerTask) -> bool {
        self.queue.iter().any(|s| &s.task == task)
    }

    /// Moves the clock forward and returns the tasks that became due,
    /// ordered by deadline and then by scheduling order
    pub fn advance(&mut self, by: Duration) -> Vec<TimerTask> {
        self.now += by;
        let now = self.now;

        let (mut due, waiting): (Vec<_>, Vec<_>) =
            self.queue.drain(..).partition(|s| s.due <= now);
        self.queue = waiting;

        due.sort_by_key(|s| (s.due, s.id));
        due.into_iter().map(|s| s.task).collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration, task: TimerTask) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.queue.push(Scheduled {
            id,
            due: self.now + delay,
            task,
        });
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.queue.retain(|s| s.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_manual_scheduler_starts_empty() {
        let s = ManualScheduler::new();
        assert_eq!(s.now(), Duration::ZERO);
        assert_eq!(s.pending_count(), 0);
    }

    #[test]
    fn test_task_fires_after_delay() {
        let mut s = ManualScheduler::new();
        s.schedule(ms(2000), TimerTask::AutoClear);
        assert!(s.advance(ms(1999)).is_empty());
        assert_eq!(s.advance(ms(1)), vec![TimerTask::AutoClear]);
        assert_eq!(s.pending_count(), 0);
    }

    #[test]
    fn test_tasks_fire_in_deadline_order() {
        let mut s = ManualScheduler::new();
        s.schedule(ms(300), TimerTask::RemoveFlag(DisplayFlag::Success));
        s.schedule(ms(100), TimerTask::Release("btn-1".into()));
        s.schedule(ms(100), TimerTask::Release("btn-2".into()));
        assert_eq!(
            s.advance(ms(500)),
            vec![
                TimerTask::Release("btn-1".into()),
                TimerTask::Release("btn-2".into()),
                TimerTask::RemoveFlag(DisplayFlag::Success),
            ]
        );
    }

    #[test]
    fn test_cancel_removes_task() {
        let mut s = ManualScheduler::new();
        let id = s.schedule(ms(2000), TimerTask::AutoClear);
        assert!(s.is_scheduled(&TimerTask::AutoClear));
        s.cancel(id);
        assert!(!s.is_scheduled(&TimerTask::AutoClear));
        assert!(s.advance(ms(5000)).is_empty());
    }

    #[test]
    fn test_cancel_unknown_id_is_ignored() {
        let mut s = ManualScheduler::new();
        s.schedule(ms(10), TimerTask::AutoClear);
        s.cancel(TimerId(99));
        assert_eq!(s.pending_count(), 1);
    }

    #[test]
    fn test_delay_is_relative_to_current_time() {
        let mut s = ManualScheduler::new();
        s.advance(ms(1000));
        s.schedule(ms(100), TimerTask::AutoClear);
        assert!(s.advance(ms(50)).is_empty());
        assert_eq!(s.advance(ms(50)).len(), 1);
    }
}
