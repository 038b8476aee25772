//! Deferred work.
//!
//! Nothing here owns a clock. Callers pass `now` in, read
//! [`Scheduler::next_deadline`], and pump [`Scheduler::pop_due`] when time
//! has advanced. That keeps every delay deterministic under test.

use node::NodeId;
use slotmap::SlotMap;
use std::time::{Duration, Instant};

slotmap::new_key_type! {
    /// Handle for a scheduled timer.
    pub struct TimerId;
}

/// Work a timer performs when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerTask {
    /// Trailing run of a throttled container expansion.
    Expand(NodeId),
    /// Grace delay before a child leaves its parent.
    ExitGroup { child: NodeId, parent: NodeId },
    /// Roll back previews that were not committed.
    RestorePreviews,
}

#[derive(Debug)]
struct Timer {
    deadline: Instant,
    seq: u64,
    task: TimerTask,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    timers: SlotMap<TimerId, Timer>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, deadline: Instant, task: TimerTask) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        log::trace!("schedule {:?} (#{})", task, seq);
        self.timers.insert(Timer {
            deadline,
            seq,
            task,
        })
    }

    /// Cancels a timer. Cancelling a fired or unknown timer is a no-op.
    pub fn cancel(&mut self, id: TimerId) -> Option<TimerTask> {
        self.timers.remove(id).map(|timer| timer.task)
    }

    /// Cancels every timer whose task matches, returns how many went.
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&TimerTask) -> bool) -> usize {
        let before = self.timers.len();
        self.timers.retain(|_, timer| !pred(&timer.task));
        before - self.timers.len()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    pub fn deadline(&self, id: TimerId) -> Option<Instant> {
        self.timers.get(id).map(|timer| timer.deadline)
    }

    /// Removes and returns the earliest timer due at `now`.
    ///
    /// Earlier deadlines come first; timers sharing a deadline fire in the
    /// order they were scheduled.
    pub fn pop_due(&mut self, now: Instant) -> Option<(TimerId, TimerTask)> {
        let id = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.deadline <= now)
            .min_by_key(|(_, timer)| (timer.deadline, timer.seq))
            .map(|(id, _)| id)?;
        self.timers.remove(id).map(|timer| (id, timer.task))
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.values().map(|timer| timer.deadline).min()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

/// Leading + trailing throttle.
///
/// The first call in a window runs at once. Calls inside the window
/// arrange exactly one trailing run at `last_run + interval`.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_run: Option<Instant>,
    trailing: Option<TimerId>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
            trailing: None,
        }
    }

    /// Returns true when the caller should run now. Otherwise `task` has
    /// been scheduled as the trailing run, or one already was.
    pub fn call(&mut self, now: Instant, scheduler: &mut Scheduler, task: TimerTask) -> bool {
        if let Some(id) = self.trailing {
            if scheduler.is_pending(id) {
                return false;
            }
            self.trailing = None;
        }

        match self.last_run {
            Some(last) if now < last + self.interval => {
                self.trailing = Some(scheduler.schedule(last + self.interval, task));
                false
            }
            _ => {
                self.last_run = Some(now);
                true
            }
        }
    }

    /// Marks the trailing run as performed.
    pub fn fired(&mut self, now: Instant) {
        self.trailing = None;
        self.last_run = Some(now);
    }

    pub fn has_trailing(&self) -> bool {
        self.trailing.is_some()
    }

    pub fn cancel(&mut self, scheduler: &mut Scheduler) {
        if let Some(id) = self.trailing.take() {
            scheduler.cancel(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_10: Duration = Duration::from_millis(10);
    const MS_16: Duration = Duration::from_millis(16);

    #[test]
    fn due_timers_fire_in_deadline_then_fifo_order() {
        let t = Instant::now();
        let a = NodeId::from_u128(1);
        let b = NodeId::from_u128(2);
        let mut scheduler = Scheduler::new();
        scheduler.schedule(t + MS_16, TimerTask::Expand(a));
        scheduler.schedule(t + MS_10, TimerTask::RestorePreviews);
        scheduler.schedule(t + MS_16, TimerTask::Expand(b));

        assert_eq!(scheduler.next_deadline(), Some(t + MS_10));
        assert!(scheduler.pop_due(t).is_none());

        let fired: Vec<_> = std::iter::from_fn(|| scheduler.pop_due(t + MS_16))
            .map(|(_, task)| task)
            .collect();
        assert_eq!(
            fired,
            vec![
                TimerTask::RestorePreviews,
                TimerTask::Expand(a),
                TimerTask::Expand(b)
            ]
        );
        assert!(scheduler.is_empty());
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let t = Instant::now();
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(t, TimerTask::RestorePreviews);
        assert!(scheduler.is_pending(id));
        assert_eq!(scheduler.cancel(id), Some(TimerTask::RestorePreviews));
        assert_eq!(scheduler.cancel(id), None);
        assert!(scheduler.pop_due(t + MS_16).is_none());
    }

    #[test]
    fn cancel_where_filters_by_task() {
        let t = Instant::now();
        let child = NodeId::from_u128(1);
        let parent = NodeId::from_u128(2);
        let mut scheduler = Scheduler::new();
        scheduler.schedule(t, TimerTask::ExitGroup { child, parent });
        scheduler.schedule(t, TimerTask::Expand(parent));
        let removed =
            scheduler.cancel_where(|task| matches!(task, TimerTask::ExitGroup { .. }));
        assert_eq!(removed, 1);
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn throttle_runs_leading_then_one_trailing() {
        let t = Instant::now();
        let id = NodeId::from_u128(1);
        let task = TimerTask::Expand(id);
        let mut scheduler = Scheduler::new();
        let mut throttle = Throttle::new(MS_16);

        assert!(throttle.call(t, &mut scheduler, task));
        assert!(!throttle.call(t + Duration::from_millis(4), &mut scheduler, task));
        assert!(!throttle.call(t + Duration::from_millis(8), &mut scheduler, task));
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.next_deadline(), Some(t + MS_16));

        let (_, fired) = scheduler.pop_due(t + MS_16).unwrap();
        assert_eq!(fired, task);
        throttle.fired(t + MS_16);

        // Window restarts at the trailing run.
        assert!(!throttle.call(t + Duration::from_millis(20), &mut scheduler, task));
        assert!(throttle.has_trailing());
        throttle.cancel(&mut scheduler);
        assert!(scheduler.is_empty());
        assert!(throttle.call(t + Duration::from_millis(40), &mut scheduler, task));
    }
}
