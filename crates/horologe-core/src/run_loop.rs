//! Single-threaded run loop with recurring timers.
//!
//! The run loop is the one execution context clock work happens on. It never
//! spawns threads and never sleeps: the host event loop calls [`RunLoop::run_due`]
//! when it wakes and uses [`RunLoop::next_deadline`] to decide how long to sleep.
//!
//! `RunLoop` and [`TimerHandle`] are built on `Rc`, so they are `!Send`: a loop
//! created on the UI thread can only ever be driven from the UI thread.
//!
//! Timer semantics:
//! - fires are serialized; a callback always runs to completion before the next one starts
//! - a late loop fires each overdue timer once and snaps its next deadline onto the
//!   period grid after `now` (no burst of catch-up fires)
//! - cancelling (explicitly or by dropping the handle) takes effect immediately,
//!   even from inside a callback

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use crate::error::ClockError;

type Callback = Box<dyn FnMut()>;

/// Identifies a scheduled timer within its run loop.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TimerId(u64);

struct TimerSlot {
    id: TimerId,
    period: Duration,
    deadline: Instant,
    /// `None` while the callback is executing.
    callback: Option<Callback>,
}

#[derive(Default)]
struct TimerQueue {
    next_id: u64,
    slots: Vec<TimerSlot>,
}

impl TimerQueue {
    fn insert(&mut self, start: Instant, period: Duration, callback: Callback) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.slots.push(TimerSlot {
            id,
            period,
            deadline: start + period,
            callback: Some(callback),
        });
        id
    }

    /// Removes the timer; returns its callback (if not currently running) so the
    /// caller can drop it outside the borrow.
    fn remove(&mut self, id: TimerId) -> Option<Option<Callback>> {
        let pos = self.slots.iter().position(|s| s.id == id)?;
        Some(self.slots.swap_remove(pos).callback)
    }

    /// Takes the earliest due callback out of the queue and moves its deadline forward.
    fn take_due(&mut self, now: Instant) -> Option<(TimerId, Callback)> {
        let slot = self
            .slots
            .iter_mut()
            .filter(|s| s.callback.is_some() && s.deadline <= now)
            .min_by_key(|s| (s.deadline, s.id))?;

        slot.deadline = next_deadline_after(slot.deadline, slot.period, now);
        let callback = slot.callback.take()?;
        Some((slot.id, callback))
    }

    /// Puts a callback back after it ran. Hands it back if the timer was cancelled meanwhile.
    fn restore(&mut self, id: TimerId, callback: Callback) -> Option<Callback> {
        match self.slots.iter_mut().find(|s| s.id == id) {
            Some(slot) => {
                slot.callback = Some(callback);
                None
            }
            None => Some(callback),
        }
    }
}

fn next_deadline_after(deadline: Instant, period: Duration, now: Instant) -> Instant {
    let period_ns = period.as_nanos();
    let behind_ns = now.saturating_duration_since(deadline).as_nanos();
    let steps = behind_ns / period_ns + 1;

    u64::try_from(steps * period_ns)
        .ok()
        .and_then(|ns| deadline.checked_add(Duration::from_nanos(ns)))
        .unwrap_or(now + period)
}

/// Handle to the run loop. Clones share the same timer queue.
#[derive(Clone, Default)]
pub struct RunLoop {
    queue: Rc<RefCell<TimerQueue>>,
}

impl RunLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `callback` every `period`, first fire one period from now.
    pub fn schedule_repeating<F>(&self, period: Duration, callback: F) -> Result<TimerHandle, ClockError>
    where
        F: FnMut() + 'static,
    {
        self.schedule_repeating_at(Instant::now(), period, callback)
    }

    /// Like [`schedule_repeating`](Self::schedule_repeating) with an explicit start
    /// instant; the first fire is due at `start + period`.
    pub fn schedule_repeating_at<F>(
        &self,
        start: Instant,
        period: Duration,
        callback: F,
    ) -> Result<TimerHandle, ClockError>
    where
        F: FnMut() + 'static,
    {
        if period.is_zero() {
            return Err(ClockError::InvalidPeriod);
        }

        let id = self.queue.borrow_mut().insert(start, period, Box::new(callback));
        log::trace!("scheduled timer {id:?} every {period:?}");

        Ok(TimerHandle {
            id,
            queue: Rc::downgrade(&self.queue),
        })
    }

    /// Fires every timer due at `now`, earliest deadline first. Returns the number of fires.
    pub fn run_due(&self, now: Instant) -> usize {
        let mut fired = 0;

        loop {
            // The borrow ends before the callback runs so callbacks may schedule or cancel.
            let due = self.queue.borrow_mut().take_due(now);
            let Some((id, mut callback)) = due else { break };

            callback();
            fired += 1;

            let orphan = self.queue.borrow_mut().restore(id, callback);
            drop(orphan);
        }

        fired
    }

    /// Earliest pending deadline, if any timer is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.borrow().slots.iter().map(|s| s.deadline).min()
    }

    /// Number of live timers.
    pub fn active_timers(&self) -> usize {
        self.queue.borrow().slots.len()
    }
}

impl fmt::Debug for RunLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunLoop")
            .field("active_timers", &self.active_timers())
            .field("next_deadline", &self.next_deadline())
            .finish()
    }
}

/// Owned handle to a recurring timer. Dropping it cancels the timer.
pub struct TimerHandle {
    id: TimerId,
    queue: Weak<RefCell<TimerQueue>>,
}

impl TimerHandle {
    #[inline]
    pub fn id(&self) -> TimerId {
        self.id
    }

    /// Whether the timer is still scheduled.
    pub fn is_active(&self) -> bool {
        let Some(queue) = self.queue.upgrade() else { return false };
        let queue = queue.borrow();
        queue.slots.iter().any(|s| s.id == self.id)
    }

    /// Invalidates the timer. No callback fires after this returns. Idempotent.
    pub fn cancel(&mut self) {
        let Some(queue) = self.queue.upgrade() else { return };
        let removed = queue.borrow_mut().remove(self.id);
        if removed.is_some() {
            log::trace!("cancelled timer {:?}", self.id);
        }
        // Captured state is dropped here, outside the queue borrow.
        drop(removed);
        self.queue = Weak::new();
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    const SEC: Duration = Duration::from_secs(1);

    fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, move || c.set(c.get() + 1))
    }

    #[test]
    fn zero_period_is_rejected() {
        let rl = RunLoop::new();
        let err = rl.schedule_repeating(Duration::ZERO, || {}).unwrap_err();
        assert_eq!(err, ClockError::InvalidPeriod);
        assert_eq!(rl.active_timers(), 0);
    }

    #[test]
    fn fires_once_per_period() {
        let rl = RunLoop::new();
        let t0 = Instant::now();
        let (count, cb) = counter();
        let _timer = rl.schedule_repeating_at(t0, SEC, cb).unwrap();

        assert_eq!(rl.run_due(t0 + Duration::from_millis(999)), 0);
        assert_eq!(rl.run_due(t0 + SEC), 1);
        assert_eq!(rl.run_due(t0 + SEC), 0);
        assert_eq!(rl.run_due(t0 + 2 * SEC), 1);
        assert_eq!(count.get(), 2);
        assert_eq!(rl.next_deadline(), Some(t0 + 3 * SEC));
    }

    #[test]
    fn stepping_ten_seconds_gives_ten_fires() {
        let rl = RunLoop::new();
        let t0 = Instant::now();
        let (count, cb) = counter();
        let _timer = rl.schedule_repeating_at(t0, SEC, cb).unwrap();

        for step in 1..=100u32 {
            rl.run_due(t0 + Duration::from_millis(100) * step);
        }
        assert_eq!(count.get(), 10);
    }

    #[test]
    fn late_loop_coalesces_missed_fires() {
        let rl = RunLoop::new();
        let t0 = Instant::now();
        let (count, cb) = counter();
        let _timer = rl.schedule_repeating_at(t0, SEC, cb).unwrap();

        assert_eq!(rl.run_due(t0 + Duration::from_millis(3500)), 1);
        assert_eq!(count.get(), 1);
        assert_eq!(rl.next_deadline(), Some(t0 + 4 * SEC));
    }

    #[test]
    fn dropping_handle_cancels() {
        let rl = RunLoop::new();
        let t0 = Instant::now();
        let (count, cb) = counter();
        let timer = rl.schedule_repeating_at(t0, SEC, cb).unwrap();
        assert!(timer.is_active());

        drop(timer);
        assert_eq!(rl.active_timers(), 0);
        assert_eq!(rl.run_due(t0 + 10 * SEC), 0);
        assert_eq!(count.get(), 0);
        assert_eq!(rl.next_deadline(), None);
    }

    #[test]
    fn cancel_is_idempotent() {
        let rl = RunLoop::new();
        let mut timer = rl.schedule_repeating(SEC, || {}).unwrap();
        timer.cancel();
        timer.cancel();
        assert!(!timer.is_active());
    }

    #[test]
    fn handle_outliving_loop_is_harmless() {
        let rl = RunLoop::new();
        let mut timer = rl.schedule_repeating(SEC, || {}).unwrap();
        drop(rl);
        assert!(!timer.is_active());
        timer.cancel();
    }

    #[test]
    fn callback_may_cancel_its_own_timer() {
        let rl = RunLoop::new();
        let t0 = Instant::now();
        let slot: Rc<RefCell<Option<TimerHandle>>> = Rc::new(RefCell::new(None));
        let (count, mut bump) = counter();

        let inner = slot.clone();
        let handle = rl
            .schedule_repeating_at(t0, SEC, move || {
                bump();
                // Dropping the handle from inside the callback.
                inner.borrow_mut().take();
            })
            .unwrap();
        *slot.borrow_mut() = Some(handle);

        assert_eq!(rl.run_due(t0 + SEC), 1);
        assert_eq!(rl.active_timers(), 0);
        assert_eq!(rl.run_due(t0 + 5 * SEC), 0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn callback_may_schedule_timers() {
        let rl = RunLoop::new();
        let t0 = Instant::now();
        let spawned: Rc<RefCell<Vec<TimerHandle>>> = Rc::new(RefCell::new(Vec::new()));

        let rl2 = rl.clone();
        let sink = spawned.clone();
        let _timer = rl
            .schedule_repeating_at(t0, SEC, move || {
                let h = rl2.schedule_repeating_at(t0 + SEC, SEC, || {}).unwrap();
                sink.borrow_mut().push(h);
            })
            .unwrap();

        assert_eq!(rl.run_due(t0 + SEC), 1);
        assert_eq!(rl.active_timers(), 2);
        assert_eq!(spawned.borrow().len(), 1);
    }

    #[test]
    fn due_timers_fire_in_deadline_order() {
        let rl = RunLoop::new();
        let t0 = Instant::now();
        let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        let _slow = rl
            .schedule_repeating_at(t0, 2 * SEC, move || l.borrow_mut().push("slow"))
            .unwrap();
        let l = log.clone();
        let _fast = rl
            .schedule_repeating_at(t0, SEC, move || l.borrow_mut().push("fast"))
            .unwrap();

        rl.run_due(t0 + 2 * SEC);
        assert_eq!(*log.borrow(), vec!["fast", "slow"]);
    }

    #[test]
    fn next_deadline_snaps_to_grid() {
        let t0 = Instant::now();
        assert_eq!(next_deadline_after(t0, SEC, t0), t0 + SEC);
        assert_eq!(next_deadline_after(t0, SEC, t0 + Duration::from_millis(2100)), t0 + 3 * SEC);
        assert_eq!(next_deadline_after(t0, SEC, t0 + 2 * SEC), t0 + 3 * SEC);
    }
}
