//! Logical clock with cancellable repeating timers
//!
//! The host advances time explicitly; due timers are handed out one firing
//! at a time so the caller can cancel timers between firings and have the
//! cancellation take effect immediately.

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Timer<T> {
    handle: TimerHandle,
    task: T,
    period_ms: u64,
    next_due_ms: u64,
}

/// Repeating timers over a logical millisecond clock
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now_ms: u64,
    timers: Vec<Timer<T>>,
    next_handle: u64,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            timers: Vec::new(),
            next_handle: 1,
        }
    }

    /// Current logical time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Fire `task` every `period_ms`, first one period from now
    pub fn schedule_repeating(&mut self, task: T, period_ms: u64) -> TimerHandle {
        let period_ms = period_ms.max(1);
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.timers.push(Timer {
            handle,
            task,
            period_ms,
            next_due_ms: self.now_ms + period_ms,
        });
        handle
    }

    /// Stop a timer. Cancelling an unknown or already cancelled handle is a no-op.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        self.timers.len() != before
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    /// Move the clock forward without firing anything past `until_ms`
    pub fn advance_to(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}

impl<T: Copy> Scheduler<T> {
    /// Pop the earliest firing due at or before `until_ms`.
    ///
    /// The clock jumps to that firing's due time and the timer is re-armed
    /// one period later. Timers due at the same instant fire in the order
    /// they were scheduled.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<T> {
        let timer = self
            .timers
            .iter_mut()
            .filter(|t| t.next_due_ms <= until_ms)
            .min_by_key(|t| (t.next_due_ms, t.handle))?;

        let due = timer.next_due_ms;
        timer.next_due_ms += timer.period_ms;
        let task = timer.task;
        self.now_ms = self.now_ms.max(due);
        Some(task)
    }
}
