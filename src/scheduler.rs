//! Cooperative fixed-period scheduler.
//!
//! A small, fixed table of periodic tasks shares the single run-loop context.
//! Every pass reads the clock once and runs each task whose due time has
//! arrived, in registration order. Tasks run to completion; a task that never
//! returns starves everything registered with it, so task bodies must keep a
//! bounded worst-case execution time.
//!
//! ```text
//! loop {
//!     now = clock.now_ms()
//!     for task in registration order:
//!         if task due at now: task.run(now)   // task advances its own due time
//! }
//! ```

use heapless::Vec;

/// Monotonic millisecond source. Wraps silently at `u32::MAX`.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

/// Due-time bookkeeping for one periodic task.
///
/// The due time only ever advances by whole periods from its previous value,
/// never from "now", so a late pass does not shift the task's phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub struct Schedule {
    next_due: u32,
    period: u32,
}

impl Schedule {
    /// A schedule first due at `first_due` and every `period` ms after.
    pub const fn new(first_due: u32, period: u32) -> Self {
        Self {
            next_due: first_due,
            period,
        }
    }

    pub const fn next_due(&self) -> u32 {
        self.next_due
    }

    pub const fn period(&self) -> u32 {
        self.period
    }

    /// True once `now` has reached the due time.
    ///
    /// Wrap-safe: correct while the task is less than half the clock range
    /// (~24 days) behind or ahead.
    pub const fn is_due(&self, now: u32) -> bool {
        now.wrapping_sub(self.next_due) as i32 >= 0
    }

    /// Moves the due time forward by one period.
    pub fn advance(&mut self) {
        self.next_due = self.next_due.wrapping_add(self.period);
    }
}

/// A periodic activity driven by the [`Scheduler`].
///
/// Implementations own a [`Schedule`] and must call [`Schedule::advance`]
/// from `run` before returning.
pub trait PeriodicTask {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn schedule(&self) -> &Schedule;

    /// Performs one bounded unit of work and reschedules.
    fn run(&mut self, now: u32);
}

/// Returned when the fixed task table has no free slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub struct SchedulerFull;

/// Fixed-capacity, registration-ordered task table.
pub struct Scheduler<'a, const N: usize> {
    tasks: Vec<&'a mut dyn PeriodicTask, N>,
}

impl<'a, const N: usize> Scheduler<'a, N> {
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Appends a task. Only done during startup; tasks are never removed.
    pub fn register(&mut self, task: &'a mut dyn PeriodicTask) -> Result<(), SchedulerFull> {
        #[cfg(feature = "debug-mode")]
        defmt::info!(
            "registering task {} (period {} ms)",
            task.name(),
            task.schedule().period()
        );

        self.tasks.push(task).map_err(|_| SchedulerFull)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Runs one pass at time `now` and returns how many tasks executed.
    ///
    /// Each task is checked once per pass; a task several periods behind
    /// runs once here and again on following passes until it catches up.
    pub fn run_pass(&mut self, now: u32) -> usize {
        let mut executed = 0;
        for task in self.tasks.iter_mut() {
            if task.schedule().is_due(now) {
                #[cfg(feature = "debug-mode")]
                defmt::trace!("t={} running {}", now, task.name());

                task.run(now);
                executed += 1;
            }
        }
        executed
    }

    /// Reads `clock` once and runs one pass.
    pub fn poll<C: Clock>(&mut self, clock: &C) -> usize {
        self.run_pass(clock.now_ms())
    }
}

impl<const N: usize> Default for Scheduler<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}
