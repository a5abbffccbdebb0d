//! Motion counter shared between the tilt interrupt and the cadence task.
//!
//! The counter is the only state touched from two execution contexts. Each
//! context is restricted to one direction of update:
//!
//! - **Interrupt context** (tilt switch edge): [`MotionCounter::record_edge`],
//!   a saturating increment.
//! - **Run loop** (cadence decision task): [`MotionCounter::decay`], a
//!   flooring decrement.
//!
//! Both go through a single `AtomicU8`, so there is no lock. On the single-core
//! target `fetch_update` is implemented by masking interrupts for a handful of
//! instructions, which keeps the interrupt path constant-time.

use portable_atomic::{AtomicU8, Ordering};

use crate::config;

/// Bounds and step sizes of a motion counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionConfig {
    /// Saturation point of the counter.
    pub ceiling: u8,
    /// Added per tilt edge.
    pub increment: u8,
    /// Removed per cadence cycle.
    pub decay: u8,
}

/// Bounded motion intensity counter in `[0, ceiling]`.
pub struct MotionCounter {
    count: AtomicU8,
    config: MotionConfig,
}

/// The counter fed by the tilt switch interrupt.
pub static MOTION_COUNTER: MotionCounter = MotionCounter::new(config::MOTION);

impl MotionCounter {
    pub const fn new(config: MotionConfig) -> Self {
        Self {
            count: AtomicU8::new(0),
            config,
        }
    }

    /// Records one qualifying motion edge.
    ///
    /// Interrupt context only. Saturates at the ceiling; never wraps.
    pub fn record_edge(&self) {
        let MotionConfig {
            ceiling, increment, ..
        } = self.config;
        let _ = self
            .count
            .fetch_update(Ordering::Release, Ordering::Relaxed, |count| {
                Some(count.saturating_add(increment).min(ceiling))
            });
    }

    /// Applies one decay step and returns the decayed value.
    ///
    /// Run-loop context only. Floors at zero.
    pub fn decay(&self) -> u8 {
        let step = self.config.decay;
        let previous = match self
            .count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                Some(count.saturating_sub(step))
            }) {
            Ok(previous) | Err(previous) => previous,
        };
        previous.saturating_sub(step)
    }

    /// Current value. May be one step stale relative to an in-flight edge.
    pub fn level(&self) -> u8 {
        self.count.load(Ordering::Acquire)
    }

    pub fn config(&self) -> MotionConfig {
        self.config
    }
}
