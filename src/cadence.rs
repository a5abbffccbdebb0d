//! Motion-driven cadence decision.
//!
//! Once per period the task
//!
//! 1. decays the motion counter by one step (always, whatever the outcome),
//! 2. classifies the decayed value into a [`CadenceTier`],
//! 3. gates actuation on the last light reading,
//! 4. publishes the resulting [`Decision`] to an [`Actuator`].

use crate::config;
use crate::light::LightReading;
use crate::motion::MotionCounter;
use crate::scheduler::{PeriodicTask, Schedule};

/// LED blink-rate class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub enum CadenceTier {
    Slow,
    Medium,
    Fast,
}

impl CadenceTier {
    /// Maps a decayed motion count to a tier.
    ///
    /// Bands are closed on their lower bound: a count equal to a threshold
    /// belongs to the higher tier.
    pub const fn classify(count: u8, bands: &CadenceBands) -> Self {
        if count >= bands.fast {
            CadenceTier::Fast
        } else if count >= bands.medium {
            CadenceTier::Medium
        } else {
            CadenceTier::Slow
        }
    }

    /// Renderer ticks between necklace LED swaps.
    pub const fn half_period_ticks(self) -> u8 {
        match self {
            CadenceTier::Fast => config::FAST_HALF_PERIOD_TICKS,
            CadenceTier::Medium => config::MEDIUM_HALF_PERIOD_TICKS,
            CadenceTier::Slow => config::SLOW_HALF_PERIOD_TICKS,
        }
    }
}

/// Lower bounds of the FAST and MEDIUM bands. Everything below `medium` is SLOW.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CadenceBands {
    pub fast: u8,
    pub medium: u8,
}

/// Light gate: actuation runs only while it is darker than `threshold`.
pub const fn actuation_enabled(light_level: u8, threshold: u8) -> bool {
    light_level < threshold
}

/// Output of one cadence cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub struct Decision {
    pub tier: CadenceTier,
    /// False in daylight; the necklace LEDs stay dark regardless of tier.
    pub enabled: bool,
    /// Motion counter had not fully decayed this cycle.
    pub moving: bool,
}

impl Decision {
    /// What the actuator shows before the first cadence cycle.
    pub const IDLE: Decision = Decision {
        tier: CadenceTier::Slow,
        enabled: false,
        moving: false,
    };
}

/// Consumer of cadence decisions.
pub trait Actuator {
    fn publish(&mut self, decision: Decision);
}

impl<T: Actuator + ?Sized> Actuator for &mut T {
    fn publish(&mut self, decision: Decision) {
        (**self).publish(decision)
    }
}

#[cfg(feature = "debug-mode")]
fn log_transition(previous: Option<Decision>, decision: Decision, count: u8) {
    if previous != Some(decision) {
        defmt::info!("motion {} -> {}", count, decision);
    }
}

/// Periodic task turning motion and light into a [`Decision`].
pub struct CadenceTask<'a, O> {
    schedule: Schedule,
    motion: &'a MotionCounter,
    light: &'a LightReading,
    bands: CadenceBands,
    light_threshold: u8,
    actuator: O,
    last: Option<Decision>,
}

impl<'a, O: Actuator> CadenceTask<'a, O> {
    pub fn new(
        motion: &'a MotionCounter,
        light: &'a LightReading,
        actuator: O,
        first_due: u32,
        period: u32,
    ) -> Self {
        Self {
            schedule: Schedule::new(first_due, period),
            motion,
            light,
            bands: config::BANDS,
            light_threshold: config::LIGHT_THRESHOLD,
            actuator,
            last: None,
        }
    }

    /// Overrides the tier boundaries and light gate.
    pub fn with_thresholds(mut self, bands: CadenceBands, light_threshold: u8) -> Self {
        self.bands = bands;
        self.light_threshold = light_threshold;
        self
    }

    /// Runs steps 1 to 4 once and returns what was published.
    pub fn decide(&mut self) -> Decision {
        let count = self.motion.decay();
        let decision = Decision {
            tier: CadenceTier::classify(count, &self.bands),
            enabled: actuation_enabled(self.light.level(), self.light_threshold),
            moving: count > 0,
        };

        #[cfg(feature = "debug-mode")]
        log_transition(self.last, decision, count);

        self.last = Some(decision);
        self.actuator.publish(decision);
        decision
    }

    /// Decision published by the most recent cycle.
    pub fn last_decision(&self) -> Option<Decision> {
        self.last
    }

    pub fn actuator(&self) -> &O {
        &self.actuator
    }
}

impl<O: Actuator> PeriodicTask for CadenceTask<'_, O> {
    fn name(&self) -> &'static str {
        "cadence"
    }

    fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn run(&mut self, _now: u32) {
        self.decide();
        self.schedule.advance();
    }
}
