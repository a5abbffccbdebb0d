//! Compile-time configuration for the necklace.
//!
//! Every tunable lives here. Nothing is adjustable at runtime; the task
//! constructors take these values (or the `const` bundles built from them)
//! once at boot.

use crate::cadence::CadenceBands;
use crate::motion::MotionConfig;

/// Cadence decision rate. The motion counter decays once per period.
pub const CADENCE_PERIOD_MS: u32 = 100;

/// Photocell sampling rate.
pub const LIGHT_PERIOD_MS: u32 = 1000;

/// LED renderer tick. Blink half-periods are whole multiples of this.
pub const RENDER_PERIOD_MS: u32 = 100;

/// Upper bound of the motion counter (no further debounce above this).
pub const MOTION_COUNT_MAX: u8 = 100;

/// Added to the motion counter on every tilt edge.
pub const MOTION_INCREMENT: u8 = 1;

/// Removed from the motion counter on every cadence cycle.
pub const MOTION_DECAY: u8 = 1;

/// Counter values 100..=60 blink fast.
pub const CADENCE_THRESHOLD_FAST: u8 = 60;

/// Counter values 59..=20 blink at medium rate, 19..=0 slow.
pub const CADENCE_THRESHOLD_MEDIUM: u8 = 20;

/// Named ambient light levels, on the 8-bit photocell scale.
///
/// The lower the gate, the darker it has to be before the necklace LEDs
/// turn on. The pendant LED is not gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
#[repr(u8)]
pub enum LightLevel {
    Dark = 10,
    Sundown = 40,
    Twilight = 70,
}

impl LightLevel {
    pub const fn level(self) -> u8 {
        self as u8
    }
}

/// Readings strictly below this enable the necklace LEDs.
pub const LIGHT_THRESHOLD: u8 = LightLevel::Sundown.level();

/// Render ticks between necklace LED swaps, per cadence tier.
pub const FAST_HALF_PERIOD_TICKS: u8 = 1;
pub const MEDIUM_HALF_PERIOD_TICKS: u8 = 3;
pub const SLOW_HALF_PERIOD_TICKS: u8 = 6;

/// Motion counter parameters used by the firmware.
pub const MOTION: MotionConfig = MotionConfig {
    ceiling: MOTION_COUNT_MAX,
    increment: MOTION_INCREMENT,
    decay: MOTION_DECAY,
};

/// Tier boundaries used by the firmware.
pub const BANDS: CadenceBands = CadenceBands {
    fast: CADENCE_THRESHOLD_FAST,
    medium: CADENCE_THRESHOLD_MEDIUM,
};

/// Maximum number of tasks the scheduler table holds.
pub const MAX_TASKS: usize = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_presets_match_photocell_scale() {
        assert_eq!(LightLevel::Dark.level(), 10);
        assert_eq!(LightLevel::Sundown.level(), 40);
        assert_eq!(LightLevel::Twilight.level(), 70);
        assert_eq!(LIGHT_THRESHOLD, 40);
    }

    #[test]
    fn bands_partition_counter_range() {
        assert!(BANDS.medium < BANDS.fast);
        assert!(BANDS.fast <= MOTION.ceiling);
        assert!(MOTION.decay > 0);
    }
}
