//! Photocell sampling task and the shared light reading.

use core::cell::Cell;

use crate::scheduler::{PeriodicTask, Schedule};

/// One-shot 8-bit ADC used to sample the photocell.
///
/// Conversions are started, polled until complete and then read; the
/// platform has no notion of a failed or cancelled conversion.
pub trait LightAdc {
    /// Starts a single conversion.
    fn start_conversion(&mut self);

    /// True once the conversion started last has finished.
    fn conversion_complete(&mut self) -> bool;

    /// Result of the last finished conversion (0 = dark, 255 = bright).
    fn read_result(&mut self) -> u8;
}

/// Last known ambient light level.
///
/// Written only by [`LightSensor`], read only by the cadence task. Both run
/// in the run-loop context, so a plain `Cell` is enough. The value is never
/// invalidated between samples.
#[derive(Debug, Default)]
pub struct LightReading {
    level: Cell<u8>,
}

impl LightReading {
    pub const fn new() -> Self {
        Self {
            level: Cell::new(0),
        }
    }

    pub fn level(&self) -> u8 {
        self.level.get()
    }

    pub(crate) fn store(&self, level: u8) {
        self.level.set(level);
    }
}

/// Periodic task sampling the photocell into a [`LightReading`].
pub struct LightSensor<'a, A> {
    schedule: Schedule,
    adc: A,
    reading: &'a LightReading,
}

impl<'a, A: LightAdc> LightSensor<'a, A> {
    pub fn new(adc: A, reading: &'a LightReading, first_due: u32, period: u32) -> Self {
        Self {
            schedule: Schedule::new(first_due, period),
            adc,
            reading,
        }
    }

    /// The most recently stored sample.
    pub fn light_level(&self) -> u8 {
        self.reading.level()
    }

    /// Takes one sample, spinning until the converter is done.
    pub fn sample(&mut self) -> u8 {
        self.adc.start_conversion();
        while !self.adc.conversion_complete() {
            core::hint::spin_loop();
        }
        let level = self.adc.read_result();
        self.reading.store(level);
        level
    }
}

impl<A: LightAdc> PeriodicTask for LightSensor<'_, A> {
    fn name(&self) -> &'static str {
        "light"
    }

    fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn run(&mut self, _now: u32) {
        let _level = self.sample();

        #[cfg(feature = "debug-mode")]
        defmt::debug!("light level {}", _level);

        self.schedule.advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Converter that takes `latency` polls to finish and returns queued values.
    struct SlowAdc {
        values: &'static [u8],
        next: usize,
        latency: u8,
        pending: Option<u8>,
        polls: u32,
        conversions: u32,
    }

    impl SlowAdc {
        fn new(values: &'static [u8], latency: u8) -> Self {
            Self {
                values,
                next: 0,
                latency,
                pending: None,
                polls: 0,
                conversions: 0,
            }
        }
    }

    impl LightAdc for SlowAdc {
        fn start_conversion(&mut self) {
            self.pending = Some(self.latency);
            self.conversions += 1;
        }

        fn conversion_complete(&mut self) -> bool {
            self.polls += 1;
            match self.pending {
                Some(0) => true,
                Some(ref mut left) => {
                    *left -= 1;
                    false
                }
                None => false,
            }
        }

        fn read_result(&mut self) -> u8 {
            self.pending = None;
            let value = self.values[self.next % self.values.len()];
            self.next += 1;
            value
        }
    }

    #[test]
    fn reading_starts_dark() {
        let reading = LightReading::new();
        assert_eq!(reading.level(), 0);
    }

    #[test]
    fn sample_spins_until_conversion_completes() {
        let reading = LightReading::new();
        let mut sensor = LightSensor::new(SlowAdc::new(&[123], 3), &reading, 0, 1000);

        assert_eq!(sensor.sample(), 123);
        assert_eq!(sensor.adc.polls, 4);
        assert_eq!(sensor.adc.conversions, 1);
        assert_eq!(reading.level(), 123);
        assert_eq!(sensor.light_level(), 123);
    }

    #[test]
    fn run_overwrites_reading_and_advances_schedule() {
        let reading = LightReading::new();
        let mut sensor = LightSensor::new(SlowAdc::new(&[200, 15], 0), &reading, 0, 1000);

        sensor.run(0);
        assert_eq!(reading.level(), 200);
        assert_eq!(sensor.schedule().next_due(), 1000);

        sensor.run(1003);
        assert_eq!(reading.level(), 15);
        assert_eq!(sensor.schedule().next_due(), 2000);
    }

    #[test]
    fn reading_persists_between_samples() {
        let reading = LightReading::new();
        let mut sensor = LightSensor::new(SlowAdc::new(&[77], 1), &reading, 0, 1000);
        sensor.run(0);
        for _ in 0..10 {
            assert_eq!(reading.level(), 77);
        }
        assert_eq!(sensor.adc.conversions, 1);
    }
}
