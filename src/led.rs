//! LED rendering: turns the latest cadence decision into pin activity.
//!
//! The necklace has two LEDs wired to complementary outputs, so exactly one
//! of them is lit while the necklace is enabled. The pair swaps every
//! `half_period_ticks` renderer ticks of the current tier. The pendant LED is
//! a motion heartbeat: it toggles every tick while there is motion left in the
//! counter, ignoring the light gate, and goes dark once motion has decayed.

use core::cell::Cell;
use core::convert::Infallible;

use embedded_hal::digital::v2::OutputPin;

use crate::cadence::{Actuator, Decision};
use crate::scheduler::{PeriodicTask, Schedule};

/// Latest published [`Decision`], handed from the cadence task to the renderer.
///
/// Both sides run in the run-loop context.
#[derive(Debug)]
pub struct DecisionSlot {
    decision: Cell<Decision>,
}

impl DecisionSlot {
    pub const fn new() -> Self {
        Self {
            decision: Cell::new(Decision::IDLE),
        }
    }

    pub fn get(&self) -> Decision {
        self.decision.get()
    }
}

impl Default for DecisionSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl Actuator for &DecisionSlot {
    fn publish(&mut self, decision: Decision) {
        self.decision.set(decision);
    }
}

fn drive<P: OutputPin<Error = Infallible>>(pin: &mut P, on: bool) {
    let Ok(()) = if on { pin.set_high() } else { pin.set_low() };
}

/// Which necklace LED is currently lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "debug-mode", derive(defmt::Format))]
pub enum Phase {
    First,
    Second,
}

impl Phase {
    fn flipped(self) -> Self {
        match self {
            Phase::First => Phase::Second,
            Phase::Second => Phase::First,
        }
    }
}

/// Periodic task driving the necklace pair and the pendant LED.
pub struct LedRenderer<'a, N0, N1, P> {
    schedule: Schedule,
    slot: &'a DecisionSlot,
    necklace: (N0, N1),
    pendant: P,
    phase: Option<Phase>,
    ticks_in_phase: u8,
    pendant_on: bool,
}

impl<'a, N0, N1, P> LedRenderer<'a, N0, N1, P>
where
    N0: OutputPin<Error = Infallible>,
    N1: OutputPin<Error = Infallible>,
    P: OutputPin<Error = Infallible>,
{
    /// Creates the renderer and switches every LED off.
    pub fn new(
        slot: &'a DecisionSlot,
        necklace: (N0, N1),
        pendant: P,
        first_due: u32,
        period: u32,
    ) -> Self {
        let mut renderer = Self {
            schedule: Schedule::new(first_due, period),
            slot,
            necklace,
            pendant,
            phase: None,
            ticks_in_phase: 0,
            pendant_on: false,
        };
        renderer.necklace_off();
        drive(&mut renderer.pendant, false);
        renderer
    }

    /// Lit necklace LED, or `None` while the necklace is dark.
    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    pub fn pendant_on(&self) -> bool {
        self.pendant_on
    }

    /// Advances the LEDs by one renderer tick.
    pub fn render(&mut self) {
        let decision = self.slot.get();

        if decision.enabled {
            self.step_necklace(decision);
        } else if self.phase.is_some() {
            self.necklace_off();
        }

        self.pendant_on = decision.moving && !self.pendant_on;
        drive(&mut self.pendant, self.pendant_on);
    }

    fn step_necklace(&mut self, decision: Decision) {
        let next = match self.phase {
            None => Phase::First,
            Some(phase) => {
                self.ticks_in_phase = self.ticks_in_phase.saturating_add(1);
                if self.ticks_in_phase < decision.tier.half_period_ticks() {
                    return;
                }
                phase.flipped()
            }
        };
        self.show(next);
    }

    fn show(&mut self, phase: Phase) {
        let first = phase == Phase::First;
        drive(&mut self.necklace.0, first);
        drive(&mut self.necklace.1, !first);
        self.phase = Some(phase);
        self.ticks_in_phase = 0;
    }

    fn necklace_off(&mut self) {
        drive(&mut self.necklace.0, false);
        drive(&mut self.necklace.1, false);
        self.phase = None;
        self.ticks_in_phase = 0;
    }
}

impl<N0, N1, P> PeriodicTask for LedRenderer<'_, N0, N1, P>
where
    N0: OutputPin<Error = Infallible>,
    N1: OutputPin<Error = Infallible>,
    P: OutputPin<Error = Infallible>,
{
    fn name(&self) -> &'static str {
        "leds"
    }

    fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn run(&mut self, _now: u32) {
        self.render();
        self.schedule.advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cadence::CadenceTier;
    use std::rc::Rc;

    /// Pin double sharing its level with the test body.
    #[derive(Clone, Default)]
    struct Pin(Rc<Cell<bool>>);

    impl Pin {
        fn is_high(&self) -> bool {
            self.0.get()
        }
    }

    impl OutputPin for Pin {
        type Error = Infallible;

        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.0.set(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.0.set(true);
            Ok(())
        }
    }

    struct Rig {
        a: Pin,
        b: Pin,
        pendant: Pin,
    }

    impl Rig {
        fn new() -> Self {
            let rig = Self {
                a: Pin::default(),
                b: Pin::default(),
                pendant: Pin::default(),
            };
            rig.a.0.set(true);
            rig.b.0.set(true);
            rig.pendant.0.set(true);
            rig
        }

        fn renderer<'s>(&self, slot: &'s DecisionSlot) -> LedRenderer<'s, Pin, Pin, Pin> {
            LedRenderer::new(
                slot,
                (self.a.clone(), self.b.clone()),
                self.pendant.clone(),
                0,
                100,
            )
        }

        fn necklace(&self) -> (bool, bool) {
            (self.a.is_high(), self.b.is_high())
        }
    }

    fn publish(slot: &DecisionSlot, decision: Decision) {
        let mut actuator = slot;
        actuator.publish(decision);
    }

    const FAST_DARK: Decision = Decision {
        tier: CadenceTier::Fast,
        enabled: true,
        moving: true,
    };

    #[test]
    fn starts_with_all_leds_off() {
        let rig = Rig::new();
        let slot = DecisionSlot::new();
        let renderer = rig.renderer(&slot);
        assert_eq!(rig.necklace(), (false, false));
        assert!(!rig.pendant.is_high());
        assert_eq!(renderer.phase(), None);
    }

    #[test]
    fn slot_holds_last_published_decision() {
        let slot = DecisionSlot::new();
        assert_eq!(slot.get(), Decision::IDLE);
        publish(&slot, FAST_DARK);
        assert_eq!(slot.get(), FAST_DARK);
    }

    #[test]
    fn fast_tier_swaps_pair_every_tick() {
        let rig = Rig::new();
        let slot = DecisionSlot::new();
        let mut renderer = rig.renderer(&slot);
        publish(&slot, FAST_DARK);

        let mut seen = std::vec::Vec::new();
        for _ in 0..4 {
            renderer.render();
            seen.push(rig.necklace());
        }
        assert_eq!(
            seen,
            [(true, false), (false, true), (true, false), (false, true)]
        );
    }

    #[test]
    fn slow_tier_holds_each_phase_for_six_ticks() {
        let rig = Rig::new();
        let slot = DecisionSlot::new();
        let mut renderer = rig.renderer(&slot);
        publish(
            &slot,
            Decision {
                tier: CadenceTier::Slow,
                enabled: true,
                moving: false,
            },
        );

        let mut phases = std::vec::Vec::new();
        for _ in 0..13 {
            renderer.render();
            phases.push(renderer.phase());
        }
        let first = phases.iter().filter(|p| **p == Some(Phase::First)).count();
        let second = phases.iter().filter(|p| **p == Some(Phase::Second)).count();
        assert_eq!(&phases[..6], &[Some(Phase::First); 6]);
        assert_eq!(&phases[6..12], &[Some(Phase::Second); 6]);
        assert_eq!((first, second), (7, 6));
    }

    #[test]
    fn disabled_turns_necklace_off_and_restarts_phase() {
        let rig = Rig::new();
        let slot = DecisionSlot::new();
        let mut renderer = rig.renderer(&slot);

        publish(&slot, FAST_DARK);
        renderer.render();
        renderer.render();
        assert_eq!(renderer.phase(), Some(Phase::Second));

        publish(&slot, Decision { enabled: false, ..FAST_DARK });
        renderer.render();
        assert_eq!(rig.necklace(), (false, false));
        assert_eq!(renderer.phase(), None);

        publish(&slot, FAST_DARK);
        renderer.render();
        assert_eq!(renderer.phase(), Some(Phase::First));
    }

    #[test]
    fn pendant_blinks_while_moving_even_in_daylight() {
        let rig = Rig::new();
        let slot = DecisionSlot::new();
        let mut renderer = rig.renderer(&slot);
        publish(&slot, Decision { enabled: false, ..FAST_DARK });

        let mut levels = std::vec::Vec::new();
        for _ in 0..4 {
            renderer.render();
            levels.push(rig.pendant.is_high());
        }
        assert_eq!(levels, [true, false, true, false]);
        assert_eq!(rig.necklace(), (false, false));

        publish(&slot, Decision { moving: false, enabled: false, ..FAST_DARK });
        renderer.render();
        renderer.render();
        assert!(!rig.pendant.is_high());
        assert!(!renderer.pendant_on());
    }

    #[test]
    fn run_renders_and_reschedules() {
        let rig = Rig::new();
        let slot = DecisionSlot::new();
        let mut renderer = rig.renderer(&slot);
        publish(&slot, FAST_DARK);
        renderer.run(0);
        assert_eq!(renderer.schedule().next_due(), 100);
        assert_eq!(rig.necklace(), (true, false));
    }
}
