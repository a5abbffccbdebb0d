//! Control core for a battery-powered pet necklace.
//!
//! # Overview
//!
//! A tilt switch and a photocell decide how the necklace LEDs blink:
//! - Every tilt edge bumps a bounded motion counter (interrupt context)
//! - The counter decays at a fixed rate and maps to a FAST, MEDIUM or SLOW
//!   blink cadence
//! - The necklace LEDs only run while it is darker than a fixed threshold
//! - A pendant LED blinks while any motion is left in the counter
//!
//! # Execution model
//!
//! Everything except the tilt interrupt runs from one busy-polling loop that
//! drives a [`Scheduler`] of fixed-period tasks:
//!
//! ```text
//!  tilt edge (IRQ) ──► MotionCounter ──┐
//!                                      ▼
//!  LightSensor ──► LightReading ──► CadenceTask ──► DecisionSlot ──► LedRenderer
//!   (1000 ms)                        (100 ms)                          (100 ms)
//! ```
//!
//! There is no heap. Shared state is either a single atomic byte (the motion
//! counter, the only thing the interrupt touches) or a `Cell` owned by the run
//! loop.
//!
//! # Module Organization
//!
//! - [`scheduler`] - cooperative fixed-period scheduler and clock trait
//! - [`motion`] - interrupt-shared motion counter
//! - [`light`] - photocell sampling task
//! - [`cadence`] - decay, tier classification and light gating
//! - [`led`] - necklace and pendant LED rendering
//! - [`config`] - compile-time constants

#![cfg_attr(not(test), no_std)]

pub mod cadence;
pub mod config;
pub mod led;
pub mod light;
pub mod motion;
pub mod scheduler;

pub use cadence::{Actuator, CadenceBands, CadenceTask, CadenceTier, Decision};
pub use led::{DecisionSlot, LedRenderer, Phase};
pub use light::{LightAdc, LightReading, LightSensor};
pub use motion::{MOTION_COUNTER, MotionConfig, MotionCounter};
pub use scheduler::{Clock, PeriodicTask, Schedule, Scheduler, SchedulerFull};
