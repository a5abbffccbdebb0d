//! Firmware for a battery-powered pet necklace.
//!
//! # Overview
//!
//! The necklace blinks faster the more the pet moves, and only after dark:
//! - A tilt switch interrupt counts motion into a bounded counter
//! - The counter decays every 100 ms and selects a FAST/MEDIUM/SLOW cadence
//! - A photocell sampled once per second gates the necklace LEDs
//! - A pendant LED blinks while there is motion left in the counter
//!
//! # Hardware
//!
//! - **MCU**: STM32L031G6U6 (Cortex-M0+, ultra-low-power)
//! - **Sensors**: tilt switch (PB3), photocell divider (PA0)
//! - **LEDs**: complementary necklace pair (PA6/PA7), pendant (PA4)
//!
//! # Run Loop
//!
//! All periodic work is done by the cooperative scheduler from
//! [`pet_necklace::scheduler`], polled from the main task. The loop never
//! sleeps on a due time; it yields to the executor between passes. The tilt
//! interrupt is the only other execution context.
//!
//! # Module Organization
//!
//! - [`hardware`] - Pin mappings, peripheral initialization, photocell ADC
//! - [`tilt`] - Tilt switch EXTI setup and interrupt handler
//!
//! On the host this binary is empty; the control logic is tested through
//! the library.

#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

#[cfg(target_os = "none")]
mod hardware;
#[cfg(target_os = "none")]
mod tilt;

#[cfg(target_os = "none")]
use {
    embassy_executor::Spawner,
    embassy_stm32::{
        Config,
        rcc::{LsConfig, LseConfig, mux::ClockMux},
        time::Hertz,
    },
    embassy_time::{Instant, Timer},
    pet_necklace::{
        CadenceTask, Clock, DecisionSlot, LedRenderer, LightReading, LightSensor, MOTION_COUNTER,
        Scheduler,
        config::{CADENCE_PERIOD_MS, LIGHT_PERIOD_MS, MAX_TASKS, RENDER_PERIOD_MS},
    },
    {defmt_rtt as _, panic_probe as _},
};

#[cfg(target_os = "none")]
use hardware::Peripherals;

/// Milliseconds since boot from the embassy time driver.
///
/// Truncated to `u32`; the scheduler compares due times wrap-safely.
#[cfg(target_os = "none")]
struct UptimeClock;

#[cfg(target_os = "none")]
impl Clock for UptimeClock {
    fn now_ms(&self) -> u32 {
        Instant::now().as_millis() as u32
    }
}

/// Creates a low-power clock configuration for STM32L031.
///
/// # Clock Settings
///
/// - **MSI**: 2.097 MHz in normal mode, 4.194 MHz in debug mode
/// - **System clock**: MSI (no PLL)
/// - **LSE**: 32.768 kHz external crystal for the time driver
/// - **Voltage scale**: Range 1
///
/// The run loop busy-polls and the photocell ADC is clocked from PCLK, so
/// MSI stays in the low-MHz ranges rather than the 65 kHz minimum.
#[cfg(target_os = "none")]
fn create_low_power_config() -> embassy_stm32::rcc::Config {
    embassy_stm32::rcc::Config {
        #[cfg(feature = "debug-mode")]
        msi: Some(embassy_stm32::rcc::MSIRange::RANGE4M),
        #[cfg(not(feature = "debug-mode"))]
        msi: Some(embassy_stm32::rcc::MSIRange::RANGE2M),
        hsi: false,
        hse: None,
        pll: None,
        sys: embassy_stm32::rcc::Sysclk::MSI,
        ahb_pre: embassy_stm32::rcc::AHBPrescaler::DIV1,
        apb1_pre: embassy_stm32::rcc::APBPrescaler::DIV1,
        apb2_pre: embassy_stm32::rcc::APBPrescaler::DIV1,
        ls: LsConfig {
            rtc: embassy_stm32::rcc::RtcClockSource::LSE,
            lsi: false,
            lse: Some(LseConfig {
                frequency: Hertz::hz(32768),
                mode: embassy_stm32::rcc::LseMode::Oscillator(embassy_stm32::rcc::LseDrive::Low),
            }),
        },
        voltage_scale: embassy_stm32::rcc::VoltageScale::RANGE1,
        mux: ClockMux::default(),
    }
}

/// Main entry point for the necklace firmware.
///
/// # Initialization Sequence
///
/// 1. Configure clocks for low power operation
/// 2. Initialize STM32 peripherals, photocell ADC and LED pins
/// 3. Arm the tilt switch interrupt
/// 4. Build the light, cadence and LED tasks, all first due now
/// 5. Register them in that order and poll the scheduler forever
#[cfg(target_os = "none")]
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let mut config = Config::default();
    config.rcc = create_low_power_config();

    let p = embassy_stm32::init(config);

    #[cfg(feature = "debug-mode")]
    defmt::info!("Pet necklace firmware starting...");

    // Wait 3 seconds after boot to allow debugger connection.
    #[cfg(feature = "debug-mode")]
    defmt::info!("Waiting 3 seconds for debugger connection...");

    Timer::after_secs(3).await;

    #[cfg(feature = "debug-mode")]
    defmt::info!("Initializing peripherals...");

    let Peripherals {
        photocell,
        tilt: _tilt,
        necklace,
        pendant,
    } = Peripherals::new(p);

    #[cfg(feature = "debug-mode")]
    defmt::info!("Arming tilt switch interrupt...");

    tilt::setup_tilt_exti();

    let clock = UptimeClock;
    let start = clock.now_ms();

    let light = LightReading::new();
    let slot = DecisionSlot::new();

    let mut light_task = LightSensor::new(photocell, &light, start, LIGHT_PERIOD_MS);
    let mut cadence_task = CadenceTask::new(
        &MOTION_COUNTER,
        &light,
        &slot,
        start,
        CADENCE_PERIOD_MS,
    );
    let mut led_task = LedRenderer::new(&slot, necklace, pendant, start, RENDER_PERIOD_MS);

    let mut scheduler: Scheduler<'_, MAX_TASKS> = Scheduler::new();
    scheduler.register(&mut light_task).unwrap();
    scheduler.register(&mut cadence_task).unwrap();
    scheduler.register(&mut led_task).unwrap();

    #[cfg(feature = "debug-mode")]
    defmt::info!("Entering scheduler loop...");

    loop {
        scheduler.poll(&clock);
        embassy_futures::yield_now().await;
    }
}

#[cfg(not(target_os = "none"))]
fn main() {}
