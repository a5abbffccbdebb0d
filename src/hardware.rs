//! Hardware abstraction and peripheral initialization.
//!
//! This module defines the pin mappings and peripheral initialization
//! for the pet necklace hardware.
//!
//! # Pin Assignments
//!
//! ## Sensors
//! - **PA0**: PHOTOCELL - Light level divider, ADC channel 0 (8-bit)
//! - **PB3**: TILT_N - Tilt switch to ground, internal pull-up, EXTI line 3
//!
//! ## LEDs
//! - **PA6**: NECKLACE_LED_0 - First LED of the complementary necklace pair
//! - **PA7**: NECKLACE_LED_1 - Second LED of the complementary necklace pair
//! - **PA4**: PENDANT_LED - Motion heartbeat
//!
//! ## Low Power & RTC
//! - **PC14**: OSC32_IN - 32.768 kHz crystal input
//! - **PC15**: OSC32_OUT - 32.768 kHz crystal output
//!
//! ## Debug (SWD)
//! - **PA13**: SWDIO
//! - **PA14**: SWCLK

use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::pac;
use embassy_stm32::pac::adc::vals::{Ckmode, Res};

use pet_necklace::LightAdc;

/// ADC channel wired to the photocell (PA0).
const PHOTOCELL_CHANNEL: usize = 0;

/// Top-level peripheral container for the necklace.
pub struct Peripherals {
    /// Photocell converter
    pub photocell: PhotocellAdc,
    /// Tilt switch input, kept alive so its pull-up stays configured.
    /// Edges are delivered through EXTI, see [`crate::tilt`].
    pub tilt: Input<'static>,
    /// Necklace LED pair, driven complementary
    pub necklace: (Output<'static>, Output<'static>),
    /// Pendant LED
    pub pendant: Output<'static>,
}

impl Peripherals {
    /// Initializes all peripherals from STM32 peripheral singleton.
    ///
    /// # Initial GPIO States
    ///
    /// - PA6, PA7 (necklace): Low
    /// - PA4 (pendant): Low
    /// - PB3 (tilt): input, pull-up
    /// - PA0 (photocell): analog, 8-bit ADC enabled and calibrated
    pub fn new(p: embassy_stm32::Peripherals) -> Self {
        Self {
            photocell: PhotocellAdc::new(),
            tilt: Input::new(p.PB3, Pull::Up),
            necklace: (
                Output::new(p.PA6, Level::Low, Speed::Low),
                Output::new(p.PA7, Level::Low, Speed::Low),
            ),
            pendant: Output::new(p.PA4, Level::Low, Speed::Low),
        }
    }
}

/// One-shot 8-bit converter on the photocell channel.
///
/// Uses the PAC directly: one conversion per call, completion polled on
/// `ADSTART`, so the light task spins for a few microseconds at most once
/// per sampling period.
pub struct PhotocellAdc {
    _private: (),
}

impl PhotocellAdc {
    /// Powers, calibrates and enables ADC1 for 8-bit single conversions.
    fn new() -> Self {
        let adc = pac::ADC1;

        pac::RCC.apb2enr().modify(|w| w.set_adcen(true));

        // PCLK as ADC clock; HSI16 stays off to save power
        adc.cfgr2().modify(|w| w.set_ckmode(Ckmode::PCLK));

        adc.cr().modify(|w| w.set_adcal(true));
        while adc.cr().read().adcal() {}

        adc.cfgr1().modify(|w| w.set_res(Res::BITS8));
        adc.chselr().write(|w| w.set_chselx(PHOTOCELL_CHANNEL, true));

        adc.isr().modify(|w| w.set_adrdy(true));
        adc.cr().modify(|w| w.set_aden(true));
        while !adc.isr().read().adrdy() {}

        Self { _private: () }
    }
}

impl LightAdc for PhotocellAdc {
    fn start_conversion(&mut self) {
        pac::ADC1.cr().modify(|w| w.set_adstart(true));
    }

    fn conversion_complete(&mut self) -> bool {
        // ADSTART is cleared by hardware at end of conversion
        !pac::ADC1.cr().read().adstart()
    }

    fn read_result(&mut self) -> u8 {
        pac::ADC1.dr().read().data() as u8
    }
}
