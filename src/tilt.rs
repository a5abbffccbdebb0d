//! Tilt switch interrupt feeding the motion counter.
//!
//! The tilt switch shorts PB3 to ground while it is being shaken. Only the
//! falling edge (input going LOW) counts as motion, so EXTI line 3 is armed
//! for falling edges only. The handler does constant work: clear the pending
//! bit and bump the shared counter.

use embassy_stm32::pac;
use pac::interrupt;

use pet_necklace::MOTION_COUNTER;

/// EXTI line number for the tilt switch (PB3)
const TILT_EXTI_LINE: usize = 3;

/// Register index for EXTI lines 0-31
const IMR1_REG_IDX: usize = 0;

/// SYSCFG port selector for GPIOB
const PORT_B: u8 = 1;

/// Tilt switch interrupt handler (EXTI lines 2 and 3).
///
/// Clears the pending flag and records one motion edge.
#[interrupt]
fn EXTI2_3() {
    let exti = pac::EXTI;

    if exti.pr(IMR1_REG_IDX).read().line(TILT_EXTI_LINE) {
        exti.pr(IMR1_REG_IDX)
            .write(|w| w.set_line(TILT_EXTI_LINE, true));

        MOTION_COUNTER.record_edge();
    }
}

/// Routes PB3 to EXTI line 3 and arms it for falling edges.
///
/// The pin itself must already be an input with pull-up.
pub fn setup_tilt_exti() {
    let exti = pac::EXTI;

    // SYSCFG holds the EXTI port multiplexer
    pac::RCC.apb2enr().modify(|w| w.set_syscfgen(true));
    pac::SYSCFG
        .exticr(TILT_EXTI_LINE / 4)
        .modify(|w| w.set_exti(TILT_EXTI_LINE % 4, PORT_B));

    exti.ftsr(IMR1_REG_IDX)
        .modify(|w| w.set_line(TILT_EXTI_LINE, true));
    exti.rtsr(IMR1_REG_IDX)
        .modify(|w| w.set_line(TILT_EXTI_LINE, false));
    exti.pr(IMR1_REG_IDX)
        .write(|w| w.set_line(TILT_EXTI_LINE, true));
    exti.imr(IMR1_REG_IDX)
        .modify(|w| w.set_line(TILT_EXTI_LINE, true));

    unsafe {
        cortex_m::peripheral::NVIC::unmask(embassy_stm32::interrupt::EXTI2_3);
    };
}
