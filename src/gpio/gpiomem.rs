use core::fmt;

use crate::gpio::{Bias, Irq, Mode, Port, Speed};

#[cfg(test)]
pub(crate) mod sim;
pub mod stm32f1;

// CNF bits (upper half of each 4-bit pin field in CRL/CRH) while MODE is input
const CNF_IN_ANALOG: u8 = 0b00;
const CNF_IN_FLOATING: u8 = 0b01;
const CNF_IN_PULL: u8 = 0b10;
// CNF bits while MODE is one of the output speeds
const CNF_OUT_PUSH_PULL: u8 = 0b00;
const CNF_OUT_OPEN_DRAIN: u8 = 0b01;
const CNF_ALT_PUSH_PULL: u8 = 0b10;

const MODE_MASK: u8 = 0b11;
const MODE_INPUT: u8 = 0b00;
const CNF_LSB: u8 = 2;

/// Register-level access to the GPIO ports, AFIO, EXTI, RCC and NVIC.
///
/// [`GpioMem`] implements this trait for the STM32F1's memory-mapped
/// registers. Parts with a compatible register layout can provide their own
/// implementation. All methods take `&self`, because the registers are shared
/// between the application and the EXTI vector handlers. Implementations are
/// responsible for making read-modify-write sequences atomic.
///
/// `config` values are the raw 4-bit `CNF[1:0]:MODE[1:0]` field of a pin.
///
/// [`GpioMem`]: struct.GpioMem.html
pub trait GpioRegisters: fmt::Debug + Sync {
    /// Enables the port's clock (`RCC_APB2ENR.IOPxEN`).
    fn enable_port_clock(&self, port: Port);
    /// Enables the AFIO clock (`RCC_APB2ENR.AFIOEN`).
    fn enable_afio_clock(&self);

    /// Returns the pin's `CNF`/`MODE` field.
    fn config(&self, port: Port, pin: u8) -> u8;
    /// Replaces the pin's `CNF`/`MODE` field.
    fn set_config(&self, port: Port, pin: u8, config: u8);
    /// Returns the port's input data register (`GPIOx_IDR`).
    fn input(&self, port: Port) -> u16;
    /// Returns the port's output data register (`GPIOx_ODR`).
    fn output(&self, port: Port) -> u16;
    /// Sets the pin's output latch through `GPIOx_BSRR`.
    fn set_high(&self, port: Port, pin: u8);
    /// Clears the pin's output latch through `GPIOx_BRR`.
    fn set_low(&self, port: Port, pin: u8);

    /// Returns the port routed to EXTI `line` (`AFIO_EXTICRx`), or `None` if
    /// the field holds a reserved value.
    fn exti_source(&self, line: u8) -> Option<Port>;
    /// Routes `port` to EXTI `line`.
    fn set_exti_source(&self, line: u8, port: Port);

    /// Enables or disables the rising edge trigger (`EXTI_RTSR`).
    fn set_rising_trigger(&self, line: u8, enabled: bool);
    /// Enables or disables the falling edge trigger (`EXTI_FTSR`).
    fn set_falling_trigger(&self, line: u8, enabled: bool);
    /// Unmasks or masks the event request (`EXTI_EMR`).
    fn set_event_mask(&self, line: u8, enabled: bool);
    /// Unmasks or masks the interrupt request (`EXTI_IMR`).
    fn set_interrupt_mask(&self, line: u8, enabled: bool);
    /// Returns `EXTI_IMR`.
    fn interrupt_mask(&self) -> u32;
    /// Returns `EXTI_PR`.
    fn pending(&self) -> u32;
    /// Clears the line's pending bit. `EXTI_PR` is write-1-to-clear, so only
    /// the line's bit may be written.
    fn clear_pending(&self, line: u8);
    /// Raises a software interrupt request on the line (`EXTI_SWIER`).
    fn software_trigger(&self, line: u8);

    /// Sets the vector's NVIC priority. `priority` is in `0..=15`.
    fn set_irq_priority(&self, irq: Irq, priority: u8);
    /// Enables the vector in the NVIC.
    fn enable_irq(&self, irq: Irq);
    /// Disables the vector in the NVIC.
    fn disable_irq(&self, irq: Irq);
}

pub(crate) fn input_config(bias: Bias) -> u8 {
    let cnf = match bias {
        Bias::Off => CNF_IN_FLOATING,
        Bias::PullDown | Bias::PullUp => CNF_IN_PULL,
    };

    (cnf << CNF_LSB) | MODE_INPUT
}

pub(crate) fn output_config(speed: Speed, open_drain: bool) -> u8 {
    let cnf = if open_drain {
        CNF_OUT_OPEN_DRAIN
    } else {
        CNF_OUT_PUSH_PULL
    };

    (cnf << CNF_LSB) | speed as u8
}

pub(crate) fn mode_from_config(config: u8) -> Mode {
    let cnf = (config >> CNF_LSB) & 0b11;

    if config & MODE_MASK == MODE_INPUT {
        match cnf {
            CNF_IN_ANALOG => Mode::Analog,
            // CNF 0b11 is reserved in input mode, and behaves as an input
            _ => Mode::Input,
        }
    } else {
        match cnf {
            CNF_OUT_PUSH_PULL => Mode::Output,
            CNF_OUT_OPEN_DRAIN => Mode::OutputOpenDrain,
            CNF_ALT_PUSH_PULL => Mode::Alternate,
            _ => Mode::AlternateOpenDrain,
        }
    }
}

// True when any of the MODE bits are set, which enables the output driver.
#[inline]
pub(crate) fn is_output_config(config: u8) -> bool {
    config & MODE_MASK != MODE_INPUT
}
