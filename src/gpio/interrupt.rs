// Copyright (c) 2024 stm32f1-gpio contributors
//
// Permission is hereby granted, free of charge, to any person obtaining a
// copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL
// THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
// DEALINGS IN THE SOFTWARE.

use core::cell::Cell;
use core::fmt;
use core::ops::RangeInclusive;

use cortex_m::interrupt::InterruptNumber;
use critical_section::Mutex;

use crate::gpio::{Error, GpioRegisters, GpioState, Level, PinId, Result, Trigger, PINS_PER_PORT};

const LINES: usize = PINS_PER_PORT as usize;

/// Interrupt callback.
///
/// Called from the EXTI vector handler with the pin's input level, sampled
/// after the line's pending bit was cleared.
pub type Callback = fn(Level);

/// NVIC vectors used by the GPIO external interrupt lines.
///
/// Lines 0 through 4 have a dedicated vector each. Lines 5 through 9 share
/// `Exti9_5`, and lines 10 through 15 share `Exti15_10`.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum Irq {
    Exti0 = 6,
    Exti1 = 7,
    Exti2 = 8,
    Exti3 = 9,
    Exti4 = 10,
    Exti9_5 = 23,
    Exti15_10 = 40,
}

impl Irq {
    /// Returns the vector that services EXTI `line`.
    ///
    /// Lines past 15 don't exist for GPIO pins, and map to `Exti15_10`.
    pub const fn for_line(line: u8) -> Irq {
        match line {
            0 => Irq::Exti0,
            1 => Irq::Exti1,
            2 => Irq::Exti2,
            3 => Irq::Exti3,
            4 => Irq::Exti4,
            5..=9 => Irq::Exti9_5,
            _ => Irq::Exti15_10,
        }
    }

    /// Returns the EXTI lines serviced by this vector.
    pub const fn lines(self) -> RangeInclusive<u8> {
        match self {
            Irq::Exti0 => 0..=0,
            Irq::Exti1 => 1..=1,
            Irq::Exti2 => 2..=2,
            Irq::Exti3 => 3..=3,
            Irq::Exti4 => 4..=4,
            Irq::Exti9_5 => 5..=9,
            Irq::Exti15_10 => 10..=15,
        }
    }

    /// Returns a bit mask of the EXTI lines serviced by this vector.
    pub const fn line_mask(self) -> u32 {
        match self {
            Irq::Exti0 => 1 << 0,
            Irq::Exti1 => 1 << 1,
            Irq::Exti2 => 1 << 2,
            Irq::Exti3 => 1 << 3,
            Irq::Exti4 => 1 << 4,
            Irq::Exti9_5 => 0x0000_03e0,
            Irq::Exti15_10 => 0x0000_fc00,
        }
    }

    /// Returns the vector's position in the NVIC.
    pub const fn number(self) -> u16 {
        self as u16
    }
}

impl fmt::Display for Irq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Irq::Exti0 => write!(f, "EXTI0"),
            Irq::Exti1 => write!(f, "EXTI1"),
            Irq::Exti2 => write!(f, "EXTI2"),
            Irq::Exti3 => write!(f, "EXTI3"),
            Irq::Exti4 => write!(f, "EXTI4"),
            Irq::Exti9_5 => write!(f, "EXTI9_5"),
            Irq::Exti15_10 => write!(f, "EXTI15_10"),
        }
    }
}

// SAFETY: every variant is a valid STM32F1 vector number
unsafe impl InterruptNumber for Irq {
    #[inline]
    fn number(self) -> u16 {
        self as u16
    }
}

#[derive(Debug, Copy, Clone)]
pub(crate) struct Handler {
    pub(crate) pin: PinId,
    pub(crate) callback: Callback,
}

/// Callbacks per EXTI line, and the pin that owns each line.
pub(crate) struct InterruptTable {
    handlers: Mutex<[Cell<Option<Handler>>; LINES]>,
}

impl InterruptTable {
    pub(crate) const fn new() -> InterruptTable {
        InterruptTable {
            handlers: Mutex::new([const { Cell::new(None) }; LINES]),
        }
    }

    // Claims the pin's line and stores the callback in a single step. A pin
    // that already owns the line replaces its callback.
    fn register(&self, pin: PinId, callback: Callback) -> Result<()> {
        critical_section::with(|cs| {
            let slot = &self.handlers.borrow(cs)[usize::from(pin.pin)];

            match slot.get() {
                Some(handler) if handler.pin != pin => Err(Error::LineUsed {
                    line: pin.pin,
                    owner: handler.pin,
                }),
                _ => {
                    slot.set(Some(Handler { pin, callback }));
                    Ok(())
                }
            }
        })
    }

    // Releases the pin's line. Returns false if the line belongs to another pin.
    fn remove(&self, pin: PinId) -> bool {
        critical_section::with(|cs| {
            let slot = &self.handlers.borrow(cs)[usize::from(pin.pin)];

            match slot.get() {
                Some(handler) if handler.pin == pin => {
                    slot.set(None);
                    true
                }
                _ => false,
            }
        })
    }

    pub(crate) fn handler(&self, line: u8) -> Option<Handler> {
        critical_section::with(|cs| {
            self.handlers
                .borrow(cs)
                .get(usize::from(line))
                .and_then(Cell::get)
        })
    }

    pub(crate) fn owner(&self, line: u8) -> Option<PinId> {
        self.handler(line).map(|handler| handler.pin)
    }
}

/// Configures `pin` as an EXTI interrupt source.
///
/// The line stays masked while it's routed and its triggers are selected, and
/// any stale pending request is cleared before it's unmasked again.
pub(crate) fn arm<R: GpioRegisters>(
    state: &GpioState<R>,
    pin: PinId,
    trigger: Trigger,
    callback: Callback,
) -> Result<()> {
    if trigger == Trigger::Disabled {
        disarm(state, pin);
        return Ok(());
    }

    let line = pin.pin;
    let irq = Irq::for_line(line);
    let regs = &state.regs;

    state.interrupts.register(pin, callback)?;

    regs.set_interrupt_mask(line, false);

    regs.enable_afio_clock();
    regs.set_exti_source(line, pin.port);

    regs.set_rising_trigger(line, trigger.rising());
    regs.set_falling_trigger(line, trigger.falling());
    regs.set_event_mask(line, false);
    regs.clear_pending(line);

    regs.set_interrupt_mask(line, true);

    regs.set_irq_priority(irq, state.config().irq_priority);
    regs.enable_irq(irq);

    debug!("{} armed on EXTI line {} ({}), trigger {}", pin, line, irq, trigger);

    Ok(())
}

/// Removes `pin`'s interrupt configuration. Does nothing if `pin` doesn't own
/// its EXTI line.
///
/// The vector is disabled in the NVIC once none of its lines are unmasked.
pub(crate) fn disarm<R: GpioRegisters>(state: &GpioState<R>, pin: PinId) {
    let line = pin.pin;

    if state.interrupts.owner(line) != Some(pin) {
        return;
    }

    let irq = Irq::for_line(line);
    let regs = &state.regs;

    regs.set_interrupt_mask(line, false);
    regs.set_rising_trigger(line, false);
    regs.set_falling_trigger(line, false);
    regs.clear_pending(line);

    state.interrupts.remove(pin);

    if regs.interrupt_mask() & irq.line_mask() == 0 {
        regs.disable_irq(irq);
    }

    debug!("{} disarmed from EXTI line {}", pin, line);
}

/// Services every pending, unmasked line that belongs to `irq`.
///
/// Each line's pending bit is cleared before its callback runs, so an edge that
/// arrives during the callback raises a new request instead of being lost.
pub(crate) fn dispatch<R: GpioRegisters>(state: &GpioState<R>, irq: Irq) {
    let regs = &state.regs;
    let mut pending = regs.pending() & regs.interrupt_mask() & irq.line_mask();

    if pending == 0 {
        trace!("{} entered without a pending line", irq);
        return;
    }

    while pending != 0 {
        let line = pending.trailing_zeros() as u8;
        pending &= pending - 1;

        regs.clear_pending(line);

        // Copy the handler out, so the callback doesn't run inside the critical section
        match state.interrupts.handler(line) {
            Some(handler) => {
                let level = Level::from(regs.input(handler.pin.port) & handler.pin.mask() != 0);

                trace!("EXTI line {} fired, {} is {}", line, handler.pin, level);

                (handler.callback)(level);
            }
            None => warn!("EXTI line {} was pending without a callback", line),
        }
    }
}
