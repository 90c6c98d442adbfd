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

use core::fmt;
use core::ptr;

use cortex_m::peripheral::NVIC;

use crate::gpio::{Irq, Port};

use super::GpioRegisters;

// Reset and clock control (RM0008 @ 7.3)
const RCC_BASE: usize = 0x4002_1000;
const RCC_APB2ENR: usize = 0x18;
const APB2ENR_AFIOEN: u32 = 1 << 0;
// IOPAEN through IOPGEN are consecutive, starting at bit 2
const APB2ENR_IOPEN_LSB: u32 = 2;

// Alternate function I/O (RM0008 @ 9.4)
const AFIO_BASE: usize = 0x4001_0000;
const AFIO_EXTICR1: usize = 0x08;
// Each EXTICR register holds 4 lines, 4 bits per line
const EXTICR_LINES: u8 = 4;
const EXTICR_FIELD_MASK: u32 = 0xf;

// External interrupt/event controller (RM0008 @ 10.3)
const EXTI_BASE: usize = 0x4001_0400;
const EXTI_IMR: usize = 0x00;
const EXTI_EMR: usize = 0x04;
const EXTI_RTSR: usize = 0x08;
const EXTI_FTSR: usize = 0x0c;
const EXTI_SWIER: usize = 0x10;
const EXTI_PR: usize = 0x14;

// GPIO ports (RM0008 @ 9.2). GPIOA through GPIOG are 0x400 apart.
const GPIOA_BASE: usize = 0x4001_0800;
const GPIO_PORT_STRIDE: usize = 0x400;
const GPIO_CRL: usize = 0x00;
const GPIO_CRH: usize = 0x04;
const GPIO_IDR: usize = 0x08;
const GPIO_ODR: usize = 0x0c;
const GPIO_BSRR: usize = 0x10;
const GPIO_BRR: usize = 0x14;
// CRL covers pins 0-7, CRH covers pins 8-15, 4 bits per pin
const CR_PINS: u8 = 8;
const CR_FIELD_MASK: u32 = 0xf;

// The STM32F1 implements the upper 4 bits of each NVIC priority byte
const NVIC_PRIO_BITS: u8 = 4;

// Places a `0..=15` priority in the implemented bits of an NVIC_IPR byte.
const fn nvic_priority(priority: u8) -> u8 {
    priority << (8 - NVIC_PRIO_BITS)
}

/// Memory-mapped STM32F1 register backend.
///
/// Accesses the GPIO, AFIO, EXTI and RCC registers at their fixed addresses
/// through volatile reads and writes. Read-modify-write sequences run inside a
/// critical section, so a vector handler can't interleave with them. NVIC
/// access goes through `cortex-m`.
pub struct GpioMem {
    gpio_base: usize,
    afio_base: usize,
    exti_base: usize,
    rcc_base: usize,
}

impl fmt::Debug for GpioMem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpioMem")
            .field("gpio_base", &format_args!("{:#010x}", self.gpio_base))
            .field("afio_base", &format_args!("{:#010x}", self.afio_base))
            .field("exti_base", &format_args!("{:#010x}", self.exti_base))
            .field("rcc_base", &format_args!("{:#010x}", self.rcc_base))
            .finish()
    }
}

impl GpioMem {
    /// Constructs a new `GpioMem` for the STM32F1's register addresses.
    ///
    /// Only a single `GpioMem` should be used at a time. The backend doesn't
    /// claim the registers, so multiple instances would step on each other's
    /// read-modify-write sequences outside of the critical sections.
    pub const fn new() -> GpioMem {
        GpioMem {
            gpio_base: GPIOA_BASE,
            afio_base: AFIO_BASE,
            exti_base: EXTI_BASE,
            rcc_base: RCC_BASE,
        }
    }

    /// Constructs a `GpioMem` for register blocks at arbitrary addresses.
    ///
    /// # Safety
    ///
    /// `gpio_base` must point to 7 consecutive GPIO port blocks that are
    /// `0x400` bytes apart, and `afio_base`, `exti_base` and `rcc_base` must point to
    /// their respective register blocks. All of them must remain valid for as long
    /// as the `GpioMem` is in use.
    #[cfg(test)]
    pub(crate) const unsafe fn from_raw(
        gpio_base: usize,
        afio_base: usize,
        exti_base: usize,
        rcc_base: usize,
    ) -> GpioMem {
        GpioMem {
            gpio_base,
            afio_base,
            exti_base,
            rcc_base,
        }
    }

    #[inline(always)]
    fn read(&self, addr: usize) -> u32 {
        unsafe { ptr::read_volatile(addr as *const u32) }
    }

    #[inline(always)]
    fn write(&self, addr: usize, value: u32) {
        unsafe {
            ptr::write_volatile(addr as *mut u32, value);
        }
    }

    fn modify<F>(&self, addr: usize, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        critical_section::with(|_| {
            let reg_value = self.read(addr);
            self.write(addr, f(reg_value));
        });
    }

    fn modify_bit(&self, addr: usize, bit: u8, enabled: bool) {
        self.modify(addr, |reg_value| {
            if enabled {
                reg_value | (1 << bit)
            } else {
                reg_value & !(1 << bit)
            }
        });
    }

    #[inline(always)]
    fn port_base(&self, port: Port) -> usize {
        self.gpio_base + port.index() * GPIO_PORT_STRIDE
    }

    // Returns the CRL/CRH address and bit shift of the pin's CNF/MODE field.
    #[inline(always)]
    fn config_field(&self, port: Port, pin: u8) -> (usize, u32) {
        let offset = if pin < CR_PINS { GPIO_CRL } else { GPIO_CRH };
        let shift = u32::from(pin % CR_PINS) * 4;

        (self.port_base(port) + offset, shift)
    }

    // Returns the EXTICR address and bit shift of the line's port field.
    #[inline(always)]
    fn exticr_field(&self, line: u8) -> (usize, u32) {
        let addr = self.afio_base + AFIO_EXTICR1 + usize::from(line / EXTICR_LINES) * 4;
        let shift = u32::from(line % EXTICR_LINES) * 4;

        (addr, shift)
    }
}

impl Default for GpioMem {
    fn default() -> GpioMem {
        GpioMem::new()
    }
}

impl GpioRegisters for GpioMem {
    fn enable_port_clock(&self, port: Port) {
        let bit = APB2ENR_IOPEN_LSB as u8 + port as u8;

        self.modify_bit(self.rcc_base + RCC_APB2ENR, bit, true);
    }

    fn enable_afio_clock(&self) {
        self.modify(self.rcc_base + RCC_APB2ENR, |reg_value| {
            reg_value | APB2ENR_AFIOEN
        });
    }

    fn config(&self, port: Port, pin: u8) -> u8 {
        let (addr, shift) = self.config_field(port, pin);

        ((self.read(addr) >> shift) & CR_FIELD_MASK) as u8
    }

    fn set_config(&self, port: Port, pin: u8, config: u8) {
        let (addr, shift) = self.config_field(port, pin);

        self.modify(addr, |reg_value| {
            (reg_value & !(CR_FIELD_MASK << shift)) | ((u32::from(config) & CR_FIELD_MASK) << shift)
        });
    }

    #[inline(always)]
    fn input(&self, port: Port) -> u16 {
        self.read(self.port_base(port) + GPIO_IDR) as u16
    }

    #[inline(always)]
    fn output(&self, port: Port) -> u16 {
        self.read(self.port_base(port) + GPIO_ODR) as u16
    }

    #[inline(always)]
    fn set_high(&self, port: Port, pin: u8) {
        self.write(self.port_base(port) + GPIO_BSRR, 1 << pin);
    }

    #[inline(always)]
    fn set_low(&self, port: Port, pin: u8) {
        self.write(self.port_base(port) + GPIO_BRR, 1 << pin);
    }

    fn exti_source(&self, line: u8) -> Option<Port> {
        let (addr, shift) = self.exticr_field(line);

        Port::from_index(((self.read(addr) >> shift) & EXTICR_FIELD_MASK) as u8)
    }

    fn set_exti_source(&self, line: u8, port: Port) {
        let (addr, shift) = self.exticr_field(line);

        self.modify(addr, |reg_value| {
            (reg_value & !(EXTICR_FIELD_MASK << shift)) | ((port as u32) << shift)
        });
    }

    fn set_rising_trigger(&self, line: u8, enabled: bool) {
        self.modify_bit(self.exti_base + EXTI_RTSR, line, enabled);
    }

    fn set_falling_trigger(&self, line: u8, enabled: bool) {
        self.modify_bit(self.exti_base + EXTI_FTSR, line, enabled);
    }

    fn set_event_mask(&self, line: u8, enabled: bool) {
        self.modify_bit(self.exti_base + EXTI_EMR, line, enabled);
    }

    fn set_interrupt_mask(&self, line: u8, enabled: bool) {
        self.modify_bit(self.exti_base + EXTI_IMR, line, enabled);
    }

    fn interrupt_mask(&self) -> u32 {
        self.read(self.exti_base + EXTI_IMR)
    }

    fn pending(&self) -> u32 {
        self.read(self.exti_base + EXTI_PR)
    }

    fn clear_pending(&self, line: u8) {
        // Write-1-to-clear. Writing back a read value would clear every other
        // pending line as well.
        self.write(self.exti_base + EXTI_PR, 1 << line);
    }

    fn software_trigger(&self, line: u8) {
        // Writing 0 to SWIER bits has no effect
        self.write(self.exti_base + EXTI_SWIER, 1 << line);
    }

    fn set_irq_priority(&self, irq: Irq, priority: u8) {
        // Written through the register block directly, leaving the
        // `cortex_m::Peripherals` singleton to the application
        unsafe {
            (*NVIC::PTR).ipr[usize::from(irq.number())].write(nvic_priority(priority));
        }
    }

    fn enable_irq(&self, irq: Irq) {
        unsafe {
            NVIC::unmask(irq);
        }
    }

    fn disable_irq(&self, irq: Irq) {
        NVIC::mask(irq);
    }
}
