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

// Register model used by the unit tests. Mirrors the reset values and the
// write semantics of the STM32F1's GPIO, AFIO, EXTI, RCC and NVIC registers
// closely enough to exercise the driver logic on the host.

use std::sync::atomic::{AtomicU16, AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::sync::Mutex;

use crate::gpio::{Irq, Level, Port, PORTS};

use super::{is_output_config, GpioRegisters};

// CRL/CRH reset value. Every pin starts as a floating input.
const CR_RESET: u32 = 0x4444_4444;
const APB2ENR_AFIOEN: u32 = 1 << 0;
const APB2ENR_IOPEN_LSB: u32 = 2;
const VECTORS: usize = 64;

#[derive(Debug)]
struct SimPort {
    cr: [AtomicU32; 2],
    idr: AtomicU16,
    odr: AtomicU16,
}

impl SimPort {
    const fn new() -> SimPort {
        SimPort {
            cr: [AtomicU32::new(CR_RESET), AtomicU32::new(CR_RESET)],
            idr: AtomicU16::new(0),
            odr: AtomicU16::new(0),
        }
    }
}

/// A pin-level register write, in the order the driver issued it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Write {
    /// BSRR or BRR.
    Latch(Level),
    /// CRL or CRH, with the new 4-bit field.
    Config(u8),
}

#[derive(Debug)]
pub(crate) struct SimRegisters {
    ports: [SimPort; PORTS],
    exticr: [AtomicU32; 4],
    imr: AtomicU32,
    emr: AtomicU32,
    rtsr: AtomicU32,
    ftsr: AtomicU32,
    swier: AtomicU32,
    pr: AtomicU32,
    apb2enr: AtomicU32,
    nvic_enabled: AtomicU64,
    nvic_priority: [AtomicU8; VECTORS],
    writes: Mutex<Vec<(Port, u8, Write)>>,
}

impl SimRegisters {
    pub(crate) const fn new() -> SimRegisters {
        SimRegisters {
            ports: [const { SimPort::new() }; PORTS],
            exticr: [const { AtomicU32::new(0) }; 4],
            imr: AtomicU32::new(0),
            emr: AtomicU32::new(0),
            rtsr: AtomicU32::new(0),
            ftsr: AtomicU32::new(0),
            swier: AtomicU32::new(0),
            pr: AtomicU32::new(0),
            apb2enr: AtomicU32::new(0),
            nvic_enabled: AtomicU64::new(0),
            nvic_priority: [const { AtomicU8::new(0) }; VECTORS],
            writes: Mutex::new(Vec::new()),
        }
    }

    fn port(&self, port: Port) -> &SimPort {
        &self.ports[port.index()]
    }

    fn record(&self, port: Port, pin: u8, write: Write) {
        if let Ok(mut writes) = self.writes.lock() {
            writes.push((port, pin, write));
        }
    }

    /// Latch and config writes issued for `port`/`pin` so far.
    pub(crate) fn writes(&self, port: Port, pin: u8) -> Vec<Write> {
        self.writes
            .lock()
            .map(|writes| {
                writes
                    .iter()
                    .filter(|(p, n, _)| *p == port && *n == pin)
                    .map(|(_, _, write)| *write)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn set_bit(reg: &AtomicU32, bit: u8, enabled: bool) {
        if enabled {
            reg.fetch_or(1 << bit, Ordering::SeqCst);
        } else {
            reg.fetch_and(!(1 << bit), Ordering::SeqCst);
        }
    }

    fn bit(reg: &AtomicU32, bit: u8) -> bool {
        reg.load(Ordering::SeqCst) & (1 << bit) != 0
    }

    /// Drives an external signal onto an input pin, and latches a pending
    /// request when the edge matches the line's configured triggers.
    pub(crate) fn drive(&self, port: Port, pin: u8, level: Level) {
        let sim_port = self.port(port);
        let mask = 1u16 << pin;

        let prev = if level == Level::High {
            sim_port.idr.fetch_or(mask, Ordering::SeqCst)
        } else {
            sim_port.idr.fetch_and(!mask, Ordering::SeqCst)
        };

        let was_high = prev & mask != 0;
        let rising = !was_high && level == Level::High;
        let falling = was_high && level == Level::Low;

        if self.exti_source(pin) != Some(port) {
            return;
        }

        // EXTI latches PR on a selected edge even while IMR masks the request
        if (rising && Self::bit(&self.rtsr, pin)) || (falling && Self::bit(&self.ftsr, pin)) {
            self.pr.fetch_or(1 << pin, Ordering::SeqCst);
        }
    }

    pub(crate) fn set_pending(&self, line: u8) {
        self.pr.fetch_or(1 << line, Ordering::SeqCst);
    }

    pub(crate) fn config_of(&self, port: Port, pin: u8) -> u8 {
        self.config(port, pin)
    }

    pub(crate) fn odr_bit(&self, port: Port, pin: u8) -> bool {
        self.output(port) & (1 << pin) != 0
    }

    pub(crate) fn rising(&self, line: u8) -> bool {
        Self::bit(&self.rtsr, line)
    }

    pub(crate) fn falling(&self, line: u8) -> bool {
        Self::bit(&self.ftsr, line)
    }

    pub(crate) fn unmasked(&self, line: u8) -> bool {
        Self::bit(&self.imr, line)
    }

    pub(crate) fn event_unmasked(&self, line: u8) -> bool {
        Self::bit(&self.emr, line)
    }

    pub(crate) fn swier(&self) -> u32 {
        self.swier.load(Ordering::SeqCst)
    }

    pub(crate) fn irq_enabled(&self, irq: Irq) -> bool {
        self.nvic_enabled.load(Ordering::SeqCst) & (1 << irq.number()) != 0
    }

    pub(crate) fn irq_priority(&self, irq: Irq) -> u8 {
        self.nvic_priority[usize::from(irq.number())].load(Ordering::SeqCst)
    }

    pub(crate) fn port_clock_enabled(&self, port: Port) -> bool {
        self.apb2enr.load(Ordering::SeqCst) & (1 << (APB2ENR_IOPEN_LSB + port as u32)) != 0
    }

    pub(crate) fn afio_clock_enabled(&self) -> bool {
        self.apb2enr.load(Ordering::SeqCst) & APB2ENR_AFIOEN != 0
    }
}

impl GpioRegisters for SimRegisters {
    fn enable_port_clock(&self, port: Port) {
        self.apb2enr
            .fetch_or(1 << (APB2ENR_IOPEN_LSB + port as u32), Ordering::SeqCst);
    }

    fn enable_afio_clock(&self) {
        self.apb2enr.fetch_or(APB2ENR_AFIOEN, Ordering::SeqCst);
    }

    fn config(&self, port: Port, pin: u8) -> u8 {
        let reg = &self.port(port).cr[usize::from(pin / 8)];
        let shift = u32::from(pin % 8) * 4;

        ((reg.load(Ordering::SeqCst) >> shift) & 0xf) as u8
    }

    fn set_config(&self, port: Port, pin: u8, config: u8) {
        let reg = &self.port(port).cr[usize::from(pin / 8)];
        let shift = u32::from(pin % 8) * 4;

        let _ = reg.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |value| {
            Some((value & !(0xf << shift)) | (u32::from(config & 0xf) << shift))
        });
        self.record(port, pin, Write::Config(config & 0xf));

        // An enabled output driver puts the latch value on the pad
        if is_output_config(config) {
            let sim_port = self.port(port);
            let mask = 1u16 << pin;

            if sim_port.odr.load(Ordering::SeqCst) & mask != 0 {
                sim_port.idr.fetch_or(mask, Ordering::SeqCst);
            } else {
                sim_port.idr.fetch_and(!mask, Ordering::SeqCst);
            }
        }
    }

    fn input(&self, port: Port) -> u16 {
        self.port(port).idr.load(Ordering::SeqCst)
    }

    fn output(&self, port: Port) -> u16 {
        self.port(port).odr.load(Ordering::SeqCst)
    }

    fn set_high(&self, port: Port, pin: u8) {
        let sim_port = self.port(port);

        sim_port.odr.fetch_or(1 << pin, Ordering::SeqCst);
        self.record(port, pin, Write::Latch(Level::High));
        if is_output_config(self.config(port, pin)) {
            sim_port.idr.fetch_or(1 << pin, Ordering::SeqCst);
        }
    }

    fn set_low(&self, port: Port, pin: u8) {
        let sim_port = self.port(port);

        sim_port.odr.fetch_and(!(1 << pin), Ordering::SeqCst);
        self.record(port, pin, Write::Latch(Level::Low));
        if is_output_config(self.config(port, pin)) {
            sim_port.idr.fetch_and(!(1 << pin), Ordering::SeqCst);
        }
    }

    fn exti_source(&self, line: u8) -> Option<Port> {
        let reg = &self.exticr[usize::from(line / 4)];
        let shift = u32::from(line % 4) * 4;

        Port::from_index(((reg.load(Ordering::SeqCst) >> shift) & 0xf) as u8)
    }

    fn set_exti_source(&self, line: u8, port: Port) {
        let reg = &self.exticr[usize::from(line / 4)];
        let shift = u32::from(line % 4) * 4;

        let _ = reg.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |value| {
            Some((value & !(0xf << shift)) | ((port as u32) << shift))
        });
    }

    fn set_rising_trigger(&self, line: u8, enabled: bool) {
        Self::set_bit(&self.rtsr, line, enabled);
    }

    fn set_falling_trigger(&self, line: u8, enabled: bool) {
        Self::set_bit(&self.ftsr, line, enabled);
    }

    fn set_event_mask(&self, line: u8, enabled: bool) {
        Self::set_bit(&self.emr, line, enabled);
    }

    fn set_interrupt_mask(&self, line: u8, enabled: bool) {
        Self::set_bit(&self.imr, line, enabled);
    }

    fn interrupt_mask(&self) -> u32 {
        self.imr.load(Ordering::SeqCst)
    }

    fn pending(&self) -> u32 {
        self.pr.load(Ordering::SeqCst)
    }

    fn clear_pending(&self, line: u8) {
        // Clearing PR also clears the matching SWIER bit
        self.pr.fetch_and(!(1 << line), Ordering::SeqCst);
        self.swier.fetch_and(!(1 << line), Ordering::SeqCst);
    }

    fn software_trigger(&self, line: u8) {
        let prev = self.swier.fetch_or(1 << line, Ordering::SeqCst);

        if prev & (1 << line) == 0 && Self::bit(&self.imr, line) {
            self.pr.fetch_or(1 << line, Ordering::SeqCst);
        }
    }

    fn set_irq_priority(&self, irq: Irq, priority: u8) {
        self.nvic_priority[usize::from(irq.number())].store(priority, Ordering::SeqCst);
    }

    fn enable_irq(&self, irq: Irq) {
        self.nvic_enabled.fetch_or(1 << irq.number(), Ordering::SeqCst);
    }

    fn disable_irq(&self, irq: Irq) {
        self.nvic_enabled.fetch_and(!(1 << irq.number()), Ordering::SeqCst);
    }
}
