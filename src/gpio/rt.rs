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

// EXTI vector symbols. The device crate's vector table refers to the handlers by
// name, and its linker script only falls back to `DefaultHandler` for symbols
// nothing else defines.

#![allow(non_snake_case)]

use super::{Irq, GPIO};

#[no_mangle]
pub extern "C" fn EXTI0() {
    GPIO.handle_interrupt(Irq::Exti0);
}

#[no_mangle]
pub extern "C" fn EXTI1() {
    GPIO.handle_interrupt(Irq::Exti1);
}

#[no_mangle]
pub extern "C" fn EXTI2() {
    GPIO.handle_interrupt(Irq::Exti2);
}

#[no_mangle]
pub extern "C" fn EXTI3() {
    GPIO.handle_interrupt(Irq::Exti3);
}

#[no_mangle]
pub extern "C" fn EXTI4() {
    GPIO.handle_interrupt(Irq::Exti4);
}

#[no_mangle]
pub extern "C" fn EXTI9_5() {
    GPIO.handle_interrupt(Irq::Exti9_5);
}

#[no_mangle]
pub extern "C" fn EXTI15_10() {
    GPIO.handle_interrupt(Irq::Exti15_10);
}
