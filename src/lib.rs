//! stm32f1-gpio provides access to the STM32F1's GPIO peripheral through a
//! small, owned-pin interface. Pins can be configured as inputs or outputs,
//! read and driven, and armed as edge-triggered interrupt sources with a
//! callback per pin.
//!
//! The EXTI controller routes line `n` from pin `n` of a single port, and
//! several lines share one NVIC vector (`EXTI9_5`, `EXTI15_10`). The
//! [`gpio::GpioState::handle_interrupt`] dispatcher demultiplexes a shared
//! vector back to the callbacks registered for each pending line.
//!
//! The library can be used in conjunction with a variety of platform-agnostic
//! drivers through its `embedded-hal` trait implementations. Both `embedded-hal`
//! v0.2.7 and v1.0.0 are supported.
//!
//! The crate is `no_std` and doesn't require an allocator. Interrupt callbacks
//! are plain function pointers.

// Used by rustdoc to link other crates to stm32f1-gpio's docs
#![doc(html_root_url = "https://docs.rs/stm32f1-gpio/0.1.0")]
#![cfg_attr(not(test), no_std)]

#[macro_use]
mod macros;

pub mod gpio;
