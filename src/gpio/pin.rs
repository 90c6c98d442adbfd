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

use super::gpiomem::{input_config, is_output_config, mode_from_config, output_config};
use super::interrupt::{self, Callback};
use crate::gpio::{
    Bias, GpioMem, GpioRegisters, GpioState, Level, Mode, PinId, Port, Result, Trigger,
};

macro_rules! impl_pin {
    () => {
        /// Returns the pin number within its port.
        ///
        /// The pin number also selects the pin's EXTI line.
        #[inline]
        pub fn pin(&self) -> u8 {
            self.pin.id.pin
        }

        /// Returns the pin's port.
        #[inline]
        pub fn port(&self) -> Port {
            self.pin.id.port
        }

        /// Returns the pin's port and number.
        #[inline]
        pub fn id(&self) -> PinId {
            self.pin.id
        }
    };
}

macro_rules! impl_input {
    () => {
        /// Reads the pin's logic level.
        #[inline]
        pub fn read(&self) -> Level {
            self.pin.read()
        }

        /// Reads the pin's logic level, and returns `true` if it's set to [`Low`].
        ///
        /// [`Low`]: enum.Level.html#variant.Low
        #[inline]
        pub fn is_low(&self) -> bool {
            self.pin.read() == Level::Low
        }

        /// Reads the pin's logic level, and returns `true` if it's set to [`High`].
        ///
        /// [`High`]: enum.Level.html#variant.High
        #[inline]
        pub fn is_high(&self) -> bool {
            self.pin.read() == Level::High
        }
    };
}

macro_rules! impl_reset_on_drop {
    () => {
        /// Returns the value of `reset_on_drop`.
        pub fn reset_on_drop(&self) -> bool {
            self.reset_on_drop
        }

        /// When enabled, resets the pin's mode to its original state when the pin
        /// goes out of scope. By default, this is set to `true`.
        pub fn set_reset_on_drop(&mut self, reset_on_drop: bool) {
            self.reset_on_drop = reset_on_drop;
        }
    };
}

macro_rules! impl_eq {
    ($struct:ident) => {
        impl<R: GpioRegisters> PartialEq for $struct<'_, R> {
            fn eq(&self, other: &Self) -> bool {
                self.id() == other.id()
            }
        }

        impl<'a, 'b, R: GpioRegisters> PartialEq<&'b $struct<'a, R>> for $struct<'a, R> {
            fn eq(&self, other: &&'b $struct<'a, R>) -> bool {
                self.id() == other.id()
            }
        }

        impl<R: GpioRegisters> Eq for $struct<'_, R> {}
    };
}

/// Unconfigured GPIO pin.
///
/// `Pin`s are constructed by retrieving them using [`Gpio::get`].
///
/// An unconfigured `Pin` can be used to read the pin's mode and logic level.
/// Converting the `Pin` to an [`InputPin`] or [`OutputPin`] through the
/// various `into_` methods available on `Pin` configures the appropriate mode, and
/// provides access to additional methods relevant to the selected pin mode.
///
/// [`Gpio::get`]: struct.Gpio.html#method.get
/// [`InputPin`]: struct.InputPin.html
/// [`OutputPin`]: struct.OutputPin.html
#[derive(Debug)]
pub struct Pin<'a, R: GpioRegisters = GpioMem> {
    pub(crate) id: PinId,
    pub(crate) state: &'a GpioState<R>,
}

impl<'a, R: GpioRegisters> Pin<'a, R> {
    pub(crate) fn new(id: PinId, state: &'a GpioState<R>) -> Pin<'a, R> {
        // Port registers read as zero until the port is clocked
        state.regs.enable_port_clock(id.port);

        Pin { id, state }
    }

    /// Returns the pin number within its port.
    #[inline]
    pub fn pin(&self) -> u8 {
        self.id.pin
    }

    /// Returns the pin's port.
    #[inline]
    pub fn port(&self) -> Port {
        self.id.port
    }

    /// Returns the pin's port and number.
    #[inline]
    pub fn id(&self) -> PinId {
        self.id
    }

    /// Returns the pin's mode.
    #[inline]
    pub fn mode(&self) -> Mode {
        mode_from_config(self.config())
    }

    /// Reads the pin's logic level.
    ///
    /// While the pin's output driver is enabled, this returns the level the pin is
    /// set to. Otherwise, it returns the sampled input level.
    pub fn read(&self) -> Level {
        let bits = if is_output_config(self.config()) {
            self.state.regs.output(self.id.port)
        } else {
            self.state.regs.input(self.id.port)
        };

        Level::from(bits & self.id.mask() != 0)
    }

    /// Consumes the `Pin`, returns an [`InputPin`] and sets its mode to a
    /// floating [`Input`].
    ///
    /// [`InputPin`]: struct.InputPin.html
    /// [`Input`]: enum.Mode.html#variant.Input
    #[inline]
    pub fn into_input(self) -> InputPin<'a, R> {
        InputPin::new(self, Bias::Off)
    }

    /// Consumes the `Pin`, returns an [`InputPin`], sets its mode to [`Input`],
    /// and enables the pin's built-in pull-down resistor.
    ///
    /// The pull-down resistor is disabled when `InputPin` goes out of scope if [`reset_on_drop`]
    /// is set to `true` (default).
    ///
    /// [`InputPin`]: struct.InputPin.html
    /// [`Input`]: enum.Mode.html#variant.Input
    /// [`reset_on_drop`]: struct.InputPin.html#method.set_reset_on_drop
    #[inline]
    pub fn into_input_pulldown(self) -> InputPin<'a, R> {
        InputPin::new(self, Bias::PullDown)
    }

    /// Consumes the `Pin`, returns an [`InputPin`], sets its mode to [`Input`],
    /// and enables the pin's built-in pull-up resistor.
    ///
    /// The pull-up resistor is disabled when `InputPin` goes out of scope if [`reset_on_drop`]
    /// is set to `true` (default).
    ///
    /// [`InputPin`]: struct.InputPin.html
    /// [`Input`]: enum.Mode.html#variant.Input
    /// [`reset_on_drop`]: struct.InputPin.html#method.set_reset_on_drop
    #[inline]
    pub fn into_input_pullup(self) -> InputPin<'a, R> {
        InputPin::new(self, Bias::PullUp)
    }

    /// Consumes the `Pin`, returns an [`OutputPin`] and sets its mode to a
    /// push-pull [`Output`], driven [`Low`].
    ///
    /// [`OutputPin`]: struct.OutputPin.html
    /// [`Output`]: enum.Mode.html#variant.Output
    /// [`Low`]: enum.Level.html#variant.Low
    #[inline]
    pub fn into_output(self) -> OutputPin<'a, R> {
        OutputPin::new(self, Level::Low, false)
    }

    /// Consumes the `Pin`, returns an [`OutputPin`] and sets its mode to a
    /// push-pull [`Output`], driven [`High`].
    ///
    /// [`OutputPin`]: struct.OutputPin.html
    /// [`Output`]: enum.Mode.html#variant.Output
    /// [`High`]: enum.Level.html#variant.High
    #[inline]
    pub fn into_output_high(self) -> OutputPin<'a, R> {
        OutputPin::new(self, Level::High, false)
    }

    /// Consumes the `Pin`, returns an [`OutputPin`] and sets its mode to
    /// [`OutputOpenDrain`]. The pin starts out released ([`High`]).
    ///
    /// [`OutputPin`]: struct.OutputPin.html
    /// [`OutputOpenDrain`]: enum.Mode.html#variant.OutputOpenDrain
    /// [`High`]: enum.Level.html#variant.High
    #[inline]
    pub fn into_output_open_drain(self) -> OutputPin<'a, R> {
        OutputPin::new(self, Level::High, true)
    }

    #[inline]
    pub(crate) fn config(&self) -> u8 {
        self.state.regs.config(self.id.port, self.id.pin)
    }

    #[inline]
    pub(crate) fn set_config(&mut self, config: u8) {
        self.state.regs.set_config(self.id.port, self.id.pin, config);
    }

    // Switches to `config`. Returns the previous config if it changed.
    fn replace_config(&mut self, config: u8) -> Option<u8> {
        let prev_config = self.config();

        if prev_config == config {
            None
        } else {
            self.set_config(config);
            Some(prev_config)
        }
    }

    // Output latch (ODR), regardless of mode.
    #[inline]
    pub(crate) fn latch(&self) -> Level {
        Level::from(self.state.regs.output(self.id.port) & self.id.mask() != 0)
    }

    #[inline]
    pub(crate) fn set_low(&mut self) {
        self.state.regs.set_low(self.id.port, self.id.pin);
    }

    #[inline]
    pub(crate) fn set_high(&mut self) {
        self.state.regs.set_high(self.id.port, self.id.pin);
    }

    #[inline]
    pub(crate) fn write(&mut self, level: Level) {
        match level {
            Level::Low => self.set_low(),
            Level::High => self.set_high(),
        };
    }
}

impl<R: GpioRegisters> Drop for Pin<'_, R> {
    fn drop(&mut self) {
        // Release taken pin
        self.state.release_pin(self.id);
    }
}

impl<R: GpioRegisters> PartialEq for Pin<'_, R> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<R: GpioRegisters> Eq for Pin<'_, R> {}

/// GPIO pin configured as input.
///
/// `InputPin`s are constructed by converting a [`Pin`] using [`Pin::into_input`],
/// [`Pin::into_input_pullup`] or [`Pin::into_input_pulldown`]. The pin's mode is
/// automatically set to [`Input`].
///
/// An `InputPin` can be used to read a pin's logic level, or to call a function
/// from interrupt context when the pin's level changes.
///
/// [`Pin`]: struct.Pin.html
/// [`Input`]: enum.Mode.html#variant.Input
/// [`Pin::into_input`]: struct.Pin.html#method.into_input
/// [`Pin::into_input_pullup`]: struct.Pin.html#method.into_input_pullup
/// [`Pin::into_input_pulldown`]: struct.Pin.html#method.into_input_pulldown
#[derive(Debug)]
pub struct InputPin<'a, R: GpioRegisters = GpioMem> {
    pub(crate) pin: Pin<'a, R>,
    prev_config: Option<u8>,
    trigger: Trigger,
    reset_on_drop: bool,
    bias: Bias,
}

impl<'a, R: GpioRegisters> InputPin<'a, R> {
    pub(crate) fn new(mut pin: Pin<'a, R>, bias: Bias) -> InputPin<'a, R> {
        let config = input_config(bias);

        let prev_config = if is_output_config(pin.config()) {
            // Release the driver first, so the pull direction never reaches the pad
            let prev_config = pin.replace_config(config);
            Self::latch_bias(&mut pin, bias);
            prev_config
        } else {
            Self::latch_bias(&mut pin, bias);
            pin.replace_config(config)
        };

        debug!("{} configured as input, bias {}", pin.id, bias);

        InputPin {
            pin,
            prev_config,
            trigger: Trigger::Disabled,
            reset_on_drop: true,
            bias,
        }
    }

    // With CNF set to pull, the output latch selects the direction
    fn latch_bias(pin: &mut Pin<'a, R>, bias: Bias) {
        match bias {
            Bias::PullUp => pin.set_high(),
            Bias::PullDown => pin.set_low(),
            Bias::Off => (),
        }
    }

    impl_pin!();
    impl_input!();

    /// Returns the pin's pull-up/pull-down resistor configuration.
    pub fn bias(&self) -> Bias {
        self.bias
    }

    /// Configures the pin as an EXTI interrupt source.
    ///
    /// `callback` is called from [`GpioState::handle_interrupt`] with the pin's level
    /// each time `trigger` occurs. Calling `set_interrupt` again replaces the trigger
    /// and callback. [`Trigger::Disabled`] removes the interrupt configuration, the
    /// same as [`clear_interrupt`].
    ///
    /// Pins with the same number share a single EXTI line. If another pin with this
    /// pin's number is already configured as an interrupt source, `set_interrupt`
    /// returns `Err(`[`Error::LineUsed`]`)`.
    ///
    /// The interrupt configuration is removed when `InputPin` goes out of scope.
    ///
    /// [`GpioState::handle_interrupt`]: struct.GpioState.html#method.handle_interrupt
    /// [`Trigger::Disabled`]: enum.Trigger.html#variant.Disabled
    /// [`clear_interrupt`]: #method.clear_interrupt
    /// [`Error::LineUsed`]: enum.Error.html#variant.LineUsed
    pub fn set_interrupt(&mut self, trigger: Trigger, callback: Callback) -> Result<()> {
        interrupt::arm(self.pin.state, self.pin.id, trigger, callback)?;
        self.trigger = trigger;

        Ok(())
    }

    /// Removes a previously configured interrupt trigger.
    pub fn clear_interrupt(&mut self) {
        if self.trigger != Trigger::Disabled {
            interrupt::disarm(self.pin.state, self.pin.id);
            self.trigger = Trigger::Disabled;
        }
    }

    /// Returns the configured interrupt trigger.
    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    /// Raises a software interrupt request on the pin's EXTI line.
    ///
    /// The request is serviced like a hardware trigger, and the callback receives
    /// the pin's current level. Does nothing if no interrupt is configured.
    pub fn trigger_interrupt(&self) {
        if self.trigger != Trigger::Disabled {
            self.pin.state.regs.software_trigger(self.pin.id.pin);
        }
    }

    impl_reset_on_drop!();
}

impl<R: GpioRegisters> Drop for InputPin<'_, R> {
    /// Removes the interrupt configuration, and resets the pin's mode if
    /// `reset_on_drop` is set to `true` (default).
    fn drop(&mut self) {
        self.clear_interrupt();

        if !self.reset_on_drop {
            return;
        }

        if let Some(prev_config) = self.prev_config {
            self.pin.set_config(prev_config);
        }
    }
}

impl_eq!(InputPin);

/// GPIO pin configured as output.
///
/// `OutputPin`s are constructed by converting a [`Pin`] using [`Pin::into_output`],
/// [`Pin::into_output_high`] or [`Pin::into_output_open_drain`]. The pin's mode is
/// automatically set to [`Output`] or [`OutputOpenDrain`], using the output speed from
/// the [`Config`].
///
/// An `OutputPin` can be used to change a pin's output state.
///
/// [`Pin`]: struct.Pin.html
/// [`Output`]: enum.Mode.html#variant.Output
/// [`OutputOpenDrain`]: enum.Mode.html#variant.OutputOpenDrain
/// [`Pin::into_output`]: struct.Pin.html#method.into_output
/// [`Pin::into_output_high`]: struct.Pin.html#method.into_output_high
/// [`Pin::into_output_open_drain`]: struct.Pin.html#method.into_output_open_drain
/// [`Config`]: struct.Config.html
#[derive(Debug)]
pub struct OutputPin<'a, R: GpioRegisters = GpioMem> {
    pin: Pin<'a, R>,
    prev_config: Option<u8>,
    reset_on_drop: bool,
}

impl<'a, R: GpioRegisters> OutputPin<'a, R> {
    pub(crate) fn new(mut pin: Pin<'a, R>, level: Level, open_drain: bool) -> OutputPin<'a, R> {
        // Latch the level before the driver is enabled, so the pin doesn't glitch
        pin.write(level);

        let speed = pin.state.config().output_speed;
        let prev_config = pin.replace_config(output_config(speed, open_drain));

        debug!("{} configured as output ({}), {}", pin.id, speed, level);

        OutputPin {
            pin,
            prev_config,
            reset_on_drop: true,
        }
    }

    impl_pin!();

    /// Returns the pin's mode.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.pin.mode()
    }

    /// Returns `true` if the pin's output state is set to [`Low`].
    ///
    /// [`Low`]: enum.Level.html#variant.Low
    #[inline]
    pub fn is_set_low(&self) -> bool {
        self.pin.latch() == Level::Low
    }

    /// Returns `true` if the pin's output state is set to [`High`].
    ///
    /// [`High`]: enum.Level.html#variant.High
    #[inline]
    pub fn is_set_high(&self) -> bool {
        self.pin.latch() == Level::High
    }

    /// Sets the pin's output state.
    #[inline]
    pub fn write(&mut self, level: Level) {
        self.pin.write(level)
    }

    /// Sets the pin's output state to [`Low`].
    ///
    /// [`Low`]: enum.Level.html#variant.Low
    #[inline]
    pub fn set_low(&mut self) {
        self.pin.set_low()
    }

    /// Sets the pin's output state to [`High`].
    ///
    /// [`High`]: enum.Level.html#variant.High
    #[inline]
    pub fn set_high(&mut self) {
        self.pin.set_high()
    }

    /// Toggles the pin's output state between [`Low`] and [`High`].
    ///
    /// [`Low`]: enum.Level.html#variant.Low
    /// [`High`]: enum.Level.html#variant.High
    #[inline]
    pub fn toggle(&mut self) {
        if self.pin.latch() == Level::Low {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    impl_reset_on_drop!();
}

impl<R: GpioRegisters> Drop for OutputPin<'_, R> {
    /// Resets the pin's mode if `reset_on_drop` is set to `true` (default).
    fn drop(&mut self) {
        if !self.reset_on_drop {
            return;
        }

        if let Some(prev_config) = self.prev_config {
            self.pin.set_config(prev_config);
        }
    }
}

impl_eq!(OutputPin);
