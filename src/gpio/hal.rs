use core::convert::Infallible;

use embedded_hal::digital::{
    ErrorType, InputPin as InputPinHal, OutputPin as OutputPinHal,
    StatefulOutputPin as StatefulOutputPinHal,
};

use super::{GpioRegisters, InputPin, Level, OutputPin, Pin};

/// `ErrorType` trait implementation for `embedded-hal` v1.0.0.
impl<R: GpioRegisters> ErrorType for Pin<'_, R> {
    type Error = Infallible;
}

/// `InputPin` trait implementation for `embedded-hal` v1.0.0.
impl<R: GpioRegisters> InputPinHal for Pin<'_, R> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(Self::read(self) == Level::High)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(Self::read(self) == Level::Low)
    }
}

/// `ErrorType` trait implementation for `embedded-hal` v1.0.0.
impl<R: GpioRegisters> ErrorType for InputPin<'_, R> {
    type Error = Infallible;
}

/// `InputPin` trait implementation for `embedded-hal` v1.0.0.
impl<R: GpioRegisters> InputPinHal for InputPin<'_, R> {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(InputPin::is_high(self))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(InputPin::is_low(self))
    }
}

/// `ErrorType` trait implementation for `embedded-hal` v1.0.0.
impl<R: GpioRegisters> ErrorType for OutputPin<'_, R> {
    type Error = Infallible;
}

/// `OutputPin` trait implementation for `embedded-hal` v1.0.0.
impl<R: GpioRegisters> OutputPinHal for OutputPin<'_, R> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        OutputPin::set_low(self);

        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        OutputPin::set_high(self);

        Ok(())
    }
}

/// `StatefulOutputPin` trait implementation for `embedded-hal` v1.0.0.
impl<R: GpioRegisters> StatefulOutputPinHal for OutputPin<'_, R> {
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok(OutputPin::is_set_high(self))
    }

    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok(OutputPin::is_set_low(self))
    }

    fn toggle(&mut self) -> Result<(), Self::Error> {
        OutputPin::toggle(self);

        Ok(())
    }
}

/// `OutputPin` trait implementation for `embedded-hal` v0.2.7.
impl<R: GpioRegisters> embedded_hal_0::digital::v2::OutputPin for OutputPin<'_, R> {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        OutputPinHal::set_low(self)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        OutputPinHal::set_high(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::gpiomem::sim::SimRegisters;
    use crate::gpio::{Config, Gpio, GpioState, Port};

    fn blink<P: OutputPinHal>(pin: &mut P) -> Result<(), P::Error> {
        pin.set_high()?;
        pin.set_low()?;
        pin.set_high()
    }

    #[test]
    fn output_pin_drives_generic_driver() {
        let state = GpioState::new(SimRegisters::new(), Config::new());
        let gpio = Gpio::new(&state);
        let mut led = gpio.get(Port::C, 13).unwrap().into_output();

        blink(&mut led).unwrap();
        assert_eq!(StatefulOutputPinHal::is_set_high(&mut led), Ok(true));

        StatefulOutputPinHal::toggle(&mut led).unwrap();
        assert_eq!(StatefulOutputPinHal::is_set_low(&mut led), Ok(true));

        embedded_hal_0::digital::v2::OutputPin::set_high(&mut led).unwrap();
        assert!(led.is_set_high());
    }

    #[test]
    fn input_pin_reads_level() {
        let state = GpioState::new(SimRegisters::new(), Config::new());
        let gpio = Gpio::new(&state);
        let mut button = gpio.get(Port::B, 1).unwrap().into_input();

        assert_eq!(InputPinHal::is_low(&mut button), Ok(true));
        state.registers().drive(Port::B, 1, Level::High);
        assert_eq!(InputPinHal::is_high(&mut button), Ok(true));
    }
}
