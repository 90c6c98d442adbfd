//! Interface for the GPIO peripheral.
//!
//! The GPIO ports, the AFIO external interrupt routing and the EXTI controller
//! are accessed directly through their memory-mapped registers. NVIC vectors are
//! masked, unmasked and prioritized through the `cortex-m` crate.
//!
//! ## State
//!
//! All pins share a single [`GpioState`], which owns the register backend, the
//! [`Config`], the pin ownership bits and the EXTI callback table.
//! [`GpioState::new`] is a `const fn`, so the state is usually placed in a
//! `static`, where both the application and the EXTI vector handlers can reach it.
//! With the `rt` feature enabled, the crate provides that `static` as [`GPIO`]
//! together with the vector symbols.
//!
//! ## Pins
//!
//! GPIO pins are retrieved from a [`Gpio`] handle by their port and number by calling
//! [`Gpio::get`]. The returned unconfigured [`Pin`] can be used to read the pin's
//! mode and logic level. Converting the [`Pin`] to an [`InputPin`] or [`OutputPin`]
//! through the various `into_` methods available on [`Pin`] configures the
//! appropriate mode, and provides access to additional methods relevant to the
//! selected pin mode.
//!
//! Retrieving a GPIO pin with [`Gpio::get`] grants access to the pin through an owned [`Pin`]
//! instance. If the pin is already in use, [`Gpio::get`] returns `Err(`[`Error::PinUsed`]`)`.
//! If the part doesn't have the requested port, or the pin number is out of range,
//! [`Gpio::get`] returns `Err(`[`Error::PinNotAvailable`]`)`. After a [`Pin`]
//! (or a derived [`InputPin`] or [`OutputPin`]) goes out of scope, it can be
//! retrieved again through another [`Gpio::get`] call.
//!
//! By default, pins are reset to their original mode when they go out of scope.
//! Use [`InputPin::set_reset_on_drop(false)`] or [`OutputPin::set_reset_on_drop(false)`],
//! respectively, to disable this behavior.
//!
//! ## Interrupts
//!
//! [`InputPin::set_interrupt`] routes the pin to its EXTI line, selects the trigger
//! edges and stores a callback for the line. The EXTI controller has a single line
//! per pin number, shared between ports, so `PA3` and `PB3` can't both be armed at
//! the same time. Arming the second one returns `Err(`[`Error::LineUsed`]`)`.
//!
//! Lines 0 through 4 each have their own vector. Lines 5 through 9 share `EXTI9_5`, and
//! lines 10 through 15 share `EXTI15_10`. The vector handlers call
//! [`GpioState::handle_interrupt`], which clears the pending bit of every pending line
//! that belongs to the vector, and then calls the callback registered for that line.
//! Callbacks run in interrupt context.
//!
//! ## Examples
//!
//! ```no_run
//! use stm32f1_gpio::gpio::{Config, Gpio, GpioMem, GpioState, Irq, Level, Port, Trigger};
//!
//! static GPIO: GpioState<GpioMem> = GpioState::new(GpioMem::new(), Config::new());
//!
//! fn button_changed(level: Level) {
//!     // Runs in interrupt context.
//!     let _ = level;
//! }
//!
//! // Bound to the EXTI0 vector by the application's runtime.
//! #[allow(non_snake_case)]
//! fn EXTI0() {
//!     GPIO.handle_interrupt(Irq::Exti0);
//! }
//!
//! # fn main() -> stm32f1_gpio::gpio::Result<()> {
//! let gpio = Gpio::new(&GPIO);
//!
//! let mut led = gpio.get(Port::C, 13)?.into_output();
//! led.set_high();
//!
//! let mut button = gpio.get(Port::A, 0)?.into_input_pullup();
//! button.set_interrupt(Trigger::FallingEdge, button_changed)?;
//! # Ok(())
//! # }
//! ```
//!
//! [`Gpio`]: struct.Gpio.html
//! [`Gpio::get`]: struct.Gpio.html#method.get
//! [`GpioState`]: struct.GpioState.html
//! [`GpioState::new`]: struct.GpioState.html#method.new
//! [`GpioState::handle_interrupt`]: struct.GpioState.html#method.handle_interrupt
//! [`GPIO`]: static.GPIO.html
//! [`Config`]: struct.Config.html
//! [`Error::PinUsed`]: enum.Error.html#variant.PinUsed
//! [`Error::PinNotAvailable`]: enum.Error.html#variant.PinNotAvailable
//! [`Error::LineUsed`]: enum.Error.html#variant.LineUsed
//! [`Pin`]: struct.Pin.html
//! [`InputPin`]: struct.InputPin.html
//! [`InputPin::set_reset_on_drop(false)`]: struct.InputPin.html#method.set_reset_on_drop
//! [`InputPin::set_interrupt`]: struct.InputPin.html#method.set_interrupt
//! [`OutputPin`]: struct.OutputPin.html
//! [`OutputPin::set_reset_on_drop(false)`]: struct.OutputPin.html#method.set_reset_on_drop

use core::cell::Cell;
use core::error;
use core::fmt;
use core::ops::Not;
use core::result;
use core::sync::atomic::{AtomicU16, Ordering};

use critical_section::Mutex;

mod gpiomem;
#[cfg(feature = "hal")]
mod hal;
#[cfg(feature = "hal-unproven")]
mod hal_unproven;
mod interrupt;
mod pin;
#[cfg(feature = "rt")]
mod rt;

pub use self::gpiomem::stm32f1::GpioMem;
pub use self::gpiomem::GpioRegisters;
pub use self::interrupt::{Callback, Irq};
pub use self::pin::{InputPin, OutputPin, Pin};

use self::interrupt::InterruptTable;

// Number of pins per port. Each pin number also selects the EXTI line.
pub(crate) const PINS_PER_PORT: u8 = 16;
// Ports A through G.
pub(crate) const PORTS: usize = 7;

/// Errors that can occur when accessing the GPIO peripheral.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Pin is not available.
    ///
    /// The pin number is out of range, or the port is beyond the last port
    /// present on the part, as set through [`Config::last_port`].
    ///
    /// [`Config::last_port`]: struct.Config.html#method.last_port
    PinNotAvailable(PinId),
    /// Pin is already in use.
    ///
    /// The pin is already in use elsewhere in your application. If the pin is currently in
    /// use, you may retrieve it again after the [`Pin`] (or a derived [`InputPin`] or
    /// [`OutputPin`]) instance goes out of scope.
    ///
    /// [`Pin`]: struct.Pin.html
    /// [`InputPin`]: struct.InputPin.html
    /// [`OutputPin`]: struct.OutputPin.html
    PinUsed(PinId),
    /// EXTI line is already in use.
    ///
    /// Pins with the same number share a single EXTI line, regardless of their port.
    /// `owner` is the pin that currently has an interrupt configured on `line`.
    LineUsed { line: u8, owner: PinId },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::PinNotAvailable(pin) => write!(f, "Pin {} is not available", pin),
            Error::PinUsed(pin) => write!(f, "Pin {} is already in use", pin),
            Error::LineUsed { line, owner } => {
                write!(f, "EXTI line {} is already in use by pin {}", line, owner)
            }
        }
    }
}

impl error::Error for Error {}

/// Result type returned from methods that can have `stm32f1_gpio::gpio::Error`s.
pub type Result<T> = result::Result<T, Error>;

/// GPIO ports.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Port {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
}

impl Port {
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    pub(crate) const fn from_index(index: u8) -> Option<Port> {
        match index {
            0 => Some(Port::A),
            1 => Some(Port::B),
            2 => Some(Port::C),
            3 => Some(Port::D),
            4 => Some(Port::E),
            5 => Some(Port::F),
            6 => Some(Port::G),
            _ => None,
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Port::A => 'A',
            Port::B => 'B',
            Port::C => 'C',
            Port::D => 'D',
            Port::E => 'E',
            Port::F => 'F',
            Port::G => 'G',
        };

        write!(f, "{}", name)
    }
}

/// Identifies a single pin by its port and pin number.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId {
    pub port: Port,
    pub pin: u8,
}

impl PinId {
    /// Constructs a new `PinId`.
    pub const fn new(port: Port, pin: u8) -> PinId {
        PinId { port, pin }
    }

    // Single-bit mask for the pin within its port's registers, and for
    // its EXTI line.
    #[inline]
    pub(crate) const fn mask(self) -> u16 {
        1 << self.pin
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}{}", self.port, self.pin)
    }
}

/// Pin modes.
///
/// Decoded from the pin's `CNF` and `MODE` bits in `GPIOx_CRL`/`GPIOx_CRH`.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Analog,
    Input,
    Output,
    OutputOpenDrain,
    Alternate,
    AlternateOpenDrain,
}

impl Mode {
    /// Returns `true` if the pin's output driver is enabled.
    pub fn is_output(self) -> bool {
        !matches!(self, Mode::Analog | Mode::Input)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Mode::Analog => write!(f, "Analog"),
            Mode::Input => write!(f, "In"),
            Mode::Output => write!(f, "Out"),
            Mode::OutputOpenDrain => write!(f, "OutOd"),
            Mode::Alternate => write!(f, "Alt"),
            Mode::AlternateOpenDrain => write!(f, "AltOd"),
        }
    }
}

/// Pin logic levels.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Level {
    Low = 0,
    High = 1,
}

impl From<bool> for Level {
    fn from(e: bool) -> Level {
        if e {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Level::Low => write!(f, "Low"),
            Level::High => write!(f, "High"),
        }
    }
}

impl From<u8> for Level {
    fn from(value: u8) -> Self {
        if value == 0 {
            Level::Low
        } else {
            Level::High
        }
    }
}

impl Not for Level {
    type Output = Level;

    fn not(self) -> Level {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

/// Built-in pull-up/pull-down resistor states.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bias {
    Off,
    PullDown,
    PullUp,
}

impl fmt::Display for Bias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Bias::Off => write!(f, "Off"),
            Bias::PullDown => write!(f, "PullDown"),
            Bias::PullUp => write!(f, "PullUp"),
        }
    }
}

/// Maximum output speed, as encoded in the pin's `MODE` bits.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    Mhz10 = 0b01,
    Mhz2 = 0b10,
    Mhz50 = 0b11,
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Speed::Mhz10 => write!(f, "10MHz"),
            Speed::Mhz2 => write!(f, "2MHz"),
            Speed::Mhz50 => write!(f, "50MHz"),
        }
    }
}

/// Interrupt trigger conditions.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    Disabled = 0,
    RisingEdge = 1,
    FallingEdge = 2,
    Both = 3,
}

impl Trigger {
    #[inline]
    pub(crate) fn rising(self) -> bool {
        matches!(self, Trigger::RisingEdge | Trigger::Both)
    }

    #[inline]
    pub(crate) fn falling(self) -> bool {
        matches!(self, Trigger::FallingEdge | Trigger::Both)
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Trigger::Disabled => write!(f, "Disabled"),
            Trigger::RisingEdge => write!(f, "RisingEdge"),
            Trigger::FallingEdge => write!(f, "FallingEdge"),
            Trigger::Both => write!(f, "Both"),
        }
    }
}

/// Driver configuration.
///
/// `Config` is built with `const` setters, so it can be used to initialize a
/// `static` [`GpioState`].
///
/// ```
/// use stm32f1_gpio::gpio::{Config, Port, Speed};
///
/// const CONFIG: Config = Config::new()
///     .irq_priority(3)
///     .output_speed(Speed::Mhz2)
///     .last_port(Port::G);
///
/// assert_eq!(CONFIG.get_irq_priority(), 3);
/// ```
///
/// [`GpioState`]: struct.GpioState.html
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    irq_priority: u8,
    output_speed: Speed,
    last_port: Port,
}

impl Config {
    /// Constructs a new `Config` with the default settings.
    ///
    /// EXTI vectors use priority 1, outputs are configured for 50 MHz,
    /// and ports A through E are available.
    pub const fn new() -> Config {
        Config {
            irq_priority: 1,
            output_speed: Speed::Mhz50,
            last_port: Port::E,
        }
    }

    /// Sets the NVIC priority used for all EXTI vectors.
    ///
    /// The STM32F1 implements 4 priority bits, so `priority` is limited to `0..=15`,
    /// where `0` is the highest priority. Larger values are clamped to `15`.
    pub const fn irq_priority(mut self, priority: u8) -> Config {
        self.irq_priority = if priority > 15 { 15 } else { priority };
        self
    }

    /// Sets the maximum output speed used when a pin is configured as an output.
    pub const fn output_speed(mut self, speed: Speed) -> Config {
        self.output_speed = speed;
        self
    }

    /// Sets the last GPIO port present on the part.
    ///
    /// Accessing the registers of a port that doesn't exist causes a bus fault, so
    /// [`Gpio::get`] refuses pins on ports beyond `port`.
    ///
    /// [`Gpio::get`]: struct.Gpio.html#method.get
    pub const fn last_port(mut self, port: Port) -> Config {
        self.last_port = port;
        self
    }

    /// Returns the NVIC priority used for all EXTI vectors.
    pub const fn get_irq_priority(&self) -> u8 {
        self.irq_priority
    }

    /// Returns the output speed.
    pub const fn get_output_speed(&self) -> Speed {
        self.output_speed
    }

    /// Returns the last GPIO port present on the part.
    pub const fn get_last_port(&self) -> Port {
        self.last_port
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::new()
    }
}

/// Shared driver state.
///
/// Owns the register backend, the configuration, the pin ownership bits and
/// the EXTI callback table. Pins borrow the state for as long as they exist.
pub struct GpioState<R: GpioRegisters = GpioMem> {
    pub(crate) regs: R,
    config: Mutex<Cell<Config>>,
    pins_taken: [AtomicU16; PORTS],
    pub(crate) interrupts: InterruptTable,
}

impl<R: GpioRegisters> GpioState<R> {
    /// Constructs a new `GpioState`.
    pub const fn new(regs: R, config: Config) -> GpioState<R> {
        GpioState {
            regs,
            config: Mutex::new(Cell::new(config)),
            pins_taken: [const { AtomicU16::new(0) }; PORTS],
            interrupts: InterruptTable::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> Config {
        critical_section::with(|cs| self.config.borrow(cs).get())
    }

    /// Replaces the configuration.
    ///
    /// Intended for a `static` state, such as the one provided with the `rt` feature,
    /// and best called before any pin is taken. Pins that are already configured as
    /// outputs keep their speed, and vectors that are already enabled keep their
    /// priority until a line is armed on them again.
    pub fn configure(&self, config: Config) {
        debug!("Config changed to {}", config);

        critical_section::with(|cs| self.config.borrow(cs).set(config));
    }

    /// Returns the register backend.
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Services the EXTI lines that belong to `irq`.
    ///
    /// Call this from the vector handler for `irq`. Every line of the vector that is
    /// both pending and unmasked has its pending bit cleared, after which the callback
    /// registered for that line is called with the pin's current input level. Lines
    /// are serviced in ascending order.
    pub fn handle_interrupt(&self, irq: Irq) {
        interrupt::dispatch(self, irq);
    }

    // Atomically marks the pin as taken. Returns false if it already was.
    fn take_pin(&self, id: PinId) -> bool {
        let mask = id.mask();

        self.pins_taken[id.port.index()].fetch_or(mask, Ordering::SeqCst) & mask == 0
    }

    pub(crate) fn release_pin(&self, id: PinId) {
        self.pins_taken[id.port.index()].fetch_and(!id.mask(), Ordering::SeqCst);
    }
}

impl<R: GpioRegisters> fmt::Debug for GpioState<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpioState")
            .field("regs", &self.regs)
            .field("config", &self.config())
            .field("pins_taken", &format_args!("{{ .. }}"))
            .field("interrupts", &format_args!("{{ .. }}"))
            .finish()
    }
}

/// Provides access to the STM32F1's GPIO peripheral.
///
/// `Gpio` is a cheap handle to a [`GpioState`], and can be freely copied.
///
/// [`GpioState`]: struct.GpioState.html
#[derive(Debug)]
pub struct Gpio<'a, R: GpioRegisters = GpioMem> {
    state: &'a GpioState<R>,
}

impl<R: GpioRegisters> Clone for Gpio<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: GpioRegisters> Copy for Gpio<'_, R> {}

impl<'a, R: GpioRegisters> Gpio<'a, R> {
    /// Constructs a new `Gpio` handle for `state`.
    pub const fn new(state: &'a GpioState<R>) -> Gpio<'a, R> {
        Gpio { state }
    }

    /// Returns a [`Pin`] for the specified port and pin number.
    ///
    /// Retrieving a GPIO pin grants access to the pin through an owned [`Pin`] instance.
    /// If the pin is already in use, `get` returns `Err(`[`Error::PinUsed`]`)`.
    /// After a [`Pin`] (or a derived [`InputPin`] or [`OutputPin`]) goes out
    /// of scope, it can be retrieved again through another `get` call.
    ///
    /// [`Pin`]: struct.Pin.html
    /// [`InputPin`]: struct.InputPin.html
    /// [`OutputPin`]: struct.OutputPin.html
    /// [`Error::PinUsed`]: enum.Error.html#variant.PinUsed
    pub fn get(&self, port: Port, pin: u8) -> Result<Pin<'a, R>> {
        let id = PinId::new(port, pin);

        if pin >= PINS_PER_PORT || port > self.state.config().last_port {
            return Err(Error::PinNotAvailable(id));
        }

        if !self.state.take_pin(id) {
            return Err(Error::PinUsed(id));
        }

        Ok(Pin::new(id, self.state))
    }

    /// Returns the configuration.
    pub fn config(&self) -> Config {
        self.state.config()
    }
}

/// Driver state used by the EXTI vector symbols provided with the `rt` feature.
///
/// Starts out with the default [`Config`]. Use [`Gpio::take_with`] or
/// [`GpioState::configure`] to change it.
///
/// [`Config`]: struct.Config.html
/// [`Gpio::take_with`]: struct.Gpio.html#method.take_with
/// [`GpioState::configure`]: struct.GpioState.html#method.configure
#[cfg(feature = "rt")]
pub static GPIO: GpioState<GpioMem> = GpioState::new(GpioMem::new(), Config::new());

#[cfg(feature = "rt")]
impl Gpio<'static, GpioMem> {
    /// Returns a `Gpio` handle for the crate-provided [`GPIO`] state.
    ///
    /// [`GPIO`]: static.GPIO.html
    pub fn take() -> Gpio<'static, GpioMem> {
        Gpio::new(&GPIO)
    }

    /// Applies `config` to the crate-provided [`GPIO`] state, and returns a `Gpio`
    /// handle for it.
    ///
    /// [`GPIO`]: static.GPIO.html
    pub fn take_with(config: Config) -> Gpio<'static, GpioMem> {
        GPIO.configure(config);
        Gpio::new(&GPIO)
    }
}

#[cfg(test)]
mod tests {
    use super::gpiomem::sim::SimRegisters;
    use super::*;

    fn state() -> GpioState<SimRegisters> {
        GpioState::new(SimRegisters::new(), Config::new())
    }

    #[test]
    fn get_rejects_out_of_range_pins() {
        let state = state();
        let gpio = Gpio::new(&state);

        assert_eq!(
            gpio.get(Port::A, 16).unwrap_err(),
            Error::PinNotAvailable(PinId::new(Port::A, 16))
        );
        // Default config stops at port E.
        assert_eq!(
            gpio.get(Port::F, 0).unwrap_err(),
            Error::PinNotAvailable(PinId::new(Port::F, 0))
        );
    }

    #[test]
    fn last_port_extends_available_ports() {
        let state = GpioState::new(SimRegisters::new(), Config::new().last_port(Port::G));
        let gpio = Gpio::new(&state);

        assert!(gpio.get(Port::G, 15).is_ok());
    }

    fn on_edge(_level: Level) {}

    #[test]
    fn static_state_can_be_reconfigured() {
        static STATE: GpioState<SimRegisters> = GpioState::new(SimRegisters::new(), Config::new());

        let gpio = Gpio::new(&STATE);
        assert!(gpio.get(Port::G, 1).is_err());

        STATE.configure(
            Config::new()
                .irq_priority(3)
                .output_speed(Speed::Mhz2)
                .last_port(Port::G),
        );
        assert_eq!(gpio.config().get_last_port(), Port::G);

        let output = gpio.get(Port::G, 1).unwrap().into_output();
        assert_eq!(STATE.regs.config_of(Port::G, 1), 0b0010);

        let mut input = gpio.get(Port::G, 2).unwrap().into_input();
        input.set_interrupt(Trigger::RisingEdge, on_edge).unwrap();
        assert_eq!(STATE.regs.irq_priority(Irq::Exti2), 3);

        drop(input);
        drop(output);
    }

    #[test]
    fn pin_can_only_be_taken_once() {
        let state = state();
        let gpio = Gpio::new(&state);

        let pin = gpio.get(Port::B, 7).unwrap();
        assert_eq!(
            gpio.get(Port::B, 7).unwrap_err(),
            Error::PinUsed(PinId::new(Port::B, 7))
        );

        // Same number on another port is a different pin.
        assert!(gpio.get(Port::C, 7).is_ok());

        drop(pin);
        assert!(gpio.get(Port::B, 7).is_ok());
    }

    #[test]
    fn derived_pins_release_on_drop() {
        let state = state();
        let gpio = Gpio::new(&state);

        let output = gpio.get(Port::A, 5).unwrap().into_output();
        assert!(gpio.get(Port::A, 5).is_err());

        drop(output);
        assert!(gpio.get(Port::A, 5).is_ok());
    }

    #[test]
    fn config_clamps_priority() {
        let config = Config::new().irq_priority(200);

        assert_eq!(config.get_irq_priority(), 15);
        assert_eq!(Config::default().get_irq_priority(), 1);
        assert_eq!(Config::default().get_output_speed(), Speed::Mhz50);
        assert_eq!(Config::default().get_last_port(), Port::E);
    }

    #[test]
    fn display_formats() {
        assert_eq!(format!("{}", PinId::new(Port::C, 13)), "PC13");
        assert_eq!(
            format!(
                "{}",
                Error::LineUsed {
                    line: 3,
                    owner: PinId::new(Port::B, 3)
                }
            ),
            "EXTI line 3 is already in use by pin PB3"
        );
        assert_eq!(
            format!("{}", Error::PinUsed(PinId::new(Port::A, 0))),
            "Pin PA0 is already in use"
        );
    }

    #[test]
    fn level_conversions() {
        assert_eq!(Level::from(true), Level::High);
        assert_eq!(Level::from(0u8), Level::Low);
        assert_eq!(Level::from(4u8), Level::High);
        assert_eq!(!Level::Low, Level::High);
    }
}
