//! [DigitalIo] built on [`embedded-hal`] pins and delays.
//!
//! Pin direction is fixed by the HAL type state, so the pins must already
//! be configured when they are handed over: outputs for load, clock enable
//! and clock, an input for the serial data.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/0.2

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::digital::v2::{InputPin, OutputPin, StatefulOutputPin};

use crate::chain::RegisterChain;
use crate::io::{DigitalIo, Level, PinMode};
use crate::width::{ChainLength, Chips};

/// The logical pins of a [HalBus]
#[cfg_attr(feature = "logging", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusLine {
    /// Latches the parallel inputs when low
    Load,
    /// Inhibits the clock when high
    ClockEnable,
    /// Serial output of the chain
    Data,
    /// Shift clock
    Clock,
}

impl BusLine {
    /// The direction the line must be configured with
    pub fn direction(self) -> PinMode {
        match self {
            BusLine::Data => PinMode::Input,
            _ => PinMode::Output,
        }
    }
}

/// Owns the pins and delay of a register bus
pub struct HalBus<TInputPin, TOutputPin, TDelay> {
    /// Driven for [BusLine::Clock]
    clock_pin: TOutputPin,

    /// Driven for [BusLine::Load]
    latch_pin: TOutputPin,

    /// Driven for [BusLine::ClockEnable]. Boards that tie CE to ground
    /// leave this out and the line reads back as low.
    clock_enable_pin: Option<TOutputPin>,

    /// Sampled for [BusLine::Data]
    serial_read_pin: TInputPin,

    /// Busy-waits between pin transitions
    delay: TDelay,
}

impl<TInputPin, TOutputPin, TDelay> HalBus<TInputPin, TOutputPin, TDelay>
where
    TInputPin: InputPin,
    TOutputPin: OutputPin + StatefulOutputPin,
    TDelay: DelayUs<u32>,
{
    /// Creates a bus from the given pins. No clock enable pin is provided
    pub fn new(clock_pin: TOutputPin, latch_pin: TOutputPin, serial_read_pin: TInputPin, delay: TDelay) -> Self {
        Self::new_with_enable(clock_pin, latch_pin, serial_read_pin, None, delay)
    }

    /// Creates a bus from the given pins
    pub fn new_with_enable(
        clock_pin: TOutputPin,
        latch_pin: TOutputPin,
        serial_read_pin: TInputPin,
        clock_enable_pin: Option<TOutputPin>,
        delay: TDelay,
    ) -> Self {
        Self {
            clock_pin,
            latch_pin,
            clock_enable_pin,
            serial_read_pin,
            delay,
        }
    }

    /// Gives back the pins and the delay as
    /// `(clock, latch, serial_read, clock_enable, delay)`
    pub fn release(self) -> (TOutputPin, TOutputPin, TInputPin, Option<TOutputPin>, TDelay) {
        (
            self.clock_pin,
            self.latch_pin,
            self.serial_read_pin,
            self.clock_enable_pin,
            self.delay,
        )
    }

    fn output(&mut self, line: BusLine) -> Option<&mut TOutputPin> {
        match line {
            BusLine::Load => Some(&mut self.latch_pin),
            BusLine::ClockEnable => self.clock_enable_pin.as_mut(),
            BusLine::Clock => Some(&mut self.clock_pin),
            BusLine::Data => None,
        }
    }
}

impl<TInputPin, TOutputPin, TDelay> DigitalIo for HalBus<TInputPin, TOutputPin, TDelay>
where
    TInputPin: InputPin,
    TOutputPin: OutputPin + StatefulOutputPin,
    TDelay: DelayUs<u32>,
{
    type Pin = BusLine;

    #[cfg_attr(not(feature = "logging"), allow(unused_variables))]
    fn set_pin_mode(&mut self, pin: BusLine, mode: PinMode) {
        #[cfg(feature = "logging")]
        if pin.direction() != mode {
            defmt::warn!("HalBus cannot make {} an {}, direction is fixed", pin, mode);
        }
    }

    fn write_pin(&mut self, pin: BusLine, level: Level) {
        match self.output(pin) {
            Some(output) => {
                match level {
                    Level::High => output.set_high().ok(),
                    Level::Low => output.set_low().ok(),
                };
            }
            #[cfg(feature = "logging")]
            None if pin == BusLine::Data => defmt::warn!("HalBus cannot drive the data line"),
            None => {}
        }
    }

    fn read_pin(&mut self, pin: BusLine) -> Level {
        let is_high = match pin {
            // a failed read is treated as LOW
            BusLine::Data => self.serial_read_pin.is_high().ok(),
            _ => self.output(pin).and_then(|output| output.is_set_high().ok()),
        };

        Level::from(is_high.unwrap_or(false))
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}

impl<TInputPin, TOutputPin, TDelay, const N: u8> RegisterChain<HalBus<TInputPin, TOutputPin, TDelay>, N>
where
    TInputPin: InputPin,
    TOutputPin: OutputPin + StatefulOutputPin,
    TDelay: DelayUs<u32>,
    Chips<N>: ChainLength,
{
    /// Creates a chain on an embedded-hal bus and configures it, ready for
    /// sampling
    pub fn from_hal(bus: HalBus<TInputPin, TOutputPin, TDelay>) -> Self {
        let mut chain = Self::new(bus);
        chain.begin(BusLine::Load, BusLine::ClockEnable, BusLine::Data, BusLine::Clock);
        chain
    }
}
