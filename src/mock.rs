//! Mocked pins and a simulated register chain for testing the RegisterChain library

use core::cell::Cell;

use embedded_hal::blocking::delay::DelayUs;
use embedded_hal::digital::v2::{InputPin, OutputPin, StatefulOutputPin};

use crate::io::{DigitalIo, Level, PinMode};

/// Pin numbers used with [SimulatedChain]
pub const LOAD: u8 = 8;
pub const CLOCK_ENABLE: u8 = 9;
pub const DATA: u8 = 11;
pub const CLOCK: u8 = 12;

pub struct MockPin {
    state: Cell<bool>,
    pub writes: Cell<u32>,
}

impl MockPin {
    pub fn new() -> Self {
        MockPin {
            state: Cell::new(true),
            writes: Cell::new(0),
        }
    }

    pub fn low() -> Self {
        let pin = Self::new();
        pin.state.set(false);
        pin
    }
}

type MockError = &'static str;

impl InputPin for MockPin {
    type Error = MockError;

    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(self.state.get())
    }

    fn is_low(&self) -> Result<bool, Self::Error> {
        Ok(!self.state.get())
    }
}

impl OutputPin for MockPin {
    type Error = MockError;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.state.set(false);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.state.set(true);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

impl StatefulOutputPin for MockPin {
    fn is_set_high(&self) -> Result<bool, Self::Error> {
        Ok(self.state.get())
    }

    fn is_set_low(&self) -> Result<bool, Self::Error> {
        Ok(!self.state.get())
    }
}

/// An input pin whose driver always fails
pub struct BrokenPin;

impl InputPin for BrokenPin {
    type Error = MockError;

    fn is_high(&self) -> Result<bool, Self::Error> {
        Err("broken")
    }

    fn is_low(&self) -> Result<bool, Self::Error> {
        Err("broken")
    }
}

/// Adds up the requested delays instead of waiting
#[derive(Default)]
pub struct MockDelay {
    pub total_us: u32,
    pub calls: u32,
}

impl DelayUs<u32> for MockDelay {
    fn delay_us(&mut self, us: u32) {
        self.total_us += us;
        self.calls += 1;
    }
}

/// Behaves like a chain of 74HC165 registers wired to [LOAD],
/// [CLOCK_ENABLE], [DATA] and [CLOCK].
///
/// The parallel inputs are copied into the shift stage while the load line
/// is low. A rising clock edge shifts towards the data line, but only while
/// load is high and clock enable is low.
pub struct SimulatedChain {
    width: u16,
    inputs: u64,
    shift: u64,
    levels: [Level; 4],
    modes: [Option<PinMode>; 4],

    pub latches: u32,
    pub clock_pulses: u32,
    pub data_reads: u32,
    pub delay_calls: u32,
    pub delay_total_us: u32,
}

impl SimulatedChain {
    pub fn new(chips: u8) -> Self {
        Self {
            width: u16::from(chips) * 8,
            inputs: 0,
            shift: 0,
            levels: [Level::High, Level::Low, Level::Low, Level::Low],
            modes: [None; 4],
            latches: 0,
            clock_pulses: 0,
            data_reads: 0,
            delay_calls: 0,
            delay_total_us: 0,
        }
    }

    /// Sets the parallel inputs, bit 0 is the last bit shifted out
    pub fn set_inputs(&mut self, inputs: u64) {
        self.inputs = inputs & self.mask();
    }

    /// Sets the parallel inputs so that `bits` come out of the data line in order
    pub fn set_serial(&mut self, bits: &[bool]) {
        assert_eq!(bits.len(), usize::from(self.width));
        self.inputs = bits
            .iter()
            .fold(0, |acc, &bit| (acc << 1) | u64::from(bit));
    }

    pub fn mode_of(&self, pin: u8) -> Option<PinMode> {
        self.modes[Self::slot(pin)]
    }

    pub fn level_of(&self, pin: u8) -> Level {
        self.levels[Self::slot(pin)]
    }

    fn mask(&self) -> u64 {
        if self.width >= 64 {
            u64::MAX
        } else {
            (1 << self.width) - 1
        }
    }

    fn slot(pin: u8) -> usize {
        match pin {
            LOAD => 0,
            CLOCK_ENABLE => 1,
            DATA => 2,
            CLOCK => 3,
            _ => panic!("pin {} is not wired to the chain", pin),
        }
    }
}

impl DigitalIo for SimulatedChain {
    type Pin = u8;

    fn set_pin_mode(&mut self, pin: u8, mode: PinMode) {
        self.modes[Self::slot(pin)] = Some(mode);
    }

    fn write_pin(&mut self, pin: u8, level: Level) {
        let slot = Self::slot(pin);
        assert_eq!(self.modes[slot], Some(PinMode::Output), "pin {} is not an output", pin);

        match pin {
            LOAD if level.is_low() => {
                self.shift = self.inputs;
                self.latches += 1;
            }
            CLOCK => {
                let rising = self.levels[3].is_low() && level.is_high();
                if rising && self.levels[0].is_high() && self.levels[1].is_low() {
                    self.shift = (self.shift << 1) & self.mask();
                    self.clock_pulses += 1;
                }
            }
            _ => {}
        }

        self.levels[slot] = level;
    }

    fn read_pin(&mut self, pin: u8) -> Level {
        assert_eq!(pin, DATA, "only the data line can be read");
        assert_eq!(self.modes[2], Some(PinMode::Input), "data pin is not an input");
        self.data_reads += 1;
        Level::from((self.shift >> (self.width - 1)) & 1 == 1)
    }

    fn delay_us(&mut self, us: u32) {
        self.delay_calls += 1;
        self.delay_total_us += us;
    }
}
