//! The register chain sampler and its edge detection.

use num_traits::{One, Zero};

use crate::io::{DigitalIo, Level, PinMode};
use crate::width::{Bitfield, ChainLength, Chips};

type Bits<const N: u8> = <Chips<N> as ChainLength>::Bits;

/// Settle time used for the load and clock pulses unless overridden.
/// Suits a 74HC165 at 5V with plenty of margin; slower or longer wiring
/// may need more.
pub const DEFAULT_PULSE_WIDTH_US: u32 = 5;

/// The four pins that make up the register bus
#[cfg_attr(feature = "logging", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusPins<P> {
    /// Pulsed low to latch the parallel inputs (PL on a 74HC165)
    pub load: P,
    /// Held high while latching, low while shifting (CE on a 74HC165)
    pub clock_enable: P,
    /// The serial output of the last register in the chain (Q7)
    pub data: P,
    /// Shifts the next bit onto the data line on a rising edge (CP)
    pub clock: P,
}

/// The direction a single input moved between two samples
#[cfg_attr(feature = "logging", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// The input went from low to high (pressed)
    Rising,
    /// The input went from high to low (released)
    Falling,
}

/// A chain of `N` daisy-chained 8 bit parallel-in/serial-out registers.
///
/// The chain keeps two generations of samples. Every [RegisterChain::read]
/// moves the current sample into the last sample before shifting in a new
/// one, so the point queries ([RegisterChain::pressed],
/// [RegisterChain::released] and friends) always describe the transition
/// over the most recent cycle.
///
/// Bit 0 is the least significant bit of the sample. Bits arrive most
/// significant first, so the register closest to the data pin holds the
/// highest byte.
pub struct RegisterChain<Io, const N: u8>
where
    Io: DigitalIo,
    Chips<N>: ChainLength,
{
    /// Drives the bus
    io: Io,

    /// The bus pins, set by [RegisterChain::begin]
    pins: Option<BusPins<Io::Pin>>,

    /// How long the load and clock lines are held, in microseconds
    pulse_width: u32,

    /// The sample before the most recent one
    last_state: Bits<N>,

    /// The most recent sample
    current_state: Bits<N>,
}

impl<Io, const N: u8> RegisterChain<Io, N>
where
    Io: DigitalIo,
    Chips<N>: ChainLength,
{
    /// The number of inputs in the chain
    pub const DATA_WIDTH: u16 = <Chips<N> as ChainLength>::DATA_WIDTH;

    /// Creates a new chain with zeroed state. [RegisterChain::begin] must be
    /// called before sampling.
    pub fn new(io: Io) -> Self {
        Self::with_pulse_width(io, DEFAULT_PULSE_WIDTH_US)
    }

    /// Creates a new chain with the given pulse width in microseconds
    pub fn with_pulse_width(io: Io, pulse_width: u32) -> Self {
        Self {
            io,
            pins: None,
            pulse_width,
            last_state: Zero::zero(),
            current_state: Zero::zero(),
        }
    }

    /// Configures the bus pins. The load, clock enable and clock pins become
    /// outputs and the data pin becomes an input.
    pub fn begin(&mut self, load: Io::Pin, clock_enable: Io::Pin, data: Io::Pin, clock: Io::Pin) {
        self.io.set_pin_mode(load, PinMode::Output);
        self.io.set_pin_mode(clock_enable, PinMode::Output);
        self.io.set_pin_mode(data, PinMode::Input);
        self.io.set_pin_mode(clock, PinMode::Output);

        self.pins = Some(BusPins {
            load,
            clock_enable,
            data,
            clock,
        });

        #[cfg(feature = "logging")]
        defmt::debug!(
            "RegisterChain configured: {} chips, {} bits, pulse {}us",
            N,
            Self::DATA_WIDTH,
            self.pulse_width
        );
    }

    /// The pins passed to [RegisterChain::begin], if it has been called
    pub fn pins(&self) -> Option<&BusPins<Io::Pin>> {
        self.pins.as_ref()
    }

    /// Gets the pulse width in microseconds
    pub fn get_pulse_width(&self) -> u32 {
        self.pulse_width
    }

    /// Sets the pulse width in microseconds. This is not checked against the
    /// device, a value that is too small for the wiring garbles the reads.
    pub fn set_pulse_width(&mut self, value: u32) {
        self.pulse_width = value;
    }

    /// The number of inputs in the chain
    pub fn get_data_width(&self) -> u16 {
        Self::DATA_WIDTH
    }

    /// Latches the parallel inputs and shifts every bit in, returning the new
    /// sample. The previous sample becomes [RegisterChain::get_last].
    ///
    /// Blocks for roughly `(DATA_WIDTH + 1) * pulse_width` microseconds plus
    /// the pin access time.
    pub fn read(&mut self) -> Bits<N> {
        debug_assert!(self.pins.is_some(), "RegisterChain::read called before begin");
        let pins = match self.pins {
            Some(pins) => pins,
            None => {
                #[cfg(feature = "logging")]
                defmt::warn!("RegisterChain sampled before begin, keeping previous sample");
                return self.current_state;
            }
        };

        self.last_state = self.current_state;
        let mut result: Bits<N> = Zero::zero();

        // latch the parallel inputs, then allow shifting
        self.io.write_pin(pins.clock_enable, Level::High);
        self.io.write_pin(pins.load, Level::Low);
        self.io.delay_us(self.pulse_width);
        self.io.write_pin(pins.load, Level::High);
        self.io.write_pin(pins.clock_enable, Level::Low);

        let width = Self::DATA_WIDTH;
        for i in 0..width {
            let is_high = self.io.read_pin(pins.data).is_high();
            result = result | (<Bits<N> as Bitfield>::from_bit(is_high) << usize::from(width - 1 - i));

            // the LOW->HIGH transition puts the next bit on the data line
            self.io.write_pin(pins.clock, Level::High);
            self.io.delay_us(self.pulse_width);
            self.io.write_pin(pins.clock, Level::Low);
        }

        self.current_state = result;
        result
    }

    /// Reads a new sample, returning true if any input changed since the
    /// previous one
    pub fn update(&mut self) -> bool {
        let is_changed = self.read() != self.last_state;

        #[cfg(feature = "logging")]
        {
            if is_changed {
                use num_traits::ToPrimitive;

                defmt::trace!(
                    "RegisterChain changed: {=u64:b} -> {=u64:b}",
                    self.last_state.to_u64().unwrap_or(0),
                    self.current_state.to_u64().unwrap_or(0)
                );
            }
        }

        is_changed
    }

    /// True if any input differs between the last two samples
    pub fn has_changed(&self) -> bool {
        self.last_state != self.current_state
    }

    /// True if input `id` differs between the last two samples
    pub fn has_bit_changed(&self, id: u8) -> bool {
        self.state(id) != self.last(id)
    }

    /// The inputs that differ between the last two samples
    pub fn changed_bits(&self) -> Bits<N> {
        self.last_state ^ self.current_state
    }

    /// Whether input `id` is high in the most recent sample
    pub fn state(&self, id: u8) -> bool {
        Self::bit(self.current_state, id)
    }

    /// Whether input `id` was high in the previous sample
    pub fn last(&self, id: u8) -> bool {
        Self::bit(self.last_state, id)
    }

    /// Whether input `id` is high now but was low in the previous sample
    pub fn pressed(&self, id: u8) -> bool {
        !self.last(id) && self.state(id)
    }

    /// Whether input `id` is low now but was high in the previous sample
    pub fn released(&self, id: u8) -> bool {
        self.last(id) && !self.state(id)
    }

    /// The transition of input `id` over the last cycle, if any
    pub fn edge(&self, id: u8) -> Option<Edge> {
        match (self.last(id), self.state(id)) {
            (false, true) => Some(Edge::Rising),
            (true, false) => Some(Edge::Falling),
            _ => None,
        }
    }

    /// The previous sample
    pub fn get_last(&self) -> Bits<N> {
        self.last_state
    }

    /// The most recent sample
    pub fn get_current(&self) -> Bits<N> {
        self.current_state
    }

    /// Borrows the I/O collaborator
    pub fn io(&self) -> &Io {
        &self.io
    }

    /// Mutably borrows the I/O collaborator. Driving the bus pins from
    /// here between samples corrupts the next read.
    pub fn io_mut(&mut self) -> &mut Io {
        &mut self.io
    }

    /// Consumes the chain, returning the I/O collaborator
    pub fn release(self) -> Io {
        self.io
    }

    fn bit(value: Bits<N>, id: u8) -> bool {
        debug_assert!(u16::from(id) < Self::DATA_WIDTH, "bit index out of range");
        let one: Bits<N> = One::one();
        ((value >> usize::from(id)) & one) == one
    }
}
