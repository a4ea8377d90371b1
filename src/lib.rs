#![deny(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(not(test), no_std)]

//! SHIFT IN HAL
//!
//! Reads the parallel inputs of one or more daisy-chained 8 bit
//! parallel-in/serial-out shift registers (such as the 74HC165) over a
//! 4 wire bus. Each call to [RegisterChain::read] latches the inputs and
//! shifts every bit out, and the chain keeps the previous sample around so
//! callers can ask which inputs were pressed or released since the last
//! cycle. Up to 8 registers (64 inputs) can be chained.
//!
//! Pins are driven through the [DigitalIo] trait. Boards using
//! [`embedded-hal`] pins can wrap them in a [HalBus].
//!
//! ```
//! # use shift_in_hal::{DigitalIo, Level, PinMode, RegisterChain};
//! # struct Board;
//! # impl DigitalIo for Board {
//! #     type Pin = u8;
//! #     fn set_pin_mode(&mut self, _: u8, _: PinMode) {}
//! #     fn write_pin(&mut self, _: u8, _: Level) {}
//! #     fn read_pin(&mut self, _: u8) -> Level { Level::Low }
//! #     fn delay_us(&mut self, _: u32) {}
//! # }
//! let mut buttons: RegisterChain<Board, 2> = RegisterChain::new(Board);
//! buttons.begin(8, 9, 11, 12);
//!
//! if buttons.update() && buttons.pressed(3) {
//!     // button 3 went down this cycle
//! }
//! ```
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal/0.2

mod chain;
mod hal;
mod io;
mod width;

#[cfg(test)]
mod mock;

pub use chain::{BusPins, Edge, RegisterChain, DEFAULT_PULSE_WIDTH_US};
pub use hal::{BusLine, HalBus};
pub use io::{DigitalIo, Level, PinMode};
pub use width::{Bitfield, ChainLength, Chips, MAX_CHIPS};
