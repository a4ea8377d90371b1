//! Compile time selection of the bitfield type for a chain of registers.
//!
//! The number of chips in a chain is always known statically, so the
//! storage is picked through a trait on the [Chips] marker rather than at
//! runtime. Chains longer than [MAX_CHIPS] do not implement [ChainLength]
//! and fail to compile.

use num_traits::{PrimInt, Unsigned};

/// The longest supported chain, in 8 bit registers
pub const MAX_CHIPS: u8 = 8;

/// An unsigned integer that holds one bit per register input
pub trait Bitfield: PrimInt + Unsigned + Default {
    /// Returns `1` if `bit` is set, otherwise `0`, without branching
    fn from_bit(bit: bool) -> Self;
}

macro_rules! impl_bitfield {
    ($($T:ty),*) => {
        $(
            impl Bitfield for $T {
                #[inline(always)]
                fn from_bit(bit: bool) -> Self {
                    bit as $T
                }
            }
        )*
    };
}

impl_bitfield!(u8, u16, u32, u64);

/// Type level marker for a chain of `N` registers
pub struct Chips<const N: u8>;

/// Describes the storage used by a chain of registers
pub trait ChainLength {
    /// The smallest unsigned integer holding every input in the chain
    type Bits: Bitfield;

    /// The number of inputs in the chain
    const DATA_WIDTH: u16;
}

macro_rules! impl_chain_length {
    ($($count:literal => $T:ty),*) => {
        $(
            impl ChainLength for Chips<$count> {
                type Bits = $T;
                const DATA_WIDTH: u16 = $count * 8;
            }
        )*
    };
}

impl_chain_length!(
    1 => u8,
    2 => u16,
    3 => u32,
    4 => u32,
    5 => u64,
    6 => u64,
    7 => u64,
    8 => u64
);
