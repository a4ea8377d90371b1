//! The digital I/O collaborator that the register chain drives.

/// Direction of a pin
#[cfg_attr(feature = "logging", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// The pin is driven by us
    Output,
    /// The pin is sampled by us
    Input,
}

/// Logic level on a pin
#[cfg_attr(feature = "logging", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Logic 0
    Low,
    /// Logic 1
    High,
}

impl Level {
    /// True if the level is [Level::High]
    pub fn is_high(self) -> bool {
        self == Level::High
    }

    /// True if the level is [Level::Low]
    pub fn is_low(self) -> bool {
        self == Level::Low
    }
}

impl From<bool> for Level {
    fn from(is_high: bool) -> Self {
        if is_high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Pin level access and busy-wait timing supplied by the host platform.
///
/// None of these operations can fail. Implementations that sit on top of
/// fallible drivers must decide what a failed read means (usually LOW).
pub trait DigitalIo {
    /// Identifies a pin on this platform
    type Pin: Copy;

    /// Sets the direction of `pin`
    fn set_pin_mode(&mut self, pin: Self::Pin, mode: PinMode);

    /// Drives `pin` to `level`
    fn write_pin(&mut self, pin: Self::Pin, level: Level);

    /// Samples the current level of `pin`
    fn read_pin(&mut self, pin: Self::Pin) -> Level;

    /// Busy-waits for at least `us` microseconds. This must not yield to a
    /// scheduler, the bus framing depends on the ordering relative to the
    /// pin writes.
    fn delay_us(&mut self, us: u32);
}
