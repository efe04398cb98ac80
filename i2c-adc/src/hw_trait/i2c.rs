//! I2C bus channel abstraction trait.

use std::fmt;

use super::Result;

/// Highest address representable with 7-bit addressing.
pub const MAX_ADDRESS: u8 = 0x7f;

/// Direction of a raw bus transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Write,
    Read,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Write => f.write_str("write"),
            Direction::Read => f.write_str("read"),
        }
    }
}

/// A single connection to one I2C bus node.
///
/// The channel is created closed. Transfers and target selection require
/// the channel to be open and fail with [`HwError::NotOpen`] otherwise,
/// without touching the bus. Implementations are not internally locked;
/// callers must serialize access to one channel.
///
/// [`HwError::NotOpen`]: super::HwError::NotOpen
pub trait I2cBus {
    /// Open the bus node. No-op if already open.
    fn open(&mut self) -> Result<()>;

    /// Release the bus node. No-op if not open.
    fn close(&mut self) -> Result<()>;

    /// Whether the channel currently holds a valid handle.
    fn is_open(&self) -> bool;

    /// Select the 7-bit target address for subsequent transfers.
    fn set_target(&mut self, address: u8) -> Result<()>;

    /// Write the exact byte sequence to the current target.
    fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Read `len` bytes from the current target.
    fn read(&mut self, len: usize) -> Result<Vec<u8>>;
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    fn open(&mut self) -> Result<()> {
        (**self).open()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn set_target(&mut self, address: u8) -> Result<()> {
        (**self).set_target(address)
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        (**self).write(data)
    }

    fn read(&mut self, len: usize) -> Result<Vec<u8>> {
        (**self).read(len)
    }
}
