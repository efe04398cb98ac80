//! Hardware abstraction layer traits.
//!
//! This module defines the hardware interface traits (I2C bus channel, ADC,
//! blocking delay) that let chip drivers work against any underlying bus
//! implementation, whether the Linux i2c-dev interface or a test double.

pub mod adc;
pub mod delay;
pub mod i2c;

// Re-export traits
pub use adc::{Adc, AdcChannel};
pub use delay::{Delay, StdDelay};
pub use i2c::{Direction, I2cBus};

use crate::error::SysError;

/// Common error type for hardware operations.
///
/// Every variant is terminal for the call that produced it. Bus errors are
/// passed through drivers unchanged, so callers can match on the variant to
/// learn what went wrong.
#[derive(Debug, thiserror::Error)]
pub enum HwError {
    /// The device node could not be opened
    #[error("Could not open I2C device at {path}: {source}")]
    DeviceOpen {
        path: String,
        #[source]
        source: SysError,
    },

    /// The device handle could not be released
    #[error("Could not close I2C device at {path}: {source}")]
    DeviceClose {
        path: String,
        #[source]
        source: SysError,
    },

    /// Operation attempted on a channel that is not open
    #[error("Cannot {operation} on I2C device {path}: device is not open")]
    NotOpen {
        path: String,
        operation: &'static str,
    },

    /// Selecting the target address failed
    #[error("Could not select target 0x{address:02x} on I2C device {path}: {source}")]
    TargetSelect {
        path: String,
        address: u8,
        #[source]
        source: SysError,
    },

    /// A raw write or read on the bus failed
    #[error("I2C {direction} on {path} failed: {detail}")]
    Transfer {
        path: String,
        direction: Direction,
        detail: String,
    },

    /// Channel index not supported by the converter
    #[error("Invalid channel specified: {0} (supported channels are 0-3)")]
    InvalidChannel(u8),

    /// The device answered with a different number of bytes than the
    /// register holds
    #[error("Device 0x{address:02x} returned {received} bytes, expected {expected}")]
    UnexpectedLength {
        address: u8,
        expected: usize,
        received: usize,
    },

    /// Target address does not fit in 7 bits
    #[error("Invalid 7-bit I2C address: 0x{0:02x}")]
    InvalidAddress(u8),
}

pub type Result<T> = std::result::Result<T, HwError>;
