//! Physical transport layer for I2C bus access.
//!
//! The bus channel ([`I2cDev`]) encodes the i2c-dev usage protocol: open the
//! node read-write, select a target with the `I2C_SLAVE` control request,
//! then issue plain reads and writes. The raw system calls it issues are
//! behind the [`DeviceSys`] trait so the channel can run against the Linux
//! kernel ([`LinuxSys`]) or a recording double in tests.

pub mod i2c_dev;
pub mod linux;
pub mod sys;

#[cfg(test)]
pub(crate) mod mock;

// Re-export transport implementations
pub use i2c_dev::I2cDev;
pub use linux::LinuxSys;
pub use sys::{DeviceSys, RawHandle, SysError};
