//! Bus channel over a Linux i2c-dev node.
//!
//! See <https://docs.kernel.org/i2c/dev-interface.html> for the kernel side.

use crate::hw_trait::i2c::{Direction, I2cBus, MAX_ADDRESS};
use crate::hw_trait::{HwError, Result};
use crate::tracing::prelude::*;

use super::linux::LinuxSys;
use super::sys::{DeviceSys, RawHandle, SysError, I2C_SLAVE, OPEN_READ_WRITE};

/// One connection to an I2C bus node such as `/dev/i2c-1`.
///
/// Created closed. The handle is owned exclusively and released on
/// [`close`](I2cBus::close) or when the channel is dropped.
#[derive(Debug)]
pub struct I2cDev<S: DeviceSys = LinuxSys> {
    path: String,
    sys: S,
    handle: Option<RawHandle>,
    target: Option<u8>,
}

impl I2cDev<LinuxSys> {
    /// Create an unopened channel for the given device node.
    pub fn new(path: impl Into<String>) -> Self {
        Self::with_sys(path, LinuxSys::new())
    }
}

impl<S: DeviceSys> I2cDev<S> {
    /// Create an unopened channel issuing its system calls through `sys`.
    pub fn with_sys(path: impl Into<String>, sys: S) -> Self {
        Self {
            path: path.into(),
            sys,
            handle: None,
            target: None,
        }
    }

    /// Device node this channel talks to.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Target selected by the last successful [`set_target`](I2cBus::set_target).
    pub fn target(&self) -> Option<u8> {
        self.target
    }

    fn open_handle(&self, operation: &'static str) -> Result<RawHandle> {
        self.handle.ok_or_else(|| HwError::NotOpen {
            path: self.path.clone(),
            operation,
        })
    }

    fn transfer_error(&self, direction: Direction, err: SysError) -> HwError {
        HwError::Transfer {
            path: self.path.clone(),
            direction,
            detail: err.to_string(),
        }
    }
}

impl<S: DeviceSys> I2cBus for I2cDev<S> {
    fn open(&mut self) -> Result<()> {
        if self.is_open() {
            return Ok(());
        }

        info!(path = %self.path, "Opening I2C device");

        let handle = self
            .sys
            .open_device(&self.path, OPEN_READ_WRITE)
            .and_then(|fd| {
                if fd < 0 {
                    Err(SysError::from_code(libc::EBADF))
                } else {
                    Ok(fd)
                }
            })
            .map_err(|source| HwError::DeviceOpen {
                path: self.path.clone(),
                source,
            })?;

        info!(path = %self.path, fd = handle, "I2C device opened");
        self.handle = Some(handle);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let Some(handle) = self.handle else {
            return Ok(());
        };

        info!(path = %self.path, fd = handle, "Closing I2C device");

        self.sys
            .close_device(handle)
            .map_err(|source| HwError::DeviceClose {
                path: self.path.clone(),
                source,
            })?;

        self.handle = None;
        self.target = None;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    fn set_target(&mut self, address: u8) -> Result<()> {
        let handle = self.open_handle("select target")?;
        if address > MAX_ADDRESS {
            return Err(HwError::InvalidAddress(address));
        }

        debug!(path = %self.path, address = %format!("{:#04x}", address), "Selecting I2C target");

        let source = match self.sys.control_request(handle, I2C_SLAVE, u64::from(address)) {
            Ok(0) => {
                self.target = Some(address);
                return Ok(());
            }
            Ok(code) => SysError {
                code,
                message: format!("unexpected result code {code}"),
            },
            Err(err) => err,
        };

        Err(HwError::TargetSelect {
            path: self.path.clone(),
            address,
            source,
        })
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        let handle = self.open_handle("write")?;

        trace!(path = %self.path, data = %format!("{:02x?}", data), "I2C write");

        let written = self
            .sys
            .write_bytes(handle, data)
            .map_err(|err| self.transfer_error(Direction::Write, err))?;

        if written != data.len() {
            return Err(HwError::Transfer {
                path: self.path.clone(),
                direction: Direction::Write,
                detail: format!("short write, {} of {} bytes", written, data.len()),
            });
        }
        Ok(())
    }

    fn read(&mut self, len: usize) -> Result<Vec<u8>> {
        let handle = self.open_handle("read")?;

        let mut buf = vec![0u8; len];
        let got = self
            .sys
            .read_bytes(handle, &mut buf)
            .map_err(|err| self.transfer_error(Direction::Read, err))?;

        if got != len {
            warn!(path = %self.path, requested = len, received = got, "Short I2C read");
        }
        trace!(path = %self.path, data = %format!("{:02x?}", buf), "I2C read");

        Ok(buf)
    }
}

impl<S: DeviceSys> Drop for I2cDev<S> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to close I2C device on drop: {}", e);
        }
    }
}
