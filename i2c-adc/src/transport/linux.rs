//! Linux system call binding for i2c-dev nodes.
//!
//! Wraps `open(2)`, `close(2)`, `ioctl(2)`, `write(2)` and `read(2)` through
//! `nix`. Each call is issued once and its errno reported as a [`SysError`].

use std::os::fd::BorrowedFd;

use nix::errno::Errno;
use nix::fcntl::{self, OFlag};
use nix::sys::stat::Mode;
use nix::unistd;

use super::sys::{DeviceSys, RawHandle, SysError, SysResult, I2C_SLAVE};

// Integer argument passed by value, as `linux/i2c-dev.h` specifies.
nix::ioctl_write_int_bad!(i2c_set_slave, I2C_SLAVE);

impl From<Errno> for SysError {
    fn from(errno: Errno) -> Self {
        SysError::from_code(errno as i32)
    }
}

/// [`DeviceSys`] backed by the Linux kernel.
///
/// Control requests are limited to the ones this crate issues; any other
/// request code fails with `ENOTTY` without reaching the kernel.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinuxSys;

impl LinuxSys {
    pub fn new() -> Self {
        Self
    }
}

impl DeviceSys for LinuxSys {
    fn open_device(&mut self, path: &str, flags: i32) -> SysResult<RawHandle> {
        let fd = fcntl::open(path, OFlag::from_bits_truncate(flags), Mode::empty())?;
        Ok(fd)
    }

    fn close_device(&mut self, handle: RawHandle) -> SysResult<()> {
        unistd::close(handle)?;
        Ok(())
    }

    fn control_request(&mut self, handle: RawHandle, request: u64, arg: u64) -> SysResult<i32> {
        match request {
            I2C_SLAVE => {
                // SAFETY: I2C_SLAVE takes its argument by value, no memory is shared.
                let ret = unsafe { i2c_set_slave(handle, arg as _) }?;
                Ok(ret)
            }
            _ => Err(Errno::ENOTTY.into()),
        }
    }

    fn write_bytes(&mut self, handle: RawHandle, data: &[u8]) -> SysResult<usize> {
        // SAFETY: the caller owns `handle` and keeps it open for this call.
        let fd = unsafe { BorrowedFd::borrow_raw(handle) };
        Ok(unistd::write(fd, data)?)
    }

    fn read_bytes(&mut self, handle: RawHandle, buf: &mut [u8]) -> SysResult<usize> {
        Ok(unistd::read(handle, buf)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::sys::OPEN_READ_WRITE;

    #[test]
    fn test_open_missing_node_reports_errno() {
        let err = LinuxSys::new()
            .open_device("/dev/i2c-does-not-exist-42", OPEN_READ_WRITE)
            .unwrap_err();
        assert_eq!(err.code, libc::ENOENT);
    }

    #[test]
    fn test_open_rejects_interior_nul() {
        let err = LinuxSys::new()
            .open_device("/dev/i2c\0-1", OPEN_READ_WRITE)
            .unwrap_err();
        assert_eq!(err.code, libc::EINVAL);
    }

    #[test]
    fn test_write_and_read_on_dev_null() {
        let mut sys = LinuxSys::new();
        let fd = sys.open_device("/dev/null", OPEN_READ_WRITE).unwrap();

        assert_eq!(sys.write_bytes(fd, &[0x01, 0x02]).unwrap(), 2);

        let mut buf = [0u8; 2];
        assert_eq!(sys.read_bytes(fd, &mut buf).unwrap(), 0);

        sys.close_device(fd).unwrap();
    }

    #[test]
    fn test_i2c_slave_on_non_i2c_node_fails() {
        let mut sys = LinuxSys::new();
        let fd = sys.open_device("/dev/null", OPEN_READ_WRITE).unwrap();

        let err = sys.control_request(fd, I2C_SLAVE, 0x48).unwrap_err();
        assert_eq!(err.code, libc::ENOTTY);

        sys.close_device(fd).unwrap();
    }

    #[test]
    fn test_unknown_control_request_is_rejected() {
        let mut sys = LinuxSys::new();
        let fd = sys.open_device("/dev/null", OPEN_READ_WRITE).unwrap();

        let err = sys.control_request(fd, 0x0704, 1).unwrap_err();
        assert_eq!(err.code, libc::ENOTTY);

        sys.close_device(fd).unwrap();
    }

    #[test]
    fn test_errno_conversion_keeps_code() {
        let err = SysError::from(Errno::EREMOTEIO);
        assert_eq!(err.code, libc::EREMOTEIO);
    }
}
