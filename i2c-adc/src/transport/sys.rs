//! System call boundary used by the bus channel.

pub use crate::error::{error_message, SysError, SysResult};

/// Opaque handle to an open device node.
pub type RawHandle = std::os::fd::RawFd;

/// Open flags requesting read-write access.
pub const OPEN_READ_WRITE: i32 = libc::O_RDWR;

/// `ioctl` request selecting the 7-bit target for subsequent transfers.
///
/// From `linux/i2c-dev.h`.
pub const I2C_SLAVE: u64 = 0x0703;

/// Device-node primitives supplied by the host platform.
///
/// Each method maps one-to-one onto a system call. Implementations report
/// failures as [`SysError`] and never retry.
pub trait DeviceSys {
    /// Open a device node, returning its handle.
    fn open_device(&mut self, path: &str, flags: i32) -> SysResult<RawHandle>;

    /// Close a handle previously returned by [`open_device`](Self::open_device).
    fn close_device(&mut self, handle: RawHandle) -> SysResult<()>;

    /// Generic device-control request; returns the call's result code.
    fn control_request(&mut self, handle: RawHandle, request: u64, arg: u64) -> SysResult<i32>;

    /// Write a buffer, returning the number of bytes written.
    fn write_bytes(&mut self, handle: RawHandle, data: &[u8]) -> SysResult<usize>;

    /// Read into a buffer, returning the number of bytes read.
    fn read_bytes(&mut self, handle: RawHandle, buf: &mut [u8]) -> SysResult<usize>;
}
