//! Recording [`DeviceSys`] double for tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::sys::{DeviceSys, RawHandle, SysError, SysResult};
use crate::hw_trait::Delay;

/// One system call as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SysCall {
    Open { path: String, flags: i32 },
    Close(RawHandle),
    Control { request: u64, arg: u64 },
    Write(Vec<u8>),
    Read(usize),
    Sleep(Duration),
}

#[derive(Debug)]
struct State {
    calls: Vec<SysCall>,
    next_handle: RawHandle,
    open_result: Option<SysResult<RawHandle>>,
    close_error: Option<SysError>,
    control_result: SysResult<i32>,
    write_error: Option<SysError>,
    write_limit: Option<usize>,
    read_error: Option<SysError>,
    read_limit: Option<usize>,
    reads: VecDeque<Vec<u8>>,
}

/// Cloneable handle; all clones share one call log and script.
#[derive(Debug, Clone)]
pub struct MockSys {
    state: Arc<Mutex<State>>,
}

impl MockSys {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                calls: Vec::new(),
                next_handle: 3,
                open_result: None,
                close_error: None,
                control_result: Ok(0),
                write_error: None,
                write_limit: None,
                read_error: None,
                read_limit: None,
                reads: VecDeque::new(),
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<SysCall> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Data returned by the next read.
    pub fn queue_read(&self, data: &[u8]) {
        self.state().reads.push_back(data.to_vec());
    }

    /// Make the next open return `result` instead of a fresh handle.
    pub fn set_open_result(&self, result: SysResult<RawHandle>) {
        self.state().open_result = Some(result);
    }

    pub fn fail_close(&self, code: i32) {
        self.state().close_error = Some(SysError::from_code(code));
    }

    pub fn set_control_result(&self, result: SysResult<i32>) {
        self.state().control_result = result;
    }

    pub fn fail_write(&self, code: i32) {
        self.state().write_error = Some(SysError::from_code(code));
    }

    /// Cap the byte count reported by writes.
    pub fn limit_write(&self, len: usize) {
        self.state().write_limit = Some(len);
    }

    pub fn fail_read(&self, code: i32) {
        self.state().read_error = Some(SysError::from_code(code));
    }

    /// Cap the byte count reported by reads.
    pub fn limit_read(&self, len: usize) {
        self.state().read_limit = Some(len);
    }
}

impl DeviceSys for MockSys {
    fn open_device(&mut self, path: &str, flags: i32) -> SysResult<RawHandle> {
        let mut state = self.state();
        state.calls.push(SysCall::Open {
            path: path.to_string(),
            flags,
        });
        if let Some(result) = state.open_result.take() {
            return result;
        }
        let handle = state.next_handle;
        state.next_handle += 1;
        Ok(handle)
    }

    fn close_device(&mut self, handle: RawHandle) -> SysResult<()> {
        let mut state = self.state();
        state.calls.push(SysCall::Close(handle));
        match state.close_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn control_request(&mut self, _handle: RawHandle, request: u64, arg: u64) -> SysResult<i32> {
        let mut state = self.state();
        state.calls.push(SysCall::Control { request, arg });
        state.control_result.clone()
    }

    fn write_bytes(&mut self, _handle: RawHandle, data: &[u8]) -> SysResult<usize> {
        let mut state = self.state();
        state.calls.push(SysCall::Write(data.to_vec()));
        if let Some(err) = state.write_error.take() {
            return Err(err);
        }
        Ok(state.write_limit.map_or(data.len(), |limit| limit.min(data.len())))
    }

    fn read_bytes(&mut self, _handle: RawHandle, buf: &mut [u8]) -> SysResult<usize> {
        let mut state = self.state();
        state.calls.push(SysCall::Read(buf.len()));
        if let Some(err) = state.read_error.take() {
            return Err(err);
        }
        let data = state.reads.pop_front().unwrap_or_default();
        let n = data.len().min(buf.len());
        buf[..n].copy_from_slice(&data[..n]);
        Ok(state.read_limit.map_or(buf.len(), |limit| limit.min(buf.len())))
    }
}

/// Delay that logs into the owning [`MockSys`] instead of sleeping.
#[derive(Debug, Clone)]
pub struct MockDelay {
    state: Arc<Mutex<State>>,
}

impl MockSys {
    /// Delay sharing this mock's call log, so waits appear in sequence.
    pub fn delay(&self) -> MockDelay {
        MockDelay {
            state: Arc::clone(&self.state),
        }
    }
}

impl Delay for MockDelay {
    fn delay(&mut self, duration: Duration) {
        self.state.lock().unwrap().calls.push(SysCall::Sleep(duration));
    }
}
