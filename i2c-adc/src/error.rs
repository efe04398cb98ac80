//! Error reported by the host platform's system calls.

/// A failed system call: errno plus its human-readable description.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} (errno {code})")]
pub struct SysError {
    pub code: i32,
    pub message: String,
}

impl SysError {
    /// Build from an errno value.
    pub fn from_code(code: i32) -> Self {
        Self {
            code,
            message: error_message(code),
        }
    }
}

pub type SysResult<T> = std::result::Result<T, SysError>;

/// Human-readable description of an errno value.
pub fn error_message(code: i32) -> String {
    std::io::Error::from_raw_os_error(code).to_string()
}
