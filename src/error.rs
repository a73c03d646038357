/*
 * Error type shared by the chrome engine and its Win32 backend.
 *
 * Almost every failure inside the engine is handled where it is detected
 * (fallbacks, no-ops); only `install` reports an error back to the host UI
 * layer, so the taxonomy here stays small.
 */
use std::fmt;

#[derive(Debug)]
pub enum PlatformError {
    InitializationFailed(String),
    InvalidHandle(String),
    OperationFailed(String),
    #[cfg(target_os = "windows")]
    Win32(windows::core::Error),
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::InitializationFailed(msg) => write!(f, "initialization failed: {msg}"),
            PlatformError::InvalidHandle(msg) => write!(f, "invalid handle: {msg}"),
            PlatformError::OperationFailed(msg) => write!(f, "operation failed: {msg}"),
            #[cfg(target_os = "windows")]
            PlatformError::Win32(err) => write!(f, "Win32 error: {err}"),
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(target_os = "windows")]
            PlatformError::Win32(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(target_os = "windows")]
impl From<windows::core::Error> for PlatformError {
    fn from(err: windows::core::Error) -> Self {
        PlatformError::Win32(err)
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;
