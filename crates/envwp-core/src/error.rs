//! Error types for write protection control

use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while talking to a control file
///
/// These never escape [`Protector::unprotect`](crate::Protector::unprotect)
/// or [`Protector::reprotect`](crate::Protector::reprotect); they are logged
/// and dropped there. The `try_*` variants return them so callers and tests
/// can see what happened.
#[derive(Debug, Error)]
pub enum ProtectError {
    /// Control file could not be opened
    #[error("Failed to open control file '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading the state byte failed
    #[error("Failed to read control file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The control file returned no data
    #[error("Control file '{}' returned no data", .path.display())]
    ShortRead { path: PathBuf },

    /// The state byte is neither `'0'` nor `'1'`
    #[error("Control file '{}' holds unrecognized state byte {byte:#04x}", .path.display())]
    Indeterminate { path: PathBuf, byte: u8 },

    /// Writing the state byte failed
    #[error("Failed to write control file '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ProtectError {
    /// Whether the failure happened while reading the current state
    ///
    /// Read-phase failures leave the protection state unknown.
    pub fn is_read_failure(&self) -> bool {
        matches!(
            self,
            ProtectError::Read { .. }
                | ProtectError::ShortRead { .. }
                | ProtectError::Indeterminate { .. }
        )
    }
}

/// Hard failures while probing a device
///
/// "No strategy applies" is not an error; probing reports it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Memory for the protector state could not be reserved
    #[error("Out of memory while setting up write protection for '{device}': {source}")]
    Alloc {
        device: String,
        #[source]
        source: TryReserveError,
    },
}

/// Result type for control file operations
pub type Result<T> = std::result::Result<T, ProtectError>;
