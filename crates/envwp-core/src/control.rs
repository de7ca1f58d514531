//! One-byte control file protocol
//!
//! Platforms expose write protection as a sysfs-style attribute holding a
//! single ASCII byte: `'0'` for unprotected, `'1'` for protected. Exactly one
//! byte is ever read or written. Writes always target offset 0; sysfs
//! ignores the offset, and a regular file standing in for the attribute
//! keeps a single leading state byte.

use crate::error::{ProtectError, Result};
use crate::state::WpState;
use log::{debug, trace};
use nix::unistd::{access, AccessFlags};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// A platform control file governing one device's write protection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlFile {
    path: PathBuf,
}

impl ControlFile {
    /// Wrap a control file path
    ///
    /// Nothing is opened until one of the access methods is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the control file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether the current process may write the control file
    ///
    /// This is an `access(2)` check and does not open the file. A missing
    /// file reports `false`.
    pub fn is_writable(&self) -> bool {
        match access(&self.path, AccessFlags::W_OK) {
            Ok(()) => true,
            Err(errno) => {
                debug!("{} is not writable: {}", self.path.display(), errno);
                false
            }
        }
    }

    /// Read the current state without changing it
    pub fn read_state(&self) -> Result<WpState> {
        let file = File::open(&self.path).map_err(|e| ProtectError::Open {
            path: self.path.clone(),
            source: e,
        })?;
        ControlSession {
            path: &self.path,
            file,
        }
        .read_state()
    }

    /// Open the control file for a read-then-write exchange
    pub fn open_read_write(&self) -> Result<ControlSession<'_>> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| ProtectError::Open {
                path: self.path.clone(),
                source: e,
            })?;
        Ok(ControlSession {
            path: &self.path,
            file,
        })
    }

    /// Overwrite the state without reading it first
    ///
    /// The file is opened write-only and must already exist.
    pub fn store(&self, state: WpState) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .map_err(|e| ProtectError::Open {
                path: self.path.clone(),
                source: e,
            })?;
        ControlSession {
            path: &self.path,
            file,
        }
        .write_state(state)
    }
}

/// An open control file
///
/// The file is closed when the session is dropped.
#[derive(Debug)]
pub struct ControlSession<'a> {
    path: &'a Path,
    file: File,
}

impl ControlSession<'_> {
    /// Read and decode the state byte
    pub fn read_state(&mut self) -> Result<WpState> {
        let byte = self.read_byte()?;
        WpState::from_byte(byte).ok_or_else(|| ProtectError::Indeterminate {
            path: self.path.to_path_buf(),
            byte,
        })
    }

    /// Write a state byte at offset 0
    pub fn write_state(&mut self, state: WpState) -> Result<()> {
        let map_err = |e: std::io::Error| ProtectError::Write {
            path: self.path.to_path_buf(),
            source: e,
        };
        self.file.seek(SeekFrom::Start(0)).map_err(map_err)?;
        self.file.write_all(&[state.as_byte()]).map_err(map_err)?;
        trace!("{} <- {:?}", self.path.display(), state.as_byte() as char);
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        let n = self.file.read(&mut buf).map_err(|e| ProtectError::Read {
            path: self.path.to_path_buf(),
            source: e,
        })?;
        if n != 1 {
            return Err(ProtectError::ShortRead {
                path: self.path.to_path_buf(),
            });
        }
        trace!("{} -> {:#04x}", self.path.display(), buf[0]);
        Ok(buf[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn control_file(dir: &TempDir, contents: &[u8]) -> ControlFile {
        let path = dir.path().join("force_ro");
        fs::write(&path, contents).unwrap();
        ControlFile::new(path)
    }

    #[test]
    fn test_read_state() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            control_file(&dir, b"1\n").read_state().unwrap(),
            WpState::Protected
        );
        assert_eq!(
            control_file(&dir, b"0\n").read_state().unwrap(),
            WpState::Unprotected
        );
    }

    #[test]
    fn test_read_state_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let err = control_file(&dir, b"7").read_state().unwrap_err();
        assert!(matches!(err, ProtectError::Indeterminate { byte: b'7', .. }));
        assert!(err.is_read_failure());
    }

    #[test]
    fn test_read_state_empty_file() {
        let dir = TempDir::new().unwrap();
        let err = control_file(&dir, b"").read_state().unwrap_err();
        assert!(matches!(err, ProtectError::ShortRead { .. }));
    }

    #[test]
    fn test_session_writes_at_offset_zero() {
        let dir = TempDir::new().unwrap();
        let control = control_file(&dir, b"1\n");

        let mut session = control.open_read_write().unwrap();
        assert_eq!(session.read_state().unwrap(), WpState::Protected);
        session.write_state(WpState::Unprotected).unwrap();
        drop(session);

        assert_eq!(fs::read(control.path()).unwrap(), b"0\n");
    }

    #[test]
    fn test_store() {
        let dir = TempDir::new().unwrap();
        let control = control_file(&dir, b"0");
        control.store(WpState::Protected).unwrap();
        assert_eq!(fs::read(control.path()).unwrap(), b"1");
    }

    #[test]
    fn test_store_does_not_create() {
        let dir = TempDir::new().unwrap();
        let control = ControlFile::new(dir.path().join("missing"));
        let err = control.store(WpState::Protected).unwrap_err();
        assert!(matches!(err, ProtectError::Open { .. }));
        assert!(!control.path().exists());
    }

    #[test]
    fn test_writable() {
        let dir = TempDir::new().unwrap();
        assert!(control_file(&dir, b"0").is_writable());
        assert!(!ControlFile::new(dir.path().join("missing")).is_writable());
    }

    #[test]
    fn test_read_only_file_is_not_writable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let control = control_file(&dir, b"1");
        fs::set_permissions(control.path(), fs::Permissions::from_mode(0o444)).unwrap();

        // With CAP_DAC_OVERRIDE (root) access(W_OK) ignores the mode bits
        if OpenOptions::new().write(true).open(control.path()).is_ok() {
            return;
        }

        assert!(!control.is_writable());
        assert_eq!(control.read_state().unwrap(), WpState::Protected);
    }
}
