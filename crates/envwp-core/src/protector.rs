//! The Protector capability

use crate::error::Result;
use crate::state::{ArchivedState, Transition, WpState};
use log::{debug, warn};
use std::fmt::Debug;
use std::path::Path;

/// A write protection session bound to one device
///
/// Each hardware family provides one implementation. A protector is created
/// by probing a device path and stays bound to that device for its whole
/// lifetime.
///
/// Calls must be serialized by the owner: `unprotect` before writing,
/// `reprotect` afterwards. External writers to the same control file between
/// the two calls are not guarded against.
pub trait Protector: Send + Debug {
    /// Short strategy identifier (e.g. `"mmcblk-boot"`)
    fn name(&self) -> &'static str;

    /// The device path this protector was probed with
    fn device(&self) -> &Path;

    /// The control interface this protector toggles
    fn control_path(&self) -> &Path;

    /// State captured by the last unprotect call
    fn archived(&self) -> ArchivedState;

    /// Read the current protection state without changing it
    fn current_state(&self) -> Result<WpState>;

    /// Archive the current state and lift write protection
    ///
    /// If the current state cannot be read or decoded, the archived state
    /// becomes [`ArchivedState::Unknown`] and nothing is written. If the
    /// control file cannot be opened at all, the archived state is left as
    /// it was.
    fn try_unprotect(&mut self) -> Result<Transition>;

    /// Write the archived state back
    ///
    /// Does nothing unless the last unprotect recognized the state it saw.
    fn try_reprotect(&self) -> Result<Transition>;

    /// Best-effort [`try_unprotect`](Self::try_unprotect)
    ///
    /// Failures are logged and otherwise ignored so that a failed toggle
    /// never aborts the caller's write.
    fn unprotect(&mut self) {
        match self.try_unprotect() {
            Ok(transition) => debug!("{}: unprotect {:?}", self.name(), transition),
            Err(e) => warn!(
                "{}: could not unprotect {}: {}",
                self.name(),
                self.device().display(),
                e
            ),
        }
    }

    /// Best-effort [`try_reprotect`](Self::try_reprotect)
    fn reprotect(&self) {
        match self.try_reprotect() {
            Ok(transition) => debug!("{}: reprotect {:?}", self.name(), transition),
            Err(e) => warn!(
                "{}: could not restore protection of {}: {}",
                self.name(),
                self.device().display(),
                e
            ),
        }
    }
}
