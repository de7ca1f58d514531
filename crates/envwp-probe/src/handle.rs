//! ProtectorHandle - owned, type-erased protector
//!
//! The CLI and other callers only deal with this type and never need to
//! know which strategy matched.

use envwp_core::{ArchivedState, Protector, Result, Transition, WpState};
use std::path::Path;

/// A probed write protection session for one device
///
/// Dropping the handle does not touch the device. Use
/// [`ProtectorHandle::unprotected`] for scoped unprotect/reprotect.
#[derive(Debug)]
pub struct ProtectorHandle {
    protector: Box<dyn Protector>,
}

impl ProtectorHandle {
    /// Wrap a probed protector
    pub fn new(protector: Box<dyn Protector>) -> Self {
        Self { protector }
    }

    /// Name of the strategy that matched
    pub fn strategy(&self) -> &'static str {
        self.protector.name()
    }

    /// Device this handle is bound to
    pub fn device(&self) -> &Path {
        self.protector.device()
    }

    /// Control interface toggled by this handle
    pub fn control_path(&self) -> &Path {
        self.protector.control_path()
    }

    /// State captured by the last unprotect
    pub fn archived(&self) -> ArchivedState {
        self.protector.archived()
    }

    /// Read the current protection state
    pub fn current_state(&self) -> Result<WpState> {
        self.protector.current_state()
    }

    /// Lift write protection, ignoring failures
    pub fn unprotect(&mut self) {
        self.protector.unprotect()
    }

    /// Restore the archived protection state, ignoring failures
    pub fn reprotect(&self) {
        self.protector.reprotect()
    }

    /// Like [`unprotect`](Self::unprotect) but reports what happened
    pub fn try_unprotect(&mut self) -> Result<Transition> {
        self.protector.try_unprotect()
    }

    /// Like [`reprotect`](Self::reprotect) but reports what happened
    pub fn try_reprotect(&self) -> Result<Transition> {
        self.protector.try_reprotect()
    }

    /// Unprotect now and reprotect when the returned guard is dropped
    pub fn unprotected(&mut self) -> Unprotected<'_> {
        self.unprotect();
        Unprotected { handle: self }
    }
}

/// Scope during which a device is unprotected
///
/// Reprotects on drop, including when the write in between fails or panics.
#[derive(Debug)]
pub struct Unprotected<'a> {
    handle: &'a mut ProtectorHandle,
}

impl Unprotected<'_> {
    /// State captured when this scope started
    pub fn archived(&self) -> ArchivedState {
        self.handle.archived()
    }
}

impl Drop for Unprotected<'_> {
    fn drop(&mut self) {
        self.handle.reprotect();
    }
}
