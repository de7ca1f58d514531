//! envwp-core - write protection control for boot environment storage
//!
//! Some boot environment storage (for example U-Boot's environment on an
//! eMMC boot partition) sits behind a hardware write protect switch that the
//! kernel exposes as a one-byte control file rather than through the normal
//! write path. This crate provides the pieces shared by every hardware
//! family:
//!
//! - [`Protector`]: the capability every strategy implements
//! - [`ControlFile`]: the one-byte `'0'`/`'1'` control file protocol
//! - [`WpState`] and [`ArchivedState`]: decoded and remembered state
//! - [`ProbeConfig`]: where strategies look for devices and control files
//!
//! # Example
//!
//! ```ignore
//! use envwp_core::Protector;
//!
//! // `protector` comes from a strategy's probe function
//! protector.unprotect();
//! write_environment(&device)?;
//! protector.reprotect();
//! ```

pub mod config;
pub mod control;
pub mod error;
pub mod protector;
pub mod state;

// Re-exports
pub use config::ProbeConfig;
pub use control::{ControlFile, ControlSession};
pub use error::{ProbeError, ProtectError, Result};
pub use protector::Protector;
pub use state::{ArchivedState, SkipReason, Transition, WpState};
