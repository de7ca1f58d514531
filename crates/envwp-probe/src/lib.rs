//! Write protection probing
//!
//! This crate selects the write protection strategy for a device path and
//! hands back a [`ProtectorHandle`]. Callers only interact with types from
//! this crate and never with individual strategy crates.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Caller (envwp CLI, env writer)               │
//! │  - probe(device) before writing                              │
//! │  - unprotect / write / reprotect                             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    envwp-probe (this crate)                  │
//! │  - Strategy registry in fixed priority order                 │
//! │  - ProtectorHandle: owns Box<dyn Protector>                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!              ┌───────────────┴───────────────┐
//!              ▼                               ▼
//! ┌──────────────────────────┐   ┌──────────────────────────┐
//! │    envwp-core            │   │  Strategy crates         │
//! │  - Protector trait       │   │  - mmcblk (force_ro)     │
//! │  - ControlFile protocol  │   │  - implement Protector   │
//! └──────────────────────────┘   └──────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use envwp_probe::probe;
//!
//! match probe("/dev/mmcblk0boot1")? {
//!     Some(mut handle) => {
//!         let _guard = handle.unprotected();
//!         write_environment()?;
//!     }
//!     None => write_environment()?,
//! }
//! ```

mod handle;
mod registry;

pub use handle::{ProtectorHandle, Unprotected};
pub use registry::{
    available_strategies, probe, probe_strategies, probe_with, strategy_names_short,
    StrategyInfo, StrategyProbe,
};

// Re-export core types callers need
pub use envwp_core::{
    ArchivedState, ProbeConfig, ProbeError, ProtectError, Protector, SkipReason, Transition,
    WpState,
};
