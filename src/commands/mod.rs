//! CLI command implementations
//!
//! Every command probes the device through `envwp-probe` and works with the
//! returned `ProtectorHandle`, so none of them know which strategy matched.

mod list;
pub mod probe;
pub mod write;

pub use list::list_strategies;
