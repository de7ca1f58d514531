//! Strategy registry and probing
//!
//! Strategies are tried in a fixed priority order. The first one that
//! recognizes a device and finds its control interface usable wins.

use crate::handle::ProtectorHandle;
use envwp_core::{ProbeConfig, ProbeError, Protector};

/// Result of one strategy's probe
pub type StrategyProbe = Result<Option<Box<dyn Protector>>, ProbeError>;

/// A write protection strategy known to the registry
pub struct StrategyInfo {
    /// Primary name
    pub name: &'static str,
    /// Short description
    pub description: &'static str,
    /// Matcher and constructor
    pub probe: fn(&ProbeConfig, &str) -> StrategyProbe,
}

/// All strategies enabled at compile time, in probe order
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_strategies() -> Vec<StrategyInfo> {
    let mut strategies = Vec::new();

    #[cfg(feature = "mmcblk")]
    strategies.push(StrategyInfo {
        name: envwp_mmcblk::STRATEGY_NAME,
        description: "eMMC hardware boot partition via sysfs force_ro (/dev/mmcblkNbootM)",
        probe: envwp_mmcblk::probe_mmcblk,
    });

    strategies
}

/// Generate a short list of strategy names for CLI help
pub fn strategy_names_short() -> String {
    let strategies = available_strategies();
    if strategies.is_empty() {
        return "none (recompile with features)".to_string();
    }
    let names: Vec<&str> = strategies.iter().map(|s| s.name).collect();
    names.join(", ")
}

/// Probe a device path on a standard Linux system
///
/// See [`probe_with`].
pub fn probe(device: &str) -> Result<Option<ProtectorHandle>, ProbeError> {
    probe_with(&ProbeConfig::default(), device)
}

/// Probe a device path against every enabled strategy
///
/// Returns `Ok(None)` when no strategy applies, which is the normal outcome
/// on hardware without a write protect switch. Only allocation failure is
/// reported as an error.
///
/// # Example
/// ```ignore
/// if let Some(mut handle) = probe_with(&ProbeConfig::default(), "/dev/mmcblk0boot1")? {
///     let _guard = handle.unprotected();
///     // write the environment
/// }
/// ```
pub fn probe_with(
    config: &ProbeConfig,
    device: &str,
) -> Result<Option<ProtectorHandle>, ProbeError> {
    probe_strategies(&available_strategies(), config, device)
}

/// Probe a device path against an explicit strategy list
pub fn probe_strategies(
    strategies: &[StrategyInfo],
    config: &ProbeConfig,
    device: &str,
) -> Result<Option<ProtectorHandle>, ProbeError> {
    for strategy in strategies {
        log::trace!("Trying {} for {}", strategy.name, device);
        if let Some(protector) = (strategy.probe)(config, device)? {
            log::debug!("{} handles {}", strategy.name, device);
            return Ok(Some(ProtectorHandle::new(protector)));
        }
    }

    log::debug!("No write protection strategy applies to {}", device);
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use envwp_core::{ArchivedState, Result, Transition, WpState};
    use std::path::{Path, PathBuf};

    #[derive(Debug)]
    struct Fixed {
        name: &'static str,
        device: PathBuf,
    }

    impl Protector for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }

        fn device(&self) -> &Path {
            &self.device
        }

        fn control_path(&self) -> &Path {
            Path::new("/nonexistent")
        }

        fn archived(&self) -> ArchivedState {
            ArchivedState::NeverCaptured
        }

        fn current_state(&self) -> Result<WpState> {
            Ok(WpState::Protected)
        }

        fn try_unprotect(&mut self) -> Result<Transition> {
            Ok(Transition::Wrote {
                from: Some(WpState::Protected),
                to: WpState::Unprotected,
            })
        }

        fn try_reprotect(&self) -> Result<Transition> {
            Ok(Transition::Wrote {
                from: Some(WpState::Unprotected),
                to: WpState::Protected,
            })
        }
    }

    fn reject(_: &ProbeConfig, _: &str) -> StrategyProbe {
        Ok(None)
    }

    fn first(_: &ProbeConfig, device: &str) -> StrategyProbe {
        Ok(Some(Box::new(Fixed {
            name: "first",
            device: PathBuf::from(device),
        })))
    }

    fn second(_: &ProbeConfig, device: &str) -> StrategyProbe {
        Ok(Some(Box::new(Fixed {
            name: "second",
            device: PathBuf::from(device),
        })))
    }

    fn out_of_memory(_: &ProbeConfig, device: &str) -> StrategyProbe {
        let source = Vec::<u8>::new().try_reserve(usize::MAX).unwrap_err();
        Err(ProbeError::Alloc {
            device: device.to_string(),
            source,
        })
    }

    fn info(name: &'static str, probe: fn(&ProbeConfig, &str) -> StrategyProbe) -> StrategyInfo {
        StrategyInfo {
            name,
            description: "",
            probe,
        }
    }

    #[test]
    fn test_first_match_wins() {
        let strategies = [
            info("reject", reject),
            info("first", first),
            info("second", second),
        ];
        let handle = probe_strategies(&strategies, &ProbeConfig::default(), "/dev/x")
            .unwrap()
            .unwrap();
        assert_eq!(handle.strategy(), "first");
        assert_eq!(handle.device(), Path::new("/dev/x"));
    }

    #[test]
    fn test_no_match_is_not_an_error() {
        let strategies = [info("reject", reject), info("reject", reject)];
        let result = probe_strategies(&strategies, &ProbeConfig::default(), "/dev/x").unwrap();
        assert!(result.is_none());
        assert!(probe_strategies(&[], &ProbeConfig::default(), "/dev/x")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_allocation_failure_propagates() {
        let strategies = [info("oom", out_of_memory), info("first", first)];
        let err = probe_strategies(&strategies, &ProbeConfig::default(), "/dev/x").unwrap_err();
        assert!(matches!(err, ProbeError::Alloc { .. }));
    }

    #[test]
    fn test_non_matching_paths_on_real_system() {
        for device in ["/dev/sda", "/dev/mtd0", "relative", "/dev/mmcblk0boot10"] {
            assert!(probe(device).unwrap().is_none(), "{}", device);
        }
    }
}
