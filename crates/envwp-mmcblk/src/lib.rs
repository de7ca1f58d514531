//! envwp-mmcblk - MMC hardware boot partition write protection
//!
//! eMMC devices carry two hardware boot partitions, exposed by Linux as
//! `/dev/mmcblkNboot0` and `/dev/mmcblkNboot1`. The kernel keeps them
//! read-only by default and exposes the switch as a sysfs attribute:
//!
//! ```bash
//! cat /sys/class/block/mmcblk0boot1/force_ro   # 1 = read-only
//! echo 0 > /sys/class/block/mmcblk0boot1/force_ro
//! ```
//!
//! U-Boot frequently keeps its environment on one of these partitions, so
//! writing it from Linux means flipping `force_ro` to `0` first and putting
//! the original value back afterwards. [`MmcBootProtector`] does exactly that.
//!
//! # Device matching
//!
//! Only `<dev root>/mmcblk<d>boot<d>` is recognized, with a single digit for
//! both the controller and the partition index. The strategy also requires
//! the `force_ro` attribute to exist and be writable by the current process;
//! otherwise probing reports that it does not apply.

pub mod device;

// Re-exports
pub use device::{match_device, BootPartition, MmcBootProtector, STRATEGY_NAME};

use envwp_core::{ProbeConfig, ProbeError, Protector};

/// Probe a device path and return a boxed Protector
///
/// This is the entry used by the strategy registry.
pub fn probe_mmcblk(
    config: &ProbeConfig,
    device: &str,
) -> Result<Option<Box<dyn Protector>>, ProbeError> {
    Ok(MmcBootProtector::probe(config, device)?.map(|p| Box::new(p) as Box<dyn Protector>))
}
