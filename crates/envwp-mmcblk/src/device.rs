//! MMC boot partition write protection

use envwp_core::{
    ArchivedState, ControlFile, ProbeConfig, ProbeError, Protector, Result, SkipReason,
    Transition, WpState,
};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Device family token for MMC block devices
const FAMILY: &str = "mmcblk";

/// Partition class token for hardware boot partitions
const BOOT_CLASS: &str = "boot";

/// Per-device sysfs attribute holding the write protect byte
const FORCE_RO: &str = "force_ro";

/// Strategy identifier
pub const STRATEGY_NAME: &str = "mmcblk-boot";

/// A device path recognized as an MMC hardware boot partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootPartition<'a> {
    /// Bare device name (e.g. `mmcblk0boot1`)
    pub name: &'a str,
    /// MMC controller index
    pub controller: u8,
    /// Boot partition index
    pub partition: u8,
}

/// Match a device path against `<dev_root>/mmcblk<d>boot<d>`
///
/// Exactly one ASCII digit is accepted at each index and nothing may follow
/// the partition index. `mmcblk10boot0` and `mmcblk0boot0p1` are rejected.
///
/// The device node prefix is compared as a literal string, so
/// `/dev//mmcblk0boot1` and `/dev/./mmcblk0boot1` do not match.
pub fn match_device<'a>(dev_root: &Path, device: &'a str) -> Option<BootPartition<'a>> {
    let root = dev_root.to_str()?;
    let name = device.strip_prefix(root)?;
    let name = if root.ends_with('/') {
        name
    } else {
        name.strip_prefix('/')?
    };

    let rest = name.strip_prefix(FAMILY)?;
    let (controller, rest) = split_digit(rest)?;
    let rest = rest.strip_prefix(BOOT_CLASS)?;
    let (partition, rest) = split_digit(rest)?;
    if !rest.is_empty() {
        return None;
    }

    Some(BootPartition {
        name,
        controller,
        partition,
    })
}

/// Split a leading ASCII digit off `s`
fn split_digit(s: &str) -> Option<(u8, &str)> {
    let (&first, _) = s.as_bytes().split_first()?;
    if !first.is_ascii_digit() {
        return None;
    }
    Some((first - b'0', &s[1..]))
}

/// Build `<sysfs_block_root>/<name>/force_ro`
///
/// The buffer is reserved fallibly so an allocation failure surfaces as a
/// probe error instead of an abort.
fn control_path(
    sysfs_block_root: &Path,
    name: &str,
    device: &str,
) -> std::result::Result<PathBuf, ProbeError> {
    let len = sysfs_block_root.as_os_str().len() + name.len() + FORCE_RO.len() + 2;
    let mut path = PathBuf::new();
    path.try_reserve(len).map_err(|e| ProbeError::Alloc {
        device: device.to_string(),
        source: e,
    })?;
    path.push(sysfs_block_root);
    path.push(name);
    path.push(FORCE_RO);
    Ok(path)
}

/// Write protection for an MMC hardware boot partition via `force_ro`
///
/// # Example
///
/// ```ignore
/// use envwp_core::{ProbeConfig, Protector};
/// use envwp_mmcblk::MmcBootProtector;
///
/// if let Some(mut wp) = MmcBootProtector::probe(&ProbeConfig::default(), "/dev/mmcblk0boot1")? {
///     wp.unprotect();
///     // write the environment
///     wp.reprotect();
/// }
/// ```
#[derive(Debug)]
pub struct MmcBootProtector {
    device: PathBuf,
    control: ControlFile,
    archived: ArchivedState,
}

impl MmcBootProtector {
    /// Probe a device path
    ///
    /// Returns `Ok(None)` if the path is not an MMC boot partition or if its
    /// `force_ro` attribute is missing or not writable by this process.
    pub fn probe(
        config: &ProbeConfig,
        device: &str,
    ) -> std::result::Result<Option<Self>, ProbeError> {
        let Some(part) = match_device(config.dev_root(), device) else {
            debug!("{}: {} is not an MMC boot partition", STRATEGY_NAME, device);
            return Ok(None);
        };

        let control = ControlFile::new(control_path(
            config.sysfs_block_root(),
            part.name,
            device,
        )?);

        if !control.is_writable() {
            debug!(
                "{}: {} has no writable {}",
                STRATEGY_NAME,
                device,
                control.path().display()
            );
            return Ok(None);
        }

        info!(
            "{} is MMC{} boot partition {} (control: {})",
            device,
            part.controller,
            part.partition,
            control.path().display()
        );

        Ok(Some(Self {
            device: PathBuf::from(device),
            control,
            archived: ArchivedState::NeverCaptured,
        }))
    }
}

impl Protector for MmcBootProtector {
    fn name(&self) -> &'static str {
        STRATEGY_NAME
    }

    fn device(&self) -> &Path {
        &self.device
    }

    fn control_path(&self) -> &Path {
        self.control.path()
    }

    fn archived(&self) -> ArchivedState {
        self.archived
    }

    fn current_state(&self) -> Result<WpState> {
        self.control.read_state()
    }

    fn try_unprotect(&mut self) -> Result<Transition> {
        let mut session = self.control.open_read_write()?;

        let from = match session.read_state() {
            Ok(state) => state,
            Err(e) => {
                self.archived = ArchivedState::Unknown;
                return Err(e);
            }
        };
        self.archived = ArchivedState::Recognized(from);

        session.write_state(WpState::Unprotected)?;
        info!("{}: {} -> unprotected", self.device.display(), from);

        Ok(Transition::Wrote {
            from: Some(from),
            to: WpState::Unprotected,
        })
    }

    fn try_reprotect(&self) -> Result<Transition> {
        let to = match self.archived {
            ArchivedState::Recognized(state) => state,
            ArchivedState::NeverCaptured => {
                return Ok(Transition::Skipped(SkipReason::NeverCaptured))
            }
            ArchivedState::Unknown => return Ok(Transition::Skipped(SkipReason::Unknown)),
        };

        self.control.store(to)?;
        info!("{}: restored {}", self.device.display(), to);

        // The file is not read here; whatever unprotect left may have changed
        Ok(Transition::Wrote { from: None, to })
    }
}
