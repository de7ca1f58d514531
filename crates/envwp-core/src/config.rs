//! Probe configuration

use std::path::{Path, PathBuf};

/// Directory holding block device nodes
pub const DEFAULT_DEV_ROOT: &str = "/dev";

/// Sysfs class directory for block devices
pub const DEFAULT_SYSFS_BLOCK_ROOT: &str = "/sys/class/block";

/// Where strategies look for device nodes and control files
///
/// The defaults match a normal Linux system. Tests and unusual root
/// filesystems point these at another tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    dev_root: PathBuf,
    sysfs_block_root: PathBuf,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            dev_root: PathBuf::from(DEFAULT_DEV_ROOT),
            sysfs_block_root: PathBuf::from(DEFAULT_SYSFS_BLOCK_ROOT),
        }
    }
}

impl ProbeConfig {
    /// Configuration for a standard Linux system
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different device node directory
    pub fn with_dev_root(mut self, dev_root: impl Into<PathBuf>) -> Self {
        self.dev_root = dev_root.into();
        self
    }

    /// Use a different sysfs block class directory
    pub fn with_sysfs_block_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.sysfs_block_root = root.into();
        self
    }

    /// Device node directory (e.g. `/dev`)
    pub fn dev_root(&self) -> &Path {
        &self.dev_root
    }

    /// Sysfs block class directory (e.g. `/sys/class/block`)
    pub fn sysfs_block_root(&self) -> &Path {
        &self.sysfs_block_root
    }
}
