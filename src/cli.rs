//! CLI argument parsing

use clap::{Parser, Subcommand};
use envwp_core::config::{DEFAULT_DEV_ROOT, DEFAULT_SYSFS_BLOCK_ROOT};
use std::path::PathBuf;

/// Parse a string as a hex or decimal u64
fn parse_hex_u64(s: &str) -> Result<u64, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u64>().map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Generate dynamic help text for the device argument
fn device_help() -> String {
    format!(
        "Block device holding the environment [strategies: {}]",
        envwp_probe::strategy_names_short()
    )
}

#[derive(Parser)]
#[command(name = "envwp")]
#[command(
    author,
    version,
    about = "Lift and restore hardware write protection of boot environment storage",
    long_about = None
)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding block device nodes
    #[arg(long, global = true, default_value = DEFAULT_DEV_ROOT)]
    pub dev_root: PathBuf,

    /// Sysfs block class directory holding write protect attributes
    #[arg(long, global = true, default_value = DEFAULT_SYSFS_BLOCK_ROOT)]
    pub sysfs_root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether a device has a usable write protect control
    Probe {
        #[arg(help = device_help())]
        device: String,
    },

    /// Show the current write protection state (read-only)
    Status {
        #[arg(help = device_help())]
        device: String,
    },

    /// Write a file to a device, lifting write protection for the duration
    Write {
        #[arg(help = device_help())]
        device: String,

        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Byte offset on the device (hex, e.g., 0x3e0000, or decimal)
        #[arg(long, value_parser = parse_hex_u64, default_value = "0")]
        offset: u64,

        /// Skip reading the data back after writing
        #[arg(long)]
        no_verify: bool,
    },

    /// List supported write protection strategies
    ListStrategies,
}
