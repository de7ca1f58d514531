//! envwp - lift and restore hardware write protection of boot environment storage
//!
//! Some boards keep their boot loader environment on storage whose write
//! protection is switched out of band, e.g. the eMMC boot partitions behind
//! `/sys/class/block/mmcblkNbootM/force_ro`. envwp finds the right switch for
//! a device, flips it for the duration of a write and puts the original
//! state back afterwards.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use envwp_probe::ProbeConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    let config = ProbeConfig::new()
        .with_dev_root(cli.dev_root)
        .with_sysfs_block_root(cli.sysfs_root);
    log::debug!("{:?}", config);

    match cli.command {
        Commands::Probe { device } => commands::probe::run_probe(&config, &device),
        Commands::Status { device } => commands::probe::run_status(&config, &device),
        Commands::Write {
            device,
            input,
            offset,
            no_verify,
        } => commands::write::run_write(&config, &device, &input, offset, !no_verify),
        Commands::ListStrategies => {
            commands::list_strategies();
            Ok(())
        }
    }
}
