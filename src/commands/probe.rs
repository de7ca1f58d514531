//! Probe and status command implementations

use envwp_probe::{probe_with, ProbeConfig};
use std::error::Error;

/// Report which strategy, if any, handles a device
pub fn run_probe(config: &ProbeConfig, device: &str) -> Result<(), Box<dyn Error>> {
    match probe_with(config, device)? {
        Some(handle) => {
            println!("{}: {}", device, handle.strategy());
            println!("  Control: {}", handle.control_path().display());
        }
        None => println!("{}: no write protection control", device),
    }
    Ok(())
}

/// Print the current protection state without changing it
pub fn run_status(config: &ProbeConfig, device: &str) -> Result<(), Box<dyn Error>> {
    let Some(handle) = probe_with(config, device)? else {
        println!("{}: no write protection control", device);
        return Ok(());
    };

    let state = handle
        .current_state()
        .map_err(|e| format!("Cannot read protection state of {}: {}", device, e))?;
    println!("{}: {} ({})", device, state, handle.strategy());
    Ok(())
}
