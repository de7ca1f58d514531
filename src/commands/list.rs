//! List commands implementation

use envwp_probe::available_strategies;

/// List all compiled-in write protection strategies in probe order
pub fn list_strategies() {
    let strategies = available_strategies();
    if strategies.is_empty() {
        println!("No write protection strategies enabled (recompile with features)");
        return;
    }

    println!("Supported write protection strategies (probe order):");
    println!();
    for strategy in strategies {
        println!("  {:<12} - {}", strategy.name, strategy.description);
    }
}
