//! Outpost headless harness
//!
//! Loads the simulation config, runs a seeded scripted session and prints a
//! summary.
//!
//! Run with: cargo run -p outpost_runtime
//!       or: OUTPOST_SEED=7 OUTPOST_MODE=waves cargo run --bin outpost-harness

use outpost_runtime::{run_session, SimConfig};

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match SimConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };
    config.print_summary();

    match run_session(&config) {
        Ok(summary) => {
            println!("{}", summary);
            if !summary.replica_matches {
                log::error!("Replica diverged from the authority");
                std::process::exit(2);
            }
        }
        Err(e) => {
            log::error!("Session failed: {}", e);
            std::process::exit(1);
        }
    }
}
