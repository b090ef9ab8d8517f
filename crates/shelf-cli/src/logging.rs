//! Logging setup
//!
//! Logging stays off unless `SHELF_LOG` is set to a level. Output goes
//! to the configured log file, or stderr when none is set.

use std::fs::OpenOptions;

use tracing::info;
use tracing_subscriber::EnvFilter;

use shelf_core::Config;

pub fn init(config: &Config) {
    let Ok(log_level) = std::env::var("SHELF_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!(
        "shelf_core={},shelf_cli={}",
        log_level, log_level
    ));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false);

    match &config.log_file {
        Some(log_path) => {
            if let Some(parent) = log_path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let log_file = match OpenOptions::new().create(true).append(true).open(log_path) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("Warning: Could not open log file {:?}: {}", log_path, e);
                    return;
                }
            };
            // Ignore error if already initialized
            let _ = builder.with_writer(log_file).try_init();
            info!("Logging initialized to {:?}", log_path);
        }
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }
}
