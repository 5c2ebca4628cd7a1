//! Init command implementation

use std::path::PathBuf;

use anyhow::{bail, Result};

use marquee::config::Config;

/// Write a default config file
pub fn init_command(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Config::global_config_path);

    if !Config::init_at(&config_path, force)? {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    println!("Created: {}", config_path.display());
    Ok(())
}
