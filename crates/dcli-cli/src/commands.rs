//! Subcommands that run without the dashboard

use anyhow::{Context, Result};
use dcli_config::GlobalConfig;

/// Show the effective configuration, or open the config file in `$EDITOR`
pub fn config(effective: &GlobalConfig, edit: bool) -> Result<()> {
    let config_path = GlobalConfig::config_path()?;

    if edit {
        let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

        // Create config file with defaults if it doesn't exist
        if !config_path.exists() {
            GlobalConfig::default().save()?;
            println!("Created default config at {:?}", config_path);
        }

        std::process::Command::new(&editor)
            .arg(&config_path)
            .status()
            .context(format!("Failed to open editor: {}", editor))?;
        return Ok(());
    }

    if config_path.exists() {
        println!("# Config file: {:?}\n", config_path);
    } else {
        println!("# Config file: {:?} (not created yet)\n", config_path);
    }
    println!("{}", effective.to_toml()?);

    Ok(())
}
