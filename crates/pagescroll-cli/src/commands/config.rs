use std::path::Path;

use anyhow::Result;

use pagescroll_core::AppConfig;

pub fn run(config: &AppConfig, config_path: &Path, path_only: bool, init: bool) -> Result<()> {
    if path_only {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config already exists at {}", config_path.display());
        } else {
            config.save_to(config_path)?;
            println!("Wrote default configuration to {}", config_path.display());
        }
        return Ok(());
    }

    if !config_path.exists() {
        println!("# {} does not exist, showing defaults\n", config_path.display());
    }
    print!("{}", config.to_toml()?);
    Ok(())
}
