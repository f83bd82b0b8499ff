//! `peeper config` - show or save the effective configuration.

use peeper_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, write: bool) -> anyhow::Result<()> {
    config.validate()?;

    println!("# {}", config_file_path().display());
    println!("{}", serde_json::to_string_pretty(config)?);

    if write {
        let path = config.save()?;
        println!("Saved to {}", path.display());
    }

    Ok(())
}
