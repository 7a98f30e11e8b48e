//! `healthgate config` – show where defaults come from and what they are.

use anyhow::Result;
use healthgate_core::config;

pub fn run_config() -> Result<()> {
    let path = config::config_path()?;
    let cfg = config::load_or_init_at(&path)?;
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(&cfg)?);
    Ok(())
}
