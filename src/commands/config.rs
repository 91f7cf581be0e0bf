//! Config subcommands handler

use anyhow::{bail, Result};

use vsc::Config;

/// Show the effective configuration as TOML.
///
/// Prints the loaded file merged over defaults, or only defaults when no
/// config file exists.
#[cfg(not(tarpaulin_include))]
pub fn handle_show() -> Result<()> {
    let config = Config::load()?;
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Print the configuration file path and whether it exists.
#[cfg(not(tarpaulin_include))]
pub fn handle_path() -> Result<()> {
    let path = Config::config_path()?;
    if path.exists() {
        println!("{}", path.display());
    } else {
        println!("{} (not created, using defaults)", path.display());
    }
    Ok(())
}

/// Write the default configuration to the config file path.
///
/// Refuses to replace an existing file unless `force` is set.
#[cfg(not(tarpaulin_include))]
pub fn handle_init(force: bool) -> Result<()> {
    let path = Config::config_path()?;
    if path.exists() && !force {
        bail!(
            "config file already exists: {} (use --force to overwrite)",
            path.display()
        );
    }
    Config::default().save()?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
