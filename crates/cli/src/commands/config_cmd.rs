use anyhow::Context;
use clap::Subcommand;
use tracing::debug;

use crate::config::{get_config_path, AppConfig};
use crate::errors::CliError;

#[cfg(test)]
#[path = "config_cmd_tests.rs"]
mod tests;

/// Subcommands for the config command
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Create initial configuration file
    Init {
        /// Path to save the configuration file
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Check configuration syntax
    Validate {
        /// Path to the configuration file
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Show current configuration
    Show {
        /// Path to the configuration file
        #[arg(short, long)]
        path: Option<String>,
    },
}

/// Execute the config command
pub async fn execute(cmd: ConfigCommands) -> Result<(), CliError> {
    match cmd {
        ConfigCommands::Init { path } => init_config(path.as_deref()),
        ConfigCommands::Validate { path } => validate_config(path.as_deref()),
        ConfigCommands::Show { path } => show_config(path.as_deref()),
    }
}

/// Initialize a new configuration file
fn init_config(path: Option<&str>) -> Result<(), CliError> {
    let config_path = get_config_path(path);
    debug!("Initializing configuration at {:?}", config_path);

    if config_path.exists() {
        return Err(CliError::ConfigError(format!(
            "Configuration file already exists at {:?}",
            config_path
        )));
    }

    AppConfig::default().save(&config_path)?;

    println!("Configuration initialized at {:?}", config_path);
    Ok(())
}

/// Validate a configuration file
fn validate_config(path: Option<&str>) -> Result<(), CliError> {
    let config_path = get_config_path(path);
    debug!("Validating configuration at {:?}", config_path);

    AppConfig::load(&config_path)?;
    println!("Configuration is valid");
    Ok(())
}

/// Print the configuration a run would use
fn show_config(path: Option<&str>) -> Result<(), CliError> {
    let config = AppConfig::load_or_default(path)?;
    let config_str =
        toml::to_string_pretty(&config).context("Failed to serialize configuration")?;
    println!("{}", config_str);

    Ok(())
}
