//! CLI command implementations.

pub(crate) mod serve;
pub(crate) mod stats;
pub(crate) mod structure;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use console::Term;
use folio_config::{CliSettings, Config};
use folio_notes::Vault;
use folio_server::{create_vault, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

pub(crate) use serve::ServeArgs;
pub(crate) use stats::StatsArgs;
pub(crate) use structure::StructureArgs;

/// Arguments shared by the offline inspection commands.
#[derive(Args)]
pub(crate) struct VaultArgs {
    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Note source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,
}

impl VaultArgs {
    /// Load configuration and open the vault it points at.
    fn open(&self, version: &str) -> Result<Arc<Vault>, CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let vault = create_vault(&server_config_from_config(&config, version.to_owned()));
        let notes = vault.snapshot().store().len();
        if notes == 0 {
            Output::new().warning(&format!(
                "No notes found in {}",
                config.vault_resolved.source_dir.display()
            ));
        }
        Ok(vault)
    }
}

/// Write a value as pretty JSON to stdout.
fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)?;
    Term::stdout().write_line(&json)?;
    Ok(())
}
