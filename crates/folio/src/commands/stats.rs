//! `folio stats` command implementation.

use clap::Args;

use super::{VaultArgs, print_json};
use crate::error::CliError;

/// Arguments for the stats command.
#[derive(Args)]
pub(crate) struct StatsArgs {
    #[command(flatten)]
    vault: VaultArgs,
}

impl StatsArgs {
    /// Print note counts and word statistics as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails to load.
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        let vault = self.vault.open(version)?;
        print_json(&vault.stats())
    }
}
