//! `folio structure` command implementation.

use clap::Args;

use super::{VaultArgs, print_json};
use crate::error::CliError;

/// Arguments for the structure command.
#[derive(Args)]
pub(crate) struct StructureArgs {
    #[command(flatten)]
    vault: VaultArgs,
}

impl StructureArgs {
    /// Print the category/group/tree structure as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails to load.
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        let vault = self.vault.open(version)?;
        let snapshot = vault.snapshot();
        print_json(snapshot.structure())
    }
}
