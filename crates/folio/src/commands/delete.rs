//! `folio delete` command implementation.

use clap::Args;
use folio_composer::Composer;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the delete command.
#[derive(Args)]
pub(crate) struct DeleteArgs {
    /// Document identity.
    id: String,
}

impl DeleteArgs {
    pub(crate) fn execute(self, composer: &mut Composer, output: &Output) -> Result<(), CliError> {
        if composer.delete(&self.id)? {
            output.success(&format!("Deleted {}", self.id));
        } else {
            output.warning(&format!("No document {}, nothing deleted", self.id));
        }
        Ok(())
    }
}
