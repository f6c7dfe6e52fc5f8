//! `folio history` command implementation.

use clap::Args;
use folio_composer::Composer;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the history command.
#[derive(Args)]
pub(crate) struct HistoryArgs {
    /// Document identity.
    id: String,
}

impl HistoryArgs {
    pub(crate) fn execute(self, composer: &Composer, output: &Output) -> Result<(), CliError> {
        let document = composer
            .store()
            .get_by_id(&self.id)
            .ok_or(CliError::NotFound(self.id))?;

        output.highlight(&document.topic);
        if !document.overview.is_empty() {
            output.print_dim(&document.overview);
        }
        for version in document.versions.iter().rev() {
            output.print(&format!(
                "v{:<3} {}  {} bytes",
                version.version_number,
                version.created_at.format("%Y-%m-%d %H:%M:%S"),
                version.content.len()
            ));
        }
        Ok(())
    }
}
