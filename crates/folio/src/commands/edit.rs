//! `folio edit` command implementation.

use std::path::PathBuf;

use clap::Args;
use folio_composer::{Composer, EditOutcome};

use super::read_content;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the edit command.
#[derive(Args)]
pub(crate) struct EditArgs {
    /// Document identity.
    id: String,

    /// Read new content from this file (default: stdin).
    #[arg(short, long)]
    file: Option<PathBuf>,
}

impl EditArgs {
    pub(crate) fn execute(self, composer: &mut Composer, output: &Output) -> Result<(), CliError> {
        let content = read_content(self.file.as_deref())?;

        match composer.save_edit(&self.id, &content)? {
            EditOutcome::Unchanged => output.warning("Content unchanged, no version saved"),
            EditOutcome::Appended(document) => {
                let number = document.versions.len();
                output.success(&format!("Saved version {number} of {}", document.id));
            }
            EditOutcome::NotFound => return Err(CliError::NotFound(self.id)),
        }
        Ok(())
    }
}
