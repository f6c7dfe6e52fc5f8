//! `folio new` command implementation.

use std::path::PathBuf;

use clap::Args;
use folio_composer::Composer;

use super::read_content;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the new command.
#[derive(Args)]
pub(crate) struct NewArgs {
    /// Document topic.
    #[arg(short, long)]
    topic: String,

    /// Short overview of what the document should cover.
    #[arg(short, long, default_value = "")]
    overview: String,

    /// Read content from this file (default: stdin).
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Generate content with the configured content generator.
    #[arg(short, long, conflicts_with = "file")]
    generate: bool,
}

impl NewArgs {
    pub(crate) async fn execute(self, composer: &mut Composer, output: &Output) -> Result<(), CliError> {
        let document = if self.generate {
            output.info(&format!("Generating content for \"{}\"...", self.topic));
            composer.generate(&self.topic, &self.overview).await?
        } else {
            let content = read_content(self.file.as_deref())?;
            if content.trim().is_empty() {
                return Err(CliError::Validation("content is empty".to_owned()));
            }
            composer.import(&self.topic, &self.overview, &content)?
        };

        output.success(&format!("Created document {}", document.id));
        output.print(&document.id);
        Ok(())
    }
}
