//! `folio list` command implementation.

use folio_composer::Composer;
use folio_store::Document;

use crate::error::CliError;
use crate::output::Output;

pub(crate) fn execute(composer: &Composer, output: &Output) -> Result<(), CliError> {
    let documents = composer.store().list();
    if documents.is_empty() {
        output.info("No documents");
        return Ok(());
    }

    for document in documents {
        output.print(&format_row(document));
    }
    Ok(())
}

fn format_row(document: &Document) -> String {
    format!(
        "{}  v{:<3} {}  {}",
        document.id,
        document.version_count(),
        document.updated_at.format("%Y-%m-%d %H:%M"),
        document.topic
    )
}
