//! `folio render` command implementation.

use clap::Args;
use folio_composer::{Composer, RenderedDocument, RenderedNode};
use folio_diagrams::DiagramRenderResult;
use folio_markup::{Block, StyledRun};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Document identity.
    id: String,

    /// Version number to render (default: latest).
    #[arg(long = "version", value_name = "N")]
    version_number: Option<u32>,

    /// Print the rendered nodes as JSON.
    #[arg(long)]
    json: bool,
}

impl RenderArgs {
    pub(crate) async fn execute(self, composer: &Composer, output: &Output) -> Result<(), CliError> {
        let Some(rendered) = composer.render(&self.id, self.version_number).await else {
            return Err(match self.version_number {
                Some(version) if composer.store().get_by_id(&self.id).is_some() => {
                    CliError::VersionNotFound { id: self.id, version }
                }
                _ => CliError::NotFound(self.id),
            });
        };

        if self.json {
            output.print(&serde_json::to_string_pretty(&rendered)?);
        } else {
            for line in outline(&rendered) {
                output.print(&line);
            }
        }

        let failed = rendered.failed_diagrams();
        if failed > 0 {
            output.warning(&format!("{failed} diagram(s) failed to render"));
        }
        Ok(())
    }
}

/// Plain-text outline of a rendered document, one line per block.
fn outline(document: &RenderedDocument) -> Vec<String> {
    let mut lines = Vec::new();
    for node in &document.nodes {
        match node {
            RenderedNode::Blocks { blocks, .. } => {
                let mut ordinal = 0;
                for block in blocks {
                    ordinal = match block {
                        Block::OrderedItem { .. } => ordinal + 1,
                        _ => 0,
                    };
                    lines.push(block_line(block, ordinal));
                }
            }
            RenderedNode::Diagram {
                language, result, ..
            } => match result {
                Some(DiagramRenderResult::Rendered(image)) => {
                    lines.push(format!("[{language:?} diagram, {} bytes of SVG]", image.svg.len()));
                }
                Some(DiagramRenderResult::Failed(failure)) => {
                    lines.push(format!("[{}]", failure.message));
                    lines.extend(failure.source.lines().map(|line| format!("    {line}")));
                }
                None => lines.push(format!("[{language:?} diagram, render superseded]")),
            },
        }
    }
    lines
}

/// `ordinal` numbers ordered items within a consecutive run.
fn block_line(block: &Block, ordinal: usize) -> String {
    match block {
        Block::Heading { level, runs } => {
            format!("{} {}", "#".repeat(usize::from(level.as_u8())), plain_text(runs))
        }
        Block::BulletItem { runs } => format!("- {}", plain_text(runs)),
        Block::OrderedItem { runs } => format!("{ordinal}. {}", plain_text(runs)),
        Block::Paragraph { runs } => plain_text(runs),
        Block::Table(table) => format!(
            "[table: {} | {} rows]",
            table.headers.join(" | "),
            table.rows.len()
        ),
    }
}

fn plain_text(runs: &[StyledRun]) -> String {
    runs.iter().map(StyledRun::text).collect()
}
