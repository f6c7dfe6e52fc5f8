//! CLI command implementations.

pub(crate) mod delete;
pub(crate) mod edit;
pub(crate) mod history;
pub(crate) mod list;
pub(crate) mod new;
pub(crate) mod render;

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use folio_composer::{Composer, HttpContentSource};
use folio_config::Config;
use folio_diagrams::{DiagramRenderer, DisabledEngine, KrokiEngine};
use folio_kv::FileStore;
use folio_store::DocumentStore;

use crate::error::CliError;

pub(crate) use delete::DeleteArgs;
pub(crate) use edit::EditArgs;
pub(crate) use history::HistoryArgs;
pub(crate) use new::NewArgs;
pub(crate) use render::RenderArgs;

/// Build the composer described by `config`.
///
/// Documents and cached diagrams share one file store under the data
/// directory.
pub(crate) fn open_composer(config: &Config) -> Composer {
    let data = FileStore::new(&config.store.data_dir);
    let store = DocumentStore::open(Box::new(data.clone()));

    let renderer = match &config.diagrams.kroki_url {
        Some(url) => {
            tracing::info!(kroki_url = %url, "Diagram rendering enabled");
            DiagramRenderer::new(KrokiEngine::with_timeout(url, config.diagrams.timeout()))
        }
        None => DiagramRenderer::new(DisabledEngine),
    };
    let renderer = if config.diagrams.cache {
        renderer.with_cache(Box::new(data))
    } else {
        renderer
    };

    let composer = Composer::new(store, renderer);
    match &config.generator.url {
        Some(url) => composer.with_source(Arc::new(HttpContentSource::new(
            url.clone(),
            config.generator.timeout(),
        ))),
        None => composer,
    }
}

/// Read content from `path`, or from stdin when no path is given.
pub(crate) fn read_content(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut content = String::new();
            std::io::stdin().read_to_string(&mut content)?;
            Ok(content)
        }
    }
}
