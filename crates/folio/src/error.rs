//! CLI error types.

use folio_composer::ComposeError;
use folio_config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Compose(#[from] ComposeError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("document not found: {0}")]
    NotFound(String),

    #[error("document {id} has no version {version}")]
    VersionNotFound { id: String, version: u32 },

    #[error("{0}")]
    Validation(String),
}
