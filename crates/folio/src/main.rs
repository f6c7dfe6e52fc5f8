//! folio CLI - versioned research documents with rendered diagrams.
//!
//! Provides commands for:
//! - `list`: documents, most recently updated first
//! - `new`: create a document from a file, stdin or the content generator
//! - `edit`: save a new version
//! - `history`: show a document's versions
//! - `render`: parse and render a version
//! - `delete`: remove a document and its versions

mod commands;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use folio_config::{CliSettings, Config};
use tracing_subscriber::EnvFilter;

use commands::{DeleteArgs, EditArgs, HistoryArgs, NewArgs, RenderArgs};
use error::CliError;
use output::Output;

/// folio - versioned research documents.
#[derive(Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command.
#[derive(Args)]
struct GlobalArgs {
    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data directory (overrides config).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Kroki server URL for diagram rendering (overrides config).
    #[arg(long, global = true, env = "FOLIO_KROKI_URL")]
    kroki_url: Option<String>,

    /// Content generator URL (overrides config).
    #[arg(long, global = true, env = "FOLIO_GENERATOR_URL")]
    generator_url: Option<String>,

    /// Disable the diagram render cache.
    #[arg(long, global = true)]
    no_cache: bool,

    /// Enable verbose output (info-level logs).
    #[arg(short, long, global = true)]
    verbose: bool,
}

impl GlobalArgs {
    fn load_config(&self) -> Result<Config, CliError> {
        let settings = CliSettings {
            data_dir: self.data_dir.clone(),
            kroki_url: self.kroki_url.clone(),
            cache_enabled: self.no_cache.then_some(false),
            generator_url: self.generator_url.clone(),
        };
        Ok(Config::load(self.config.as_deref(), Some(&settings))?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List documents, most recently updated first.
    List,
    /// Create a document.
    New(NewArgs),
    /// Save new content for a document.
    Edit(EditArgs),
    /// Show a document's versions.
    History(HistoryArgs),
    /// Render a document version.
    Render(RenderArgs),
    /// Delete a document and all its versions.
    Delete(DeleteArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.global.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli, &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.error(&format!("Error: {err}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, output: &Output) -> Result<(), CliError> {
    let config = cli.global.load_config()?;
    let mut composer = commands::open_composer(&config);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        match cli.command {
            Commands::List => commands::list::execute(&composer, output),
            Commands::New(args) => args.execute(&mut composer, output).await,
            Commands::Edit(args) => args.execute(&mut composer, output),
            Commands::History(args) => args.execute(&composer, output),
            Commands::Render(args) => args.execute(&composer, output).await,
            Commands::Delete(args) => args.execute(&mut composer, output),
        }
    })
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "folio",
            "render",
            "abc",
            "--version",
            "2",
            "--config",
            "custom.toml",
            "--no-cache",
        ])
        .unwrap();

        assert_eq!(cli.global.config, Some(PathBuf::from("custom.toml")));
        assert!(cli.global.no_cache);
        assert!(matches!(cli.command, Commands::Render(_)));
    }

    #[test]
    fn test_new_file_conflicts_with_generate() {
        let result = Cli::try_parse_from([
            "folio", "new", "--topic", "t", "--file", "x.md", "--generate",
        ]);

        assert!(result.is_err());
    }
}
