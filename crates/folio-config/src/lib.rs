//! Configuration management for folio.
//!
//! Parses `folio.toml` with serde and discovers it in the current directory
//! or any parent. CLI settings are applied on top via [`CliSettings`].
//!
//! ```toml
//! [store]
//! data_dir = ".folio"
//!
//! [diagrams]
//! kroki_url = "https://kroki.io"
//! timeout_secs = 30
//! cache = true
//!
//! [generator]
//! url = "http://localhost:8080/generate"
//! timeout_secs = 120
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `store.data_dir`, `diagrams.kroki_url` and `generator.url` support
//! `${VAR}` (error if unset) and `${VAR:-default}`.

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "folio.toml";

const DEFAULT_DATA_DIR: &str = ".folio";
const DEFAULT_DIAGRAM_TIMEOUT_SECS: u64 = 30;
const DEFAULT_GENERATOR_TIMEOUT_SECS: u64 = 120;

/// CLI settings that override configuration file values.
///
/// Only `Some` values override.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub data_dir: Option<PathBuf>,
    pub kroki_url: Option<String>,
    pub cache_enabled: Option<bool>,
    pub generator_url: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
    #[error("Environment variable error in {field}: {message}")]
    EnvVar { field: String, message: String },
}

/// `folio.toml` as written, before expansion and path resolution.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    store: RawStore,
    diagrams: RawDiagrams,
    generator: RawGenerator,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawStore {
    data_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawDiagrams {
    kroki_url: Option<String>,
    timeout_secs: Option<u64>,
    cache: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawGenerator {
    url: Option<String>,
    timeout_secs: Option<u64>,
}

/// Document store settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Root directory of the file-backed key-value store.
    pub data_dir: PathBuf,
}

/// Diagram rendering settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramsConfig {
    /// Kroki server URL. `None` disables rendering; diagrams show their source.
    pub kroki_url: Option<String>,
    pub timeout_secs: u64,
    /// Cache rendered SVGs under the data directory.
    pub cache: bool,
}

impl DiagramsConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Content generation backend settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Endpoint accepting `{"topic", "overview"}`. `None` disables generation.
    pub url: Option<String>,
    pub timeout_secs: u64,
}

impl GeneratorConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Resolved application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store: StoreConfig,
    pub diagrams: DiagramsConfig,
    pub generator: GeneratorConfig,
    /// File the configuration was loaded from, if any.
    pub config_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration with optional CLI settings.
    ///
    /// An explicit `config_path` must exist. Without one, `folio.toml` is
    /// searched for in the current directory and its parents; if none is
    /// found, defaults relative to the current directory are used.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_base(&std::env::current_dir().unwrap_or_default())
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    /// Defaults with paths relative to `base`.
    #[must_use]
    pub fn default_with_base(base: &Path) -> Self {
        Self {
            store: StoreConfig {
                data_dir: base.join(DEFAULT_DATA_DIR),
            },
            diagrams: DiagramsConfig {
                kroki_url: None,
                timeout_secs: DEFAULT_DIAGRAM_TIMEOUT_SECS,
                cache: true,
            },
            generator: GeneratorConfig {
                url: None,
                timeout_secs: DEFAULT_GENERATOR_TIMEOUT_SECS,
            },
            config_path: None,
        }
    }

    /// Check URLs and timeouts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.diagrams.kroki_url {
            require_http_url(url, "diagrams.kroki_url")?;
        }
        if let Some(url) = &self.generator.url {
            require_http_url(url, "generator.url")?;
        }
        require_positive(self.diagrams.timeout_secs, "diagrams.timeout_secs")?;
        require_positive(self.generator.timeout_secs, "generator.timeout_secs")?;
        Ok(())
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(data_dir) = &settings.data_dir {
            self.store.data_dir.clone_from(data_dir);
        }
        if let Some(kroki_url) = &settings.kroki_url {
            self.diagrams.kroki_url = Some(kroki_url.clone());
        }
        if let Some(cache) = settings.cache_enabled {
            self.diagrams.cache = cache;
        }
        if let Some(url) = &settings.generator_url {
            self.generator.url = Some(url.clone());
        }
    }

    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let raw: RawConfig = toml::from_str(&content)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));

        let mut config = Self::resolve(raw, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Expand environment variables and resolve paths against `config_dir`.
    fn resolve(raw: RawConfig, config_dir: &Path) -> Result<Self, ConfigError> {
        let data_dir = match raw.store.data_dir {
            Some(dir) => expand::expand_env(&dir, "store.data_dir")?,
            None => DEFAULT_DATA_DIR.to_owned(),
        };
        let kroki_url = raw
            .diagrams
            .kroki_url
            .map(|url| expand::expand_env(&url, "diagrams.kroki_url"))
            .transpose()?;
        let generator_url = raw
            .generator
            .url
            .map(|url| expand::expand_env(&url, "generator.url"))
            .transpose()?;

        Ok(Self {
            store: StoreConfig {
                data_dir: config_dir.join(data_dir),
            },
            diagrams: DiagramsConfig {
                kroki_url,
                timeout_secs: raw
                    .diagrams
                    .timeout_secs
                    .unwrap_or(DEFAULT_DIAGRAM_TIMEOUT_SECS),
                cache: raw.diagrams.cache.unwrap_or(true),
            },
            generator: GeneratorConfig {
                url: generator_url,
                timeout_secs: raw
                    .generator
                    .timeout_secs
                    .unwrap_or(DEFAULT_GENERATOR_TIMEOUT_SECS),
            },
            config_path: None,
        })
    }
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

fn require_positive(value: u64, field: &str) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Validation(format!(
            "{field} must be greater than 0"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn parse(toml: &str, base: &str) -> Result<Config, ConfigError> {
        let raw: RawConfig = toml::from_str(toml)?;
        Config::resolve(raw, Path::new(base))
    }

    fn write_config(content: &str) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, content).unwrap();
        (tmp, path)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/work"));

        assert_eq!(config.store.data_dir, PathBuf::from("/work/.folio"));
        assert_eq!(config.diagrams.kroki_url, None);
        assert_eq!(config.diagrams.timeout(), Duration::from_secs(30));
        assert!(config.diagrams.cache);
        assert_eq!(config.generator.url, None);
        assert_eq!(config.generator.timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_empty_file_matches_defaults() {
        let config = parse("", "/work").unwrap();

        assert_eq!(config, Config::default_with_base(Path::new("/work")));
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse(
            r#"
[store]
data_dir = "var/docs"

[diagrams]
kroki_url = "https://kroki.io"
timeout_secs = 10
cache = false

[generator]
url = "http://localhost:8080/generate"
timeout_secs = 300
"#,
            "/project",
        )
        .unwrap();

        assert_eq!(config.store.data_dir, PathBuf::from("/project/var/docs"));
        assert_eq!(config.diagrams.kroki_url.as_deref(), Some("https://kroki.io"));
        assert_eq!(config.diagrams.timeout_secs, 10);
        assert!(!config.diagrams.cache);
        assert_eq!(
            config.generator.url.as_deref(),
            Some("http://localhost:8080/generate")
        );
        assert_eq!(config.generator.timeout_secs, 300);
    }

    #[test]
    fn test_absolute_data_dir_kept() {
        let config = parse("[store]\ndata_dir = \"/srv/folio\"\n", "/project").unwrap();

        assert_eq!(config.store.data_dir, PathBuf::from("/srv/folio"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = parse("[store]\ndatadir = \"x\"\n", "/project");

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let mut config = Config::default_with_base(Path::new("/work"));
        config.diagrams.kroki_url = Some("kroki.io".to_owned());

        let err = config.validate().unwrap_err();

        assert_eq!(
            err.to_string(),
            "Configuration error: diagrams.kroki_url must start with http:// or https://"
        );
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default_with_base(Path::new("/work"));
        config.generator.timeout_secs = 0;

        let err = config.validate().unwrap_err();

        assert!(err.to_string().contains("generator.timeout_secs"));
    }

    #[test]
    fn test_env_expansion_in_urls() {
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var("FOLIO_TEST_GENERATOR_HOST", "gen.local");
        }
        let config = parse(
            "[generator]\nurl = \"http://${FOLIO_TEST_GENERATOR_HOST}/generate\"\n",
            "/project",
        )
        .unwrap();
        unsafe {
            std::env::remove_var("FOLIO_TEST_GENERATOR_HOST");
        }

        assert_eq!(config.generator.url.as_deref(), Some("http://gen.local/generate"));
    }

    #[test]
    fn test_load_explicit_path() {
        let (tmp, path) = write_config("[diagrams]\nkroki_url = \"http://localhost:8000\"\n");

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.store.data_dir, tmp.path().join(".folio"));
        assert_eq!(
            config.diagrams.kroki_url.as_deref(),
            Some("http://localhost:8000")
        );
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("absent.toml");

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_validates_file() {
        let (_tmp, path) = write_config("[diagrams]\ntimeout_secs = 0\n");

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_cli_settings_override_file() {
        let (_tmp, path) = write_config(
            "[diagrams]\nkroki_url = \"https://kroki.io\"\ncache = true\n",
        );
        let settings = CliSettings {
            data_dir: Some(PathBuf::from("/tmp/override")),
            kroki_url: Some("http://localhost:9000".to_owned()),
            cache_enabled: Some(false),
            generator_url: None,
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.store.data_dir, PathBuf::from("/tmp/override"));
        assert_eq!(
            config.diagrams.kroki_url.as_deref(),
            Some("http://localhost:9000")
        );
        assert!(!config.diagrams.cache);
        assert_eq!(config.generator.url, None);
    }

    #[test]
    fn test_cli_settings_are_validated() {
        let (_tmp, path) = write_config("");
        let settings = CliSettings {
            generator_url: Some("ftp://example.com".to_owned()),
            ..Default::default()
        };

        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();

        assert!(err.to_string().contains("generator.url"));
    }
}
