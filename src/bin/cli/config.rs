use rowgraph::decode::{DecoderOptions, MissingScorePolicy};
use rowgraph::ingest::ErrorPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings loaded from `cli.toml`.
#[derive(Debug, Default)]
pub struct CliConfig {
    path: Option<PathBuf>,
    data: RawConfig,
}

impl CliConfig {
    pub fn load(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        let explicit_given = explicit.is_some();
        let path = explicit.or_else(default_config_path);
        let data = match path.as_ref() {
            Some(config_path) if config_path.exists() => read_file(config_path)?,
            Some(config_path) if explicit_given => {
                return Err(ConfigError::Missing {
                    path: config_path.clone(),
                })
            }
            _ => RawConfig::default(),
        };
        Ok(Self { path, data })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn decoder_options(&self) -> DecoderOptions {
        self.data.decoder.clone()
    }

    pub fn on_error(&self) -> ErrorPolicy {
        self.data.ingest.on_error
    }

    pub fn limit(&self) -> Option<u64> {
        self.data.ingest.limit
    }
}

fn read_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct RawConfig {
    #[serde(default)]
    decoder: DecoderOptions,
    #[serde(default)]
    ingest: IngestSection,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct IngestSection {
    #[serde(default)]
    on_error: ErrorPolicy,
    limit: Option<u64>,
}

/// Command-line overrides applied on top of the file.
#[derive(Debug, Default)]
pub struct DecoderOverrides {
    pub outlink_family: Option<String>,
    pub score_family: Option<String>,
    pub score_qualifier: Option<String>,
    pub missing_score: Option<MissingScorePolicy>,
    pub dedup_outlinks: bool,
}

impl DecoderOverrides {
    pub fn apply(self, mut opts: DecoderOptions) -> DecoderOptions {
        if let Some(family) = self.outlink_family {
            opts.outlink_family = family;
        }
        if let Some(family) = self.score_family {
            opts.score_family = family;
        }
        if let Some(qualifier) = self.score_qualifier {
            opts.score_qualifier = qualifier;
        }
        if let Some(policy) = self.missing_score {
            opts.missing_score = policy;
        }
        if self.dedup_outlinks {
            opts.dedup_outlinks = true;
        }
        opts
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read CLI config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse CLI config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("CLI config {path} does not exist")]
    Missing { path: PathBuf },
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("rowgraph").join("cli.toml"))
}
