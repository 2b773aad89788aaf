use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thirtyone_core::game::sampler::{ConfigurationError, SampleParams};
use thiserror::Error;
use tracing::Level;

const DEFAULT_PLAYER_COUNT: usize = 3;
const DEFAULT_HERO_ID: usize = 0;
const DEFAULT_THRESHOLD: u8 = 22;
const DEFAULT_SAMPLES: usize = 100;
const DEFAULT_RECORDS_DIR: &str = "records";

/// Root simulation configuration. Every block is optional in YAML.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub samples: SamplesConfig,
    #[serde(default)]
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file on disk.
    ///
    /// The result is not validated; callers apply any overrides first and
    /// then call [`SimulationConfig::validate`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
            source,
            path: path_buf,
        })
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.outputs.validate()?;
        self.logging.normalize();
        self.sample_params(0)
            .validate()
            .map_err(ValidationError::from)
    }

    /// Sampler parameters for this configuration, using `seed` when none is configured.
    pub fn sample_params(&self, fallback_seed: u64) -> SampleParams {
        SampleParams {
            player_count: self.table.player_count,
            hero: self.table.hero_id,
            threshold: self.table.threshold,
            samples: self.samples.count,
            seed: self.samples.seed.unwrap_or(fallback_seed),
        }
    }
}

/// Seating and hero policy.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    #[serde(default = "default_player_count")]
    pub player_count: usize,
    #[serde(default)]
    pub hero_id: usize,
    #[serde(default = "default_threshold")]
    pub threshold: u8,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            player_count: DEFAULT_PLAYER_COUNT,
            hero_id: DEFAULT_HERO_ID,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

fn default_player_count() -> usize {
    DEFAULT_PLAYER_COUNT
}

fn default_threshold() -> u8 {
    DEFAULT_THRESHOLD
}

/// Trial count and RNG seed.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SamplesConfig {
    #[serde(default = "default_samples")]
    pub count: usize,
    pub seed: Option<u64>,
}

impl Default for SamplesConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_SAMPLES,
            seed: None,
        }
    }
}

fn default_samples() -> usize {
    DEFAULT_SAMPLES
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputsConfig {
    #[serde(default = "default_records_dir")]
    pub records_dir: PathBuf,
    #[serde(default = "default_true")]
    pub summary: bool,
}

impl Default for OutputsConfig {
    fn default() -> Self {
        Self {
            records_dir: default_records_dir(),
            summary: true,
        }
    }
}

impl OutputsConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.records_dir.as_os_str().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "outputs.records_dir".to_string(),
                message: "path must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn default_records_dir() -> PathBuf {
    PathBuf::from(DEFAULT_RECORDS_DIR)
}

fn default_true() -> bool {
    true
}

/// Logging configuration defaults to human-readable logs on stderr.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

impl From<ConfigurationError> for ValidationError {
    fn from(err: ConfigurationError) -> Self {
        let field = match err {
            ConfigurationError::PlayerCount(_) => "table.player_count",
            ConfigurationError::HeroOutOfRange { .. } => "table.hero_id",
            ConfigurationError::Threshold(_) => "table.threshold",
            ConfigurationError::Samples => "samples.count",
        };
        ValidationError::InvalidField {
            field: field.to_string(),
            message: err.to_string(),
        }
    }
}
