use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ranking::ScoringStrategy;
use crate::domain::weights::{RankingConfig, RankingPreset};
use crate::errors::ApplicationError;

pub const DEFAULT_CONFIG_FILE: &str = "freightrank.toml";
pub const NESTED_CONFIG_FILE: &str = "config/freightrank.toml";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AppConfig {
    pub ranking: RankingSettings,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankingSettings {
    pub preset: RankingPreset,
    pub strategy: ScoringStrategy,
    /// Overrides the preset's own emergency flag when set.
    pub emergency_mode: Option<bool>,
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub preset: Option<RankingPreset>,
    pub strategy: Option<ScoringStrategy>,
    pub emergency_mode: Option<bool>,
    pub seed: Option<u64>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl From<ConfigError> for ApplicationError {
    fn from(error: ConfigError) -> Self {
        ApplicationError::Configuration(error.to_string())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ranking: RankingSettings {
                preset: RankingPreset::Default,
                strategy: ScoringStrategy::Dynamic,
                emergency_mode: None,
                seed: None,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl RankingSettings {
    /// Preset weights with the emergency override applied.
    pub fn ranking_config(&self) -> RankingConfig {
        let mut config = self.preset.config();
        if let Some(emergency_mode) = self.emergency_mode {
            config.emergency_mode = emergency_mode;
        }
        config
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch)?;
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn ranking_config(&self) -> RankingConfig {
        self.ranking.ranking_config()
    }

    fn apply_patch(&mut self, patch: ConfigPatch) -> Result<(), ConfigError> {
        if let Some(ranking) = patch.ranking {
            if let Some(preset) = ranking.preset {
                self.ranking.preset = parse_preset(&preset)?;
            }
            if let Some(strategy) = ranking.strategy {
                self.ranking.strategy = parse_strategy(&strategy)?;
            }
            if let Some(emergency_mode) = ranking.emergency_mode {
                self.ranking.emergency_mode = Some(emergency_mode);
            }
            if let Some(seed) = ranking.seed {
                self.ranking.seed = Some(seed);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("FREIGHTRANK_PRESET") {
            self.ranking.preset =
                value.parse().map_err(|_| invalid_env("FREIGHTRANK_PRESET", &value))?;
        }
        if let Some(value) = read_env("FREIGHTRANK_STRATEGY") {
            self.ranking.strategy =
                value.parse().map_err(|_| invalid_env("FREIGHTRANK_STRATEGY", &value))?;
        }
        if let Some(value) = read_env("FREIGHTRANK_EMERGENCY_MODE") {
            self.ranking.emergency_mode = Some(parse_bool("FREIGHTRANK_EMERGENCY_MODE", &value)?);
        }
        if let Some(value) = read_env("FREIGHTRANK_SEED") {
            self.ranking.seed = Some(parse_u64("FREIGHTRANK_SEED", &value)?);
        }

        let log_level =
            read_env("FREIGHTRANK_LOGGING_LEVEL").or_else(|| read_env("FREIGHTRANK_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("FREIGHTRANK_LOGGING_FORMAT").or_else(|| read_env("FREIGHTRANK_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(preset) = overrides.preset {
            self.ranking.preset = preset;
        }
        if let Some(strategy) = overrides.strategy {
            self.ranking.strategy = strategy;
        }
        if let Some(emergency_mode) = overrides.emergency_mode {
            self.ranking.emergency_mode = Some(emergency_mode);
        }
        if let Some(seed) = overrides.seed {
            self.ranking.seed = Some(seed);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_logging(&self.logging)?;
        self.ranking_config()
            .weights
            .validate()
            .map_err(|error| ConfigError::Validation(format!("ranking.preset: {error}")))?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from(NESTED_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn parse_preset(value: &str) -> Result<RankingPreset, ConfigError> {
    value.parse().map_err(|error| ConfigError::Validation(format!("ranking.preset: {error}")))
}

fn parse_strategy(value: &str) -> Result<ScoringStrategy, ConfigError> {
    value.parse().map_err(|error| ConfigError::Validation(format!("ranking.strategy: {error}")))
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn invalid_env(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidEnvOverride { key: key.to_string(), value: value.to_string() }
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| invalid_env(key, value))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(invalid_env(key, value)),
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    ranking: Option<RankingPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct RankingPatch {
    preset: Option<String>,
    strategy: Option<String>,
    emergency_mode: Option<bool>,
    seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
