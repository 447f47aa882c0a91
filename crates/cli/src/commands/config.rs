use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use freightrank_core::config::{AppConfig, LoadOptions, DEFAULT_CONFIG_FILE, NESTED_CONFIG_FILE};
use freightrank_core::errors::ApplicationError;
use serde::Serialize;
use toml::Value;

use crate::commands::CommandResult;

const COMMAND: &str = "config";

#[derive(Debug, Serialize)]
struct ConfigEntry {
    key: &'static str,
    value: String,
    source: String,
}

pub fn run(config_path: Option<PathBuf>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions {
        config_path: config_path.clone(),
        require_file: config_path.is_some(),
        ..LoadOptions::default()
    }) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error(COMMAND, &ApplicationError::from(error)),
    };

    let config_file_path = detect_config_path(config_path);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let entries = vec![
        ConfigEntry {
            key: "ranking.preset",
            value: config.ranking.preset.to_string(),
            source: source("ranking.preset", &["FREIGHTRANK_PRESET"]),
        },
        ConfigEntry {
            key: "ranking.strategy",
            value: config.ranking.strategy.to_string(),
            source: source("ranking.strategy", &["FREIGHTRANK_STRATEGY"]),
        },
        ConfigEntry {
            key: "ranking.emergency_mode",
            value: config.ranking_config().emergency_mode.to_string(),
            source: source("ranking.emergency_mode", &["FREIGHTRANK_EMERGENCY_MODE"]),
        },
        ConfigEntry {
            key: "ranking.seed",
            value: config.ranking.seed.map_or_else(|| "<unset>".to_string(), |seed| seed.to_string()),
            source: source("ranking.seed", &["FREIGHTRANK_SEED"]),
        },
        ConfigEntry {
            key: "logging.level",
            value: config.logging.level.clone(),
            source: source("logging.level", &["FREIGHTRANK_LOGGING_LEVEL", "FREIGHTRANK_LOG_LEVEL"]),
        },
        ConfigEntry {
            key: "logging.format",
            value: format!("{:?}", config.logging.format).to_ascii_lowercase(),
            source: source(
                "logging.format",
                &["FREIGHTRANK_LOGGING_FORMAT", "FREIGHTRANK_LOG_FORMAT"],
            ),
        },
    ];

    CommandResult::success_with_data(
        COMMAND,
        "effective config (source precedence: env > file > default)",
        &entries,
    )
}

fn detect_config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return path.exists().then_some(path);
    }

    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from(NESTED_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) =
        env_keys.iter().find(|key| env::var(key).is_ok_and(|value| !value.trim().is_empty()))
    {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}
