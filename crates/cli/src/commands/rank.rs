use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use freightrank_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use freightrank_core::domain::carrier::CarrierProfile;
use freightrank_core::domain::ranking::{RankedCandidate, ScoringStrategy};
use freightrank_core::domain::weights::{ConfigurationWarning, RankingPreset};
use freightrank_core::engine::{RankingEngine, RankingInput};
use freightrank_core::errors::{ApplicationError, DomainError};
use serde::Serialize;

use crate::commands::CommandResult;

const COMMAND: &str = "rank";

#[derive(Clone, Debug, Default)]
pub struct RankArgs {
    pub config_path: Option<PathBuf>,
    pub carriers: PathBuf,
    pub preset: Option<String>,
    pub strategy: Option<String>,
    pub emergency: bool,
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RankReport {
    preset: RankingPreset,
    strategy: ScoringStrategy,
    emergency_mode: bool,
    seed: Option<u64>,
    warnings: Vec<ConfigurationWarning>,
    candidates: Vec<RankedCandidate>,
}

pub fn run(args: RankArgs) -> CommandResult {
    match execute(args) {
        Ok(report) => {
            let message = format!(
                "ranked {} carriers with {} strategy",
                report.candidates.len(),
                report.strategy
            );
            CommandResult::success_with_data(COMMAND, message, &report)
        }
        Err(error) => CommandResult::from_error(COMMAND, &error),
    }
}

fn execute(args: RankArgs) -> Result<RankReport, ApplicationError> {
    let overrides = overrides(&args)?;
    let config = AppConfig::load(LoadOptions {
        require_file: args.config_path.is_some(),
        config_path: args.config_path,
        overrides,
    })?;
    crate::init_logging(&config);

    let carriers = read_carriers(&args.carriers)
        .map_err(|error| ApplicationError::Input(format!("{error:#}")))?;

    let ranking_config = config.ranking_config();
    let strategy = config.ranking.strategy;
    let input = RankingInput { carriers: &carriers, config: &ranking_config, strategy };

    let engine = RankingEngine::new();
    let candidates = match config.ranking.seed {
        Some(seed) => engine.rank_seeded(input, seed)?,
        None => engine.rank(input)?,
    };

    let warnings = if strategy == ScoringStrategy::Dynamic {
        ranking_config.warnings()
    } else {
        Vec::new()
    };

    Ok(RankReport {
        preset: config.ranking.preset,
        strategy,
        emergency_mode: ranking_config.emergency_mode,
        seed: config.ranking.seed,
        warnings,
        candidates,
    })
}

fn overrides(args: &RankArgs) -> Result<ConfigOverrides, DomainError> {
    Ok(ConfigOverrides {
        preset: args.preset.as_deref().map(str::parse::<RankingPreset>).transpose()?,
        strategy: args.strategy.as_deref().map(str::parse::<ScoringStrategy>).transpose()?,
        emergency_mode: args.emergency.then_some(true),
        seed: args.seed,
        ..ConfigOverrides::default()
    })
}

fn read_carriers(path: &Path) -> anyhow::Result<Vec<CarrierProfile>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read carriers file `{}`", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("carriers file `{}` is not a JSON array of carriers", path.display()))
}
