use freightrank_core::domain::weights::{Criterion, RankingPreset, WeightVector};
use freightrank_core::errors::{ApplicationError, DomainError};
use serde::Serialize;

use crate::commands::CommandResult;

const COMMAND: &str = "reweight";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReweightReport {
    preset: RankingPreset,
    criterion: Criterion,
    requested_value: f64,
    weights: WeightVector,
    total: f64,
}

pub fn run(preset: &str, criterion: &str, value: f64) -> CommandResult {
    match reweight(preset, criterion, value) {
        Ok(report) => CommandResult::success_with_data(
            COMMAND,
            format!("{} set to {} and weights renormalized", report.criterion, value),
            &report,
        ),
        Err(error) => CommandResult::from_error(COMMAND, &ApplicationError::from(error)),
    }
}

fn reweight(preset: &str, criterion: &str, value: f64) -> Result<ReweightReport, DomainError> {
    let preset: RankingPreset = preset.parse()?;
    let criterion: Criterion = criterion.parse()?;

    let mut weights = preset.config().weights;
    weights.set_weight(criterion, value)?;

    Ok(ReweightReport { preset, criterion, requested_value: value, total: weights.total(), weights })
}
