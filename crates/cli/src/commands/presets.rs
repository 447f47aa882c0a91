use freightrank_core::domain::weights::{RankingPreset, WeightVector};
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PresetEntry {
    preset: RankingPreset,
    weights: WeightVector,
    emergency_mode: bool,
}

pub fn run() -> CommandResult {
    let entries: Vec<PresetEntry> = RankingPreset::ALL
        .into_iter()
        .map(|preset| {
            let config = preset.config();
            PresetEntry { preset, weights: config.weights, emergency_mode: config.emergency_mode }
        })
        .collect();

    CommandResult::success_with_data(
        "presets",
        format!("{} built-in presets", entries.len()),
        &entries,
    )
}
