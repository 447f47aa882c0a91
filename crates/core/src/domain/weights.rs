use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Tolerance used when checking whether a weight vector sums to one.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Cost,
    Time,
    Reliability,
    Risk,
    Experience,
}

impl Criterion {
    /// Criteria that carry a per-carrier metric in every scoring path.
    pub const SCORED: [Criterion; 4] =
        [Criterion::Cost, Criterion::Time, Criterion::Reliability, Criterion::Risk];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cost => "cost",
            Self::Time => "time",
            Self::Reliability => "reliability",
            Self::Risk => "risk",
            Self::Experience => "experience",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Criterion {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cost" => Ok(Self::Cost),
            "time" => Ok(Self::Time),
            "reliability" => Ok(Self::Reliability),
            "risk" => Ok(Self::Risk),
            "experience" => Ok(Self::Experience),
            other => Err(DomainError::UnknownCriterion(other.to_owned())),
        }
    }
}

/// Caller-supplied importance weights, each in [0, 1].
///
/// `experience` is optional. It takes part in interactive re-normalization but
/// no scoring path has a carrier metric for it, so it never contributes to a
/// score.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    pub cost: f64,
    pub time: f64,
    pub reliability: f64,
    pub risk: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<f64>,
}

impl WeightVector {
    pub const fn new(cost: f64, time: f64, reliability: f64, risk: f64) -> Self {
        Self { cost, time, reliability, risk, experience: None }
    }

    pub fn with_experience(mut self, experience: f64) -> Self {
        self.experience = Some(experience);
        self
    }

    /// Builds a vector from named entries; criteria not mentioned are zero.
    pub fn from_entries<I>(entries: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (Criterion, f64)>,
    {
        let mut weights = Self::new(0.0, 0.0, 0.0, 0.0);
        let mut seen_any = false;

        for (criterion, value) in entries {
            validate_weight(criterion, value)?;
            weights.assign(criterion, value);
            seen_any = true;
        }

        if !seen_any {
            return Err(DomainError::EmptyWeightVector);
        }

        Ok(weights)
    }

    pub fn get(&self, criterion: Criterion) -> Option<f64> {
        match criterion {
            Criterion::Cost => Some(self.cost),
            Criterion::Time => Some(self.time),
            Criterion::Reliability => Some(self.reliability),
            Criterion::Risk => Some(self.risk),
            Criterion::Experience => self.experience,
        }
    }

    /// The four weights paired with a carrier metric, in cost/time/reliability/risk order.
    pub fn scored(&self) -> [f64; 4] {
        [self.cost, self.time, self.reliability, self.risk]
    }

    pub fn scored_total(&self) -> f64 {
        self.scored().iter().sum()
    }

    /// Sum over every present weight, `experience` included.
    pub fn total(&self) -> f64 {
        self.scored_total() + self.experience.unwrap_or(0.0)
    }

    pub fn sums_to_one(&self) -> bool {
        (self.total() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        for criterion in Criterion::SCORED {
            validate_weight(criterion, self.get(criterion).unwrap_or(0.0))?;
        }
        if let Some(experience) = self.experience {
            validate_weight(Criterion::Experience, experience)?;
        }
        Ok(())
    }

    /// Interactive edit: sets one weight, then rescales every weight by the new
    /// total so they sum to one again. A zero total leaves the weights as set.
    pub fn set_weight(&mut self, criterion: Criterion, value: f64) -> Result<(), DomainError> {
        validate_weight(criterion, value)?;
        self.assign(criterion, value);

        let total = self.total();
        if total > 0.0 {
            self.cost /= total;
            self.time /= total;
            self.reliability /= total;
            self.risk /= total;
            if let Some(experience) = self.experience.as_mut() {
                *experience /= total;
            }
        }

        Ok(())
    }

    fn assign(&mut self, criterion: Criterion, value: f64) {
        match criterion {
            Criterion::Cost => self.cost = value,
            Criterion::Time => self.time = value,
            Criterion::Reliability => self.reliability = value,
            Criterion::Risk => self.risk = value,
            Criterion::Experience => self.experience = Some(value),
        }
    }
}

fn validate_weight(criterion: Criterion, value: f64) -> Result<(), DomainError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(DomainError::InvalidWeight { criterion, value })
    }
}

/// Weights plus the emergency flag, the full input of one ranking run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingConfig {
    pub weights: WeightVector,
    #[serde(default)]
    pub emergency_mode: bool,
}

impl RankingConfig {
    pub const fn new(weights: WeightVector, emergency_mode: bool) -> Self {
        Self { weights, emergency_mode }
    }

    /// Non-fatal findings about this configuration on the aggregator path.
    pub fn warnings(&self) -> Vec<ConfigurationWarning> {
        let mut warnings = Vec::new();
        if !self.weights.sums_to_one() {
            warnings.push(ConfigurationWarning::WeightSumDrift { sum: self.weights.total() });
        }
        warnings
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        RankingPreset::Default.config()
    }
}

impl From<RankingPreset> for RankingConfig {
    fn from(preset: RankingPreset) -> Self {
        preset.config()
    }
}

/// Tolerated deviation. The aggregator does not rescale weights; only
/// [`WeightVector::set_weight`] renormalizes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigurationWarning {
    WeightSumDrift { sum: f64 },
}

impl ConfigurationWarning {
    pub fn code(&self) -> &'static str {
        match self {
            Self::WeightSumDrift { .. } => "weight_sum_drift",
        }
    }
}

impl fmt::Display for ConfigurationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WeightSumDrift { sum } => {
                write!(f, "weights sum to {sum:.6} instead of 1; scores are not rescaled")
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RankingPreset {
    CostOptimized,
    TimeOptimized,
    Emergency,
    Balanced,
    Default,
}

impl RankingPreset {
    pub const ALL: [RankingPreset; 5] = [
        RankingPreset::CostOptimized,
        RankingPreset::TimeOptimized,
        RankingPreset::Emergency,
        RankingPreset::Balanced,
        RankingPreset::Default,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::CostOptimized => "costOptimized",
            Self::TimeOptimized => "timeOptimized",
            Self::Emergency => "emergency",
            Self::Balanced => "balanced",
            Self::Default => "default",
        }
    }

    pub const fn config(self) -> RankingConfig {
        match self {
            Self::CostOptimized => RankingConfig::new(WeightVector::new(0.50, 0.20, 0.20, 0.10), false),
            Self::TimeOptimized => RankingConfig::new(WeightVector::new(0.20, 0.50, 0.20, 0.10), false),
            Self::Emergency => RankingConfig::new(WeightVector::new(0.15, 0.40, 0.30, 0.15), true),
            Self::Balanced => RankingConfig::new(WeightVector::new(0.25, 0.25, 0.25, 0.25), false),
            Self::Default => RankingConfig::new(WeightVector::new(0.35, 0.25, 0.25, 0.15), false),
        }
    }
}

impl fmt::Display for RankingPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RankingPreset {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String =
            value.trim().chars().filter(|ch| *ch != '_' && *ch != '-').collect();
        match normalized.to_ascii_lowercase().as_str() {
            "costoptimized" => Ok(Self::CostOptimized),
            "timeoptimized" => Ok(Self::TimeOptimized),
            "emergency" => Ok(Self::Emergency),
            "balanced" => Ok(Self::Balanced),
            "default" => Ok(Self::Default),
            _ => Err(DomainError::UnknownPreset(value.trim().to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigurationWarning, Criterion, RankingConfig, RankingPreset, WeightVector};
    use crate::errors::DomainError;

    #[test]
    fn presets_match_published_table() {
        let table = [
            (RankingPreset::CostOptimized, [0.50, 0.20, 0.20, 0.10], false),
            (RankingPreset::TimeOptimized, [0.20, 0.50, 0.20, 0.10], false),
            (RankingPreset::Emergency, [0.15, 0.40, 0.30, 0.15], true),
            (RankingPreset::Balanced, [0.25, 0.25, 0.25, 0.25], false),
            (RankingPreset::Default, [0.35, 0.25, 0.25, 0.15], false),
        ];

        for (preset, weights, emergency_mode) in table {
            let config = preset.config();
            assert_eq!(config.weights.scored(), weights, "{preset} weights");
            assert_eq!(config.emergency_mode, emergency_mode, "{preset} emergency flag");
            assert!(config.weights.experience.is_none());
        }
    }

    #[test]
    fn preset_keys_round_trip_through_from_str() {
        for preset in RankingPreset::ALL {
            assert_eq!(preset.key().parse::<RankingPreset>(), Ok(preset));
        }
        assert_eq!("cost_optimized".parse::<RankingPreset>(), Ok(RankingPreset::CostOptimized));
        assert!(matches!(
            "fastest".parse::<RankingPreset>(),
            Err(DomainError::UnknownPreset(ref name)) if name == "fastest"
        ));
    }

    #[test]
    fn set_weight_renormalizes_to_one() {
        let mut weights = RankingPreset::Default.config().weights;
        weights.set_weight(Criterion::Cost, 0.80).expect("valid weight");

        assert!((weights.total() - 1.0).abs() < 1e-9);
        // 0.80 / (0.80 + 0.25 + 0.25 + 0.15)
        assert!((weights.cost - 0.80 / 1.45).abs() < 1e-12);
        assert!((weights.risk - 0.15 / 1.45).abs() < 1e-12);
    }

    #[test]
    fn set_weight_includes_experience_in_total() {
        let mut weights = WeightVector::new(0.2, 0.2, 0.2, 0.2).with_experience(0.2);
        weights.set_weight(Criterion::Experience, 0.6).expect("valid weight");

        assert!((weights.total() - 1.0).abs() < 1e-9);
        let experience = weights.experience.expect("experience stays present");
        assert!((experience - 0.6 / 1.4).abs() < 1e-12);
    }

    #[test]
    fn set_weight_with_zero_total_leaves_weights_unrescaled() {
        let mut weights = WeightVector::new(0.0, 0.0, 0.0, 0.3);
        weights.set_weight(Criterion::Risk, 0.0).expect("valid weight");

        assert_eq!(weights, WeightVector::new(0.0, 0.0, 0.0, 0.0));
        assert!(weights.scored().iter().all(|value| value.is_finite()));
    }

    #[test]
    fn set_weight_rejects_out_of_range_values() {
        let mut weights = RankingPreset::Balanced.config().weights;
        let error = weights.set_weight(Criterion::Time, 1.5).expect_err("out of range");

        assert_eq!(error, DomainError::InvalidWeight { criterion: Criterion::Time, value: 1.5 });
        assert_eq!(weights, RankingPreset::Balanced.config().weights);
    }

    #[test]
    fn from_entries_requires_at_least_one_entry() {
        assert_eq!(WeightVector::from_entries(Vec::new()), Err(DomainError::EmptyWeightVector));

        let weights = WeightVector::from_entries([(Criterion::Reliability, 1.0)])
            .expect("single entry is valid");
        assert_eq!(weights.scored(), [0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn drifting_weights_raise_a_warning_but_presets_do_not() {
        for preset in RankingPreset::ALL {
            assert!(preset.config().warnings().is_empty(), "{preset} should sum to one");
        }

        let config = RankingConfig::new(WeightVector::new(0.5, 0.5, 0.5, 0.0), false);
        let warnings = config.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], ConfigurationWarning::WeightSumDrift { sum } if (sum - 1.5).abs() < 1e-12));
    }

    #[test]
    fn criterion_parses_case_insensitively() {
        assert_eq!(" Reliability ".parse::<Criterion>(), Ok(Criterion::Reliability));
        assert!("price".parse::<Criterion>().is_err());
    }
}
