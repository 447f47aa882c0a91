use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::carrier::CarrierProfile;
use crate::domain::rate::SimulatedRate;
use crate::errors::DomainError;

/// Independently selectable scoring strategies over the same candidate set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringStrategy {
    /// Weighted aggregate of capped utilities with an emergency bonus.
    #[default]
    Dynamic,
    /// Weighted inverse utilities normalized by the weight total, with a
    /// jittered neutrosophic triple.
    NeutrosophicTopsis,
    /// Distance-to-ideal TOPSIS over the whole candidate set.
    ClosenessTopsis,
}

impl ScoringStrategy {
    pub const ALL: [ScoringStrategy; 3] = [
        ScoringStrategy::Dynamic,
        ScoringStrategy::NeutrosophicTopsis,
        ScoringStrategy::ClosenessTopsis,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dynamic => "dynamic",
            Self::NeutrosophicTopsis => "neutrosophic_topsis",
            Self::ClosenessTopsis => "closeness_topsis",
        }
    }
}

impl fmt::Display for ScoringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoringStrategy {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "dynamic" => Ok(Self::Dynamic),
            "neutrosophic" | "neutrosophic_topsis" => Ok(Self::NeutrosophicTopsis),
            "closeness" | "closeness_topsis" | "topsis" => Ok(Self::ClosenessTopsis),
            _ => Err(DomainError::UnknownStrategy(value.trim().to_owned())),
        }
    }
}

/// Truth / indeterminacy / falsehood judgment about one candidate.
///
/// The components are not forced to sum to one: falsehood absorbs the
/// remainder only down to zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeutrosophicTriple {
    pub truth: f64,
    pub indeterminacy: f64,
    pub falsehood: f64,
    /// `truth - falsehood`, signed.
    pub crisp_score: f64,
}

impl NeutrosophicTriple {
    pub fn new(truth: f64, indeterminacy: f64, falsehood: f64) -> Self {
        Self { truth, indeterminacy, falsehood, crisp_score: truth - falsehood }
    }

    pub fn component_sum(&self) -> f64 {
        self.truth + self.indeterminacy + self.falsehood
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum CandidateScore {
    Dynamic { dynamic_score: f64 },
    NeutrosophicTopsis { normalized_score: f64, neutrosophic: NeutrosophicTriple },
    ClosenessTopsis { closeness: f64, neutrosophic: NeutrosophicTriple },
}

impl CandidateScore {
    /// The value the ranking sorts on, descending.
    pub fn ranking_value(&self) -> f64 {
        match self {
            Self::Dynamic { dynamic_score } => *dynamic_score,
            Self::NeutrosophicTopsis { normalized_score, .. } => *normalized_score,
            Self::ClosenessTopsis { closeness, .. } => *closeness,
        }
    }

    pub fn dynamic_score(&self) -> Option<f64> {
        match self {
            Self::Dynamic { dynamic_score } => Some(*dynamic_score),
            _ => None,
        }
    }

    pub fn neutrosophic(&self) -> Option<&NeutrosophicTriple> {
        match self {
            Self::Dynamic { .. } => None,
            Self::NeutrosophicTopsis { neutrosophic, .. }
            | Self::ClosenessTopsis { neutrosophic, .. } => Some(neutrosophic),
        }
    }

    pub fn crisp_score(&self) -> Option<f64> {
        self.neutrosophic().map(|triple| triple.crisp_score)
    }

    pub fn strategy(&self) -> ScoringStrategy {
        match self {
            Self::Dynamic { .. } => ScoringStrategy::Dynamic,
            Self::NeutrosophicTopsis { .. } => ScoringStrategy::NeutrosophicTopsis,
            Self::ClosenessTopsis { .. } => ScoringStrategy::ClosenessTopsis,
        }
    }
}

/// Output record: the caller's profile plus everything the run derived.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCandidate {
    #[serde(flatten)]
    pub carrier: CarrierProfile,
    pub simulated_rate: SimulatedRate,
    pub score: CandidateScore,
    /// 1-based, dense, unique.
    pub rank_position: u32,
}

#[cfg(test)]
mod tests {
    use super::{CandidateScore, NeutrosophicTriple, ScoringStrategy};

    #[test]
    fn crisp_score_is_truth_minus_falsehood() {
        let triple = NeutrosophicTriple::new(0.9, 0.15, 0.0);

        assert_eq!(triple.crisp_score, 0.9);
        assert!((triple.component_sum() - 1.05).abs() < 1e-12);
    }

    #[test]
    fn ranking_value_follows_strategy() {
        let triple = NeutrosophicTriple::new(0.7, 0.1, 0.2);

        let dynamic = CandidateScore::Dynamic { dynamic_score: 0.42 };
        let neutrosophic =
            CandidateScore::NeutrosophicTopsis { normalized_score: 0.6, neutrosophic: triple };
        let closeness = CandidateScore::ClosenessTopsis { closeness: 0.8, neutrosophic: triple };

        assert_eq!(dynamic.ranking_value(), 0.42);
        assert_eq!(neutrosophic.ranking_value(), 0.6);
        assert_eq!(closeness.ranking_value(), 0.8);
        assert_eq!(dynamic.crisp_score(), None);
        assert_eq!(neutrosophic.dynamic_score(), None);
        assert!((closeness.crisp_score().unwrap_or_default() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn score_serializes_with_strategy_tag() {
        let score = CandidateScore::NeutrosophicTopsis {
            normalized_score: 0.5,
            neutrosophic: NeutrosophicTriple::new(0.6, 0.1, 0.3),
        };
        let json = serde_json::to_value(score).expect("score serializes");

        assert_eq!(json["strategy"], "neutrosophic_topsis");
        assert_eq!(json["normalizedScore"], 0.5);
        assert_eq!(json["neutrosophic"]["crispScore"], 0.3);
    }

    #[test]
    fn strategy_parses_aliases() {
        assert_eq!("neutrosophic".parse::<ScoringStrategy>(), Ok(ScoringStrategy::NeutrosophicTopsis));
        assert_eq!("closeness-topsis".parse::<ScoringStrategy>(), Ok(ScoringStrategy::ClosenessTopsis));
        assert_eq!("Dynamic".parse::<ScoringStrategy>(), Ok(ScoringStrategy::Dynamic));
        assert!("ahp".parse::<ScoringStrategy>().is_err());
    }
}
