//! Distance-to-ideal TOPSIS over a whole candidate set.
//!
//! Unlike the per-candidate scorers, closeness depends on every other
//! candidate in the run: columns are vector-normalized across the set before
//! the ideal and anti-ideal points are chosen.

use crate::domain::carrier::CarrierProfile;
use crate::domain::ranking::NeutrosophicTriple;
use crate::domain::weights::WeightVector;
use crate::errors::DomainError;

/// Closeness returned when a candidate is equally far from both reference points.
pub const NEUTRAL_CLOSENESS: f64 = 0.5;

const INDETERMINACY_FACTOR: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClosenessAssessment {
    pub closeness: f64,
    pub distance_to_ideal: f64,
    pub distance_to_anti_ideal: f64,
    pub triple: NeutrosophicTriple,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ClosenessTopsis;

impl ClosenessTopsis {
    /// Columns in cost, time, reliability, risk order; only reliability is a benefit.
    const BENEFIT: [bool; 4] = [false, false, true, false];

    pub fn new() -> Self {
        Self
    }

    /// One assessment per carrier, in input order.
    pub fn assess(
        &self,
        carriers: &[CarrierProfile],
        weights: &WeightVector,
    ) -> Result<Vec<ClosenessAssessment>, DomainError> {
        weights.validate()?;
        if weights.scored_total() <= 0.0 {
            return Err(DomainError::ZeroWeightTotal);
        }
        for carrier in carriers {
            carrier.validate()?;
        }
        if carriers.is_empty() {
            return Ok(Vec::new());
        }

        let matrix: Vec<[f64; 4]> = carriers.iter().map(decision_row).collect();
        let mut norms = [0.0_f64; 4];
        for row in &matrix {
            for (norm, value) in norms.iter_mut().zip(row) {
                *norm += value * value;
            }
        }
        let norms = norms.map(f64::sqrt);
        let column_weights = weights.scored();

        let weighted: Vec<[f64; 4]> = matrix
            .iter()
            .map(|row| {
                let mut out = [0.0; 4];
                for column in 0..4 {
                    let normalized =
                        if norms[column] > 0.0 { row[column] / norms[column] } else { 0.0 };
                    out[column] = normalized * column_weights[column];
                }
                out
            })
            .collect();

        let mut ideal = [0.0; 4];
        let mut anti_ideal = [0.0; 4];
        for column in 0..4 {
            let (min, max) = weighted.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |acc, row| {
                (acc.0.min(row[column]), acc.1.max(row[column]))
            });
            if Self::BENEFIT[column] {
                ideal[column] = max;
                anti_ideal[column] = min;
            } else {
                ideal[column] = min;
                anti_ideal[column] = max;
            }
        }

        Ok(carriers
            .iter()
            .zip(&weighted)
            .map(|(carrier, row)| {
                let distance_to_ideal = euclidean(row, &ideal);
                let distance_to_anti_ideal = euclidean(row, &anti_ideal);
                let spread = distance_to_ideal + distance_to_anti_ideal;
                let closeness = if spread > 0.0 {
                    distance_to_anti_ideal / spread
                } else {
                    NEUTRAL_CLOSENESS
                };

                ClosenessAssessment {
                    closeness,
                    distance_to_ideal,
                    distance_to_anti_ideal,
                    triple: triple(carrier, closeness),
                }
            })
            .collect())
    }
}

fn decision_row(carrier: &CarrierProfile) -> [f64; 4] {
    [
        carrier.avg_cost_per_kg,
        carrier.avg_transit_days,
        carrier.reliability_score,
        carrier.risk_level,
    ]
}

fn euclidean(a: &[f64; 4], b: &[f64; 4]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt()
}

fn triple(carrier: &CarrierProfile, closeness: f64) -> NeutrosophicTriple {
    let truth = (carrier.reliability_score / 100.0).min(closeness);
    let falsehood = (carrier.risk_level / 100.0).max(1.0 - closeness);
    let indeterminacy = (truth - falsehood).abs() * INDETERMINACY_FACTOR;

    NeutrosophicTriple::new(truth, indeterminacy, falsehood)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{ClosenessTopsis, NEUTRAL_CLOSENESS};
    use crate::domain::carrier::{CarrierProfile, EmergencyGrade};
    use crate::domain::weights::{RankingPreset, WeightVector};
    use crate::errors::DomainError;

    fn carrier(name: &str, cost: f64, transit: f64, reliability: f64, risk: f64) -> CarrierProfile {
        CarrierProfile {
            name: name.to_owned(),
            avg_cost_per_kg: cost,
            avg_transit_days: transit,
            reliability_score: reliability,
            success_rate: 90.0,
            risk_level: risk,
            emergency_grade: EmergencyGrade::Standard,
        }
    }

    #[test]
    fn dominant_carrier_sits_on_the_ideal_point() {
        let carriers = vec![
            carrier("best", 2.0, 3.0, 95.0, 1.0),
            carrier("worst", 6.0, 9.0, 60.0, 4.0),
        ];
        let assessments = ClosenessTopsis::new()
            .assess(&carriers, &RankingPreset::Balanced.config().weights)
            .expect("valid input");

        assert_eq!(assessments.len(), 2);
        assert!(assessments[0].distance_to_ideal.abs() < 1e-12);
        assert!((assessments[0].closeness - 1.0).abs() < 1e-12);
        assert!(assessments[1].closeness.abs() < 1e-12);
    }

    #[test]
    fn identical_candidates_get_neutral_closeness() {
        let carriers = vec![carrier("a", 3.0, 5.0, 80.0, 2.0), carrier("b", 3.0, 5.0, 80.0, 2.0)];
        let assessments = ClosenessTopsis::new()
            .assess(&carriers, &RankingPreset::Default.config().weights)
            .expect("valid input");

        assert!(assessments.iter().all(|a| a.closeness == NEUTRAL_CLOSENESS));
    }

    #[test]
    fn triple_blends_closeness_with_reliability_and_risk() {
        let carriers = vec![
            carrier("best", 2.0, 3.0, 95.0, 1.0),
            carrier("worst", 6.0, 9.0, 60.0, 4.0),
        ];
        let assessments = ClosenessTopsis::new()
            .assess(&carriers, &RankingPreset::Balanced.config().weights)
            .expect("valid input");

        let best = assessments[0].triple;
        assert!((best.truth - 0.95).abs() < 1e-12);
        assert!((best.falsehood - 0.01).abs() < 1e-12);
        assert!((best.indeterminacy - 0.094).abs() < 1e-12);

        let worst = assessments[1].triple;
        assert_eq!(worst.truth, 0.0);
        assert!((worst.falsehood - 1.0).abs() < 1e-12);
        assert!((worst.crisp_score + 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_weight_total_is_rejected() {
        let carriers = vec![carrier("a", 3.0, 5.0, 80.0, 2.0)];
        let error = ClosenessTopsis::new()
            .assess(&carriers, &WeightVector::new(0.0, 0.0, 0.0, 0.0))
            .expect_err("zero weights");

        assert_eq!(error, DomainError::ZeroWeightTotal);
    }

    #[test]
    fn empty_set_yields_no_assessments() {
        let assessments = ClosenessTopsis::new()
            .assess(&[], &RankingPreset::Default.config().weights)
            .expect("empty is valid");
        assert!(assessments.is_empty());
    }

    proptest! {
        #[test]
        fn closeness_stays_in_unit_interval(
            rows in proptest::collection::vec(
                (0.1f64..20.0, 0.5f64..30.0, 0.0f64..=100.0, 0.1f64..10.0),
                1..8,
            ),
        ) {
            let carriers: Vec<CarrierProfile> = rows
                .iter()
                .enumerate()
                .map(|(index, (cost, transit, reliability, risk))| {
                    carrier(&format!("c{index}"), *cost, *transit, *reliability, *risk)
                })
                .collect();
            let assessments = ClosenessTopsis::new()
                .assess(&carriers, &RankingPreset::Default.config().weights)
                .expect("valid input");

            prop_assert_eq!(assessments.len(), carriers.len());
            for assessment in assessments {
                prop_assert!((0.0..=1.0).contains(&assessment.closeness));
                prop_assert!(assessment.triple.indeterminacy >= 0.0);
            }
        }
    }
}
