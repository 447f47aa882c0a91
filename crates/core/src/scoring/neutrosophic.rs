//! Normalized inverse-utility score with a jittered neutrosophic triple.

use rand::Rng;

use crate::domain::carrier::CarrierProfile;
use crate::domain::ranking::NeutrosophicTriple;
use crate::domain::weights::WeightVector;
use crate::errors::DomainError;

use super::{INDETERMINACY_CEILING, TRUTH_LIFT};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NeutrosophicAssessment {
    /// Weighted inverse utility divided by the scored weight total. Sort key.
    pub normalized_score: f64,
    pub triple: NeutrosophicTriple,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NeutrosophicScorer;

impl NeutrosophicScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score<R: Rng + ?Sized>(
        &self,
        carrier: &CarrierProfile,
        weights: &WeightVector,
        rng: &mut R,
    ) -> Result<NeutrosophicAssessment, DomainError> {
        let normalized_score = self.normalized_score(carrier, weights)?;
        let indeterminacy = rng.gen_range(0.0..INDETERMINACY_CEILING);

        Ok(NeutrosophicAssessment {
            normalized_score,
            triple: self.triple(normalized_score, indeterminacy),
        })
    }

    /// `Σ wᵢ·uᵢ / Σ wᵢ` over cost, time, reliability and risk, where cost, time
    /// and risk utilities are reciprocals of the raw metric.
    pub fn normalized_score(
        &self,
        carrier: &CarrierProfile,
        weights: &WeightVector,
    ) -> Result<f64, DomainError> {
        carrier.validate()?;
        weights.validate()?;

        let total_weight = weights.scored_total();
        if total_weight <= 0.0 {
            return Err(DomainError::ZeroWeightTotal);
        }

        let utilities = [
            1.0 / carrier.avg_cost_per_kg,
            1.0 / carrier.avg_transit_days,
            carrier.reliability_score / 100.0,
            1.0 / carrier.risk_level,
        ];
        let weighted: f64 =
            utilities.iter().zip(weights.scored()).map(|(utility, weight)| utility * weight).sum();

        Ok(weighted / total_weight)
    }

    /// Truth is the lifted score clamped to [0, 1]; falsehood takes what is
    /// left after truth and indeterminacy, floored at zero.
    pub fn triple(&self, normalized_score: f64, indeterminacy: f64) -> NeutrosophicTriple {
        let truth = (normalized_score + TRUTH_LIFT).clamp(0.0, 1.0);
        let falsehood = (1.0 - truth - indeterminacy).max(0.0);

        NeutrosophicTriple::new(truth, indeterminacy, falsehood)
    }
}
