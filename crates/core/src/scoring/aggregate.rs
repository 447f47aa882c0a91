//! Dynamic ranking score: capped utilities combined by pre-normalized weights.

use serde::Serialize;

use crate::domain::carrier::CarrierProfile;
use crate::domain::rate::SimulatedRate;
use crate::domain::weights::WeightVector;

use super::{COST_CEILING_PER_KG, TRANSIT_CEILING_DAYS};

/// Per-criterion utilities behind one dynamic score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct DynamicScoreBreakdown {
    pub cost_score: f64,
    pub time_score: f64,
    pub reliability_score: f64,
    /// Fed by the carrier's success rate and weighted by the `risk` weight.
    pub risk_score: f64,
    pub weighted_sum: f64,
    pub emergency_bonus: f64,
    pub dynamic_score: f64,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct WeightedAggregator;

impl WeightedAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Final score in [0, 1]. Weights are applied as given; a vector that does
    /// not sum to one is tolerated rather than rescaled.
    pub fn aggregate(
        &self,
        carrier: &CarrierProfile,
        rate: Option<&SimulatedRate>,
        weights: &WeightVector,
        emergency_mode: bool,
    ) -> f64 {
        self.breakdown(carrier, rate, weights, emergency_mode).dynamic_score
    }

    pub fn breakdown(
        &self,
        carrier: &CarrierProfile,
        rate: Option<&SimulatedRate>,
        weights: &WeightVector,
        emergency_mode: bool,
    ) -> DynamicScoreBreakdown {
        let effective_cost =
            rate.and_then(SimulatedRate::total_rate_f64).unwrap_or(carrier.avg_cost_per_kg);

        let cost_score = (1.0 - effective_cost / COST_CEILING_PER_KG).max(0.0);
        let time_score = (1.0 - carrier.avg_transit_days / TRANSIT_CEILING_DAYS).max(0.0);
        let reliability_score = carrier.reliability_score / 100.0;
        let risk_score = carrier.success_rate / 100.0;

        let weighted_sum = cost_score * weights.cost
            + time_score * weights.time
            + reliability_score * weights.reliability
            + risk_score * weights.risk;

        let emergency_bonus =
            if emergency_mode { carrier.emergency_grade.emergency_bonus() } else { 0.0 };

        DynamicScoreBreakdown {
            cost_score,
            time_score,
            reliability_score,
            risk_score,
            weighted_sum,
            emergency_bonus,
            dynamic_score: (weighted_sum + emergency_bonus).clamp(0.0, 1.0),
        }
    }
}
