//! Per-candidate scoring strategies
//!
//! The aggregator produces the dynamic score, the neutrosophic scorer the
//! normalized inverse-utility score, and the closeness module the geometric
//! TOPSIS variant. AHP derives weight vectors from pairwise judgments.

pub mod ahp;
pub mod aggregate;
pub mod neutrosophic;
pub mod rate;
pub mod topsis;

pub use ahp::{default_freight_judgments, AhpWeights, NeutrosophicAhp, PairwiseMatrix, Tnn};
pub use aggregate::{DynamicScoreBreakdown, WeightedAggregator};
pub use neutrosophic::{NeutrosophicAssessment, NeutrosophicScorer};
pub use rate::{MarketRateSimulator, RateSource};
pub use topsis::{ClosenessAssessment, ClosenessTopsis};

/// Cost per kg at or above which the dynamic cost utility is zero.
pub const COST_CEILING_PER_KG: f64 = 10.0;

/// Transit days at or above which the dynamic time utility is zero.
pub const TRANSIT_CEILING_DAYS: f64 = 14.0;

/// Added to the normalized score before clamping it into a truth value.
pub const TRUTH_LIFT: f64 = 0.1;

/// Exclusive upper bound of the indeterminacy jitter.
pub const INDETERMINACY_CEILING: f64 = 0.2;
