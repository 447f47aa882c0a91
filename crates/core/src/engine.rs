use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::carrier::CarrierProfile;
use crate::domain::ranking::{CandidateScore, RankedCandidate, ScoringStrategy};
use crate::domain::rate::SimulatedRate;
use crate::domain::weights::RankingConfig;
use crate::errors::DomainError;
use crate::scoring::{
    ClosenessTopsis, MarketRateSimulator, NeutrosophicScorer, RateSource, WeightedAggregator,
};

#[derive(Clone, Copy, Debug)]
pub struct RankingInput<'a> {
    pub carriers: &'a [CarrierProfile],
    pub config: &'a RankingConfig,
    pub strategy: ScoringStrategy,
}

/// Enriches candidates with a simulated rate, scores them with the selected
/// strategy and orders them best first.
pub struct RankingEngine<S = MarketRateSimulator> {
    rate_source: S,
    aggregator: WeightedAggregator,
    scorer: NeutrosophicScorer,
    closeness: ClosenessTopsis,
}

impl RankingEngine<MarketRateSimulator> {
    pub fn new() -> Self {
        Self::with_rate_source(MarketRateSimulator::new())
    }
}

impl Default for RankingEngine<MarketRateSimulator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RateSource> RankingEngine<S> {
    pub fn with_rate_source(rate_source: S) -> Self {
        Self {
            rate_source,
            aggregator: WeightedAggregator::new(),
            scorer: NeutrosophicScorer::new(),
            closeness: ClosenessTopsis::new(),
        }
    }

    /// Ranks with fresh entropy; two calls on the same input may differ.
    pub fn rank(&self, input: RankingInput<'_>) -> Result<Vec<RankedCandidate>, DomainError> {
        let mut rng = StdRng::from_entropy();
        self.rank_with_rng(input, &mut rng, Utc::now())
    }

    /// Scores and rates are reproducible for a given seed. `validUntil` still
    /// follows the wall clock.
    pub fn rank_seeded(
        &self,
        input: RankingInput<'_>,
        seed: u64,
    ) -> Result<Vec<RankedCandidate>, DomainError> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.rank_with_rng(input, &mut rng, Utc::now())
    }

    /// Rate draws happen first, one per carrier in input order, followed by
    /// the indeterminacy draws of the neutrosophic strategy.
    pub fn rank_with_rng<R: Rng + ?Sized>(
        &self,
        input: RankingInput<'_>,
        rng: &mut R,
        issued_at: DateTime<Utc>,
    ) -> Result<Vec<RankedCandidate>, DomainError> {
        if input.carriers.is_empty() {
            return Ok(Vec::new());
        }

        let correlation_id = Uuid::new_v4().to_string();
        info!(
            event_name = "ranking.run.started",
            correlation_id = %correlation_id,
            strategy = %input.strategy,
            candidate_count = input.carriers.len(),
            emergency_mode = input.config.emergency_mode,
            "ranking run started"
        );

        input.config.weights.validate()?;
        for carrier in input.carriers {
            if let Err(error) = carrier.validate() {
                warn!(
                    event_name = "ranking.candidate.rejected",
                    correlation_id = %correlation_id,
                    carrier = %carrier.name,
                    error_code = error.code(),
                    "candidate rejected; failing the whole run: {error}"
                );
                return Err(error);
            }
        }

        if input.strategy == ScoringStrategy::Dynamic {
            for warning in input.config.warnings() {
                warn!(
                    event_name = "ranking.config.weight_sum_drift",
                    correlation_id = %correlation_id,
                    warning_code = warning.code(),
                    "{warning}"
                );
            }
        }

        let rates: Vec<SimulatedRate> = input
            .carriers
            .iter()
            .map(|carrier| self.rate_source.quote(carrier, rng, issued_at))
            .collect();

        let scores = self.score(&input, &rates, rng)?;

        let mut scored: Vec<(usize, CandidateScore)> = scores.into_iter().enumerate().collect();
        scored.sort_by(|a, b| b.1.ranking_value().total_cmp(&a.1.ranking_value()));

        let ranked: Vec<RankedCandidate> = scored
            .into_iter()
            .enumerate()
            .map(|(position, (index, score))| RankedCandidate {
                carrier: input.carriers[index].clone(),
                simulated_rate: rates[index].clone(),
                score,
                rank_position: u32::try_from(position + 1).unwrap_or(u32::MAX),
            })
            .collect();

        info!(
            event_name = "ranking.run.completed",
            correlation_id = %correlation_id,
            strategy = %input.strategy,
            top_carrier = ranked.first().map(|c| c.carrier.name.as_str()).unwrap_or_default(),
            top_score = ranked.first().map(|c| c.score.ranking_value()).unwrap_or_default(),
            "ranking run completed"
        );

        Ok(ranked)
    }

    fn score<R: Rng + ?Sized>(
        &self,
        input: &RankingInput<'_>,
        rates: &[SimulatedRate],
        rng: &mut R,
    ) -> Result<Vec<CandidateScore>, DomainError> {
        let weights = &input.config.weights;

        match input.strategy {
            ScoringStrategy::Dynamic => Ok(input
                .carriers
                .iter()
                .zip(rates)
                .map(|(carrier, rate)| CandidateScore::Dynamic {
                    dynamic_score: self.aggregator.aggregate(
                        carrier,
                        Some(rate),
                        weights,
                        input.config.emergency_mode,
                    ),
                })
                .collect()),
            ScoringStrategy::NeutrosophicTopsis => input
                .carriers
                .iter()
                .map(|carrier| {
                    let assessment = self.scorer.score(carrier, weights, rng)?;
                    Ok(CandidateScore::NeutrosophicTopsis {
                        normalized_score: assessment.normalized_score,
                        neutrosophic: assessment.triple,
                    })
                })
                .collect(),
            ScoringStrategy::ClosenessTopsis => Ok(self
                .closeness
                .assess(input.carriers, weights)?
                .into_iter()
                .map(|assessment| CandidateScore::ClosenessTopsis {
                    closeness: assessment.closeness,
                    neutrosophic: assessment.triple,
                })
                .collect()),
        }
    }
}
