pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod scoring;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use domain::carrier::{CarrierProfile, EmergencyGrade};
pub use domain::ranking::{CandidateScore, NeutrosophicTriple, RankedCandidate, ScoringStrategy};
pub use domain::rate::SimulatedRate;
pub use domain::weights::{
    ConfigurationWarning, Criterion, RankingConfig, RankingPreset, WeightVector,
};
pub use engine::{RankingEngine, RankingInput};
pub use errors::{ApplicationError, DomainError};
pub use scoring::{
    ClosenessTopsis, MarketRateSimulator, NeutrosophicAhp, NeutrosophicScorer, RateSource,
    WeightedAggregator,
};
