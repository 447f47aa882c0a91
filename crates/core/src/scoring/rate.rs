use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::domain::carrier::CarrierProfile;
use crate::domain::rate::SimulatedRate;

/// Produces the current quote used to enrich a candidate before scoring.
pub trait RateSource: Send + Sync {
    fn quote<R: Rng + ?Sized>(
        &self,
        carrier: &CarrierProfile,
        rng: &mut R,
        issued_at: DateTime<Utc>,
    ) -> SimulatedRate;
}

/// Synthesizes a multi-component rate around a carrier's historical cost.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarketRateSimulator {
    variation: f64,
    validity: Duration,
}

impl MarketRateSimulator {
    pub const DEFAULT_VARIATION: f64 = 0.10;
    pub const DEFAULT_VALIDITY_HOURS: i64 = 24;

    pub fn new() -> Self {
        Self {
            variation: Self::DEFAULT_VARIATION,
            validity: Duration::hours(Self::DEFAULT_VALIDITY_HOURS),
        }
    }

    pub fn simulate<R: Rng + ?Sized>(&self, carrier: &CarrierProfile, rng: &mut R) -> SimulatedRate {
        self.simulate_at(carrier, rng, Utc::now())
    }

    /// One uniform draw in `[-variation, variation]` scales the historical cost.
    pub fn simulate_at<R: Rng + ?Sized>(
        &self,
        carrier: &CarrierProfile,
        rng: &mut R,
        issued_at: DateTime<Utc>,
    ) -> SimulatedRate {
        let variation = rng.gen_range(-self.variation..=self.variation);
        let raw_base_rate = carrier.avg_cost_per_kg * (1.0 + variation);

        SimulatedRate::from_base_rate(raw_base_rate, issued_at + self.validity)
    }
}

impl Default for MarketRateSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl RateSource for MarketRateSimulator {
    fn quote<R: Rng + ?Sized>(
        &self,
        carrier: &CarrierProfile,
        rng: &mut R,
        issued_at: DateTime<Utc>,
    ) -> SimulatedRate {
        self.simulate_at(carrier, rng, issued_at)
    }
}
