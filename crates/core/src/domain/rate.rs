use chrono::{DateTime, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const RATE_CURRENCY: &str = "USD";

pub const FUEL_SURCHARGE_RATIO: f64 = 0.15;
pub const SECURITY_FEE_RATIO: f64 = 0.05;
pub const HANDLING_FEE_RATIO: f64 = 0.08;
pub const CUSTOMS_FEE_RATIO: f64 = 0.12;
pub const INSURANCE_RATIO: f64 = 0.03;
/// One plus every line-item ratio.
pub const TOTAL_RATE_MULTIPLIER: f64 = 1.43;

/// Point-in-time synthetic quote for one carrier, per kilogram.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedRate {
    pub base_rate: Decimal,
    pub fuel_surcharge: Decimal,
    pub security_fee: Decimal,
    pub handling_fee: Decimal,
    pub customs_fee: Decimal,
    pub insurance_rate: Decimal,
    pub total_rate: Decimal,
    pub valid_until: DateTime<Utc>,
    pub currency: String,
}

impl SimulatedRate {
    /// Derives every line item from the unrounded base rate. Each amount is
    /// rounded on its own; `total_rate` is `round(base * 1.43, 2)` and is not
    /// reconciled with the rounded line items.
    pub fn from_base_rate(raw_base_rate: f64, valid_until: DateTime<Utc>) -> Self {
        Self {
            base_rate: money(raw_base_rate),
            fuel_surcharge: money(raw_base_rate * FUEL_SURCHARGE_RATIO),
            security_fee: money(raw_base_rate * SECURITY_FEE_RATIO),
            handling_fee: money(raw_base_rate * HANDLING_FEE_RATIO),
            customs_fee: money(raw_base_rate * CUSTOMS_FEE_RATIO),
            insurance_rate: money(raw_base_rate * INSURANCE_RATIO),
            total_rate: money(raw_base_rate * TOTAL_RATE_MULTIPLIER),
            valid_until,
            currency: RATE_CURRENCY.to_owned(),
        }
    }

    pub fn line_item_sum(&self) -> Decimal {
        self.base_rate
            + self.fuel_surcharge
            + self.security_fee
            + self.handling_fee
            + self.customs_fee
            + self.insurance_rate
    }

    /// Accepted difference between `total_rate` and the sum of rounded line items.
    pub fn rounding_drift(&self) -> Decimal {
        self.total_rate - self.line_item_sum()
    }

    pub fn total_rate_f64(&self) -> Option<f64> {
        self.total_rate.to_f64()
    }

    pub fn is_valid_at(&self, instant: DateTime<Utc>) -> bool {
        instant < self.valid_until
    }
}

/// Rounds to cents, half away from zero. Input that `Decimal` cannot hold
/// (non-finite, or a cost above `MAX_COST_PER_KG`) only comes from an
/// unvalidated profile and yields zero.
fn money(amount: f64) -> Decimal {
    let cents = (amount * 100.0).round() / 100.0;
    Decimal::from_f64(cents).map(|value| value.round_dp(2)).unwrap_or(Decimal::ZERO)
}
