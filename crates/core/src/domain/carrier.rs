use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Largest accepted historical cost. Quotes drawn around it still fit a
/// cents-precision `Decimal`.
pub const MAX_COST_PER_KG: f64 = 1.0e12;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmergencyGrade {
    Critical,
    Priority,
    Standard,
    #[default]
    Unranked,
}

impl EmergencyGrade {
    /// Score bonus applied on the dynamic path when emergency mode is active.
    pub fn emergency_bonus(self) -> f64 {
        match self {
            Self::Critical => 0.2,
            Self::Priority => 0.1,
            Self::Standard | Self::Unranked => 0.0,
        }
    }
}

/// Identity and historical performance of one forwarder. Immutable input:
/// ranking produces derived copies and never edits the caller's record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrierProfile {
    pub name: String,
    pub avg_cost_per_kg: f64,
    pub avg_transit_days: f64,
    /// Percentage in [0, 100].
    pub reliability_score: f64,
    /// Percentage in [0, 100].
    pub success_rate: f64,
    /// Higher is riskier.
    pub risk_level: f64,
    #[serde(default)]
    pub emergency_grade: EmergencyGrade,
}

impl CarrierProfile {
    pub fn validate(&self) -> Result<(), DomainError> {
        self.require_positive("avgCostPerKg", self.avg_cost_per_kg)?;
        if self.avg_cost_per_kg > MAX_COST_PER_KG {
            return Err(self.invalid(
                "avgCostPerKg",
                self.avg_cost_per_kg,
                "exceeds the largest quotable cost per kg",
            ));
        }
        self.require_positive("avgTransitDays", self.avg_transit_days)?;
        self.require_positive("riskLevel", self.risk_level)?;
        self.require_percentage("reliabilityScore", self.reliability_score)?;
        self.require_percentage("successRate", self.success_rate)?;
        Ok(())
    }

    fn require_positive(&self, field: &'static str, value: f64) -> Result<(), DomainError> {
        if !value.is_finite() {
            return Err(self.invalid(field, value, "must be a finite number"));
        }
        if value <= 0.0 {
            return Err(self.invalid(field, value, "must be greater than zero"));
        }
        Ok(())
    }

    fn require_percentage(&self, field: &'static str, value: f64) -> Result<(), DomainError> {
        if value.is_finite() && (0.0..=100.0).contains(&value) {
            Ok(())
        } else {
            Err(self.invalid(field, value, "must be a percentage in [0, 100]"))
        }
    }

    fn invalid(&self, field: &'static str, value: f64, reason: &'static str) -> DomainError {
        DomainError::InvalidCarrier { carrier: self.name.clone(), field, value, reason }
    }
}
