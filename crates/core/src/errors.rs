use thiserror::Error;

use crate::domain::weights::Criterion;

/// Fatal input errors. Every variant belongs to the invalid-input class: the
/// whole ranking is rejected, never a partial or silently-zeroed result.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("carrier `{carrier}` has invalid {field} = {value}: {reason}")]
    InvalidCarrier { carrier: String, field: &'static str, value: f64, reason: &'static str },
    #[error("weight for {criterion} must be a finite value in [0, 1], got {value}")]
    InvalidWeight { criterion: Criterion, value: f64 },
    #[error("weight vector contains no scored criteria")]
    EmptyWeightVector,
    #[error("scored weights sum to zero; normalized scoring would divide by zero")]
    ZeroWeightTotal,
    #[error("invalid pairwise comparison matrix: {0}")]
    InvalidPairwiseMatrix(String),
    #[error(
        "unknown ranking preset `{0}` (expected costOptimized|timeOptimized|emergency|balanced|default)"
    )]
    UnknownPreset(String),
    #[error("unknown scoring strategy `{0}` (expected dynamic|neutrosophic_topsis|closeness_topsis)")]
    UnknownStrategy(String),
    #[error("unknown criterion `{0}` (expected cost|time|reliability|risk|experience)")]
    UnknownCriterion(String),
}

impl DomainError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidCarrier { .. }
                | Self::InvalidWeight { .. }
                | Self::EmptyWeightVector
                | Self::ZeroWeightTotal
                | Self::InvalidPairwiseMatrix(_)
                | Self::UnknownPreset(_)
                | Self::UnknownStrategy(_)
                | Self::UnknownCriterion(_)
        )
    }

    /// Stable machine-readable code for structured output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCarrier { .. } => "invalid_carrier",
            Self::InvalidWeight { .. } => "invalid_weight",
            Self::EmptyWeightVector => "empty_weight_vector",
            Self::ZeroWeightTotal => "zero_weight_total",
            Self::InvalidPairwiseMatrix(_) => "invalid_pairwise_matrix",
            Self::UnknownPreset(_) => "unknown_preset",
            Self::UnknownStrategy(_) => "unknown_strategy",
            Self::UnknownCriterion(_) => "unknown_criterion",
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("configuration failure: {0}")]
    Configuration(String),
    #[error("input could not be read: {0}")]
    Input(String),
}

impl ApplicationError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(_) => "invalid_input",
            Self::Configuration(_) => "config_validation",
            Self::Input(_) => "input_read",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Domain(_) => 3,
            Self::Configuration(_) => 2,
            Self::Input(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::weights::Criterion;
    use crate::errors::{ApplicationError, DomainError};

    #[test]
    fn every_domain_error_is_invalid_input() {
        let errors = [
            DomainError::InvalidCarrier {
                carrier: "DHL".to_owned(),
                field: "avgCostPerKg",
                value: 0.0,
                reason: "must be greater than zero",
            },
            DomainError::InvalidWeight { criterion: Criterion::Cost, value: 1.5 },
            DomainError::EmptyWeightVector,
            DomainError::ZeroWeightTotal,
            DomainError::InvalidPairwiseMatrix("empty".to_owned()),
            DomainError::UnknownPreset("fastest".to_owned()),
            DomainError::UnknownStrategy("ahp".to_owned()),
            DomainError::UnknownCriterion("price".to_owned()),
        ];

        assert!(errors.iter().all(DomainError::is_invalid_input));
    }

    #[test]
    fn invalid_carrier_message_names_carrier_and_field() {
        let error = DomainError::InvalidCarrier {
            carrier: "Kuehne Nagel".to_owned(),
            field: "riskLevel",
            value: -1.0,
            reason: "must be greater than zero",
        };

        let message = error.to_string();
        assert!(message.contains("Kuehne Nagel"));
        assert!(message.contains("riskLevel"));
    }

    #[test]
    fn domain_error_maps_to_invalid_input_class() {
        let error = ApplicationError::from(DomainError::ZeroWeightTotal);

        assert_eq!(error.error_class(), "invalid_input");
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn configuration_error_maps_to_config_validation_class() {
        let error = ApplicationError::Configuration("bad log level".to_owned());

        assert_eq!(error.error_class(), "config_validation");
        assert_eq!(error.exit_code(), 2);
    }
}
