//! Neutrosophic AHP: weight vectors from pairwise criterion judgments.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::domain::weights::{Criterion, WeightVector};
use crate::errors::DomainError;

/// Saaty's random consistency index, indexed by matrix order.
const RANDOM_INDEX: [f64; 10] = [0.0, 0.0, 0.58, 0.9, 1.12, 1.24, 1.32, 1.41, 1.45, 1.49];
const RANDOM_INDEX_BEYOND_TABLE: f64 = 1.49;

/// Floor applied to crisp pairwise entries so the power iteration stays positive.
const MIN_CRISP_ENTRY: f64 = 0.111;
const CONVERGENCE_EPSILON: f64 = 1e-6;

/// Triangular neutrosophic number with every component in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Tnn {
    pub truth: f64,
    pub indeterminacy: f64,
    pub falsity: f64,
}

impl Tnn {
    pub fn new(truth: f64, indeterminacy: f64, falsity: f64) -> Self {
        Self {
            truth: truth.clamp(0.0, 1.0),
            indeterminacy: indeterminacy.clamp(0.0, 1.0),
            falsity: falsity.clamp(0.0, 1.0),
        }
    }

    pub const fn equal() -> Self {
        Self { truth: 1.0, indeterminacy: 0.0, falsity: 0.0 }
    }

    pub fn from_value(value: f64) -> Self {
        if value >= 1.0 {
            Self::equal()
        } else if value <= 0.0 {
            Self::new(0.0, 0.0, 1.0)
        } else {
            Self::new(value, 0.1, 1.0 - value)
        }
    }

    pub fn score(&self) -> f64 {
        self.truth - self.falsity
    }

    pub fn multiply(&self, other: &Self) -> Self {
        Self::new(
            self.truth * other.truth,
            self.indeterminacy + other.indeterminacy - self.indeterminacy * other.indeterminacy,
            self.falsity + other.falsity - self.falsity * other.falsity,
        )
    }

    pub fn add(&self, other: &Self) -> Self {
        Self::new(
            self.truth + other.truth - self.truth * other.truth,
            self.indeterminacy * other.indeterminacy,
            self.falsity * other.falsity,
        )
    }

    /// Swaps truth and falsity; used for the lower triangle.
    pub fn reciprocal(&self) -> Self {
        Self::new(self.falsity, self.indeterminacy, self.truth)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PairwiseMatrix {
    criteria: Vec<Criterion>,
    cells: Vec<Vec<Tnn>>,
}

impl PairwiseMatrix {
    /// Judgments are keyed by `(row, column)` for the upper triangle in
    /// `criteria` order. Missing judgments mean equal importance.
    pub fn from_judgments(
        criteria: &[Criterion],
        judgments: &HashMap<(Criterion, Criterion), Tnn>,
    ) -> Result<Self, DomainError> {
        if criteria.is_empty() {
            return Err(DomainError::InvalidPairwiseMatrix("no criteria supplied".to_owned()));
        }
        for (index, criterion) in criteria.iter().enumerate() {
            if criteria[..index].contains(criterion) {
                return Err(DomainError::InvalidPairwiseMatrix(format!(
                    "criterion `{criterion}` listed twice"
                )));
            }
        }

        let n = criteria.len();
        let mut cells = vec![vec![Tnn::equal(); n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let judgment =
                    judgments.get(&(criteria[i], criteria[j])).copied().unwrap_or_else(Tnn::equal);
                cells[i][j] = judgment;
                cells[j][i] = judgment.reciprocal();
            }
        }

        Ok(Self { criteria: criteria.to_vec(), cells })
    }

    /// Raw constructor for externally built matrices; rejects non-square input.
    pub fn from_cells(criteria: Vec<Criterion>, cells: Vec<Vec<Tnn>>) -> Result<Self, DomainError> {
        if cells.is_empty() {
            return Err(DomainError::InvalidPairwiseMatrix("matrix is empty".to_owned()));
        }
        if criteria.len() != cells.len() {
            return Err(DomainError::InvalidPairwiseMatrix(format!(
                "{} criteria for {} rows",
                criteria.len(),
                cells.len()
            )));
        }
        if let Some(row) = cells.iter().position(|row| row.len() != cells.len()) {
            return Err(DomainError::InvalidPairwiseMatrix(format!(
                "row {row} has {} columns, expected {}",
                cells[row].len(),
                cells.len()
            )));
        }

        Ok(Self { criteria, cells })
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn order(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&Tnn> {
        self.cells.get(row).and_then(|cells| cells.get(column))
    }

    fn crisp(&self) -> Vec<Vec<f64>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|tnn| (tnn.score() + 1.0).max(MIN_CRISP_ENTRY)).collect())
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AhpWeights {
    pub criteria: Vec<Criterion>,
    /// Normalized to sum to one, in `criteria` order.
    pub weights: Vec<f64>,
    pub lambda_max: f64,
    pub consistency_index: f64,
    pub consistency_ratio: f64,
    pub is_consistent: bool,
}

impl AhpWeights {
    pub fn weight(&self, criterion: Criterion) -> Option<f64> {
        self.criteria
            .iter()
            .position(|c| *c == criterion)
            .and_then(|index| self.weights.get(index).copied())
    }

    /// Criteria absent from the matrix get zero weight.
    pub fn into_weight_vector(self) -> Result<WeightVector, DomainError> {
        let entries: Vec<(Criterion, f64)> =
            self.criteria.iter().copied().zip(self.weights.iter().copied()).collect();
        WeightVector::from_entries(entries)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NeutrosophicAhp {
    pub consistency_threshold: f64,
    pub max_iterations: usize,
}

impl Default for NeutrosophicAhp {
    fn default() -> Self {
        Self { consistency_threshold: 0.1, max_iterations: 100 }
    }
}

impl NeutrosophicAhp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn derive_weights(&self, matrix: &PairwiseMatrix) -> Result<AhpWeights, DomainError> {
        let n = matrix.order();
        if n == 0 {
            return Err(DomainError::InvalidPairwiseMatrix("matrix is empty".to_owned()));
        }

        let crisp = matrix.crisp();
        let eigenvector = self.principal_eigenvector(&crisp);
        let lambda_max = lambda_max(&crisp, &eigenvector);

        let (consistency_index, consistency_ratio) = if n < 3 {
            (0.0, 0.0)
        } else {
            let ci = (lambda_max - n as f64) / (n as f64 - 1.0);
            (ci, ci / random_index(n))
        };
        let is_consistent = consistency_ratio < self.consistency_threshold;

        let total: f64 = eigenvector.iter().sum();
        let weights = eigenvector.iter().map(|w| w / total).collect();

        debug!(
            event_name = "ranking.ahp.weights_derived",
            order = n,
            lambda_max,
            consistency_ratio,
            is_consistent,
            "derived criterion weights from pairwise judgments"
        );

        Ok(AhpWeights {
            criteria: matrix.criteria().to_vec(),
            weights,
            lambda_max,
            consistency_index,
            consistency_ratio,
            is_consistent,
        })
    }

    fn principal_eigenvector(&self, crisp: &[Vec<f64>]) -> Vec<f64> {
        let n = crisp.len();
        let mut weights = vec![1.0; n];

        for _ in 0..self.max_iterations {
            let mut next: Vec<f64> =
                crisp.iter().map(|row| row.iter().zip(&weights).map(|(a, w)| a * w).sum()).collect();
            let sum: f64 = next.iter().sum();
            for value in &mut next {
                *value /= sum;
            }

            let diff: f64 = next.iter().zip(&weights).map(|(a, b)| (a - b).abs()).sum();
            weights = next;
            if diff < CONVERGENCE_EPSILON {
                break;
            }
        }

        weights
    }
}

fn lambda_max(crisp: &[Vec<f64>], weights: &[f64]) -> f64 {
    let n = crisp.len() as f64;
    crisp
        .iter()
        .zip(weights)
        .map(|(row, weight)| row.iter().zip(weights).map(|(a, w)| a * w).sum::<f64>() / weight)
        .sum::<f64>()
        / n
}

fn random_index(n: usize) -> f64 {
    RANDOM_INDEX.get(n).copied().unwrap_or(RANDOM_INDEX_BEYOND_TABLE)
}

/// Stock judgments over cost, time, reliability and risk.
pub fn default_freight_judgments() -> HashMap<(Criterion, Criterion), Tnn> {
    use Criterion::{Cost, Reliability, Risk, Time};

    HashMap::from([
        ((Cost, Time), Tnn::new(0.7, 0.2, 0.1)),
        ((Cost, Reliability), Tnn::new(0.4, 0.3, 0.3)),
        ((Cost, Risk), Tnn::new(0.6, 0.2, 0.2)),
        ((Time, Reliability), Tnn::new(0.3, 0.3, 0.4)),
        ((Time, Risk), Tnn::new(0.5, 0.3, 0.2)),
        ((Reliability, Risk), Tnn::new(0.8, 0.1, 0.1)),
    ])
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{default_freight_judgments, NeutrosophicAhp, PairwiseMatrix, Tnn};
    use crate::domain::weights::Criterion;
    use crate::errors::DomainError;

    #[test]
    fn tnn_components_are_clamped() {
        let tnn = Tnn::new(1.4, -0.2, 0.5);
        assert_eq!(tnn, Tnn { truth: 1.0, indeterminacy: 0.0, falsity: 0.5 });
        assert_eq!(tnn.score(), 0.5);
    }

    #[test]
    fn tnn_from_value_saturates_at_the_bounds() {
        assert_eq!(Tnn::from_value(1.5), Tnn::equal());
        assert_eq!(Tnn::from_value(-1.0), Tnn::new(0.0, 0.0, 1.0));

        let mid = Tnn::from_value(0.25);
        assert_eq!(mid.indeterminacy, 0.1);
        assert_eq!(mid.falsity, 0.75);
    }

    #[test]
    fn tnn_arithmetic_follows_neutrosophic_rules() {
        let a = Tnn::new(0.5, 0.2, 0.4);
        let b = Tnn::new(0.6, 0.5, 0.5);

        let product = a.multiply(&b);
        assert!((product.truth - 0.3).abs() < 1e-12);
        assert!((product.indeterminacy - 0.6).abs() < 1e-12);
        assert!((product.falsity - 0.7).abs() < 1e-12);

        let sum = a.add(&b);
        assert!((sum.truth - 0.8).abs() < 1e-12);
        assert!((sum.indeterminacy - 0.1).abs() < 1e-12);
        assert!((sum.falsity - 0.2).abs() < 1e-12);
    }

    #[test]
    fn matrix_fills_diagonal_and_reciprocal_lower_triangle() {
        let criteria = [Criterion::Cost, Criterion::Time, Criterion::Reliability];
        let judgments = HashMap::from([((Criterion::Cost, Criterion::Time), Tnn::new(0.7, 0.2, 0.1))]);
        let matrix = PairwiseMatrix::from_judgments(&criteria, &judgments).expect("valid matrix");

        assert_eq!(matrix.get(0, 0), Some(&Tnn::equal()));
        assert_eq!(matrix.get(0, 1), Some(&Tnn::new(0.7, 0.2, 0.1)));
        assert_eq!(matrix.get(1, 0), Some(&Tnn::new(0.1, 0.2, 0.7)));
        assert_eq!(matrix.get(0, 2), Some(&Tnn::equal()));
        assert_eq!(matrix.get(2, 0), Some(&Tnn::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn malformed_matrices_are_rejected() {
        assert!(matches!(
            PairwiseMatrix::from_judgments(&[], &HashMap::new()),
            Err(DomainError::InvalidPairwiseMatrix(_))
        ));
        assert!(matches!(
            PairwiseMatrix::from_judgments(&[Criterion::Cost, Criterion::Cost], &HashMap::new()),
            Err(DomainError::InvalidPairwiseMatrix(_))
        ));
        assert!(matches!(
            PairwiseMatrix::from_cells(
                vec![Criterion::Cost, Criterion::Time],
                vec![vec![Tnn::equal(); 2], vec![Tnn::equal()]],
            ),
            Err(DomainError::InvalidPairwiseMatrix(_))
        ));
    }

    #[test]
    fn neutral_judgments_give_uniform_weights() {
        let criteria = [Criterion::Cost, Criterion::Time, Criterion::Reliability];
        let neutral = Tnn::new(0.5, 0.1, 0.5);
        let judgments = HashMap::from([
            ((Criterion::Cost, Criterion::Time), neutral),
            ((Criterion::Cost, Criterion::Reliability), neutral),
            ((Criterion::Time, Criterion::Reliability), neutral),
        ]);
        let matrix = PairwiseMatrix::from_judgments(&criteria, &judgments).expect("valid matrix");
        let result = NeutrosophicAhp::new().derive_weights(&matrix).expect("weights derive");

        for weight in &result.weights {
            assert!((weight - 1.0 / 3.0).abs() < 1e-9);
        }
        // Diagonal entries score 1 and map to a crisp 2, so lambda sits above n.
        assert!((result.lambda_max - 4.0).abs() < 1e-9);
    }

    #[test]
    fn default_freight_judgments_rank_cost_first() {
        let matrix =
            PairwiseMatrix::from_judgments(&Criterion::SCORED, &default_freight_judgments())
                .expect("valid matrix");
        let result = NeutrosophicAhp::new().derive_weights(&matrix).expect("weights derive");

        let total: f64 = result.weights.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);

        let weight = |criterion| result.weight(criterion).unwrap_or_default();
        assert!((weight(Criterion::Cost) - 0.327).abs() < 1e-3);
        assert!(weight(Criterion::Cost) > weight(Criterion::Reliability));
        assert!(weight(Criterion::Reliability) > weight(Criterion::Time));
        assert!(weight(Criterion::Time) > weight(Criterion::Risk));
        assert!((result.consistency_ratio - 0.2219).abs() < 1e-3);
        assert!(!result.is_consistent);

        let vector = result.clone().into_weight_vector().expect("weights are valid");
        assert!((vector.total() - 1.0).abs() < 1e-9);
        assert_eq!(vector.experience, None);
    }

    #[test]
    fn two_criteria_are_always_consistent() {
        let criteria = [Criterion::Cost, Criterion::Time];
        let judgments =
            HashMap::from([((Criterion::Cost, Criterion::Time), Tnn::new(0.9, 0.0, 0.0))]);
        let matrix = PairwiseMatrix::from_judgments(&criteria, &judgments).expect("valid matrix");
        let result = NeutrosophicAhp::new().derive_weights(&matrix).expect("weights derive");

        assert_eq!(result.consistency_ratio, 0.0);
        assert!(result.is_consistent);
        assert!(result.weights[0] > result.weights[1]);
    }
}
