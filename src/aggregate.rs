//! Reducing a cost matrix to one similarity score.

use crate::error::GateReason;
use crate::matrix::CostMatrix;
use pathfinding::kuhn_munkres::{kuhn_munkres_min, Weights};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed-point scale used to hand fractional costs to the assignment solver.
const ASSIGNMENT_SCALE: f64 = 1_000_000.0;

/// Policy for turning a cost matrix into a similarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// `1 − mean` over every cell: each sentence of one turn is compared
    /// with every sentence of the other.
    #[default]
    Mean,
    /// `1 − mean` over a minimum-cost one-to-one pairing of sentences. The
    /// smaller document's sentences are each matched to a distinct sentence
    /// of the larger one; unmatched sentences do not contribute.
    OptimalAssignment,
}

impl Aggregation {
    /// Similarity for a matrix, or `None` when the matrix is empty.
    pub fn similarity(&self, matrix: &CostMatrix) -> Option<f64> {
        if matrix.is_empty() {
            return None;
        }
        let cost = match self {
            Aggregation::Mean => matrix.mean()?,
            Aggregation::OptimalAssignment => assignment_cost(matrix),
        };
        Some(1.0 - cost)
    }
}

/// Mean cost of the cheapest one-to-one assignment.
fn assignment_cost(matrix: &CostMatrix) -> f64 {
    // The solver wants no more rows than columns.
    let oriented;
    let matrix = if matrix.rows() > matrix.cols() {
        oriented = matrix.transposed();
        &oriented
    } else {
        matrix
    };

    let weights = ScaledCosts::new(matrix);
    let (_, assignment) = kuhn_munkres_min(&weights);
    let total: f64 = assignment
        .iter()
        .enumerate()
        .filter_map(|(row, &col)| matrix.get(row, col))
        .sum();
    total / assignment.len() as f64
}

/// Integer view of a cost matrix for pathfinding's solver.
struct ScaledCosts {
    rows: usize,
    cols: usize,
    cells: Vec<i64>,
}

impl ScaledCosts {
    fn new(matrix: &CostMatrix) -> Self {
        Self {
            rows: matrix.rows(),
            cols: matrix.cols(),
            cells: matrix
                .cells()
                .iter()
                .map(|cost| (cost * ASSIGNMENT_SCALE).round() as i64)
                .collect(),
        }
    }
}

impl Weights<i64> for ScaledCosts {
    fn rows(&self) -> usize {
        self.rows
    }

    fn columns(&self) -> usize {
        self.cols
    }

    fn at(&self, row: usize, col: usize) -> i64 {
        self.cells[row * self.cols + col]
    }

    fn neg(&self) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(|&v| -v).collect(),
        }
    }
}

/// Similarity of one adjacent document pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PairScore {
    Defined(f64),
    /// Not comparable. Never read this as zero.
    Undefined(GateReason),
}

impl PairScore {
    pub fn value(&self) -> Option<f64> {
        match self {
            PairScore::Defined(score) => Some(*score),
            PairScore::Undefined(_) => None,
        }
    }

    /// The score, with undefined pairs mapped to NaN.
    pub fn to_f64(&self) -> f64 {
        self.value().unwrap_or(f64::NAN)
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, PairScore::Defined(_))
    }

    pub fn gate_reason(&self) -> Option<&GateReason> {
        match self {
            PairScore::Defined(_) => None,
            PairScore::Undefined(reason) => Some(reason),
        }
    }
}

impl fmt::Display for PairScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairScore::Defined(score) => write!(f, "{:.4}", score),
            PairScore::Undefined(reason) => write!(f, "NA ({})", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: Vec<Vec<f64>>) -> CostMatrix {
        CostMatrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_mean_similarity() {
        let m = matrix(vec![vec![0.0, 0.5], vec![0.5, 0.0]]);
        assert_eq!(Aggregation::Mean.similarity(&m), Some(0.75));
    }

    #[test]
    fn test_empty_matrix_is_undefined() {
        let m = matrix(vec![]);
        assert_eq!(Aggregation::Mean.similarity(&m), None);
        assert_eq!(Aggregation::OptimalAssignment.similarity(&m), None);
    }

    #[test]
    fn test_assignment_picks_diagonal() {
        let m = matrix(vec![vec![0.0, 0.5], vec![0.5, 0.0]]);
        assert_eq!(Aggregation::OptimalAssignment.similarity(&m), Some(1.0));
    }

    #[test]
    fn test_assignment_beats_greedy() {
        // Greedy would take (0,0)=0.1 and then be left with (1,1)=0.9.
        let m = matrix(vec![vec![0.1, 0.2], vec![0.3, 0.9]]);
        let similarity = Aggregation::OptimalAssignment.similarity(&m).unwrap();
        assert!((similarity - (1.0 - 0.25)).abs() < 1e-9, "{}", similarity);
    }

    #[test]
    fn test_assignment_on_tall_matrix() {
        let m = matrix(vec![vec![0.4], vec![0.1], vec![0.3]]);
        let similarity = Aggregation::OptimalAssignment.similarity(&m).unwrap();
        assert!((similarity - 0.9).abs() < 1e-9, "{}", similarity);
    }

    #[test]
    fn test_assignment_on_wide_matrix() {
        let m = matrix(vec![vec![0.4, 0.2, 0.6]]);
        let similarity = Aggregation::OptimalAssignment.similarity(&m).unwrap();
        assert!((similarity - 0.8).abs() < 1e-9, "{}", similarity);
    }

    #[test]
    fn test_pair_score_sentinel() {
        let undefined = PairScore::Undefined(GateReason::EmptyDocument);
        assert!(undefined.to_f64().is_nan());
        assert_eq!(undefined.value(), None);
        assert_eq!(undefined.to_string(), "NA (empty document)");

        let defined = PairScore::Defined(0.8125);
        assert_eq!(defined.to_f64(), 0.8125);
        assert!(defined.gate_reason().is_none());
        assert_eq!(defined.to_string(), "0.8125");
    }
}
