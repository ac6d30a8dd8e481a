//! Pairwise cost matrices between the sentences of two documents.

use crate::edit_distance::tree_edit_distance;
use crate::error::{CassimError, CassimResult};
use crate::tree::OrderedTree;
use rayon::prelude::*;
use std::time::Instant;

/// Normalized tree edit distances between every sentence of document A
/// (rows) and every sentence of document B (columns).
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    /// Row-major cells.
    cells: Vec<f64>,
}

impl CostMatrix {
    /// Compute all `a.len() × b.len()` cells in parallel.
    pub fn build(a: &[OrderedTree], b: &[OrderedTree]) -> Self {
        let cols = b.len();
        let cells = (0..a.len() * cols)
            .into_par_iter()
            .map(|idx| tree_edit_distance(&a[idx / cols], &b[idx % cols]))
            .collect();
        Self {
            rows: a.len(),
            cols,
            cells,
        }
    }

    /// Like [`CostMatrix::build`], but gives up on the whole pair once
    /// `deadline` has passed. A partial matrix is never returned.
    pub fn build_until(a: &[OrderedTree], b: &[OrderedTree], deadline: Instant) -> CassimResult<Self> {
        let cols = b.len();
        let cells = (0..a.len() * cols)
            .into_par_iter()
            .map(|idx| {
                if Instant::now() >= deadline {
                    return Err(CassimError::ComparisonTimeout);
                }
                Ok(tree_edit_distance(&a[idx / cols], &b[idx % cols]))
            })
            .collect::<CassimResult<Vec<f64>>>()?;
        Ok(Self {
            rows: a.len(),
            cols,
            cells,
        })
    }

    /// Build from explicit rows. Every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> CassimResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return Err(CassimError::config("cost matrix rows differ in length"));
        }
        if rows.iter().flatten().any(|cell| !cell.is_finite() || *cell < 0.0) {
            return Err(CassimError::config("cost matrix cells must be finite and nonnegative"));
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    /// Arithmetic mean of all cells, `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(self.cells.iter().sum::<f64>() / self.cells.len() as f64)
    }

    pub fn transposed(&self) -> Self {
        let mut cells = Vec::with_capacity(self.cells.len());
        for col in 0..self.cols {
            for row in 0..self.rows {
                cells.push(self.cells[row * self.cols + col]);
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }
}
