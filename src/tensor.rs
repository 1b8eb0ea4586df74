mod basic_ops;
mod matmul;

use std::fmt;
use std::sync::OnceLock;

use rand::distributions::{Distribution, Uniform};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::error::ShapeError;

pub use matmul::ExecutionMode;

/// Dense row-major 2D array of `f32`.
///
/// The transposed copy is computed on the first call to [`Tensor::transpose`] and reused
/// afterwards. Every mutation goes through `&mut self` and drops that copy, so it never
/// goes stale.
pub struct Tensor {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
    transposed: OnceLock<Box<Tensor>>,
}

impl Tensor {
    fn from_parts(data: Vec<f32>, rows: usize, cols: usize) -> Tensor {
        debug_assert_eq!(data.len(), rows * cols);
        Tensor {
            data,
            rows,
            cols,
            transposed: OnceLock::new(),
        }
    }

    pub fn zeros(rows: usize, cols: usize) -> Tensor {
        Self::from_parts(vec![0.0; rows * cols], rows, cols)
    }

    /// Wraps a flat row-major buffer, deriving the row count from `width`.
    pub fn from_flat(data: Vec<f32>, width: usize) -> Result<Tensor, ShapeError> {
        if width == 0 || data.len() % width != 0 {
            return Err(ShapeError::RaggedData { len: data.len(), width });
        }
        let rows = data.len() / width;
        Ok(Self::from_parts(data, rows, width))
    }

    pub fn new_2d(data: Vec<f32>, rows: usize, cols: usize) -> Result<Tensor, ShapeError> {
        if data.len() != rows * cols {
            return Err(ShapeError::mismatch("new_2d", (data.len(), 1), (rows, cols)));
        }
        Ok(Self::from_parts(data, rows, cols))
    }

    /// Same shape as `self`, every cell drawn uniformly from `[0, 1)`.
    pub fn random_fill<R: Rng + ?Sized>(&self, rng: &mut R) -> Tensor {
        let uniform = Uniform::new(0.0f32, 1.0f32);
        self.map(|_| uniform.sample(rng))
    }

    pub fn random(rows: usize, cols: usize, seed: u64) -> Tensor {
        let mut rng = Pcg64::seed_from_u64(seed);
        Self::zeros(rows, cols).random_fill(&mut rng)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for shape ({}, {})",
            self.rows,
            self.cols
        );
        row * self.cols + col
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[self.index(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        let idx = self.index(row, col);
        self.transposed.take();
        self.data[idx] = value;
    }

    /// Transposed view, memoized on first use.
    pub fn transpose(&self) -> &Tensor {
        self.transposed.get_or_init(|| Box::new(self.compute_transpose()))
    }

    /// Consumes `self`, reusing the memoized transpose when there is one.
    pub fn into_transpose(mut self) -> Tensor {
        match self.transposed.take() {
            Some(cached) => *cached,
            None => self.compute_transpose(),
        }
    }

    pub fn is_transpose_cached(&self) -> bool {
        self.transposed.get().is_some()
    }

    fn compute_transpose(&self) -> Tensor {
        let (rows, cols) = self.dims();
        let mut data = vec![0.0; rows * cols];
        for i in 0..rows {
            for j in 0..cols {
                data[j * rows + i] = self.data[i * cols + j];
            }
        }
        Self::from_parts(data, cols, rows)
    }

    /// Row index of the largest value in each column. Ties go to the lowest row.
    pub fn argmax_columns(&self) -> Vec<usize> {
        (0..self.cols)
            .map(|col| {
                let mut max_idx = 0;
                let mut max_val = f32::NEG_INFINITY;
                for row in 0..self.rows {
                    let val = self.data[row * self.cols + col];
                    if row == 0 || val > max_val {
                        max_val = val;
                        max_idx = row;
                    }
                }
                max_idx
            })
            .collect()
    }

    /// Corner rows and columns, elided in the middle, for debug output.
    pub fn preview(&self) -> String {
        if self.rows == 0 || self.cols == 0 {
            return String::new();
        }
        let mut out = String::new();
        for row in corner_indices(self.rows) {
            match row {
                Some(r) => {
                    let cells: Vec<String> = corner_indices(self.cols)
                        .map(|c| match c {
                            Some(c) => format!("{:.5}", self.get(r, c)),
                            None => "...".to_string(),
                        })
                        .collect();
                    out.push_str(&cells.join(" "));
                }
                None => out.push_str("..."),
            }
            out.push('\n');
        }
        out
    }
}

// First three indices, a gap marker, then up to the last four.
fn corner_indices(len: usize) -> impl Iterator<Item = Option<usize>> {
    let head = len.min(3);
    let tail_start = head.max(len.saturating_sub(4));
    let gap = (tail_start > head).then_some(None);
    (0..head)
        .map(Some)
        .chain(gap)
        .chain((tail_start..len).map(Some))
}

impl Clone for Tensor {
    fn clone(&self) -> Self {
        Self::from_parts(self.data.clone(), self.rows, self.cols)
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("data", &self.data)
            .finish()
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.rows, self.cols)
    }
}
