use rayon::prelude::*;

use crate::error::ShapeError;
use crate::tensor::Tensor;

// Multiply-adds below which spawning rayon work costs more than it saves.
const PARALLEL_THRESHOLD: usize = 1 << 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Sequential,
    Parallel,
}

impl ExecutionMode {
    fn for_work(work: usize) -> Self {
        if work >= PARALLEL_THRESHOLD {
            ExecutionMode::Parallel
        } else {
            ExecutionMode::Sequential
        }
    }
}

impl Tensor {

    /// Matrix product `self · other`, picking the execution mode from the amount of work.
    pub fn dot(&self, other: &Tensor) -> Result<Tensor, ShapeError> {
        let mode = ExecutionMode::for_work(self.rows * self.cols * other.cols);
        self.dot_with(other, mode)
    }

    pub fn dot_with(&self, other: &Tensor, mode: ExecutionMode) -> Result<Tensor, ShapeError> {
        if self.cols != other.rows {
            return Err(ShapeError::mismatch("dot", self.dims(), other.dims()));
        }

        let (r1, c2) = (self.rows, other.cols);
        let mut result = vec![0.0; r1 * c2];
        if c2 > 0 {
            match mode {
                ExecutionMode::Sequential => {
                    for (i, out_row) in result.chunks_mut(c2).enumerate() {
                        self.dot_row(other, i, out_row);
                    }
                }
                ExecutionMode::Parallel => {
                    result
                        .par_chunks_mut(c2)
                        .enumerate()
                        .for_each(|(i, out_row)| self.dot_row(other, i, out_row));
                }
            }
        }
        Ok(Tensor::from_parts(result, r1, c2))
    }

    // Accumulates row `i` of the product into `out_row`, walking `other` row by row.
    fn dot_row(&self, other: &Tensor, i: usize, out_row: &mut [f32]) {
        let c1 = self.cols;
        let a_row = &self.data[i * c1..(i + 1) * c1];
        for (k, &a) in a_row.iter().enumerate() {
            let b_row = &other.data[k * other.cols..(k + 1) * other.cols];
            for (out, &b) in out_row.iter_mut().zip(b_row) {
                *out += a * b;
            }
        }
    }
}
