use crate::error::ShapeError;
use crate::tensor::Tensor;

impl Tensor {

    /// Elementwise combination with column broadcasting.
    ///
    /// `b` must have the same row count as `a`, and `a.cols()` must be a nonzero multiple of
    /// `b.cols()`. Cell `(r, c)` of the result is `f(a[r][c], b[r][c % b.cols()])`, so a
    /// single-column `b` is repeated across every column of `a`.
    pub fn combine<F>(a: &Tensor, b: &Tensor, f: F) -> Result<Tensor, ShapeError>
    where
        F: Fn(f32, f32) -> f32,
    {
        let broadcastable = a.rows == b.rows
            && b.cols > 0
            && a.cols >= b.cols
            && a.cols % b.cols == 0;
        if !broadcastable {
            return Err(ShapeError::mismatch("combine", a.dims(), b.dims()));
        }

        let mut data = Vec::with_capacity(a.data.len());
        for (a_row, b_row) in a.data.chunks(a.cols).zip(b.data.chunks(b.cols)) {
            data.extend(
                a_row
                    .iter()
                    .zip(b_row.iter().cycle())
                    .map(|(&x, &y)| f(x, y)),
            );
        }
        Ok(Tensor::from_parts(data, a.rows, a.cols))
    }

    pub fn add(&self, other: &Tensor) -> Result<Tensor, ShapeError> {
        Self::combine(self, other, |a, b| a + b)
    }

    pub fn sub(&self, other: &Tensor) -> Result<Tensor, ShapeError> {
        Self::combine(self, other, |a, b| a - b)
    }

    // Elementwise (hadamard) product
    pub fn mul(&self, other: &Tensor) -> Result<Tensor, ShapeError> {
        Self::combine(self, other, |a, b| a * b)
    }

    pub fn add_scalar(&self, scalar: f32) -> Tensor {
        self.map(|x| x + scalar)
    }

    pub fn sub_scalar(&self, scalar: f32) -> Tensor {
        self.map(|x| x - scalar)
    }

    pub fn mul_scalar(&self, scalar: f32) -> Tensor {
        self.map(|x| x * scalar)
    }

    pub fn div_scalar(&self, scalar: f32) -> Tensor {
        self.map(|x| x / scalar)
    }

    pub fn map<F>(&self, mut f: F) -> Tensor
    where
        F: FnMut(f32) -> f32,
    {
        self.map_indexed(|x, _| f(x))
    }

    /// Like [`Tensor::map`], also passing each cell's flat row-major index.
    pub fn map_indexed<F>(&self, mut f: F) -> Tensor
    where
        F: FnMut(f32, usize) -> f32,
    {
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(i, &x)| f(x, i))
            .collect();
        Tensor::from_parts(data, self.rows, self.cols)
    }

    /// Column vector holding the sum of each row.
    pub fn sum_rows(&self) -> Tensor {
        let data = if self.cols == 0 {
            vec![0.0; self.rows]
        } else {
            self.data.chunks(self.cols).map(|row| row.iter().sum()).collect()
        };
        Tensor::from_parts(data, self.rows, 1)
    }

    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }

    pub fn approx_eq(&self, other: &Tensor, tolerance: f32) -> bool {
        self.dims() == other.dims()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.dims() == other.dims() && self.data == other.data
    }
}
