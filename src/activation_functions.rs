use crate::error::ShapeError;
use crate::tensor::Tensor;

pub fn relu(x: f32) -> f32 {
    if x > 0.0 { x } else { 0.0 }
}

/// 1 if x > 0, 0 otherwise (including at 0).
pub fn relu_derivative(x: f32) -> f32 {
    if x > 0.0 { 1.0 } else { 0.0 }
}

/// Column-wise softmax: each column of `z` is one example and sums to 1 in the output.
///
/// Works on the transpose so every example is a contiguous row, shifting each row by its
/// maximum before exponentiating.
pub fn softmax(z: &Tensor) -> Result<Tensor, ShapeError> {
    let rows = z.transpose();
    let max = row_max(rows);
    let exp = Tensor::combine(rows, &max, |x, m| (x - m).exp())?;
    let sum = exp.sum_rows();
    let probs = Tensor::combine(&exp, &sum, |e, s| e / s)?;
    Ok(probs.into_transpose())
}

fn row_max(t: &Tensor) -> Tensor {
    let mut max = Tensor::zeros(t.rows(), 1);
    for r in 0..t.rows() {
        let m = (0..t.cols()).map(|c| t.get(r, c)).fold(f32::NEG_INFINITY, f32::max);
        max.set(r, 0, m);
    }
    max
}
