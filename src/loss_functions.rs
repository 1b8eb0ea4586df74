use crate::error::ShapeError;
use crate::tensor::Tensor;

const PROB_FLOOR: f32 = 1e-7;

/// Loss over a batch laid out one example per column.
pub trait LossFunction {

    fn forward(predicted: &Tensor, target: &Tensor) -> Result<f32, ShapeError>;
    fn backward(predicted: &Tensor, target: &Tensor) -> Result<Tensor, ShapeError>;

}

pub struct CategoricalCrossEntropy;

impl CategoricalCrossEntropy {
    fn check_shapes(predicted: &Tensor, target: &Tensor) -> Result<(), ShapeError> {
        if predicted.dims() != target.dims() {
            return Err(ShapeError::mismatch("cross_entropy", predicted.dims(), target.dims()));
        }
        Ok(())
    }
}

impl LossFunction for CategoricalCrossEntropy {

    // mean over examples of -sum(y * ln(p))
    fn forward(predicted: &Tensor, target: &Tensor) -> Result<f32, ShapeError> {
        Self::check_shapes(predicted, target)?;
        if predicted.cols() == 0 {
            return Ok(0.0);
        }
        let total: f32 = predicted
            .as_slice()
            .iter()
            .zip(target.as_slice())
            .map(|(&p, &y)| -y * p.clamp(PROB_FLOOR, 1.0).ln())
            .sum();
        Ok(total / predicted.cols() as f32)
    }

    // Gradient with respect to the softmax input: p - y.
    fn backward(predicted: &Tensor, target: &Tensor) -> Result<Tensor, ShapeError> {
        Self::check_shapes(predicted, target)?;
        predicted.sub(target)
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn perfect_prediction_has_near_zero_loss() {
        let p = Tensor::new_2d(vec![1.0, 0.0, 0.0, 1.0], 2, 2).unwrap();
        let loss = CategoricalCrossEntropy::forward(&p, &p).unwrap();
        assert_relative_eq!(loss, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn uniform_prediction_costs_ln_classes() {
        let p = Tensor::new_2d(vec![0.5, 0.5, 0.5, 0.5], 2, 2).unwrap();
        let y = Tensor::new_2d(vec![1.0, 0.0, 0.0, 1.0], 2, 2).unwrap();
        let loss = CategoricalCrossEntropy::forward(&p, &y).unwrap();
        assert_relative_eq!(loss, 2.0f32.ln(), epsilon = 1e-6);
    }

    #[test]
    fn backward_rejects_mismatched_shapes() {
        let p = Tensor::zeros(10, 3);
        let y = Tensor::zeros(10, 1);
        assert!(CategoricalCrossEntropy::backward(&p, &y).is_err());
    }
}
