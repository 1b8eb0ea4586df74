//! Fixed two-layer perceptron: 784 inputs, a 10-unit ReLU hidden layer and a 10-way softmax.
//!
//! Batches are laid out one example per column, so every activation has as many columns as
//! the batch has examples.

use rand::Rng;

use crate::activation_functions::{relu, relu_derivative, softmax};
use crate::error::ShapeError;
use crate::loss_functions::{CategoricalCrossEntropy, LossFunction};
use crate::tensor::Tensor;

pub const INPUT_SIZE: usize = 28 * 28;
pub const HIDDEN_SIZE: usize = 10;
pub const OUTPUT_SIZE: usize = 10;

/// Trainable weights and biases. Biases are column vectors broadcast across the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub w1: Tensor,
    pub b1: Tensor,
    pub w2: Tensor,
    pub b2: Tensor,
}

/// Intermediate values of one forward pass.
#[derive(Debug, Clone)]
pub struct Activations {
    /// Hidden pre-activation, `w1·x + b1`.
    pub z1: Tensor,
    pub a1: Tensor,
    /// Output pre-activation, `w2·a1 + b2`.
    pub z2: Tensor,
    /// Class probabilities, one column per example.
    pub a2: Tensor,
}

/// Loss gradients, shaped like the [`Parameters`] they belong to.
#[derive(Debug, Clone)]
pub struct Gradients {
    pub dw1: Tensor,
    pub db1: Tensor,
    pub dw2: Tensor,
    pub db2: Tensor,
}

impl Parameters {

    /// Every weight and bias drawn uniformly from `[-0.5, 0.5)`.
    pub fn init<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut uniform = |rows: usize, cols: usize| {
            Tensor::zeros(rows, cols).random_fill(&mut *rng).sub_scalar(0.5)
        };
        let w1 = uniform(HIDDEN_SIZE, INPUT_SIZE);
        let b1 = uniform(HIDDEN_SIZE, 1);
        let w2 = uniform(OUTPUT_SIZE, HIDDEN_SIZE);
        let b2 = uniform(OUTPUT_SIZE, 1);
        Parameters { w1, b1, w2, b2 }
    }

    pub fn forward(&self, batch: &Tensor) -> Result<Activations, ShapeError> {
        let z1 = self.w1.dot(batch)?.add(&self.b1)?;
        let a1 = z1.map(relu);
        let z2 = self.w2.dot(&a1)?.add(&self.b2)?;
        let a2 = softmax(&z2)?;
        Ok(Activations { z1, a1, z2, a2 })
    }

    /// Gradients of the mean cross-entropy over the batch.
    pub fn backward(
        &self,
        activations: &Activations,
        batch: &Tensor,
        one_hot: &Tensor,
    ) -> Result<Gradients, ShapeError> {
        let m = batch.cols() as f32;

        let dz2 = CategoricalCrossEntropy::backward(&activations.a2, one_hot)?;
        let dw2 = dz2.dot(activations.a1.transpose())?.div_scalar(m);
        let db2 = dz2.sum_rows().div_scalar(m);

        let dz1 = self
            .w2
            .transpose()
            .dot(&dz2)?
            .mul(&activations.z1.map(relu_derivative))?;
        let dw1 = dz1.dot(batch.transpose())?.div_scalar(m);
        let db1 = dz1.sum_rows().div_scalar(m);

        Ok(Gradients { dw1, db1, dw2, db2 })
    }

    /// One gradient-descent step, returning new parameters and leaving `self` untouched.
    pub fn apply_gradients(
        &self,
        grads: &Gradients,
        learning_rate: f32,
    ) -> Result<Parameters, ShapeError> {
        let step = |param: &Tensor, grad: &Tensor| {
            if param.dims() != grad.dims() {
                return Err(ShapeError::mismatch("apply_gradients", param.dims(), grad.dims()));
            }
            param.sub(&grad.mul_scalar(learning_rate))
        };
        Ok(Parameters {
            w1: step(&self.w1, &grads.dw1)?,
            b1: step(&self.b1, &grads.db1)?,
            w2: step(&self.w2, &grads.dw2)?,
            b2: step(&self.b2, &grads.db2)?,
        })
    }

}
