//! Full-batch gradient descent over the fixed [`Parameters`] topology.

use log::{debug, info};
use rand::Rng;

use crate::error::TrainError;
use crate::helpers::{accuracy, one_hot, validate_batch};
use crate::loss_functions::{CategoricalCrossEntropy, LossFunction};
use crate::mlp::{Parameters, OUTPUT_SIZE};
use crate::tensor::Tensor;

pub const DEFAULT_REPORT_EVERY: usize = 10;

/// Snapshot taken from an iteration's forward pass, before that iteration's update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub iteration: usize,
    pub accuracy: f32,
    pub loss: f32,
}

#[derive(Debug, Clone)]
pub struct Trainer {
    learning_rate: f32,
    iterations: usize,
    report_every: usize,
}

impl Trainer {
    pub fn new(learning_rate: f32, iterations: usize) -> Self {
        Trainer {
            learning_rate,
            iterations,
            report_every: DEFAULT_REPORT_EVERY,
        }
    }

    /// Report on iterations where `i % every == 0`. Zero disables reporting.
    pub fn report_every(mut self, every: usize) -> Self {
        self.report_every = every;
        self
    }

    /// Runs exactly `iterations` steps of forward, backward and update, starting from
    /// parameters drawn from `rng`.
    ///
    /// `batch` holds one example per column; `labels[i]` is the class of column `i`.
    pub fn train<R, F>(
        &self,
        batch: &Tensor,
        labels: &[usize],
        rng: &mut R,
        mut on_progress: F,
    ) -> Result<Parameters, TrainError>
    where
        R: Rng + ?Sized,
        F: FnMut(&Progress),
    {
        validate_batch(batch, labels)?;

        let mut params = Parameters::init(rng);
        let targets = one_hot(labels, OUTPUT_SIZE)?;
        debug!(
            "initialized parameters w1={} b1={} w2={} b2={}, batch={}",
            params.w1, params.b1, params.w2, params.b2, batch
        );

        for i in 0..self.iterations {
            let activations = params.forward(batch)?;
            let grads = params.backward(&activations, batch, &targets)?;
            params = params.apply_gradients(&grads, self.learning_rate)?;

            if self.report_every > 0 && i % self.report_every == 0 {
                let progress = Progress {
                    iteration: i,
                    accuracy: accuracy(&activations.a2, labels),
                    loss: CategoricalCrossEntropy::forward(&activations.a2, &targets)?,
                };
                on_progress(&progress);
            }
        }

        Ok(params)
    }
}

/// Trains with the default report interval, logging progress through `log`.
pub fn train_network<R: Rng + ?Sized>(
    batch: &Tensor,
    labels: &[usize],
    learning_rate: f32,
    iterations: usize,
    rng: &mut R,
) -> Result<Parameters, TrainError> {
    Trainer::new(learning_rate, iterations).train(batch, labels, rng, log_progress)
}

pub fn log_progress(progress: &Progress) {
    info!(
        "Iteration: {}\tAccuracy: {:.4}\tLoss: {:.4}",
        progress.iteration, progress.accuracy, progress.loss
    );
}
