use crate::error::{ShapeError, TrainError};
use crate::mlp::{Parameters, INPUT_SIZE, OUTPUT_SIZE};
use crate::tensor::Tensor;

/// `classes x labels.len()` matrix with a single 1 per column, at the label's row.
pub fn one_hot(labels: &[usize], classes: usize) -> Result<Tensor, TrainError> {
    let mut encoded = Tensor::zeros(classes, labels.len());
    for (index, &label) in labels.iter().enumerate() {
        if label >= classes {
            return Err(TrainError::LabelOutOfRange { index, label, classes });
        }
        encoded.set(label, index, 1.0);
    }
    Ok(encoded)
}

/// Fraction of columns whose most probable row matches the label.
pub fn accuracy(predictions: &Tensor, labels: &[usize]) -> f32 {
    if labels.is_empty() {
        return 0.0;
    }
    let correct = predictions
        .argmax_columns()
        .iter()
        .zip(labels)
        .filter(|(predicted, label)| predicted == label)
        .count();
    correct as f32 / labels.len() as f32
}

/// Rejects batches the fixed topology cannot consume.
pub(crate) fn validate_batch(batch: &Tensor, labels: &[usize]) -> Result<(), TrainError> {
    if batch.rows() != INPUT_SIZE {
        let expected = (INPUT_SIZE, batch.cols());
        return Err(ShapeError::mismatch("batch", batch.dims(), expected).into());
    }
    if batch.cols() == 0 {
        return Err(TrainError::EmptyBatch);
    }
    if labels.len() != batch.cols() {
        return Err(TrainError::LabelCountMismatch {
            labels: labels.len(),
            examples: batch.cols(),
        });
    }
    let out_of_range = labels
        .iter()
        .enumerate()
        .find(|(_, label)| **label >= OUTPUT_SIZE);
    if let Some((index, &label)) = out_of_range {
        return Err(TrainError::LabelOutOfRange { index, label, classes: OUTPUT_SIZE });
    }
    Ok(())
}

/// Predicted class for every column of `batch`.
pub fn predict(params: &Parameters, batch: &Tensor) -> Result<Vec<usize>, ShapeError> {
    Ok(params.forward(batch)?.a2.argmax_columns())
}

pub fn evaluate_model(
    params: &Parameters,
    batch: &Tensor,
    labels: &[usize],
) -> Result<f32, TrainError> {
    validate_batch(batch, labels)?;
    let activations = params.forward(batch)?;
    Ok(accuracy(&activations.a2, labels))
}
