use approx::assert_relative_eq;
use digit_mlp::helpers::{accuracy, evaluate_model, one_hot, predict};
use digit_mlp::loss_functions::{CategoricalCrossEntropy, LossFunction};
use digit_mlp::mlp::{HIDDEN_SIZE, INPUT_SIZE, OUTPUT_SIZE};
use digit_mlp::{train_network, Parameters, Progress, ShapeError, Tensor, TrainError, Trainer};
use rand::SeedableRng;
use rand_pcg::Pcg64;

const SEED: u64 = 1234;

#[test]
fn one_step_on_zero_input_matches_closed_form() {
    let batch = Tensor::zeros(INPUT_SIZE, 2);
    let labels = [3, 7];
    let lr = 0.1;

    let initial = Parameters::init(&mut Pcg64::seed_from_u64(SEED));
    let trained = train_network(&batch, &labels, lr, 1, &mut Pcg64::seed_from_u64(SEED)).unwrap();

    // Zero input leaves z1 = b1 in every column, so both examples share a1 and p.
    let b1 = initial.b1.as_slice();
    let a1: Vec<f32> = b1.iter().map(|&b| b.max(0.0)).collect();
    let z2: Vec<f32> = (0..OUTPUT_SIZE)
        .map(|i| {
            let weighted: f32 = (0..HIDDEN_SIZE).map(|k| initial.w2.get(i, k) * a1[k]).sum();
            weighted + initial.b2.get(i, 0)
        })
        .collect();
    let max = z2.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exp: Vec<f32> = z2.iter().map(|z| (z - max).exp()).collect();
    let total: f32 = exp.iter().sum();
    let p: Vec<f32> = exp.iter().map(|e| e / total).collect();

    // db2 = mean over the two columns of (p - y)
    let db2: Vec<f32> = (0..OUTPUT_SIZE)
        .map(|i| {
            let y: f32 = labels.iter().filter(|&&l| l == i).count() as f32;
            (2.0 * p[i] - y) / 2.0
        })
        .collect();
    let db1: Vec<f32> = (0..HIDDEN_SIZE)
        .map(|k| {
            if b1[k] > 0.0 {
                (0..OUTPUT_SIZE).map(|i| initial.w2.get(i, k) * db2[i]).sum()
            } else {
                0.0
            }
        })
        .collect();

    for i in 0..OUTPUT_SIZE {
        let expected_b2 = initial.b2.get(i, 0) - lr * db2[i];
        assert_relative_eq!(trained.b2.get(i, 0), expected_b2, epsilon = 1e-5);
        for k in 0..HIDDEN_SIZE {
            let dw2 = db2[i] * a1[k];
            let expected_w2 = initial.w2.get(i, k) - lr * dw2;
            assert_relative_eq!(trained.w2.get(i, k), expected_w2, epsilon = 1e-5);
        }
    }
    for k in 0..HIDDEN_SIZE {
        assert_relative_eq!(trained.b1.get(k, 0), b1[k] - lr * db1[k], epsilon = 1e-5);
    }
    // dw1 = dz1 . x^T is exactly zero
    assert_eq!(trained.w1, initial.w1);
}

#[test]
fn zero_iterations_returns_initial_parameters() {
    let batch = Tensor::random(INPUT_SIZE, 3, 1);
    let initial = Parameters::init(&mut Pcg64::seed_from_u64(SEED));
    let mut rng = Pcg64::seed_from_u64(SEED);
    let trained = train_network(&batch, &[0, 1, 2], 0.1, 0, &mut rng).unwrap();
    assert_eq!(trained, initial);
}

#[test]
fn progress_is_reported_every_interval() {
    let batch = Tensor::random(INPUT_SIZE, 4, 2);
    let labels = [0, 1, 2, 3];
    let mut reports: Vec<Progress> = Vec::new();

    Trainer::new(0.1, 25)
        .report_every(10)
        .train(&batch, &labels, &mut Pcg64::seed_from_u64(SEED), |p| reports.push(*p))
        .unwrap();

    let iterations: Vec<usize> = reports.iter().map(|p| p.iteration).collect();
    assert_eq!(iterations, vec![0, 10, 20]);
    for report in &reports {
        assert!((0.0..=1.0).contains(&report.accuracy));
        assert!(report.loss.is_finite() && report.loss > 0.0);
    }
}

#[test]
fn progress_reflects_forward_pass_before_update() {
    let batch = Tensor::random(INPUT_SIZE, 6, 3);
    let labels = [0, 1, 2, 3, 4, 5];
    let mut reports: Vec<Progress> = Vec::new();

    Trainer::new(0.1, 1)
        .report_every(1)
        .train(&batch, &labels, &mut Pcg64::seed_from_u64(SEED), |p| reports.push(*p))
        .unwrap();

    // Same seed, so these are the parameters the single iteration started from.
    let initial = Parameters::init(&mut Pcg64::seed_from_u64(SEED));
    let before = initial.forward(&batch).unwrap();
    let targets = one_hot(&labels, OUTPUT_SIZE).unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].iteration, 0);
    assert_eq!(reports[0].accuracy, accuracy(&before.a2, &labels));
    let expected_loss = CategoricalCrossEntropy::forward(&before.a2, &targets).unwrap();
    assert_relative_eq!(reports[0].loss, expected_loss, epsilon = 1e-6);
}

#[test]
fn reporting_can_be_disabled() {
    let batch = Tensor::random(INPUT_SIZE, 2, 2);
    let mut calls = 0;
    Trainer::new(0.1, 5)
        .report_every(0)
        .train(&batch, &[1, 2], &mut Pcg64::seed_from_u64(SEED), |_| calls += 1)
        .unwrap();
    assert_eq!(calls, 0);
}

#[test]
fn rejects_invalid_inputs() {
    let mut rng = Pcg64::seed_from_u64(SEED);

    let wrong_rows = Tensor::zeros(100, 2);
    let err = train_network(&wrong_rows, &[0, 1], 0.1, 1, &mut rng).unwrap_err();
    assert!(matches!(err, TrainError::Shape(ShapeError::Mismatch { .. })));

    let batch = Tensor::zeros(INPUT_SIZE, 2);
    let err = train_network(&batch, &[0], 0.1, 1, &mut rng).unwrap_err();
    assert_eq!(err, TrainError::LabelCountMismatch { labels: 1, examples: 2 });

    let err = train_network(&batch, &[0, 12], 0.1, 1, &mut rng).unwrap_err();
    assert_eq!(err, TrainError::LabelOutOfRange { index: 1, label: 12, classes: OUTPUT_SIZE });

    let empty = Tensor::zeros(INPUT_SIZE, 0);
    let err = train_network(&empty, &[], 0.1, 1, &mut rng).unwrap_err();
    assert_eq!(err, TrainError::EmptyBatch);
}

// Each class lights up its own block of pixels.
fn block_dataset(per_class: usize) -> (Tensor, Vec<usize>) {
    let block = INPUT_SIZE / OUTPUT_SIZE;
    let mut pixels = Vec::new();
    let mut labels = Vec::new();
    for n in 0..per_class {
        for class in 0..OUTPUT_SIZE {
            let mut image = vec![0.0; INPUT_SIZE];
            for (i, px) in image.iter_mut().enumerate().skip(class * block).take(block) {
                // slight per-example variation
                *px = if (i + n) % 7 == 0 { 0.5 } else { 1.0 };
            }
            pixels.extend(image);
            labels.push(class);
        }
    }
    let rows = Tensor::from_flat(pixels, INPUT_SIZE).unwrap();
    (rows.into_transpose(), labels)
}

#[test]
fn training_learns_separable_classes() {
    let (batch, labels) = block_dataset(4);
    let mut reports = Vec::new();

    let params = Trainer::new(0.5, 300)
        .train(&batch, &labels, &mut Pcg64::seed_from_u64(SEED), |p| reports.push(*p))
        .unwrap();

    let first = reports.first().unwrap();
    let last = reports.last().unwrap();
    assert!(last.loss < first.loss, "loss went from {} to {}", first.loss, last.loss);

    let accuracy = evaluate_model(&params, &batch, &labels).unwrap();
    assert!(accuracy > 0.5, "accuracy {accuracy}");
    assert_eq!(predict(&params, &batch).unwrap().len(), labels.len());
}
