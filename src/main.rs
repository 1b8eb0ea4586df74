use std::env;
use std::error::Error;
use std::process;

use digit_mlp::config::TrainingConfig;
use digit_mlp::csv_data::CsvData;
use digit_mlp::helpers::evaluate_model;
use digit_mlp::training::log_progress;
use log::{debug, error, info};

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let data_path = args.next().unwrap_or_else(|| "train.csv".to_string());
    let config = match args.next() {
        Some(path) => TrainingConfig::load(path)?,
        None => TrainingConfig::default(),
    };
    debug!("{:?}", config);

    let data = CsvData::load_from_file(&data_path)?;
    let (dev, train) = data.split_dev(config.dev_size);
    info!("Got dev data: {} examples", dev.len());
    info!("Got train data: {} examples", train.len());

    let (train_batch, train_labels) = train.into_batch()?;
    let mut rng = config.rng();

    info!("Iterating...");
    let params = config
        .trainer()
        .train(&train_batch, &train_labels, &mut rng, log_progress)?;
    debug!("trained w2:\n{}", params.w2.preview());

    if !dev.is_empty() {
        let (dev_batch, dev_labels) = dev.into_batch()?;
        let accuracy = evaluate_model(&params, &dev_batch, &dev_labels)?;
        info!("Dev accuracy: {:.4}", accuracy);
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        error!("{}", err);
        process::exit(1);
    }
}
