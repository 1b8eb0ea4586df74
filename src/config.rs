//! Training configuration, optionally read from a JSON file.
//!
//! Every field has a default, so a config file only needs the values it overrides:
//!
//! ```json
//! { "learning_rate": 0.05, "iterations": 200, "seed": 42 }
//! ```

use std::fs;
use std::path::Path;

use log::warn;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::Deserialize;

use crate::error::DataError;
use crate::training::{Trainer, DEFAULT_REPORT_EVERY};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    pub learning_rate: f32,
    pub iterations: usize,
    /// Iterations between progress reports; 0 disables them.
    pub report_every: usize,
    /// Leading CSV rows held out for evaluation.
    pub dev_size: usize,
    /// Seed for parameter initialization. Without one every run differs.
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            learning_rate: 0.1,
            iterations: 500,
            report_every: DEFAULT_REPORT_EVERY,
            dev_size: 1000,
            seed: None,
        }
    }
}

impl TrainingConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: TrainingConfig = serde_json::from_str(json)?;
        if config.learning_rate.is_nan() || config.learning_rate <= 0.0 {
            warn!(
                "learning_rate {} is not positive; training will not descend",
                config.learning_rate
            );
        }
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|source| DataError::Io {
            path: name.clone(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| DataError::Config { path: name, source })
    }

    pub fn trainer(&self) -> Trainer {
        Trainer::new(self.learning_rate, self.iterations).report_every(self.report_every)
    }

    pub fn rng(&self) -> Pcg64 {
        match self.seed {
            Some(seed) => Pcg64::seed_from_u64(seed),
            None => Pcg64::from_entropy(),
        }
    }
}
