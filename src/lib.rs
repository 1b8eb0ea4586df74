pub mod activation_functions;
pub mod config;
pub mod csv_data;
pub mod error;
pub mod helpers;
pub mod loss_functions;
pub mod mlp;
pub mod tensor;
pub mod training;

pub use error::{DataError, ShapeError, TrainError};
pub use mlp::{Activations, Gradients, Parameters};
pub use tensor::Tensor;
pub use training::{train_network, Progress, Trainer};
