use std::error::Error;
use std::fmt;
use std::io;

/// Operand dimensions that cannot be combined by the requested operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// Two operands whose shapes are incompatible for `op`.
    Mismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },
    /// A flat buffer whose length is not a whole number of rows of `width`.
    RaggedData { len: usize, width: usize },
}

impl ShapeError {
    pub(crate) fn mismatch(op: &'static str, left: (usize, usize), right: (usize, usize)) -> Self {
        ShapeError::Mismatch { op, left, right }
    }
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::Mismatch { op, left, right } => write!(
                f,
                "{op}: incompatible shapes ({},{}) vs ({},{})",
                left.0, left.1, right.0, right.1
            ),
            ShapeError::RaggedData { len, width } => write!(
                f,
                "cannot split {len} values into rows of width {width}"
            ),
        }
    }
}

impl Error for ShapeError {}

/// Reasons a training or evaluation call rejects its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainError {
    Shape(ShapeError),
    LabelCountMismatch { labels: usize, examples: usize },
    LabelOutOfRange { index: usize, label: usize, classes: usize },
    EmptyBatch,
}

impl fmt::Display for TrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainError::Shape(err) => write!(f, "{err}"),
            TrainError::LabelCountMismatch { labels, examples } => write!(
                f,
                "got {labels} labels for a batch of {examples} examples"
            ),
            TrainError::LabelOutOfRange { index, label, classes } => write!(
                f,
                "label {label} of example {index} is outside 0..{classes}"
            ),
            TrainError::EmptyBatch => write!(f, "batch contains no examples"),
        }
    }
}

impl Error for TrainError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TrainError::Shape(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShapeError> for TrainError {
    fn from(err: ShapeError) -> Self {
        TrainError::Shape(err)
    }
}

/// Failures while reading a labelled pixel CSV or a training config.
#[derive(Debug)]
pub enum DataError {
    Io { path: String, source: io::Error },
    MissingHeader { path: String },
    Parse { line: usize, column: usize, value: String },
    RowWidth { line: usize, expected: usize, got: usize },
    PixelOutOfRange { line: usize, column: usize, value: u32 },
    LabelOutOfRange { line: usize, label: usize, classes: usize },
    Config { path: String, source: serde_json::Error },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Io { path, source } => write!(f, "failed to read '{path}': {source}"),
            DataError::MissingHeader { path } => {
                write!(f, "'{path}' is empty, expected a header line")
            }
            DataError::Parse { line, column, value } => write!(
                f,
                "line {line}, column {column}: '{value}' is not an unsigned integer"
            ),
            DataError::RowWidth { line, expected, got } => write!(
                f,
                "line {line}: expected {expected} pixel columns, got {got}"
            ),
            DataError::PixelOutOfRange { line, column, value } => write!(
                f,
                "line {line}, column {column}: pixel value {value} exceeds 255"
            ),
            DataError::LabelOutOfRange { line, label, classes } => write!(
                f,
                "line {line}: label {label} is outside 0..{classes}"
            ),
            DataError::Config { path, source } => write!(f, "invalid config '{path}': {source}"),
        }
    }
}

impl Error for DataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DataError::Io { source, .. } => Some(source),
            DataError::Config { source, .. } => Some(source),
            _ => None,
        }
    }
}
