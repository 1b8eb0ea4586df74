use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use log::{debug, info};

use crate::error::{DataError, ShapeError};
use crate::mlp::OUTPUT_SIZE;
use crate::tensor::Tensor;

/// Labelled images read from a `label,pixel,...` CSV, pixels scaled into `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvData {
    pub labels: Vec<usize>,
    /// Row-major, `width` values per example.
    pub pixels: Vec<f32>,
    pub width: usize,
}

impl CsvData {
    /// Reads a CSV whose first line is a header. Paths ending in `.gz` are decompressed.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        info!("Reading data from: {}", display);

        let file = File::open(path).map_err(|source| DataError::Io {
            path: display.clone(),
            source,
        })?;
        let reader: Box<dyn Read> = if display.ends_with(".gz") {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };

        let data = Self::parse(BufReader::new(reader), &display)?;
        info!("Got {} examples of {} pixels", data.len(), data.width);
        Ok(data)
    }

    pub fn parse<B: BufRead>(reader: B, source: &str) -> Result<Self, DataError> {
        let io_err = |err: std::io::Error| DataError::Io {
            path: source.to_string(),
            source: err,
        };
        let mut lines = reader.lines();

        let header = match lines.next() {
            Some(line) => line.map_err(io_err)?,
            None => return Err(DataError::MissingHeader { path: source.to_string() }),
        };
        let width = header.split(',').count().saturating_sub(1);
        debug!("header declares {} pixel columns", width);

        let mut labels = Vec::new();
        let mut pixels = Vec::new();
        for (idx, line) in lines.enumerate() {
            let line = line.map_err(io_err)?;
            let line_no = idx + 2;
            if line.trim().is_empty() {
                continue;
            }

            let mut fields = line.split(',').map(str::trim);
            let label = parse_field(fields.next().unwrap_or(""), line_no, 0)? as usize;
            if label >= OUTPUT_SIZE {
                return Err(DataError::LabelOutOfRange {
                    line: line_no,
                    label,
                    classes: OUTPUT_SIZE,
                });
            }

            let row_start = pixels.len();
            for (col, field) in fields.enumerate() {
                let value = parse_field(field, line_no, col + 1)?;
                if value > 255 {
                    return Err(DataError::PixelOutOfRange {
                        line: line_no,
                        column: col + 1,
                        value,
                    });
                }
                pixels.push(value as f32 / 255.0);
            }
            let got = pixels.len() - row_start;
            if got != width {
                return Err(DataError::RowWidth { line: line_no, expected: width, got });
            }
            labels.push(label);
        }

        Ok(CsvData { labels, pixels, width })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Splits off the first `dev_size` examples, returning `(dev, train)`.
    pub fn split_dev(mut self, dev_size: usize) -> (CsvData, CsvData) {
        let dev_size = dev_size.min(self.len());
        let train_labels = self.labels.split_off(dev_size);
        let train_pixels = self.pixels.split_off(dev_size * self.width);
        let train = CsvData {
            labels: train_labels,
            pixels: train_pixels,
            width: self.width,
        };
        (self, train)
    }

    /// One example per column, as the network expects.
    pub fn into_batch(self) -> Result<(Tensor, Vec<usize>), ShapeError> {
        let rows = Tensor::from_flat(self.pixels, self.width)?;
        Ok((rows.into_transpose(), self.labels))
    }
}

fn parse_field(field: &str, line: usize, column: usize) -> Result<u32, DataError> {
    field.parse::<u32>().map_err(|_| DataError::Parse {
        line,
        column,
        value: field.to_string(),
    })
}
