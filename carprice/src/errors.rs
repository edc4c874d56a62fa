// BSD 3-Clause License
//
// Copyright (c) 2025, BlackPortal ○
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this
//    list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
//    this list of conditions and the following disclaimer in the documentation
//    and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived from
//    this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

pub use crate::data::error::{CsvError, DataError};

#[derive(Error, Debug)]
pub enum ScalerError {
    #[error("Input is empty")]
    EmptyInput,

    #[error("Scaler has not been fitted")]
    NotFitted,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Input contains non-finite values")]
    InvalidNumericValue,
}

#[derive(Error, Debug)]
pub enum ImputerError {
    #[error("Input is empty")]
    EmptyInput,

    #[error("Imputer has not been fitted")]
    NotFitted,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Column {column} has no observed values to impute from")]
    NoObservedValues { column: usize },

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

#[derive(Error, Debug)]
pub enum EncoderError {
    #[error("Input is empty")]
    EmptyInput,

    #[error("Encoder has not been fitted")]
    NotFitted,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("Scaler error: {0}")]
    Scaler(#[from] ScalerError),

    #[error("Imputer error: {0}")]
    Imputer(#[from] ImputerError),

    #[error("Encoder error: {0}")]
    Encoder(#[from] EncoderError),

    #[error("Input frame is empty")]
    EmptyInput,

    #[error("Preprocessor has no feature columns configured")]
    NoFeatureColumns,

    #[error("Preprocessor has not been fitted")]
    NotFitted,

    #[error("Missing feature column '{column}'")]
    MissingColumn { column: String },

    #[error("Column '{column}' has no observed values at fit time")]
    EmptyColumn { column: String },

    #[error("Invalid numeric value '{value}' in column '{column}' at row {row}")]
    InvalidNumeric { column: String, row: usize, value: String },

    #[error("Failed to assemble feature matrix: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("Data error: {0}")]
    Data(DataError),
}

impl From<DataError> for PreprocessError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::MissingColumn { column } => PreprocessError::MissingColumn { column },
            DataError::InvalidNumeric { column, row, value } => {
                PreprocessError::InvalidNumeric { column, row, value }
            }
            DataError::Polars(source) => PreprocessError::Polars(source),
            other => PreprocessError::Data(other),
        }
    }
}

#[derive(Error, Debug)]
pub enum LossError {
    #[error("Input is empty")]
    EmptyInput,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Input contains non-finite values")]
    InvalidNumericValue,
}

#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("Input is empty")]
    EmptyInput,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Input contains non-finite values")]
    InvalidNumericValue,

    #[error("Gradients became non-finite")]
    NumericalInstability,
}

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Scaler error: {0}")]
    Scaler(#[from] ScalerError),

    #[error("Loss error: {0}")]
    Loss(#[from] LossError),

    #[error("Optimizer error: {0}")]
    Optimizer(#[from] OptimizerError),

    #[error("Model has not been fitted")]
    NotFitted,

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Artifact not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error on artifact {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("Failed to encode artifact {}: {source}", path.display())]
    Encode { path: PathBuf, source: bincode::Error },

    #[error("Failed to decode artifact {}: {source}", path.display())]
    Decode { path: PathBuf, source: bincode::Error },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Unsupported connection string '{0}'")]
    InvalidConnectionString(String),

    #[error("Failed to reach document store at {url}: {source}")]
    Connectivity { url: String, source: reqwest::Error },

    #[error("Collection '{database}/{collection}' not found")]
    CollectionNotFound { database: String, collection: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("Malformed collection payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Document at index {index} is not an object")]
    NotAnObject { index: usize },
}

/// A categorical field received a value outside its fixed set.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown {field} '{value}'")]
pub struct ParseCategoryError {
    pub field: &'static str,
    pub value: String,
}

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("I/O error on schema {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("Invalid schema YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Rejected or unavailable form input.
#[derive(Error, Debug)]
pub enum FormError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange { field: &'static str, value: String, min: String, max: String },

    #[error("{field} expects a number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{field} has no options to choose from")]
    NoOptions { field: &'static str },

    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the offline training pipeline.
///
/// Every failure here is fatal for the run. Components wrap their errors with
/// [`PipelineError::in_stage`] so the report names the stage that failed.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{stage} failed: {source}")]
    Stage { stage: &'static str, source: Box<PipelineError> },

    #[error("Document store error: {0}")]
    Store(#[from] StoreError),

    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Preprocessing error: {0}")]
    Preprocess(#[from] PreprocessError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Metric error: {0}")]
    Loss(#[from] LossError),

    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Failed to shape array: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Transformed array has {columns} columns, need at least one feature and the target")]
    ArrayTooNarrow { columns: usize },
}

impl PipelineError {
    pub fn in_stage(stage: &'static str, source: impl Into<PipelineError>) -> Self {
        PipelineError::Stage { stage, source: Box::new(source.into()) }
    }

    /// Strips stage wrappers and returns the underlying failure.
    pub fn root(&self) -> &PipelineError {
        match self {
            PipelineError::Stage { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Errors surfaced by the serving path.
///
/// The service never substitutes a default price; callers decide how to
/// degrade.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Artifact not found: {}", path.display())]
    ArtifactNotFound { path: PathBuf },

    #[error("Failed to load artifact: {0}")]
    Artifact(#[source] ArtifactError),

    #[error("{what} has not been fitted")]
    NotFitted { what: &'static str },

    #[error("Schema mismatch: preprocessor emits {expected} features, model expects {actual}")]
    SchemaMismatch { expected: usize, actual: usize },

    #[error("Invalid input record: {0}")]
    InvalidRecord(#[from] PreprocessError),

    #[error("Prediction failed: {0}")]
    Prediction(#[from] ModelError),

    #[error("Model produced a non-finite prediction: {value}")]
    NonFinitePrediction { value: f64 },
}

impl From<ArtifactError> for ServiceError {
    fn from(err: ArtifactError) -> Self {
        match err {
            ArtifactError::NotFound { path } => ServiceError::ArtifactNotFound { path },
            other => ServiceError::Artifact(other),
        }
    }
}
