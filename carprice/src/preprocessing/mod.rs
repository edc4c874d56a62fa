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

//! Column-wise feature preprocessing.
//!
//! [`Preprocessor`] routes numeric columns through median imputation and
//! standard scaling, and categorical columns through most-frequent imputation
//! and one-hot encoding, then concatenates the two blocks as
//! `[numeric..., categorical...]`. Every parameter is learned by `fit` and
//! frozen; `transform` only replays them, so a persisted preprocessor yields
//! the same vectors at serving time as it did during training.

pub mod encoders;
pub mod imputers;

pub use encoders::OneHotEncoder;
pub use imputers::{MedianImputer, MostFrequentImputer};

use log::debug;
use ndarray::{concatenate, Array2, Axis};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::{CATEGORICAL_COLUMNS, NUMERICAL_COLUMNS};
use crate::data::{numeric_column, text_column};
use crate::errors::{ImputerError, PreprocessError};
use crate::scalers::StandardScaler;

/// A fit/transform step with parameters frozen at fit time.
pub trait Transformer {
    type Input;
    type Output;
    type Error: std::error::Error + 'static;

    fn fit(&mut self, x: &Self::Input) -> Result<(), Self::Error>;

    fn transform(&self, x: &Self::Input) -> Result<Self::Output, Self::Error>;

    fn fit_transform(&mut self, x: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.fit(x)?;
        self.transform(x)
    }
}

pub struct PreprocessorBuilder {
    numeric_columns: Vec<String>,
    categorical_columns: Vec<String>,
}

impl PreprocessorBuilder {
    pub fn numeric_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn categorical_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categorical_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Preprocessor {
        Preprocessor {
            numeric_columns: self.numeric_columns,
            categorical_columns: self.categorical_columns,
            numeric_imputer: MedianImputer::new(),
            scaler: StandardScaler::new(),
            categorical_imputer: MostFrequentImputer::new(),
            encoder: OneHotEncoder::new(),
            fitted: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preprocessor {
    numeric_columns: Vec<String>,
    categorical_columns: Vec<String>,
    numeric_imputer: MedianImputer,
    scaler: StandardScaler,
    categorical_imputer: MostFrequentImputer,
    encoder: OneHotEncoder,
    fitted: bool,
}

impl Preprocessor {
    /// Starts a builder preset with the car-listing feature columns.
    pub fn new() -> PreprocessorBuilder {
        PreprocessorBuilder {
            numeric_columns: NUMERICAL_COLUMNS.iter().map(|c| c.to_string()).collect(),
            categorical_columns: CATEGORICAL_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric_columns
    }

    pub fn categorical_columns(&self) -> &[String] {
        &self.categorical_columns
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    /// Learns medians, scaling parameters, modes and vocabularies from `frame`.
    ///
    /// Columns not named in the configuration are ignored.
    pub fn fit(&mut self, frame: &DataFrame) -> Result<(), PreprocessError> {
        if self.numeric_columns.is_empty() && self.categorical_columns.is_empty() {
            return Err(PreprocessError::NoFeatureColumns);
        }
        if frame.height() == 0 {
            return Err(PreprocessError::EmptyInput);
        }
        self.fitted = false;

        if !self.numeric_columns.is_empty() {
            let numeric = self.numeric_frame(frame)?;
            let imputed = self
                .numeric_imputer
                .fit_transform(&numeric)
                .map_err(|e| Self::name_column(e, &self.numeric_columns))?;
            self.scaler.fit(&imputed)?;
        }

        if !self.categorical_columns.is_empty() {
            let categorical = self.categorical_frame(frame)?;
            let imputed = self
                .categorical_imputer
                .fit_transform(&categorical)
                .map_err(|e| Self::name_column(e, &self.categorical_columns))?;
            self.encoder.fit(&imputed)?;
        }

        self.fitted = true;
        debug!(
            "Fitted preprocessor on {} rows: {} numeric, {} categorical, {} output features",
            frame.height(),
            self.numeric_columns.len(),
            self.categorical_columns.len(),
            self.n_features_out()
        );
        Ok(())
    }

    /// Maps `frame` to a `(rows, n_features_out)` matrix using the frozen fit.
    pub fn transform(&self, frame: &DataFrame) -> Result<Array2<f64>, PreprocessError> {
        if !self.fitted {
            return Err(PreprocessError::NotFitted);
        }

        let numeric = if self.numeric_columns.is_empty() {
            Array2::zeros((frame.height(), 0))
        } else {
            let raw = self.numeric_frame(frame)?;
            self.scaler.transform(&self.numeric_imputer.transform(&raw)?)?
        };

        let categorical = if self.categorical_columns.is_empty() {
            Array2::zeros((frame.height(), 0))
        } else {
            let raw = self.categorical_frame(frame)?;
            self.encoder.transform(&self.categorical_imputer.transform(&raw)?)?
        };

        Ok(concatenate(Axis(1), &[numeric.view(), categorical.view()])?)
    }

    pub fn fit_transform(&mut self, frame: &DataFrame) -> Result<Array2<f64>, PreprocessError> {
        self.fit(frame)?;
        self.transform(frame)
    }

    pub fn n_features_out(&self) -> usize {
        self.numeric_columns.len() + self.encoder.n_features_out()
    }

    /// Output column names: `num__<column>` then `cat__<column>_<category>`.
    pub fn feature_names(&self) -> Vec<String> {
        self.numeric_columns
            .iter()
            .map(|c| format!("num__{c}"))
            .chain(
                self.encoder
                    .feature_names(&self.categorical_columns)
                    .into_iter()
                    .map(|c| format!("cat__{c}")),
            )
            .collect()
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn numeric_imputer(&self) -> &MedianImputer {
        &self.numeric_imputer
    }

    pub fn categorical_imputer(&self) -> &MostFrequentImputer {
        &self.categorical_imputer
    }

    pub fn encoder(&self) -> &OneHotEncoder {
        &self.encoder
    }

    /// The configured numeric columns as `Float64`, nulls kept.
    fn numeric_frame(&self, frame: &DataFrame) -> Result<DataFrame, PreprocessError> {
        let columns = self
            .numeric_columns
            .iter()
            .map(|name| Ok(Series::new(name.as_str().into(), numeric_column(frame, name)?).into()))
            .collect::<Result<Vec<Column>, PreprocessError>>()?;
        Ok(DataFrame::new(columns)?)
    }

    /// The configured categorical columns as text, nulls kept.
    fn categorical_frame(&self, frame: &DataFrame) -> Result<DataFrame, PreprocessError> {
        let columns = self
            .categorical_columns
            .iter()
            .map(|name| Ok(Series::new(name.as_str().into(), text_column(frame, name)?).into()))
            .collect::<Result<Vec<Column>, PreprocessError>>()?;
        Ok(DataFrame::new(columns)?)
    }

    fn name_column(err: ImputerError, names: &[String]) -> PreprocessError {
        match err {
            ImputerError::NoObservedValues { column } => PreprocessError::EmptyColumn {
                column: names.get(column).cloned().unwrap_or_default(),
            },
            other => other.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn training_frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("vehicle_age".into(), &[Some("2"), Some("4"), None, Some("8")]).into(),
            Series::new("engine".into(), &[Some("1200"), None, Some("1500"), Some("1000")]).into(),
            Series::new("fuel_type".into(), &[Some("Petrol"), Some("Diesel"), Some("Petrol"), None])
                .into(),
            Series::new("brand".into(), &[Some("Maruti"), Some("Hyundai"), None, Some("Maruti")])
                .into(),
        ])
        .unwrap()
    }

    fn single_row(cells: [Option<&str>; 4]) -> DataFrame {
        DataFrame::new(
            ["vehicle_age", "engine", "fuel_type", "brand"]
                .iter()
                .zip(cells)
                .map(|(name, cell)| Series::new((*name).into(), [cell]).into())
                .collect(),
        )
        .unwrap()
    }

    fn preprocessor() -> Preprocessor {
        Preprocessor::new()
            .numeric_columns(["vehicle_age", "engine"])
            .categorical_columns(["fuel_type", "brand"])
            .build()
    }

    #[test]
    fn output_layout_is_numeric_then_categorical() {
        let mut pre = preprocessor();
        let out = pre.fit_transform(&training_frame()).unwrap();

        assert_eq!(out.dim(), (4, 2 + 2 + 2));
        assert_eq!(
            pre.feature_names(),
            vec![
                "num__vehicle_age",
                "num__engine",
                "cat__fuel_type_Diesel",
                "cat__fuel_type_Petrol",
                "cat__brand_Hyundai",
                "cat__brand_Maruti",
            ]
        );
    }

    #[test]
    fn missing_values_use_training_median_and_mode() {
        let mut pre = preprocessor();
        pre.fit(&training_frame()).unwrap();

        assert_eq!(pre.numeric_imputer().medians().unwrap().to_vec(), vec![4.0, 1200.0]);
        assert_eq!(
            pre.categorical_imputer().modes().unwrap(),
            &["Petrol".to_string(), "Maruti".to_string()]
        );

        let out = pre.transform(&single_row([None, None, None, None])).unwrap();

        let scaler = pre.scaler();
        let expected_age = (4.0 - scaler.mean().unwrap()[0]) / scaler.std().unwrap()[0];
        let expected_engine = (1200.0 - scaler.mean().unwrap()[1]) / scaler.std().unwrap()[1];
        assert_eq!(out[[0, 0]], expected_age);
        assert_eq!(out[[0, 1]], expected_engine);
        assert_eq!(out.row(0).slice(ndarray::s![2..]).to_vec(), vec![0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn unseen_category_is_ignored() {
        let mut pre = preprocessor();
        pre.fit(&training_frame()).unwrap();

        let row = single_row([Some("3"), Some("1100"), Some("Electric"), Some("Tesla")]);
        let out = pre.transform(&row).unwrap();

        assert!(out.row(0).slice(ndarray::s![2..]).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn transform_is_idempotent() {
        let mut pre = preprocessor();
        pre.fit(&training_frame()).unwrap();
        let first = pre.transform(&training_frame()).unwrap();
        let second = pre.transform(&training_frame()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn extra_columns_are_dropped() {
        let mut pre = Preprocessor::new()
            .numeric_columns(["engine"])
            .categorical_columns(Vec::<String>::new())
            .build();
        let out = pre.fit_transform(&training_frame()).unwrap();
        assert_eq!(out.ncols(), 1);
    }

    #[test]
    fn transform_before_fit_fails() {
        let pre = preprocessor();
        assert!(matches!(pre.transform(&training_frame()), Err(PreprocessError::NotFitted)));
    }

    #[test]
    fn missing_column_is_reported() {
        let mut pre = preprocessor();
        pre.fit(&training_frame()).unwrap();
        let without_brand = training_frame().drop("brand").unwrap();
        assert!(matches!(
            pre.transform(&without_brand),
            Err(PreprocessError::MissingColumn { column }) if column == "brand"
        ));
    }

    #[test]
    fn non_numeric_cell_is_reported() {
        let mut pre = preprocessor();
        let row = single_row([Some("old"), Some("1200"), Some("Petrol"), Some("Kia")]);
        assert!(matches!(
            pre.fit(&row),
            Err(PreprocessError::InvalidNumeric { row: 1, .. })
        ));
    }

    #[test]
    fn all_missing_column_names_the_column() {
        let mut pre = preprocessor();
        let row = single_row([Some("3"), None, Some("Petrol"), Some("Kia")]);
        assert!(matches!(
            pre.fit(&row),
            Err(PreprocessError::EmptyColumn { column }) if column == "engine"
        ));
    }

    #[test]
    fn rejects_empty_configuration() {
        let mut pre = Preprocessor::new()
            .numeric_columns(Vec::<String>::new())
            .categorical_columns(Vec::<String>::new())
            .build();
        assert!(matches!(pre.fit(&training_frame()), Err(PreprocessError::NoFeatureColumns)));
    }
}
