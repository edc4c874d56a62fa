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

//! Serving path: one raw listing in, one price out.
//!
//! [`PriceModel`] pairs the persisted preprocessor with the persisted
//! regressor. It is loaded once and then only read, so a single instance can
//! answer any number of requests.

use std::path::Path;

use log::{debug, error, info};
use ndarray::Array1;
use polars::prelude::DataFrame;

use crate::algorithms::LinearRegression;
use crate::artifacts::load_object;
use crate::constants::{MODEL_FILE_NAME, PREPROCESSOR_FILE_NAME};
use crate::errors::{ModelError, PreprocessError, ServiceError};
use crate::preprocessing::Preprocessor;
use crate::record::CarRecord;

pub struct PriceModel {
    preprocessor: Preprocessor,
    model: LinearRegression,
}

impl PriceModel {
    /// Pairs a fitted preprocessor with a fitted model of matching width.
    pub fn new(preprocessor: Preprocessor, model: LinearRegression) -> Result<Self, ServiceError> {
        if !preprocessor.is_fitted() {
            return Err(ServiceError::NotFitted { what: "preprocessor" });
        }
        let actual = model.n_features().ok_or(ServiceError::NotFitted { what: "model" })?;
        let expected = preprocessor.n_features_out();
        if expected != actual {
            return Err(ServiceError::SchemaMismatch { expected, actual });
        }
        Ok(PriceModel { preprocessor, model })
    }

    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        preprocessor_path: P,
        model_path: Q,
    ) -> Result<Self, ServiceError> {
        let preprocessor: Preprocessor = load_object(preprocessor_path.as_ref()).map_err(|e| {
            error!("Failed to load preprocessor: {}", e);
            ServiceError::from(e)
        })?;
        let model: LinearRegression = load_object(model_path.as_ref()).map_err(|e| {
            error!("Failed to load model: {}", e);
            ServiceError::from(e)
        })?;

        let price_model = Self::new(preprocessor, model).inspect_err(|e| error!("{}", e))?;
        info!(
            "Loaded price model ({} features) from {:?}",
            price_model.preprocessor.n_features_out(),
            model_path.as_ref()
        );
        Ok(price_model)
    }

    /// Loads `preprocessor.bin` and `model.bin` from the published model directory.
    pub fn from_final_model_dir<P: AsRef<Path>>(dir: P) -> Result<Self, ServiceError> {
        let dir = dir.as_ref();
        Self::load(dir.join(PREPROCESSOR_FILE_NAME), dir.join(MODEL_FILE_NAME))
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    pub fn model(&self) -> &LinearRegression {
        &self.model
    }

    /// Predicts the selling price of one listing.
    pub fn predict(&self, record: &CarRecord) -> Result<f64, ServiceError> {
        let frame = record.to_frame().map_err(PreprocessError::from)?;
        let predictions = self.predict_frame(&frame)?;
        predictions
            .iter()
            .next()
            .copied()
            .ok_or(ServiceError::Prediction(ModelError::DimensionMismatch {
                expected: 1,
                actual: 0,
            }))
    }

    /// Predicts one price per row of `frame`. Extra columns are ignored.
    pub fn predict_frame(&self, frame: &DataFrame) -> Result<Array1<f64>, ServiceError> {
        let features = self.preprocessor.transform(frame)?;
        let predictions = self.model.predict(&features)?;
        if let Some(&value) = predictions.iter().find(|v| !v.is_finite()) {
            return Err(ServiceError::NonFinitePrediction { value });
        }
        debug!("Predicted {} prices", predictions.len());
        Ok(predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::save_object;
    use polars::prelude::{DataFrame, NamedFrom, Series};
    use crate::record::{FuelType, SellerType, TransmissionType};
    use tempfile::tempdir;

    fn history() -> DataFrame {
        let rows = [
            ["Maruti", "Swift", "3", "30000", "Petrol", "450000"],
            ["Maruti", "Swift", "6", "60000", "Petrol", "350000"],
            ["Hyundai", "i20", "2", "20000", "Diesel", "650000"],
            ["Hyundai", "i20", "5", "50000", "Diesel", "500000"],
            ["Honda", "City", "4", "40000", "Petrol", "700000"],
        ];
        let names = ["brand", "model", "vehicle_age", "km_driven", "fuel_type", "selling_price"];
        DataFrame::new(
            names
                .iter()
                .enumerate()
                .map(|(c, name)| {
                    let values: Vec<&str> = rows.iter().map(|row| row[c]).collect();
                    Series::new((*name).into(), values).into()
                })
                .collect(),
        )
        .unwrap()
    }

    fn fitted() -> (Preprocessor, LinearRegression) {
        let (features, target) =
            crate::data::split_features_target(&history(), "selling_price").unwrap();
        let mut preprocessor = Preprocessor::new()
            .numeric_columns(["vehicle_age", "km_driven"])
            .categorical_columns(["brand", "fuel_type"])
            .build();
        let x = preprocessor.fit_transform(&features).unwrap();
        let mut model = LinearRegression::new();
        model.fit(&x, &target, 0.05, 500).unwrap();
        (preprocessor, model)
    }

    fn record() -> CarRecord {
        CarRecord {
            brand: Some("Maruti".into()),
            model: Some("Swift".into()),
            vehicle_age: Some(4),
            km_driven: Some(40000),
            seller_type: Some(SellerType::Individual),
            fuel_type: Some(FuelType::Petrol),
            transmission_type: Some(TransmissionType::Manual),
            ..Default::default()
        }
    }

    #[test]
    fn predicts_positive_finite_price() {
        let (preprocessor, model) = fitted();
        let service = PriceModel::new(preprocessor, model).unwrap();
        let price = service.predict(&record()).unwrap();
        assert!(price.is_finite() && price > 0.0, "price {}", price);
    }

    #[test]
    fn unseen_category_still_predicts() {
        let (preprocessor, model) = fitted();
        let service = PriceModel::new(preprocessor, model).unwrap();
        let record = CarRecord { brand: Some("Tesla".into()), ..record() };
        assert!(service.predict(&record).is_ok());
    }

    #[test]
    fn width_mismatch_is_schema_error() {
        let (preprocessor, _) = fitted();
        let mut narrow = LinearRegression::new();
        narrow.fit(&ndarray::array![[1.0], [2.0]], &Array1::from(vec![1.0, 2.0]), 0.1, 10).unwrap();

        let result = PriceModel::new(preprocessor, narrow);
        assert!(matches!(result, Err(ServiceError::SchemaMismatch { expected: 7, actual: 1 })));
    }

    #[test]
    fn unfitted_parts_are_rejected() {
        let (preprocessor, model) = fitted();
        assert!(matches!(
            PriceModel::new(Preprocessor::new().build(), model),
            Err(ServiceError::NotFitted { what: "preprocessor" })
        ));
        assert!(matches!(
            PriceModel::new(preprocessor, LinearRegression::new()),
            Err(ServiceError::NotFitted { what: "model" })
        ));
    }

    #[test]
    fn missing_artifacts_are_typed() {
        let dir = tempdir().unwrap();
        let result = PriceModel::from_final_model_dir(dir.path());
        assert!(matches!(result, Err(ServiceError::ArtifactNotFound { .. })));
    }

    #[test]
    fn loaded_model_matches_in_memory_model() {
        let dir = tempdir().unwrap();
        let (preprocessor, model) = fitted();
        save_object(&preprocessor, dir.path().join(PREPROCESSOR_FILE_NAME)).unwrap();
        save_object(&model, dir.path().join(MODEL_FILE_NAME)).unwrap();

        let in_memory = PriceModel::new(preprocessor, model).unwrap();
        let loaded = PriceModel::from_final_model_dir(dir.path()).unwrap();

        assert_eq!(in_memory.predict(&record()).unwrap(), loaded.predict(&record()).unwrap());
    }

    #[test]
    fn malformed_numeric_input_is_invalid_record() {
        let (preprocessor, model) = fitted();
        let service = PriceModel::new(preprocessor, model).unwrap();
        let frame = DataFrame::new(vec![
            Series::new("brand".into(), &[Some("Maruti")]).into(),
            Series::new("fuel_type".into(), &[None::<&str>]).into(),
            Series::new("vehicle_age".into(), &[Some("old")]).into(),
            Series::new("km_driven".into(), &[None::<&str>]).into(),
        ])
        .unwrap();
        assert!(matches!(
            service.predict_frame(&frame),
            Err(ServiceError::InvalidRecord(PreprocessError::InvalidNumeric { .. }))
        ));
    }
}
