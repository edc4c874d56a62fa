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

use std::path::Path;

use log::{debug, info, warn};
use ndarray::{concatenate, Array1, Array2, Axis};
use polars::prelude::DataFrame;

use crate::artifacts::{copy_artifact, save_array, save_object};
use crate::components::{DataIngestionArtifact, DataTransformationArtifact};
use crate::config::DataTransformationConfig;
use crate::data::{load_data, split_features_target, CsvLoader};
use crate::errors::PipelineError;
use crate::preprocessing::Preprocessor;
use crate::schema::SchemaDescriptor;

/// Fits the preprocessor on the training split and materializes both splits
/// as numeric arrays with the target appended as the last column.
pub struct DataTransformation {
    ingestion: DataIngestionArtifact,
    config: DataTransformationConfig,
    preprocessor: Preprocessor,
}

impl DataTransformation {
    pub fn new(ingestion: DataIngestionArtifact, config: DataTransformationConfig) -> Self {
        DataTransformation { ingestion, config, preprocessor: Preprocessor::new().build() }
    }

    /// Replaces the default car-listing preprocessor, e.g. with other columns.
    pub fn with_preprocessor(mut self, preprocessor: Preprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    pub fn read_data<P: AsRef<Path>>(path: P) -> Result<DataFrame, PipelineError> {
        Ok(load_data::<CsvLoader, _>(path)?)
    }

    pub fn initiate_data_transformation(
        mut self,
    ) -> Result<DataTransformationArtifact, PipelineError> {
        info!("Starting data transformation");
        let train = Self::read_data(&self.ingestion.trained_file_path)
            .map_err(|e| PipelineError::in_stage("read train split", e))?;
        let test = Self::read_data(&self.ingestion.test_file_path)
            .map_err(|e| PipelineError::in_stage("read test split", e))?;
        self.check_schema(&train)?;
        info!("Train frame shape: ({}, {})", train.height(), train.width());
        info!("Test frame shape: ({}, {})", test.height(), test.width());

        let target = self.config.target_column.as_str();
        let (train_features, train_target) = split_features_target(&train, target)
            .map_err(|e| PipelineError::in_stage("separate train target", e))?;
        let (test_features, test_target) = split_features_target(&test, target)
            .map_err(|e| PipelineError::in_stage("separate test target", e))?;

        info!("Fitting preprocessor on training data");
        let train_x = self
            .preprocessor
            .fit_transform(&train_features)
            .map_err(|e| PipelineError::in_stage("fit preprocessor", e))?;
        let test_x = self
            .preprocessor
            .transform(&test_features)
            .map_err(|e| PipelineError::in_stage("transform test split", e))?;
        debug!("Preprocessor features: {:?}", self.preprocessor.feature_names());

        let train_arr = append_target(&train_x, &train_target)?;
        let test_arr = append_target(&test_x, &test_target)?;
        info!("Transformed train array shape: {:?}", train_arr.dim());
        info!("Transformed test array shape: {:?}", test_arr.dim());

        self.save(&train_arr, &test_arr)
            .map_err(|e| PipelineError::in_stage("save transformation artifacts", e))?;

        info!("Data transformation completed");
        Ok(DataTransformationArtifact {
            transformed_object_file_path: self.config.transformed_object_file_path.clone(),
            transformed_train_file_path: self.config.transformed_train_file_path.clone(),
            transformed_test_file_path: self.config.transformed_test_file_path.clone(),
        })
    }

    /// Warns about columns the ingested schema lists but the split lacks.
    fn check_schema(&self, frame: &DataFrame) -> Result<(), PipelineError> {
        let path = &self.ingestion.schema_file_path;
        if !path.is_file() {
            debug!("No schema at {:?}, skipping column check", path);
            return Ok(());
        }
        let schema = SchemaDescriptor::from_yaml_file(path)
            .map_err(|e| PipelineError::in_stage("read schema", e))?;
        let missing = schema.check(frame);
        if !missing.is_empty() {
            warn!("Train split lacks {} schema columns", missing.len());
        }
        Ok(())
    }

    fn save(&self, train_arr: &Array2<f64>, test_arr: &Array2<f64>) -> Result<(), PipelineError> {
        save_array(train_arr, &self.config.transformed_train_file_path)?;
        save_array(test_arr, &self.config.transformed_test_file_path)?;
        save_object(&self.preprocessor, &self.config.transformed_object_file_path)?;
        let copied =
            copy_artifact(&self.config.transformed_object_file_path, &self.config.final_model_dir)?;
        info!("Saved preprocessor to {:?} and {:?}", self.config.transformed_object_file_path, copied);
        Ok(())
    }
}

/// Stacks `target` onto `features` as a trailing column.
pub fn append_target(
    features: &Array2<f64>,
    target: &Array1<f64>,
) -> Result<Array2<f64>, PipelineError> {
    let target = target.view().insert_axis(Axis(1));
    Ok(concatenate(Axis(1), &[features.view(), target])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::{load_array, load_object};
    use crate::config::TrainingPipelineConfig;
    use crate::data::error::DataError;
    use crate::errors::ArtifactError;
    use ndarray::array;
    use std::fs;
    use tempfile::tempdir;

    const TRAIN_CSV: &str = "\
brand,km_driven,fuel_type,selling_price
Maruti,10000,Petrol,300000
Honda,,Diesel,550000
Maruti,30000,,350000
";

    const TEST_CSV: &str = "\
brand,km_driven,fuel_type,selling_price
Tesla,20000,Electric,4000000
";

    fn setup(root: &Path, train_csv: &str) -> DataTransformation {
        let ingestion = DataIngestionArtifact {
            trained_file_path: root.join("train.csv"),
            test_file_path: root.join("test.csv"),
            schema_file_path: root.join("schema.yaml"),
        };
        fs::write(&ingestion.trained_file_path, train_csv).unwrap();
        fs::write(&ingestion.test_file_path, TEST_CSV).unwrap();

        let pipeline = TrainingPipelineConfig::new()
            .with_artifact_root(root.join("artifacts"))
            .with_final_model_dir(root.join("final_model"))
            .with_timestamp("run");
        let preprocessor = Preprocessor::new()
            .numeric_columns(["km_driven"])
            .categorical_columns(["brand", "fuel_type"])
            .build();
        DataTransformation::new(ingestion, DataTransformationConfig::new(&pipeline))
            .with_preprocessor(preprocessor)
    }

    #[test]
    fn append_target_adds_last_column() {
        let stacked = append_target(&array![[1.0, 2.0], [3.0, 4.0]], &array![9.0, 8.0]).unwrap();
        assert_eq!(stacked, array![[1.0, 2.0, 9.0], [3.0, 4.0, 8.0]]);
    }

    #[test]
    fn transformation_persists_arrays_and_preprocessor() {
        let dir = tempdir().unwrap();
        let artifact = setup(dir.path(), TRAIN_CSV).initiate_data_transformation().unwrap();

        let train = load_array(&artifact.transformed_train_file_path).unwrap();
        let test = load_array(&artifact.transformed_test_file_path).unwrap();
        // km_driven + brand{Honda, Maruti} + fuel_type{Diesel, Petrol} + target
        assert_eq!(train.dim(), (3, 6));
        assert_eq!(test.dim(), (1, 6));
        assert_eq!(train.column(5), array![300000.0, 550000.0, 350000.0]);
        assert_eq!(test[[0, 5]], 4000000.0);
        // unseen brand and fuel type encode to zeros
        assert_eq!(test.slice(ndarray::s![0, 1..5]), array![0.0, 0.0, 0.0, 0.0]);

        let saved: Preprocessor = load_object(&artifact.transformed_object_file_path).unwrap();
        let published: Preprocessor =
            load_object(dir.path().join("final_model").join("preprocessor.bin")).unwrap();
        assert_eq!(saved, published);
        assert!(saved.is_fitted());
    }

    #[test]
    fn missing_target_writes_nothing() {
        let dir = tempdir().unwrap();
        let csv = "brand,km_driven,fuel_type,selling_price\nMaruti,10000,Petrol,\n";
        let transformation = setup(dir.path(), csv);
        let train_path = transformation.config.transformed_train_file_path.clone();

        let err = transformation.initiate_data_transformation().unwrap_err();

        assert!(matches!(err.root(), PipelineError::Data(DataError::MissingTarget { row: 1 })));
        assert!(matches!(load_array(&train_path), Err(ArtifactError::NotFound { .. })));
    }

    #[test]
    fn malformed_schema_fails_the_run() {
        let dir = tempdir().unwrap();
        let transformation = setup(dir.path(), TRAIN_CSV);
        fs::write(dir.path().join("schema.yaml"), "columns: [broken").unwrap();

        let err = transformation.initiate_data_transformation().unwrap_err();
        assert!(matches!(err.root(), PipelineError::Schema(_)));
    }

    #[test]
    fn missing_split_file_is_csv_error() {
        let dir = tempdir().unwrap();
        let transformation = setup(dir.path(), TRAIN_CSV);
        fs::remove_file(dir.path().join("test.csv")).unwrap();

        let err = transformation.initiate_data_transformation().unwrap_err();
        assert!(err.to_string().starts_with("read test split failed"));
    }
}
