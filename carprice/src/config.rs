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

//! Paths and hyperparameters for one training run.
//!
//! Every run writes under `{artifact_root}/{timestamp}/`, so consecutive runs
//! never overwrite each other. Only the final-model directory is shared.

use std::path::PathBuf;

use chrono::Local;

use crate::constants::*;

const TIMESTAMP_FORMAT: &str = "%m_%d_%Y_%H_%M_%S";

#[derive(Debug, Clone)]
pub struct TrainingPipelineConfig {
    pub timestamp: String,
    pub artifact_root: PathBuf,
    pub final_model_dir: PathBuf,
}

impl TrainingPipelineConfig {
    pub fn new() -> Self {
        TrainingPipelineConfig {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            artifact_root: PathBuf::from(ARTIFACT_DIR),
            final_model_dir: PathBuf::from(FINAL_MODEL_DIR),
        }
    }

    pub fn with_artifact_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.artifact_root = root.into();
        self
    }

    pub fn with_final_model_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.final_model_dir = dir.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Directory holding this run's artifacts.
    pub fn artifact_dir(&self) -> PathBuf {
        self.artifact_root.join(&self.timestamp)
    }
}

impl Default for TrainingPipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct DataIngestionConfig {
    pub data_ingestion_dir: PathBuf,
    pub feature_store_file_path: PathBuf,
    pub schema_file_path: PathBuf,
    pub training_file_path: PathBuf,
    pub testing_file_path: PathBuf,
    pub train_test_split_ratio: f64,
    pub split_seed: Option<u64>,
    pub database_name: String,
    pub collection_name: String,
}

impl DataIngestionConfig {
    pub fn new(pipeline: &TrainingPipelineConfig) -> Self {
        let dir = pipeline.artifact_dir().join(DATA_INGESTION_DIR);
        DataIngestionConfig {
            feature_store_file_path: dir.join(FEATURE_STORE_DIR).join(RAW_FILE_NAME),
            schema_file_path: dir.join(FEATURE_STORE_DIR).join(SCHEMA_FILE_NAME),
            training_file_path: dir.join(INGESTED_DIR).join(TRAIN_FILE_NAME),
            testing_file_path: dir.join(INGESTED_DIR).join(TEST_FILE_NAME),
            data_ingestion_dir: dir,
            train_test_split_ratio: TRAIN_TEST_SPLIT_RATIO,
            split_seed: None,
            database_name: DATABASE_NAME.to_string(),
            collection_name: COLLECTION_NAME.to_string(),
        }
    }

    pub fn with_test_ratio(mut self, ratio: f64) -> Self {
        self.train_test_split_ratio = ratio;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.split_seed = Some(seed);
        self
    }

    pub fn with_database(mut self, database: &str) -> Self {
        self.database_name = database.to_string();
        self
    }

    pub fn with_collection(mut self, collection: &str) -> Self {
        self.collection_name = collection.to_string();
        self
    }
}

#[derive(Debug, Clone)]
pub struct DataTransformationConfig {
    pub data_transformation_dir: PathBuf,
    pub transformed_train_file_path: PathBuf,
    pub transformed_test_file_path: PathBuf,
    pub transformed_object_file_path: PathBuf,
    pub final_model_dir: PathBuf,
    pub target_column: String,
}

impl DataTransformationConfig {
    pub fn new(pipeline: &TrainingPipelineConfig) -> Self {
        let dir = pipeline.artifact_dir().join(DATA_TRANSFORMATION_DIR);
        DataTransformationConfig {
            transformed_train_file_path: dir
                .join(TRANSFORMED_DATA_DIR)
                .join(TRANSFORMED_TRAIN_FILE_NAME),
            transformed_test_file_path: dir.join(TRANSFORMED_DATA_DIR).join(TRANSFORMED_TEST_FILE_NAME),
            transformed_object_file_path: dir
                .join(TRANSFORMED_OBJECT_DIR)
                .join(PREPROCESSOR_FILE_NAME),
            data_transformation_dir: dir,
            final_model_dir: pipeline.final_model_dir.clone(),
            target_column: TARGET_COLUMN.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelTrainerConfig {
    pub model_trainer_dir: PathBuf,
    pub trained_model_file_path: PathBuf,
    pub final_model_dir: PathBuf,
    pub learning_rate: f64,
    pub epochs: usize,
}

impl ModelTrainerConfig {
    pub fn new(pipeline: &TrainingPipelineConfig) -> Self {
        let dir = pipeline.artifact_dir().join(MODEL_TRAINER_DIR);
        ModelTrainerConfig {
            trained_model_file_path: dir.join(TRAINED_MODEL_DIR).join(MODEL_FILE_NAME),
            model_trainer_dir: dir,
            final_model_dir: pipeline.final_model_dir.clone(),
            learning_rate: MODEL_LEARNING_RATE,
            epochs: MODEL_EPOCHS,
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn timestamp_has_expected_shape() {
        let config = TrainingPipelineConfig::new();
        let parts: Vec<&str> = config.timestamp.split('_').collect();
        assert_eq!(parts.len(), 6);
        assert!(parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit())));
        assert_eq!(parts[2].len(), 4);
    }

    #[test]
    fn stage_paths_live_under_run_directory() {
        let pipeline = TrainingPipelineConfig::new()
            .with_artifact_root("/tmp/runs")
            .with_timestamp("01_02_2025_10_00_00")
            .with_final_model_dir("/tmp/final");

        let ingestion = DataIngestionConfig::new(&pipeline).with_test_ratio(0.3).with_seed(7);
        assert_eq!(
            ingestion.training_file_path,
            Path::new("/tmp/runs/01_02_2025_10_00_00/data_ingestion/ingested/train.csv")
        );
        assert_eq!(
            ingestion.feature_store_file_path,
            Path::new("/tmp/runs/01_02_2025_10_00_00/data_ingestion/feature_store/car_data.csv")
        );
        assert_eq!(ingestion.train_test_split_ratio, 0.3);
        assert_eq!(ingestion.split_seed, Some(7));
        assert_eq!(ingestion.database_name, DATABASE_NAME);

        let transformation = DataTransformationConfig::new(&pipeline);
        assert!(transformation
            .transformed_object_file_path
            .ends_with("data_transformation/transformed_object/preprocessor.bin"));
        assert_eq!(transformation.final_model_dir, Path::new("/tmp/final"));

        let trainer = ModelTrainerConfig::new(&pipeline).with_epochs(10);
        assert!(trainer.trained_model_file_path.ends_with("model_trainer/trained_model/model.bin"));
        assert_eq!(trainer.epochs, 10);
        assert_eq!(trainer.learning_rate, MODEL_LEARNING_RATE);
    }
}
