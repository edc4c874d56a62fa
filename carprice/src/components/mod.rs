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

//! The offline training pipeline: ingestion, transformation and training.
//!
//! Each stage consumes the artifact descriptor of the previous one and
//! returns its own. Failures are fatal for the run and carry the name of
//! the step that raised them.

pub mod ingestion;
pub mod trainer;
pub mod transformation;

pub use self::ingestion::{push_csv_to_store, DataIngestion};
pub use self::trainer::ModelTrainer;
pub use self::transformation::DataTransformation;

use std::path::PathBuf;

use log::info;

use crate::config::{
    DataIngestionConfig, DataTransformationConfig, ModelTrainerConfig, TrainingPipelineConfig,
};
use crate::errors::PipelineError;
use crate::metrics::RegressionMetrics;
use crate::store::DocumentStore;

#[derive(Debug, Clone, PartialEq)]
pub struct DataIngestionArtifact {
    pub trained_file_path: PathBuf,
    pub test_file_path: PathBuf,
    pub schema_file_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataTransformationArtifact {
    pub transformed_object_file_path: PathBuf,
    pub transformed_train_file_path: PathBuf,
    pub transformed_test_file_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelTrainerArtifact {
    pub trained_model_file_path: PathBuf,
    pub train_metrics: RegressionMetrics,
    pub test_metrics: RegressionMetrics,
}

/// Stage configurations for one run, derived from a [`TrainingPipelineConfig`].
#[derive(Debug, Clone)]
pub struct TrainingPipeline {
    pub ingestion: DataIngestionConfig,
    pub transformation: DataTransformationConfig,
    pub trainer: ModelTrainerConfig,
}

impl TrainingPipeline {
    pub fn new(config: &TrainingPipelineConfig) -> Self {
        TrainingPipeline {
            ingestion: DataIngestionConfig::new(config),
            transformation: DataTransformationConfig::new(config),
            trainer: ModelTrainerConfig::new(config),
        }
    }

    pub fn run<S: DocumentStore>(self, store: S) -> Result<ModelTrainerArtifact, PipelineError> {
        info!("Initiating data ingestion");
        let ingestion = DataIngestion::new(self.ingestion, store)
            .initiate_data_ingestion()
            .map_err(|e| PipelineError::in_stage("data ingestion", e))?;
        info!("Data ingestion completed: {:?}", ingestion);

        let transformation = DataTransformation::new(ingestion, self.transformation)
            .initiate_data_transformation()
            .map_err(|e| PipelineError::in_stage("data transformation", e))?;
        info!("Data transformation completed: {:?}", transformation);

        let trained = ModelTrainer::new(transformation, self.trainer)
            .initiate_model_trainer()
            .map_err(|e| PipelineError::in_stage("model trainer", e))?;
        info!("Model training completed: {:?}", trained);
        Ok(trained)
    }
}
