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

use log::info;
use ndarray::{s, Array1, Array2};

use crate::algorithms::LinearRegression;
use crate::artifacts::{copy_artifact, load_array, save_object};
use crate::components::{DataTransformationArtifact, ModelTrainerArtifact};
use crate::config::ModelTrainerConfig;
use crate::errors::PipelineError;
use crate::metrics::RegressionMetrics;

pub struct ModelTrainer {
    transformation: DataTransformationArtifact,
    config: ModelTrainerConfig,
}

impl ModelTrainer {
    pub fn new(transformation: DataTransformationArtifact, config: ModelTrainerConfig) -> Self {
        ModelTrainer { transformation, config }
    }

    pub fn initiate_model_trainer(&self) -> Result<ModelTrainerArtifact, PipelineError> {
        info!("Starting model training");
        let train = load_array(&self.transformation.transformed_train_file_path)
            .map_err(|e| PipelineError::in_stage("load train array", e))?;
        let test = load_array(&self.transformation.transformed_test_file_path)
            .map_err(|e| PipelineError::in_stage("load test array", e))?;

        let (x_train, y_train) = split_last_column(&train)?;
        let (x_test, y_test) = split_last_column(&test)?;

        let mut model = LinearRegression::new();
        model
            .fit(&x_train, &y_train, self.config.learning_rate, self.config.epochs)
            .map_err(|e| PipelineError::in_stage("fit model", e))?;

        let train_metrics = evaluate(&model, &x_train, &y_train)
            .map_err(|e| PipelineError::in_stage("evaluate train split", e))?;
        let test_metrics = evaluate(&model, &x_test, &y_test)
            .map_err(|e| PipelineError::in_stage("evaluate test split", e))?;
        info!("Train metrics: {}", train_metrics);
        info!("Test metrics: {}", test_metrics);

        let model_path = &self.config.trained_model_file_path;
        save_object(&model, model_path)
            .and_then(|_| copy_artifact(model_path, &self.config.final_model_dir))
            .map_err(|e| PipelineError::in_stage("save model", e))?;
        info!("Model saved to {:?}", model_path);

        Ok(ModelTrainerArtifact {
            trained_model_file_path: self.config.trained_model_file_path.clone(),
            train_metrics,
            test_metrics,
        })
    }
}

/// Splits a transformed array into its feature block and trailing target.
pub fn split_last_column(
    array: &Array2<f64>,
) -> Result<(Array2<f64>, Array1<f64>), PipelineError> {
    let columns = array.ncols();
    if columns < 2 {
        return Err(PipelineError::ArrayTooNarrow { columns });
    }
    Ok((array.slice(s![.., ..columns - 1]).to_owned(), array.column(columns - 1).to_owned()))
}

fn evaluate(
    model: &LinearRegression,
    x: &Array2<f64>,
    y: &Array1<f64>,
) -> Result<RegressionMetrics, PipelineError> {
    let predictions = model.predict(x)?;
    Ok(RegressionMetrics::evaluate(&predictions, y)?)
}
