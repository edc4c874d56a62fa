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

//! Names and defaults shared by the training pipeline and the serving path.

pub const TARGET_COLUMN: &str = "selling_price";

pub const NUMERICAL_COLUMNS: [&str; 6] =
    ["vehicle_age", "km_driven", "mileage", "engine", "max_power", "seats"];

pub const CATEGORICAL_COLUMNS: [&str; 6] =
    ["car_name", "brand", "model", "seller_type", "fuel_type", "transmission_type"];

pub const DATABASE_NAME: &str = "CardekhoData";
pub const COLLECTION_NAME: &str = "RefurbishedCarData";

/// Environment variable holding the document-store connection string.
pub const CONNECTION_ENV_VAR: &str = "MONGO_DB_URL";

pub const ARTIFACT_DIR: &str = "artifacts";
pub const FINAL_MODEL_DIR: &str = "final_model";

pub const RAW_FILE_NAME: &str = "car_data.csv";
pub const TRAIN_FILE_NAME: &str = "train.csv";
pub const TEST_FILE_NAME: &str = "test.csv";
pub const SCHEMA_FILE_NAME: &str = "schema.yaml";

pub const DATA_INGESTION_DIR: &str = "data_ingestion";
pub const FEATURE_STORE_DIR: &str = "feature_store";
pub const INGESTED_DIR: &str = "ingested";
pub const TRAIN_TEST_SPLIT_RATIO: f64 = 0.2;

pub const DATA_TRANSFORMATION_DIR: &str = "data_transformation";
pub const TRANSFORMED_DATA_DIR: &str = "transformed";
pub const TRANSFORMED_OBJECT_DIR: &str = "transformed_object";
pub const TRANSFORMED_TRAIN_FILE_NAME: &str = "train.bin";
pub const TRANSFORMED_TEST_FILE_NAME: &str = "test.bin";
pub const PREPROCESSOR_FILE_NAME: &str = "preprocessor.bin";

pub const MODEL_TRAINER_DIR: &str = "model_trainer";
pub const TRAINED_MODEL_DIR: &str = "trained_model";
pub const MODEL_FILE_NAME: &str = "model.bin";
pub const MODEL_LEARNING_RATE: f64 = 0.05;
pub const MODEL_EPOCHS: usize = 2000;
