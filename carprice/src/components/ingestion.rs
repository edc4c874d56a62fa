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

use log::{info, warn};
use polars::prelude::DataFrame;

use crate::components::DataIngestionArtifact;
use crate::config::DataIngestionConfig;
use crate::constants::{NUMERICAL_COLUMNS, TARGET_COLUMN};
use crate::data::{
    documents_to_frame, frame_to_documents, load_data, train_test_split, write_frame, CsvLoader,
};
use crate::errors::PipelineError;
use crate::schema::SchemaDescriptor;
use crate::store::DocumentStore;

/// Pulls the raw listings out of the document store and lays them down as
/// CSV: the full feature store plus a shuffled train/test split.
pub struct DataIngestion<S: DocumentStore> {
    config: DataIngestionConfig,
    store: S,
}

impl<S: DocumentStore> DataIngestion<S> {
    pub fn new(config: DataIngestionConfig, store: S) -> Self {
        DataIngestion { config, store }
    }

    pub fn config(&self) -> &DataIngestionConfig {
        &self.config
    }

    /// Reads the configured collection into a frame, without `_id` and with
    /// the `"na"` sentinel turned into nulls.
    pub fn export_collection_as_frame(&self) -> Result<DataFrame, PipelineError> {
        let documents =
            self.store.find_all(&self.config.database_name, &self.config.collection_name)?;
        let frame = documents_to_frame(&documents)?;
        info!(
            "Exported {} records with {} columns from {}/{}",
            frame.height(),
            frame.width(),
            self.config.database_name,
            self.config.collection_name
        );
        Ok(frame)
    }

    /// Writes the full frame and its column types next to it.
    pub fn export_frame_into_feature_store(&self, frame: &DataFrame) -> Result<(), PipelineError> {
        write_frame(frame, &self.config.feature_store_file_path)?;
        SchemaDescriptor::from_frame(frame).to_yaml_file(&self.config.schema_file_path)?;
        info!("Feature store written to {:?}", self.config.feature_store_file_path);
        Ok(())
    }

    pub fn split_frame_as_train_test(&self, frame: &DataFrame) -> Result<(), PipelineError> {
        let (train, test) = train_test_split(
            frame,
            self.config.train_test_split_ratio,
            self.config.split_seed,
        )?;
        info!(
            "Performed train test split: {} train rows, {} test rows",
            train.height(),
            test.height()
        );

        write_frame(&train, &self.config.training_file_path)?;
        write_frame(&test, &self.config.testing_file_path)?;
        info!(
            "Exported train and test files to {:?} and {:?}",
            self.config.training_file_path, self.config.testing_file_path
        );
        Ok(())
    }

    pub fn initiate_data_ingestion(&self) -> Result<DataIngestionArtifact, PipelineError> {
        info!("Starting data ingestion");
        let frame = self
            .export_collection_as_frame()
            .map_err(|e| PipelineError::in_stage("export collection", e))?;
        if frame.height() == 0 {
            warn!("Collection {} returned no records", self.config.collection_name);
        }
        self.export_frame_into_feature_store(&frame)
            .map_err(|e| PipelineError::in_stage("export feature store", e))?;
        self.split_frame_as_train_test(&frame)
            .map_err(|e| PipelineError::in_stage("train test split", e))?;

        Ok(DataIngestionArtifact {
            trained_file_path: self.config.training_file_path.clone(),
            test_file_path: self.config.testing_file_path.clone(),
            schema_file_path: self.config.schema_file_path.clone(),
        })
    }
}

/// Loads a CSV file and inserts its rows into `database/collection`.
///
/// Cells of the feature and target columns that parse as numbers are stored
/// as numbers; every other cell stays text. Returns the number of inserted
/// records.
pub fn push_csv_to_store<S: DocumentStore, P: AsRef<Path>>(
    store: &S,
    csv_path: P,
    database: &str,
    collection: &str,
) -> Result<usize, PipelineError> {
    let frame = load_data::<CsvLoader, _>(csv_path.as_ref())?;
    let numeric: Vec<&str> = NUMERICAL_COLUMNS.iter().copied().chain([TARGET_COLUMN]).collect();
    let documents = frame_to_documents(&frame, &numeric)?;
    let inserted = store.insert_many(database, collection, &documents)?;
    info!(
        "Inserted {} records from {:?} into {}/{}",
        inserted,
        csv_path.as_ref(),
        database,
        collection
    );
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainingPipelineConfig;
    use crate::data::error::DataError;
    use crate::data::{text_column, Document};
    use crate::errors::StoreError;
    use crate::store::JsonFileStore;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn listings(n: usize) -> Vec<Document> {
        (0..n)
            .map(|i| {
                json!({
                    "_id": format!("id{}", i),
                    "brand": if i % 3 == 0 { "na" } else { "Maruti" },
                    "vehicle_age": i % 10,
                    "selling_price": 100000 + i * 1000,
                })
                .as_object()
                .cloned()
                .unwrap()
            })
            .collect()
    }

    fn ingestion(root: &Path, seed: u64) -> DataIngestion<JsonFileStore> {
        let store = JsonFileStore::new(root.join("store"));
        let pipeline = TrainingPipelineConfig::new()
            .with_artifact_root(root.join("artifacts"))
            .with_timestamp("run");
        DataIngestion::new(DataIngestionConfig::new(&pipeline).with_seed(seed), store)
    }

    #[test]
    fn ingestion_writes_feature_store_and_split() {
        let dir = tempdir().unwrap();
        let ingestion = ingestion(dir.path(), 42);
        JsonFileStore::new(dir.path().join("store"))
            .insert_many("CardekhoData", "RefurbishedCarData", &listings(10))
            .unwrap();

        let artifact = ingestion.initiate_data_ingestion().unwrap();

        let full = load_data::<CsvLoader, _>(&ingestion.config().feature_store_file_path).unwrap();
        let train = load_data::<CsvLoader, _>(&artifact.trained_file_path).unwrap();
        let test = load_data::<CsvLoader, _>(&artifact.test_file_path).unwrap();

        assert_eq!(full.height(), 10);
        let names: Vec<&str> = full.get_columns().iter().map(|c| c.name().as_str()).collect();
        assert_eq!(names, vec!["brand", "vehicle_age", "selling_price"]);
        assert_eq!(text_column(&full, "brand").unwrap()[0], None);
        assert_eq!((train.height(), test.height()), (8, 2));

        let schema = SchemaDescriptor::from_yaml_file(&artifact.schema_file_path).unwrap();
        assert_eq!(schema.columns["brand"], "object");
        assert_eq!(schema.columns["selling_price"], "int64");
    }

    #[test]
    fn missing_collection_fails_with_stage_context() {
        let dir = tempdir().unwrap();
        let result = ingestion(dir.path(), 1).initiate_data_ingestion();

        let err = result.unwrap_err();
        assert!(err.to_string().starts_with("export collection failed"));
        assert!(matches!(err.root(), PipelineError::Store(StoreError::CollectionNotFound { .. })));
    }

    #[test]
    fn tiny_collection_cannot_be_split() {
        let dir = tempdir().unwrap();
        JsonFileStore::new(dir.path().join("store"))
            .insert_many("CardekhoData", "RefurbishedCarData", &listings(1))
            .unwrap();

        let err = ingestion(dir.path(), 1).initiate_data_ingestion().unwrap_err();
        assert!(matches!(err.root(), PipelineError::Data(DataError::EmptyPartition { .. })));
    }

    #[test]
    fn push_csv_inserts_every_row() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("cars.csv");
        fs::write(&csv_path, "brand,engine,mileage\nMaruti,1197,19.1\nHonda,,17\n").unwrap();
        let store = JsonFileStore::new(dir.path());

        let inserted = push_csv_to_store(&store, &csv_path, "db", "cars").unwrap();

        assert_eq!(inserted, 2);
        let docs = store.find_all("db", "cars").unwrap();
        assert_eq!(docs[0]["engine"], json!(1197));
        assert_eq!(docs[0]["mileage"], json!(19.1));
        assert_eq!(docs[1]["engine"], json!(null));
    }

    #[test]
    fn push_csv_keeps_text_columns_as_text() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("cars.csv");
        fs::write(&csv_path, "model,seats,selling_price
007,5,2.50
").unwrap();
        let store = JsonFileStore::new(dir.path());

        push_csv_to_store(&store, &csv_path, "db", "cars").unwrap();

        let docs = store.find_all("db", "cars").unwrap();
        assert_eq!(docs[0]["model"], json!("007"));
        assert_eq!(docs[0]["seats"], json!(5));
        assert_eq!(docs[0]["selling_price"], json!(2.5));
    }
}
