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

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::data::Document;
use crate::errors::StoreError;
use crate::store::{parse_documents, DocumentStore};

/// Stores each collection as a JSON array at `{root}/{database}/{collection}.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        JsonFileStore { root: root.as_ref().to_path_buf() }
    }

    pub fn collection_path(&self, database: &str, collection: &str) -> PathBuf {
        self.root.join(database).join(format!("{}.json", collection))
    }

    fn read(&self, path: &Path) -> Result<Option<Vec<Document>>, StoreError> {
        match fs::read_to_string(path) {
            Ok(payload) => parse_documents(&payload).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path: path.to_path_buf(), source }),
        }
    }
}

impl DocumentStore for JsonFileStore {
    fn find_all(&self, database: &str, collection: &str) -> Result<Vec<Document>, StoreError> {
        let path = self.collection_path(database, collection);
        let documents = self.read(&path)?.ok_or_else(|| StoreError::CollectionNotFound {
            database: database.to_string(),
            collection: collection.to_string(),
        })?;
        debug!("Read {} documents from {:?}", documents.len(), path);
        Ok(documents)
    }

    fn insert_many(
        &self,
        database: &str,
        collection: &str,
        documents: &[Document],
    ) -> Result<usize, StoreError> {
        let path = self.collection_path(database, collection);
        let mut existing = self.read(&path)?.unwrap_or_default();
        existing.extend_from_slice(documents);

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .map_err(|source| StoreError::Io { path: dir.to_path_buf(), source })?;
        }
        let payload = serde_json::to_string_pretty(&existing)?;
        fs::write(&path, payload).map_err(|source| StoreError::Io { path: path.clone(), source })?;

        info!("Inserted {} documents into {:?}", documents.len(), path);
        Ok(documents.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn missing_collection_is_reported() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        let result = store.find_all("CardekhoData", "RefurbishedCarData");
        assert!(matches!(result, Err(StoreError::CollectionNotFound { .. })));
    }

    #[test]
    fn insert_appends_to_existing_collection() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        store.insert_many("db", "cars", &[doc(json!({"brand": "Maruti", "seats": 5}))]).unwrap();
        let inserted = store
            .insert_many(
                "db",
                "cars",
                &[doc(json!({"brand": "Honda", "seats": 5})), doc(json!({"brand": "na"}))],
            )
            .unwrap();

        assert_eq!(inserted, 2);
        let all = store.find_all("db", "cars").unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[1]["brand"], json!("Honda"));
        assert!(store.collection_path("db", "cars").ends_with("db/cars.json"));
    }

    #[test]
    fn malformed_collection_is_an_error() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        let path = store.collection_path("db", "cars");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        assert!(matches!(store.find_all("db", "cars"), Err(StoreError::Json(_))));
    }
}
