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

use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::data::Document;
use crate::errors::StoreError;
use crate::store::{parse_documents, DocumentStore};

/// Talks to a REST gateway exposing collections at `{base}/{database}/{collection}`.
///
/// `GET` returns the collection as a JSON array; `POST` with a JSON array
/// appends to it.
pub struct HttpStore {
    base_url: String,
    client: Client,
}

impl HttpStore {
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let client = Client::builder()
            .build()
            .map_err(|source| StoreError::Connectivity { url: base_url.clone(), source })?;
        Ok(HttpStore { base_url, client })
    }

    pub fn collection_url(&self, database: &str, collection: &str) -> String {
        format!("{}/{}/{}", self.base_url, database, collection)
    }
}

impl DocumentStore for HttpStore {
    fn find_all(&self, database: &str, collection: &str) -> Result<Vec<Document>, StoreError> {
        let url = self.collection_url(database, collection);
        let connectivity = |source| StoreError::Connectivity { url: url.clone(), source };

        let response = self.client.get(&url).send().map_err(connectivity)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::CollectionNotFound {
                database: database.to_string(),
                collection: collection.to_string(),
            });
        }
        let payload = response
            .error_for_status()
            .and_then(|response| response.text())
            .map_err(connectivity)?;
        let documents = parse_documents(&payload)?;

        debug!("Fetched {} documents from {}", documents.len(), url);
        Ok(documents)
    }

    fn insert_many(
        &self,
        database: &str,
        collection: &str,
        documents: &[Document],
    ) -> Result<usize, StoreError> {
        let url = self.collection_url(database, collection);
        let connectivity = |source| StoreError::Connectivity { url: url.clone(), source };

        self.client
            .post(&url)
            .json(documents)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(connectivity)?;

        info!("Posted {} documents to {}", documents.len(), url);
        Ok(documents.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_url_joins_segments() {
        let store = HttpStore::new("http://localhost:8080/api/").unwrap();
        assert_eq!(
            store.collection_url("CardekhoData", "RefurbishedCarData"),
            "http://localhost:8080/api/CardekhoData/RefurbishedCarData"
        );
    }

    #[test]
    fn unreachable_host_is_a_connectivity_error() {
        let store = HttpStore::new("http://127.0.0.1:9").unwrap();
        let result = store.find_all("db", "cars");
        assert!(matches!(result, Err(StoreError::Connectivity { .. })));
    }
}
