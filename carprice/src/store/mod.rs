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

//! Access to named collections of JSON-like records.
//!
//! [`DocumentStore`] is the seam the ingestion component pulls from and the
//! push tool writes to. [`connect`] picks a backend from the connection
//! string:
//!
//! - `http://` / `https://` talk to a REST gateway ([`HttpStore`]),
//! - `file://dir` or a bare path read and write JSON files ([`JsonFileStore`]).

pub mod http;
pub mod json_file;

pub use self::http::HttpStore;
pub use self::json_file::JsonFileStore;

use crate::data::Document;
use crate::errors::StoreError;

pub trait DocumentStore {
    /// Returns every record in `database/collection`.
    fn find_all(&self, database: &str, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Appends `documents` to `database/collection` and returns how many were stored.
    fn insert_many(
        &self,
        database: &str,
        collection: &str,
        documents: &[Document],
    ) -> Result<usize, StoreError>;
}

impl DocumentStore for Box<dyn DocumentStore> {
    fn find_all(&self, database: &str, collection: &str) -> Result<Vec<Document>, StoreError> {
        (**self).find_all(database, collection)
    }

    fn insert_many(
        &self,
        database: &str,
        collection: &str,
        documents: &[Document],
    ) -> Result<usize, StoreError> {
        (**self).insert_many(database, collection, documents)
    }
}

/// Opens the store described by `connection`.
pub fn connect(connection: &str) -> Result<Box<dyn DocumentStore>, StoreError> {
    let connection = connection.trim();
    if connection.is_empty() {
        return Err(StoreError::InvalidConnectionString(connection.to_string()));
    }
    if connection.starts_with("http://") || connection.starts_with("https://") {
        return Ok(Box::new(HttpStore::new(connection)?));
    }
    if let Some(rest) = connection.strip_prefix("file://") {
        return Ok(Box::new(JsonFileStore::new(rest)));
    }
    if connection.contains("://") {
        return Err(StoreError::InvalidConnectionString(connection.to_string()));
    }
    Ok(Box::new(JsonFileStore::new(connection)))
}

/// Parses a JSON array payload into documents, rejecting non-object entries.
pub(crate) fn parse_documents(payload: &str) -> Result<Vec<Document>, StoreError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(payload)?;
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| match value {
            serde_json::Value::Object(map) => Ok(map),
            _ => Err(StoreError::NotAnObject { index }),
        })
        .collect()
}
