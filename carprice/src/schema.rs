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

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use polars::prelude::DataFrame;

use crate::errors::SchemaError;

/// Column types of a dataset as recorded in a YAML side-file.
///
/// The descriptor is advisory: [`SchemaDescriptor::check`] reports problems
/// as warnings and never rejects a frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    pub columns: BTreeMap<String, String>,
    #[serde(default)]
    pub numerical_columns: Vec<String>,
}

impl SchemaDescriptor {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|source| SchemaError::Io { path: path.to_path_buf(), source })?;
        Ok(serde_yaml::from_str(&text)?)
    }

    pub fn to_yaml_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SchemaError> {
        let path = path.as_ref();
        let text = serde_yaml::to_string(self)?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .map_err(|source| SchemaError::Io { path: dir.to_path_buf(), source })?;
        }
        fs::write(path, text).map_err(|source| SchemaError::Io { path: path.to_path_buf(), source })
    }

    /// Records `int64`, `float64` or `object` for every column of `frame`.
    ///
    /// Integer and float columns are numerical; every other dtype is `object`.
    pub fn from_frame(frame: &DataFrame) -> Self {
        let mut columns = BTreeMap::new();
        let mut numerical_columns = Vec::new();

        for column in frame.get_columns() {
            let name = column.name().to_string();
            let dtype = if column.dtype().is_integer() {
                "int64"
            } else if column.dtype().is_float() {
                "float64"
            } else {
                "object"
            };
            if dtype != "object" {
                numerical_columns.push(name.clone());
            }
            columns.insert(name, dtype.to_string());
        }

        SchemaDescriptor { columns, numerical_columns }
    }

    /// Lists the descriptor's columns that `frame` lacks, logging each one.
    pub fn check(&self, frame: &DataFrame) -> Vec<String> {
        let missing: Vec<String> =
            self.columns.keys().filter(|name| frame.column(name).is_err()).cloned().collect();
        for name in &missing {
            warn!("Column '{}' listed in schema is absent from the data", name);
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{NamedFrom, Series};
    use tempfile::tempdir;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("brand".into(), &[Some("Maruti"), Some("Honda")]).into(),
            Series::new("engine".into(), &[Some(1197i64), None]).into(),
            Series::new("mileage".into(), &[19.1, 17.0]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn infers_column_types() {
        let schema = SchemaDescriptor::from_frame(&frame());
        assert_eq!(schema.columns["brand"], "object");
        assert_eq!(schema.columns["engine"], "int64");
        assert_eq!(schema.columns["mileage"], "float64");
        assert_eq!(schema.numerical_columns, vec!["engine".to_string(), "mileage".to_string()]);
    }

    #[test]
    fn reads_generated_yaml_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("schema.yaml");
        fs::write(
            &path,
            "columns:\n  brand: int64\n  seats: int64\nnumerical_columns:\n- brand\n- seats\n",
        )
        .unwrap();

        let schema = SchemaDescriptor::from_yaml_file(&path).unwrap();
        assert_eq!(schema.columns.len(), 2);
        assert_eq!(schema.numerical_columns, vec!["brand".to_string(), "seats".to_string()]);
    }

    #[test]
    fn yaml_file_survives_write_and_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("schema.yaml");
        let schema = SchemaDescriptor::from_frame(&frame());

        schema.to_yaml_file(&path).unwrap();

        assert_eq!(SchemaDescriptor::from_yaml_file(&path).unwrap(), schema);
    }

    #[test]
    fn check_reports_missing_columns_only() {
        let mut schema = SchemaDescriptor::from_frame(&frame());
        schema.columns.insert("seats".into(), "int64".into());
        assert_eq!(schema.check(&frame()), vec!["seats".to_string()]);
    }

    #[test]
    fn missing_file_and_bad_yaml_are_errors() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            SchemaDescriptor::from_yaml_file(dir.path().join("absent.yaml")),
            Err(SchemaError::Io { .. })
        ));
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "columns: [unclosed").unwrap();
        assert!(matches!(SchemaDescriptor::from_yaml_file(&path), Err(SchemaError::Yaml(_))));
    }
}
