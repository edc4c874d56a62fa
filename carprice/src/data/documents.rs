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

use polars::prelude::*;
use serde_json::{Map, Number, Value};

use crate::data::error::DataError;

/// A JSON-like record as held by the document store.
pub type Document = Map<String, Value>;

/// Token the document store uses for a missing value.
const MISSING_SENTINEL: &str = "na";

/// Internal identifier assigned by the document store.
pub const ID_FIELD: &str = "_id";

fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s == MISSING_SENTINEL,
        _ => false,
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builds one typed column: `Int64` when every present value is an integer,
/// `Float64` when every present value is a number, text otherwise.
fn document_column(name: &str, cells: &[Option<&Value>]) -> Column {
    let present = || cells.iter().flatten();
    let series = if present().next().is_some() && present().all(|v| v.is_i64()) {
        let values: Vec<Option<i64>> = cells.iter().map(|v| v.and_then(Value::as_i64)).collect();
        Series::new(name.into(), values)
    } else if present().next().is_some() && present().all(|v| v.is_number()) {
        let values: Vec<Option<f64>> = cells.iter().map(|v| v.and_then(Value::as_f64)).collect();
        Series::new(name.into(), values)
    } else {
        let values: Vec<Option<String>> = cells.iter().map(|v| v.map(value_to_text)).collect();
        Series::new(name.into(), values)
    };
    series.into()
}

/// Flattens documents into a data frame.
///
/// Columns appear in first-seen order across all documents. The `_id` field is
/// dropped, and JSON null, absent keys and the `"na"` sentinel all become
/// nulls.
pub fn documents_to_frame(documents: &[Document]) -> Result<DataFrame, DataError> {
    let mut names: Vec<&str> = Vec::new();
    for doc in documents {
        for key in doc.keys() {
            if key != ID_FIELD && !names.contains(&key.as_str()) {
                names.push(key);
            }
        }
    }

    let columns = names
        .iter()
        .map(|name| {
            let cells: Vec<Option<&Value>> =
                documents.iter().map(|doc| doc.get(*name).filter(|v| !is_missing(v))).collect();
            document_column(name, &cells)
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}

fn parse_number(text: &str) -> Value {
    if let Ok(i) = text.parse::<i64>() {
        Value::Number(i.into())
    } else if let Some(n) = text.parse::<f64>().ok().and_then(Number::from_f64) {
        Value::Number(n)
    } else {
        Value::String(text.to_string())
    }
}

fn series_to_values(series: &Series, restore_numbers: bool) -> Result<Vec<Value>, DataError> {
    let dtype = series.dtype();
    if dtype.is_integer() {
        let ints = series.cast(&DataType::Int64)?;
        let values = ints.i64()?.into_iter().map(|v| v.map_or(Value::Null, Value::from)).collect();
        return Ok(values);
    }
    if dtype.is_float() {
        let floats = series.cast(&DataType::Float64)?;
        let values = floats
            .f64()?
            .into_iter()
            .map(|v| v.and_then(Number::from_f64).map_or(Value::Null, Value::Number))
            .collect();
        return Ok(values);
    }

    let text = series.cast(&DataType::String)?;
    let values = text
        .str()?
        .into_iter()
        .map(|cell| match cell {
            None => Value::Null,
            Some(s) if restore_numbers => parse_number(s),
            Some(s) => Value::String(s.to_string()),
        })
        .collect();
    Ok(values)
}

/// Converts frame rows into documents.
///
/// Typed numeric columns stay numbers. Text cells become numbers only in the
/// columns listed in `numeric_columns`, so codes such as `"007"` survive.
pub fn frame_to_documents(
    frame: &DataFrame,
    numeric_columns: &[&str],
) -> Result<Vec<Document>, DataError> {
    let mut documents = vec![Document::new(); frame.height()];
    for column in frame.get_columns() {
        let name = column.name().as_str();
        let values =
            series_to_values(column.as_materialized_series(), numeric_columns.contains(&name))?;
        for (doc, value) in documents.iter_mut().zip(values) {
            doc.insert(name.to_string(), value);
        }
    }
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::text_column;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn drops_identifier_and_normalizes_sentinel() {
        let docs = vec![
            doc(json!({"_id": "64f1", "brand": "Maruti", "engine": 1197, "mileage": 19.1})),
            doc(json!({"_id": "64f2", "brand": "na", "engine": null, "mileage": 22})),
        ];

        let frame = documents_to_frame(&docs).unwrap();

        let names: Vec<&str> = frame.get_columns().iter().map(|c| c.name().as_str()).collect();
        assert_eq!(names, vec!["brand", "engine", "mileage"]);
        assert_eq!(text_column(&frame, "brand").unwrap(), vec![Some("Maruti".into()), None]);
        assert_eq!(frame.column("engine").unwrap().dtype(), &DataType::Int64);
        assert_eq!(frame.column("mileage").unwrap().dtype(), &DataType::Float64);
        assert_eq!(frame.column("engine").unwrap().null_count(), 1);
    }

    #[test]
    fn absent_keys_become_missing() {
        let docs = vec![doc(json!({"brand": "Kia"})), doc(json!({"seats": 7}))];

        let frame = documents_to_frame(&docs).unwrap();

        assert_eq!(frame.shape(), (2, 2));
        assert_eq!(text_column(&frame, "brand").unwrap(), vec![Some("Kia".into()), None]);
        assert_eq!(text_column(&frame, "seats").unwrap(), vec![None, Some("7".into())]);
    }

    #[test]
    fn mixed_column_falls_back_to_text() {
        let docs = vec![doc(json!({"model": "i20"})), doc(json!({"model": 800}))];

        let frame = documents_to_frame(&docs).unwrap();

        assert_eq!(frame.column("model").unwrap().dtype(), &DataType::String);
        assert_eq!(
            text_column(&frame, "model").unwrap(),
            vec![Some("i20".into()), Some("800".into())]
        );
    }

    #[test]
    fn no_documents_give_an_empty_frame() {
        let frame = documents_to_frame(&[]).unwrap();
        assert_eq!(frame.shape(), (0, 0));
    }

    #[test]
    fn restores_numbers_only_in_numeric_columns() {
        let frame = DataFrame::new(vec![
            Series::new("model".into(), &[Some("007"), Some("2.50")]).into(),
            Series::new("mileage".into(), &[Some("2.50"), None]).into(),
            Series::new("seats".into(), &[Some("5"), Some("7")]).into(),
        ])
        .unwrap();

        let docs = frame_to_documents(&frame, &["mileage", "seats"]).unwrap();

        assert_eq!(
            Value::Object(docs[0].clone()),
            json!({"model": "007", "mileage": 2.5, "seats": 5})
        );
        assert_eq!(
            Value::Object(docs[1].clone()),
            json!({"model": "2.50", "mileage": null, "seats": 7})
        );
    }

    #[test]
    fn typed_columns_stay_numbers() {
        let docs = vec![doc(json!({"brand": "Honda", "engine": 1498, "mileage": 17.8}))];
        let frame = documents_to_frame(&docs).unwrap();

        let restored = frame_to_documents(&frame, &[]).unwrap();

        assert_eq!(restored, docs);
    }
}
