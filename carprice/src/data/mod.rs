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

pub mod csv;
pub mod documents;
pub mod error;
pub mod split;

pub use self::csv::{write_frame, CsvLoader};
pub use self::documents::{documents_to_frame, frame_to_documents, Document};
pub use self::split::train_test_split;

use ndarray::Array1;
use polars::prelude::*;

use self::error::DataError;

/// A trait for loading raw tabular data from files.
///
/// Implementors return a [`DataFrame`] whose missing cells are nulls.
pub trait DataLoader {
    /// Loads the file at `path` into a data frame.
    fn load<P: AsRef<std::path::Path>>(path: P) -> Result<DataFrame, Self::Error>;

    /// The error type returned by the `load` method.
    type Error: std::error::Error + 'static;
}

/// Loads data from a file using a specified `DataLoader` implementation.
pub fn load_data<T: DataLoader, P: AsRef<std::path::Path>>(
    path: P,
) -> Result<DataFrame, T::Error> {
    T::load(path)
}

fn lookup<'a>(frame: &'a DataFrame, name: &str) -> Result<&'a Series, DataError> {
    frame
        .column(name)
        .map(Column::as_materialized_series)
        .map_err(|_| DataError::MissingColumn { column: name.to_string() })
}

/// Reads the named column as floating point, keeping nulls as `None`.
///
/// String columns are parsed cell by cell so that a malformed value is
/// reported with its row; other dtypes are cast.
pub fn numeric_column(frame: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, DataError> {
    let series = lookup(frame, name)?;
    if let Ok(text) = series.str() {
        return text
            .into_iter()
            .enumerate()
            .map(|(i, cell)| match cell {
                None => Ok(None),
                Some(value) => value.trim().parse::<f64>().map(Some).map_err(|_| {
                    DataError::InvalidNumeric {
                        column: name.to_string(),
                        row: i + 1,
                        value: value.to_string(),
                    }
                }),
            })
            .collect();
    }
    let floats = series.cast(&DataType::Float64)?;
    let values = floats.f64()?.into_iter().collect();
    Ok(values)
}

/// Reads the named column as text, keeping nulls as `None`.
pub fn text_column(frame: &DataFrame, name: &str) -> Result<Vec<Option<String>>, DataError> {
    let text = lookup(frame, name)?.cast(&DataType::String)?;
    let values = text.str()?.into_iter().map(|cell| cell.map(str::to_string)).collect();
    Ok(values)
}

/// Separates the target column from the feature columns.
///
/// The target must be present and numeric on every row.
pub fn split_features_target(
    frame: &DataFrame,
    target: &str,
) -> Result<(DataFrame, Array1<f64>), DataError> {
    let targets = numeric_column(frame, target)?
        .into_iter()
        .enumerate()
        .map(|(i, v)| v.ok_or(DataError::MissingTarget { row: i + 1 }))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((frame.drop(target)?, Array1::from_vec(targets)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            Series::new("brand".into(), &[Some("Maruti"), Some("Hyundai"), None]).into(),
            Series::new("km_driven".into(), &[Some("50000"), None, Some("12000")]).into(),
            Series::new("selling_price".into(), &[Some("400000"), Some("550000"), Some("720000")])
                .into(),
        ])
        .unwrap()
    }

    #[test]
    fn numeric_column_keeps_missing() {
        let km = numeric_column(&sample(), "km_driven").unwrap();
        assert_eq!(km, vec![Some(50000.0), None, Some(12000.0)]);
    }

    #[test]
    fn numeric_column_casts_typed_columns() {
        let frame =
            DataFrame::new(vec![Series::new("seats".into(), &[Some(5i64), None]).into()]).unwrap();
        assert_eq!(numeric_column(&frame, "seats").unwrap(), vec![Some(5.0), None]);
    }

    #[test]
    fn numeric_column_reports_bad_cell() {
        let result = numeric_column(&sample(), "brand");
        assert!(matches!(result, Err(DataError::InvalidNumeric { row: 1, .. })));
    }

    #[test]
    fn text_column_reports_absent_column() {
        assert!(matches!(
            text_column(&sample(), "model"),
            Err(DataError::MissingColumn { column }) if column == "model"
        ));
        assert_eq!(
            text_column(&sample(), "brand").unwrap(),
            vec![Some("Maruti".to_string()), Some("Hyundai".to_string()), None]
        );
    }

    #[test]
    fn split_features_target_separates_target() {
        let (features, target) = split_features_target(&sample(), "selling_price").unwrap();
        assert_eq!(features.width(), 2);
        assert!(features.column("selling_price").is_err());
        assert_eq!(target, array![400000.0, 550000.0, 720000.0]);
    }

    #[test]
    fn split_features_target_requires_target() {
        let frame = DataFrame::new(vec![
            Series::new("brand".into(), &["Kia", "Kia", "Kia", "Kia"]).into(),
            Series::new("selling_price".into(), &[Some("1"), Some("2"), Some("3"), None]).into(),
        ])
        .unwrap();
        let result = split_features_target(&frame, "selling_price");
        assert!(matches!(result, Err(DataError::MissingTarget { row: 4 })));
    }
}
