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

use std::collections::BTreeSet;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::errors::EncoderError;
use crate::preprocessing::Transformer;

/// One-hot encodes string columns against the vocabulary seen at fit time.
///
/// Each input column expands into one indicator per known category, in sorted
/// order. A category that was not seen during fitting yields an all-zero
/// block for that column instead of an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    categories: Option<Vec<Vec<String>>>,
}

impl OneHotEncoder {
    pub fn new() -> Self {
        OneHotEncoder { categories: None }
    }

    /// Sorted vocabulary per input column.
    pub fn categories(&self) -> Option<&[Vec<String>]> {
        self.categories.as_deref()
    }

    pub fn n_features_out(&self) -> usize {
        self.categories.as_ref().map_or(0, |cats| cats.iter().map(Vec::len).sum())
    }

    /// Output column names in `<input>_<category>` form.
    pub fn feature_names(&self, input_names: &[String]) -> Vec<String> {
        let Some(categories) = self.categories.as_ref() else {
            return Vec::new();
        };
        input_names
            .iter()
            .zip(categories)
            .flat_map(|(name, cats)| cats.iter().map(move |cat| format!("{name}_{cat}")))
            .collect()
    }
}

impl Transformer for OneHotEncoder {
    type Input = Array2<String>;
    type Output = Array2<f64>;
    type Error = EncoderError;

    fn fit(&mut self, x: &Array2<String>) -> Result<(), EncoderError> {
        if x.is_empty() {
            return Err(EncoderError::EmptyInput);
        }
        let categories = x
            .columns()
            .into_iter()
            .map(|column| {
                column.iter().cloned().collect::<BTreeSet<String>>().into_iter().collect()
            })
            .collect();
        self.categories = Some(categories);
        Ok(())
    }

    fn transform(&self, x: &Array2<String>) -> Result<Array2<f64>, EncoderError> {
        let categories = self.categories.as_ref().ok_or(EncoderError::NotFitted)?;
        if x.ncols() != categories.len() {
            return Err(EncoderError::DimensionMismatch {
                expected: categories.len(),
                actual: x.ncols(),
            });
        }

        let mut out = Array2::zeros((x.nrows(), self.n_features_out()));
        let mut offset = 0;
        for (column, cats) in categories.iter().enumerate() {
            for (row, value) in x.column(column).iter().enumerate() {
                if let Ok(pos) = cats.binary_search(value) {
                    out[[row, offset + pos]] = 1.0;
                }
            }
            offset += cats.len();
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn strings(rows: &[&[&str]]) -> Array2<String> {
        let ncols = rows[0].len();
        let flat = rows.iter().flat_map(|r| r.iter().map(|s| s.to_string())).collect();
        Array2::from_shape_vec((rows.len(), ncols), flat).unwrap()
    }

    #[test]
    fn encodes_against_sorted_vocabulary() {
        let x = strings(&[&["Petrol", "Manual"], &["Diesel", "Automatic"], &["CNG", "Manual"]]);
        let mut encoder = OneHotEncoder::new();
        let out = encoder.fit_transform(&x).unwrap();

        assert_eq!(
            encoder.categories().unwrap(),
            &[
                vec!["CNG".to_string(), "Diesel".to_string(), "Petrol".to_string()],
                vec!["Automatic".to_string(), "Manual".to_string()],
            ]
        );
        assert_eq!(
            out,
            array![
                [0.0, 0.0, 1.0, 0.0, 1.0],
                [0.0, 1.0, 0.0, 1.0, 0.0],
                [1.0, 0.0, 0.0, 0.0, 1.0],
            ]
        );
    }

    #[test]
    fn unseen_category_yields_zero_block() {
        let mut encoder = OneHotEncoder::new();
        encoder.fit(&strings(&[&["Petrol", "Manual"], &["Diesel", "Automatic"]])).unwrap();

        let out = encoder.transform(&strings(&[&["Electric", "Manual"]])).unwrap();

        assert_eq!(out, array![[0.0, 0.0, 0.0, 1.0]]);
    }

    #[test]
    fn feature_names_follow_vocabulary() {
        let mut encoder = OneHotEncoder::new();
        encoder.fit(&strings(&[&["Dealer"], &["Individual"]])).unwrap();
        let names = encoder.feature_names(&["seller_type".to_string()]);
        assert_eq!(names, vec!["seller_type_Dealer", "seller_type_Individual"]);
    }

    #[test]
    fn transform_checks_width() {
        let mut encoder = OneHotEncoder::new();
        encoder.fit(&strings(&[&["a", "b"]])).unwrap();
        let result = encoder.transform(&strings(&[&["a"]]));
        assert!(matches!(result, Err(EncoderError::DimensionMismatch { expected: 2, actual: 1 })));
    }
}
