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

use ndarray::{Array1, Array2};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ImputerError;
use crate::preprocessing::Transformer;

fn check_width(frame: &DataFrame, expected: usize) -> Result<(), ImputerError> {
    if frame.width() != expected {
        return Err(ImputerError::DimensionMismatch { expected, actual: frame.width() });
    }
    Ok(())
}

/// Replaces null cells with the per-column median observed at fit time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedianImputer {
    medians: Option<Array1<f64>>,
}

impl MedianImputer {
    pub fn new() -> Self {
        MedianImputer { medians: None }
    }

    pub fn medians(&self) -> Option<&Array1<f64>> {
        self.medians.as_ref()
    }
}

impl Transformer for MedianImputer {
    type Input = DataFrame;
    type Output = Array2<f64>;
    type Error = ImputerError;

    fn fit(&mut self, x: &DataFrame) -> Result<(), ImputerError> {
        if x.height() == 0 || x.width() == 0 {
            return Err(ImputerError::EmptyInput);
        }
        let medians = x
            .get_columns()
            .iter()
            .enumerate()
            .map(|(column, values)| {
                let floats = values.as_materialized_series().cast(&DataType::Float64)?;
                floats.f64()?.median().ok_or(ImputerError::NoObservedValues { column })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.medians = Some(Array1::from_vec(medians));
        Ok(())
    }

    fn transform(&self, x: &DataFrame) -> Result<Array2<f64>, ImputerError> {
        let medians = self.medians.as_ref().ok_or(ImputerError::NotFitted)?;
        check_width(x, medians.len())?;

        let mut out = Array2::zeros((x.height(), medians.len()));
        for (c, (values, &fill)) in x.get_columns().iter().zip(medians.iter()).enumerate() {
            let floats = values.as_materialized_series().cast(&DataType::Float64)?;
            for (r, value) in floats.f64()?.into_iter().enumerate() {
                out[[r, c]] = value.unwrap_or(fill);
            }
        }
        Ok(out)
    }
}

/// Replaces null cells with the most frequent value observed at fit time.
///
/// Ties go to the lexicographically smallest value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MostFrequentImputer {
    modes: Option<Vec<String>>,
}

impl MostFrequentImputer {
    pub fn new() -> Self {
        MostFrequentImputer { modes: None }
    }

    pub fn modes(&self) -> Option<&[String]> {
        self.modes.as_deref()
    }
}

fn most_frequent(values: &StringChunked) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values.into_iter().flatten() {
        *counts.entry(value).or_insert(0) += 1;
    }
    // BTreeMap iterates in key order, so a strict `>` keeps the smallest tie.
    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value.to_string())
}

impl Transformer for MostFrequentImputer {
    type Input = DataFrame;
    type Output = Array2<String>;
    type Error = ImputerError;

    fn fit(&mut self, x: &DataFrame) -> Result<(), ImputerError> {
        if x.height() == 0 || x.width() == 0 {
            return Err(ImputerError::EmptyInput);
        }
        let modes = x
            .get_columns()
            .iter()
            .enumerate()
            .map(|(column, values)| {
                let text = values.as_materialized_series().cast(&DataType::String)?;
                most_frequent(text.str()?).ok_or(ImputerError::NoObservedValues { column })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.modes = Some(modes);
        Ok(())
    }

    fn transform(&self, x: &DataFrame) -> Result<Array2<String>, ImputerError> {
        let modes = self.modes.as_ref().ok_or(ImputerError::NotFitted)?;
        check_width(x, modes.len())?;

        let mut out = Array2::from_elem((x.height(), modes.len()), String::new());
        for (c, (values, mode)) in x.get_columns().iter().zip(modes.iter()).enumerate() {
            let text = values.as_materialized_series().cast(&DataType::String)?;
            for (r, value) in text.str()?.into_iter().enumerate() {
                out[[r, c]] = value.unwrap_or(mode.as_str()).to_string();
            }
        }
        Ok(out)
    }
}
