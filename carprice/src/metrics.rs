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

use std::fmt;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::errors::LossError;
use crate::losses::{LossFunction, MAE, MSE};

/// Regression quality on one partition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

impl RegressionMetrics {
    pub fn evaluate(predictions: &Array1<f64>, actuals: &Array1<f64>) -> Result<Self, LossError> {
        let mse = MSE.calculate(predictions, actuals)?;
        let mae = MAE.calculate(predictions, actuals)?;
        Ok(RegressionMetrics { rmse: mse.sqrt(), mae, r2: r2_score(predictions, actuals)? })
    }
}

impl fmt::Display for RegressionMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RMSE={:.4} MAE={:.4} R2={:.4}", self.rmse, self.mae, self.r2)
    }
}

/// Coefficient of determination.
///
/// A constant target scores 1.0 when predicted exactly and 0.0 otherwise.
pub fn r2_score(predictions: &Array1<f64>, actuals: &Array1<f64>) -> Result<f64, LossError> {
    let mse = MSE.calculate(predictions, actuals)?;
    let mean = actuals.mean().ok_or(LossError::EmptyInput)?;
    let variance = actuals.mapv(|y| (y - mean) * (y - mean)).mean().ok_or(LossError::EmptyInput)?;
    if variance == 0.0 {
        return Ok(if mse == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - mse / variance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn perfect_predictions() {
        let y = array![1.0, 2.0, 3.0];
        let metrics = RegressionMetrics::evaluate(&y, &y).unwrap();
        assert_eq!(metrics, RegressionMetrics { rmse: 0.0, mae: 0.0, r2: 1.0 });
    }

    #[test]
    fn mean_predictor_scores_zero_r2() {
        let actuals = array![1.0, 2.0, 3.0];
        let predictions = array![2.0, 2.0, 2.0];
        let r2 = r2_score(&predictions, &actuals).unwrap();
        assert!(r2.abs() < 1e-12);
    }

    #[test]
    fn rmse_and_mae() {
        let metrics = RegressionMetrics::evaluate(&array![0.0, 0.0], &array![3.0, -4.0]).unwrap();
        assert!((metrics.rmse - 12.5f64.sqrt()).abs() < 1e-12);
        assert!((metrics.mae - 3.5).abs() < 1e-12);
    }

    #[test]
    fn constant_target() {
        let r2 = r2_score(&array![5.0, 6.0], &array![5.0, 5.0]).unwrap();
        assert_eq!(r2, 0.0);
    }
}
