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

use log::{debug, trace};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::errors::{ModelError, ScalerError};
use crate::optimizers::{BatchGradientDescent, Optimizer};
use crate::preprocessing::Transformer;
use crate::scalers::StandardScaler;

/// Linear regressor trained with batch gradient descent on the mean squared
/// error.
///
/// Features and target are standardized internally and predictions are
/// mapped back to target units.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinearRegression {
    weights: Option<Array1<f64>>,
    bias: f64,
    x_scaler: StandardScaler,
    y_scaler: StandardScaler,
}

impl LinearRegression {
    pub fn new() -> LinearRegression {
        LinearRegression {
            weights: None,
            bias: 0.0,
            x_scaler: StandardScaler::new(),
            y_scaler: StandardScaler::new(),
        }
    }

    pub fn fit(
        &mut self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        learning_rate: f64,
        epochs: usize,
    ) -> Result<(), ModelError> {
        if x.is_empty() || y.is_empty() {
            return Err(ModelError::Scaler(ScalerError::EmptyInput));
        }
        if x.shape()[0] != y.shape()[0] {
            return Err(ModelError::Scaler(ScalerError::DimensionMismatch {
                expected: x.shape()[0],
                actual: y.shape()[0],
            }));
        }

        let x_scaled = self.x_scaler.fit_transform(x)?;
        let y_2d = y.clone().insert_axis(Axis(1));
        let y_scaled = self.y_scaler.fit_transform(&y_2d)?.remove_axis(Axis(1));

        let (_, n_features) = x_scaled.dim();
        let mut weights = Array1::zeros(n_features);
        let mut bias = 0.0;

        for epoch in 0..epochs {
            let (grad_weights, grad_bias) =
                BatchGradientDescent.compute_gradients(&x_scaled, &y_scaled, &weights, bias)?;

            weights = weights - &(grad_weights * learning_rate);
            bias -= grad_bias * learning_rate;

            if epoch % 500 == 0 {
                trace!("Epoch {}: bias = {:.6}", epoch, bias);
            }
        }

        self.weights = Some(weights);
        self.bias = bias;
        debug!("Fitted linear regression on {} samples, {} features", y.len(), n_features);
        Ok(())
    }

    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>, ModelError> {
        let weights = self.weights.as_ref().ok_or(ModelError::NotFitted)?;
        if x.ncols() != weights.len() {
            return Err(ModelError::DimensionMismatch {
                expected: weights.len(),
                actual: x.ncols(),
            });
        }
        let x_scaled = self.x_scaler.transform(x)?;
        let predictions = (x_scaled.dot(weights) + self.bias).insert_axis(Axis(1));
        Ok(self.y_scaler.inverse_transform(&predictions)?.remove_axis(Axis(1)))
    }

    /// Number of input features the fitted model expects.
    pub fn n_features(&self) -> Option<usize> {
        self.weights.as_ref().map(Array1::len)
    }

    pub fn is_fitted(&self) -> bool {
        self.weights.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::OptimizerError;
    use ndarray::{array, Array1, Array2};

    #[test]
    fn linear_regression_fit_empty_input() {
        let mut model = LinearRegression::new();
        let x: Array2<f64> = Array2::zeros((0, 2));
        let y: Array1<f64> = Array1::zeros(0);
        let result = model.fit(&x, &y, 0.01, 10);
        assert!(matches!(result, Err(ModelError::Scaler(ScalerError::EmptyInput))));
    }

    #[test]
    fn linear_regression_fit_dimension_mismatch() {
        let mut model = LinearRegression::new();
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let y = array![1.0, 2.0, 3.0];
        let result = model.fit(&x, &y, 0.01, 10);
        assert!(matches!(
            result,
            Err(ModelError::Scaler(ScalerError::DimensionMismatch { expected: 2, actual: 3 }))
        ));
    }

    #[test]
    fn linear_regression_predict_not_fitted() {
        let model = LinearRegression::new();
        let result = model.predict(&array![[1.0, 2.0]]);
        assert!(matches!(result, Err(ModelError::NotFitted)));
        assert!(!model.is_fitted());
    }

    #[test]
    fn linear_regression_predict_dimension_mismatch() {
        let mut model = LinearRegression::new();
        model.fit(&array![[1.0, 2.0], [3.0, 4.0]], &array![1.0, 2.0], 0.01, 10).unwrap();
        let result = model.predict(&array![[1.0, 2.0, 3.0]]);
        assert!(matches!(result, Err(ModelError::DimensionMismatch { expected: 2, actual: 3 })));
    }

    #[test]
    fn linear_regression_fit_predict() {
        let mut model = LinearRegression::new();
        let x = array![[1.0, 0.0], [2.0, 1.0], [3.0, 0.0], [4.0, 1.0], [5.0, 0.0]];
        let y = x.column(0).mapv(|v| 100_000.0 * v + 250_000.0) + x.column(1).mapv(|v| 40_000.0 * v);
        model.fit(&x, &y, 0.1, 2000).unwrap();

        let predictions = model.predict(&x).unwrap();
        for (p, t) in predictions.iter().zip(y.iter()) {
            assert!((p - t).abs() / t < 1e-3, "prediction {} far from {}", p, t);
        }
        assert_eq!(model.n_features(), Some(2));
    }

    #[test]
    fn linear_regression_diverges_to_error() {
        let mut model = LinearRegression::new();
        let x = array![[1.0], [2.0], [3.0]];
        let result = model.fit(&x, &array![1.0, 2.0, 4.0], 1e10, 100);
        assert!(matches!(
            result,
            Err(ModelError::Optimizer(
                OptimizerError::NumericalInstability | OptimizerError::InvalidNumericValue
            ))
        ));
    }

    #[test]
    fn linear_regression_survives_serialization() {
        let mut model = LinearRegression::new();
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![3.0, 5.0, 7.0, 9.0];
        model.fit(&x, &y, 0.1, 500).unwrap();

        let bytes = bincode::serialize(&model).unwrap();
        let restored: LinearRegression = bincode::deserialize(&bytes).unwrap();

        assert_eq!(model.predict(&x).unwrap(), restored.predict(&x).unwrap());
    }
}
