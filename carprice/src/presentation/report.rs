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

use crate::presentation::form::FormInput;
use crate::presentation::summary::{MarketSummary, PriceStats};

const PRICE_FACTORS: [&str; 5] = [
    "Vehicle Age: Older vehicles generally have lower prices.",
    "Kilometers Driven: Cars with higher mileage often sell for less.",
    "Transmission: Automatic transmissions can command a premium.",
    "Fuel Type: Fuel efficiency and type affect resale value.",
    "Seller Type: Dealer prices may include markup compared to individual sellers.",
];

/// Formats a price as whole rupees with thousands separators, e.g. `₹1,250,000`.
pub fn format_rupees(value: f64) -> String {
    let whole = value.trunc().abs() as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value <= -1.0 { "-" } else { "" };
    format!("{}₹{}", sign, grouped)
}

/// How a predicted price relates to the historical average for the same model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Comparison {
    Higher(f64),
    Lower(f64),
    NoHistory,
}

impl Comparison {
    pub fn between(prediction: f64, history: Option<&PriceStats>) -> Self {
        match history {
            None => Comparison::NoHistory,
            Some(stats) => {
                let diff = prediction - stats.average;
                if diff > 0.0 { Comparison::Higher(diff) } else { Comparison::Lower(-diff) }
            }
        }
    }
}

/// Everything shown after the user submits the form.
#[derive(Debug)]
pub struct PredictionReport {
    pub brand: String,
    pub model: String,
    pub brand_stats: Option<PriceStats>,
    pub model_stats: Option<PriceStats>,
    pub outcome: Result<f64, String>,
    pub comparison: Option<Comparison>,
}

impl PredictionReport {
    /// Combines a prediction attempt with market context.
    ///
    /// A failed prediction is kept as its message; no price is invented.
    pub fn new<E: fmt::Display>(
        input: &FormInput,
        prediction: Result<f64, E>,
        summary: &MarketSummary,
    ) -> Self {
        let model_stats = summary.model_stats(&input.brand, &input.model);
        let outcome = prediction.map_err(|e| e.to_string());
        let comparison =
            outcome.as_ref().ok().map(|price| Comparison::between(*price, model_stats.as_ref()));
        PredictionReport {
            brand: input.brand.clone(),
            model: input.model.clone(),
            brand_stats: summary.brand_stats(&input.brand),
            model_stats,
            outcome,
            comparison,
        }
    }
}

fn write_stats(f: &mut fmt::Formatter<'_>, title: &str, stats: Option<&PriceStats>) -> fmt::Result {
    writeln!(f, "{} Statistics", title)?;
    match stats {
        Some(stats) => {
            writeln!(f, "  Average Price: {}", format_rupees(stats.average))?;
            writeln!(f, "  Cars Available: {}", stats.count)?;
            writeln!(
                f,
                "  Price Range: {} - {}",
                format_rupees(stats.min),
                format_rupees(stats.max)
            )
        }
        None => writeln!(f, "  No data available for this model."),
    }
}

impl fmt::Display for PredictionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_stats(f, &self.brand, self.brand_stats.as_ref())?;
        write_stats(f, &self.model, self.model_stats.as_ref())?;
        writeln!(f)?;

        let price = match &self.outcome {
            Ok(price) => *price,
            Err(message) => return writeln!(f, "Prediction unavailable: {}", message),
        };
        writeln!(f, "Predicted Price: {}", format_rupees(price))?;

        match self.comparison {
            Some(Comparison::Higher(diff)) => writeln!(
                f,
                "This price is {} higher than the average {} {} in our database.",
                format_rupees(diff),
                self.brand,
                self.model
            )?,
            Some(Comparison::Lower(diff)) => writeln!(
                f,
                "This price is {} lower than the average {} {} in our database.",
                format_rupees(diff),
                self.brand,
                self.model
            )?,
            Some(Comparison::NoHistory) | None => {
                writeln!(f, "No historical listings for {} {}.", self.brand, self.model)?
            }
        }

        writeln!(f)?;
        writeln!(f, "Factors Affecting Price")?;
        for factor in PRICE_FACTORS {
            writeln!(f, "  - {}", factor)?;
        }
        Ok(())
    }
}
