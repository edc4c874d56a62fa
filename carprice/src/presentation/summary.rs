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

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use polars::prelude::DataFrame;
use serde::Serialize;

use crate::constants::TARGET_COLUMN;
use crate::data::error::DataError;
use crate::data::{numeric_column, text_column};

/// Average, count and range of a group of historical prices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceStats {
    pub average: f64,
    pub count: usize,
    pub min: f64,
    pub max: f64,
}

impl PriceStats {
    pub fn from_prices<I: IntoIterator<Item = f64>>(prices: I) -> Option<Self> {
        let mut count = 0;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for price in prices {
            count += 1;
            sum += price;
            min = min.min(price);
            max = max.max(price);
        }
        (count > 0).then(|| PriceStats { average: sum / count as f64, count, min, max })
    }
}

#[derive(Debug, Clone)]
struct Listing {
    brand: String,
    model: Option<String>,
    vehicle_age: Option<u32>,
    price: f64,
}

/// Market statistics over historical listings.
#[derive(Debug, Clone, Default)]
pub struct MarketSummary {
    listings: Vec<Listing>,
}

impl MarketSummary {
    /// Builds the summary from a frame with `brand`, `model` and
    /// `selling_price` columns. `vehicle_age` is optional.
    ///
    /// Rows without a brand or a price are skipped.
    pub fn from_frame(frame: &DataFrame) -> Result<Self, DataError> {
        let brands = text_column(frame, "brand")?;
        let models = text_column(frame, "model")?;
        let prices = numeric_column(frame, TARGET_COLUMN)?;
        let ages = match frame.get_column_index("vehicle_age") {
            Some(_) => numeric_column(frame, "vehicle_age")?,
            None => vec![None; frame.height()],
        };

        let listings: Vec<Listing> = brands
            .into_iter()
            .zip(models)
            .zip(prices)
            .zip(ages)
            .filter_map(|(((brand, model), price), age)| {
                Some(Listing {
                    brand: brand?,
                    model,
                    vehicle_age: age.filter(|a| *a >= 0.0 && a.fract() == 0.0).map(|a| a as u32),
                    price: price?,
                })
            })
            .collect();

        debug!("Market summary over {} of {} listings", listings.len(), frame.height());
        Ok(MarketSummary { listings })
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Distinct brands in ascending order.
    pub fn brands(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.listings.iter().map(|l| l.brand.as_str()).collect();
        set.into_iter().collect()
    }

    /// Distinct models of `brand` in ascending order.
    pub fn models(&self, brand: &str) -> Vec<&str> {
        let set: BTreeSet<&str> = self
            .listings
            .iter()
            .filter(|l| l.brand == brand)
            .filter_map(|l| l.model.as_deref())
            .collect();
        set.into_iter().collect()
    }

    pub fn brand_stats(&self, brand: &str) -> Option<PriceStats> {
        PriceStats::from_prices(self.listings.iter().filter(|l| l.brand == brand).map(|l| l.price))
    }

    pub fn model_stats(&self, brand: &str, model: &str) -> Option<PriceStats> {
        PriceStats::from_prices(
            self.listings
                .iter()
                .filter(|l| l.brand == brand && l.model.as_deref() == Some(model))
                .map(|l| l.price),
        )
    }

    /// Mean price per vehicle age, youngest first.
    pub fn price_by_age(&self) -> Vec<(u32, f64)> {
        let mut groups: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
        for listing in &self.listings {
            if let Some(age) = listing.vehicle_age {
                let entry = groups.entry(age).or_insert((0.0, 0));
                entry.0 += listing.price;
                entry.1 += 1;
            }
        }
        groups.into_iter().map(|(age, (sum, count))| (age, sum / count as f64)).collect()
    }

    /// The `n` brands with the highest mean price, most expensive first.
    pub fn top_brands(&self, n: usize) -> Vec<(&str, f64)> {
        let mut means: Vec<(&str, f64)> = self
            .brands()
            .into_iter()
            .filter_map(|b| self.brand_stats(b).map(|s| (b, s.average)))
            .collect();
        means.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        means.truncate(n);
        means
    }
}
