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

//! Typed form of one car listing, as entered at serving time.

use std::fmt;
use std::str::FromStr;

use polars::prelude::*;

use crate::errors::ParseCategoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SellerType {
    Individual,
    Dealer,
}

impl SellerType {
    pub const ALL: [SellerType; 2] = [SellerType::Individual, SellerType::Dealer];

    pub fn as_str(&self) -> &'static str {
        match self {
            SellerType::Individual => "Individual",
            SellerType::Dealer => "Dealer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FuelType {
    Petrol,
    Diesel,
    Cng,
    Lpg,
    Electric,
}

impl FuelType {
    pub const ALL: [FuelType; 5] =
        [FuelType::Petrol, FuelType::Diesel, FuelType::Cng, FuelType::Lpg, FuelType::Electric];

    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Petrol => "Petrol",
            FuelType::Diesel => "Diesel",
            FuelType::Cng => "CNG",
            FuelType::Lpg => "LPG",
            FuelType::Electric => "Electric",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransmissionType {
    Manual,
    Automatic,
}

impl TransmissionType {
    pub const ALL: [TransmissionType; 2] = [TransmissionType::Manual, TransmissionType::Automatic];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransmissionType::Manual => "Manual",
            TransmissionType::Automatic => "Automatic",
        }
    }
}

fn parse_category<T: Copy>(
    field: &'static str,
    all: &[T],
    as_str: fn(&T) -> &'static str,
    value: &str,
) -> Result<T, ParseCategoryError> {
    let value = value.trim();
    all.iter()
        .find(|v| as_str(*v).eq_ignore_ascii_case(value))
        .copied()
        .ok_or_else(|| ParseCategoryError { field, value: value.to_string() })
}

impl FromStr for SellerType {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_category("seller type", &Self::ALL, Self::as_str, s)
    }
}

impl FromStr for FuelType {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_category("fuel type", &Self::ALL, Self::as_str, s)
    }
}

impl FromStr for TransmissionType {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_category("transmission type", &Self::ALL, Self::as_str, s)
    }
}

impl fmt::Display for SellerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TransmissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One listing's features. Any field may be missing; the preprocessor fills
/// gaps with statistics learned at training time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarRecord {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub vehicle_age: Option<u32>,
    pub km_driven: Option<u64>,
    pub seller_type: Option<SellerType>,
    pub fuel_type: Option<FuelType>,
    pub transmission_type: Option<TransmissionType>,
    pub mileage: Option<f64>,
    pub engine: Option<u32>,
    pub max_power: Option<f64>,
    pub seats: Option<u32>,
}

impl CarRecord {
    /// `"{brand} {model}"`, available only when both parts are known.
    pub fn car_name(&self) -> Option<String> {
        match (&self.brand, &self.model) {
            (Some(brand), Some(model)) => Some(format!("{} {}", brand, model)),
            _ => None,
        }
    }

    /// A one-row frame with the dataset's column names.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        fn text<T: ToString>(name: &str, value: &Option<T>) -> Column {
            Series::new(name.into(), [value.as_ref().map(ToString::to_string)]).into()
        }
        fn number(name: &str, value: Option<f64>) -> Column {
            Series::new(name.into(), [value]).into()
        }

        DataFrame::new(vec![
            text("car_name", &self.car_name()),
            text("brand", &self.brand),
            text("model", &self.model),
            number("vehicle_age", self.vehicle_age.map(f64::from)),
            number("km_driven", self.km_driven.map(|v| v as f64)),
            text("seller_type", &self.seller_type),
            text("fuel_type", &self.fuel_type),
            text("transmission_type", &self.transmission_type),
            number("mileage", self.mileage),
            number("engine", self.engine.map(f64::from)),
            number("max_power", self.max_power),
            number("seats", self.seats.map(f64::from)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CATEGORICAL_COLUMNS, NUMERICAL_COLUMNS};
    use crate::data::{numeric_column, text_column};

    #[test]
    fn categories_parse_case_insensitively() {
        assert_eq!("cng".parse::<FuelType>().unwrap(), FuelType::Cng);
        assert_eq!(" Dealer ".parse::<SellerType>().unwrap(), SellerType::Dealer);
        assert_eq!("AUTOMATIC".parse::<TransmissionType>().unwrap(), TransmissionType::Automatic);
        assert_eq!(FuelType::Lpg.to_string(), "LPG");
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = "Hydrogen".parse::<FuelType>().unwrap_err();
        assert_eq!(err, ParseCategoryError { field: "fuel type", value: "Hydrogen".into() });
    }

    #[test]
    fn car_name_needs_brand_and_model() {
        let mut record = CarRecord {
            brand: Some("Maruti".into()),
            model: Some("Swift".into()),
            ..Default::default()
        };
        assert_eq!(record.car_name().as_deref(), Some("Maruti Swift"));
        record.model = None;
        assert_eq!(record.car_name(), None);
    }

    #[test]
    fn display_and_parse_agree() {
        for value in SellerType::ALL {
            assert_eq!(value.to_string().parse::<SellerType>().unwrap(), value);
        }
        for value in FuelType::ALL {
            assert_eq!(value.to_string().parse::<FuelType>().unwrap(), value);
        }
        for value in TransmissionType::ALL {
            assert_eq!(value.to_string().parse::<TransmissionType>().unwrap(), value);
        }
    }

    #[test]
    fn frame_carries_every_feature_column() {
        let record = CarRecord {
            brand: Some("Hyundai".into()),
            model: Some("i20".into()),
            vehicle_age: Some(5),
            fuel_type: Some(FuelType::Diesel),
            mileage: Some(18.5),
            ..Default::default()
        };
        let frame = record.to_frame().unwrap();

        assert_eq!(frame.height(), 1);
        for name in NUMERICAL_COLUMNS.iter().chain(CATEGORICAL_COLUMNS.iter()) {
            assert!(frame.column(name).is_ok(), "missing {}", name);
        }
        assert_eq!(text_column(&frame, "car_name").unwrap(), vec![Some("Hyundai i20".into())]);
        assert_eq!(text_column(&frame, "fuel_type").unwrap(), vec![Some("Diesel".into())]);
        assert_eq!(numeric_column(&frame, "mileage").unwrap(), vec![Some(18.5)]);
        assert_eq!(numeric_column(&frame, "vehicle_age").unwrap(), vec![Some(5.0)]);
        assert_eq!(numeric_column(&frame, "seats").unwrap(), vec![None]);
    }
}
