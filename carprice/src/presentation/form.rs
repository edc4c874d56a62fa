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

use std::fmt::Display;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::errors::FormError;
use crate::presentation::summary::MarketSummary;
use crate::record::{CarRecord, FuelType, SellerType, TransmissionType};

pub const VEHICLE_AGE_RANGE: RangeInclusive<u32> = 0..=20;
pub const KM_DRIVEN_RANGE: RangeInclusive<u64> = 0..=500_000;
pub const MILEAGE_RANGE: RangeInclusive<f64> = 5.0..=35.0;
pub const ENGINE_RANGE: RangeInclusive<u32> = 500..=5000;
pub const MAX_POWER_RANGE: RangeInclusive<f64> = 20.0..=400.0;
pub const SEATS_RANGE: RangeInclusive<u32> = 2..=10;

fn check_range<T: PartialOrd + Display>(
    field: &'static str,
    value: T,
    range: &RangeInclusive<T>,
) -> Result<T, FormError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(FormError::OutOfRange {
            field,
            value: value.to_string(),
            min: range.start().to_string(),
            max: range.end().to_string(),
        })
    }
}

/// Values collected from the prediction form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormInput {
    pub brand: String,
    pub model: String,
    pub vehicle_age: u32,
    pub km_driven: u64,
    pub seller_type: SellerType,
    pub fuel_type: FuelType,
    pub transmission_type: TransmissionType,
    pub mileage: f64,
    pub engine: u32,
    pub max_power: f64,
    pub seats: u32,
}

impl Default for FormInput {
    fn default() -> Self {
        FormInput {
            brand: String::new(),
            model: String::new(),
            vehicle_age: 5,
            km_driven: 50_000,
            seller_type: SellerType::Individual,
            fuel_type: FuelType::Petrol,
            transmission_type: TransmissionType::Manual,
            mileage: 18.0,
            engine: 1200,
            max_power: 80.0,
            seats: 5,
        }
    }
}

impl FormInput {
    /// Checks every numeric field against its allowed range.
    pub fn validate(&self) -> Result<(), FormError> {
        check_range("vehicle age", self.vehicle_age, &VEHICLE_AGE_RANGE)?;
        check_range("kilometers driven", self.km_driven, &KM_DRIVEN_RANGE)?;
        check_range("mileage", self.mileage, &MILEAGE_RANGE)?;
        check_range("engine", self.engine, &ENGINE_RANGE)?;
        check_range("max power", self.max_power, &MAX_POWER_RANGE)?;
        check_range("seats", self.seats, &SEATS_RANGE)?;
        Ok(())
    }

    pub fn to_record(&self) -> CarRecord {
        CarRecord {
            brand: Some(self.brand.clone()),
            model: Some(self.model.clone()),
            vehicle_age: Some(self.vehicle_age),
            km_driven: Some(self.km_driven),
            seller_type: Some(self.seller_type),
            fuel_type: Some(self.fuel_type),
            transmission_type: Some(self.transmission_type),
            mileage: Some(self.mileage),
            engine: Some(self.engine),
            max_power: Some(self.max_power),
            seats: Some(self.seats),
        }
    }
}

/// One row of the form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Brand,
    Model,
    VehicleAge,
    KmDriven,
    SellerType,
    FuelType,
    TransmissionType,
    Mileage,
    Engine,
    MaxPower,
    Seats,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::Brand,
        Field::Model,
        Field::VehicleAge,
        Field::KmDriven,
        Field::SellerType,
        Field::FuelType,
        Field::TransmissionType,
        Field::Mileage,
        Field::Engine,
        Field::MaxPower,
        Field::Seats,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Brand => "Brand",
            Field::Model => "Model",
            Field::VehicleAge => "Vehicle Age (years)",
            Field::KmDriven => "Kilometers Driven",
            Field::SellerType => "Seller Type",
            Field::FuelType => "Fuel Type",
            Field::TransmissionType => "Transmission Type",
            Field::Mileage => "Mileage (km/l)",
            Field::Engine => "Engine (cc)",
            Field::MaxPower => "Max Power (bhp)",
            Field::Seats => "Number of Seats",
        }
    }

    /// Choice fields cycle through options; the others take typed numbers.
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            Field::Brand
                | Field::Model
                | Field::SellerType
                | Field::FuelType
                | Field::TransmissionType
        )
    }
}

/// What the caller should do after a key press.
#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    Continue,
    Submit(FormInput),
    Quit,
}

fn step(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        0
    } else if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let index = all.iter().position(|v| *v == current).unwrap_or(0);
    all[step(index, all.len(), forward)]
}

fn parse_number<T: FromStr>(field: &'static str, text: &str) -> Result<T, FormError> {
    text.trim().parse::<T>().map_err(|_| FormError::InvalidNumber { field, value: text.to_string() })
}

/// Keyboard-driven state of the prediction form.
///
/// Brands and models are indices into the lists offered by a
/// [`MarketSummary`]; numeric fields are edited as text and only parsed on
/// submit.
#[derive(Debug, Clone)]
pub struct FormState {
    focus: usize,
    brand: usize,
    model: usize,
    seller_type: SellerType,
    fuel_type: FuelType,
    transmission_type: TransmissionType,
    vehicle_age: String,
    km_driven: String,
    mileage: String,
    engine: String,
    max_power: String,
    seats: String,
    error: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        let defaults = FormInput::default();
        FormState {
            focus: 0,
            brand: 0,
            model: 0,
            seller_type: defaults.seller_type,
            fuel_type: defaults.fuel_type,
            transmission_type: defaults.transmission_type,
            vehicle_age: defaults.vehicle_age.to_string(),
            km_driven: defaults.km_driven.to_string(),
            mileage: defaults.mileage.to_string(),
            engine: defaults.engine.to_string(),
            max_power: defaults.max_power.to_string(),
            seats: defaults.seats.to_string(),
            error: None,
        }
    }
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self) -> Field {
        Field::ALL[self.focus]
    }

    /// Message of the last rejected submit, cleared by the next edit.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn brand<'s>(&self, summary: &'s MarketSummary) -> Option<&'s str> {
        summary.brands().get(self.brand).copied()
    }

    fn model<'s>(&self, summary: &'s MarketSummary) -> Option<&'s str> {
        let brand = self.brand(summary)?;
        summary.models(brand).get(self.model).copied()
    }

    fn buffer_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::VehicleAge => Some(&mut self.vehicle_age),
            Field::KmDriven => Some(&mut self.km_driven),
            Field::Mileage => Some(&mut self.mileage),
            Field::Engine => Some(&mut self.engine),
            Field::MaxPower => Some(&mut self.max_power),
            Field::Seats => Some(&mut self.seats),
            _ => None,
        }
    }

    /// Current value of every field, as displayed.
    pub fn entries(&self, summary: &MarketSummary) -> Vec<(Field, String)> {
        Field::ALL
            .iter()
            .map(|&field| {
                let value = match field {
                    Field::Brand => self.brand(summary).unwrap_or("(none)").to_string(),
                    Field::Model => self.model(summary).unwrap_or("(none)").to_string(),
                    Field::VehicleAge => self.vehicle_age.clone(),
                    Field::KmDriven => self.km_driven.clone(),
                    Field::SellerType => self.seller_type.to_string(),
                    Field::FuelType => self.fuel_type.to_string(),
                    Field::TransmissionType => self.transmission_type.to_string(),
                    Field::Mileage => self.mileage.clone(),
                    Field::Engine => self.engine.clone(),
                    Field::MaxPower => self.max_power.clone(),
                    Field::Seats => self.seats.clone(),
                };
                (field, value)
            })
            .collect()
    }

    fn change_choice(&mut self, summary: &MarketSummary, forward: bool) {
        match self.focus() {
            Field::Brand => {
                self.brand = step(self.brand, summary.brands().len(), forward);
                self.model = 0;
            }
            Field::Model => {
                let count = self.brand(summary).map_or(0, |b| summary.models(b).len());
                self.model = step(self.model, count, forward);
            }
            Field::SellerType => {
                self.seller_type = cycle(&SellerType::ALL, self.seller_type, forward)
            }
            Field::FuelType => self.fuel_type = cycle(&FuelType::ALL, self.fuel_type, forward),
            Field::TransmissionType => {
                self.transmission_type =
                    cycle(&TransmissionType::ALL, self.transmission_type, forward)
            }
            _ => {}
        }
    }

    /// Applies one key press.
    ///
    /// Up/Down and Tab move between fields, Left/Right change a choice,
    /// digits and `.` edit a number, Enter submits and Esc quits. `q` quits
    /// too unless a number is being edited.
    pub fn handle_key(&mut self, key: KeyEvent, summary: &MarketSummary) -> FormAction {
        if key.kind != KeyEventKind::Press {
            return FormAction::Continue;
        }
        let focus = self.focus();
        match key.code {
            KeyCode::Esc => return FormAction::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return FormAction::Quit
            }
            KeyCode::Char('q') if focus.is_choice() => return FormAction::Quit,
            KeyCode::Up | KeyCode::BackTab => {
                self.focus = step(self.focus, Field::ALL.len(), false)
            }
            KeyCode::Down | KeyCode::Tab => self.focus = step(self.focus, Field::ALL.len(), true),
            KeyCode::Left => self.change_choice(summary, false),
            KeyCode::Right => self.change_choice(summary, true),
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                if let Some(buffer) = self.buffer_mut(focus) {
                    buffer.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(buffer) = self.buffer_mut(focus) {
                    buffer.pop();
                }
            }
            KeyCode::Enter => {
                return match self.submit(summary) {
                    Ok(input) => {
                        self.error = None;
                        FormAction::Submit(input)
                    }
                    Err(err) => {
                        self.error = Some(err.to_string());
                        FormAction::Continue
                    }
                }
            }
            _ => return FormAction::Continue,
        }
        self.error = None;
        FormAction::Continue
    }

    /// Parses and range-checks the form.
    pub fn submit(&self, summary: &MarketSummary) -> Result<FormInput, FormError> {
        let brand = self.brand(summary).ok_or(FormError::NoOptions { field: "Brand" })?;
        let model = self.model(summary).ok_or(FormError::NoOptions { field: "Model" })?;
        let input = FormInput {
            brand: brand.to_string(),
            model: model.to_string(),
            vehicle_age: parse_number("vehicle age", &self.vehicle_age)?,
            km_driven: parse_number("kilometers driven", &self.km_driven)?,
            seller_type: self.seller_type,
            fuel_type: self.fuel_type,
            transmission_type: self.transmission_type,
            mileage: parse_number("mileage", &self.mileage)?,
            engine: parse_number("engine", &self.engine)?,
            max_power: parse_number("max power", &self.max_power)?,
            seats: parse_number("seats", &self.seats)?,
        };
        input.validate()?;
        Ok(input)
    }
}
