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

//! # carprice
//!
//! Used-car resale price prediction: pulls listings from a document store,
//! fits a column-wise preprocessor and a linear regressor, persists both, and
//! serves single-record predictions through a terminal form.
//!
//! The preprocessor fit at training time is the one replayed at serving
//! time; [`service::PriceModel`] refuses to pair it with a model of a
//! different input width.

pub mod algorithms;
pub mod artifacts;
pub mod components;
pub mod config;
pub mod constants;
pub mod data;
pub mod errors;
pub mod losses;
pub mod metrics;
pub mod optimizers;
pub mod preprocessing;
pub mod presentation;
pub mod record;
pub mod scalers;
pub mod schema;
pub mod service;
pub mod store;

pub use ndarray;
pub use polars;

pub use crate::components::TrainingPipeline;
pub use crate::preprocessing::Preprocessor;
pub use crate::record::CarRecord;
pub use crate::service::PriceModel;
