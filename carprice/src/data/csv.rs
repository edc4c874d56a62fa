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

use std::fs::{self, File};
use std::path::Path;

use log::debug;
use polars::prelude::*;

use crate::data::error::CsvError;
use crate::data::DataLoader;

/// Cell tokens read back as nulls, besides the empty field.
const NA_TOKENS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "None"];

/// Loads a header-first, comma-delimited UTF-8 file.
///
/// Every column is read as text; numeric parsing is left to the consumers
/// that know which columns are numeric.
pub struct CsvLoader;

fn load_csv_common<P: AsRef<Path>>(path: P) -> Result<DataFrame, CsvError> {
    let path = path.as_ref();
    if fs::metadata(path)?.len() == 0 {
        return Err(CsvError::EmptyFile);
    }

    let null_values = NA_TOKENS.iter().map(|token| (*token).into()).collect();
    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(
            CsvParseOptions::default().with_null_values(Some(NullValues::AllColumns(null_values))),
        )
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    debug!("Loaded {} rows and {} columns from {:?}", frame.height(), frame.width(), path);
    Ok(frame)
}

impl DataLoader for CsvLoader {
    type Error = CsvError;

    fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame, Self::Error> {
        load_csv_common(path)
    }
}

/// Writes `frame` as CSV with a header row, creating parent directories.
///
/// Nulls are written as empty fields.
pub fn write_frame<P: AsRef<Path>>(frame: &DataFrame, path: P) -> Result<(), CsvError> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    let mut file = File::create(path)?;
    let mut frame = frame.clone();
    CsvWriter::new(&mut file).include_header(true).finish(&mut frame)?;

    debug!("Wrote {} rows to {:?}", frame.height(), path);
    Ok(())
}
