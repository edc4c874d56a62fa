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

//! Binary persistence for fitted objects and transformed arrays.
//!
//! Everything is stored with `bincode`. Writers create missing parent
//! directories; readers report a missing file as [`ArtifactError::NotFound`]
//! so callers can tell "never trained" apart from a corrupt artifact.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use log::debug;
use ndarray::Array2;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::ArtifactError;

fn ensure_parent(path: &Path) -> Result<(), ArtifactError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .map_err(|source| ArtifactError::Io { path: dir.to_path_buf(), source })?;
    }
    Ok(())
}

fn open(path: &Path) -> Result<File, ArtifactError> {
    File::open(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => ArtifactError::NotFound { path: path.to_path_buf() },
        _ => ArtifactError::Io { path: path.to_path_buf(), source },
    })
}

/// Serializes `value` to `path`.
pub fn save_object<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<(), ArtifactError> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let file = File::create(path)
        .map_err(|source| ArtifactError::Io { path: path.to_path_buf(), source })?;
    bincode::serialize_into(BufWriter::new(file), value)
        .map_err(|source| ArtifactError::Encode { path: path.to_path_buf(), source })?;
    debug!("Saved artifact to {:?}", path);
    Ok(())
}

/// Deserializes a value previously written by [`save_object`].
pub fn load_object<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, ArtifactError> {
    let path = path.as_ref();
    let file = open(path)?;
    let value = bincode::deserialize_from(BufReader::new(file))
        .map_err(|source| ArtifactError::Decode { path: path.to_path_buf(), source })?;
    debug!("Loaded artifact from {:?}", path);
    Ok(value)
}

pub fn save_array<P: AsRef<Path>>(array: &Array2<f64>, path: P) -> Result<(), ArtifactError> {
    save_object(array, path)
}

pub fn load_array<P: AsRef<Path>>(path: P) -> Result<Array2<f64>, ArtifactError> {
    load_object(path)
}

/// Copies an artifact into `dest_dir`, keeping its file name.
pub fn copy_artifact<P: AsRef<Path>, Q: AsRef<Path>>(
    src: P,
    dest_dir: Q,
) -> Result<PathBuf, ArtifactError> {
    let src = src.as_ref();
    let dest_dir = dest_dir.as_ref();
    let file_name =
        src.file_name().ok_or_else(|| ArtifactError::NotFound { path: src.to_path_buf() })?;
    if !src.is_file() {
        return Err(ArtifactError::NotFound { path: src.to_path_buf() });
    }
    fs::create_dir_all(dest_dir)
        .map_err(|source| ArtifactError::Io { path: dest_dir.to_path_buf(), source })?;
    let dest = dest_dir.join(file_name);
    fs::copy(src, &dest).map_err(|source| ArtifactError::Io { path: dest.clone(), source })?;
    debug!("Copied {:?} to {:?}", src, dest);
    Ok(dest)
}
