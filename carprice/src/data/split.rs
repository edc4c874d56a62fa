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

use log::debug;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::data::error::DataError;

fn take_rows(frame: &DataFrame, indices: &[usize]) -> Result<DataFrame, DataError> {
    let idx = IdxCa::from_vec("idx".into(), indices.iter().map(|&i| i as IdxSize).collect());
    Ok(frame.take(&idx)?)
}

/// Shuffles the rows of `frame` and splits them into `(train, test)`.
///
/// The test partition receives `ceil(test_ratio * n)` rows and the train
/// partition the rest. Passing a `seed` makes the shuffle reproducible;
/// without one the thread-local generator is used.
pub fn train_test_split(
    frame: &DataFrame,
    test_ratio: f64,
    seed: Option<u64>,
) -> Result<(DataFrame, DataFrame), DataError> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(DataError::InvalidSplitRatio { ratio: test_ratio });
    }

    let total_rows = frame.height();
    let test_size = (total_rows as f64 * test_ratio).ceil() as usize;
    let train_size = total_rows.saturating_sub(test_size);
    if test_size == 0 || train_size == 0 {
        return Err(DataError::EmptyPartition { rows: total_rows, ratio: test_ratio });
    }

    let mut indices: Vec<usize> = (0..total_rows).collect();
    match seed {
        Some(seed) => indices.shuffle(&mut StdRng::seed_from_u64(seed)),
        None => indices.shuffle(&mut rand::thread_rng()),
    }

    let (test_indices, train_indices) = indices.split_at(test_size);
    debug!("Split data: train_size={}, test_size={}", train_size, test_size);

    Ok((take_rows(frame, train_indices)?, take_rows(frame, test_indices)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn numbered(n: usize) -> DataFrame {
        let ids: Vec<i64> = (0..n as i64).collect();
        let labels: Vec<String> = (0..n).map(|i| format!("car-{i}")).collect();
        DataFrame::new(vec![
            Series::new("id".into(), ids).into(),
            Series::new("label".into(), labels).into(),
        ])
        .unwrap()
    }

    fn ids(frame: &DataFrame) -> HashSet<i64> {
        let column = frame.column("id").unwrap().as_materialized_series();
        column.i64().unwrap().into_iter().flatten().collect()
    }

    #[test]
    fn partitions_are_complete_and_disjoint() {
        let frame = numbered(101);
        for ratio in [0.01, 0.2, 0.5, 0.73, 0.99] {
            let (train, test) = train_test_split(&frame, ratio, None).unwrap();
            assert_eq!(train.height() + test.height(), 101);

            let train_ids = ids(&train);
            let test_ids = ids(&test);
            assert!(train_ids.is_disjoint(&test_ids), "ratio {ratio} overlaps");
            assert_eq!(train_ids.union(&test_ids).count(), 101);
        }
    }

    #[test]
    fn rows_keep_their_cells_together() {
        let (train, _) = train_test_split(&numbered(20), 0.3, Some(3)).unwrap();
        let ids = train.column("id").unwrap().as_materialized_series().i64().unwrap().clone();
        let labels = train.column("label").unwrap().as_materialized_series().str().unwrap().clone();
        for (id, label) in ids.into_iter().zip(labels.into_iter()) {
            assert_eq!(label, Some(format!("car-{}", id.unwrap()).as_str()));
        }
    }

    #[test]
    fn test_size_rounds_up() {
        let (train, test) = train_test_split(&numbered(10), 0.25, Some(1)).unwrap();
        assert_eq!(test.height(), 3);
        assert_eq!(train.height(), 7);
    }

    #[test]
    fn seeded_split_is_reproducible() {
        let frame = numbered(50);
        let (train_a, test_a) = train_test_split(&frame, 0.2, Some(42)).unwrap();
        let (train_b, test_b) = train_test_split(&frame, 0.2, Some(42)).unwrap();
        assert!(train_a.equals_missing(&train_b));
        assert!(test_a.equals_missing(&test_b));
    }

    #[test]
    fn rejects_ratio_outside_open_interval() {
        let frame = numbered(10);
        for ratio in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            assert!(matches!(
                train_test_split(&frame, ratio, None),
                Err(DataError::InvalidSplitRatio { .. })
            ));
        }
    }

    #[test]
    fn rejects_split_that_empties_train() {
        let result = train_test_split(&numbered(1), 0.5, None);
        assert!(matches!(result, Err(DataError::EmptyPartition { rows: 1, .. })));
    }
}
