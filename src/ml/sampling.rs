//! Row sampling and train/test splitting.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::dataframe::DataFrame;
use crate::error::{Error, Result};

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Draw a row sample from the table.
///
/// With `replace` set, rows may repeat; otherwise the sample is a shuffled
/// subset and the fraction may not exceed 1.0. Pass a seed for
/// reproducibility.
pub fn sample(df: &DataFrame, fraction: f64, replace: bool, seed: Option<u64>) -> Result<DataFrame> {
    if fraction <= 0.0 {
        return Err(Error::InvalidValue(
            "sample fraction must be positive".to_string(),
        ));
    }

    let row_count = df.row_count();
    if row_count == 0 {
        return Ok(DataFrame::new());
    }

    let sample_size = (row_count as f64 * fraction).ceil() as usize;
    if !replace && sample_size > row_count {
        return Err(Error::InvalidValue(
            "sample size exceeds table size when sampling without replacement".to_string(),
        ));
    }

    let mut rng = make_rng(seed);
    let indices: Vec<usize> = if replace {
        (0..sample_size)
            .map(|_| rng.random_range(0..row_count))
            .collect()
    } else {
        let mut indices: Vec<usize> = (0..row_count).collect();
        indices.shuffle(&mut rng);
        indices.truncate(sample_size);
        indices
    };

    df.take(&indices)
}

/// Split the table into disjoint train and test tables.
///
/// `test_fraction` must be strictly between 0 and 1; the test size is
/// rounded up, and both sides must end up non-empty.
pub fn train_test_split(
    df: &DataFrame,
    test_fraction: f64,
    seed: Option<u64>,
) -> Result<(DataFrame, DataFrame)> {
    if test_fraction <= 0.0 || test_fraction >= 1.0 {
        return Err(Error::InvalidValue(
            "test fraction must be strictly between 0 and 1".to_string(),
        ));
    }

    let row_count = df.row_count();
    let test_size = (row_count as f64 * test_fraction).ceil() as usize;
    if row_count < 2 || test_size >= row_count {
        return Err(Error::InsufficientData(format!(
            "cannot split {} rows into non-empty train and test sets",
            row_count
        )));
    }

    let mut indices: Vec<usize> = (0..row_count).collect();
    indices.shuffle(&mut make_rng(seed));

    let test = df.take(&indices[..test_size])?;
    let train = df.take(&indices[test_size..])?;
    Ok((train, test))
}
