//! Temporal resampling of grid cubes into calendar-year buckets.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use ndarray::Array3;

use crate::{
    errors::{Error, Result},
    grid::GridSeries,
};

/// Reduction applied to each yearly bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reduction {
    Mean,
    Sum,
}

impl Reduction {
    /// Prefix used to label resampled variables.
    pub fn label(&self) -> &'static str {
        match self {
            Reduction::Mean => "yearly_mean",
            Reduction::Sum => "yearly_total",
        }
    }
}

/// Name of the resampled variable, e.g. `yearly_mean_mean_temperature`.
pub fn yearly_name(variable: &str, reduction: Reduction) -> String {
    format!("{}_{}", reduction.label(), variable)
}

/// Groups the time axis into calendar-year buckets and reduces each bucket
/// per grid cell. Spatial axes pass through unchanged; the output time axis
/// holds 31 December of each year present, ascending. A partial final year is
/// reduced like any other bucket.
///
/// Non-finite samples are skipped. A bucket with no valid sample yields `NaN`
/// for both reductions, so a year without data is distinguishable from a year
/// that summed to zero.
pub fn resample_yearly(series: &GridSeries, reduction: Reduction) -> Result<GridSeries> {
    if series.times.is_empty() {
        return Err(Error::Aggregation("time axis is empty".to_string()));
    }
    if series.times.len() != series.values.shape()[0] {
        return Err(Error::Aggregation(format!(
            "time axis has {} entries but values have {} time steps",
            series.times.len(),
            series.values.shape()[0]
        )));
    }

    let mut buckets: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
    for (index, time) in series.times.iter().enumerate() {
        buckets.entry(time.year()).or_default().push(index);
    }

    let (_, rows, cols) = series.shape();
    let mut values = Array3::from_elem((buckets.len(), rows, cols), f32::NAN);
    let mut times = Vec::with_capacity(buckets.len());

    for (bucket, (year, indices)) in buckets.iter().enumerate() {
        times.push(NaiveDate::from_ymd_opt(*year, 12, 31).unwrap());

        for row in 0..rows {
            for col in 0..cols {
                // Accumulate in f64 to avoid precision loss
                let mut sum = 0.0f64;
                let mut count = 0usize;

                for &index in indices {
                    let sample = series.values[[index, row, col]];
                    if sample.is_finite() {
                        sum += sample as f64;
                        count += 1;
                    }
                }

                if count > 0 {
                    values[[bucket, row, col]] = match reduction {
                        Reduction::Mean => (sum / count as f64) as f32,
                        Reduction::Sum => sum as f32,
                    };
                }
            }
        }
    }

    Ok(GridSeries {
        variable: yearly_name(&series.variable, reduction),
        times,
        latitudes: series.latitudes.clone(),
        longitudes: series.longitudes.clone(),
        values,
    })
}

// -- Tests -------------------------------------------------------------------
