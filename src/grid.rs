//! Labeled grid cubes: one variable's time × latitude × longitude series,
//! and the named collection returned by a retrieval.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use ndarray::Array3;

use crate::{
    errors::{Error, Result},
    reading::GridPointReading,
};

/// A single variable's gridded time series. Axes are ascending; `values` is
/// indexed `[time, lat, lon]` with `NaN` marking cells without an observation.
#[derive(Debug, Clone)]
pub struct GridSeries {
    pub variable: String,
    pub times: Vec<NaiveDate>,
    pub latitudes: Vec<f32>,
    pub longitudes: Vec<f32>,
    pub values: Array3<f32>,
}

impl GridSeries {
    /// Assembles a cube from point readings. The axes are the sorted distinct
    /// coordinates seen in the readings; cells never observed stay `NaN`.
    pub fn from_readings(variable: &str, readings: &[GridPointReading]) -> Result<Self> {
        if readings.is_empty() {
            return Err(Error::Grid(format!("no readings for `{}`", variable)));
        }

        let times: Vec<NaiveDate> = readings
            .iter()
            .map(|r| r.date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let latitudes = sorted_coordinates(readings.iter().map(|r| r.latitude));
        let longitudes = sorted_coordinates(readings.iter().map(|r| r.longitude));

        let mut values = Array3::from_elem(
            (times.len(), latitudes.len(), longitudes.len()),
            f32::NAN,
        );

        for reading in readings {
            let t = times.binary_search(&reading.date).map_err(|_| {
                Error::Grid(format!("time axis lookup failed for {}", reading.date))
            })?;
            let row = coordinate_index(&latitudes, reading.latitude)?;
            let col = coordinate_index(&longitudes, reading.longitude)?;

            if let Some(value) = reading.value {
                values[[t, row, col]] = value;
            }
        }

        Ok(GridSeries {
            variable: variable.to_string(),
            times,
            latitudes,
            longitudes,
            values,
        })
    }

    /// (time, lat, lon) lengths.
    pub fn shape(&self) -> (usize, usize, usize) {
        let shape = self.values.shape();
        (shape[0], shape[1], shape[2])
    }
}

fn sorted_coordinates(coords: impl Iterator<Item = f32>) -> Vec<f32> {
    let mut coords: Vec<f32> = coords.collect();
    coords.sort_by(f32::total_cmp);
    coords.dedup();

    coords
}

fn coordinate_index(axis: &[f32], coordinate: f32) -> Result<usize> {
    axis.binary_search_by(|probe| probe.total_cmp(&coordinate))
        .map_err(|_| Error::Grid(format!("coordinate axis lookup failed for {}", coordinate)))
}

/// A labeled collection of grid series, keyed by variable name.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    series: BTreeMap<String, GridSeries>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, series: GridSeries) {
        self.series.insert(series.variable.clone(), series);
    }

    pub fn get(&self, variable: &str) -> Option<&GridSeries> {
        self.series.get(variable)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridSeries> {
        self.series.values()
    }

    pub fn names(&self) -> Vec<&str> {
        self.series.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

// -- Tests -------------------------------------------------------------------
