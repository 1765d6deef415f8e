//! Grid point reading data structure and parsing logic.
//!
//! Extracted archives contain line-oriented grid files, one record per line:
//! `DATE LAT LON VALUE`, with `-9999` marking a missing value.

use chrono::NaiveDate;

use crate::errors::{Error, Result};

const MISSING_SENTINEL: f32 = -9999.0;

#[derive(Debug, Clone, PartialEq)]
pub struct GridPointReading {
    pub date: NaiveDate,
    pub latitude: f32,
    pub longitude: f32,
    pub value: Option<f32>,
}

impl GridPointReading {
    pub fn from_line(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 4 {
            return Err(Error::Archive(format!(
                "expected 4 fields, got {}: `{}`",
                fields.len(),
                line
            )));
        }

        let date = NaiveDate::parse_from_str(fields[0], "%Y-%m-%d")
            .map_err(|e| Error::Archive(format!("bad date `{}`: {}", fields[0], e)))?;
        let latitude = parse_f32(fields[1])?;
        let longitude = parse_f32(fields[2])?;
        let value = parse_f32(fields[3]).map(filter_missing)?;

        Ok(GridPointReading {
            date,
            latitude,
            longitude,
            value,
        })
    }

    /// Readings with coordinates off the globe are dropped during
    /// deserialisation.
    pub fn is_valid(&self) -> bool {
        self.latitude.abs() <= 90.0 && self.longitude.abs() <= 180.0
    }
}

fn parse_f32(s: &str) -> Result<f32> {
    s.parse::<f32>()
        .map_err(|e| Error::Archive(format!("bad number `{}`: {}", s, e)))
}

fn filter_missing(value: f32) -> Option<f32> {
    if value == MISSING_SENTINEL {
        None
    } else {
        Some(value)
    }
}

// -- Tests -------------------------------------------------------------------
