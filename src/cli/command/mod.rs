pub mod mean_temperature;
pub mod precipitation;
pub mod yearly_means;

use std::path::PathBuf;

use chrono::{Datelike, Local};

/// Dated output file in the home directory, e.g.
/// `eobs-mean-temperature-2026-08-06.parquet`.
pub fn make_parquet_file_name(application: &str) -> PathBuf {
    let today = Local::now();
    let file_name = format!(
        "eobs-{}-{}-{:02}-{:02}.parquet",
        application,
        today.year(),
        today.month(),
        today.day()
    );

    dirs::home_dir().unwrap().join(file_name)
}

// -- Tests -------------------------------------------------------------------
