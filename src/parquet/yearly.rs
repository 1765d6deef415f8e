use std::{fs::File, path::Path, sync::Arc};

use arrow::{
    array::{ArrayRef, Date32Array, Float32Array, RecordBatch},
    datatypes::{DataType, Field, Schema},
};
use chrono::{Datelike, NaiveDate};
use parquet::{arrow::ArrowWriter, file::properties::WriterProperties};

use crate::{
    cli::create_progress_bar,
    errors::{Error, Result},
    grid::{Dataset, GridSeries},
};

const CHUNK_SIZE: usize = 100_000;

/// Saves a yearly dataset as a single Parquet file: one row per
/// (date, latitude, longitude) cell in time-major order, one nullable value
/// column per variable. `NaN` cells become nulls.
///
/// Every series in the dataset must share the same axes.
pub fn save_yearly(dataset: &Dataset, file_path: &Path) -> Result<()> {
    let series: Vec<&GridSeries> = dataset.iter().collect();
    let first = *series
        .first()
        .ok_or_else(|| Error::Grid("dataset is empty".to_string()))?;

    for other in &series[1..] {
        if other.times != first.times
            || other.latitudes != first.latitudes
            || other.longitudes != first.longitudes
        {
            return Err(Error::Grid(format!(
                "`{}` and `{}` have different axes",
                first.variable, other.variable
            )));
        }
    }

    let (num_times, num_lats, num_lons) = first.shape();
    let total_rows = num_times * num_lats * num_lons;

    let mut fields = vec![
        Field::new("date", DataType::Date32, false),
        Field::new("latitude", DataType::Float32, false),
        Field::new("longitude", DataType::Float32, false),
    ];
    for s in &series {
        fields.push(Field::new(s.variable.as_str(), DataType::Float32, true));
    }
    let schema = Arc::new(Schema::new(fields));

    let props = WriterProperties::builder()
        .set_compression(parquet::basic::Compression::SNAPPY)
        .build();

    let file = File::create(file_path)?;
    let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;

    let date32s: Vec<i32> = first.times.iter().map(|t| to_date32(*t)).collect();

    let pb = create_progress_bar(total_rows as u64, "Writing parquet file chunks".to_string());

    let mut rows_processed = 0;
    while rows_processed < total_rows {
        let batch_size = CHUNK_SIZE.min(total_rows - rows_processed);

        let mut dates = Vec::with_capacity(batch_size);
        let mut latitudes = Vec::with_capacity(batch_size);
        let mut longitudes = Vec::with_capacity(batch_size);
        let mut value_columns: Vec<Vec<Option<f32>>> =
            vec![Vec::with_capacity(batch_size); series.len()];

        for flat in rows_processed..rows_processed + batch_size {
            // Convert the flat row index back to cube coordinates
            let time = flat / (num_lats * num_lons);
            let row = (flat / num_lons) % num_lats;
            let col = flat % num_lons;

            dates.push(date32s[time]);
            latitudes.push(first.latitudes[row]);
            longitudes.push(first.longitudes[col]);

            for (values, s) in value_columns.iter_mut().zip(&series) {
                let value = s.values[[time, row, col]];
                values.push(if value.is_nan() { None } else { Some(value) });
            }
        }

        let mut columns: Vec<(&str, ArrayRef)> = vec![
            ("date", Arc::new(Date32Array::from(dates)) as ArrayRef),
            ("latitude", Arc::new(Float32Array::from(latitudes)) as ArrayRef),
            (
                "longitude",
                Arc::new(Float32Array::from(longitudes)) as ArrayRef,
            ),
        ];
        for (values, s) in value_columns.into_iter().zip(&series) {
            columns.push((
                s.variable.as_str(),
                Arc::new(Float32Array::from(values)) as ArrayRef,
            ));
        }

        let batch = RecordBatch::try_from_iter(columns)?;
        writer.write(&batch)?;

        rows_processed += batch_size;
        pb.inc(batch_size as u64);
    }

    pb.finish_with_message("Finished writing Parquet file");

    writer.close()?;

    Ok(())
}

fn to_date32(date: NaiveDate) -> i32 {
    date.num_days_from_ce()
        - NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap()
            .num_days_from_ce()
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use arrow::array::Array;
    use ndarray::Array3;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::TempDir;

    use super::*;

    fn yearly_series(variable: &str, values: Vec<f32>) -> GridSeries {
        GridSeries {
            variable: variable.to_string(),
            times: vec![
                NaiveDate::from_ymd_opt(1950, 12, 31).unwrap(),
                NaiveDate::from_ymd_opt(1951, 12, 31).unwrap(),
            ],
            latitudes: vec![45.0],
            longitudes: vec![7.0, 8.0],
            values: Array3::from_shape_vec((2, 1, 2), values).unwrap(),
        }
    }

    #[test]
    fn should_write_one_row_per_cell() {
        let mut dataset = Dataset::new();
        dataset.insert(yearly_series(
            "yearly_mean_mean_temperature",
            vec![1.0, 2.0, 3.0, f32::NAN],
        ));
        dataset.insert(yearly_series(
            "yearly_total_precipitation_amount",
            vec![10.0, 20.0, 30.0, 40.0],
        ));

        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("yearly.parquet");
        save_yearly(&dataset, &file_path).unwrap();

        let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&file_path).unwrap())
            .unwrap()
            .build()
            .unwrap();
        let batches: Vec<RecordBatch> = reader.map(|b| b.unwrap()).collect();

        let num_rows: usize = batches.iter().map(|b| b.num_rows()).sum();
        assert_eq!(num_rows, 4);

        let schema = batches[0].schema();
        assert_eq!(
            schema
                .fields()
                .iter()
                .map(|f| f.name().as_str())
                .collect::<Vec<_>>(),
            vec![
                "date",
                "latitude",
                "longitude",
                "yearly_mean_mean_temperature",
                "yearly_total_precipitation_amount",
            ]
        );

        let temperatures = batches[0]
            .column(3)
            .as_any()
            .downcast_ref::<Float32Array>()
            .unwrap();
        assert_eq!(temperatures.value(0), 1.0);
        assert!(temperatures.is_null(3));
    }

    #[test]
    fn should_reject_empty_dataset() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("yearly.parquet");

        let result = save_yearly(&Dataset::new(), &file_path);
        assert!(matches!(result, Err(Error::Grid(_))));
    }

    #[test]
    fn should_reject_mismatched_axes() {
        let mut dataset = Dataset::new();
        dataset.insert(yearly_series("a", vec![1.0, 2.0, 3.0, 4.0]));

        let mut other = yearly_series("b", vec![1.0, 2.0, 3.0, 4.0]);
        other.latitudes = vec![46.0];
        dataset.insert(other);

        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("yearly.parquet");

        let result = save_yearly(&dataset, &file_path);
        assert!(matches!(result, Err(Error::Grid(_))));
    }

    #[test]
    fn should_convert_dates_to_epoch_days() {
        assert_eq!(to_date32(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()), 0);
        assert_eq!(to_date32(NaiveDate::from_ymd_opt(1970, 1, 2).unwrap()), 1);
        assert_eq!(
            to_date32(NaiveDate::from_ymd_opt(1950, 12, 31).unwrap()),
            -6941
        );
    }
}
