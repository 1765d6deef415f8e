//! Resample and download the precipitation grid: retrieve the full period,
//! aggregate to yearly totals, save as Parquet.

use futures::future::BoxFuture;

use crate::{
    apps::{Application, Outcome},
    catalogue::{self, Request, EUROPEAN_GRIDDED_OBSERVATIONS},
    errors::{Error, Result},
    grid::Dataset,
    parquet,
    resample::{resample_yearly, Reduction},
};

use super::make_parquet_file_name;

const VARIABLE: &str = "precipitation_amount";

pub fn application() -> Application {
    Application::new(
        "resample-precipitation",
        "Resample and Download Precipitation Grid",
        default_request,
        entry,
    )
}

fn default_request() -> Request {
    Request::for_variables(&[VARIABLE])
}

fn entry(request: Request) -> BoxFuture<'static, Result<Outcome>> {
    Box::pin(precipitation(request))
}

pub async fn precipitation(request: Request) -> Result<Outcome> {
    let data = catalogue::retrieve(EUROPEAN_GRIDDED_OBSERVATIONS, &request).await?;
    let series = data.get(VARIABLE).ok_or_else(|| Error::VariableNotFound {
        variable: VARIABLE.to_string(),
    })?;

    let yearly_total_precipitation = resample_yearly(series, Reduction::Sum)?;

    let mut dataset = Dataset::new();
    dataset.insert(yearly_total_precipitation);

    let parquet_file_name = make_parquet_file_name("precipitation");
    parquet::save_yearly(&dataset, &parquet_file_name)?;

    Ok(Outcome::Saved(parquet_file_name))
}

// -- Tests -------------------------------------------------------------------
