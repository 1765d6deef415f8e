//! Resample and download the mean temperature grid: retrieve the full
//! period, aggregate to yearly averages, save as Parquet.

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

const VARIABLE: &str = "mean_temperature";

pub fn application() -> Application {
    Application::new(
        "resample-mean-temperature",
        "Resample and Download Mean Temperature Grid",
        default_request,
        entry,
    )
}

fn default_request() -> Request {
    Request::for_variables(&[VARIABLE])
}

fn entry(request: Request) -> BoxFuture<'static, Result<Outcome>> {
    Box::pin(mean_temperature(request))
}

pub async fn mean_temperature(request: Request) -> Result<Outcome> {
    let data = catalogue::retrieve(EUROPEAN_GRIDDED_OBSERVATIONS, &request).await?;
    let series = data.get(VARIABLE).ok_or_else(|| Error::VariableNotFound {
        variable: VARIABLE.to_string(),
    })?;

    let yearly_mean_temperature = resample_yearly(series, Reduction::Mean)?;

    let mut dataset = Dataset::new();
    dataset.insert(yearly_mean_temperature);

    let parquet_file_name = make_parquet_file_name("mean-temperature");
    parquet::save_yearly(&dataset, &parquet_file_name)?;

    Ok(Outcome::Saved(parquet_file_name))
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn should_request_full_period_mean_temperature() {
        let request = default_request();

        assert_eq!(request.variables, vec!["mean_temperature".to_string()]);
        assert_eq!(request.period, "full_period");
        assert_eq!(request.grid_resolution, "0.1deg");
        assert_eq!(request.version, "29.0e");
    }
}
