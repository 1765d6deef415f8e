//! Calculate yearly means: retrieve the six published variables for
//! 1950–1964 and aggregate each to yearly buckets under its policy.

use futures::future::BoxFuture;

use crate::{
    apps::{Application, Outcome},
    catalogue::{self, Request, EUROPEAN_GRIDDED_OBSERVATIONS},
    errors::{Error, Result},
    grid::Dataset,
    resample::resample_yearly,
    variables,
};

pub fn application() -> Application {
    Application::new(
        "calc-yearly-means",
        "Calculate Yearly Means",
        default_request,
        entry,
    )
}

fn default_request() -> Request {
    Request {
        variables: variables::VARIABLES
            .iter()
            .map(|v| v.name.to_string())
            .collect(),
        period: "1950_1964".to_string(),
        ..Request::default()
    }
}

fn entry(request: Request) -> BoxFuture<'static, Result<Outcome>> {
    Box::pin(yearly_means(request))
}

pub async fn yearly_means(request: Request) -> Result<Outcome> {
    let data = catalogue::retrieve(EUROPEAN_GRIDDED_OBSERVATIONS, &request).await?;
    let yearly = aggregate(&data, &request.variables)?;

    Ok(Outcome::Dataset(yearly))
}

/// Resamples every requested variable to yearly buckets: temperatures,
/// humidity and radiation average, precipitation accumulates.
fn aggregate(data: &Dataset, requested: &[String]) -> Result<Dataset> {
    let mut yearly = Dataset::new();

    for name in requested {
        let spec = variables::lookup(name).ok_or_else(|| {
            Error::InvalidRequest(format!("variable `{}` has no aggregation policy", name))
        })?;
        let series = data.get(name).ok_or_else(|| Error::VariableNotFound {
            variable: name.clone(),
        })?;

        yearly.insert(resample_yearly(series, spec.reduction)?);
    }

    Ok(yearly)
}

// -- Tests -------------------------------------------------------------------
