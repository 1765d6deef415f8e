//! Catalogue retrieval: constraint record, request submission, and staging of
//! the returned archives into an in-memory dataset.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::TempDir;

use crate::{
    cli::{create_progress_bar, create_spinner},
    deserialise::deserialise,
    download::{download_archive, extract_tar},
    errors::{Error, Result},
    grid::{Dataset, GridSeries},
    variables,
};

/// The European land-only gridded observational dataset (E-OBS).
pub const EUROPEAN_GRIDDED_OBSERVATIONS: &str = "insitu-gridded-observations-europe";

const CATALOGUE_ROOT: &str = "https://cds.climate.copernicus.eu/api/v2";

/// Constraint record submitted to the catalogue. The catalogue owns the
/// domain semantics of every field; in particular this client never
/// interprets what `full_period` spans.
///
/// Defaults select the 0.1 degree ensemble-mean grid, full period,
/// version 29.0e.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    #[serde(rename = "variable")]
    pub variables: Vec<String>,
    pub grid_resolution: String,
    pub period: String,
    pub version: String,
    pub product_type: String,
}

impl Default for Request {
    fn default() -> Self {
        Request {
            variables: vec![],
            grid_resolution: "0.1deg".to_string(),
            period: "full_period".to_string(),
            version: "29.0e".to_string(),
            product_type: "ensemble_mean".to_string(),
        }
    }
}

impl Request {
    pub fn for_variables(names: &[&str]) -> Self {
        Request {
            variables: names.iter().map(|n| n.to_string()).collect(),
            ..Request::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct Submission {
    locations: Vec<ArchiveLocation>,
}

/// One downloadable archive per requested variable.
#[derive(Debug, Deserialize)]
struct ArchiveLocation {
    variable: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct CatalogueMessage {
    message: String,
}

/// Rejects requests naming variables the dataset does not publish, before any
/// network traffic happens.
pub fn validate(request: &Request) -> Result<()> {
    if request.variables.is_empty() {
        return Err(Error::InvalidRequest("no variables requested".to_string()));
    }

    for name in &request.variables {
        if variables::lookup(name).is_none() {
            return Err(Error::InvalidRequest(format!(
                "variable `{}` is not available in `{}`",
                name, EUROPEAN_GRIDDED_OBSERVATIONS
            )));
        }
    }

    Ok(())
}

/// Retrieves the requested variables as a labeled dataset of grid cubes.
///
/// Blocks until the catalogue has answered and every archive is staged,
/// extracted, and deserialised. All staging happens in a temp dir that is
/// dropped before returning.
pub async fn retrieve(dataset_id: &str, request: &Request) -> Result<Dataset> {
    validate(request)?;

    let locations = submit(dataset_id, request).await?;
    let temp_dir = TempDir::new()?;

    let archive_paths = download_archives(&locations, temp_dir.path()).await?;
    let extraction_dir = extract_archives(&archive_paths, temp_dir.path())?;
    let readings = deserialise(&extraction_dir).await?;

    let mut dataset = Dataset::new();
    for (variable, readings) in &readings {
        dataset.insert(GridSeries::from_readings(variable, readings)?);
    }

    for name in &request.variables {
        if dataset.get(name).is_none() {
            return Err(Error::VariableNotFound {
                variable: name.clone(),
            });
        }
    }

    Ok(dataset)
}

/// Submits the constraint record and returns the archive locations the
/// catalogue resolved for it.
async fn submit(dataset_id: &str, request: &Request) -> Result<Vec<ArchiveLocation>> {
    let url = format!("{}/resources/{}", CATALOGUE_ROOT, dataset_id);

    let response = reqwest::Client::new()
        .post(&url)
        .json(request)
        .send()
        .await
        .map_err(|e| Error::TransientNetwork(format!("failed to reach catalogue: {}", e)))?;

    let status = response.status();
    if status.is_client_error() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<CatalogueMessage>(&body)
            .map(|m| m.message)
            .unwrap_or(body);
        return Err(Error::InvalidRequest(message));
    }
    if !status.is_success() {
        return Err(Error::TransientNetwork(format!(
            "catalogue returned {}",
            status
        )));
    }

    let submission: Submission = response
        .json()
        .await
        .map_err(|e| Error::TransientNetwork(format!("unreadable catalogue response: {}", e)))?;

    Ok(submission.locations)
}

async fn download_archives(
    locations: &[ArchiveLocation],
    temp_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut files = vec![];

    for location in locations {
        let filename = location.url.split('/').last().unwrap();
        let file_path = temp_dir.join(filename);

        let bar = create_spinner(format!("Downloading {}...", location.variable));
        download_archive(&location.url, &file_path, &bar).await?;
        bar.finish_with_message(format!("{} downloaded", location.variable));

        files.push(file_path);
    }

    Ok(files)
}

fn extract_archives(archive_paths: &[PathBuf], working_dir: &Path) -> Result<PathBuf> {
    let extraction_dir = working_dir.join("extracted");
    std::fs::create_dir_all(&extraction_dir)?;

    let pb = create_progress_bar(archive_paths.len() as u64, "Extracting files...".to_string());
    for archive_path in archive_paths {
        extract_tar(archive_path, &extraction_dir)?;
        pb.inc(1);
    }
    pb.finish_with_message("Files extracted");

    Ok(extraction_dir)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn should_default_to_full_period_ensemble_mean() {
        let request = Request::default();

        assert_eq!(request.grid_resolution, "0.1deg");
        assert_eq!(request.period, "full_period");
        assert_eq!(request.version, "29.0e");
        assert_eq!(request.product_type, "ensemble_mean");
        assert!(request.variables.is_empty());
    }

    #[test]
    fn should_serialise_constraints_with_wire_names() {
        let request = Request::for_variables(&["mean_temperature", "precipitation_amount"]);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(
            body["variable"],
            serde_json::json!(["mean_temperature", "precipitation_amount"])
        );
        assert_eq!(body["grid_resolution"], "0.1deg");
        assert_eq!(body["period"], "full_period");
        assert_eq!(body["version"], "29.0e");
        assert_eq!(body["product_type"], "ensemble_mean");
    }

    #[test]
    fn should_reject_unsupported_variable() {
        let request = Request::for_variables(&["mean_temperature", "snow_depth"]);

        let result = validate(&request);
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn should_reject_empty_variable_list() {
        let result = validate(&Request::default());
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn should_accept_published_variables() {
        let request = Request::for_variables(&[
            "maximum_temperature",
            "mean_temperature",
            "minimum_temperature",
            "precipitation_amount",
            "relative_humidity",
            "surface_shortwave_downwelling_radiation",
        ]);

        assert!(validate(&request).is_ok());
    }

    #[test]
    fn should_parse_submission_response() {
        let submission: Submission = serde_json::from_str(
            r#"{
                "locations": [
                    {"variable": "mean_temperature",
                     "url": "https://download.example/tg_ens_mean_0.1deg_full_period_v29.0e.tar.gz"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(submission.locations.len(), 1);
        assert_eq!(submission.locations[0].variable, "mean_temperature");
    }
}
