//! Deserialises a folder of extracted grid files into readings per variable.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead};
use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};

use crate::errors::Result;
use crate::reading::GridPointReading;
use crate::variables;

/// Loads every grid file in the extraction directory and groups the readings
/// by the variable named in each file. Files that do not carry a known
/// variable code, and files that fail to parse, are reported and skipped.
pub async fn deserialise(extraction_dir: &Path) -> Result<BTreeMap<String, Vec<GridPointReading>>> {
    let files: Vec<PathBuf> = extraction_dir
        .read_dir()?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::result::Result<Vec<_>, io::Error>>()?;

    let progress_bar = Arc::new(Mutex::new(
        ProgressBar::new(files.len() as u64).with_message("Processing files"),
    ));
    progress_bar.lock().unwrap().set_style(
        ProgressStyle::with_template("[{eta_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    let tasks: Vec<_> = files
        .iter()
        .filter_map(|file| {
            let variable = variable_for(file)?;
            let file = file.clone();
            let pb = Arc::clone(&progress_bar);
            Some(tokio::spawn(async move {
                (variable, process_file(&file, pb))
            }))
        })
        .collect();

    let mut readings: BTreeMap<String, Vec<GridPointReading>> = BTreeMap::new();
    for result in join_all(tasks).await {
        match result {
            Ok((variable, Ok(file_readings))) => {
                readings.entry(variable).or_default().extend(file_readings)
            }
            Ok((_, Err(e))) => eprintln!("Error processing file: {:?}", e),
            Err(e) => eprintln!("Task join error: {:?}", e),
        }
    }
    progress_bar
        .lock()
        .unwrap()
        .finish_with_message("Processing complete");

    Ok(readings)
}

fn variable_for(file: &Path) -> Option<String> {
    let file_name = file.file_name()?.to_str()?;
    match variables::for_file_name(file_name) {
        Some(spec) => Some(spec.name.to_string()),
        None => {
            eprintln!("Skipping unrecognised file `{}`", file_name);
            None
        }
    }
}

fn process_file(
    file_path: &Path,
    progress_bar: Arc<Mutex<ProgressBar>>,
) -> Result<Vec<GridPointReading>> {
    let mut readings = Vec::new();

    let file = File::open(file_path)?;
    let reader = io::BufReader::new(file);

    for line in reader.lines() {
        let line = line?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let reading = GridPointReading::from_line(&line)?;
        if reading.is_valid() {
            readings.push(reading);
        }
    }

    {
        let pb = progress_bar.lock().unwrap();
        pb.inc(1);
    }

    Ok(readings)
}

// -- Tests -------------------------------------------------------------------
