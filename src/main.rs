mod apps;
mod catalogue;
mod cli;
mod deserialise;
mod download;
mod errors;
mod grid;
mod parquet;
mod reading;
mod resample;
mod variables;

use anyhow::Result;
use chrono::Datelike;
use clap::Parser;

use apps::{Outcome, Registry};
use cli::{Cli, Commands};
use grid::Dataset;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let registry = Registry::standard();

    match cli.command {
        Commands::List {} => {
            for application in registry.iter() {
                println!("{:<28} {}", application.name, application.title);
            }
        }
        Commands::Run {
            name,
            grid_resolution,
            period,
            version,
        } => match registry.get(&name) {
            Some(application) => {
                let mut request = application.default_request();
                if let Some(grid_resolution) = grid_resolution {
                    request.grid_resolution = grid_resolution;
                }
                if let Some(period) = period {
                    request.period = period;
                }
                if let Some(version) = version {
                    request.version = version;
                }

                match application.run(request).await {
                    Ok(Outcome::Saved(path)) => println!("File saved to `{}`", path.display()),
                    Ok(Outcome::Dataset(dataset)) => print_summary(&dataset),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            None => eprintln!("Error: no application named `{}`", name),
        },
    }

    Ok(())
}

fn print_summary(dataset: &Dataset) {
    for series in dataset.iter() {
        let (times, lats, lons) = series.shape();
        match (series.times.first(), series.times.last()) {
            (Some(first), Some(last)) => println!(
                "{}: {} years ({}-{}), {} x {} grid",
                series.variable,
                times,
                first.year(),
                last.year(),
                lats,
                lons
            ),
            _ => println!("{}: empty", series.variable),
        }
    }
}
