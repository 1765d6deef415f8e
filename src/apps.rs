//! Explicit application registry.
//!
//! Applications are registered by name at process start; nothing is
//! discovered implicitly. Every entry point takes the request it should run
//! with and reports its outcome.

use std::path::PathBuf;

use futures::future::BoxFuture;

use crate::{catalogue::Request, cli::command, errors::Result, grid::Dataset};

/// What an application produced: a labeled dataset handed back to the caller,
/// or a file written to disk.
#[derive(Debug)]
pub enum Outcome {
    Dataset(Dataset),
    Saved(PathBuf),
}

type Entry = fn(Request) -> BoxFuture<'static, Result<Outcome>>;

/// A runnable application: a dispatch name, a human-readable title, the
/// request it was written for, and its entry point.
pub struct Application {
    pub name: &'static str,
    pub title: &'static str,
    default_request: fn() -> Request,
    entry: Entry,
}

impl Application {
    pub fn new(
        name: &'static str,
        title: &'static str,
        default_request: fn() -> Request,
        entry: Entry,
    ) -> Self {
        Application {
            name,
            title,
            default_request,
            entry,
        }
    }

    pub fn default_request(&self) -> Request {
        (self.default_request)()
    }

    pub async fn run(&self, request: Request) -> Result<Outcome> {
        (self.entry)(request).await
    }
}

/// Name → application table.
#[derive(Default)]
pub struct Registry {
    applications: Vec<Application>,
}

impl Registry {
    /// The three standard applications.
    pub fn standard() -> Self {
        let mut registry = Registry::default();
        registry.register(command::yearly_means::application());
        registry.register(command::mean_temperature::application());
        registry.register(command::precipitation::application());

        registry
    }

    pub fn register(&mut self, application: Application) {
        self.applications.retain(|a| a.name != application.name);
        self.applications.push(application);
    }

    pub fn get(&self, name: &str) -> Option<&Application> {
        self.applications.iter().find(|a| a.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Application> {
        self.applications.iter()
    }
}

// -- Tests -------------------------------------------------------------------
