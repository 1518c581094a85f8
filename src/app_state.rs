use crate::cli::CommandLineArgs;
use crate::dataset::{self, Dataset};
use crate::error::DashboardError;

use std::path::Path;
use std::sync::Arc;

/// Shared application state passed to each request handler.
pub struct AppState {
    /// Command line arguments.
    pub args: CommandLineArgs,

    /// The loaded tables, immutable for the lifetime of the process.
    pub dataset: Dataset,
}

impl AppState {
    /// Create and return an [AppState], loading the datasets named in the arguments.
    pub fn new(args: &CommandLineArgs) -> Result<Self, DashboardError> {
        let dataset = dataset::load(
            Path::new(&args.cases_file),
            Path::new(&args.vaccinations_file),
        )?;
        Ok(Self::with_dataset(args, dataset))
    }

    /// Create and return an [AppState] around an already loaded dataset.
    pub fn with_dataset(args: &CommandLineArgs, dataset: Dataset) -> Self {
        Self {
            args: args.clone(),
            dataset,
        }
    }
}

/// AppState wrapped in an Atomic Reference Count (Arc) to allow multiple references.
pub type SharedAppState = Arc<AppState>;
