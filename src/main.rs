//! This file defines the covid-dashboard binary entry point.

use covid_dashboard::app;
use covid_dashboard::cli;
use covid_dashboard::metrics;
use covid_dashboard::server;
use covid_dashboard::tracing;

/// Application entry point
#[tokio::main]
async fn main() {
    let args = cli::parse();
    tracing::init_tracing(&args);
    ::tracing::debug!("{:?}", args);
    metrics::register_metrics();
    let state = app::init(&args);
    let service = app::service(state);
    server::serve(&args, service).await;
}
