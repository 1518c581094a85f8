//! This crate provides a web dashboard of COVID-19 case, death and vaccination statistics by
//! country and WHO region.
//!
//! Two CSV snapshots are loaded once at startup into an immutable [dataset::Dataset]. Selecting a
//! year on the page recomputes ten independent figures: five regional indicators, a vaccination
//! pie, a choropleth map of new cases, a top-10 vaccination bar chart and monthly case and death
//! lines. Each figure is a pure function of the dataset and the selected year, built by filtering,
//! grouping and summing the tables ([aggregation]) and mapping the result to a declarative
//! [plotly.js](https://plotly.com/javascript/) chart specification ([figures]).
//!
//! The dashboard is built on top of a number of open source components.
//!
//! * [Tokio](tokio), the most popular asynchronous Rust runtime.
//! * [Axum](axum) web framework, built by the Tokio team.
//! * [Serde](serde) performs (de)serialisation of CSV rows and JSON responses.
//! * [csv] reads the dataset files.
//! * [Rayon](rayon) optionally computes the figures of an update in parallel.

pub mod aggregation;
pub mod app;
pub mod app_state;
pub mod chart;
pub mod cli;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod figures;
pub mod metrics;
pub mod models;
pub mod page;
pub mod server;
#[cfg(test)]
pub mod test_utils;
pub mod tracing;
pub mod validated_query;
