//! Recomputation of the dashboard figures.
//!
//! A change of the selected year triggers every figure in [FigureId::ALL]. Each figure is an
//! independent task over the immutable [Dataset], so tasks may run in any order or in parallel.
//! Every task runs inside its own boundary: a fault is logged and rendered as an empty figure
//! rather than failing the request.

use crate::chart::Figure;
use crate::dataset::Dataset;
use crate::metrics::{FIGURE_BUILD_TIME, FIGURE_FAILURES};
use crate::models::{DashboardResponse, FigureId, FigureResponse, YearQuery};

use rayon::prelude::*;
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{event, Level};

/// Returns the year selected by a query, falling back to the latest year in the data.
pub fn resolve_year(dataset: &Dataset, query: &YearQuery) -> i32 {
    query.year.unwrap_or_else(|| dataset.default_year())
}

/// Whether a figure has no data for the selection.
fn is_empty_selection(dataset: &Dataset, id: FigureId, year: i32) -> bool {
    if id.is_year_dependent() {
        !dataset.contains_year(year)
    } else {
        dataset.vaccinations().is_empty()
    }
}

fn panic_message(cause: &(dyn Any + Send)) -> &str {
    if let Some(message) = cause.downcast_ref::<&str>() {
        message
    } else if let Some(message) = cause.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

/// Run a figure computation inside an error boundary.
///
/// If the computation panics, a warning is logged, the failure is counted and an empty figure
/// titled `title` is returned instead.
///
/// # Arguments
///
/// * `id`: Figure being computed
/// * `year`: Selected year, for logging
/// * `title`: Title of the fallback figure
/// * `compute`: The computation
pub fn guarded<F>(id: FigureId, year: i32, title: &str, compute: F) -> Figure
where
    F: FnOnce() -> Figure,
{
    let label = id.to_string();
    let start = Instant::now();
    let result = panic::catch_unwind(AssertUnwindSafe(compute));
    FIGURE_BUILD_TIME
        .with_label_values(&[label.as_str()])
        .observe(start.elapsed().as_secs_f64());
    match result {
        Ok(figure) => figure,
        Err(cause) => {
            FIGURE_FAILURES.with_label_values(&[label.as_str()]).inc();
            event!(
                Level::WARN,
                figure = %id,
                year,
                reason = panic_message(cause.as_ref()),
                "figure computation failed, rendering empty figure"
            );
            Figure::empty(title)
        }
    }
}

/// Compute one figure for the selected year.
#[tracing::instrument(level = "DEBUG", skip(dataset))]
pub fn render(dataset: &Dataset, id: FigureId, year: i32) -> Figure {
    let builder = id.builder();
    guarded(id, year, &builder.title(), || builder.build(dataset, year))
}

/// Compute one figure and wrap it in a response.
pub fn figure(dataset: &Dataset, id: FigureId, year: i32) -> FigureResponse {
    FigureResponse {
        figure: id,
        year,
        empty_selection: is_empty_selection(dataset, id, year),
        chart: render(dataset, id, year),
    }
}

/// Compute every figure of the page for the selected year.
///
/// # Arguments
///
/// * `dataset`: The loaded tables
/// * `year`: The selected year
/// * `parallel`: Whether to compute the figures on the rayon thread pool
pub fn update(dataset: &Dataset, year: i32, parallel: bool) -> DashboardResponse {
    let figures: BTreeMap<FigureId, Figure> = if parallel {
        FigureId::ALL
            .par_iter()
            .map(|&id| (id, render(dataset, id, year)))
            .collect()
    } else {
        FigureId::ALL
            .iter()
            .map(|&id| (id, render(dataset, id, year)))
            .collect()
    };
    DashboardResponse {
        year,
        empty_selection: !dataset.contains_year(year),
        figures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::chart::Trace;
    use crate::test_utils;

    #[test]
    fn resolve_year_default() {
        let dataset = test_utils::get_test_dataset();
        assert_eq!(2021, resolve_year(&dataset, &YearQuery::default()));
        assert_eq!(
            2020,
            resolve_year(&dataset, &YearQuery { year: Some(2020) })
        );
    }

    #[test]
    fn guarded_ok() {
        let figure = guarded(FigureId::CaseMap, 2021, "New Case Map", || {
            Figure::empty("computed")
        });
        assert_eq!(Figure::empty("computed"), figure);
    }

    #[test]
    fn guarded_panic_renders_empty_figure() {
        let before = FIGURE_FAILURES
            .with_label_values(&["line_case"])
            .get();
        let figure = guarded(FigureId::MonthlyCases, 2021, "Monthly Cases", || {
            panic!("column month missing")
        });
        assert_eq!(Figure::empty("Monthly Cases"), figure);
        let after = FIGURE_FAILURES
            .with_label_values(&["line_case"])
            .get();
        assert!(after > before);
    }

    #[test]
    fn panic_messages() {
        let cause: Box<dyn Any + Send> = Box::new("static");
        assert_eq!("static", panic_message(cause.as_ref()));
        let cause: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!("owned", panic_message(cause.as_ref()));
        let cause: Box<dyn Any + Send> = Box::new(42);
        assert_eq!("unknown panic", panic_message(cause.as_ref()));
    }

    #[test]
    fn figure_response() {
        let dataset = test_utils::get_test_dataset();
        let response = figure(&dataset, FigureId::MonthlyCases, 2021);
        assert_eq!(FigureId::MonthlyCases, response.figure);
        assert_eq!(2021, response.year);
        assert!(!response.empty_selection);
        assert!(!response.chart.is_empty());
    }

    #[test]
    fn figure_response_empty_selection() {
        let dataset = test_utils::get_test_dataset();
        let response = figure(&dataset, FigureId::VaccinationPie, 1999);
        assert!(response.empty_selection);
        assert!(response.chart.is_empty());
        // The ranking does not depend on the year.
        let response = figure(&dataset, FigureId::TopVaccinatedBar, 1999);
        assert!(!response.empty_selection);
        assert!(!response.chart.is_empty());
    }

    #[test]
    fn update_all_figures() {
        let dataset = test_utils::get_test_dataset();
        let response = update(&dataset, 2021, false);
        assert_eq!(2021, response.year);
        assert!(!response.empty_selection);
        assert_eq!(
            FigureId::ALL.to_vec(),
            response.figures.keys().copied().collect::<Vec<_>>()
        );
        match &response.figures[&FigureId::IndicatorAfro].data[0] {
            Trace::Indicator(indicator) => assert_eq!(600.0, indicator.value),
            trace => panic!("unexpected trace {:?}", trace),
        }
    }

    #[test]
    fn update_parallel_matches_sequential() {
        let dataset = test_utils::get_test_dataset();
        for year in [2020, 2021, 2030] {
            let sequential = update(&dataset, year, false);
            let parallel = update(&dataset, year, true);
            assert_eq!(sequential.figures, parallel.figures);
            assert_eq!(sequential.empty_selection, parallel.empty_selection);
        }
    }

    #[test]
    fn update_unknown_year() {
        let dataset = test_utils::get_test_dataset();
        let response = update(&dataset, 2030, false);
        assert!(response.empty_selection);
        assert_eq!(FigureId::ALL.len(), response.figures.len());
    }
}
