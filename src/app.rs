//! Dashboard page and HTTP API

use crate::app_state::{AppState, SharedAppState};
use crate::cli::CommandLineArgs;
use crate::dashboard;
use crate::error::DashboardError;
use crate::metrics::{metrics_handler, record_response_metrics, request_counter};
use crate::models::{self, FigureId};
use crate::page;
use crate::validated_query::ValidatedQuery;

use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::error::Error;
use std::process::exit;
use std::sync::Arc;
use tower::Layer;
use tower::ServiceBuilder;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

/// `Service` type returned by [service] and served by [crate::server::serve].
pub type Service = NormalizePath<Router>;

/// A JSON response body, pretty printed in debug mode.
struct JsonBody<T> {
    value: T,
    pretty: bool,
}

impl<T: Serialize> IntoResponse for JsonBody<T> {
    fn into_response(self) -> Response {
        let body = if self.pretty {
            serde_json::to_string_pretty(&self.value)
        } else {
            serde_json::to_string(&self.value)
        };
        match body {
            Ok(body) => (
                [(&header::CONTENT_TYPE, mime::APPLICATION_JSON.to_string())],
                body,
            )
                .into_response(),
            Err(err) => (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to serialise response: {}", err),
            )
                .into_response(),
        }
    }
}

/// Initialise the application: load the datasets.
///
/// A dataset that cannot be loaded is fatal.
pub fn init(args: &CommandLineArgs) -> SharedAppState {
    match AppState::new(args) {
        Ok(state) => Arc::new(state),
        Err(error) => {
            tracing::error!("{}", error);
            let mut current = error.source();
            while let Some(source) = current {
                tracing::error!("Caused by: {}", source);
                current = source.source();
            }
            exit(1)
        }
    }
}

/// Returns a [axum::Router] for the dashboard page and API
///
/// # Arguments
///
/// * `state`: Shared application state
pub fn router(state: SharedAppState) -> Router {
    fn v1() -> Router<SharedAppState> {
        Router::new()
            .route("/years", get(years))
            .route("/dashboard", get(dashboard_figures))
            .route("/figures/:figure", get(figure))
    }

    Router::new()
        .route("/", get(index))
        .route("/metrics", get(metrics_handler))
        .nest("/api/v1", v1())
        .layer(
            ServiceBuilder::new().layer(
                TraceLayer::new_for_http()
                    .on_request(request_counter)
                    .on_response(record_response_metrics),
            ),
        )
        .with_state(state)
}

/// Returns a [crate::app::Service] for the dashboard
///
/// The service trims trailing slashes from request paths before routing.
///
/// # Arguments
///
/// * `state`: Shared application state
pub fn service(state: SharedAppState) -> Service {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}

async fn index(State(state): State<SharedAppState>) -> Html<String> {
    let dataset = &state.dataset;
    Html(page::render(dataset.years(), dataset.default_year()))
}

async fn years(State(state): State<SharedAppState>) -> impl IntoResponse {
    let dataset = &state.dataset;
    JsonBody {
        value: models::YearsResponse {
            years: dataset.years().to_vec(),
            default: dataset.default_year(),
        },
        pretty: state.args.debug,
    }
}

/// Recompute every figure for the selected year.
async fn dashboard_figures(
    State(state): State<SharedAppState>,
    ValidatedQuery(query): ValidatedQuery<models::YearQuery>,
) -> impl IntoResponse {
    let year = dashboard::resolve_year(&state.dataset, &query);
    let pretty = state.args.debug;
    let response = if state.args.use_rayon {
        let state = state.clone();
        tokio_rayon::spawn(move || dashboard::update(&state.dataset, year, true)).await
    } else {
        dashboard::update(&state.dataset, year, false)
    };
    JsonBody {
        value: response,
        pretty,
    }
}

/// Recompute a single figure for the selected year.
async fn figure(
    State(state): State<SharedAppState>,
    Path(name): Path<String>,
    ValidatedQuery(query): ValidatedQuery<models::YearQuery>,
) -> Result<impl IntoResponse, DashboardError> {
    let id = FigureId::from_name(&name).ok_or(DashboardError::UnknownFigure { name })?;
    let year = dashboard::resolve_year(&state.dataset, &query);
    Ok(JsonBody {
        value: dashboard::figure(&state.dataset, id, year),
        pretty: state.args.debug,
    })
}
