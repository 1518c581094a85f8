//! Error handling.

use axum::{
    extract::rejection::QueryRejection,
    http::header,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::error::Error;
use thiserror::Error;
use tracing::{event, Level};

/// Dashboard error type
///
/// This type encapsulates the various errors that may occur.
/// Data load errors are fatal at startup. Request errors result in an API error response.
/// Failures while computing a single figure are not represented here: they are contained by
/// [crate::dashboard::render] and rendered as an empty figure.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Error opening a dataset file
    #[error("failed to open dataset {path}")]
    DataFileOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error reading or deserialising a dataset file
    #[error("failed to parse dataset {path}")]
    DataParse {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// A dataset row that parsed but violates the data model
    #[error("invalid record in {path} at line {line}: {reason}")]
    InvalidRecord {
        path: String,
        line: u64,
        reason: String,
    },

    /// The case dataset has no rows, so there is no year to select
    #[error("dataset {path} contains no records")]
    EmptyDataset { path: String },

    /// Error deserialising request query parameters
    #[error("request query is not valid")]
    RequestQueryRejection(#[from] QueryRejection),

    /// Error validating request query parameters
    #[error("request query is not valid")]
    RequestValidation(#[from] validator::ValidationErrors),

    /// Request for a figure that does not exist
    #[error("unknown figure {name}")]
    UnknownFigure { name: String },
}

impl IntoResponse for DashboardError {
    /// Convert from a `DashboardError` into an [axum::response::Response].
    fn into_response(self) -> Response {
        ErrorResponse::from(self).into_response()
    }
}

/// Body of error response
///
/// Implements serde (de)serialise.
#[derive(Deserialize, Serialize)]
struct ErrorBody {
    /// Main error message
    message: String,

    /// Optional list of causes
    #[serde(skip_serializing_if = "Option::is_none")]
    caused_by: Option<Vec<String>>,
}

impl ErrorBody {
    /// Return a new ErrorBody
    ///
    /// # Arguments
    ///
    /// * `error`: The error that occurred
    fn new<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        let message = error.to_string();
        let mut causes = vec![];
        let mut current = error.source();
        while let Some(source) = current {
            causes.push(source.to_string());
            current = source.source();
        }
        // Remove duplicate entries.
        causes.dedup();
        let caused_by = if causes.is_empty() {
            None
        } else {
            Some(causes)
        };
        ErrorBody { message, caused_by }
    }
}

/// A response to send in error cases
///
/// Implements serde (de)serialise.
#[derive(Deserialize, Serialize)]
struct ErrorResponse {
    /// HTTP status of the response
    #[serde(skip)]
    status: StatusCode,

    /// Response body
    error: ErrorBody,
}

impl ErrorResponse {
    /// Return a new ErrorResponse
    ///
    /// # Arguments
    ///
    /// * `status`: HTTP status of the response
    /// * `error`: The error that occurred. This will be formatted into a suitable `ErrorBody`
    fn new<E>(status: StatusCode, error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        ErrorResponse {
            status,
            error: ErrorBody::new(error),
        }
    }

    /// Return a 400 bad request ErrorResponse
    fn bad_request<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    /// Return a 404 not found ErrorResponse
    fn not_found<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        Self::new(StatusCode::NOT_FOUND, error)
    }

    /// Return a 500 internal server error ErrorResponse
    fn internal_server_error<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }
}

impl From<DashboardError> for ErrorResponse {
    /// Convert from a `DashboardError` into an `ErrorResponse`.
    fn from(error: DashboardError) -> Self {
        let response = match &error {
            // Bad request
            DashboardError::RequestQueryRejection(_) | DashboardError::RequestValidation(_) => {
                Self::bad_request(&error)
            }

            // Not found
            DashboardError::UnknownFigure { name: _ } => Self::not_found(&error),

            // Internal server error
            DashboardError::DataFileOpen { .. }
            | DashboardError::DataParse { .. }
            | DashboardError::InvalidRecord { .. }
            | DashboardError::EmptyDataset { .. } => Self::internal_server_error(&error),
        };

        // Log server errors.
        if response.status.is_server_error() {
            event!(Level::ERROR, "{}", error.to_string());
            let mut current = error.source();
            while let Some(source) = current {
                event!(Level::ERROR, "Caused by: {}", source.to_string());
                current = source.source();
            }
        }

        response
    }
}

impl IntoResponse for ErrorResponse {
    /// Convert from an `ErrorResponse` into an `axum::response::Response`.
    ///
    /// Renders the response as JSON.
    fn into_response(self) -> Response {
        let json_body = serde_json::to_string_pretty(&self);
        match json_body {
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to serialise error response: {}", err),
            )
                .into_response(),
            Ok(json_body) => (
                self.status,
                [(&header::CONTENT_TYPE, mime::APPLICATION_JSON.to_string())],
                json_body,
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use hyper::HeaderMap;

    // Jump through the hoops to get the body as a string.
    async fn body_string(response: Response) -> String {
        String::from_utf8(
            hyper::body::to_bytes(response.into_body())
                .await
                .unwrap()
                .to_vec(),
        )
        .unwrap()
    }

    async fn test_dashboard_error(
        error: DashboardError,
        status: StatusCode,
        message: &str,
        caused_by: Option<Vec<&'static str>>,
    ) {
        let response = error.into_response();
        assert_eq!(status, response.status());
        let mut headers = HeaderMap::new();
        headers.insert(&header::CONTENT_TYPE, "application/json".parse().unwrap());
        assert_eq!(headers, *response.headers());
        let error_response: ErrorResponse =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(message.to_string(), error_response.error.message);
        // Map Vec items from str to String
        let caused_by = caused_by.map(|cb| cb.iter().map(|s| s.to_string()).collect());
        assert_eq!(caused_by, error_response.error.caused_by);
    }

    #[tokio::test]
    async fn data_file_open_error() {
        let error = DashboardError::DataFileOpen {
            path: "covid-19.csv".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let message = "failed to open dataset covid-19.csv";
        let caused_by = Some(vec!["no such file"]);
        test_dashboard_error(error, StatusCode::INTERNAL_SERVER_ERROR, message, caused_by).await;
    }

    #[tokio::test]
    async fn data_parse_error() {
        let csv_error = csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "stream did not contain valid UTF-8",
        ));
        let error = DashboardError::DataParse {
            path: "vaccine_g1.csv".to_string(),
            source: csv_error,
        };
        let message = "failed to parse dataset vaccine_g1.csv";
        let caused_by = Some(vec!["stream did not contain valid UTF-8"]);
        test_dashboard_error(error, StatusCode::INTERNAL_SERVER_ERROR, message, caused_by).await;
    }

    #[tokio::test]
    async fn invalid_record_error() {
        let error = DashboardError::InvalidRecord {
            path: "covid-19.csv".to_string(),
            line: 3,
            reason: "month 13 is not between 1 and 12".to_string(),
        };
        let message = "invalid record in covid-19.csv at line 3: month 13 is not between 1 and 12";
        test_dashboard_error(error, StatusCode::INTERNAL_SERVER_ERROR, message, None).await;
    }

    #[tokio::test]
    async fn empty_dataset_error() {
        let error = DashboardError::EmptyDataset {
            path: "covid-19.csv".to_string(),
        };
        let message = "dataset covid-19.csv contains no records";
        test_dashboard_error(error, StatusCode::INTERNAL_SERVER_ERROR, message, None).await;
    }

    #[tokio::test]
    async fn request_validation_error() {
        let mut validation_errors = validator::ValidationErrors::new();
        let validation_error = validator::ValidationError::new("foo");
        validation_errors.add("year", validation_error);
        let error = DashboardError::RequestValidation(validation_errors);
        let message = "request query is not valid";
        let caused_by = Some(vec!["year: Validation error: foo [{}]"]);
        test_dashboard_error(error, StatusCode::BAD_REQUEST, message, caused_by).await;
    }

    #[tokio::test]
    async fn unknown_figure_error() {
        let error = DashboardError::UnknownFigure {
            name: "foo".to_string(),
        };
        let message = "unknown figure foo";
        test_dashboard_error(error, StatusCode::NOT_FOUND, message, None).await;
    }
}
