//! Error types for debweb-api
//!
//! HTMX fragment handlers fail with [`ApiError`]: the response keeps the
//! current region on screen (`HX-Reswap: none`) and raises a toast.
//! Download routes fail with [`ExportError`], a JSON notice the browser
//! helper shows instead of saving a file.

use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use debweb_core::error::{DefaultErrorLogger, ErrorContext, ErrorLogger};
use debweb_core::{CoreError, ErrorCode, Notice};
use debweb_report::ReportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("{operation}: {source}")]
    Core {
        operation: String,
        #[source]
        source: CoreError,
    },

    /// List fetch failure, already logged by the list controller
    #[error("{list}: {}", .notice.message)]
    Refresh { list: String, notice: Notice },
}

impl ApiError {
    /// Wrap a core failure with the operation it interrupted, e.g. "customers.delete"
    pub fn core(operation: impl Into<String>, source: CoreError) -> Self {
        ApiError::Core {
            operation: operation.into(),
            source,
        }
    }

    pub fn notice(&self) -> Notice {
        match self {
            ApiError::BadRequest { message } => Notice::warning(message.clone()),
            ApiError::Core { source, .. } => source.to_notice(),
            ApiError::Refresh { notice, .. } => notice.clone(),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(source: CoreError) -> Self {
        ApiError::core("request", source)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::BadRequest { message } => {
                log::warn!(target: "debweb::api", "bad request: {}", message)
            }
            ApiError::Core { operation, source } => {
                DefaultErrorLogger.log_error(source, &ErrorContext::new(operation.clone()))
            }
            ApiError::Refresh { .. } => {}
        }
        let mut response = StatusCode::OK.into_response();
        let headers = response.headers_mut();
        headers.insert("HX-Reswap", HeaderValue::from_static("none"));
        if let Ok(value) = HeaderValue::from_str(&self.notice().trigger_json(&[])) {
            headers.insert("HX-Trigger", value);
        }
        response
    }
}

/// Failure of a PDF download
#[derive(Debug)]
pub struct ExportError(pub CoreError);

impl From<CoreError> for ExportError {
    fn from(error: CoreError) -> Self {
        ExportError(error)
    }
}

impl From<ReportError> for ExportError {
    fn from(error: ReportError) -> Self {
        ExportError(error.into())
    }
}

impl IntoResponse for ExportError {
    fn into_response(self) -> Response {
        let status = match self.0.code() {
            ErrorCode::EmptyDataset | ErrorCode::ValidationError | ErrorCode::MissingIdentifier => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ErrorCode::NetworkError | ErrorCode::BackendError | ErrorCode::DecodeError => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        DefaultErrorLogger.log_error(&self.0, &ErrorContext::new("export"));
        (status, axum::Json(self.0.to_notice())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_errors_keep_region() {
        let response = ApiError::core(
            "customers.list",
            CoreError::Network { message: "refused".to_string() },
        )
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["HX-Reswap"], "none");
        let trigger = response.headers()["HX-Trigger"].to_str().unwrap();
        assert!(trigger.contains("\"notify\""));
        assert!(trigger.contains("\"error\""));
    }

    #[test]
    fn test_empty_export_is_unprocessable() {
        let response = ExportError(CoreError::EmptyDataset { report: "statement".to_string() }).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
