//! Error types for debweb-core
//!
//! Every failure a page can run into (network, backend refusal, decode,
//! validation, missing identifier, empty export) funnels into
//! [`CoreError`], which knows its code, severity and the notice shown to
//! the user.

use crate::notice::Notice;
use crate::validation::FieldError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Backend unreachable or timed out
    NetworkError,
    /// Backend answered with an error status or `success: false`
    BackendError,
    /// Response body did not match the expected record shape
    DecodeError,
    /// Form or filter input rejected before sending
    ValidationError,
    /// Update/delete attempted without a record id
    MissingIdentifier,
    /// Export requested for a filter that matches nothing
    EmptyDataset,
    /// PDF rendering failed
    RenderError,
    /// Configuration error
    ConfigError,
    /// Internal error
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::NetworkError => write!(f, "NETWORK_ERROR"),
            ErrorCode::BackendError => write!(f, "BACKEND_ERROR"),
            ErrorCode::DecodeError => write!(f, "DECODE_ERROR"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::MissingIdentifier => write!(f, "MISSING_IDENTIFIER"),
            ErrorCode::EmptyDataset => write!(f, "EMPTY_DATASET"),
            ErrorCode::RenderError => write!(f, "RENDER_ERROR"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - the user can correct it
    Warning,
    /// Error - the operation failed
    Error,
    /// Critical - the process cannot serve pages
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Detailed error information for logs and JSON responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Main error type for debweb-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Unexpected response: {message}")]
    Decode { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String, fields: Vec<FieldError> },

    #[error("Missing {resource} id")]
    MissingIdentifier { resource: String },

    #[error("No {report} records match the selected filters")]
    EmptyDataset { report: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CoreError {
    /// Validation failure for a single field
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        CoreError::Validation {
            message: message.clone(),
            fields: vec![FieldError::new(field, message)],
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::Network { .. } => ErrorCode::NetworkError,
            CoreError::Backend { .. } => ErrorCode::BackendError,
            CoreError::Decode { .. } => ErrorCode::DecodeError,
            CoreError::Validation { .. } => ErrorCode::ValidationError,
            CoreError::MissingIdentifier { .. } => ErrorCode::MissingIdentifier,
            CoreError::EmptyDataset { .. } => ErrorCode::EmptyDataset,
            CoreError::Render { .. } => ErrorCode::RenderError,
            CoreError::Config { .. } => ErrorCode::ConfigError,
            CoreError::Internal { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::Network { .. } => ErrorSeverity::Error,
            CoreError::Backend { .. } => ErrorSeverity::Error,
            CoreError::Decode { .. } => ErrorSeverity::Error,
            CoreError::Validation { .. } => ErrorSeverity::Warning,
            CoreError::MissingIdentifier { .. } => ErrorSeverity::Warning,
            CoreError::EmptyDataset { .. } => ErrorSeverity::Info,
            CoreError::Render { .. } => ErrorSeverity::Error,
            CoreError::Config { .. } => ErrorSeverity::Critical,
            CoreError::Internal { .. } => ErrorSeverity::Critical,
        }
    }

    /// Field-level messages, empty unless this is a validation error
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            CoreError::Validation { fields, .. } => fields,
            _ => &[],
        }
    }

    /// The toast shown to the user for this error
    pub fn to_notice(&self) -> Notice {
        match self {
            CoreError::Network { .. } => {
                Notice::error("Could not reach the server. Please try again.")
            }
            CoreError::Backend { message, .. } if !message.is_empty() => Notice::error(message.clone()),
            CoreError::Backend { status, .. } => Notice::error(format!("Request failed ({})", status)),
            CoreError::Decode { .. } => Notice::error("The server sent an unexpected response."),
            CoreError::Validation { message, .. } => Notice::warning(message.clone()),
            CoreError::MissingIdentifier { resource } => {
                Notice::warning(format!("No {} selected.", resource))
            }
            CoreError::EmptyDataset { .. } => Notice::info(self.to_string()),
            CoreError::Render { .. } => Notice::error("Could not generate the PDF."),
            CoreError::Config { .. } | CoreError::Internal { .. } => {
                Notice::error("Something went wrong.")
            }
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::Network { .. } => {
                details = details.with_suggestion(
                    "Check that backend.base_url points at a running server.".to_string(),
                );
            }
            CoreError::Backend { status, .. } => {
                details = details.with_detail(serde_json::json!({ "status": status }));
            }
            CoreError::Validation { fields, .. } => {
                details = details.with_detail(serde_json::json!({ "fields": fields }));
            }
            CoreError::EmptyDataset { .. } => {
                details = details.with_suggestion("Widen the date range or clear the filters.".to_string());
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(error: serde_json::Error) -> Self {
        CoreError::Decode {
            message: error.to_string(),
        }
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed, e.g. "customers.delete"
    pub operation: String,
    /// Request token of the list fetch, when there is one
    pub request_token: Option<u64>,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            request_token: None,
        }
    }

    /// Attach a list request token
    pub fn with_token(mut self, token: u64) -> Self {
        self.request_token = Some(token);
        self
    }
}

/// Error logger trait
pub trait ErrorLogger {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
    /// Log a warning
    fn log_warning(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        match error.severity() {
            ErrorSeverity::Info | ErrorSeverity::Warning => log::warn!(
                target: "debweb::error",
                "{} - Operation: {} - Token: {:?}",
                error.to_details(),
                context.operation,
                context.request_token
            ),
            _ => log::error!(
                target: "debweb::error",
                "{} - Operation: {} - Token: {:?}",
                error.to_details(),
                context.operation,
                context.request_token
            ),
        }
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "debweb::error",
            "WARNING: {} - Operation: {}",
            message,
            context.operation
        );
    }
}

// ==================== Tests ====================
