//! Error types for report generation

use debweb_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("No {report} records match the selected filters")]
    EmptyDataset { report: String },

    #[error("PDF error: {message}")]
    Pdf { message: String },

    #[error("Font {path} could not be loaded: {message}")]
    Font { path: String, message: String },
}

pub type ReportResult<T> = Result<T, ReportError>;

impl From<printpdf::Error> for ReportError {
    fn from(error: printpdf::Error) -> Self {
        ReportError::Pdf {
            message: error.to_string(),
        }
    }
}

impl From<ReportError> for CoreError {
    fn from(error: ReportError) -> Self {
        match error {
            ReportError::EmptyDataset { report } => CoreError::EmptyDataset { report },
            ReportError::Pdf { message } => CoreError::Render { message },
            font @ ReportError::Font { .. } => CoreError::Render {
                message: font.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debweb_core::ErrorCode;

    #[test]
    fn test_maps_into_core_error() {
        let core: CoreError = ReportError::EmptyDataset { report: "due ledger".to_string() }.into();
        assert_eq!(core.code(), ErrorCode::EmptyDataset);
        assert_eq!(core.to_string(), "No due ledger records match the selected filters");

        let core: CoreError = ReportError::Pdf { message: "font".to_string() }.into();
        assert_eq!(core.code(), ErrorCode::RenderError);

        let core: CoreError = ReportError::Font {
            path: "bn.ttf".to_string(),
            message: "not found".to_string(),
        }
        .into();
        assert_eq!(core.code(), ErrorCode::RenderError);
        assert!(core.to_string().contains("bn.ttf"));
    }
}
