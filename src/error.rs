//! Error types with fix suggestions

use thiserror::Error;

/// Fallback shown to the user when a request fails without a structured
/// detail message from the service.
pub const GENERIC_FAILURE: &str = "Ups! something went wrong!";

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid base URL '{url}': {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 400 carrying the service's structured `detail` message.
    #[error("{detail}")]
    BadRequest { detail: String },

    #[error("service returned HTTP {status}")]
    Status { status: reqwest::StatusCode },

    #[error("unknown backend: '{name}'. Available: http, mock")]
    UnknownBackend { name: String },
}

impl ClientError {
    /// Message to display in the form.
    ///
    /// A 400 detail is surfaced verbatim; everything else collapses to the
    /// generic failure message.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::BadRequest { detail } => detail.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }
}

impl FixSuggestion for ClientError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            ClientError::BaseUrl { .. } => {
                Some("Pass a full http(s) URL, e.g. https://host/api/v2/math")
            }
            ClientError::Http(_) => Some("Check network connectivity and the service base URL"),
            ClientError::BadRequest { .. } => {
                Some("Fix the expression or variable bindings and retry")
            }
            ClientError::Status { .. } => Some("The service may be down; retry later"),
            ClientError::UnknownBackend { .. } => Some("Use --backend http or --backend mock"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_displays_detail_verbatim() {
        let err = ClientError::BadRequest {
            detail: "Unknown variable 'y'.".to_string(),
        };
        assert_eq!(format!("{}", err), "Unknown variable 'y'.");
        assert_eq!(err.user_message(), "Unknown variable 'y'.");
    }

    #[test]
    fn test_other_errors_collapse_to_generic_message() {
        let err = ClientError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        };
        assert_eq!(err.user_message(), GENERIC_FAILURE);

        let err = ClientError::UnknownBackend {
            name: "x".to_string(),
        };
        assert_eq!(err.user_message(), GENERIC_FAILURE);
    }

    #[test]
    fn test_fix_suggestions_present() {
        let err = ClientError::UnknownBackend {
            name: "grpc".to_string(),
        };
        assert!(err.fix_suggestion().unwrap().contains("--backend"));

        let err = ClientError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
        };
        assert!(err.fix_suggestion().is_some());
    }
}
