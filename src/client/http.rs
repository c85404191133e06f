//! HTTP backend for the evaluation service
//!
//! Issues the two GET calls and maps responses into outcomes. A 400 with a
//! structured body surfaces the service's `detail` message; any other
//! non-success status or transport error is opaque to the caller.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use super::{CheckOutcome, CheckQuery, EvalOutcome, EvalQuery, MathBackend};
use crate::error::ClientError;

/// HTTP backend over a configured base URL
pub struct HttpBackend {
    /// HTTP client
    client: reqwest::Client,
    /// Validated service base URL
    base: Url,
}

impl HttpBackend {
    /// Create a backend against the given base URL.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base_url).map_err(|source| ClientError::BaseUrl {
            url: base_url.to_string(),
            source,
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }

    /// Base URL with `segment` appended to the path.
    fn endpoint(&self, segment: &str) -> Result<Url, ClientError> {
        let joined = format!("{}/{}", self.base.as_str().trim_end_matches('/'), segment);
        match Url::parse(&joined) {
            Ok(url) => Ok(url),
            Err(source) => Err(ClientError::BaseUrl {
                url: joined,
                source,
            }),
        }
    }

    /// Build the evaluate request URL:
    /// `{base}/evaluate?expression=<expr>&Variables[<name>]=<value>...`
    ///
    /// One pair per binding, in list order; duplicate names are all sent.
    pub fn evaluate_url(&self, query: &EvalQuery) -> Result<Url, ClientError> {
        let mut url = self.endpoint("evaluate")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("expression", &query.expression);
            for binding in &query.bindings {
                pairs.append_pair(&format!("Variables[{}]", binding.name), &binding.value);
            }
        }
        Ok(url)
    }

    /// Build the validate request URL:
    /// `{base}/validate?expression=<expr>&Variables=<name>...` (repeated key)
    pub fn validate_url(&self, query: &CheckQuery) -> Result<Url, ClientError> {
        let mut url = self.endpoint("validate")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("expression", &query.expression);
            for name in &query.names {
                pairs.append_pair("Variables", name);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl MathBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn evaluate(&self, query: &EvalQuery) -> Result<EvalOutcome, ClientError> {
        let url = self.evaluate_url(query)?;

        tracing::debug!(backend = "http", url = %url, "sending evaluate request");

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::BAD_REQUEST {
            // Unparseable 400 bodies fall back to the opaque status error.
            let body: ErrorBody = response
                .json()
                .await
                .map_err(|_| ClientError::Status { status })?;
            tracing::error!(
                backend = "http",
                status = %status,
                detail = %body.detail,
                "evaluate rejected by service"
            );
            return Err(ClientError::BadRequest {
                detail: body.detail,
            });
        }

        if !status.is_success() {
            tracing::error!(backend = "http", status = %status, "evaluate failed");
            return Err(ClientError::Status { status });
        }

        let body: EvalResponse = response.json().await?;

        tracing::debug!(backend = "http", result = %body.result, "evaluate succeeded");

        Ok(EvalOutcome {
            result: body.result,
        })
    }

    async fn validate(&self, query: &CheckQuery) -> Result<CheckOutcome, ClientError> {
        let url = self.validate_url(query)?;

        tracing::debug!(backend = "http", url = %url, "sending validate request");

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::error!(backend = "http", status = %status, "validate failed");
            return Err(ClientError::Status { status });
        }

        let body: CheckResponse = response.json().await?;

        tracing::debug!(
            backend = "http",
            success = body.success,
            errors = body.errors.as_ref().map(|e| e.len()).unwrap_or(0),
            "validate succeeded"
        );

        Ok(CheckOutcome {
            valid: body.success,
            errors: body.errors.unwrap_or_default(),
        })
    }
}

// ============================================================================
// API TYPES
// ============================================================================

#[derive(Debug, Deserialize)]
struct EvalResponse {
    result: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    success: bool,
    errors: Option<Vec<String>>,
}

// ============================================================================
// TESTS
// ============================================================================
