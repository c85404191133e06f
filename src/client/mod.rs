//! # Backend Abstraction Layer
//!
//! Trait and implementations for the remote evaluation service.
//!
//! ## Overview
//!
//! The client module defines how fxpad talks to the math backend:
//!
//! - [`MathBackend`] - Core trait for the two service calls
//! - [`HttpBackend`] - Production backend over HTTP GET
//! - [`MockBackend`] - Test backend with configurable outcomes
//!
//! ## Available Backends
//!
//! | Backend | Use Case | Requires |
//! |---------|----------|----------|
//! | `http`  | Production | Reachable service base URL |
//! | `mock`  | Testing / offline | Nothing |
//!
//! ## Creating Backends
//!
//! Use [`create_backend`] to instantiate a backend from config:
//!
//! ```rust
//! use fxpad::client::create_backend;
//! use fxpad::config::ClientConfig;
//!
//! let mut config = ClientConfig::default();
//! config.backend = "mock".to_string();
//! assert!(create_backend(&config).is_ok());
//!
//! config.backend = "invalid".to_string();
//! assert!(create_backend(&config).is_err());
//! ```

mod http;
mod mock;

pub use http::HttpBackend;
pub use mock::MockBackend;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ClientConfig;
use crate::error::ClientError;

// ============================================================================
// BACKEND TRAIT
// ============================================================================

/// Core trait for the two service operations.
///
/// Both calls are fire-and-observe: no retry, no cancellation. A failed call
/// is terminal for that request and the caller simply submits again.
#[async_trait]
pub trait MathBackend: Send + Sync {
    /// Backend name ("http", "mock")
    fn name(&self) -> &str;

    /// Evaluate an expression with its variable bindings.
    async fn evaluate(&self, query: &EvalQuery) -> Result<EvalOutcome, ClientError>;

    /// Ask the service whether an expression is valid over the given
    /// variable names.
    async fn validate(&self, query: &CheckQuery) -> Result<CheckOutcome, ClientError>;
}

// ============================================================================
// REQUEST TYPES
// ============================================================================

/// A name/value pair supplied as an input to evaluation.
///
/// Both fields are user-edited free text. The list a binding lives in is
/// insertion-ordered and may contain duplicate names; the service owns
/// conflict resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub value: String,
}

impl Binding {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Inputs to an evaluate call
#[derive(Debug, Clone, Default)]
pub struct EvalQuery {
    /// Expression string, opaque to the client.
    pub expression: String,
    /// Bindings in list order.
    pub bindings: Vec<Binding>,
}

impl EvalQuery {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            bindings: vec![],
        }
    }

    pub fn with_binding(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.bindings.push(Binding::new(name, value));
        self
    }
}

/// Inputs to a validate call
#[derive(Debug, Clone, Default)]
pub struct CheckQuery {
    /// Expression string, opaque to the client.
    pub expression: String,
    /// Variable names in list order, no values.
    pub names: Vec<String>,
}

impl CheckQuery {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            names: vec![],
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }
}

// ============================================================================
// OUTCOME TYPES
// ============================================================================

/// Successful evaluate response.
#[derive(Debug, Clone)]
pub struct EvalOutcome {
    /// The `result` field, of unspecified type (numeric or string).
    pub result: serde_json::Value,
}

impl EvalOutcome {
    /// Render the result for display: strings lose their JSON quotes,
    /// everything else prints as JSON.
    pub fn display(&self) -> String {
        match &self.result {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Successful validate response.
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub valid: bool,
    /// Service-reported reasons the expression failed validation,
    /// in response order. Empty when the field was absent.
    pub errors: Vec<String>,
}

// ============================================================================
// BACKEND FACTORY
// ============================================================================

/// Create a backend instance from config.
pub fn create_backend(config: &ClientConfig) -> Result<Arc<dyn MathBackend>, ClientError> {
    match config.backend.to_lowercase().as_str() {
        "http" => Ok(Arc::new(HttpBackend::new(&config.base_url)?)),
        "mock" => Ok(Arc::new(MockBackend::new())),
        other => Err(ClientError::UnknownBackend {
            name: other.to_string(),
        }),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_eval_query_builder() {
        let query = EvalQuery::new("x+y").with_binding("x", "1").with_binding("y", "2");

        assert_eq!(query.expression, "x+y");
        assert_eq!(query.bindings.len(), 2);
        assert_eq!(query.bindings[0], Binding::new("x", "1"));
    }

    #[test]
    fn test_check_query_builder() {
        let query = CheckQuery::new("x+y").with_name("x").with_name("y");

        assert_eq!(query.expression, "x+y");
        assert_eq!(query.names, vec!["x", "y"]);
    }

    #[test]
    fn test_eval_outcome_display_number() {
        let outcome = EvalOutcome { result: json!(3) };
        assert_eq!(outcome.display(), "3");

        let outcome = EvalOutcome { result: json!(2.5) };
        assert_eq!(outcome.display(), "2.5");
    }

    #[test]
    fn test_eval_outcome_display_string_unquoted() {
        let outcome = EvalOutcome {
            result: json!("infinity"),
        };
        assert_eq!(outcome.display(), "infinity");
    }

    #[test]
    fn test_create_backend_mock() {
        let config = ClientConfig {
            backend: "mock".to_string(),
            ..ClientConfig::default()
        };
        let backend = create_backend(&config).unwrap();
        assert_eq!(backend.name(), "mock");
    }

    #[test]
    fn test_create_backend_http() {
        let backend = create_backend(&ClientConfig::default()).unwrap();
        assert_eq!(backend.name(), "http");
    }

    #[test]
    fn test_create_backend_unknown() {
        let config = ClientConfig {
            backend: "grpc".to_string(),
            ..ClientConfig::default()
        };
        let result = create_backend(&config);
        assert!(matches!(result, Err(ClientError::UnknownBackend { .. })));
    }
}
