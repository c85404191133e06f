//! fxpad - terminal client for a remote math expression evaluation service

pub mod client;
pub mod config;
pub mod error;
pub mod tui;

pub use client::{
    create_backend, Binding, CheckOutcome, CheckQuery, EvalOutcome, EvalQuery, HttpBackend,
    MathBackend, MockBackend,
};
pub use config::ClientConfig;
pub use error::{ClientError, FixSuggestion, GENERIC_FAILURE};
