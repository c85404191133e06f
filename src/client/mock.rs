//! Mock backend for testing
//!
//! Returns configurable outcomes without touching the network. Used by unit
//! tests, CLI tests, and `--backend mock` for offline poking at the UI.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{CheckOutcome, CheckQuery, EvalOutcome, EvalQuery, MathBackend};
use crate::error::ClientError;

/// Mock backend with FIFO queues of canned outcomes
pub struct MockBackend {
    /// Queued evaluate outcomes (FIFO); empty queue echoes the expression.
    eval_outcomes: Arc<Mutex<Vec<Result<EvalOutcome, ClientError>>>>,
    /// Queued validate outcomes (FIFO); empty queue reports valid.
    check_outcomes: Arc<Mutex<Vec<Result<CheckOutcome, ClientError>>>>,
    /// All evaluate queries received (for assertions)
    eval_calls: Arc<Mutex<Vec<EvalQuery>>>,
    /// All validate queries received (for assertions)
    check_calls: Arc<Mutex<Vec<CheckQuery>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            eval_outcomes: Arc::new(Mutex::new(vec![])),
            check_outcomes: Arc::new(Mutex::new(vec![])),
            eval_calls: Arc::new(Mutex::new(vec![])),
            check_calls: Arc::new(Mutex::new(vec![])),
        }
    }

    /// Queue an evaluate outcome.
    pub fn queue_eval(&self, outcome: Result<EvalOutcome, ClientError>) {
        self.eval_outcomes.lock().unwrap().push(outcome);
    }

    /// Queue a validate outcome.
    pub fn queue_check(&self, outcome: Result<CheckOutcome, ClientError>) {
        self.check_outcomes.lock().unwrap().push(outcome);
    }

    /// All evaluate queries received so far.
    pub fn eval_calls(&self) -> Vec<EvalQuery> {
        self.eval_calls.lock().unwrap().clone()
    }

    /// All validate queries received so far.
    pub fn check_calls(&self) -> Vec<CheckQuery> {
        self.check_calls.lock().unwrap().clone()
    }

    /// Last evaluate query received.
    pub fn last_eval_call(&self) -> Option<EvalQuery> {
        self.eval_calls.lock().unwrap().last().cloned()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MathBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn evaluate(&self, query: &EvalQuery) -> Result<EvalOutcome, ClientError> {
        self.eval_calls.lock().unwrap().push(query.clone());

        let mut queue = self.eval_outcomes.lock().unwrap();
        if queue.is_empty() {
            Ok(EvalOutcome {
                result: serde_json::Value::String(format!("[mock] {}", query.expression)),
            })
        } else {
            queue.remove(0)
        }
    }

    async fn validate(&self, query: &CheckQuery) -> Result<CheckOutcome, ClientError> {
        self.check_calls.lock().unwrap().push(query.clone());

        let mut queue = self.check_outcomes.lock().unwrap();
        if queue.is_empty() {
            Ok(CheckOutcome {
                valid: true,
                errors: vec![],
            })
        } else {
            queue.remove(0)
        }
    }
}
