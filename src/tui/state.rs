//! AppState - Domain Layer
//!
//! View-state structs for the two forms plus the root selector. All
//! mutation happens here, driven by key events and request replies; the UI
//! layer only reads.

use std::time::{Duration, Instant};

use crate::client::{Binding, CheckOutcome, CheckQuery, EvalOutcome, EvalQuery};
use crate::error::{ClientError, GENERIC_FAILURE};

// ─────────────────────────────────────────────────────────────────────────────
// Root State
// ─────────────────────────────────────────────────────────────────────────────

/// Main application state
#[derive(Debug)]
pub struct AppState {
    /// Which form is showing.
    pub active: ViewKind,
    pub evaluator: EvaluatorState,
    pub validator: ValidatorState,
    pub should_quit: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            active: ViewKind::Evaluator,
            evaluator: EvaluatorState::default(),
            validator: ValidatorState::default(),
            should_quit: false,
        }
    }
}

impl AppState {
    /// Update elapsed time on pending requests.
    pub fn tick(&mut self) {
        self.evaluator.tick();
        self.validator.tick();
    }

    /// Append a variable row to the active form and focus its name field.
    pub fn add_variable(&mut self) {
        match self.active {
            ViewKind::Evaluator => {
                self.evaluator.add_variable();
                let last = self.evaluator.bindings.len() - 1;
                self.evaluator.focus = EvalFocus::Name(last);
            }
            ViewKind::Validator => {
                self.validator.add_variable();
                let last = self.validator.names.len() - 1;
                self.validator.focus = CheckFocus::Name(last);
            }
        }
    }

    /// Delete the focused variable row of the active form.
    ///
    /// Returns false when the expression field is focused (nothing to
    /// delete).
    pub fn delete_focused_variable(&mut self) -> bool {
        match self.active {
            ViewKind::Evaluator => self.evaluator.delete_focused_variable(),
            ViewKind::Validator => self.validator.delete_focused_variable(),
        }
    }

    pub fn focus_next(&mut self) {
        match self.active {
            ViewKind::Evaluator => {
                self.evaluator.focus = self.evaluator.focus.next(self.evaluator.bindings.len());
            }
            ViewKind::Validator => {
                self.validator.focus = self.validator.focus.next(self.validator.names.len());
            }
        }
    }

    pub fn focus_prev(&mut self) {
        match self.active {
            ViewKind::Evaluator => {
                self.evaluator.focus = self.evaluator.focus.prev(self.evaluator.bindings.len());
            }
            ViewKind::Validator => {
                self.validator.focus = self.validator.focus.prev(self.validator.names.len());
            }
        }
    }

    /// Type a character into the focused field of the active form.
    pub fn insert_char(&mut self, c: char) {
        if let Some(field) = self.focused_field_mut() {
            field.push(c);
        }
    }

    /// Delete the last character of the focused field of the active form.
    pub fn backspace(&mut self) {
        if let Some(field) = self.focused_field_mut() {
            field.pop();
        }
    }

    fn focused_field_mut(&mut self) -> Option<&mut String> {
        match self.active {
            ViewKind::Evaluator => self.evaluator.focused_field_mut(),
            ViewKind::Validator => self.validator.focused_field_mut(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// View Selector
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Evaluator,
    Validator,
}

impl ViewKind {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Evaluator => Self::Validator,
            Self::Validator => Self::Evaluator,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Evaluator => "Evaluate",
            Self::Validator => "Validate",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request Lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Idle,
    Pending,
    Done,
    Failed,
}

impl std::fmt::Display for RequestPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "IDLE"),
            Self::Pending => write!(f, "PENDING"),
            Self::Done => write!(f, "DONE"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Evaluator View
// ─────────────────────────────────────────────────────────────────────────────

/// Field focus within the evaluator form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalFocus {
    Expression,
    Name(usize),
    Value(usize),
}

impl EvalFocus {
    /// Cycle forward: expression → name 0 → value 0 → name 1 → … → expression.
    pub fn next(&self, rows: usize) -> Self {
        match *self {
            Self::Expression => {
                if rows == 0 {
                    Self::Expression
                } else {
                    Self::Name(0)
                }
            }
            Self::Name(i) => Self::Value(i),
            Self::Value(i) => {
                if i + 1 < rows {
                    Self::Name(i + 1)
                } else {
                    Self::Expression
                }
            }
        }
    }

    /// Cycle backward.
    pub fn prev(&self, rows: usize) -> Self {
        match *self {
            Self::Expression => {
                if rows == 0 {
                    Self::Expression
                } else {
                    Self::Value(rows - 1)
                }
            }
            Self::Name(i) => {
                if i == 0 {
                    Self::Expression
                } else {
                    Self::Value(i - 1)
                }
            }
            Self::Value(i) => Self::Name(i),
        }
    }

    /// Row index this focus sits on, if any.
    pub fn row(&self) -> Option<usize> {
        match *self {
            Self::Expression => None,
            Self::Name(i) | Self::Value(i) => Some(i),
        }
    }
}

#[derive(Debug)]
pub struct EvaluatorState {
    pub expression: String,
    /// Insertion-ordered; duplicates permitted, deletable by position.
    pub bindings: Vec<Binding>,
    /// Rendered result; mutually exclusive with `error`.
    pub result: Option<String>,
    pub error: Option<String>,
    pub phase: RequestPhase,
    pub focus: EvalFocus,
    started: Option<Instant>,
    pub elapsed: Duration,
}

impl Default for EvaluatorState {
    fn default() -> Self {
        Self {
            expression: String::new(),
            bindings: Vec::new(),
            result: None,
            error: None,
            phase: RequestPhase::Idle,
            focus: EvalFocus::Expression,
            started: None,
            elapsed: Duration::ZERO,
        }
    }
}

impl EvaluatorState {
    /// Append a binding with empty name and empty value.
    pub fn add_variable(&mut self) {
        self.bindings.push(Binding::default());
    }

    /// Remove the binding at `index`; out of range is a no-op.
    pub fn delete_variable(&mut self, index: usize) {
        if index < self.bindings.len() {
            self.bindings.remove(index);
            self.clamp_focus();
        }
    }

    fn delete_focused_variable(&mut self) -> bool {
        match self.focus.row() {
            Some(i) if i < self.bindings.len() => {
                self.delete_variable(i);
                true
            }
            _ => false,
        }
    }

    /// Keep focus on a live row after deletions.
    fn clamp_focus(&mut self) {
        if let Some(i) = self.focus.row() {
            if self.bindings.is_empty() {
                self.focus = EvalFocus::Expression;
            } else if i >= self.bindings.len() {
                self.focus = EvalFocus::Name(self.bindings.len() - 1);
            }
        }
    }

    fn focused_field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            EvalFocus::Expression => Some(&mut self.expression),
            EvalFocus::Name(i) => self.bindings.get_mut(i).map(|b| &mut b.name),
            EvalFocus::Value(i) => self.bindings.get_mut(i).map(|b| &mut b.value),
        }
    }

    /// Snapshot the form into a request.
    pub fn to_query(&self) -> EvalQuery {
        EvalQuery {
            expression: self.expression.clone(),
            bindings: self.bindings.clone(),
        }
    }

    /// Clear any prior result/error and mark the request in flight.
    /// Called before every submit so no stale display survives.
    pub fn begin_request(&mut self) {
        self.result = None;
        self.error = None;
        self.phase = RequestPhase::Pending;
        self.started = Some(Instant::now());
        self.elapsed = Duration::ZERO;
    }

    /// Resolve the in-flight request into view state.
    pub fn apply_outcome(&mut self, outcome: Result<EvalOutcome, ClientError>) {
        match outcome {
            Ok(ok) => {
                self.result = Some(ok.display());
                self.error = None;
                self.phase = RequestPhase::Done;
            }
            Err(err) => {
                self.result = None;
                self.error = Some(err.user_message());
                self.phase = RequestPhase::Failed;
            }
        }
        self.tick();
        self.started = None;
    }

    fn tick(&mut self) {
        if let Some(started) = self.started {
            self.elapsed = started.elapsed();
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Validator View
// ─────────────────────────────────────────────────────────────────────────────

/// Field focus within the validator form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckFocus {
    Expression,
    Name(usize),
}

impl CheckFocus {
    pub fn next(&self, rows: usize) -> Self {
        match *self {
            Self::Expression => {
                if rows == 0 {
                    Self::Expression
                } else {
                    Self::Name(0)
                }
            }
            Self::Name(i) => {
                if i + 1 < rows {
                    Self::Name(i + 1)
                } else {
                    Self::Expression
                }
            }
        }
    }

    pub fn prev(&self, rows: usize) -> Self {
        match *self {
            Self::Expression => {
                if rows == 0 {
                    Self::Expression
                } else {
                    Self::Name(rows - 1)
                }
            }
            Self::Name(i) => {
                if i == 0 {
                    Self::Expression
                } else {
                    Self::Name(i - 1)
                }
            }
        }
    }

    pub fn row(&self) -> Option<usize> {
        match *self {
            Self::Expression => None,
            Self::Name(i) => Some(i),
        }
    }
}

#[derive(Debug)]
pub struct ValidatorState {
    pub expression: String,
    /// Variable names only, same list semantics as bindings.
    pub names: Vec<String>,
    /// None until the first response arrives.
    pub valid: Option<bool>,
    /// Service-reported validation errors, in response order.
    pub errors: Vec<String>,
    pub phase: RequestPhase,
    pub focus: CheckFocus,
    started: Option<Instant>,
    pub elapsed: Duration,
}

impl Default for ValidatorState {
    fn default() -> Self {
        Self {
            expression: String::new(),
            names: Vec::new(),
            valid: None,
            errors: Vec::new(),
            phase: RequestPhase::Idle,
            focus: CheckFocus::Expression,
            started: None,
            elapsed: Duration::ZERO,
        }
    }
}

impl ValidatorState {
    /// Append an empty variable name.
    pub fn add_variable(&mut self) {
        self.names.push(String::new());
    }

    /// Remove the name at `index`; out of range is a no-op.
    pub fn delete_variable(&mut self, index: usize) {
        if index < self.names.len() {
            self.names.remove(index);
            self.clamp_focus();
        }
    }

    fn delete_focused_variable(&mut self) -> bool {
        match self.focus.row() {
            Some(i) if i < self.names.len() => {
                self.delete_variable(i);
                true
            }
            _ => false,
        }
    }

    fn clamp_focus(&mut self) {
        if let Some(i) = self.focus.row() {
            if self.names.is_empty() {
                self.focus = CheckFocus::Expression;
            } else if i >= self.names.len() {
                self.focus = CheckFocus::Name(self.names.len() - 1);
            }
        }
    }

    fn focused_field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            CheckFocus::Expression => Some(&mut self.expression),
            CheckFocus::Name(i) => self.names.get_mut(i),
        }
    }

    pub fn to_query(&self) -> CheckQuery {
        CheckQuery {
            expression: self.expression.clone(),
            names: self.names.clone(),
        }
    }

    /// Clear prior errors and mark the request in flight. The validity flag
    /// keeps its last value until the reply lands.
    pub fn begin_request(&mut self) {
        self.errors.clear();
        self.phase = RequestPhase::Pending;
        self.started = Some(Instant::now());
        self.elapsed = Duration::ZERO;
    }

    /// Resolve the in-flight request. Failures collapse to invalid with the
    /// single generic message.
    pub fn apply_outcome(&mut self, outcome: Result<CheckOutcome, ClientError>) {
        match outcome {
            Ok(ok) => {
                self.valid = Some(ok.valid);
                self.errors = ok.errors;
                self.phase = RequestPhase::Done;
            }
            Err(_) => {
                self.valid = Some(false);
                self.errors = vec![GENERIC_FAILURE.to_string()];
                self.phase = RequestPhase::Failed;
            }
        }
        self.tick();
        self.started = None;
    }

    fn tick(&mut self) {
        if let Some(started) = self.started {
            self.elapsed = started.elapsed();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eval_outcome(v: serde_json::Value) -> Result<EvalOutcome, ClientError> {
        Ok(EvalOutcome { result: v })
    }

    #[test]
    fn test_add_then_delete_preserves_order() {
        let mut state = EvaluatorState::default();
        for i in 0..4 {
            state.add_variable();
            state.bindings[i].name = format!("v{}", i);
        }

        state.delete_variable(1);

        assert_eq!(state.bindings.len(), 3);
        let names: Vec<&str> = state.bindings.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["v0", "v2", "v3"]);
    }

    #[test]
    fn test_delete_out_of_range_is_noop() {
        let mut state = EvaluatorState::default();
        state.add_variable();

        state.delete_variable(5);
        assert_eq!(state.bindings.len(), 1);

        let mut names = ValidatorState::default();
        names.delete_variable(0);
        assert!(names.names.is_empty());
    }

    #[test]
    fn test_begin_request_clears_stale_display() {
        let mut state = EvaluatorState::default();
        state.result = Some("3".to_string());
        state.error = Some("old error".to_string());

        state.begin_request();

        assert!(state.result.is_none());
        assert!(state.error.is_none());
        assert_eq!(state.phase, RequestPhase::Pending);
    }

    #[test]
    fn test_eval_success_sets_result_clears_error() {
        let mut state = EvaluatorState::default();
        state.begin_request();
        state.apply_outcome(eval_outcome(json!(3)));

        assert_eq!(state.result.as_deref(), Some("3"));
        assert!(state.error.is_none());
        assert_eq!(state.phase, RequestPhase::Done);
    }

    #[test]
    fn test_eval_bad_request_surfaces_detail() {
        let mut state = EvaluatorState::default();
        state.begin_request();
        state.apply_outcome(Err(ClientError::BadRequest {
            detail: "X".to_string(),
        }));

        assert!(state.result.is_none());
        assert_eq!(state.error.as_deref(), Some("X"));
        assert_eq!(state.phase, RequestPhase::Failed);
    }

    #[test]
    fn test_eval_other_failure_is_generic() {
        let mut state = EvaluatorState::default();
        state.begin_request();
        state.apply_outcome(Err(ClientError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        }));

        assert_eq!(state.error.as_deref(), Some(GENERIC_FAILURE));
    }

    #[test]
    fn test_validator_success_clears_errors() {
        let mut state = ValidatorState::default();
        state.begin_request();
        state.apply_outcome(Ok(CheckOutcome {
            valid: true,
            errors: vec![],
        }));

        assert_eq!(state.valid, Some(true));
        assert!(state.errors.is_empty());
    }

    #[test]
    fn test_validator_invalid_keeps_error_order() {
        let mut state = ValidatorState::default();
        state.begin_request();
        state.apply_outcome(Ok(CheckOutcome {
            valid: false,
            errors: vec!["first".to_string(), "second".to_string()],
        }));

        assert_eq!(state.valid, Some(false));
        assert_eq!(state.errors, vec!["first", "second"]);
    }

    #[test]
    fn test_validator_failure_collapses_to_generic() {
        let mut state = ValidatorState::default();
        state.begin_request();
        state.apply_outcome(Err(ClientError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
        }));

        assert_eq!(state.valid, Some(false));
        assert_eq!(state.errors, vec![GENERIC_FAILURE.to_string()]);
    }

    #[test]
    fn test_eval_focus_cycle() {
        let focus = EvalFocus::Expression;
        assert_eq!(focus.next(0), EvalFocus::Expression);
        assert_eq!(focus.next(2), EvalFocus::Name(0));
        assert_eq!(EvalFocus::Name(0).next(2), EvalFocus::Value(0));
        assert_eq!(EvalFocus::Value(0).next(2), EvalFocus::Name(1));
        assert_eq!(EvalFocus::Value(1).next(2), EvalFocus::Expression);

        assert_eq!(EvalFocus::Expression.prev(2), EvalFocus::Value(1));
        assert_eq!(EvalFocus::Name(1).prev(2), EvalFocus::Value(0));
        assert_eq!(EvalFocus::Name(0).prev(2), EvalFocus::Expression);
    }

    #[test]
    fn test_check_focus_cycle() {
        assert_eq!(CheckFocus::Expression.next(2), CheckFocus::Name(0));
        assert_eq!(CheckFocus::Name(1).next(2), CheckFocus::Expression);
        assert_eq!(CheckFocus::Expression.prev(2), CheckFocus::Name(1));
    }

    #[test]
    fn test_focus_clamped_after_delete() {
        let mut state = EvaluatorState::default();
        state.add_variable();
        state.add_variable();
        state.focus = EvalFocus::Value(1);

        state.delete_variable(1);
        assert_eq!(state.focus, EvalFocus::Name(0));

        state.delete_variable(0);
        assert_eq!(state.focus, EvalFocus::Expression);
    }

    #[test]
    fn test_app_state_typing_goes_to_focused_field() {
        let mut state = AppState::default();
        state.insert_char('x');
        state.insert_char('+');
        state.insert_char('1');
        assert_eq!(state.evaluator.expression, "x+1");

        state.add_variable();
        state.insert_char('x');
        assert_eq!(state.evaluator.bindings[0].name, "x");

        state.backspace();
        assert_eq!(state.evaluator.bindings[0].name, "");
    }

    #[test]
    fn test_add_variable_focuses_new_row() {
        let mut state = AppState::default();
        state.add_variable();
        assert_eq!(state.evaluator.focus, EvalFocus::Name(0));

        state.active = ViewKind::Validator;
        state.add_variable();
        assert_eq!(state.validator.focus, CheckFocus::Name(0));
    }

    #[test]
    fn test_view_kind_toggle() {
        assert_eq!(ViewKind::Evaluator.toggle(), ViewKind::Validator);
        assert_eq!(ViewKind::Validator.toggle(), ViewKind::Evaluator);
    }
}
