//! TUI Application - Main entry point and run loop

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use super::events::{handle_key_event, poll_event, Action};
use super::state::{AppState, CheckFocus, EvalFocus, RequestPhase, ViewKind};
use super::theme::{glyphs, FormTheme};
use crate::client::{CheckOutcome, EvalOutcome, MathBackend};
use crate::error::ClientError;

/// A resolved request, tagged by the view that issued it.
///
/// Replies are applied to the issuing view's state even if the other view
/// is showing by then; switching views does not cancel in-flight requests.
#[derive(Debug)]
enum Reply {
    Eval(Result<EvalOutcome, ClientError>),
    Check(Result<CheckOutcome, ClientError>),
}

/// TUI Application
pub struct TuiApp {
    state: AppState,
    theme: FormTheme,
    backend: Arc<dyn MathBackend>,
    replies_tx: mpsc::UnboundedSender<Reply>,
    replies_rx: mpsc::UnboundedReceiver<Reply>,
}

impl TuiApp {
    /// Create a new TUI application over a backend
    pub fn new(backend: Arc<dyn MathBackend>) -> Self {
        let (replies_tx, replies_rx) = mpsc::unbounded_channel();

        Self {
            state: AppState::default(),
            theme: FormTheme::new(),
            backend,
            replies_tx,
            replies_rx,
        }
    }

    /// Run the TUI application
    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut terminal = self.setup_terminal()?;

        let result = self.main_loop(&mut terminal).await;

        self.restore_terminal(&mut terminal)?;

        result
    }

    /// Setup terminal for TUI
    fn setup_terminal(&self) -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    /// Restore terminal to normal state
    fn restore_terminal(
        &self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        Ok(())
    }

    /// Main event loop
    async fn main_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<()> {
        let tick_rate = Duration::from_millis(16);

        loop {
            self.state.tick();

            // Apply any request replies that arrived since the last frame.
            while let Ok(reply) = self.replies_rx.try_recv() {
                self.apply_reply(reply);
            }

            terminal.draw(|frame| self.render(frame))?;

            if let Some(key) = poll_event(tick_rate)? {
                match handle_key_event(key, &mut self.state) {
                    Action::Quit => self.state.should_quit = true,
                    Action::Submit => self.submit(),
                    _ => {}
                }
            }

            if self.state.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Submit the active form.
    ///
    /// Spawns one task per submit; nothing prevents concurrent requests, and
    /// the later-arriving reply wins.
    fn submit(&mut self) {
        match self.state.active {
            ViewKind::Evaluator => {
                self.state.evaluator.begin_request();
                let query = self.state.evaluator.to_query();
                let backend = Arc::clone(&self.backend);
                let tx = self.replies_tx.clone();
                tokio::spawn(async move {
                    let outcome = backend.evaluate(&query).await;
                    let _ = tx.send(Reply::Eval(outcome));
                });
            }
            ViewKind::Validator => {
                self.state.validator.begin_request();
                let query = self.state.validator.to_query();
                let backend = Arc::clone(&self.backend);
                let tx = self.replies_tx.clone();
                tokio::spawn(async move {
                    let outcome = backend.validate(&query).await;
                    let _ = tx.send(Reply::Check(outcome));
                });
            }
        }
    }

    /// Route a reply to the view that issued it.
    fn apply_reply(&mut self, reply: Reply) {
        match reply {
            Reply::Eval(outcome) => self.state.evaluator.apply_outcome(outcome),
            Reply::Check(outcome) => self.state.validator.apply_outcome(outcome),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header with view tabs
                Constraint::Length(3), // Expression
                Constraint::Min(5),    // Variables
                Constraint::Length(6), // Result / validity
                Constraint::Length(1), // Footer
            ])
            .split(area);

        self.render_header(frame, chunks[0]);
        self.render_expression(frame, chunks[1]);
        self.render_variables(frame, chunks[2]);
        self.render_result(frame, chunks[3]);
        self.render_footer(frame, chunks[4]);
    }

    /// Render header: title, view tabs, request status
    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let (phase, elapsed) = match self.state.active {
            ViewKind::Evaluator => (self.state.evaluator.phase, self.state.evaluator.elapsed),
            ViewKind::Validator => (self.state.validator.phase, self.state.validator.elapsed),
        };

        let phase_style = match phase {
            RequestPhase::Pending => self.theme.accent(),
            RequestPhase::Done => self.theme.success(),
            RequestPhase::Failed => self.theme.error(),
            RequestPhase::Idle => self.theme.dimmed(),
        };

        let tab = |kind: ViewKind| {
            let label = format!("[ {} ]", kind.label());
            if self.state.active == kind {
                Span::styled(label, self.theme.focused())
            } else {
                Span::styled(label, self.theme.dimmed())
            }
        };

        let header = Line::from(vec![
            Span::styled("fxpad", self.theme.header()),
            Span::raw("  │  "),
            tab(ViewKind::Evaluator),
            Span::raw(" "),
            tab(ViewKind::Validator),
            Span::raw("  │  "),
            Span::styled(format!("{}", phase), phase_style),
            Span::styled(
                format!(" {}ms", elapsed.as_millis()),
                self.theme.dimmed(),
            ),
        ]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border(false));

        frame.render_widget(Paragraph::new(header).block(block), area);
    }

    /// Render the expression input
    fn render_expression(&self, frame: &mut Frame, area: Rect) {
        let focused = match self.state.active {
            ViewKind::Evaluator => self.state.evaluator.focus == EvalFocus::Expression,
            ViewKind::Validator => self.state.validator.focus == CheckFocus::Expression,
        };
        let expression = match self.state.active {
            ViewKind::Evaluator => &self.state.evaluator.expression,
            ViewKind::Validator => &self.state.validator.expression,
        };

        let line = Line::from(vec![
            Span::raw("  "),
            self.field_span(expression, "e.g. x+1", focused),
        ]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border(focused))
            .title(" EXPRESSION ");

        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    /// Render the variable list of the active form
    fn render_variables(&self, frame: &mut Frame, area: Rect) {
        let (lines, any_focused) = match self.state.active {
            ViewKind::Evaluator => self.evaluator_rows(),
            ViewKind::Validator => self.validator_rows(),
        };

        let lines = if lines.is_empty() {
            vec![Line::from(Span::styled(
                "  (no variables - ctrl+n to add)",
                self.theme.dimmed(),
            ))]
        } else {
            lines
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border(any_focused))
            .title(" VARIABLES ");

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn evaluator_rows(&self) -> (Vec<Line>, bool) {
        let focus = self.state.evaluator.focus;
        let lines = self
            .state
            .evaluator
            .bindings
            .iter()
            .enumerate()
            .map(|(i, binding)| {
                Line::from(vec![
                    Span::styled(format!("  {}. ", i + 1), self.theme.dimmed()),
                    self.field_span(&binding.name, "name", focus == EvalFocus::Name(i)),
                    Span::styled(" = ", self.theme.dimmed()),
                    self.field_span(&binding.value, "value", focus == EvalFocus::Value(i)),
                ])
            })
            .collect();
        (lines, focus.row().is_some())
    }

    fn validator_rows(&self) -> (Vec<Line>, bool) {
        let focus = self.state.validator.focus;
        let lines = self
            .state
            .validator
            .names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                Line::from(vec![
                    Span::styled(format!("  {}. ", i + 1), self.theme.dimmed()),
                    self.field_span(name, "name", focus == CheckFocus::Name(i)),
                ])
            })
            .collect();
        (lines, focus.row().is_some())
    }

    /// Render the result / validity panel
    fn render_result(&self, frame: &mut Frame, area: Rect) {
        let lines = match self.state.active {
            ViewKind::Evaluator => {
                let view = &self.state.evaluator;
                match (view.phase, &view.error, &view.result) {
                    (RequestPhase::Pending, _, _) => vec![Line::from(Span::styled(
                        format!("  {} evaluating", glyphs::PENDING),
                        self.theme.dimmed(),
                    ))],
                    (_, Some(error), _) => vec![Line::from(Span::styled(
                        format!("  {}", error),
                        self.theme.error(),
                    ))],
                    (_, None, Some(result)) => vec![Line::from(vec![
                        Span::styled("  Result: ", self.theme.accent()),
                        Span::styled(result.clone(), self.theme.text()),
                    ])],
                    _ => vec![Line::from(Span::styled(
                        "  Press Enter to evaluate",
                        self.theme.dimmed(),
                    ))],
                }
            }
            ViewKind::Validator => {
                let view = &self.state.validator;
                match (view.phase, view.valid) {
                    (RequestPhase::Pending, _) => vec![Line::from(Span::styled(
                        format!("  {} validating", glyphs::PENDING),
                        self.theme.dimmed(),
                    ))],
                    (_, Some(true)) => vec![Line::from(Span::styled(
                        format!("  {} The expression is valid.", glyphs::VALID),
                        self.theme.success(),
                    ))],
                    (_, Some(false)) => {
                        let mut lines = vec![Line::from(Span::styled(
                            format!("  {} The expression is invalid.", glyphs::INVALID),
                            self.theme.error(),
                        ))];
                        lines.extend(view.errors.iter().map(|error| {
                            Line::from(Span::styled(
                                format!("    - {}", error),
                                self.theme.error(),
                            ))
                        }));
                        lines
                    }
                    (_, None) => vec![Line::from(Span::styled(
                        "  Press Enter to validate",
                        self.theme.dimmed(),
                    ))],
                }
            }
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border(false))
            .title(" RESULT ");

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    /// Render footer key help
    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let help = Line::from(vec![
            Span::styled(" [Enter]", self.theme.accent()),
            Span::styled(" submit  ", self.theme.dimmed()),
            Span::styled("[Tab]", self.theme.accent()),
            Span::styled(" field  ", self.theme.dimmed()),
            Span::styled("[^T]", self.theme.accent()),
            Span::styled(" view  ", self.theme.dimmed()),
            Span::styled("[^N]", self.theme.accent()),
            Span::styled(" add var  ", self.theme.dimmed()),
            Span::styled("[^D]", self.theme.accent()),
            Span::styled(" delete var  ", self.theme.dimmed()),
            Span::styled("[Esc]", self.theme.accent()),
            Span::styled(" quit", self.theme.dimmed()),
        ]);

        frame.render_widget(Paragraph::new(help), area);
    }

    /// Style a field value; focused fields get a trailing cursor glyph,
    /// empty unfocused fields show their placeholder.
    fn field_span(&self, value: &str, placeholder: &str, focused: bool) -> Span<'static> {
        if focused {
            Span::styled(format!("{}{}", value, glyphs::CURSOR), self.theme.focused())
        } else if value.is_empty() {
            Span::styled(format!("‹{}›", placeholder), self.theme.dimmed())
        } else {
            Span::styled(value.to_string(), self.theme.text())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockBackend;
    use serde_json::json;

    fn app_with_mock() -> (TuiApp, Arc<MockBackend>) {
        let backend = Arc::new(MockBackend::new());
        let app = TuiApp::new(backend.clone());
        (app, backend)
    }

    #[test]
    fn test_eval_reply_routes_to_evaluator() {
        let (mut app, _) = app_with_mock();
        app.state.evaluator.begin_request();

        app.apply_reply(Reply::Eval(Ok(EvalOutcome { result: json!(3) })));

        assert_eq!(app.state.evaluator.result.as_deref(), Some("3"));
        assert_eq!(app.state.evaluator.phase, RequestPhase::Done);
    }

    #[test]
    fn test_check_reply_lands_in_validator_even_when_hidden() {
        // Switching views leaves in-flight requests running; their replies
        // still mutate the issuing view's state.
        let (mut app, _) = app_with_mock();
        app.state.validator.begin_request();
        app.state.active = ViewKind::Evaluator;

        app.apply_reply(Reply::Check(Ok(CheckOutcome {
            valid: false,
            errors: vec!["bad".to_string()],
        })));

        assert_eq!(app.state.validator.valid, Some(false));
        assert_eq!(app.state.validator.errors, vec!["bad"]);
        assert!(app.state.evaluator.result.is_none());
    }

    #[tokio::test]
    async fn test_submit_round_trip_through_backend() {
        let (mut app, backend) = app_with_mock();
        backend.queue_eval(Ok(EvalOutcome { result: json!(42) }));

        app.state.evaluator.expression = "6*7".to_string();
        app.state.evaluator.result = Some("stale".to_string());
        app.submit();

        // Submit clears the stale display before the reply lands.
        assert!(app.state.evaluator.result.is_none());
        assert_eq!(app.state.evaluator.phase, RequestPhase::Pending);

        let reply = app.replies_rx.recv().await.unwrap();
        app.apply_reply(reply);

        assert_eq!(app.state.evaluator.result.as_deref(), Some("42"));
        assert_eq!(backend.last_eval_call().unwrap().expression, "6*7");
    }

    #[tokio::test]
    async fn test_concurrent_submits_are_not_deduplicated() {
        // Two submits while one is pending: both requests go out, and the
        // reply applied last determines the display.
        let (mut app, backend) = app_with_mock();

        app.state.evaluator.expression = "x".to_string();
        app.submit();
        app.submit();

        let first = app.replies_rx.recv().await.unwrap();
        let second = app.replies_rx.recv().await.unwrap();
        app.apply_reply(first);
        app.apply_reply(second);

        assert_eq!(backend.eval_calls().len(), 2);
        assert_eq!(app.state.evaluator.result.as_deref(), Some("[mock] x"));
        assert_eq!(app.state.evaluator.phase, RequestPhase::Done);
    }
}
