//! TUI Module - Interactive expression form
//!
//! Architecture:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         UI LAYER (app.rs)                           │
//! │  Pure rendering + run loop. Reads AppState, never mutates fields.   │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ▲
//!                               │ AppState
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      DOMAIN LAYER (state.rs)                        │
//! │  View-state structs. Key events and request replies mutate here.    │
//! └─────────────────────────────────────────────────────────────────────┘
//!                               ▲
//!                               │ Reply (mpsc)
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    CONNECTOR LAYER (client/)                        │
//! │  MathBackend trait. Async IO. HttpBackend + MockBackend.            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

mod app;
mod events;
mod state;
mod theme;

pub use app::TuiApp;
pub use state::{AppState, ViewKind};
pub use theme::FormTheme;

use crate::client::create_backend;
use crate::config::ClientConfig;

/// Run the interactive form
pub async fn run(config: ClientConfig) -> anyhow::Result<()> {
    let backend = create_backend(&config)?;
    let app = TuiApp::new(backend);
    app.run().await
}
