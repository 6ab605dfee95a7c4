//! Terminal client for Rainyield.
//!
//! Replaces the browser page: a form for rainfall and provider, a CSV
//! loader, a scatter chart per provider and a history table. All history is
//! kept here; the server is stateless.

mod app;
mod client;
mod ui;

pub use app::{Action, App, Focus, Outcome};
pub use client::{ApiClient, DEFAULT_SERVER_URL};
pub use ui::{draw, padded_bounds, provider_color};

use crossterm::event::{self, Event};
use rainyield_error::{RainyieldResult, SystemError};
use ratatui::DefaultTerminal;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tracing::{debug, info};

/// How long to wait for a key before redrawing.
const TICK: Duration = Duration::from_millis(100);

/// Run the client until the user quits.
///
/// Blocks the calling thread on terminal input; requests run as tasks on
/// `runtime` and report back through a channel.
pub fn run(client: ApiClient, runtime: tokio::runtime::Handle) -> RainyieldResult<()> {
    info!(server = client.base_url(), "Starting terminal client");
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &client, &runtime);
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    client: &ApiClient,
    runtime: &tokio::runtime::Handle,
) -> RainyieldResult<()> {
    let mut app = App::new();
    let (tx, mut rx) = unbounded_channel();

    while !app.should_quit {
        terminal
            .draw(|f| draw(f, &app))
            .map_err(|e| SystemError::io(format!("Draw error: {}", e)))?;

        while let Ok(outcome) = rx.try_recv() {
            app.apply(outcome);
        }

        let ready = event::poll(TICK)
            .map_err(|e| SystemError::io(format!("Event poll error: {}", e)))?;
        if !ready {
            continue;
        }
        let event = event::read().map_err(|e| SystemError::io(format!("Event read error: {}", e)))?;
        if let Event::Key(key) = event {
            if let Some(action) = app.handle_key(key) {
                dispatch(action, client.clone(), tx.clone(), runtime);
            }
        }
    }

    info!("Terminal client exiting");
    Ok(())
}

/// Start a request in the background.
fn dispatch(
    action: Action,
    client: ApiClient,
    tx: UnboundedSender<Outcome>,
    runtime: &tokio::runtime::Handle,
) {
    debug!(?action, "Dispatching request");
    runtime.spawn(async move {
        let outcome = match action {
            Action::Predict { rainfall, provider } => {
                Outcome::Predicted(client.predict(rainfall, provider).await)
            }
            Action::Upload(path) => Outcome::Uploaded(client.upload_csv(&path).await),
        };
        // The receiver is gone only after the loop exits.
        let _ = tx.send(outcome);
    });
}
