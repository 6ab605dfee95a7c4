//! Application state and input handling.

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rainyield_core::{
    HistoricalRow, PredictResponse, PredictionHistory, PredictionPoint, Provider,
    validate_rainfall,
};
use rainyield_error::RainyieldResult;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Which form field receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Rainfall text input
    Rainfall,
    /// Provider selector
    Provider,
    /// CSV path text input
    CsvPath,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Rainfall => Focus::Provider,
            Focus::Provider => Focus::CsvPath,
            Focus::CsvPath => Focus::Rainfall,
        }
    }

    fn previous(self) -> Self {
        match self {
            Focus::Rainfall => Focus::CsvPath,
            Focus::Provider => Focus::Rainfall,
            Focus::CsvPath => Focus::Provider,
        }
    }
}

/// Work the event loop must start on the app's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Request a prediction
    Predict {
        /// Rainfall in mm
        rainfall: f64,
        /// Provider to ask
        provider: Provider,
    },
    /// Upload a CSV file
    Upload(PathBuf),
}

/// Result of a finished request.
#[derive(Debug)]
pub enum Outcome {
    /// Reply to a prediction request
    Predicted(RainyieldResult<PredictResponse>),
    /// Reply to an upload
    Uploaded(RainyieldResult<Vec<HistoricalRow>>),
}

/// Terminal client state.
///
/// Owns the accumulated prediction history; the server keeps none.
#[derive(Debug)]
pub struct App {
    /// Rainfall input buffer
    pub rainfall_input: String,
    /// Index into [`App::providers`]
    pub provider_index: usize,
    /// CSV path input buffer
    pub csv_path: String,
    /// Focused field
    pub focus: Focus,
    /// Accumulated points
    pub history: PredictionHistory,
    /// Most recent successful prediction
    pub latest: Option<PredictionPoint>,
    /// Error shown in the alert panel
    pub alert: Option<String>,
    /// Whether a request is outstanding
    pub in_flight: bool,
    /// Status bar message
    pub status_message: String,
    /// Set when the user asks to quit
    pub should_quit: bool,
    providers: Vec<Provider>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Empty form with the first provider selected.
    pub fn new() -> Self {
        Self {
            rainfall_input: String::new(),
            provider_index: 0,
            csv_path: String::new(),
            focus: Focus::Rainfall,
            history: PredictionHistory::new(),
            latest: None,
            alert: None,
            in_flight: false,
            status_message: "Ready".to_string(),
            should_quit: false,
            providers: Provider::live().collect(),
        }
    }

    /// Selectable providers in menu order.
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// Currently selected provider.
    pub fn provider(&self) -> Provider {
        self.providers
            .get(self.provider_index)
            .copied()
            .unwrap_or(Provider::OpenAi)
    }

    /// Handle one key press, returning work to start if any.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('l') => self.clear_history(),
                KeyCode::Char('u') => return self.submit_upload(),
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Esc => {
                if self.alert.take().is_none() {
                    self.should_quit = true;
                }
            }
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.previous(),
            KeyCode::Enter => {
                return match self.focus {
                    Focus::CsvPath => self.submit_upload(),
                    _ => self.submit_prediction(),
                };
            }
            KeyCode::Left if self.focus == Focus::Provider => self.cycle_provider(-1),
            KeyCode::Right if self.focus == Focus::Provider => self.cycle_provider(1),
            KeyCode::Backspace => {
                if let Some(buffer) = self.focused_buffer() {
                    buffer.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(buffer) = self.focused_buffer() {
                    buffer.push(c);
                }
            }
            _ => {}
        }
        None
    }

    fn focused_buffer(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Rainfall => Some(&mut self.rainfall_input),
            Focus::CsvPath => Some(&mut self.csv_path),
            Focus::Provider => None,
        }
    }

    fn cycle_provider(&mut self, step: isize) {
        let count = self.providers.len() as isize;
        if count > 0 {
            self.provider_index = (self.provider_index as isize + step).rem_euclid(count) as usize;
        }
    }

    /// Validate the rainfall input and start a prediction.
    ///
    /// Nothing is sent while another request is outstanding or when the
    /// input is not a rainfall the server would accept.
    pub fn submit_prediction(&mut self) -> Option<Action> {
        if self.in_flight {
            return None;
        }

        let input = self.rainfall_input.trim();
        let Ok(rainfall) = input.parse::<f64>() else {
            self.alert = Some(format!("Rainfall '{}' is not a number", input));
            return None;
        };
        if let Err(err) = validate_rainfall(rainfall) {
            self.alert = Some(err.kind.to_string());
            return None;
        }

        let provider = self.provider();
        self.alert = None;
        self.in_flight = true;
        self.status_message = format!("Asking {} about {} mm...", provider.label(), rainfall);
        debug!(rainfall, provider = %provider, "Submitting prediction");
        Some(Action::Predict { rainfall, provider })
    }

    /// Start an upload of the CSV path input.
    pub fn submit_upload(&mut self) -> Option<Action> {
        if self.in_flight {
            return None;
        }
        let path = self.csv_path.trim();
        if path.is_empty() {
            self.alert = Some("Enter a CSV file path first".to_string());
            return None;
        }

        self.alert = None;
        self.in_flight = true;
        self.status_message = format!("Uploading {}...", path);
        Some(Action::Upload(PathBuf::from(path)))
    }

    /// Fold a finished request into the state.
    pub fn apply(&mut self, outcome: Outcome) {
        self.in_flight = false;
        match outcome {
            Outcome::Predicted(Ok(response)) => match PredictionPoint::try_from(response) {
                Ok(point) => {
                    info!(
                        provider = %point.provider(),
                        rainfall = *point.rainfall(),
                        yield_tons = *point.yield_tons(),
                        "Prediction recorded"
                    );
                    self.status_message = format!(
                        "{} predicts {:.2} t/ha",
                        point.provider().label(),
                        point.yield_tons()
                    );
                    self.history.record(point.clone());
                    self.latest = Some(point);
                }
                Err(err) => self.fail(err.kind.to_string()),
            },
            Outcome::Uploaded(Ok(rows)) => {
                let timestamp = Utc::now();
                let count = rows.len();
                self.history.extend(
                    rows.into_iter()
                        .map(|row| PredictionPoint::historical(row, timestamp)),
                );
                info!(rows = count, "Historical data merged");
                self.status_message = format!("Loaded {} historical rows", count);
            }
            Outcome::Predicted(Err(err)) | Outcome::Uploaded(Err(err)) => {
                self.fail(err.user_message())
            }
        }
    }

    fn fail(&mut self, message: String) {
        warn!(error = %message, "Request failed");
        self.status_message = "Request failed".to_string();
        self.alert = Some(message);
    }

    /// Drop all accumulated points.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.latest = None;
        self.status_message = "History cleared".to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rainyield_error::{RainyieldError, SystemError};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
    }

    fn response(rainfall: f64, provider: Provider, prediction: &str) -> PredictResponse {
        PredictResponse::builder()
            .prediction(prediction)
            .provider(provider)
            .rainfall(rainfall)
            .timestamp(Utc::now())
            .build()
            .unwrap()
    }

    #[test]
    fn test_enter_submits_selected_provider() {
        let mut app = App::new();
        type_text(&mut app, "850");
        app.handle_key(press(KeyCode::Tab));
        app.handle_key(press(KeyCode::Right));

        let action = app.handle_key(press(KeyCode::Enter));
        assert_eq!(
            action,
            Some(Action::Predict {
                rainfall: 850.0,
                provider: Provider::Anthropic
            })
        );
        assert!(app.in_flight);
    }

    #[test]
    fn test_invalid_rainfall_sends_nothing() {
        for input in ["abc", "-3", "5000.1", ""] {
            let mut app = App::new();
            type_text(&mut app, input);
            assert_eq!(app.submit_prediction(), None);
            assert!(app.alert.is_some());
            assert!(!app.in_flight);
        }
    }

    #[test]
    fn test_no_second_request_while_in_flight() {
        let mut app = App::new();
        type_text(&mut app, "700");
        assert!(app.submit_prediction().is_some());
        assert_eq!(app.submit_prediction(), None);
    }

    #[test]
    fn test_provider_cycles_both_ways() {
        let mut app = App::new();
        app.focus = Focus::Provider;
        app.handle_key(press(KeyCode::Left));
        assert_eq!(app.provider(), Provider::Deepseek);
        app.handle_key(press(KeyCode::Right));
        assert_eq!(app.provider(), Provider::OpenAi);
    }

    #[test]
    fn test_repeat_prediction_replaces_point() {
        let mut app = App::new();
        app.apply(Outcome::Predicted(Ok(response(800.0, Provider::OpenAi, "3.10"))));
        app.apply(Outcome::Predicted(Ok(response(800.0, Provider::OpenAi, "3.30"))));
        app.apply(Outcome::Predicted(Ok(response(600.0, Provider::Llama, "2.00"))));

        assert_eq!(app.history.len(), 2);
        assert_eq!(*app.history.points()[0].rainfall(), 600.0);
        assert_eq!(*app.history.points()[1].yield_tons(), 3.3);
        assert_eq!(*app.latest.as_ref().unwrap().provider(), Provider::Llama);
    }

    #[test]
    fn test_upload_tags_rows_historical() {
        let mut app = App::new();
        app.in_flight = true;
        app.apply(Outcome::Uploaded(Ok(vec![
            HistoricalRow::new(1500.0, 3.4),
            HistoricalRow::new(800.0, 2.1),
        ])));

        assert!(!app.in_flight);
        assert_eq!(app.history.len(), 2);
        assert!(
            app.history
                .points()
                .iter()
                .all(|p| *p.provider() == Provider::Historical)
        );
        assert_eq!(*app.history.points()[0].rainfall(), 800.0);
        assert!(app.latest.is_none());
    }

    #[test]
    fn test_error_shown_verbatim() {
        let mut app = App::new();
        let err: RainyieldError = SystemError::http("OPENAI_API_KEY environment variable not set").into();
        app.apply(Outcome::Predicted(Err(err)));
        assert_eq!(
            app.alert.as_deref(),
            Some("OPENAI_API_KEY environment variable not set")
        );

        app.handle_key(press(KeyCode::Esc));
        assert!(app.alert.is_none());
        assert!(!app.should_quit);
    }

    #[test]
    fn test_clear_and_upload_shortcuts() {
        let mut app = App::new();
        app.apply(Outcome::Predicted(Ok(response(800.0, Provider::OpenAi, "3.10"))));
        app.handle_key(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL));
        assert!(app.history.is_empty());
        assert!(app.latest.is_none());

        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)),
            None
        );
        app.csv_path = "data/rain.csv".into();
        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)),
            Some(Action::Upload(PathBuf::from("data/rain.csv")))
        );
    }
}
