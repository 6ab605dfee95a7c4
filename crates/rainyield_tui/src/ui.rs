//! UI rendering for the prediction client.

use crate::app::{App, Focus};
use rainyield_core::{ChartBounds, Provider};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Row, Table, Wrap},
};

/// Series colour for a provider.
pub fn provider_color(provider: Provider) -> Color {
    match provider {
        Provider::OpenAi => Color::Green,
        Provider::Anthropic => Color::LightRed,
        Provider::Llama => Color::Blue,
        Provider::Deepseek => Color::Cyan,
        Provider::Historical => Color::Yellow,
    }
}

/// Draw the main UI.
#[tracing::instrument(skip_all)]
pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    draw_header(f, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Rainfall
            Constraint::Length(3), // Provider
            Constraint::Length(3), // CSV path
            Constraint::Length(6), // Latest prediction
            Constraint::Min(0),    // Alert
        ])
        .split(columns[0]);

    draw_form(f, app, &left[..3]);
    draw_latest(f, app, left[3]);
    draw_alert(f, app, left[4]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(columns[1]);

    draw_chart(f, app, right[0]);
    draw_history(f, app, right[1]);

    draw_status_bar(f, app, chunks[2]);
}

/// Draw the header.
fn draw_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new("Rainyield - Rainfall to Yield Predictions")
        .block(Block::default().borders(Borders::ALL))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(header, area);
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

/// Draw the three form fields.
fn draw_form(f: &mut Frame, app: &App, areas: &[Rect]) {
    let rainfall = Paragraph::new(app.rainfall_input.as_str())
        .block(field_block("Rainfall (mm)", app.focus == Focus::Rainfall));
    f.render_widget(rainfall, areas[0]);

    let provider = app.provider();
    let selector = Line::from(vec![
        Span::raw("< "),
        Span::styled(
            provider.label(),
            Style::default()
                .fg(provider_color(provider))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" >"),
    ]);
    let provider = Paragraph::new(selector)
        .block(field_block("Provider", app.focus == Focus::Provider));
    f.render_widget(provider, areas[1]);

    let csv = Paragraph::new(app.csv_path.as_str())
        .block(field_block("CSV file", app.focus == Focus::CsvPath));
    f.render_widget(csv, areas[2]);
}

/// Draw the most recent prediction.
fn draw_latest(f: &mut Frame, app: &App, area: Rect) {
    let text = match &app.latest {
        Some(point) => vec![
            Line::from(vec![
                Span::styled(
                    format!("{:.2} t/ha", point.yield_tons()),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" at {} mm", point.rainfall())),
            ]),
            Line::from(Span::styled(
                point.provider().label(),
                Style::default().fg(provider_color(*point.provider())),
            )),
            Line::from(point.comment().clone().unwrap_or_default()),
        ],
        None if app.in_flight => vec![Line::from("Waiting for prediction...")],
        None => vec![Line::from("No prediction yet")],
    };

    let latest = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Latest Prediction"),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(latest, area);
}

/// Draw the inline error alert.
fn draw_alert(f: &mut Frame, app: &App, area: Rect) {
    let Some(message) = &app.alert else {
        return;
    };
    let alert = Paragraph::new(message.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title("Error"),
        )
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true });
    f.render_widget(alert, area);
}

/// Axis ranges with a margin, or defaults covering the accepted input.
pub fn padded_bounds(bounds: Option<ChartBounds>) -> ([f64; 2], [f64; 2]) {
    match bounds {
        Some(bounds) => {
            let pad = |[lo, hi]: [f64; 2], min_span: f64| {
                let margin = ((hi - lo) * 0.1).max(min_span);
                [(lo - margin).max(0.0), hi + margin]
            };
            (pad(bounds.rainfall, 50.0), pad(bounds.yield_tons, 0.5))
        }
        None => ([0.0, 2000.0], [0.0, 8.0]),
    }
}

/// Draw the rainfall/yield scatter, one dataset per provider.
fn draw_chart(f: &mut Frame, app: &App, area: Rect) {
    let series = app.history.series();
    let datasets: Vec<Dataset> = series
        .iter()
        .map(|s| {
            Dataset::default()
                .name(s.provider.label())
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(provider_color(s.provider)))
                .data(&s.points)
        })
        .collect();

    let (x, y) = padded_bounds(app.history.chart_bounds());
    let labels = |[lo, hi]: [f64; 2], precision: usize| {
        vec![
            format!("{:.*}", precision, lo),
            format!("{:.*}", precision, (lo + hi) / 2.0),
            format!("{:.*}", precision, hi),
        ]
    };

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Rainfall vs Yield"),
        )
        .x_axis(
            Axis::default()
                .title("Rainfall (mm)")
                .style(Style::default().fg(Color::Gray))
                .bounds(x)
                .labels(labels(x, 0)),
        )
        .y_axis(
            Axis::default()
                .title("Yield (t/ha)")
                .style(Style::default().fg(Color::Gray))
                .bounds(y)
                .labels(labels(y, 1)),
        );
    f.render_widget(chart, area);
}

/// Draw the history table.
fn draw_history(f: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec!["Rainfall", "Yield", "Provider", "Comment"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = app
        .history
        .points()
        .iter()
        .map(|point| {
            let number = |value: f64, precision: usize| {
                if value.is_finite() {
                    format!("{:.*}", precision, value)
                } else {
                    "---".to_string()
                }
            };
            Row::new(vec![
                number(*point.rainfall(), 1),
                number(*point.yield_tons(), 2),
                point.provider().label().to_string(),
                point.comment().clone().unwrap_or_default(),
            ])
            .style(Style::default().fg(provider_color(*point.provider())))
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(11),
            Constraint::Min(20),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("History ({})", app.history.len())),
    );
    f.render_widget(table, area);
}

/// Draw the status bar with help text.
fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let help_text = if app.in_flight {
        "Request in progress... | Ctrl+Q: Quit"
    } else {
        match app.focus {
            Focus::Provider => "←→: Provider | Tab: Next | Enter: Predict | Ctrl+L: Clear | Esc: Quit",
            Focus::CsvPath => "Enter: Upload | Tab: Next | Ctrl+L: Clear | Esc: Quit",
            Focus::Rainfall => "Enter: Predict | Tab: Next | Ctrl+U: Upload | Ctrl+L: Clear | Esc: Quit",
        }
    };

    let status_text = format!("{} | {}", app.status_message, help_text);
    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Gray));
    f.render_widget(status, area);
}
