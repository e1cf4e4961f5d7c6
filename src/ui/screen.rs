use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::{App, AppState};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Plotting screen - renders the activity using the App widget
pub struct ActivityScreen;

impl Screen for ActivityScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

/// Shown instead of the graph when the activity cannot be drawn
pub struct ConfigErrorScreen;

impl Screen for ConfigErrorScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        let AppState::ConfigError(err) = &app.state else {
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Length(3), Constraint::Min(3), Constraint::Length(1)].as_ref())
            .split(f.area());

        let message = Paragraph::new(Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL).title("Config error"))
        .alignment(Alignment::Center);
        f.render_widget(message, chunks[0]);

        let dump = serde_json::to_string_pretty(app.session.config()).unwrap_or_default();
        let body = Paragraph::new(dump)
            .block(Block::default().borders(Borders::ALL).title("Normalized config"))
            .wrap(Wrap { trim: false });
        f.render_widget(body, chunks[1]);

        let help = Paragraph::new(Span::styled(
            "(esc)ape",
            Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
        ));
        f.render_widget(help, chunks[2]);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Plotting => Box::new(ActivityScreen),
        AppState::ConfigError(_) => Box::new(ConfigErrorScreen),
    }
}
