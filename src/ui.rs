pub mod plot;
pub mod screen;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use gridplot::ClickOutcome;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

fn chunks(area: Rect) -> [Rect; 5] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(5),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(area);
    [chunks[0], chunks[1], chunks[2], chunks[3], chunks[4]]
}

/// Cells covered by the coordinate plane (inside its border) for a frame of
/// the given size. Clicks are mapped against this area.
pub fn graph_area(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(chunks(area)[2])
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;
        let config = session.config();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);
        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);

        let [header, instructions, graph, status, keys] = chunks(area);

        Paragraph::new(vec![
            Line::from(Span::styled(config.ui.title.clone(), bold_style)),
            Line::from(Span::styled(config.ui.subtitle.clone(), dim_style)),
        ])
        .alignment(Alignment::Center)
        .render(header, buf);

        let text = match (self.hint_visible, session.hint()) {
            (true, Some(hint)) => Span::styled(format!("hint: {hint}"), Style::default().fg(Color::Yellow)),
            _ => Span::styled(config.instructions(), italic_style),
        };
        Paragraph::new(Line::from(text))
            .wrap(Wrap { trim: true })
            .render(instructions, buf);

        let title = config.ui.legend.iter().join(" · ");
        plot::graph(session, title).render(graph, buf);

        let mut spans = vec![Span::styled(
            format!(
                "matched {}/{} · placed {}",
                session.ordered_student_points().len(),
                session.expected_points().len(),
                session.student_points().len()
            ),
            dim_style,
        )];
        if self.show_coordinates {
            if let Some(ClickOutcome::Accepted(p)) = self.last_outcome {
                spans.push(Span::styled(format!("  last {p}"), dim_style));
            }
        }
        if let Some(outcome) = self.last_outcome.filter(|o| !o.is_accepted()) {
            spans.push(Span::styled(format!("  {outcome}"), Style::default().fg(Color::Yellow)));
        }
        if !session.feedback().is_empty() {
            let style = match session.last_submit_correct() {
                Some(true) => green_bold_style,
                _ => red_bold_style,
            };
            spans.push(Span::raw("  "));
            spans.push(Span::styled(session.feedback().to_string(), style));
        }
        Paragraph::new(Line::from(spans)).render(status, buf);

        let mut legend = vec!["(click) place", "(u)ndo", "(r)eset", "(enter) submit", "(+/-) zoom"];
        if config.feedback.allow_hints {
            legend.push("(h)int");
        }
        if session.show_solution() {
            legend.push("(c)lear solution");
        } else if session.can_reveal_solution() {
            legend.push("(v)iew solution");
        }
        legend.push("(esc)ape");
        Paragraph::new(Span::styled(
            legend.iter().join("  "),
            Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
        ))
        .render(keys, buf);
    }
}
