use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Context, Line as CanvasLine, Points},
        Block, Borders, Widget,
    },
};

use gridplot::{
    config::Series,
    geometry::{Point, View, Viewport},
    interaction::PointerEvent,
    ActivitySession,
};

const ORIGINAL_COLOR: Color = Color::Rgb(37, 99, 235);
const EXPECTED_COLOR: Color = Color::Rgb(22, 163, 74);
const STUDENT_COLOR: Color = Color::Rgb(220, 38, 38);
const MAX_TICKS: f64 = 40.0;
const MARKER: &str = "●";
/// Nominal pixel size of one terminal cell, so `hitRadiusPx` keeps its
/// pixel meaning on the terminal.
pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;

/// Tick positions in `[min, max]` at multiples of `step`, thinned out by
/// doubling the step until at most [`MAX_TICKS`] remain.
pub fn ticks(min: f64, max: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0 && max > min) {
        return Vec::new();
    }
    let mut step = step;
    while (max - min) / step > MAX_TICKS {
        step *= 2.0;
    }
    let mut out = Vec::new();
    let mut t = (min / step).ceil() * step;
    while t <= max {
        out.push(t + 0.0);
        t += step;
    }
    out
}

/// Grid intersections a click can snap to.
pub fn grid_points(view: &View, step: f64) -> Vec<(f64, f64)> {
    let xs = ticks(view.xmin, view.xmax, step);
    let ys = ticks(view.ymin, view.ymax, step);
    xs.iter()
        .flat_map(|&x| ys.iter().map(move |&y| (x, y)))
        .collect()
}

/// Translate a terminal cell inside `area` into a pointer event at the
/// cell's center, plus the viewport it belongs to, both in nominal pixels.
pub fn pointer_at(area: Rect, column: u16, row: u16) -> Option<(PointerEvent, Viewport)> {
    let inside = column >= area.x
        && column < area.x + area.width
        && row >= area.y
        && row < area.y + area.height;
    if !inside {
        return None;
    }
    let event = PointerEvent::new(
        ((column - area.x) as f64 + 0.5) * CELL_WIDTH_PX,
        ((row - area.y) as f64 + 0.5) * CELL_HEIGHT_PX,
    );
    let viewport = Viewport::new(
        area.width as f64 * CELL_WIDTH_PX,
        area.height as f64 * CELL_HEIGHT_PX,
    );
    Some((event, viewport))
}

fn series_color(series: &Series) -> Color {
    series
        .style
        .as_ref()
        .and_then(|s| s.stroke.as_deref().or(s.fill.as_deref()))
        .and_then(|c| c.parse::<Color>().ok())
        .unwrap_or(Color::Gray)
}

fn polyline(ctx: &mut Context, points: &[Point], color: Color) {
    for pair in points.windows(2) {
        ctx.draw(&CanvasLine::new(pair[0].x(), pair[0].y(), pair[1].x(), pair[1].y(), color));
    }
}

fn markers(ctx: &mut Context, points: &[Point], color: Color) {
    for p in points {
        ctx.print(p.x(), p.y(), Span::styled(MARKER, Style::default().fg(color)));
    }
}

/// The coordinate plane with every layer the session currently shows.
pub fn graph(session: &ActivitySession, title: String) -> impl Widget + '_ {
    let view = *session.view();
    let config = session.config();
    let step = config.interaction.snap_step;

    Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title, Style::default().add_modifier(Modifier::BOLD))),
        )
        .marker(Marker::Braille)
        .x_bounds([view.xmin, view.xmax])
        .y_bounds([view.ymin, view.ymax])
        .paint(move |ctx| {
            ctx.draw(&Points {
                coords: &grid_points(&view, step),
                color: Color::DarkGray,
            });
            if view.ymin <= 0.0 && view.ymax >= 0.0 {
                ctx.draw(&CanvasLine::new(view.xmin, 0.0, view.xmax, 0.0, Color::Gray));
            }
            if view.xmin <= 0.0 && view.xmax >= 0.0 {
                ctx.draw(&CanvasLine::new(0.0, view.ymin, 0.0, view.ymax, Color::Gray));
            }
            ctx.layer();

            for x in ticks(view.xmin, view.xmax, step * 5.0) {
                if x != 0.0 {
                    ctx.print(x, 0.0, Span::styled(format!("{x}"), Style::default().fg(Color::DarkGray)));
                }
            }
            for y in ticks(view.ymin, view.ymax, step * 5.0) {
                if y != 0.0 {
                    ctx.print(0.0, y, Span::styled(format!("{y}"), Style::default().fg(Color::DarkGray)));
                }
            }

            for series in config.overlay_series() {
                let color = series_color(series);
                if series.is_polyline() {
                    polyline(ctx, &series.points, color);
                } else {
                    markers(ctx, &series.points, color);
                }
            }

            let original = &config.original;
            if original.connects_lines() {
                polyline(ctx, &original.points, ORIGINAL_COLOR);
            }

            if session.show_solution() && original.connects_lines() {
                polyline(ctx, session.expected_points(), EXPECTED_COLOR);
            }

            polyline(ctx, session.ordered_student_points(), STUDENT_COLOR);
            ctx.layer();

            markers(ctx, &original.points, ORIGINAL_COLOR);
            if session.show_solution() {
                markers(ctx, session.expected_points(), EXPECTED_COLOR);
            }
            markers(ctx, session.student_points(), STUDENT_COLOR);
        })
}
