use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::config::{COLOR_MUTED, COLOR_SNAKE_BODY, COLOR_SNAKE_HEAD};
use crate::driver::Scoreboard;
use crate::engine::Snapshot;

const SEPARATOR: &str = " │ ";

/// Renders the one-line status bar below the play field.
pub fn render_hud(
    frame: &mut Frame<'_>,
    area: Rect,
    snapshot: &Snapshot<'_>,
    scoreboard: Scoreboard,
) {
    let fields = hud_fields(snapshot, scoreboard);
    let fields = fit_fields(&fields, usize::from(area.width));

    let mut spans = Vec::with_capacity(fields.len() * 4);
    for (index, (label, value)) in fields.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(SEPARATOR, Style::default().fg(COLOR_MUTED)));
        }
        spans.push(Span::styled(format!("{label} "), Style::default().fg(COLOR_SNAKE_BODY)));
        spans.push(Span::styled(
            value.clone(),
            Style::default()
                .fg(COLOR_SNAKE_HEAD)
                .add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Right),
        area,
    );
}

/// Label/value pairs, least important first.
fn hud_fields(snapshot: &Snapshot<'_>, scoreboard: Scoreboard) -> Vec<(&'static str, String)> {
    vec![
        ("Length", snapshot.length.to_string()),
        (
            "Speed",
            format!(
                "{} {}ms",
                snapshot.speed_level,
                snapshot.tick_interval.as_millis()
            ),
        ),
        ("Score", snapshot.score.to_string()),
        ("Hi", scoreboard.high_score.max(snapshot.score).to_string()),
    ]
}

/// Drops leading fields until the rest fits into `width` columns.
fn fit_fields(fields: &[(&'static str, String)], width: usize) -> Vec<(&'static str, String)> {
    let mut start = 0;
    while start < fields.len() && line_width(&fields[start..]) > width {
        start += 1;
    }
    fields[start..].to_vec()
}

fn line_width(fields: &[(&'static str, String)]) -> usize {
    let content: usize = fields
        .iter()
        .map(|(label, value)| label.width() + 1 + value.width())
        .sum();
    content + SEPARATOR.width() * fields.len().saturating_sub(1)
}
