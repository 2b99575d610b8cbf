use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};
use ratatui::Frame;

use crate::config::{COLOR_FOOD, COLOR_MUTED, COLOR_SNAKE_BODY, COLOR_SNAKE_HEAD};
use crate::difficulty::SpeedLevel;
use crate::driver::Scoreboard;
use crate::engine::EndReason;

/// Draws the start screen as a centered popup.
pub fn render_start_menu(frame: &mut Frame<'_>, area: Rect, high_score: u32, level: SpeedLevel) {
    let popup = centered_popup(area, 80, 60);
    frame.render_widget(Clear, popup);

    let [title_row, body_row, footer_row] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(popup);

    frame.render_widget(
        Paragraph::new(Line::from("SNAKE"))
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(COLOR_SNAKE_HEAD)
                    .add_modifier(Modifier::BOLD),
            ),
        title_row,
    );

    let body = vec![
        Line::from(format!("High score: {high_score}")),
        Line::from(""),
        speed_line(level),
        Line::from(""),
        Line::from("[Enter]/[Space] Start"),
        Line::from("[Q]/[Esc] Quit"),
    ];
    frame.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" start ")),
        body_row,
    );

    frame.render_widget(
        Paragraph::new(Line::from("Arrows/WASD or drag to steer"))
            .alignment(Alignment::Center)
            .style(Style::default().fg(COLOR_MUTED)),
        footer_row,
    );
}

/// Draws the game-over screen as a centered popup.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    score: u32,
    scoreboard: Scoreboard,
    end_reason: Option<EndReason>,
) {
    let popup = centered_popup(area, 70, 60);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from(Span::styled(
            "GAME OVER",
            Style::default().fg(COLOR_FOOD).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("Score: {score}")),
        Line::from(format!("High score: {}", scoreboard.high_score)),
        Line::from(match end_reason {
            Some(EndReason::WallCollision) => "Cause: hit wall",
            Some(EndReason::SelfCollision) => "Cause: hit yourself",
            Some(EndReason::BoardFull) => "Board full. You win!",
            None => "",
        }),
        Line::from(if scoreboard.new_record {
            "New high score!"
        } else {
            ""
        }),
        Line::from(""),
        Line::from("[Enter]/[Space] Play Again"),
        Line::from("[Q]/[Esc] Quit"),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" game over ")),
        popup,
    );
}

fn speed_line(current: SpeedLevel) -> Line<'static> {
    let mut spans = vec![Span::raw("Speed: ")];
    for level in SpeedLevel::ALL {
        let label = format!(" [{}] {} ", level.number(), level);
        let style = if level == current {
            Style::default()
                .fg(COLOR_SNAKE_HEAD)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(COLOR_SNAKE_BODY)
        };
        spans.push(Span::styled(label, style));
    }
    Line::from(spans)
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use crate::difficulty::SpeedLevel;

    use super::{centered_popup, speed_line};

    #[test]
    fn popup_is_centered_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_popup(area, 60, 50);

        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
        assert_eq!(popup.x, 20);
        assert_eq!(popup.y, 10);
    }

    #[test]
    fn speed_line_lists_every_level() {
        let line = speed_line(SpeedLevel::Fast);
        let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();

        assert!(text.contains("[1] Slow"));
        assert!(text.contains("[2] Normal"));
        assert!(text.contains("[3] Fast"));
    }
}
