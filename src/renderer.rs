use std::io;

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::config::{
    BORDER_PLAY_FIELD, CELL_HEIGHT, CELL_WIDTH, COLOR_BORDER, COLOR_FOOD, COLOR_SNAKE_BODY,
    COLOR_SNAKE_HEAD, COLOR_SNAKE_TAIL, GLYPH_FOOD, GLYPH_SNAKE_BODY, GLYPH_SNAKE_HEAD,
    GLYPH_SNAKE_TAIL, HUD_HEIGHT,
};
use crate::driver::{RenderSink, Scoreboard};
use crate::engine::{GameStatus, Snapshot};
use crate::grid::{Cell, GridModel};
use crate::terminal_runtime::TerminalSession;
use crate::ui::hud::render_hud;
use crate::ui::menu::{render_game_over_menu, render_start_menu};

/// Render sink drawing into the terminal through ratatui.
pub struct TerminalRenderer {
    session: TerminalSession,
}

impl TerminalRenderer {
    #[must_use]
    pub fn new(session: TerminalSession) -> Self {
        Self { session }
    }

    /// Current terminal size in columns and rows.
    pub fn size(&mut self) -> io::Result<(u16, u16)> {
        let size = self.session.terminal_mut().size()?;
        Ok((size.width, size.height))
    }
}

impl RenderSink for TerminalRenderer {
    fn render(&mut self, snapshot: &Snapshot<'_>, scoreboard: Scoreboard) -> io::Result<()> {
        self.session
            .terminal_mut()
            .draw(|frame| render(frame, snapshot, scoreboard))?;
        Ok(())
    }
}

/// Largest grid whose bordered field and HUD fit a terminal of this size.
#[must_use]
pub fn fit_grid(width: u16, height: u16) -> GridModel {
    GridModel::fit(
        width.saturating_sub(2),
        height.saturating_sub(2 + HUD_HEIGHT),
        CELL_WIDTH,
        CELL_HEIGHT,
    )
}

/// Renders the full game frame from immutable state.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot<'_>, scoreboard: Scoreboard) {
    let [field_area, hud_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(HUD_HEIGHT)]).areas(frame.area());

    let play_area = field_rect(field_area, snapshot.grid);
    let block = Block::bordered()
        .border_set(BORDER_PLAY_FIELD)
        .border_style(Style::new().fg(COLOR_BORDER))
        .title(" snake ");

    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    render_food(frame, inner, snapshot);
    render_snake(frame, inner, snapshot);
    render_hud(frame, hud_area, snapshot, scoreboard);

    match snapshot.status {
        GameStatus::Menu => {
            render_start_menu(frame, play_area, scoreboard.high_score, snapshot.speed_level);
        }
        GameStatus::GameOver => render_game_over_menu(
            frame,
            play_area,
            snapshot.score,
            scoreboard,
            snapshot.end_reason,
        ),
        GameStatus::Running => {}
    }
}

/// Centers the bordered field for `grid` inside `area`, clipping if needed.
fn field_rect(area: Rect, grid: GridModel) -> Rect {
    let width = grid
        .cols()
        .saturating_mul(CELL_WIDTH)
        .saturating_add(2)
        .min(area.width);
    let height = grid
        .rows()
        .saturating_mul(CELL_HEIGHT)
        .saturating_add(2)
        .min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot<'_>) {
    let Some(food) = snapshot.food else {
        return;
    };
    let Some((x, y)) = logical_to_terminal(inner, snapshot.grid, food) else {
        return;
    };

    let buffer = frame.buffer_mut();
    buffer.set_string(x, y, GLYPH_FOOD, Style::new().fg(COLOR_FOOD));
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot<'_>) {
    let Some(snake) = snapshot.snake else {
        return;
    };
    let last = snake.len().saturating_sub(1);

    let buffer = frame.buffer_mut();
    for (index, segment) in snake.segments().enumerate() {
        let Some((x, y)) = logical_to_terminal(inner, snapshot.grid, *segment) else {
            continue;
        };

        let (glyph, style) = if index == 0 {
            (
                GLYPH_SNAKE_HEAD,
                Style::new()
                    .fg(COLOR_SNAKE_HEAD)
                    .add_modifier(Modifier::BOLD),
            )
        } else if index == last {
            (GLYPH_SNAKE_TAIL, Style::new().fg(COLOR_SNAKE_TAIL))
        } else {
            (GLYPH_SNAKE_BODY, Style::new().fg(COLOR_SNAKE_BODY))
        };

        buffer.set_string(x, y, glyph, style);
    }
}

fn logical_to_terminal(inner: Rect, grid: GridModel, cell: Cell) -> Option<(u16, u16)> {
    if !grid.contains(cell) {
        return None;
    }

    let x_offset = u16::try_from(cell.col).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(cell.row).ok()?.checked_mul(CELL_HEIGHT)?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
