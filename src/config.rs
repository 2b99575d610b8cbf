use std::time::Duration;

use ratatui::style::Color;
use ratatui::symbols::border;

/// Base tick interval before the speed-level multiplier is applied.
pub const BASE_TICK_INTERVAL: Duration = Duration::from_millis(150);

/// Score-driven speed-ups never push the interval below this.
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(60);

/// Amount removed from the interval at each score milestone.
pub const SPEED_UP_DECREMENT: Duration = Duration::from_millis(10);

/// Score step that triggers a speed-up.
pub const SPEED_UP_SCORE_STEP: u32 = 50;

/// Score granted per food eaten.
pub const POINTS_PER_FOOD: u32 = 10;

/// Random probes tried before food placement falls back to scanning free cells.
pub const FOOD_SPAWN_ATTEMPTS: usize = 64;

/// Terminal columns used to draw one logical cell.
pub const CELL_WIDTH: u16 = 2;

/// Terminal rows used to draw one logical cell.
pub const CELL_HEIGHT: u16 = 1;

/// Rows reserved below the play field for the HUD.
pub const HUD_HEIGHT: u16 = 1;

/// Minimum drag distance, in cells, that counts as a swipe.
pub const SWIPE_SENSITIVITY_CELLS: i32 = 2;

/// Input poll timeout for the runtime loop.
pub const FRAME_POLL_INTERVAL: Duration = Duration::from_millis(16);

pub const COLOR_SNAKE_HEAD: Color = Color::Rgb(0x66, 0xff, 0xb3);
pub const COLOR_SNAKE_BODY: Color = Color::Rgb(0x4e, 0xcc, 0xa3);
pub const COLOR_SNAKE_TAIL: Color = Color::Rgb(0x45, 0xb0, 0x8c);
pub const COLOR_FOOD: Color = Color::Rgb(0xff, 0x6b, 0x6b);
pub const COLOR_BORDER: Color = Color::Rgb(0x4e, 0xcc, 0xa3);
pub const COLOR_MUTED: Color = Color::DarkGray;

pub const GLYPH_SNAKE_HEAD: &str = "██";
pub const GLYPH_SNAKE_BODY: &str = "▓▓";
pub const GLYPH_SNAKE_TAIL: &str = "▒▒";
pub const GLYPH_FOOD: &str = "●";

/// Rounded border around the play field.
pub const BORDER_PLAY_FIELD: border::Set = border::ROUNDED;
