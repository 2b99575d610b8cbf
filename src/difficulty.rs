use std::fmt;
use std::time::Duration;

use crate::config::{
    BASE_TICK_INTERVAL, MIN_TICK_INTERVAL, SPEED_UP_DECREMENT, SPEED_UP_SCORE_STEP,
};
use crate::error::GameError;

/// Player-selected pace of the game.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum SpeedLevel {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl SpeedLevel {
    /// All levels in selection order.
    pub const ALL: [Self; 3] = [Self::Slow, Self::Normal, Self::Fast];

    /// Interval multiplier in percent of the base interval.
    #[must_use]
    pub fn multiplier_percent(self) -> u32 {
        match self {
            Self::Slow => 150,
            Self::Normal => 100,
            Self::Fast => 60,
        }
    }

    #[must_use]
    pub fn multiplier(self) -> f64 {
        f64::from(self.multiplier_percent()) / 100.0
    }

    /// Numeric level as shown to the player.
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Self::Slow => 1,
            Self::Normal => 2,
            Self::Fast => 3,
        }
    }

    /// Interval at this level before any score speed-up.
    #[must_use]
    pub fn base_interval(self) -> Duration {
        BASE_TICK_INTERVAL * self.multiplier_percent() / 100
    }
}

impl TryFrom<u8> for SpeedLevel {
    type Error = GameError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Self::Slow),
            2 => Ok(Self::Normal),
            3 => Ok(Self::Fast),
            other => Err(GameError::InvalidSpeedLevel(other)),
        }
    }
}

impl fmt::Display for SpeedLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
        })
    }
}

/// Tracks the tick interval of the running session.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct DifficultyController {
    level: SpeedLevel,
    interval: Duration,
}

impl DifficultyController {
    #[must_use]
    pub fn new(level: SpeedLevel) -> Self {
        Self {
            level,
            interval: level.base_interval(),
        }
    }

    /// Switches level and returns its multiplier.
    ///
    /// The interval jumps straight to the level's base interval, dropping any
    /// score speed-ups accumulated so far.
    pub fn set_level(&mut self, level: SpeedLevel) -> f64 {
        self.level = level;
        self.interval = level.base_interval();
        level.multiplier()
    }

    /// Restores the level's base interval for a fresh session.
    pub fn reset(&mut self) {
        self.interval = self.level.base_interval();
    }

    #[must_use]
    pub fn level(&self) -> SpeedLevel {
        self.level
    }

    #[must_use]
    pub fn current_interval(&self) -> Duration {
        self.interval
    }

    /// Applies the milestone speed-up for `score`.
    ///
    /// Returns the new interval when it changed.
    pub fn on_score(&mut self, score: u32) -> Option<Duration> {
        if score == 0 || score % SPEED_UP_SCORE_STEP != 0 || self.interval <= MIN_TICK_INTERVAL {
            return None;
        }

        self.interval = self
            .interval
            .saturating_sub(SPEED_UP_DECREMENT)
            .max(MIN_TICK_INTERVAL);
        Some(self.interval)
    }
}

impl Default for DifficultyController {
    fn default() -> Self {
        Self::new(SpeedLevel::default())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::error::GameError;

    use super::{DifficultyController, SpeedLevel};

    #[test]
    fn levels_scale_base_interval() {
        assert_eq!(SpeedLevel::Slow.base_interval(), Duration::from_millis(225));
        assert_eq!(SpeedLevel::Normal.base_interval(), Duration::from_millis(150));
        assert_eq!(SpeedLevel::Fast.base_interval(), Duration::from_millis(90));
    }

    #[test]
    fn set_level_returns_multiplier() {
        let mut difficulty = DifficultyController::default();

        assert!((difficulty.set_level(SpeedLevel::Slow) - 1.5).abs() < f64::EPSILON);
        assert!((difficulty.set_level(SpeedLevel::Fast) - 0.6).abs() < f64::EPSILON);
        assert_eq!(difficulty.current_interval(), Duration::from_millis(90));
    }

    #[test]
    fn out_of_range_level_is_rejected() {
        assert!(matches!(
            SpeedLevel::try_from(0),
            Err(GameError::InvalidSpeedLevel(0))
        ));
        assert!(matches!(
            SpeedLevel::try_from(4),
            Err(GameError::InvalidSpeedLevel(4))
        ));
        assert_eq!(SpeedLevel::try_from(3).ok(), Some(SpeedLevel::Fast));
    }

    #[test]
    fn speed_up_only_on_milestones() {
        let mut difficulty = DifficultyController::default();

        assert_eq!(difficulty.on_score(0), None);
        assert_eq!(difficulty.on_score(40), None);
        assert_eq!(difficulty.on_score(50), Some(Duration::from_millis(140)));
        assert_eq!(difficulty.on_score(60), None);
        assert_eq!(difficulty.current_interval(), Duration::from_millis(140));
    }

    #[test]
    fn speed_up_stops_at_floor() {
        let mut difficulty = DifficultyController::default();

        for score in (10..=500).step_by(10) {
            let _ = difficulty.on_score(score);
        }

        assert_eq!(difficulty.current_interval(), Duration::from_millis(60));
        assert_eq!(difficulty.on_score(550), None);
    }

    #[test]
    fn slow_level_is_clamped_to_floor() {
        let mut difficulty = DifficultyController::new(SpeedLevel::Slow);

        for score in (50..=5000).step_by(50) {
            let _ = difficulty.on_score(score);
        }

        assert_eq!(difficulty.current_interval(), Duration::from_millis(60));
    }

    #[test]
    fn level_change_discards_speed_ups() {
        let mut difficulty = DifficultyController::default();
        let _ = difficulty.on_score(50);
        let _ = difficulty.on_score(100);

        difficulty.set_level(SpeedLevel::Normal);

        assert_eq!(difficulty.current_interval(), Duration::from_millis(150));
    }

    #[test]
    fn reset_restores_level_interval() {
        let mut difficulty = DifficultyController::new(SpeedLevel::Fast);
        let _ = difficulty.on_score(50);

        difficulty.reset();

        assert_eq!(difficulty.current_interval(), Duration::from_millis(90));
    }
}
