use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::driver::HighScoreStore;

const APP_DIR_NAME: &str = "snake-arcade";
const SCORE_FILE_NAME: &str = "scores.json";

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ScoreRecord {
    high_score: u32,
}

/// Returns the platform-correct score file path.
#[must_use]
pub fn scores_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(SCORE_FILE_NAME);
    base
}

/// High score persisted as a small JSON document.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ScoreFile {
    path: PathBuf,
}

impl ScoreFile {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Score file in the per-user data directory.
    #[must_use]
    pub fn at_default_location() -> Self {
        Self::new(scores_path())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for ScoreFile {
    /// Returns `Ok(0)` when the score file does not yet exist (first run) and
    /// `Err` when it exists but cannot be read or parsed.
    fn load_high_score(&self) -> io::Result<u32> {
        load_high_score_from_path(&self.path)
    }

    /// Creates parent directories when needed.
    fn save_high_score(&mut self, score: u32) -> io::Result<()> {
        save_high_score_to_path(&self.path, score)
    }
}

/// Loads the stored high score, falling back to zero.
///
/// An unreadable file is written to `report` as a warning; call this before
/// the terminal enters raw mode so the player sees it.
pub fn load_high_score_or_report<W: Write>(store: &ScoreFile, report: &mut W) -> u32 {
    match store.load_high_score() {
        Ok(score) => score,
        Err(error) => {
            tracing::warn!(%error, path = %store.path().display(), "could not load high score");
            let _ = writeln!(
                report,
                "warning: ignoring high score file {}: {error}",
                store.path().display()
            );
            0
        }
    }
}

fn load_high_score_from_path(path: &Path) -> io::Result<u32> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    serde_json::from_str::<ScoreRecord>(&raw)
        .map(|record| record.high_score)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn save_high_score_to_path(path: &Path, score: u32) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let payload = ScoreRecord { high_score: score };
    let json = serde_json::to_string_pretty(&payload)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))?;

    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use crate::driver::HighScoreStore;

    use super::{load_high_score_or_report, ScoreFile};

    #[test]
    fn saved_score_is_loaded_back() {
        let path = unique_test_path("saved");
        let mut store = ScoreFile::new(path.clone());

        store.save_high_score(420).expect("score save should succeed");
        let loaded = store.load_high_score().expect("load should succeed");

        assert_eq!(loaded, 420);
        cleanup_test_path(&path);
    }

    #[test]
    fn missing_score_file_returns_zero() {
        let path = unique_test_path("missing");
        let store = ScoreFile::new(path);

        let loaded = store
            .load_high_score()
            .expect("missing file should return Ok(0)");
        assert_eq!(loaded, 0);
    }

    #[test]
    fn malformed_score_file_returns_error() {
        let path = unique_test_path("malformed");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(&path, "not-json").expect("test file write should succeed");

        assert!(
            ScoreFile::new(path.clone()).load_high_score().is_err(),
            "malformed file should return Err"
        );

        cleanup_test_path(&path);
    }

    #[test]
    fn malformed_score_file_is_reported_and_read_as_zero() {
        let path = unique_test_path("reported");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(&path, "{\"high_score\": ").expect("test file write should succeed");
        let mut report = Vec::new();

        let loaded = load_high_score_or_report(&ScoreFile::new(path.clone()), &mut report);

        assert_eq!(loaded, 0);
        let report = String::from_utf8(report).expect("report is utf-8");
        assert!(report.starts_with("warning: "), "unexpected report: {report}");
        assert!(report.contains(&path.display().to_string()));
        cleanup_test_path(&path);
    }

    #[test]
    fn readable_score_file_reports_nothing() {
        let path = unique_test_path("quiet");
        let mut store = ScoreFile::new(path.clone());
        store.save_high_score(70).expect("score save should succeed");
        let mut report = Vec::new();

        assert_eq!(load_high_score_or_report(&store, &mut report), 70);
        assert!(report.is_empty());
        cleanup_test_path(&path);
    }

    fn unique_test_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("snake-arcade-score-tests")
            .join(format!("{label}-{nanos}.json"))
    }

    fn cleanup_test_path(path: &PathBuf) {
        let _ = fs::remove_file(path);
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir(parent);
        }
    }
}
