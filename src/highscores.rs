//! Best-score persistence.
//!
//! A single JSON file in the data directory. Load failures fall back to a
//! fresh record so a corrupt file never blocks a run.

use std::{fs, path::PathBuf};

use color_eyre::eyre::Result;
use serde::{Deserialize, Serialize};

const FILE_NAME: &str = "highscores.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScores {
    pub best: u32,
}

impl HighScores {
    fn path() -> PathBuf {
        crate::utils::get_data_dir().join(FILE_NAME)
    }

    pub fn load() -> Self {
        match fs::read_to_string(Self::path()) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(scores) => scores,
                Err(e) => {
                    log::warn!("Unreadable high score file, starting fresh: {e}");
                    Self::default()
                },
            },
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Records a finished run. Returns true when it set a new best.
    pub fn submit(&mut self, score: u32) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_submit_tracks_best() {
        let mut scores = HighScores::default();
        assert!(scores.submit(3));
        assert!(!scores.submit(2));
        assert!(!scores.submit(3));
        assert!(scores.submit(4));
        assert_eq!(scores.best, 4);
    }

    #[test]
    fn test_round_trips_through_json() {
        let scores = HighScores { best: 42 };
        let json = serde_json::to_string(&scores).unwrap();
        let back: HighScores = serde_json::from_str(&json).unwrap();
        assert_eq!(back.best, 42);
    }
}
