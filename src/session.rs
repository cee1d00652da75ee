//! Save/restore of a viewing session: which files were loaded plus the
//! display settings, as a JSON file the user picks.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::canvas::PlotMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub files: Vec<PathBuf>,
    pub mode: PlotMode,
    pub legend_columns: usize,
    pub show_grid: bool,
    pub line_width: f32,
}

impl SessionState {
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<SessionState> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let state = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_through_a_file() {
        let state = SessionState {
            files: vec![PathBuf::from("/tmp/a.s2p"), PathBuf::from("/tmp/b.s1p")],
            mode: PlotMode::Phase,
            legend_columns: 2,
            show_grid: false,
            line_width: 2.5,
        };
        let path = std::env::temp_dir().join("touchplot_session_test.json");
        state.save(&path).unwrap();
        let back = SessionState::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(back, state);
    }

    #[test]
    fn load_reports_the_path_on_failure() {
        let err = SessionState::load(Path::new("/nonexistent/session.json")).unwrap_err();
        assert!(format!("{err:#}").contains("session.json"));
    }
}
