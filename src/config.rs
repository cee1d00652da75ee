//! Persisted viewer settings, stored as YAML in the user's home
//! directory. Load failures fall back to defaults; nothing here is fatal.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::canvas::{PlotMode, DEFAULT_LINE_WIDTH};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub line_width: f32,
    pub legend_columns: usize,
    pub show_grid: bool,
    pub mode: PlotMode,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
            legend_columns: 1,
            show_grid: true,
            mode: PlotMode::Db,
        }
    }
}

impl ViewerConfig {
    pub fn config_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".touchplot.yaml"))
    }

    /// Load the saved config, or defaults when missing or unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => match serde_yaml::from_str(&text) {
                Ok(cfg) => cfg,
                Err(e) => {
                    eprintln!("Ignoring malformed config {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) {
        let Some(path) = Self::config_path() else {
            return;
        };
        match serde_yaml::to_string(self) {
            Ok(text) => {
                if let Err(e) = std::fs::write(&path, text) {
                    eprintln!("Failed to save config {}: {e}", path.display());
                }
            }
            Err(e) => eprintln!("Failed to serialize config: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_through_yaml() {
        let cfg = ViewerConfig {
            line_width: 2.0,
            legend_columns: 3,
            show_grid: false,
            mode: PlotMode::Smith,
        };
        let text = serde_yaml::to_string(&cfg).unwrap();
        let back: ViewerConfig = serde_yaml::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: ViewerConfig = serde_yaml::from_str("legend_columns: 2\n").unwrap();
        assert_eq!(cfg.legend_columns, 2);
        assert_eq!(cfg.mode, PlotMode::Db);
        assert_eq!(cfg.line_width, DEFAULT_LINE_WIDTH);
    }
}
