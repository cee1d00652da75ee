//! Frequency axis of a network: points in Hz plus a display unit.

use serde::{Deserialize, Serialize};

/// Unit used when displaying or exporting frequency values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FreqUnit {
    Hz,
    KHz,
    MHz,
    GHz,
    THz,
}

impl FreqUnit {
    /// Multiplier from this unit to Hz.
    pub fn multiplier(&self) -> f64 {
        match self {
            FreqUnit::Hz => 1.0,
            FreqUnit::KHz => 1e3,
            FreqUnit::MHz => 1e6,
            FreqUnit::GHz => 1e9,
            FreqUnit::THz => 1e12,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FreqUnit::Hz => "Hz",
            FreqUnit::KHz => "kHz",
            FreqUnit::MHz => "MHz",
            FreqUnit::GHz => "GHz",
            FreqUnit::THz => "THz",
        }
    }

    /// Parse the unit token of a Touchstone option line (case-insensitive).
    pub fn parse(token: &str) -> Option<FreqUnit> {
        match token.to_ascii_lowercase().as_str() {
            "hz" => Some(FreqUnit::Hz),
            "khz" => Some(FreqUnit::KHz),
            "mhz" => Some(FreqUnit::MHz),
            "ghz" => Some(FreqUnit::GHz),
            "thz" => Some(FreqUnit::THz),
            _ => None,
        }
    }
}

/// Frequency vector of a network. Values are always stored in Hz; `unit`
/// only affects display and export.
#[derive(Debug, Clone, PartialEq)]
pub struct Frequency {
    f: Vec<f64>,
    pub unit: FreqUnit,
}

impl Frequency {
    pub fn from_hz(f: Vec<f64>, unit: FreqUnit) -> Self {
        Self { f, unit }
    }

    /// Frequency points in Hz.
    pub fn f(&self) -> &[f64] {
        &self.f
    }

    pub fn npoints(&self) -> usize {
        self.f.len()
    }

    /// Frequency points scaled to the display unit.
    pub fn scaled(&self) -> Vec<f64> {
        let m = self.unit.multiplier();
        self.f.iter().map(|v| v / m).collect()
    }

    /// Frequency step in Hz, assuming a uniform sweep. Returns `None` for
    /// fewer than two points.
    pub fn step(&self) -> Option<f64> {
        if self.f.len() < 2 {
            return None;
        }
        Some((self.f[self.f.len() - 1] - self.f[0]) / (self.f.len() - 1) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn scaled_uses_display_unit() {
        let f = Frequency::from_hz(vec![1e9, 2e9], FreqUnit::GHz);
        let s = f.scaled();
        assert_relative_eq!(s[0], 1.0);
        assert_relative_eq!(s[1], 2.0);
    }

    #[test]
    fn step_of_uniform_sweep() {
        let f = Frequency::from_hz(vec![1e9, 1.5e9, 2e9], FreqUnit::GHz);
        assert_relative_eq!(f.step().unwrap(), 0.5e9);
        let single = Frequency::from_hz(vec![1e9], FreqUnit::GHz);
        assert!(single.step().is_none());
    }
}
