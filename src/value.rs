//! Numeric + unit text parsing (time and frequency values) and the
//! validating input field used by the gating dialog.
//!
//! "3.5 ns" parses to 3.5e-9 s, "2GHz" to 2e9 Hz. Validation is a
//! tri-state mirroring the classic validator colors: red (invalid),
//! yellow (intermediate, keep typing), green (acceptable).

use egui::Color32;
use once_cell::sync::Lazy;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseValueError {
    #[error("empty input")]
    Empty,
    #[error("not a number: {0}")]
    BadNumber(String),
    #[error("unknown unit: {0}")]
    UnknownUnit(String),
}

/// What kind of quantity a field accepts; selects the unit table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Base unit: seconds.
    Time,
    /// Base unit: Hz.
    Frequency,
}

static TIME_UNITS: Lazy<Vec<(&'static str, f64)>> = Lazy::new(|| {
    vec![
        ("ps", 1e-12),
        ("ns", 1e-9),
        ("us", 1e-6),
        ("ms", 1e-3),
        ("s", 1.0),
    ]
});

static FREQ_UNITS: Lazy<Vec<(&'static str, f64)>> = Lazy::new(|| {
    vec![
        ("khz", 1e3),
        ("mhz", 1e6),
        ("ghz", 1e9),
        ("thz", 1e12),
        ("hz", 1.0),
    ]
});

impl ValueKind {
    fn units(&self) -> &'static [(&'static str, f64)] {
        match self {
            ValueKind::Time => &TIME_UNITS,
            ValueKind::Frequency => &FREQ_UNITS,
        }
    }

    /// Default unit multiplier applied when no suffix is given.
    fn bare_multiplier(&self) -> f64 {
        1.0
    }
}

/// Parse `text` into base units (seconds or Hz). The unit suffix is
/// optional and case-insensitive; whitespace between number and unit is
/// allowed.
pub fn parse_value(kind: ValueKind, text: &str) -> Result<f64, ParseValueError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseValueError::Empty);
    }
    let lower = trimmed.to_ascii_lowercase();
    // longest suffix match first so "ms" wins over "s", "ghz" over "hz"
    let mut best: Option<(&str, f64)> = None;
    for &(suffix, mult) in kind.units() {
        if lower.ends_with(suffix) {
            match best {
                Some((b, _)) if b.len() >= suffix.len() => {}
                _ => best = Some((suffix, mult)),
            }
        }
    }
    let (num_part, mult) = match best {
        Some((suffix, mult)) => (&lower[..lower.len() - suffix.len()], mult),
        None => (lower.as_str(), kind.bare_multiplier()),
    };
    let num_part = num_part.trim();
    if num_part.is_empty() {
        return Err(ParseValueError::BadNumber(trimmed.to_string()));
    }
    // reject a trailing alpha residue like "2xhz"
    if num_part
        .chars()
        .any(|c| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e')))
    {
        return Err(ParseValueError::UnknownUnit(trimmed.to_string()));
    }
    let v: f64 = num_part
        .parse()
        .map_err(|_| ParseValueError::BadNumber(trimmed.to_string()))?;
    Ok(v * mult)
}

/// Tri-state validation result of a field's current text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    Invalid,
    Intermediate,
    Acceptable,
}

impl Validation {
    /// Background tint for the field.
    pub fn color(&self) -> Color32 {
        match self {
            Validation::Invalid => Color32::from_rgb(90, 40, 40),
            Validation::Intermediate => Color32::from_rgb(90, 85, 35),
            Validation::Acceptable => Color32::from_rgb(40, 80, 40),
        }
    }
}

/// Validate without committing: partial numeric input is Intermediate so
/// the user can keep typing.
pub fn validate(kind: ValueKind, text: &str) -> Validation {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Validation::Intermediate;
    }
    match parse_value(kind, trimmed) {
        Ok(_) => Validation::Acceptable,
        Err(_) => {
            // a bare sign, or digits followed by the start of a unit,
            // may still become valid
            let lower = trimmed.to_ascii_lowercase();
            if lower == "-" || lower == "+" || lower == "." {
                return Validation::Intermediate;
            }
            let is_unit_prefix = kind
                .units()
                .iter()
                .any(|(suffix, _)| (1..suffix.len()).any(|k| lower.ends_with(&suffix[..k])));
            if is_unit_prefix
                && parse_value(kind, lower.trim_end_matches(|c: char| c.is_alphabetic())).is_ok()
            {
                Validation::Intermediate
            } else {
                Validation::Invalid
            }
        }
    }
}

/// Text field that colors itself by validation state and exposes a typed
/// value. Invalid input degrades to the fallback value instead of
/// propagating an error.
pub struct ValidatingField {
    pub kind: ValueKind,
    pub text: String,
    fallback: f64,
}

impl ValidatingField {
    pub fn new(kind: ValueKind, initial_text: &str, fallback: f64) -> Self {
        Self {
            kind,
            text: initial_text.to_string(),
            fallback,
        }
    }

    pub fn validation(&self) -> Validation {
        validate(self.kind, &self.text)
    }

    /// Current typed value in base units, or the fallback when the text is
    /// not (yet) valid.
    pub fn value(&self) -> f64 {
        parse_value(self.kind, &self.text).unwrap_or(self.fallback)
    }

    /// Strict variant for dialog commit paths.
    pub fn try_value(&self) -> Result<f64, ParseValueError> {
        parse_value(self.kind, &self.text)
    }

    /// Render as a single-line edit with a validation-tinted background.
    pub fn show(&mut self, ui: &mut egui::Ui) -> egui::Response {
        let tint = self.validation().color();
        let edit = egui::TextEdit::singleline(&mut self.text).background_color(tint);
        ui.add(edit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parses_time_units() {
        assert_relative_eq!(parse_value(ValueKind::Time, "3.5 ns").unwrap(), 3.5e-9);
        assert_relative_eq!(parse_value(ValueKind::Time, "2ps").unwrap(), 2e-12);
        assert_relative_eq!(parse_value(ValueKind::Time, "1.5").unwrap(), 1.5);
        assert_relative_eq!(parse_value(ValueKind::Time, "10 ms").unwrap(), 0.01);
    }

    #[test]
    fn parses_frequency_units() {
        assert_relative_eq!(parse_value(ValueKind::Frequency, "2GHz").unwrap(), 2e9);
        assert_relative_eq!(parse_value(ValueKind::Frequency, "500 MHz").unwrap(), 5e8);
        assert_relative_eq!(parse_value(ValueKind::Frequency, "10khz").unwrap(), 1e4);
    }

    #[test]
    fn ms_wins_over_s() {
        assert_relative_eq!(parse_value(ValueKind::Time, "5ms").unwrap(), 5e-3);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_value(ValueKind::Time, "").is_err());
        assert!(parse_value(ValueKind::Time, "abc").is_err());
        assert!(parse_value(ValueKind::Frequency, "2xhz").is_err());
    }

    #[test]
    fn validation_tristate() {
        assert_eq!(validate(ValueKind::Time, "3.5ns"), Validation::Acceptable);
        assert_eq!(validate(ValueKind::Time, ""), Validation::Intermediate);
        assert_eq!(validate(ValueKind::Time, "-"), Validation::Intermediate);
        assert_eq!(validate(ValueKind::Time, "3.5n"), Validation::Intermediate);
        assert_eq!(validate(ValueKind::Time, "zz"), Validation::Invalid);
    }

    #[test]
    fn field_degrades_to_fallback() {
        let f = ValidatingField::new(ValueKind::Time, "bogus", 1.0);
        assert_relative_eq!(f.value(), 1.0);
        assert!(f.try_value().is_err());
    }
}
