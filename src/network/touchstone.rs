//! Touchstone v1 reader (.s1p .. .s4p).
//!
//! Supports the RI/MA/DB data formats and the `# <unit> S <fmt> R <z0>`
//! option line. The port count is taken from the file extension, matching
//! how every v1 consumer determines it.

use std::path::Path;

use ndarray::Array3;
use num_complex::Complex64;
use thiserror::Error;

use super::frequency::{FreqUnit, Frequency};

#[derive(Debug, Error)]
pub enum TouchstoneError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("unrecognized file extension (expected .s1p..s4p): {0}")]
    BadExtension(String),
    #[error("unknown frequency unit in option line: {0}")]
    UnknownUnit(String),
    #[error("unsupported parameter type '{0}' (only S-parameters are supported)")]
    UnsupportedParamType(String),
    #[error("unknown data format in option line: {0}")]
    UnknownFormat(String),
    #[error("malformed number on line {line}: {token}")]
    BadNumber { line: usize, token: String },
    #[error("line {line}: expected {expected} values, got {got}")]
    WrongColumnCount {
        line: usize,
        expected: usize,
        got: usize,
    },
    #[error("file contains no data rows")]
    NoData,
}

/// How each complex value pair is encoded in the data lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    /// real, imaginary
    Ri,
    /// magnitude, angle in degrees
    Ma,
    /// 20*log10(magnitude), angle in degrees
    Db,
}

impl DataFormat {
    fn decode(&self, a: f64, b: f64) -> Complex64 {
        match self {
            DataFormat::Ri => Complex64::new(a, b),
            DataFormat::Ma => Complex64::from_polar(a, b.to_radians()),
            DataFormat::Db => Complex64::from_polar(10f64.powf(a / 20.0), b.to_radians()),
        }
    }
}

/// Raw contents of a parsed Touchstone file.
#[derive(Debug, Clone)]
pub struct Touchstone {
    pub nports: usize,
    pub frequency: Frequency,
    /// S data, `[nfreq, nports, nports]`.
    pub s: Array3<Complex64>,
    pub z0: f64,
    pub comments: Vec<String>,
}

impl Touchstone {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Touchstone, TouchstoneError> {
        let path = path.as_ref();
        let nports = ports_from_extension(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| TouchstoneError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Touchstone::parse(&content, nports)
    }

    /// Parse Touchstone v1 content with a known port count.
    pub fn parse(content: &str, nports: usize) -> Result<Touchstone, TouchstoneError> {
        // Option-line defaults per the v1 spec.
        let mut unit = FreqUnit::GHz;
        let mut format = DataFormat::Ma;
        let mut z0 = 50.0;
        let mut comments = Vec::new();

        // One logical data row holds nports^2 complex pairs plus the
        // frequency; rows wrap over multiple lines for 3+ ports.
        let values_per_row = 1 + 2 * nports * nports;
        let mut pending: Vec<f64> = Vec::with_capacity(values_per_row);
        let mut rows: Vec<Vec<f64>> = Vec::new();
        let mut saw_short_row = false;

        for (lineno, raw) in content.lines().enumerate() {
            let lineno = lineno + 1;
            let line = match raw.find('!') {
                Some(idx) => {
                    if idx == 0 {
                        comments.push(raw[1..].trim().to_string());
                    }
                    &raw[..idx]
                }
                None => raw,
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(rest) = line.strip_prefix('#') {
                (unit, format, z0) = parse_option_line(rest)?;
                continue;
            }
            // Noise parameter block of 2-port files: data rows carry 9
            // columns, noise rows 5. Stop reading at the first noise row.
            if saw_short_row {
                continue;
            }
            let mut line_vals = Vec::new();
            for tok in line.split_whitespace() {
                let v: f64 = tok.parse().map_err(|_| TouchstoneError::BadNumber {
                    line: lineno,
                    token: tok.to_string(),
                })?;
                line_vals.push(v);
            }
            if nports == 2 && !rows.is_empty() && pending.is_empty() && line_vals.len() == 5 {
                saw_short_row = true;
                continue;
            }
            pending.extend_from_slice(&line_vals);
            if pending.len() >= values_per_row {
                if pending.len() > values_per_row {
                    return Err(TouchstoneError::WrongColumnCount {
                        line: lineno,
                        expected: values_per_row,
                        got: pending.len(),
                    });
                }
                rows.push(std::mem::take(&mut pending));
            }
        }
        if !pending.is_empty() {
            return Err(TouchstoneError::WrongColumnCount {
                line: content.lines().count(),
                expected: values_per_row,
                got: pending.len(),
            });
        }
        if rows.is_empty() {
            return Err(TouchstoneError::NoData);
        }

        let nfreq = rows.len();
        let mut f = Vec::with_capacity(nfreq);
        let mut s = Array3::<Complex64>::zeros((nfreq, nports, nports));
        for (fi, row) in rows.iter().enumerate() {
            f.push(row[0] * unit.multiplier());
            for k in 0..nports * nports {
                let a = row[1 + 2 * k];
                let b = row[2 + 2 * k];
                // v1 quirk: 2-port data is ordered S11 S21 S12 S22
                // (column-major); every other size is row-major.
                let (i, j) = if nports == 2 {
                    (k % 2, k / 2)
                } else {
                    (k / nports, k % nports)
                };
                s[[fi, i, j]] = format.decode(a, b);
            }
        }

        Ok(Touchstone {
            nports,
            frequency: Frequency::from_hz(f, unit),
            s,
            z0,
            comments,
        })
    }

    pub fn nfreq(&self) -> usize {
        self.frequency.npoints()
    }
}

fn parse_option_line(rest: &str) -> Result<(FreqUnit, DataFormat, f64), TouchstoneError> {
    let mut unit = FreqUnit::GHz;
    let mut format = DataFormat::Ma;
    let mut z0 = 50.0;
    let mut tokens = rest.split_whitespace().peekable();
    while let Some(tok) = tokens.next() {
        let upper = tok.to_ascii_uppercase();
        match upper.as_str() {
            "S" => {}
            "Y" | "Z" | "H" | "G" => return Err(TouchstoneError::UnsupportedParamType(upper)),
            "RI" => format = DataFormat::Ri,
            "MA" => format = DataFormat::Ma,
            "DB" => format = DataFormat::Db,
            "R" => {
                if let Some(v) = tokens.next() {
                    z0 = v.parse().map_err(|_| TouchstoneError::BadNumber {
                        line: 0,
                        token: v.to_string(),
                    })?;
                }
            }
            _ => {
                unit = FreqUnit::parse(tok)
                    .ok_or_else(|| TouchstoneError::UnknownUnit(tok.to_string()))?;
            }
        }
    }
    Ok((unit, format, z0))
}

fn ports_from_extension(path: &Path) -> Result<usize, TouchstoneError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "s1p" => Ok(1),
        "s2p" => Ok(2),
        "s3p" => Ok(3),
        "s4p" => Ok(4),
        _ => Err(TouchstoneError::BadExtension(path.display().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ONE_PORT_RI: &str = "\
! simple load
# MHz S RI R 50
100 0.5 0.0
200 0.0 -0.5
";

    #[test]
    fn parses_one_port_ri() {
        let ts = Touchstone::parse(ONE_PORT_RI, 1).unwrap();
        assert_eq!(ts.nfreq(), 2);
        assert_relative_eq!(ts.frequency.f()[0], 100e6);
        assert_relative_eq!(ts.s[[0, 0, 0]].re, 0.5);
        assert_relative_eq!(ts.s[[1, 0, 0]].im, -0.5);
        assert_eq!(ts.comments, vec!["simple load".to_string()]);
    }

    #[test]
    fn two_port_column_order() {
        // S11 S21 S12 S22
        let content = "# GHz S RI R 50\n1.0 0.1 0 0.21 0 0.12 0 0.22 0\n";
        let ts = Touchstone::parse(content, 2).unwrap();
        assert_relative_eq!(ts.s[[0, 0, 0]].re, 0.1);
        assert_relative_eq!(ts.s[[0, 1, 0]].re, 0.21);
        assert_relative_eq!(ts.s[[0, 0, 1]].re, 0.12);
        assert_relative_eq!(ts.s[[0, 1, 1]].re, 0.22);
    }

    #[test]
    fn ma_and_db_agree_on_magnitude() {
        let ma = Touchstone::parse("# GHz S MA R 50\n1.0 0.5 90\n", 1).unwrap();
        let db = Touchstone::parse("# GHz S DB R 50\n1.0 -6.020599913279624 90\n", 1).unwrap();
        assert_relative_eq!(
            ma.s[[0, 0, 0]].norm(),
            db.s[[0, 0, 0]].norm(),
            epsilon = 1e-12
        );
        assert_relative_eq!(ma.s[[0, 0, 0]].arg(), std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn skips_two_port_noise_rows() {
        let content = "\
# GHz S RI R 50
1.0 0.1 0 0.2 0 0.2 0 0.1 0
2.0 0.1 0 0.2 0 0.2 0 0.1 0
1.0 3.0 0.5 45 0.6
2.0 3.5 0.4 60 0.7
";
        let ts = Touchstone::parse(content, 2).unwrap();
        assert_eq!(ts.nfreq(), 2);
    }

    #[test]
    fn rejects_non_s_parameters() {
        let err = Touchstone::parse("# GHz Z MA R 50\n1.0 0.5 0\n", 1).unwrap_err();
        assert!(matches!(err, TouchstoneError::UnsupportedParamType(_)));
    }

    #[test]
    fn rejects_garbage_numbers() {
        let err = Touchstone::parse("# GHz S RI R 50\n1.0 abc 0\n", 1).unwrap_err();
        assert!(matches!(err, TouchstoneError::BadNumber { .. }));
    }

    #[test]
    fn empty_file_is_no_data() {
        let err = Touchstone::parse("# GHz S RI R 50\n", 1).unwrap_err();
        assert!(matches!(err, TouchstoneError::NoData));
    }
}
