//! Thin time-domain layer over rustfft: impulse/step responses and time
//! gating. The transform itself lives in rustfft; this module only shapes
//! data in and out of it.

use num_complex::Complex64;
use rustfft::FftPlanner;
use thiserror::Error;

use super::frequency::Frequency;

#[derive(Debug, Error)]
pub enum DspError {
    #[error("gating window '{0}' is not supported by the transform backend")]
    UnsupportedWindow(&'static str),
    #[error("time-domain transform needs a uniform sweep with at least 2 points")]
    DegenerateSweep,
}

/// Gating window shapes offered in the time-gating dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GateWindow {
    Kaiser,
    Hamming,
    Boxcar,
    Hann,
    BlackmanHarris,
}

impl GateWindow {
    pub const ALL: [GateWindow; 5] = [
        GateWindow::Kaiser,
        GateWindow::Hamming,
        GateWindow::Boxcar,
        GateWindow::Hann,
        GateWindow::BlackmanHarris,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GateWindow::Kaiser => "Kaiser",
            GateWindow::Hamming => "Hamming",
            GateWindow::Boxcar => "Boxcar",
            GateWindow::Hann => "Hann",
            GateWindow::BlackmanHarris => "BlackmanHarris",
        }
    }

    /// Window value at normalized position `u` in [0, 1], or an error for
    /// shapes the backend cannot produce.
    fn value(&self, u: f64) -> Result<f64, DspError> {
        let two_pi = std::f64::consts::TAU;
        match self {
            GateWindow::Boxcar => Ok(1.0),
            GateWindow::Hann => Ok(0.5 - 0.5 * (two_pi * u).cos()),
            GateWindow::Hamming => Ok(0.54 - 0.46 * (two_pi * u).cos()),
            GateWindow::Kaiser => Err(DspError::UnsupportedWindow(self.label())),
            GateWindow::BlackmanHarris => Err(DspError::UnsupportedWindow(self.label())),
        }
    }

    /// Check backend support without computing anything.
    pub fn ensure_supported(&self) -> Result<(), DspError> {
        self.value(0.5).map(|_| ())
    }
}

/// Time-gate parameters: window shape plus center/span in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateSpec {
    pub center: f64,
    pub span: f64,
    pub window: GateWindow,
}

/// Complex impulse response of one S-parameter column, as (time_s, value)
/// pairs. The time axis is `k / (N * df)`.
pub fn time_response(
    freq: &Frequency,
    s_col: &[Complex64],
) -> Result<Vec<(f64, Complex64)>, DspError> {
    let df = freq.step().ok_or(DspError::DegenerateSweep)?;
    if df <= 0.0 || s_col.len() < 2 {
        return Err(DspError::DegenerateSweep);
    }
    let n = s_col.len();
    let mut buf: Vec<Complex64> = s_col.to_vec();
    let mut planner = FftPlanner::new();
    let ifft = planner.plan_fft_inverse(n);
    ifft.process(&mut buf);
    let scale = 1.0 / n as f64;
    let dt = 1.0 / (n as f64 * df);
    Ok(buf
        .into_iter()
        .enumerate()
        .map(|(k, v)| (k as f64 * dt, v * scale))
        .collect())
}

/// Step response: running sum of the impulse response.
pub fn step_response(
    freq: &Frequency,
    s_col: &[Complex64],
) -> Result<Vec<(f64, Complex64)>, DspError> {
    let imp = time_response(freq, s_col)?;
    let mut acc = Complex64::new(0.0, 0.0);
    Ok(imp
        .into_iter()
        .map(|(t, v)| {
            acc += v;
            (t, acc)
        })
        .collect())
}

/// Time-gate one S-parameter column: transform to time, zero everything
/// outside [center - span/2, center + span/2] (shaped by `window` inside),
/// transform back.
pub fn gate(
    freq: &Frequency,
    s_col: &[Complex64],
    spec: &GateSpec,
) -> Result<Vec<Complex64>, DspError> {
    spec.window.ensure_supported()?;
    let td = time_response(freq, s_col)?;
    let n = td.len();
    let t0 = spec.center - spec.span * 0.5;
    let t1 = spec.center + spec.span * 0.5;
    let mut buf: Vec<Complex64> = td
        .into_iter()
        .map(|(t, v)| {
            if t < t0 || t > t1 || t1 <= t0 {
                Complex64::new(0.0, 0.0)
            } else {
                let u = (t - t0) / (t1 - t0);
                // ensure_supported() ran above; value() cannot fail here
                v * spec.window.value(u).unwrap_or(0.0)
            }
        })
        .collect();
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buf);
    Ok(buf)
}
