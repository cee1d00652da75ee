//! N-port network representation backed by S-parameter data.

use ndarray::{Array1, Array3};
use num_complex::Complex64;
use thiserror::Error;

use super::frequency::Frequency;
use super::touchstone::{Touchstone, TouchstoneError};

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("operation requires a 2-port network, got {0} ports")]
    NotTwoPort(usize),
    #[error("frequency axes do not match ({0} vs {1} points)")]
    FrequencyMismatch(usize, usize),
    #[error("invalid port selection: {0:?}")]
    BadPortSelection(Vec<usize>),
}

/// An N-port electrical network.
#[derive(Debug, Clone)]
pub struct Network {
    pub frequency: Frequency,
    /// S-parameter data, `[nfreq, nports, nports]`.
    pub s: Array3<Complex64>,
    /// Reference impedance per port.
    pub z0: Array1<Complex64>,
    pub name: String,
}

impl Network {
    pub fn new(frequency: Frequency, s: Array3<Complex64>, z0: Array1<Complex64>) -> Self {
        Self {
            frequency,
            s,
            z0,
            name: String::new(),
        }
    }

    /// Load a network from a Touchstone v1 file. The network name is the
    /// file stem.
    pub fn from_touchstone<P: AsRef<std::path::Path>>(path: P) -> Result<Self, TouchstoneError> {
        let path = path.as_ref();
        let ts = Touchstone::from_file(path)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let z0 = Array1::from_elem(ts.nports, Complex64::new(ts.z0, 0.0));
        let mut nw = Network::new(ts.frequency, ts.s, z0);
        nw.name = name;
        Ok(nw)
    }

    pub fn nports(&self) -> usize {
        self.s.shape()[1]
    }

    pub fn nfreq(&self) -> usize {
        self.s.shape()[0]
    }

    /// All (m, n) port pairs in row-major order: (0,0), (0,1), (1,0), ...
    pub fn port_tuples(&self) -> Vec<(usize, usize)> {
        let n = self.nports();
        let mut out = Vec::with_capacity(n * n);
        for m in 0..n {
            for j in 0..n {
                out.push((m, j));
            }
        }
        out
    }

    /// Complex S(m,n) over frequency.
    pub fn s_complex(&self, m: usize, n: usize) -> Vec<Complex64> {
        (0..self.nfreq()).map(|f| self.s[[f, m, n]]).collect()
    }

    /// |S(m,n)| in dB over frequency.
    pub fn s_db(&self, m: usize, n: usize) -> Vec<f64> {
        (0..self.nfreq())
            .map(|f| 20.0 * self.s[[f, m, n]].norm().log10())
            .collect()
    }

    /// Network restricted to a subset of ports (0-based, order preserved).
    pub fn subnetwork(&self, ports: &[usize]) -> Result<Network, NetworkError> {
        if ports.is_empty() || ports.iter().any(|&p| p >= self.nports()) {
            return Err(NetworkError::BadPortSelection(ports.to_vec()));
        }
        let nfreq = self.nfreq();
        let k = ports.len();
        let mut s = Array3::<Complex64>::zeros((nfreq, k, k));
        for f in 0..nfreq {
            for (i, &pi) in ports.iter().enumerate() {
                for (j, &pj) in ports.iter().enumerate() {
                    s[[f, i, j]] = self.s[[f, pi, pj]];
                }
            }
        }
        let z0 = Array1::from_vec(ports.iter().map(|&p| self.z0[p]).collect());
        let mut nw = Network::new(self.frequency.clone(), s, z0);
        nw.name = format!(
            "{} sub{:?}",
            self.name,
            ports.iter().map(|p| p + 1).collect::<Vec<_>>()
        );
        Ok(nw)
    }

    /// Copy with all reflection coefficients (the S diagonal) forced to zero.
    pub fn with_zero_reflection(&self) -> Network {
        let mut nw = self.clone();
        let n = nw.nports();
        for f in 0..nw.nfreq() {
            for p in 0..n {
                nw.s[[f, p, p]] = Complex64::new(0.0, 0.0);
            }
        }
        nw.name = format!("{} (zero refl)", self.name);
        nw
    }

    /// Cascade with another 2-port network (`self ** other`), via the
    /// signal-flow-graph formula.
    pub fn cascade(&self, other: &Network) -> Result<Network, NetworkError> {
        if self.nports() != 2 {
            return Err(NetworkError::NotTwoPort(self.nports()));
        }
        if other.nports() != 2 {
            return Err(NetworkError::NotTwoPort(other.nports()));
        }
        if self.nfreq() != other.nfreq() {
            return Err(NetworkError::FrequencyMismatch(self.nfreq(), other.nfreq()));
        }
        let nfreq = self.nfreq();
        let mut s = Array3::<Complex64>::zeros((nfreq, 2, 2));
        for f in 0..nfreq {
            let a = [
                [self.s[[f, 0, 0]], self.s[[f, 0, 1]]],
                [self.s[[f, 1, 0]], self.s[[f, 1, 1]]],
            ];
            let b = [
                [other.s[[f, 0, 0]], other.s[[f, 0, 1]]],
                [other.s[[f, 1, 0]], other.s[[f, 1, 1]]],
            ];
            let denom = Complex64::new(1.0, 0.0) - a[1][1] * b[0][0];
            s[[f, 0, 0]] = a[0][0] + (a[0][1] * a[1][0] * b[0][0]) / denom;
            s[[f, 0, 1]] = (a[0][1] * b[0][1]) / denom;
            s[[f, 1, 0]] = (a[1][0] * b[1][0]) / denom;
            s[[f, 1, 1]] = b[1][1] + (b[0][1] * b[1][0] * a[1][1]) / denom;
        }
        let mut nw = Network::new(self.frequency.clone(), s, self.z0.clone());
        nw.name = format!("{} ** {}", self.name, other.name);
        Ok(nw)
    }

    /// Remove the effect of `error_ntwk` from the input side of `self`:
    /// `inv(error) ** self`, computed through T-parameters. Both networks
    /// must be 2-ports on the same frequency axis.
    pub fn deembed(&self, error_ntwk: &Network) -> Result<Network, NetworkError> {
        if self.nports() != 2 {
            return Err(NetworkError::NotTwoPort(self.nports()));
        }
        if error_ntwk.nports() != 2 {
            return Err(NetworkError::NotTwoPort(error_ntwk.nports()));
        }
        if self.nfreq() != error_ntwk.nfreq() {
            return Err(NetworkError::FrequencyMismatch(
                self.nfreq(),
                error_ntwk.nfreq(),
            ));
        }
        let nfreq = self.nfreq();
        let mut s = Array3::<Complex64>::zeros((nfreq, 2, 2));
        for f in 0..nfreq {
            let te = s_to_t(
                error_ntwk.s[[f, 0, 0]],
                error_ntwk.s[[f, 0, 1]],
                error_ntwk.s[[f, 1, 0]],
                error_ntwk.s[[f, 1, 1]],
            );
            let td = s_to_t(
                self.s[[f, 0, 0]],
                self.s[[f, 0, 1]],
                self.s[[f, 1, 0]],
                self.s[[f, 1, 1]],
            );
            let tei = invert_2x2(te);
            let t = mat_mul_2x2(tei, td);
            let sr = t_to_s(t);
            s[[f, 0, 0]] = sr[0][0];
            s[[f, 0, 1]] = sr[0][1];
            s[[f, 1, 0]] = sr[1][0];
            s[[f, 1, 1]] = sr[1][1];
        }
        let mut nw = Network::new(self.frequency.clone(), s, self.z0.clone());
        nw.name = format!("{} deembedded", self.name);
        Ok(nw)
    }
}

type Mat2 = [[Complex64; 2]; 2];

fn s_to_t(s11: Complex64, s12: Complex64, s21: Complex64, s22: Complex64) -> Mat2 {
    [
        [(s12 * s21 - s11 * s22) / s21, s11 / s21],
        [-s22 / s21, Complex64::new(1.0, 0.0) / s21],
    ]
}

fn t_to_s(t: Mat2) -> Mat2 {
    [
        [t[0][1] / t[1][1], t[0][0] - t[0][1] * t[1][0] / t[1][1]],
        [Complex64::new(1.0, 0.0) / t[1][1], -t[1][0] / t[1][1]],
    ]
}

fn invert_2x2(m: Mat2) -> Mat2 {
    let det = m[0][0] * m[1][1] - m[0][1] * m[1][0];
    [
        [m[1][1] / det, -m[0][1] / det],
        [-m[1][0] / det, m[0][0] / det],
    ]
}

fn mat_mul_2x2(a: Mat2, b: Mat2) -> Mat2 {
    [
        [
            a[0][0] * b[0][0] + a[0][1] * b[1][0],
            a[0][0] * b[0][1] + a[0][1] * b[1][1],
        ],
        [
            a[1][0] * b[0][0] + a[1][1] * b[1][0],
            a[1][0] * b[0][1] + a[1][1] * b[1][1],
        ],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::frequency::FreqUnit;
    use approx::assert_relative_eq;

    fn thru(nfreq: usize) -> Network {
        let f = Frequency::from_hz(
            (0..nfreq).map(|i| 1e9 * (i + 1) as f64).collect(),
            FreqUnit::GHz,
        );
        let mut s = Array3::<Complex64>::zeros((nfreq, 2, 2));
        for fi in 0..nfreq {
            s[[fi, 0, 1]] = Complex64::new(1.0, 0.0);
            s[[fi, 1, 0]] = Complex64::new(1.0, 0.0);
        }
        Network::new(f, s, Array1::from_elem(2, Complex64::new(50.0, 0.0)))
    }

    fn attenuator(nfreq: usize, lin: f64) -> Network {
        let mut nw = thru(nfreq);
        for fi in 0..nfreq {
            nw.s[[fi, 0, 1]] = Complex64::new(lin, 0.0);
            nw.s[[fi, 1, 0]] = Complex64::new(lin, 0.0);
        }
        nw
    }

    #[test]
    fn port_tuples_of_two_port() {
        let nw = thru(3);
        assert_eq!(nw.port_tuples(), vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn s_db_of_half_magnitude() {
        let nw = attenuator(1, 0.5);
        assert_relative_eq!(nw.s_db(1, 0)[0], -6.020599913279624, epsilon = 1e-12);
    }

    #[test]
    fn cascade_of_attenuators_multiplies() {
        let a = attenuator(2, 0.5);
        let b = attenuator(2, 0.5);
        let c = a.cascade(&b).unwrap();
        assert_relative_eq!(c.s[[0, 1, 0]].re, 0.25, epsilon = 1e-12);
        assert_relative_eq!(c.s[[0, 0, 0]].norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn deembed_undoes_cascade() {
        let err = attenuator(2, 0.7);
        let dut = attenuator(2, 0.4);
        let measured = err.cascade(&dut).unwrap();
        let recovered = measured.deembed(&err).unwrap();
        assert_relative_eq!(recovered.s[[0, 1, 0]].re, 0.4, epsilon = 1e-9);
        assert_relative_eq!(recovered.s[[1, 0, 1]].re, 0.4, epsilon = 1e-9);
    }

    #[test]
    fn deembed_rejects_one_port() {
        let f = Frequency::from_hz(vec![1e9], FreqUnit::GHz);
        let s = Array3::<Complex64>::zeros((1, 1, 1));
        let one = Network::new(f, s, Array1::from_elem(1, Complex64::new(50.0, 0.0)));
        let two = thru(1);
        assert!(matches!(one.deembed(&two), Err(NetworkError::NotTwoPort(1))));
    }

    #[test]
    fn zero_reflection_clears_diagonal_only() {
        let mut nw = thru(1);
        nw.s[[0, 0, 0]] = Complex64::new(0.3, 0.1);
        let z = nw.with_zero_reflection();
        assert_relative_eq!(z.s[[0, 0, 0]].norm(), 0.0);
        assert_relative_eq!(z.s[[0, 1, 0]].re, 1.0);
    }

    #[test]
    fn subnetwork_selects_ports() {
        let mut nw = thru(1);
        nw.s[[0, 1, 1]] = Complex64::new(0.2, 0.0);
        let sub = nw.subnetwork(&[1]).unwrap();
        assert_eq!(sub.nports(), 1);
        assert_relative_eq!(sub.s[[0, 0, 0]].re, 0.2);
        assert!(nw.subnetwork(&[5]).is_err());
    }
}
