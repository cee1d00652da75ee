//! RF network objects: Touchstone reading, S-parameter access, and the thin
//! time-domain layer.

pub mod dsp;
pub mod frequency;
pub mod network;
pub mod touchstone;

pub use dsp::{gate, step_response, time_response, DspError, GateSpec, GateWindow};
pub use frequency::{FreqUnit, Frequency};
pub use network::{Network, NetworkError};
pub use touchstone::{DataFormat, Touchstone, TouchstoneError};
