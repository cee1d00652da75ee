//! Touchplot crate root: re-exports and module wiring.
//!
//! An egui/eframe viewer for Touchstone S-parameter files:
//! - `network`: Touchstone parsing, N-port networks, time-domain tools
//! - `model`: the network/parameter tree and its change events
//! - `canvas` + `trace_map` + `pick`: plotted curves, the curve↔legend
//!   association and the pick/highlight machinery
//! - `export`: CSV, TikZ and PNG output
//! - `app` + `plot_ui` + `panels`: the eframe application

pub mod app;
pub mod canvas;
pub mod config;
pub mod events;
pub mod export;
pub mod model;
pub mod network;
pub mod panels;
pub mod pick;
pub mod plot_ui;
pub mod session;
pub mod trace_map;
pub mod value;

// Public re-exports for a compact external API
pub use app::ViewerApp;
pub use canvas::{PlotCanvas, PlotMode};
pub use config::ViewerConfig;
pub use events::{EventBus, EventFilter, EventKind, ViewerEvent};
pub use model::{ModelEvent, NetworkModel, NodeRef};
pub use network::{Network, Touchstone};
pub use pick::{MouseButton, PickEffect, PickPhase, PickState};
pub use session::SessionState;
pub use trace_map::{LegendMap, NetworkId, PickKey, TraceId};
