pub mod deembed_ui;
pub mod gating_ui;
pub mod legend_ui;
pub mod subnetwork_ui;
pub mod tree_ui;

pub use deembed_ui::DeembedDialog;
pub use gating_ui::GatingDialog;
pub use legend_ui::show_legend_settings;
pub use subnetwork_ui::SubnetworkDialog;
pub use tree_ui::TreePanel;
