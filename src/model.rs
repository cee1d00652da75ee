//! Tree model behind the network list: one node per loaded network, one
//! checkable child per S-parameter.
//!
//! Mutations queue [`ModelEvent`]s; the app drains them once per frame and
//! triggers a plot rebuild when anything changed. The model itself never
//! touches the canvas.

use std::collections::VecDeque;

use crate::network::Network;
use crate::trace_map::{NetworkId, TraceId};

/// A checkable S-parameter row under a network node.
#[derive(Debug, Clone)]
pub struct ParamNode {
    pub m: usize,
    pub n: usize,
    pub checked: bool,
}

impl ParamNode {
    /// Display label, one-based: (1, 0) → "S21".
    pub fn label(&self) -> String {
        format!("S{}{}", self.m + 1, self.n + 1)
    }
}

/// A loaded network and its parameter children.
#[derive(Debug, Clone)]
pub struct NetworkNode {
    pub id: NetworkId,
    pub network: Network,
    pub params: Vec<ParamNode>,
}

impl NetworkNode {
    /// All params start checked so a freshly loaded file plots everything.
    pub fn new(id: NetworkId, network: Network) -> Self {
        let params = network
            .port_tuples()
            .into_iter()
            .map(|(m, n)| ParamNode {
                m,
                n,
                checked: true,
            })
            .collect();
        Self {
            id,
            network,
            params,
        }
    }

    pub fn name(&self) -> &str {
        &self.network.name
    }

    /// Trace ids of the currently checked params, in row order.
    pub fn enabled_params(&self) -> Vec<TraceId> {
        self.params
            .iter()
            .filter(|p| p.checked)
            .map(|p| TraceId::new(self.id, p.m, p.n))
            .collect()
    }
}

/// Either node kind a tree operation can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef {
    Network(NetworkId),
    Param(TraceId),
}

/// Change notifications, drained once per frame by the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    NetworkAdded(NetworkId),
    NetworkRemoved(NetworkId),
    NetworkRenamed(NetworkId),
    ParamToggled(TraceId),
    ParamRemoved(TraceId),
    Reset,
}

#[derive(Debug, Default, Clone)]
pub struct NetworkModel {
    nodes: Vec<NetworkNode>,
    next_id: u64,
    pending: VecDeque<ModelEvent>,
}

impl NetworkModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[NetworkNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut Vec<NetworkNode> {
        &mut self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NetworkId) -> Option<&NetworkNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn node_mut(&mut self, id: NetworkId) -> Option<&mut NetworkNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn network(&self, id: NetworkId) -> Option<&Network> {
        self.node(id).map(|n| &n.network)
    }

    pub fn add_network(&mut self, network: Network) -> NetworkId {
        let id = NetworkId(self.next_id);
        self.next_id += 1;
        self.nodes.push(NetworkNode::new(id, network));
        self.pending.push_back(ModelEvent::NetworkAdded(id));
        id
    }

    /// Duplicate a network under a "_copy" name. The copy gets a fresh id
    /// and freshly checked params.
    pub fn copy_network(&mut self, id: NetworkId) -> Option<NetworkId> {
        let node = self.node(id)?;
        let mut network = node.network.clone();
        network.name = format!("{}_copy", network.name);
        Some(self.add_network(network))
    }

    pub fn remove(&mut self, target: NodeRef) {
        match target {
            NodeRef::Network(id) => {
                let before = self.nodes.len();
                self.nodes.retain(|n| n.id != id);
                if self.nodes.len() != before {
                    self.pending.push_back(ModelEvent::NetworkRemoved(id));
                }
            }
            NodeRef::Param(tid) => {
                if let Some(node) = self.node_mut(tid.network) {
                    let before = node.params.len();
                    node.params.retain(|p| !(p.m == tid.m && p.n == tid.n));
                    if node.params.len() != before {
                        self.pending.push_back(ModelEvent::ParamRemoved(tid));
                    }
                }
            }
        }
    }

    /// Rename a network; mirrored into the underlying [`Network`] so
    /// exports pick the new name up. Renaming to the same name is a no-op.
    pub fn rename_network(&mut self, id: NetworkId, name: &str) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        if node.network.name == name {
            return;
        }
        node.network.name = name.to_string();
        self.pending.push_back(ModelEvent::NetworkRenamed(id));
    }

    /// Set a param's checkbox. No event when the state did not change.
    pub fn set_checked(&mut self, tid: TraceId, checked: bool) {
        let Some(node) = self.node_mut(tid.network) else {
            return;
        };
        let Some(param) = node
            .params
            .iter_mut()
            .find(|p| p.m == tid.m && p.n == tid.n)
        else {
            return;
        };
        if param.checked == checked {
            return;
        }
        param.checked = checked;
        self.pending.push_back(ModelEvent::ParamToggled(tid));
    }

    /// Check or uncheck a whole network, or one param.
    pub fn set_enabled(&mut self, target: NodeRef, enabled: bool) {
        match target {
            NodeRef::Network(id) => {
                let tids: Vec<TraceId> = match self.node(id) {
                    Some(node) => node
                        .params
                        .iter()
                        .map(|p| TraceId::new(id, p.m, p.n))
                        .collect(),
                    None => return,
                };
                for tid in tids {
                    self.set_checked(tid, enabled);
                }
            }
            NodeRef::Param(tid) => self.set_checked(tid, enabled),
        }
    }

    pub fn is_checked(&self, tid: TraceId) -> bool {
        self.node(tid.network)
            .map(|node| {
                node.params
                    .iter()
                    .any(|p| p.m == tid.m && p.n == tid.n && p.checked)
            })
            .unwrap_or(false)
    }

    /// All checked params across all networks, in tree order.
    pub fn enabled_params(&self) -> Vec<TraceId> {
        self.nodes.iter().flat_map(|n| n.enabled_params()).collect()
    }

    /// Drop every network. Silent when the model is already empty.
    pub fn reset(&mut self) {
        if self.nodes.is_empty() {
            return;
        }
        self.nodes.clear();
        self.pending.push_back(ModelEvent::Reset);
    }

    /// Take the queued change events, leaving the queue empty.
    pub fn drain_events(&mut self) -> Vec<ModelEvent> {
        self.pending.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{FreqUnit, Frequency, Network};
    use ndarray::{Array1, Array3};
    use num_complex::Complex64;

    fn two_port(name: &str) -> Network {
        let freq = Frequency::from_hz(vec![1e9, 2e9, 3e9], FreqUnit::GHz);
        let s = Array3::from_elem((3, 2, 2), Complex64::new(0.0, 0.0));
        let z0 = Array1::from_elem(2, Complex64::new(50.0, 0.0));
        let mut nw = Network::new(freq, s, z0);
        nw.name = name.to_string();
        nw
    }

    #[test]
    fn add_creates_checked_params_in_row_major_order() {
        let mut model = NetworkModel::new();
        let id = model.add_network(two_port("dut"));
        let node = model.node(id).unwrap();
        let labels: Vec<String> = node.params.iter().map(|p| p.label()).collect();
        assert_eq!(labels, ["S11", "S12", "S21", "S22"]);
        assert!(node.params.iter().all(|p| p.checked));
        assert_eq!(model.drain_events(), vec![ModelEvent::NetworkAdded(id)]);
    }

    #[test]
    fn toggling_emits_once_per_change() {
        let mut model = NetworkModel::new();
        let id = model.add_network(two_port("dut"));
        model.drain_events();
        let tid = TraceId::new(id, 0, 0);
        model.set_checked(tid, false);
        model.set_checked(tid, false); // no-op
        assert_eq!(model.drain_events(), vec![ModelEvent::ParamToggled(tid)]);
        assert!(!model.is_checked(tid));
    }

    #[test]
    fn enabled_params_follow_tree_order() {
        let mut model = NetworkModel::new();
        let a = model.add_network(two_port("a"));
        let b = model.add_network(two_port("b"));
        model.set_checked(TraceId::new(a, 0, 1), false);
        let enabled = model.enabled_params();
        assert_eq!(enabled.len(), 7);
        assert_eq!(enabled[0], TraceId::new(a, 0, 0));
        assert_eq!(enabled[3], TraceId::new(b, 0, 0));
    }

    #[test]
    fn remove_network_and_param() {
        let mut model = NetworkModel::new();
        let id = model.add_network(two_port("dut"));
        model.drain_events();
        let tid = TraceId::new(id, 1, 1);
        model.remove(NodeRef::Param(tid));
        model.remove(NodeRef::Network(id));
        assert!(model.is_empty());
        assert_eq!(
            model.drain_events(),
            vec![ModelEvent::ParamRemoved(tid), ModelEvent::NetworkRemoved(id)]
        );
    }

    #[test]
    fn copy_appends_suffix_and_fresh_id() {
        let mut model = NetworkModel::new();
        let id = model.add_network(two_port("dut"));
        let copy = model.copy_network(id).unwrap();
        assert_ne!(id, copy);
        assert_eq!(model.node(copy).unwrap().name(), "dut_copy");
    }

    #[test]
    fn rename_mirrors_into_network_and_skips_noops() {
        let mut model = NetworkModel::new();
        let id = model.add_network(two_port("dut"));
        model.drain_events();
        model.rename_network(id, "dut"); // same name, silent
        assert!(model.drain_events().is_empty());
        model.rename_network(id, "fixture");
        assert_eq!(model.network(id).unwrap().name, "fixture");
        assert_eq!(model.drain_events(), vec![ModelEvent::NetworkRenamed(id)]);
    }

    #[test]
    fn reset_is_silent_when_empty() {
        let mut model = NetworkModel::new();
        model.reset();
        assert!(model.drain_events().is_empty());
        model.add_network(two_port("dut"));
        model.drain_events();
        model.reset();
        assert_eq!(model.drain_events(), vec![ModelEvent::Reset]);
    }
}
