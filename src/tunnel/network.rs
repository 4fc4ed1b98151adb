use super::ActionSet;
use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;

/// The view of a tunneling network the path finders rely on.
///
/// Nodes are identified by indexes from `0` to `n_nodes() - 1`.
pub trait Network {
    /// Returns the number of nodes.
    fn n_nodes(&self) -> usize;

    /// Returns `true` iff there is an edge from `from` to `to`.
    fn has_edge(&self, from: usize, to: usize) -> bool;

    /// Returns the actions a node may perform when a packet leaves it.
    fn actions(&self, node: usize) -> ActionSet;

    /// Returns the node paths must start from.
    fn initial_node(&self) -> usize;

    /// Returns the node paths must end at.
    fn final_node(&self) -> usize;

    /// Returns the name of a node.
    fn node_name(&self, node: usize) -> &str;

    /// Returns the successors of a node, by increasing index.
    fn successors(&self, node: usize) -> Vec<usize> {
        (0..self.n_nodes())
            .filter(|n| self.has_edge(node, *n))
            .collect()
    }
}

/// A tunneling network: a directed graph which nodes are labelled by the actions they can perform.
///
/// # Example
///
/// ```
/// # use tunnelsat::tunnel::{Action, ActionSet, Network, TunnelNetwork};
/// let mut network = TunnelNetwork::default();
/// network.new_node("a", [Action::Transmit4].into_iter().collect()).unwrap();
/// network.new_node("b", ActionSet::empty()).unwrap();
/// network.new_edge("a", "b").unwrap();
/// network.set_initial_node("a").unwrap();
/// network.set_final_node("b").unwrap();
/// assert!(network.has_edge(0, 1));
/// assert!(!network.has_edge(1, 0));
/// ```
#[derive(Debug, Default, Clone)]
pub struct TunnelNetwork {
    names: Vec<String>,
    name_to_id: HashMap<String, usize>,
    actions: Vec<ActionSet>,
    edges: Vec<Vec<bool>>,
    n_edges: usize,
    initial: Option<usize>,
    terminal: Option<usize>,
}

impl TunnelNetwork {
    /// Adds a node and returns its index.
    ///
    /// An error is returned if a node with the same name already exists.
    pub fn new_node(&mut self, name: &str, actions: ActionSet) -> Result<usize> {
        if self.name_to_id.contains_key(name) {
            return Err(anyhow!(r#"node "{}" is defined twice"#, name));
        }
        let id = self.names.len();
        self.names.push(name.to_string());
        self.name_to_id.insert(name.to_string(), id);
        self.actions.push(actions);
        self.edges.iter_mut().for_each(|row| row.push(false));
        self.edges.push(vec![false; id + 1]);
        Ok(id)
    }

    /// Returns the index of the node with the given name.
    pub fn node_index(&self, name: &str) -> Result<usize> {
        self.name_to_id
            .get(name)
            .copied()
            .ok_or_else(|| anyhow!(r#"no such node: "{}""#, name))
    }

    /// Adds an edge given the names of its endpoints.
    ///
    /// Returns `false` if the edge was already present.
    pub fn new_edge(&mut self, from: &str, to: &str) -> Result<bool> {
        let context = || format!(r#"cannot add an edge from "{}" to "{}""#, from, to);
        let from_id = self.node_index(from).with_context(context)?;
        let to_id = self.node_index(to).with_context(context)?;
        Ok(self.new_edge_by_ids(from_id, to_id))
    }

    /// Adds an edge given the indexes of its endpoints.
    ///
    /// Returns `false` if the edge was already present.
    ///
    /// # Panics
    ///
    /// Panics if one of the indexes does not refer to a node.
    pub fn new_edge_by_ids(&mut self, from: usize, to: usize) -> bool {
        if self.edges[from][to] {
            false
        } else {
            self.edges[from][to] = true;
            self.n_edges += 1;
            true
        }
    }

    /// Sets the initial node.
    pub fn set_initial_node(&mut self, name: &str) -> Result<()> {
        self.initial = Some(self.node_index(name).context("while setting the initial node")?);
        Ok(())
    }

    /// Sets the final node.
    pub fn set_final_node(&mut self, name: &str) -> Result<()> {
        self.terminal = Some(self.node_index(name).context("while setting the final node")?);
        Ok(())
    }

    /// Returns `true` iff both the initial and the final nodes have been set.
    pub fn has_endpoints(&self) -> bool {
        self.initial.is_some() && self.terminal.is_some()
    }

    /// Returns the number of edges.
    pub fn n_edges(&self) -> usize {
        self.n_edges
    }
}

impl Network for TunnelNetwork {
    fn n_nodes(&self) -> usize {
        self.names.len()
    }

    fn has_edge(&self, from: usize, to: usize) -> bool {
        self.edges[from][to]
    }

    fn actions(&self, node: usize) -> ActionSet {
        self.actions[node]
    }

    fn initial_node(&self) -> usize {
        self.initial.expect("the initial node of the network is not set")
    }

    fn final_node(&self) -> usize {
        self.terminal.expect("the final node of the network is not set")
    }

    fn node_name(&self, node: usize) -> &str {
        &self.names[node]
    }
}
