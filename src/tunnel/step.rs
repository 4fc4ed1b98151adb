use super::{Action, Network, Protocol, ProtocolStack};
use anyhow::{anyhow, Result};

/// A step of a path: an edge traversal together with the action performed by its source node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Step {
    action: Action,
    source: usize,
    target: usize,
}

impl Step {
    /// Builds a new step.
    pub fn new(action: Action, source: usize, target: usize) -> Self {
        Self {
            action,
            source,
            target,
        }
    }

    /// Returns the action performed during this step.
    pub fn action(&self) -> Action {
        self.action
    }

    /// Returns the node the step leaves.
    pub fn source(&self) -> usize {
        self.source
    }

    /// Returns the node the step reaches.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Returns a textual representation of the step using the node names of the network.
    pub fn describe(&self, network: &dyn Network) -> String {
        format!(
            "{} {} {}",
            self.action,
            network.node_name(self.source),
            network.node_name(self.target)
        )
    }
}

/// Checks that a sequence of steps is a valid path of the given length.
///
/// A path is valid if it has the expected number of steps,
/// goes from the initial node to the final node through edges of the network,
/// only uses actions allowed by the nodes they leave,
/// and if its actions can be applied in sequence from a stack holding a single IPv4 cell,
/// leading back to such a stack.
///
/// The first violation is returned as an error.
pub fn check_path(network: &dyn Network, length: usize, steps: &[Step]) -> Result<()> {
    if steps.len() != length {
        return Err(anyhow!(
            "expected a path of length {}, got {} steps",
            length,
            steps.len()
        ));
    }
    let mut stack = ProtocolStack::new(super::stack_size(length));
    let mut current = network.initial_node();
    for (i, step) in steps.iter().enumerate() {
        let describe = || step.describe(network);
        if step.source() != current {
            return Err(anyhow!(
                r#"step {} ({}) does not start at node "{}""#,
                i,
                describe(),
                network.node_name(current)
            ));
        }
        if !network.has_edge(step.source(), step.target()) {
            return Err(anyhow!("step {} ({}) uses a missing edge", i, describe()));
        }
        if !network.actions(step.source()).contains(step.action()) {
            return Err(anyhow!(
                "step {} ({}) uses an action its source node does not allow",
                i,
                describe()
            ));
        }
        if !stack.apply(step.action()) {
            return Err(anyhow!(
                "step {} ({}) cannot be applied on stack {:?}",
                i,
                describe(),
                stack.cells()
            ));
        }
        current = step.target();
    }
    if current != network.final_node() {
        return Err(anyhow!(
            r#"the path ends at node "{}" instead of "{}""#,
            network.node_name(current),
            network.node_name(network.final_node())
        ));
    }
    if stack.cells() != [Protocol::V4] {
        return Err(anyhow!(
            "the path ends with stack {:?} instead of a single IPv4 cell",
            stack.cells()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tunnel::{ActionSet, TunnelNetwork};

    fn network() -> TunnelNetwork {
        let mut network = TunnelNetwork::default();
        network
            .new_node("a", [Action::Push46].into_iter().collect())
            .unwrap();
        network
            .new_node("b", [Action::Pop64, Action::Transmit6].into_iter().collect())
            .unwrap();
        network.new_node("c", ActionSet::empty()).unwrap();
        network.new_edge("a", "b").unwrap();
        network.new_edge("b", "b").unwrap();
        network.new_edge("b", "c").unwrap();
        network.set_initial_node("a").unwrap();
        network.set_final_node("c").unwrap();
        network
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            "push_4_6 a b",
            Step::new(Action::Push46, 0, 1).describe(&network())
        );
    }

    #[test]
    fn test_accessors() {
        let step = Step::new(Action::Pop64, 1, 2);
        assert_eq!(Action::Pop64, step.action());
        assert_eq!(1, step.source());
        assert_eq!(2, step.target());
    }

    #[test]
    fn test_nested_tunnels_fill_the_stack() {
        let mut network = TunnelNetwork::default();
        network.new_node("a", ActionSet::all()).unwrap();
        network.new_edge("a", "a").unwrap();
        network.set_initial_node("a").unwrap();
        network.set_final_node("a").unwrap();
        let steps = [
            Step::new(Action::Push46, 0, 0),
            Step::new(Action::Push64, 0, 0),
            Step::new(Action::Pop46, 0, 0),
            Step::new(Action::Pop64, 0, 0),
        ];
        check_path(&network, 4, &steps).unwrap();
    }

    #[test]
    fn test_valid_path() {
        let steps = [
            Step::new(Action::Push46, 0, 1),
            Step::new(Action::Transmit6, 1, 1),
            Step::new(Action::Pop64, 1, 2),
        ];
        check_path(&network(), 3, &steps).unwrap();
    }

    #[test]
    fn test_wrong_length() {
        let steps = [Step::new(Action::Push46, 0, 1)];
        assert_eq!(
            "expected a path of length 2, got 1 steps",
            check_path(&network(), 2, &steps).unwrap_err().to_string()
        );
    }

    #[test]
    fn test_disconnected_steps() {
        let steps = [
            Step::new(Action::Push46, 0, 1),
            Step::new(Action::Pop64, 0, 2),
        ];
        assert_eq!(
            r#"step 1 (pop_6_4 a c) does not start at node "b""#,
            check_path(&network(), 2, &steps).unwrap_err().to_string()
        );
    }

    #[test]
    fn test_missing_edge() {
        let steps = [Step::new(Action::Push46, 0, 2)];
        assert_eq!(
            "step 0 (push_4_6 a c) uses a missing edge",
            check_path(&network(), 1, &steps).unwrap_err().to_string()
        );
    }

    #[test]
    fn test_forbidden_action() {
        let steps = [
            Step::new(Action::Push44, 0, 1),
            Step::new(Action::Pop44, 1, 2),
        ];
        assert_eq!(
            "step 0 (push_4_4 a b) uses an action its source node does not allow",
            check_path(&network(), 2, &steps).unwrap_err().to_string()
        );
    }

    #[test]
    fn test_stack_not_back_to_bottom() {
        let steps = [
            Step::new(Action::Push46, 0, 1),
            Step::new(Action::Transmit6, 1, 2),
        ];
        assert!(check_path(&network(), 2, &steps)
            .unwrap_err()
            .to_string()
            .starts_with("the path ends with stack"));
    }

    #[test]
    fn test_wrong_end_node() {
        let steps = [
            Step::new(Action::Push46, 0, 1),
            Step::new(Action::Pop64, 1, 1),
        ];
        assert_eq!(
            r#"the path ends at node "b" instead of "c""#,
            check_path(&network(), 2, &steps).unwrap_err().to_string()
        );
    }
}
