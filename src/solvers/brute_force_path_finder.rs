use super::specs::PathFinder;
use crate::tunnel::{self, Network, ProtocolStack, Step};
use log::info;

/// A path finder exploring the paths in a depth-first manner.
///
/// Successors are considered by increasing node index, then actions by increasing action index;
/// the first path found in this order is returned.
/// A branch is left as soon as the stack holds too many cells to be emptied in the remaining steps.
///
/// # Example
///
/// ```
/// # use tunnelsat::io::{NetworkReader, TunnelReader};
/// # use tunnelsat::solvers::{BruteForcePathFinder, PathFinder};
/// let instance = "node(a, transmit_4).\nnode(b).\nedge(a,b).\ninitial(a).\nfinal(b).\n";
/// let network = TunnelReader::default().read(&mut instance.as_bytes()).unwrap();
/// let mut finder = BruteForcePathFinder::new(&network, 1);
/// assert_eq!(1, finder.find_path().unwrap().len());
/// ```
pub struct BruteForcePathFinder<'a> {
    network: &'a dyn Network,
    length: usize,
    n_explored_states: usize,
}

impl<'a> BruteForcePathFinder<'a> {
    /// Builds a new brute-force path finder.
    ///
    /// # Panics
    ///
    /// Panics if the length is 0.
    pub fn new(network: &'a dyn Network, length: usize) -> Self {
        assert!(length >= 1, "the length of the path must be at least 1");
        Self {
            network,
            length,
            n_explored_states: 0,
        }
    }

    /// Returns the number of states visited by the last call to [`find_path`](PathFinder::find_path).
    pub fn n_explored_states(&self) -> usize {
        self.n_explored_states
    }

    fn search(&mut self, node: usize, stack: &mut ProtocolStack, path: &mut Vec<Step>) -> bool {
        self.n_explored_states += 1;
        let remaining = self.length - path.len();
        if remaining == 0 {
            return node == self.network.final_node() && stack.height() == 1;
        }
        if stack.height() - 1 > remaining {
            return false;
        }
        for next in self.network.successors(node) {
            for action in self.network.actions(node).iter() {
                if let Some(mut applied) = stack.try_apply(action) {
                    path.push(Step::new(action, node, next));
                    if self.search(next, &mut applied, path) {
                        return true;
                    }
                    path.pop();
                }
            }
        }
        false
    }
}

impl PathFinder for BruteForcePathFinder<'_> {
    fn find_path(&mut self) -> Option<Vec<Step>> {
        self.n_explored_states = 0;
        let mut stack = ProtocolStack::new(tunnel::stack_size(self.length));
        let mut path = Vec::with_capacity(self.length);
        let found = self.search(self.network.initial_node(), &mut stack, &mut path);
        info!(
            "explored {} states while looking for a path",
            self.n_explored_states
        );
        if found {
            Some(path)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{NetworkReader, TunnelReader};
    use crate::tunnel::{Action, TunnelNetwork};

    fn read_network(instance: &str) -> TunnelNetwork {
        TunnelReader::default()
            .read(&mut instance.as_bytes())
            .unwrap()
    }

    #[test]
    fn test_first_path_in_search_order() {
        let network = read_network(
            r#"
            node(a, transmit_6, transmit_4).
            node(b, transmit_4).
            node(c, transmit_4).
            node(d).
            edge(a,c).
            edge(a,b).
            edge(b,d).
            edge(c,d).
            initial(a).
            final(d).
            "#,
        );
        let path = BruteForcePathFinder::new(&network, 2).find_path().unwrap();
        assert_eq!(
            vec![
                Step::new(Action::Transmit4, 0, 1),
                Step::new(Action::Transmit4, 1, 3)
            ],
            path
        );
    }

    #[test]
    fn test_stack_must_be_emptied() {
        let network = read_network(
            r#"
            node(a, push_4_6).
            node(b, transmit_6).
            node(c).
            edge(a,b).
            edge(b,b).
            edge(b,c).
            initial(a).
            final(c).
            "#,
        );
        for length in 1..=5 {
            assert!(BruteForcePathFinder::new(&network, length)
                .find_path()
                .is_none());
        }
    }

    #[test]
    fn test_pruning() {
        let network = read_network(
            r#"
            node(a, push_4_6, push_6_6, pop_6_6, pop_6_4).
            node(b).
            edge(a,a).
            edge(a,b).
            initial(a).
            final(b).
            "#,
        );
        let mut finder = BruteForcePathFinder::new(&network, 4);
        let path = finder.find_path().unwrap();
        assert_eq!(
            vec![Action::Push46, Action::Push66, Action::Pop66, Action::Pop64],
            path.iter().map(|s| s.action()).collect::<Vec<Action>>()
        );
        let explored_first = finder.n_explored_states();
        assert!(explored_first > 0);
        finder.find_path();
        assert_eq!(explored_first, finder.n_explored_states());
        let mut finder = BruteForcePathFinder::new(&network, 3);
        assert!(finder.find_path().is_none());
    }

    #[test]
    #[should_panic(expected = "the length of the path must be at least 1")]
    fn test_null_length() {
        let network = read_network("node(a).\ninitial(a).\nfinal(a).\n");
        BruteForcePathFinder::new(&network, 0);
    }
}
